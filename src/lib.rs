pub mod error;
pub mod opcode;
pub mod program;
pub mod tokenizer;
pub mod vm;

pub use error::{PairsError, Result};
pub use program::Program;
pub use tokenizer::{decode_token, encode, encode_byte, tokenize};
pub use vm::{Interpreter, Outcome, Status};
