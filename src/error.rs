/// Every way a Pairs run can fail. None of these are recoverable: the first
/// one ends tokenization or execution.
#[derive(Debug, thiserror::Error)]
pub enum PairsError {
    #[error("format error: token {index} is {len} bytes long, expected 16")]
    Format { index: usize, len: usize },

    #[error("out of memory: could not grow program buffer to {requested} entries")]
    OutOfMemory { requested: usize },

    #[error("unknown opcode {opcode} at pc {pc} (or the previous instruction is malformed)")]
    UnknownOpcode { opcode: u8, pc: usize },

    #[error("program bounds error: pc {pc} ran past the end of a {len}-byte program without HALT")]
    ProgramBounds { pc: usize, len: usize },

    #[error("label index {value} out of range 0..=255 at pc {pc}")]
    LabelOutOfRange { value: i32, pc: usize },

    #[error("invalid jump target {value} at pc {pc}")]
    InvalidJumpTarget { value: i32, pc: usize },

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PairsError>;
