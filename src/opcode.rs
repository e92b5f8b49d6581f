/// The Pairs instruction set.
///
/// Each opcode is a single byte followed by a fixed number of operand bytes.
/// Bytes outside this table are not instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Halt,
    StoreImm,
    StoreReg,
    AddImm,
    AddReg,
    PrintReg,
    PrintChar,
    LabelSetReg,
    LabelSetImm,
    JumpReg,
    JumpImm,
    JumpTrue,
}

pub const HALT: u8 = 0;
pub const STORE_IMM: u8 = 1;
pub const STORE_REG: u8 = 2;
pub const ADD_IMM: u8 = 10;
pub const ADD_REG: u8 = 11;
pub const PRINT_REG: u8 = 20;
pub const PRINT_CHAR: u8 = 21;
pub const LABELSET_REG: u8 = 40;
pub const LABELSET_IMM: u8 = 41;
pub const JUMP_REG: u8 = 42;
pub const JUMP_IMM: u8 = 43;
pub const JUMPTRUE: u8 = 44;

impl Opcode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        let op = match byte {
            HALT => Self::Halt,
            STORE_IMM => Self::StoreImm,
            STORE_REG => Self::StoreReg,
            ADD_IMM => Self::AddImm,
            ADD_REG => Self::AddReg,
            PRINT_REG => Self::PrintReg,
            PRINT_CHAR => Self::PrintChar,
            LABELSET_REG => Self::LabelSetReg,
            LABELSET_IMM => Self::LabelSetImm,
            JUMP_REG => Self::JumpReg,
            JUMP_IMM => Self::JumpImm,
            JUMPTRUE => Self::JumpTrue,
            _ => return None,
        };
        Some(op)
    }

    /// Number of operand bytes consumed after the opcode byte.
    pub fn arity(self) -> usize {
        match self {
            Self::Halt => 0,
            Self::PrintReg
            | Self::PrintChar
            | Self::LabelSetReg
            | Self::LabelSetImm
            | Self::JumpReg
            | Self::JumpImm => 1,
            Self::StoreImm | Self::StoreReg | Self::AddImm | Self::AddReg => 2,
            Self::JumpTrue => 3,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Halt => "HALT",
            Self::StoreImm => "STORE_IMM",
            Self::StoreReg => "STORE_REG",
            Self::AddImm => "ADD_IMM",
            Self::AddReg => "ADD_REG",
            Self::PrintReg => "PRINT_REG",
            Self::PrintChar => "PRINT_CHAR",
            Self::LabelSetReg => "LABELSET_REG",
            Self::LabelSetImm => "LABELSET_IMM",
            Self::JumpReg => "JUMP_REG",
            Self::JumpImm => "JUMP_IMM",
            Self::JumpTrue => "JUMPTRUE",
        }
    }
}
