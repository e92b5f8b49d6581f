use tracing::debug;

use crate::error::{PairsError, Result};
use crate::opcode::Opcode;

/// Entries requested each time the program buffer runs out of room.
const GROWTH_CHUNK: usize = 1024;

/// A decoded Pairs program: one byte per source token, in source order.
///
/// Whether a byte is an opcode or an operand is only known at execution
/// time, from the arity of the opcode that precedes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Append a decoded byte, growing the buffer in fixed chunks.
    ///
    /// Allocation failure is reported instead of aborting the process.
    pub fn try_push(&mut self, byte: u8) -> Result<()> {
        if self.bytes.len() == self.bytes.capacity() {
            let requested = self.bytes.capacity() + GROWTH_CHUNK;
            self.bytes
                .try_reserve_exact(GROWTH_CHUNK)
                .map_err(|_| PairsError::OutOfMemory { requested })?;
            debug!(capacity = self.bytes.capacity(), "program buffer grown");
        }
        self.bytes.push(byte);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn get(&self, pc: usize) -> Option<u8> {
        self.bytes.get(pc).copied()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Render a linear listing of the program, one instruction per line.
    ///
    /// The walk follows arities from position 0, the same way execution
    /// does when no jumps are taken. Unknown bytes are listed one at a time
    /// and a final instruction missing operands is marked as truncated.
    pub fn disassemble(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        let mut pc = 0;

        while pc < self.bytes.len() {
            let byte = self.bytes[pc];
            let Some(op) = Opcode::from_byte(byte) else {
                let _ = writeln!(out, "{pc:04}: {byte:3}  ???");
                pc += 1;
                continue;
            };

            let end = pc + 1 + op.arity();
            if end > self.bytes.len() {
                let _ = writeln!(
                    out,
                    "{pc:04}: {}  (truncated)",
                    format_bytes(&self.bytes[pc..])
                );
                break;
            }

            let operands = &self.bytes[pc + 1..end];
            let args: Vec<String> = operands.iter().map(|b| b.to_string()).collect();
            let line = format!(
                "{pc:04}: {:<15}  {} {}",
                format_bytes(&self.bytes[pc..end]),
                op.mnemonic(),
                args.join(", ")
            );
            let _ = writeln!(out, "{}", line.trim_end());
            pc = end;
        }

        out
    }
}

fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:3}"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<Vec<u8>> for Program {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}
