use std::io::Write;

use tracing::{debug, trace};

use crate::error::{PairsError, Result};
use crate::opcode::Opcode;
use crate::program::Program;

/// Number of registers and labels, one per possible index byte.
pub const TABLE_SIZE: usize = 256;

/// Whether the machine can keep stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
}

/// Summary of a run that reached HALT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Instructions executed, including the final HALT.
    pub steps: usize,
}

/// The Pairs virtual machine.
///
/// State:
/// - `registers`: 256 signed cells, wrapping arithmetic, start at 0
/// - `labels`: 256 jump targets, unset labels point at position 0
/// - `pc`: index of the next opcode byte, starts at 0
///
/// A machine is built for one run; nothing is shared between instances.
pub struct Interpreter {
    registers: [i32; TABLE_SIZE],
    labels: [usize; TABLE_SIZE],
    pc: usize,
    steps: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            registers: [0; TABLE_SIZE],
            labels: [0; TABLE_SIZE],
            pc: 0,
            steps: 0,
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn register(&self, index: u8) -> i32 {
        self.registers[index as usize]
    }

    pub fn label(&self, index: u8) -> usize {
        self.labels[index as usize]
    }

    /// Run until HALT, writing PRINT output to `out`.
    ///
    /// The first failure stops the run. Output written before it is kept.
    pub fn run<W: Write>(&mut self, program: &Program, out: &mut W) -> Result<Outcome> {
        debug!(len = program.len(), "starting run");
        while self.step(program, out)? == Status::Running {}
        debug!(steps = self.steps, pc = self.pc, "halted");
        Ok(Outcome { steps: self.steps })
    }

    /// Fetch, decode and execute the instruction at `pc`.
    pub fn step<W: Write>(&mut self, program: &Program, out: &mut W) -> Result<Status> {
        let pc = self.pc;
        let len = program.len();

        let byte = program
            .get(pc)
            .ok_or(PairsError::ProgramBounds { pc, len })?;
        let op = Opcode::from_byte(byte).ok_or(PairsError::UnknownOpcode { opcode: byte, pc })?;

        let arity = op.arity();
        let mut operands = [0u8; 3];
        for (i, slot) in operands.iter_mut().enumerate().take(arity) {
            let at = pc + 1 + i;
            *slot = program
                .get(at)
                .ok_or(PairsError::ProgramBounds { pc: at, len })?;
        }
        let [a, b, c] = operands;
        let next = pc + 1 + arity;

        trace!(pc, op = op.mnemonic(), operands = ?&operands[..arity], "exec");
        self.steps += 1;

        match op {
            Opcode::Halt => return Ok(Status::Halted),
            Opcode::StoreImm => {
                self.registers[b as usize] = a as i32;
                self.pc = next;
            }
            Opcode::StoreReg => {
                self.registers[b as usize] = self.registers[a as usize];
                self.pc = next;
            }
            Opcode::AddImm => {
                let dst = &mut self.registers[b as usize];
                *dst = dst.wrapping_add(a as i32);
                self.pc = next;
            }
            Opcode::AddReg => {
                let src = self.registers[a as usize];
                let dst = &mut self.registers[b as usize];
                *dst = dst.wrapping_add(src);
                self.pc = next;
            }
            Opcode::PrintReg => {
                writeln!(out, "{}", self.registers[a as usize])?;
                self.pc = next;
            }
            Opcode::PrintChar => {
                out.write_all(&[a, b'\n'])?;
                self.pc = next;
            }
            Opcode::LabelSetReg => {
                // The register with the label's own index holds the position.
                let value = self.registers[a as usize];
                let target = usize::try_from(value)
                    .map_err(|_| PairsError::InvalidJumpTarget { value, pc })?;
                self.labels[a as usize] = target;
                self.pc = next;
            }
            Opcode::LabelSetImm => {
                self.labels[a as usize] = next;
                self.pc = next;
            }
            Opcode::JumpReg => {
                let label = label_index(self.registers[a as usize], pc)?;
                self.pc = self.labels[label];
            }
            Opcode::JumpImm => {
                self.pc = self.labels[a as usize];
            }
            Opcode::JumpTrue => {
                if self.registers[a as usize] == self.registers[b as usize] {
                    let label = label_index(self.registers[c as usize], pc)?;
                    self.pc = self.labels[label];
                } else {
                    self.pc = next;
                }
            }
        }

        Ok(Status::Running)
    }
}

/// Convert a register value into a label index.
fn label_index(value: i32, pc: usize) -> Result<usize> {
    u8::try_from(value)
        .map(usize::from)
        .map_err(|_| PairsError::LabelOutOfRange { value, pc })
}

/// Run a program on a fresh interpreter.
pub fn run<W: Write>(program: &Program, out: &mut W) -> Result<Outcome> {
    Interpreter::new().run(program, out)
}
