use super::hw::Word;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstClass {
    // Decoded directly by the control unit.
    Hardware,
    // Expanded by the assembler into a hardware instruction.
    Software,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionSpec {
    pub name: &'static str,
    pub has_operand: bool,
    pub opcode: Word,
    pub class: InstClass,
    pub desc: &'static str,
}

impl InstructionSpec {
    pub const fn hw(name: &'static str, has_operand: bool, opcode: Word, desc: &'static str) -> Self {
        InstructionSpec {
            name,
            has_operand,
            opcode,
            class: InstClass::Hardware,
            desc,
        }
    }

    pub const fn sw(name: &'static str, has_operand: bool, opcode: Word, desc: &'static str) -> Self {
        InstructionSpec {
            name,
            has_operand,
            opcode,
            class: InstClass::Software,
            desc,
        }
    }
}

impl Display for InstClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstClass::Hardware => write!(f, "Hardware"),
            InstClass::Software => write!(f, "Software"),
        }
    }
}

impl Display for InstructionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "| {: <6} | {:#06X}  | {: <8} | {: <3} | {}",
            self.name,
            self.opcode,
            self.class,
            if self.has_operand { "Yes" } else { "No" },
            self.desc
        )
    }
}
