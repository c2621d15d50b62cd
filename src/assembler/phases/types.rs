use crate::spec::types::hw::{Addr, Word};
use derive_more::Constructor;
use std::fmt::{Debug, Display};
use strum_macros::EnumIter;

/*
    Phases:

        1.  Preprocessing: Each source line is stripped of its comment (everything from the
            first ';'), trimmed and uppercased. From here on the assembler never looks at raw
            source text again.

        2.  Classification: Each line is split at whitespace and parsed into a `Statement`,
            which carries the decoded operands. The `LineType` of a line is derived from
            its `Statement`, or is `SyntaxError` if no statement could be parsed.

        3.  Verification: The whole list of statements is checked against the global
            invariants (labels unique, jump targets defined, data declared before `START:`
            and outside the reserved low words, program and data not overlapping).
            This produces the `ProgramMetadata` of the program, and any violation aborts
            the assembly.

        4.  Resolution: The program-counter index of every label is computed with one pass
            over the statements, counting only the instruction-bearing ones.

        5.  Generation: Every instruction-bearing statement is encoded into a word and the
            data declarations are placed at their addresses, giving the memory `Image`.
*/

pub type LabelName = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum LineType {
    Empty,
    Label,
    ProgramStart,
    InstrNoOperand,
    InstrDirectOperand,
    InstrIndirectOperand,
    Jump,
    DataDeclaration,
    SyntaxError,
}

impl LineType {
    // Lines which occupy a word of program memory.
    pub fn is_instruction(self) -> bool {
        match self {
            LineType::InstrNoOperand
            | LineType::InstrDirectOperand
            | LineType::InstrIndirectOperand
            | LineType::Jump => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Direct(Addr),
    Indirect(Addr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Empty,
    LabelDef(LabelName),
    ProgramStart,
    Inst(&'static str, Operand),
    Jump(LabelName),
    Data(Addr, Word),
}

impl Statement {
    pub fn line_type(&self) -> LineType {
        match self {
            Statement::Empty => LineType::Empty,
            Statement::LabelDef(_) => LineType::Label,
            Statement::ProgramStart => LineType::ProgramStart,
            Statement::Inst(_, Operand::None) => LineType::InstrNoOperand,
            Statement::Inst(_, Operand::Direct(_)) => LineType::InstrDirectOperand,
            Statement::Inst(_, Operand::Indirect(_)) => LineType::InstrIndirectOperand,
            Statement::Jump(_) => LineType::Jump,
            Statement::Data(_, _) => LineType::DataDeclaration,
        }
    }

    /// The name this statement defines, if it is a label definition (`START` included).
    pub fn defined_label(&self) -> Option<&str> {
        match self {
            Statement::LabelDef(label) => Some(label),
            Statement::ProgramStart => Some(START_LABEL),
            _ => None,
        }
    }
}

pub const START_LABEL: &str = "START";

#[derive(Debug, PartialEq, Clone, Copy, Eq, Constructor)]
pub struct Loc {
    line: usize,
}

impl Loc {
    // Lines are numbered from 1, as an editor shows them.
    pub fn from_index(idx: usize) -> Self {
        Loc::new(idx + 1)
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<T: Sized> {
    loc: Option<Loc>,
    val: T,
}

impl Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(line: {})", self.line)
    }
}

impl<T: Display> Display for Located<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.loc {
            None => write!(f, "{}", self.val),
            Some(loc) => write!(f, "@{}: {}", loc, self.val),
        }
    }
}

impl<T> Located<T> {
    fn new(loc: Option<Loc>, val: T) -> Self {
        Located { loc, val }
    }

    pub fn with_loc(loc: Loc, val: T) -> Self {
        Located::new(Some(loc), val)
    }

    pub fn loc(&self) -> Option<Loc> {
        self.loc
    }

    pub fn line(&self) -> Option<usize> {
        self.loc.map(|loc| loc.line())
    }

    pub fn as_value(&self) -> &T {
        &self.val
    }

    pub fn transfer<S>(&self, s: S) -> Located<S> {
        Located::new(self.loc, s)
    }
}

impl<T> From<T> for Located<T> {
    fn from(val: T) -> Self {
        Located { loc: None, val }
    }
}

impl<T: Debug + Display> std::error::Error for Located<T> {}
