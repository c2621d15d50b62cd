use super::types::{LabelName, Located, Statement};
use crate::spec::types::hw::{Addr, ADDR_MAX};
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelIndex {
    indices: HashMap<LabelName, Addr>,
}

impl LabelIndex {
    pub fn get(&self, label: &str) -> Option<Addr> {
        self.indices.get(label).copied()
    }
}

// A label after the last word of a full program would sit at `MEMORY_WORDS`, which does not
// fit the 12-bit operand field.
fn pc_to_index(pc: usize) -> Addr {
    (pc & usize::from(ADDR_MAX)) as Addr
}

/// Assigns every label (and `START`) the program-counter index of the next instruction-bearing
/// statement after it. Done in full before any code is generated, so a jump may refer to a label
/// defined further down.
pub fn resolve(statements: &[Located<Statement>]) -> LabelIndex {
    let mut indices = HashMap::new();
    let mut pc = 0usize;

    for stmt in statements {
        let stmt = stmt.as_value();
        if let Some(label) = stmt.defined_label() {
            indices.insert(label.to_owned(), pc_to_index(pc));
        }

        if stmt.line_type().is_instruction() {
            pc += 1;
        }
    }

    debug!("resolved {} labels over {} program words", indices.len(), pc);

    LabelIndex { indices }
}
