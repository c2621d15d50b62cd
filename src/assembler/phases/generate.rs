use super::resolve::LabelIndex;
use super::types::{Located, Operand, Statement};
use super::verify::Program;
use crate::assembler::image::Image;
use crate::spec::{
    isa::InstructionSet,
    types::hw::{Addr, Word, INDIRECT_BIT},
};
use std::collections::BTreeMap;

fn base_opcode(name: &str) -> Word {
    // Statements only ever name mnemonics which the classifier found in the table.
    InstructionSet::get()
        .lookup(name)
        .expect("statement names an instruction missing from the table")
        .opcode
}

fn encode_inst(name: &str, operand: Operand) -> Word {
    let base = base_opcode(name);
    match operand {
        Operand::None => base,
        Operand::Direct(addr) => base + addr,
        Operand::Indirect(addr) => base + INDIRECT_BIT + addr,
    }
}

/// The word a single statement assembles to, if it occupies program memory.
pub fn encode(stmt: &Statement, labels: &LabelIndex) -> Option<Word> {
    match stmt {
        Statement::Inst(name, operand) => Some(encode_inst(name, *operand)),
        // Verification guarantees every jump target is defined.
        Statement::Jump(target) => labels
            .get(target)
            .map(|idx| InstructionSet::get().branch_opcode() + idx),
        _ => None,
    }
}

/// The declared data words, by address.
pub fn data_map(statements: &[Located<Statement>]) -> BTreeMap<Addr, Word> {
    statements
        .iter()
        .filter_map(|stmt| match stmt.as_value() {
            Statement::Data(addr, value) => Some((*addr, *value)),
            _ => None,
        })
        .collect()
}

/// Lays out a verified program: instruction words from address zero in source order, then
/// the declared data words at their addresses.
pub fn generate(program: &Program, labels: &LabelIndex) -> Image {
    let mut image = Image::new();

    let words = program
        .statements
        .iter()
        .filter_map(|stmt| encode(stmt.as_value(), labels));
    for (addr, word) in program.metadata.program_range().zip(words) {
        image.set(addr as Addr, word);
    }

    for (addr, value) in data_map(&program.statements) {
        image.set(addr, value);
    }

    image
}
