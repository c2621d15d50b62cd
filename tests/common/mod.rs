#![allow(dead_code)]

use bproc::assembler::{self, Assembly, ErrorKind};
use bproc::spec::types::hw::Word;

pub fn assemble_ok(lines: &[&str]) -> Assembly {
    match assembler::assemble_lines(lines) {
        Ok(assembly) => assembly,
        Err(err) => panic!("expected {:?} to assemble, got: {}", lines, err),
    }
}

/// Asserts that assembly fails with an error of `kind` located at `line`.
pub fn assert_fails(lines: &[&str], kind: ErrorKind, line: Option<usize>) {
    match assembler::assemble_lines(lines) {
        Ok(_) => panic!("expected {:?} to fail", lines),
        Err(err) => {
            assert_eq!(err.kind(), kind, "{}", err);
            assert_eq!(err.line(), line, "{}", err);
        }
    }
}

pub fn program_words(assembly: &Assembly) -> &[Word] {
    &assembly.image.words()[..assembly.metadata.program_words()]
}
