use super::classify::{self, tokenize};
use super::types::{LabelName, LineType, Loc, Located, Statement};
use crate::common;
use crate::spec::types::hw::{Addr, DATA_ADDR_MIN, MEMORY_WORDS};
use log::{debug, info};
use std::collections::HashSet;
use std::fmt::Display;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Label,
    DataRange,
    Structural,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Syntax(classify::Error),
    UndefinedJumpTarget(LabelName),
    DuplicateLabel(LabelName),
    DataWithoutStart,
    DataAfterStart { data: Loc, start: Loc },
    DuplicateDataAddress(Addr),
    ReservedDataAddress(Addr),
    ProgramTooLarge(usize),
    ProgramOverlapsData { words: usize, first_data: Addr },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::UndefinedJumpTarget(_) | Error::DuplicateLabel(_) => ErrorKind::Label,
            Error::DataWithoutStart | Error::DataAfterStart { .. } => ErrorKind::Structural,
            Error::DuplicateDataAddress(_)
            | Error::ReservedDataAddress(_)
            | Error::ProgramTooLarge(_)
            | Error::ProgramOverlapsData { .. } => ErrorKind::DataRange,
        }
    }
}

impl Located<Error> {
    pub fn kind(&self) -> ErrorKind {
        self.as_value().kind()
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "Syntax"),
            ErrorKind::Label => write!(f, "Label"),
            ErrorKind::DataRange => write!(f, "Data Range"),
            ErrorKind::Structural => write!(f, "Structure"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(err) => write!(f, "{}", err),
            Error::UndefinedJumpTarget(label) => {
                write!(f, "Jump to label '{}', which is never defined", label)
            }
            Error::DuplicateLabel(label) => write!(f, "Duplicate label '{}'", label),
            Error::DataWithoutStart => {
                write!(f, "Data is declared but the 'START:' label is missing")
            }
            Error::DataAfterStart { data, start } => write!(
                f,
                "Data is declared at line {}, after the 'START:' label at line {}",
                data.line(),
                start.line()
            ),
            Error::DuplicateDataAddress(addr) => {
                write!(f, "Duplicate data declaration at address {:#05X}", addr)
            }
            Error::ReservedDataAddress(addr) => write!(
                f,
                "Data may not be declared in the reserved range [0x000, {:#05X}), found {:#05X}",
                DATA_ADDR_MIN, addr
            ),
            Error::ProgramTooLarge(words) => write!(
                f,
                "Program needs {} words, which exceeds the memory capacity of {} words",
                words, MEMORY_WORDS
            ),
            Error::ProgramOverlapsData { words, first_data } => write!(
                f,
                "Program needs {} words and overlaps the data declared from {:#05X}, declare data at a higher address",
                words, first_data
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramMetadata {
    program_words: usize,
    data_words: usize,
    first_data_addr: Option<Addr>,
}

impl ProgramMetadata {
    pub fn program_words(&self) -> usize {
        self.program_words
    }

    pub fn data_words(&self) -> usize {
        self.data_words
    }

    pub fn first_data_addr(&self) -> Option<Addr> {
        self.first_data_addr
    }

    pub fn has_data(&self) -> bool {
        self.first_data_addr.is_some()
    }

    // One past the last word available to the program.
    pub fn program_end(&self) -> usize {
        self.first_data_addr.map_or(MEMORY_WORDS, usize::from)
    }

    pub fn program_range(&self) -> Range<usize> {
        0..self.program_words
    }

    pub fn data_range(&self) -> Option<Range<usize>> {
        self.first_data_addr
            .map(|addr| usize::from(addr)..MEMORY_WORDS)
    }

    /// Fraction of the whole memory in use by program and data words.
    pub fn usage(&self) -> f64 {
        (self.program_words + self.data_words) as f64 / MEMORY_WORDS as f64
    }
}

impl Display for ProgramMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let program = self.program_range();
        writeln!(
            f,
            "Program memory usage: {} words [{:#05X}, {:#05X})",
            self.program_words, program.start, program.end
        )?;
        match self.data_range() {
            Some(data) => writeln!(
                f,
                "Data memory usage: {} words in [{:#05X}, {:#05X})",
                self.data_words, data.start, data.end
            )?,
            None => writeln!(f, "Data memory usage: none")?,
        }
        write!(f, "Total used: {:.1}%", self.usage() * 100.0)
    }
}

// A program which has passed verification, ready for resolution and generation.
#[derive(Debug)]
pub struct Program {
    pub statements: Vec<Located<Statement>>,
    pub metadata: ProgramMetadata,
}

fn classify_all<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Located<Statement>>, Located<Error>> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let loc = Loc::from_index(idx);
            Statement::parse(&tokenize(line.as_ref()))
                .map(|stmt| Located::with_loc(loc, stmt))
                .map_err(|err| Located::with_loc(loc, Error::Syntax(err)))
        })
        .collect()
}

fn lines_of(stmts: &[Located<Statement>], ty: LineType) -> impl Iterator<Item = &Located<Statement>> {
    stmts
        .iter()
        .filter(move |stmt| stmt.as_value().line_type() == ty)
}

fn check_jump_targets(stmts: &[Located<Statement>]) -> Result<(), Located<Error>> {
    let labels: HashSet<&str> = stmts
        .iter()
        .filter_map(|stmt| stmt.as_value().defined_label())
        .collect();

    for stmt in stmts {
        if let Statement::Jump(target) = stmt.as_value() {
            if !labels.contains(target.as_str()) {
                return Err(stmt.transfer(Error::UndefinedJumpTarget(target.clone())));
            }
        }
    }

    Ok(())
}

fn check_data_order(stmts: &[Located<Statement>]) -> Result<(), Located<Error>> {
    // A repeated `START:` is left for the label checks, data must precede the last one.
    let start = lines_of(stmts, LineType::ProgramStart).last();
    let first_data = lines_of(stmts, LineType::DataDeclaration).next();
    let last_data = lines_of(stmts, LineType::DataDeclaration).last();

    match (start, first_data, last_data) {
        (_, None, _) | (_, _, None) => Ok(()),
        (None, Some(data), _) => Err(data.transfer(Error::DataWithoutStart)),
        (Some(start), _, Some(data)) => match (start.loc(), data.loc()) {
            (Some(start_loc), Some(data_loc)) if data_loc.line() > start_loc.line() => {
                Err(data.transfer(Error::DataAfterStart {
                    data: data_loc,
                    start: start_loc,
                }))
            }
            _ => Ok(()),
        },
    }
}

fn check_unique_labels(stmts: &[Located<Statement>]) -> Result<(), Located<Error>> {
    let labelled = stmts
        .iter()
        .filter_map(|stmt| stmt.as_value().defined_label().map(|label| (stmt, label)));

    match common::find_first_repeat(labelled, |(_, label)| *label) {
        Some((stmt, label)) => Err(stmt.transfer(Error::DuplicateLabel(label.to_owned()))),
        None => Ok(()),
    }
}

fn data_decls(stmts: &[Located<Statement>]) -> impl Iterator<Item = (&Located<Statement>, Addr)> {
    stmts.iter().filter_map(|stmt| match stmt.as_value() {
        Statement::Data(addr, _) => Some((stmt, *addr)),
        _ => None,
    })
}

fn check_unique_data(stmts: &[Located<Statement>]) -> Result<(), Located<Error>> {
    match common::find_first_repeat(data_decls(stmts), |(_, addr)| *addr) {
        Some((stmt, addr)) => Err(stmt.transfer(Error::DuplicateDataAddress(addr))),
        None => Ok(()),
    }
}

// `first_data` is the declaration of the lowest data address, if there is any data.
fn check_capacity(
    metadata: &ProgramMetadata,
    first_data: Option<&Located<Statement>>,
) -> Result<(), Located<Error>> {
    let words = metadata.program_words();
    let fits = words <= metadata.program_end();

    match (metadata.first_data_addr(), first_data) {
        (Some(addr), Some(stmt)) if addr < DATA_ADDR_MIN => {
            Err(stmt.transfer(Error::ReservedDataAddress(addr)))
        }
        (Some(addr), Some(stmt)) if !fits => Err(stmt.transfer(Error::ProgramOverlapsData {
            words,
            first_data: addr,
        })),
        (None, _) if !fits => Err(Located::from(Error::ProgramTooLarge(words))),
        _ => Ok(()),
    }
}

/// Classifies and checks a whole program of normalized lines. The first violation found
/// aborts verification; nothing is produced for a program with any error in it.
pub fn verify<S: AsRef<str>>(lines: &[S]) -> Result<Program, Located<Error>> {
    let statements = classify_all(lines)?;
    debug!("classified {} lines", statements.len());

    check_jump_targets(&statements)?;
    check_data_order(&statements)?;
    check_unique_labels(&statements)?;
    check_unique_data(&statements)?;

    let program_words = statements
        .iter()
        .filter(|stmt| stmt.as_value().line_type().is_instruction())
        .count();
    // The lowest declared address; on ties the earliest line is reported.
    let first_data = data_decls(&statements).fold(None, |min, (stmt, addr)| match min {
        Some((_, min_addr)) if min_addr <= addr => min,
        _ => Some((stmt, addr)),
    });

    let metadata = ProgramMetadata {
        program_words,
        data_words: data_decls(&statements).count(),
        first_data_addr: first_data.map(|(_, addr)| addr),
    };

    check_capacity(&metadata, first_data.map(|(stmt, _)| stmt))?;

    info!(
        "program uses {} words, data uses {} words ({:.1}% of memory)",
        metadata.program_words,
        metadata.data_words,
        metadata.usage() * 100.0
    );

    Ok(Program {
        statements,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify_err(lines: &[&str]) -> Located<Error> {
        verify(lines).expect_err("program should not verify")
    }

    #[test]
    fn minimal_program() {
        let program = verify(&["START:", "HLT"]).unwrap();
        assert_eq!(program.metadata.program_words(), 1);
        assert_eq!(program.metadata.data_words(), 0);
        assert!(!program.metadata.has_data());
        assert_eq!(program.metadata.program_end(), MEMORY_WORDS);
        assert_eq!(program.metadata.data_range(), None);
    }

    #[test]
    fn syntax_error_reports_first_line() {
        let err = verify_err(&["START:", "FOO", "BAR"]);
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn jump_to_unknown_label() {
        let err = verify_err(&["JMP FOO", "START:"]);
        assert_eq!(
            err.as_value(),
            &Error::UndefinedJumpTarget("FOO".to_owned())
        );
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn jump_checked_without_any_labels() {
        let err = verify_err(&["JMP FOO"]);
        assert_eq!(err.kind(), ErrorKind::Label);
    }

    #[test]
    fn data_requires_start() {
        let err = verify_err(&[".DATA 0X010 0X0001", "HLT"]);
        assert_eq!(err.as_value(), &Error::DataWithoutStart);
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn data_after_start() {
        let err = verify_err(&[".DATA 0X010 0X0001", "START:", ".DATA 0X011 0X0001", "HLT"]);
        assert_eq!(
            err.as_value(),
            &Error::DataAfterStart {
                data: Loc::new(3),
                start: Loc::new(2)
            }
        );
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn data_between_repeated_starts() {
        let err = verify_err(&["START:", ".DATA 0X020 0X0001", "START:", "HLT"]);
        assert_eq!(err.as_value(), &Error::DuplicateLabel("START".to_owned()));
        assert_eq!(err.kind(), ErrorKind::Label);
        assert_eq!(err.line(), Some(3));

        let err = verify_err(&["START:", "START:", ".DATA 0X020 0X0001"]);
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn metadata_summary() {
        let program =
            verify(&[".DATA 0X020 0X0001", ".DATA 0X021 0X0002", "START:", "CLA", "HLT"]).unwrap();
        assert_eq!(program.metadata.program_range(), 0..2);
        assert_eq!(
            program.metadata.to_string(),
            "Program memory usage: 2 words [0x000, 0x002)\n\
             Data memory usage: 2 words in [0x020, 0x1000)\n\
             Total used: 0.1%"
        );
    }

    #[test]
    fn duplicate_labels() {
        let err = verify_err(&["START:", "A:", "HLT", "A:"]);
        assert_eq!(err.as_value(), &Error::DuplicateLabel("A".to_owned()));
        assert_eq!(err.line(), Some(4));

        let err = verify_err(&["START:", "HLT", "START:"]);
        assert_eq!(err.as_value(), &Error::DuplicateLabel("START".to_owned()));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn duplicate_data_compares_addresses() {
        let err = verify_err(&[".DATA 0X020 0X0001", ".DATA 020H 0X0002", "START:"]);
        assert_eq!(err.as_value(), &Error::DuplicateDataAddress(0x020));
        assert_eq!(err.kind(), ErrorKind::DataRange);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn reserved_data_boundary() {
        let err = verify_err(&[".DATA 0X00F 0X0001", "START:"]);
        assert_eq!(err.as_value(), &Error::ReservedDataAddress(0x00F));
        assert_eq!(err.line(), Some(1));

        let program = verify(&[".DATA 0X010 0X0001", "START:"]).unwrap();
        assert_eq!(program.metadata.first_data_addr(), Some(0x010));
        assert_eq!(program.metadata.data_range(), Some(0x010..MEMORY_WORDS));
    }

    #[test]
    fn first_data_is_lowest_address() {
        let program =
            verify(&[".DATA 0X100 0X0001", ".DATA 0X020 0X0002", "START:", "HLT"]).unwrap();
        assert_eq!(program.metadata.first_data_addr(), Some(0x020));
        assert_eq!(program.metadata.data_words(), 2);
        assert_eq!(program.metadata.program_end(), 0x020);
    }

    #[test]
    fn program_overlapping_data() {
        let mut lines = vec![".DATA 0X010 0X0001".to_owned(), "START:".to_owned()];
        lines.extend((0..16).map(|_| "CLA".to_owned()));
        assert!(verify(&lines).is_ok());

        lines.push("JMP START".to_owned());
        let err = verify(&lines).unwrap_err();
        assert_eq!(
            err.as_value(),
            &Error::ProgramOverlapsData {
                words: 17,
                first_data: 0x010
            }
        );
    }

    #[test]
    fn program_too_large() {
        let mut lines: Vec<String> = (0..MEMORY_WORDS).map(|_| "INC".to_owned()).collect();
        assert_eq!(verify(&lines).unwrap().metadata.program_words(), MEMORY_WORDS);

        lines.push("HLT".to_owned());
        let err = verify(&lines).unwrap_err();
        assert_eq!(err.as_value(), &Error::ProgramTooLarge(MEMORY_WORDS + 1));
        assert_eq!(err.line(), None);
    }
}
