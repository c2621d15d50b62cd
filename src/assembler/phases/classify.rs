use super::types::{LineType, Operand, Statement, START_LABEL};
use crate::spec::{
    isa::{InstructionSet, JUMP_MNEMONIC},
    types::hw::{Addr, Word, ADDR_MAX},
};
use std::fmt::Display;

const LABEL_CHAR: char = ':';
const DATA_DIRECTIVE: &str = ".DATA";

const HEX_PREFIX: &str = "0X";
const HEX_SUFFIX: &str = "H";

const INDIRECT_OPEN: &str = "[";
const INDIRECT_CLOSE: &str = "]";

const DATA_ADDR_DIGITS: usize = 3;
const DATA_VALUE_DIGITS: usize = 4;

// Why a line could not be classified. Every one of these makes the line a `SyntaxError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    MalformedLabel(String, &'static str),
    MalformedLiteral(String, &'static str),
    MalformedDataDeclaration(&'static str),
    UnknownMnemonic(String),
    BadOperandCount(&'static str, usize),
    OperandOutOfRange(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedLabel(label, msg) => write!(f, "Malformed label '{}': {}", label, msg),
            Error::MalformedLiteral(lit, msg) => {
                write!(f, "Malformed hex literal '{}': {}", lit, msg)
            }
            Error::MalformedDataDeclaration(msg) => {
                write!(f, "Malformed data declaration: {}", msg)
            }
            Error::UnknownMnemonic(name) => write!(f, "Unknown instruction '{}'", name),
            Error::BadOperandCount(name, given) => write!(
                f,
                "Instruction '{}' given {} operand(s), it expects {}",
                name,
                given,
                if InstructionSet::get()
                    .lookup(name)
                    .map_or(false, |spec| spec.has_operand)
                {
                    1
                } else {
                    0
                }
            ),
            Error::OperandOutOfRange(lit) => write!(
                f,
                "Operand '{}' does not fit the address space (max {:#05X})",
                lit, ADDR_MAX
            ),
        }
    }
}

pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Maps the tokens of one normalized line to its `LineType`. Total: a line which cannot
/// be parsed is a `SyntaxError`.
pub fn classify(tokens: &[&str]) -> LineType {
    Statement::parse(tokens)
        .map(|stmt| stmt.line_type())
        .unwrap_or(LineType::SyntaxError)
}

/// The digit run of a hex literal, which is marked by exactly one of the `0X` prefix or
/// the `H` suffix.
fn hex_digits(raw: &str) -> Result<&str, Error> {
    let digits = match (raw.starts_with(HEX_PREFIX), raw.ends_with(HEX_SUFFIX)) {
        (true, false) => &raw[HEX_PREFIX.len()..],
        (false, true) => &raw[..raw.len() - HEX_SUFFIX.len()],
        (true, true) => {
            return Err(Error::MalformedLiteral(
                raw.to_owned(),
                "use either the '0X' prefix or the 'H' suffix, not both",
            ))
        }
        (false, false) => {
            return Err(Error::MalformedLiteral(
                raw.to_owned(),
                "expected a '0X' prefix or an 'H' suffix",
            ))
        }
    };

    if digits.is_empty() {
        return Err(Error::MalformedLiteral(raw.to_owned(), "no digits"));
    }

    if !digits
        .chars()
        .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    {
        return Err(Error::MalformedLiteral(
            raw.to_owned(),
            "digits must be in [0-9A-F]",
        ));
    }

    Ok(digits)
}

fn parse_hex(raw: &str) -> Result<u32, Error> {
    u32::from_str_radix(hex_digits(raw)?, 16)
        .map_err(|_| Error::MalformedLiteral(raw.to_owned(), "value too large"))
}

// Fixed-width literals, as used by data declarations.
fn parse_hex_exact(raw: &str, digits: usize, msg: &'static str) -> Result<Word, Error> {
    let run = hex_digits(raw)?;
    if run.len() != digits {
        return Err(Error::MalformedLiteral(raw.to_owned(), msg));
    }

    u16::from_str_radix(run, 16)
        .map_err(|_| Error::MalformedLiteral(raw.to_owned(), "value too large"))
}

fn parse_address(raw: &str) -> Result<Addr, Error> {
    let val = parse_hex(raw)?;
    if val > u32::from(ADDR_MAX) {
        return Err(Error::OperandOutOfRange(raw.to_owned()));
    }
    Ok(val as Addr)
}

fn parse_operand(raw: &str) -> Result<Operand, Error> {
    if raw.starts_with(INDIRECT_OPEN) && raw.ends_with(INDIRECT_CLOSE) && raw.len() >= 2 {
        let inner = &raw[INDIRECT_OPEN.len()..raw.len() - INDIRECT_CLOSE.len()];
        Ok(Operand::Indirect(parse_address(inner)?))
    } else {
        Ok(Operand::Direct(parse_address(raw)?))
    }
}

impl Statement {
    pub fn parse_line(line: &str) -> Result<Statement, Error> {
        Statement::parse(&tokenize(line))
    }

    pub fn parse(tokens: &[&str]) -> Result<Statement, Error> {
        let first = match tokens.first() {
            None => return Ok(Statement::Empty),
            Some(first) => *first,
        };

        if let Some(colon) = first.find(LABEL_CHAR) {
            return Statement::parse_label_def(first, colon, tokens.len());
        }

        if first == DATA_DIRECTIVE {
            return Statement::parse_data(&tokens[1..]);
        }

        Statement::parse_inst(first, &tokens[1..])
    }

    fn parse_label_def(first: &str, colon: usize, token_count: usize) -> Result<Statement, Error> {
        let (name, rest) = (&first[..colon], &first[colon + LABEL_CHAR.len_utf8()..]);

        if !rest.is_empty() || token_count > 1 {
            return Err(Error::MalformedLabel(
                first.to_owned(),
                "a label definition must be alone on its line",
            ));
        }

        if name.is_empty() {
            return Err(Error::MalformedLabel(
                first.to_owned(),
                "label names must have nonzero length",
            ));
        }

        if InstructionSet::get().contains(name) {
            return Err(Error::MalformedLabel(
                first.to_owned(),
                "label name collides with an instruction name",
            ));
        }

        if name == START_LABEL {
            Ok(Statement::ProgramStart)
        } else {
            Ok(Statement::LabelDef(name.to_owned()))
        }
    }

    fn parse_data(args: &[&str]) -> Result<Statement, Error> {
        match args {
            [addr, value] => Ok(Statement::Data(
                parse_hex_exact(addr, DATA_ADDR_DIGITS, "data addresses have exactly 3 digits")?,
                parse_hex_exact(value, DATA_VALUE_DIGITS, "data values have exactly 4 digits")?,
            )),
            _ => Err(Error::MalformedDataDeclaration(
                "expected '.DATA <address> <value>'",
            )),
        }
    }

    fn parse_inst(name: &str, args: &[&str]) -> Result<Statement, Error> {
        let spec = InstructionSet::get()
            .lookup(name)
            .ok_or_else(|| Error::UnknownMnemonic(name.to_owned()))?;

        match (spec.has_operand, args) {
            (false, []) => Ok(Statement::Inst(spec.name, Operand::None)),
            (true, [label]) if spec.name == JUMP_MNEMONIC => {
                Ok(Statement::Jump((*label).to_owned()))
            }
            (true, [operand]) => Ok(Statement::Inst(spec.name, parse_operand(operand)?)),
            _ => Err(Error::BadOperandCount(spec.name, args.len())),
        }
    }
}
