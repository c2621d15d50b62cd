pub mod image;
pub mod output;
pub mod phases;

pub use image::Image;
pub use output::{DecodeError, OutputFormat};
pub use phases::types::{LineType, Loc, Located};
pub use phases::verify::{ErrorKind, ProgramMetadata};

/// A verification failure, located at the offending source line where there is one.
pub type Error = Located<phases::verify::Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub image: Image,
    pub metadata: ProgramMetadata,
}

/// Verifies already-normalized lines, without generating any code.
pub fn verify_lines<S: AsRef<str>>(lines: &[S]) -> Result<ProgramMetadata, Error> {
    Ok(phases::verify(lines)?.metadata)
}

pub fn assemble_lines<S: AsRef<str>>(lines: &[S]) -> Result<Assembly, Error> {
    let program = phases::verify(lines)?;
    let labels = phases::resolve(&program.statements);
    let image = phases::generate(&program, &labels);

    Ok(Assembly {
        image,
        metadata: program.metadata,
    })
}

pub fn assemble(source: &str) -> Result<Assembly, Error> {
    assemble_lines(&phases::normalize(source))
}

pub fn verify_source(source: &str) -> Result<ProgramMetadata, Error> {
    verify_lines(&phases::normalize(source))
}
