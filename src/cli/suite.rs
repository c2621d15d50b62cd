use crate::assembler::ProgramMetadata;
use crate::assets;
use ansi_term::Color::{Green, Red};
use anyhow::{bail, Context};
use derive_more::Constructor;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

#[derive(Constructor)]
struct UnitSrc {
    name: OsString,
    src: PathBuf,
}

impl UnitSrc {
    fn verify(&self) -> Result<ProgramMetadata, anyhow::Error> {
        super::command::verify_path(&self.src)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct SuiteSummary {
    pub passes: usize,
    pub total: usize,
}

impl SuiteSummary {
    pub fn success(&self) -> bool {
        self.passes == self.total
    }
}

/// Verifies every program of the suite `suite_name` under `suite_root_dir` (or only the one
/// named `only_this`), printing a line per program.
pub fn run_suite(
    suite_name: &OsStr,
    suite_root_dir: &Path,
    only_this: Option<&OsString>,
) -> Result<SuiteSummary, anyhow::Error> {
    let suite_dir = suite_root_dir.join(suite_name);
    let all_units = find_units(&suite_dir)?;
    let selected_units = select_units(all_units, only_this, &suite_dir)?;

    Ok(run_units(&suite_name.to_string_lossy(), &selected_units))
}

fn select_units(
    all_units: Vec<UnitSrc>,
    only_this: Option<&OsString>,
    suite_dir: &Path,
) -> Result<Vec<UnitSrc>, anyhow::Error> {
    let mut selected_units = match only_this {
        None => all_units,
        Some(only_this) => match all_units.into_iter().find(|unit| &unit.name == only_this) {
            Some(unit) => vec![unit],
            None => bail!(
                "No program named '{}' in '{}'",
                only_this.to_string_lossy(),
                suite_dir.display()
            ),
        },
    };

    if selected_units.is_empty() {
        bail!("No programs found in '{}'", suite_dir.display());
    }

    selected_units.sort_unstable_by(|unit1, unit2| unit1.name.cmp(&unit2.name));
    Ok(selected_units)
}

fn find_file_unit(path: &Path) -> Option<UnitSrc> {
    if !path
        .extension()
        .map_or(false, |ext| ext == assets::DEFAULT_SOURCE_EXT)
    {
        return None;
    }

    Some(UnitSrc::new(path.file_stem()?.to_owned(), path.to_owned()))
}

fn find_units(suite_dir: &Path) -> Result<Vec<UnitSrc>, anyhow::Error> {
    let mut units = Vec::new();

    let entries = suite_dir
        .read_dir()
        .with_context(|| format!("Could not read suite directory '{}'", suite_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            units.extend(find_file_unit(&entry.path()));
        }
    }

    Ok(units)
}

fn run_units(name: &str, units: &[UnitSrc]) -> SuiteSummary {
    let name_pad = units.iter().map(|unit| unit.name.len()).max().unwrap_or(0);

    println!("Running suite: '{}' ({} programs)", name, units.len());
    println!("{:-<line_len$}", "", line_len = name_pad + 45);

    let passes = units
        .iter()
        .enumerate()
        .filter(|(num, unit)| run_unit(unit, num + 1, name_pad))
        .count();
    let summary = SuiteSummary::new(passes, units.len());

    println!("{:-<line_len$}", "", line_len = name_pad + 45);
    println!(
        "Suite Result: {}, {}/{} passes",
        if summary.success() {
            Green.bold().paint("SUCCESS")
        } else {
            Red.bold().paint("FAILED")
        },
        summary.passes,
        summary.total
    );

    summary
}

fn run_unit(src: &UnitSrc, num: usize, name_pad: usize) -> bool {
    let (success, msg) = match src.verify() {
        Err(err) => (
            false,
            format!(
                "{}:\n\t{}",
                Red.bold().paint("FAIL"),
                format!("{:#}", err).replace("\n", "\n\t")
            ),
        ),
        Ok(metadata) => (
            true,
            format!(
                "{} {: >4} program words {: >4} data words ({: >5.1}%)",
                Green.bold().paint("PASS"),
                metadata.program_words(),
                metadata.data_words(),
                metadata.usage() * 100.0
            ),
        ),
    };

    println!(
        "{: >3}. {: <name_pad$}  {}",
        num,
        src.name.to_string_lossy(),
        msg,
        name_pad = name_pad
    );

    success
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_source_files_are_units() {
        assert!(find_file_unit(Path::new("asm/test/loop.bpasm")).is_some());
        assert!(find_file_unit(Path::new("asm/test/loop.data")).is_none());
        assert!(find_file_unit(Path::new("asm/test/README")).is_none());
    }

    #[test]
    fn empty_selection_is_an_error() {
        let dir = Path::new("asm/empty");
        assert!(select_units(Vec::new(), None, dir).is_err());
        assert!(select_units(Vec::new(), Some(&OsString::from("halt")), dir).is_err());

        let units = vec![
            UnitSrc::new(OsString::from("b"), PathBuf::from("b.bpasm")),
            UnitSrc::new(OsString::from("a"), PathBuf::from("a.bpasm")),
        ];
        let selected = select_units(units, None, dir).unwrap();
        let names: Vec<_> = selected.iter().map(|unit| unit.name.clone()).collect();
        assert_eq!(names, vec![OsString::from("a"), OsString::from("b")]);
    }
}
