use super::suite;
use crate::assembler::{self, Assembly, OutputFormat, ProgramMetadata};
use crate::{assets, spec::isa::InstructionSet};
use ansi_term::Color::{Green, Red, Yellow};
use anyhow::{anyhow, bail, Context};
use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[cfg(windows)]
pub fn terminal_init() {
    ansi_term::enable_ansi_support().expect("Could not enable terminal ANSI support");
    env_logger::init();
}

#[cfg(not(windows))]
pub fn terminal_init() {
    env_logger::init();
}

pub fn read_source(path: &Path) -> Result<String, anyhow::Error> {
    std::fs::read_to_string(path).with_context(|| format!("Could not read '{}'", path.display()))
}

fn located(err: assembler::Error) -> anyhow::Error {
    anyhow!("{} error {}", err.kind(), err)
}

pub fn assemble_path(path: &Path) -> Result<Assembly, anyhow::Error> {
    assembler::assemble(&read_source(path)?).map_err(located)
}

pub fn verify_path(path: &Path) -> Result<ProgramMetadata, anyhow::Error> {
    assembler::verify_source(&read_source(path)?).map_err(located)
}

#[derive(StructOpt, Debug)]
#[structopt(name = "bproc")]
pub enum CommandRoot {
    /// Verify a program and report its memory usage
    Check(SubcommandCheck),
    /// Assemble a program into a memory image
    Build(SubcommandBuild),
    /// Print the supported instruction set
    Isa,
    /// Verify every program in a suite directory
    Suite(SubcommandSuite),
}

#[derive(StructOpt, Debug)]
pub struct SubcommandCheck {
    #[structopt(name = "in.bpasm", parse(from_os_str))]
    in_src: PathBuf,
}

#[derive(StructOpt, Debug)]
pub struct SubcommandBuild {
    #[structopt(name = "in.bpasm", parse(from_os_str))]
    in_src: PathBuf,

    /// Write the image here instead of printing it
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Replace an existing output file without asking
    #[structopt(short = "w", long)]
    overwrite: bool,

    /// One of bin, hex, hexv3, vhdl, verilog
    #[structopt(short, long, default_value = "bin")]
    format: OutputFormat,
}

#[derive(StructOpt, Debug)]
#[structopt(name = "bpasm")]
pub struct SubcommandAsm {
    #[structopt(name = "in.bpasm", parse(from_os_str))]
    in_src: PathBuf,

    #[structopt(name = "out.data", parse(from_os_str))]
    out_image: Option<PathBuf>,
}

#[derive(StructOpt, Debug)]
pub struct SubcommandSuite {
    #[structopt(name = "suite_name", parse(from_os_str))]
    suite_name: OsString,

    #[structopt(name = "suite/root/dir", parse(from_os_str))]
    suite_root_dir: Option<PathBuf>,

    #[structopt(short, long, parse(from_os_str))]
    only: Option<OsString>,
}

pub fn root(cmd: CommandRoot) -> ! {
    exit_with(match cmd {
        CommandRoot::Check(scmd) => check(scmd),
        CommandRoot::Build(scmd) => build(scmd),
        CommandRoot::Isa => isa(),
        CommandRoot::Suite(scmd) => suite(scmd),
    })
}

pub fn asm(cmd: SubcommandAsm) -> ! {
    let SubcommandAsm { in_src, out_image } = cmd;
    let format = OutputFormat::default();
    let output = out_image.unwrap_or_else(|| in_src.with_extension(format.default_extension()));

    exit_with(build(SubcommandBuild {
        in_src,
        output: Some(output),
        overwrite: false,
        format,
    }))
}

fn exit_with(res: Result<(), anyhow::Error>) -> ! {
    match res {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("{}: {:#}", Red.bold().paint("ERROR"), err);
            std::process::exit(1);
        }
    }
}

fn check(cmd: SubcommandCheck) -> Result<(), anyhow::Error> {
    let metadata = verify_path(&cmd.in_src)?;

    println!("{}", metadata);
    println!("{}", Green.bold().paint("Syntax OK"));
    Ok(())
}

fn build(cmd: SubcommandBuild) -> Result<(), anyhow::Error> {
    let assembly = assemble_path(&cmd.in_src)?;
    let text = cmd.format.render_text(&assembly.image);

    let out_path = match cmd.output {
        None => {
            println!("{}", text);
            return Ok(());
        }
        Some(out) => resolve_output_path(&out, &cmd.in_src, cmd.format),
    };

    if out_path.exists() && !cmd.overwrite {
        let stdin = io::stdin();
        if !confirm_overwrite(&out_path, &mut stdin.lock(), &mut io::stdout())? {
            bail!("Not overwriting '{}'", out_path.display());
        }
    }

    std::fs::write(&out_path, text)
        .with_context(|| format!("Could not write '{}'", out_path.display()))?;

    println!("{}", assembly.metadata);
    println!(
        "{} '{}' ({})",
        Green.bold().paint("Wrote"),
        out_path.display(),
        cmd.format
    );
    Ok(())
}

fn isa() -> Result<(), anyhow::Error> {
    let header = format!(
        "| {: <6} | {: <7} | {: <8} | {: <3} | {}",
        "Name", "Opcode", "Class", "Op?", "Description"
    );

    println!("{}", header);
    println!("{:-<line_len$}", "", line_len = header.len() + 40);
    for spec in InstructionSet::get().iter() {
        println!("{}", spec);
    }
    Ok(())
}

fn suite(cmd: SubcommandSuite) -> Result<(), anyhow::Error> {
    let summary = suite::run_suite(
        &cmd.suite_name,
        &cmd.suite_root_dir.unwrap_or_else(assets::default_suite_dir),
        cmd.only.as_ref(),
    )?;

    if !summary.success() {
        bail!(
            "{}/{} programs of suite '{}' failed",
            summary.total - summary.passes,
            summary.total,
            cmd.suite_name.to_string_lossy()
        );
    }
    Ok(())
}

fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Where an image in `format` assembled from `in_src` is written when `out` is requested.
/// A directory receives `<source stem>.<ext>`, and a path without an extension gets the
/// default one for the format.
pub fn resolve_output_path(out: &Path, in_src: &Path, format: OutputFormat) -> PathBuf {
    let ext = format.default_extension();

    if out.is_dir() {
        let stem = in_src
            .file_stem()
            .map_or_else(|| PathBuf::from("out"), PathBuf::from);
        return out.join(with_appended_extension(&stem, ext));
    }

    if out.extension().is_none() {
        with_appended_extension(out, ext)
    } else {
        out.to_owned()
    }
}

/// Asks whether `path` may be replaced. Only an exact `Y` answer allows it.
pub fn confirm_overwrite<R: BufRead, W: Write>(
    path: &Path,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    write!(
        output,
        "{} '{}' already exists, overwrite it? (Y/n) ",
        Yellow.bold().paint("WARNING:"),
        path.display()
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim() == "Y")
}
