use bproc::{assets, cli::suite};
use std::ffi::OsString;

#[test]
fn sample_programs_verify() -> Result<(), anyhow::Error> {
    let summary = suite::run_suite(
        &OsString::from("test"),
        &assets::default_suite_dir(),
        None,
    )?;
    assert!(summary.total >= 4);
    assert!(summary.success());
    Ok(())
}

#[test]
fn broken_programs_fail() -> Result<(), anyhow::Error> {
    let summary = suite::run_suite(
        &OsString::from("invalid"),
        &assets::default_suite_dir(),
        None,
    )?;
    assert_eq!(summary.total, 2);
    assert_eq!(summary.passes, 0);
    assert!(!summary.success());
    Ok(())
}

#[test]
fn single_program() -> Result<(), anyhow::Error> {
    let root = assets::default_suite_dir();
    let invalid = OsString::from("invalid");

    let summary = suite::run_suite(&invalid, &root, Some(&OsString::from("late_data")))?;
    assert_eq!(summary, suite::SuiteSummary::new(0, 1));
    assert!(suite::run_suite(&invalid, &root, Some(&OsString::from("missing"))).is_err());
    Ok(())
}

#[test]
fn suite_root_is_not_a_suite() {
    // The root only holds suite directories, so it has no programs of its own.
    let root = assets::default_suite_dir();
    assert!(suite::run_suite(&OsString::from(""), &root, None).is_err());
    assert!(suite::run_suite(&OsString::from("nonexistent"), &root, None).is_err());
}
