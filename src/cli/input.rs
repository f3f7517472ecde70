//! `validate` and `sanitize` commands

use crate::validation::{sanitize, validate_input};
use std::process::ExitCode;
use tracing::debug;

/// Print the trimmed input, or the rejection message on stderr
pub fn run_validate(input: &str, max_length: usize, allow_html: bool) -> ExitCode {
    debug!(
        "Validating {} characters (max_length={}, allow_html={})",
        input.chars().count(),
        max_length,
        allow_html
    );

    match validate_input(Some(input), max_length, allow_html) {
        Ok(safe) => {
            println!("{}", safe);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

pub fn run_sanitize(input: &str) -> ExitCode {
    println!("{}", sanitize(input));
    ExitCode::SUCCESS
}
