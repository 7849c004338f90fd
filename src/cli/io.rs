//! Output handling for CLI
//!
//! Reports and listings go to stdout; logs go to stderr.

use std::fs;
use std::io::Write;
use std::path::Path;

use super::errors::{CliError, CliResult};

/// Write one line and flush
pub fn write_line<W: Write>(out: &mut W, line: &str) -> CliResult<()> {
    writeln!(out, "{}", line)?;
    out.flush()?;
    Ok(())
}

/// Write a linelist payload to `path`
pub fn write_file(path: &Path, bytes: &[u8]) -> CliResult<()> {
    fs::write(path, bytes)
        .map_err(|e| CliError::io_error(format!("cannot write {}: {}", path.display(), e)))
}
