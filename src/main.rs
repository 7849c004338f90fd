//! olm CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`, then maps the
//! outcome to an exit status:
//! - 0: lint passed, or the command succeeded
//! - 2: lint completed and found violations
//! - 1: any error (printed to stderr)

use olm::cli;

fn main() {
    match cli::run() {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
