//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

#[expect(clippy::print_stderr, reason = "failures are reported on stderr")]
fn main() {
    if let Err(err) = lastmile_cli::run() {
        eprintln!("lastmile: {err}");
        std::process::exit(1);
    }
}
