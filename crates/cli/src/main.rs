use std::process::ExitCode;

fn main() -> ExitCode {
    shopmatch_cli::run()
}
