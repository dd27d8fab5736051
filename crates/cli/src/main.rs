use std::process::ExitCode;

fn main() -> ExitCode {
    renoprop_cli::run()
}
