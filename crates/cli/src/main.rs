use std::process::ExitCode;

fn main() -> ExitCode {
    atelier_cli::run()
}
