use std::process::ExitCode;

fn main() -> ExitCode {
    samalook_cli::run()
}
