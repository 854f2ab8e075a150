use std::process::ExitCode;

fn main() -> ExitCode {
    closet_cli::run()
}
