use std::process::ExitCode;

fn main() -> ExitCode {
    memebot_cli::run()
}
