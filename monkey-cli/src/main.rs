use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    monkey_cli::run()
}
