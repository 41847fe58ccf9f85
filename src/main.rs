use clap::Parser;
use titan::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
