use clap::Parser;
use quantops::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
