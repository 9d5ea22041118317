use clap::Parser;
use spotscout::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
