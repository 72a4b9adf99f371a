//! shahada - render Arabic certificates from the command line

use std::process::ExitCode;

use clap::Parser;
use shahada_cli::cli::{Cli, Commands};
use shahada_cli::commands::{batch, interactive, render};

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Render(args) => render::run(args),
        Commands::Batch(args) => batch::run(args),
        Commands::Interactive(args) => interactive::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}
