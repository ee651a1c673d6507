use cdsig::{
    cli::{self, commands::DescriptorCommands},
    error::Result,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Descriptor(DescriptorCommands),
}

fn main() -> Result<()> {
    // Initialize logging
    cdsig::init_logging()?;

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Descriptor(command) => cli::handle_descriptor_command(command),
    };

    if let Err(ref error) = result {
        eprintln!("{}", cli::format_error(error));
        std::process::exit(1);
    }
    result
}
