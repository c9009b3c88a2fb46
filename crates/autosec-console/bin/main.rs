use clap::{Parser, Subcommand};
use eyre::Result;

mod cmd;

use cmd::console::ConsoleArgs;
use cmd::tail::TailArgs;

#[derive(Debug, Parser)]
#[command(
    name = "autosec-console",
    version,
    about = "Terminal console for vehicle security monitoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive dashboard and IDS panel
    Console(ConsoleArgs),
    /// Print the decoded inbound event stream
    Tail(TailArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Console(args) => args.run(),
        Commands::Tail(args) => args.run(),
    }
}
