mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "botctl",
    version,
    about = "Start, stop, and check on a background bot process"
)]
struct Cli {
    /// Config file [default: ./botctl.toml, then ~/.config/botctl/config.toml]
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a commented botctl.toml to the current directory
    Init {
        /// Overwrite an existing botctl.toml
        #[arg(long)]
        force: bool,
    },
    /// Launch the bot in the background and record its PID
    Start,
    /// Show whether the recorded bot process is running
    Status {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send SIGTERM to the recorded bot process and remove the PID file
    Stop,
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => commands::init::execute(force),
        Commands::Start => commands::start::execute(config),
        Commands::Status { json } => commands::status::execute(config, json),
        Commands::Stop => commands::stop::execute(config),
    }
}
