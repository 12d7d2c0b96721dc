pub mod fga;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle FGA containers
    Fga {
        #[command(subcommand)]
        command: fga::FgaCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Fga { command } => command.handle(),
        }
    }
}
