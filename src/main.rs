use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use partyvote::{cli, config, config::StoreLocation, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API
    Serve,

    /// Show or delete a stored host
    Host(HostOptions),

    /// Show or clear the party queue of a host
    Party(PartyOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct HostOptions {
    /// Host id (the Spotify user id)
    pub id: String,

    /// Delete the host instead of showing it
    #[clap(long)]
    pub delete: bool,

    /// Delete even if a server lock is present
    #[clap(long, requires = "delete")]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PartyOptions {
    /// Host id owning the party
    pub host_id: String,

    /// Unset the active party, keeping the host
    #[clap(long)]
    pub clear: bool,

    /// Clear even if a server lock is present
    #[clap(long, requires = "clear")]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve().await,
        Command::Host(opt) => {
            cli::host(&StoreLocation::from_env(), &opt.id, opt.delete, opt.force).await
        }
        Command::Party(opt) => {
            cli::party(&StoreLocation::from_env(), &opt.host_id, opt.clear, opt.force).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
