use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use uibridge::{cli, config, error};

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
  bin_name="uib",
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the local agent server
    Serve,

    /// Show or reset the local agent token
    Token(TokenOptions),

    /// Check agent health and authenticated connectivity
    Status,

    /// Link a Spotify account via OAuth (opens the browser)
    Login,

    /// Search for a track and play it
    Play(PlayOptions),

    /// Pause playback
    Pause,

    /// Show the currently playing track
    Now,

    /// List available playback devices
    Devices,

    /// Manage the Spotify Client ID
    Config(ConfigOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct TokenOptions {
    /// Print the full token instead of the last four characters
    #[clap(long)]
    pub show: bool,

    /// Discard the current token and mint a new one
    #[clap(long)]
    pub reset: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOptions {
    /// Search query, e.g. `uib play daft punk around the world`
    #[clap(required = true)]
    pub query: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigOptions {
    /// Save the Spotify application Client ID
    #[clap(long)]
    pub set_client_id: Option<String>,

    /// Remove the saved Client ID
    #[clap(long)]
    pub clear: bool,
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
        Command::Token(opt) => cli::token(opt.show, opt.reset).await,
        Command::Status => cli::status().await,
        Command::Login => cli::login().await,
        Command::Play(opt) => cli::play(opt.query.join(" ")).await,
        Command::Pause => cli::pause().await,
        Command::Now => cli::now().await,
        Command::Devices => cli::devices().await,
        Command::Config(opt) => cli::client_config(opt.set_client_id, opt.clear).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
