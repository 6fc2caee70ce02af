use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotalyze::{
    cli, config, error,
    types::{AuthState, TimeWindow},
    utils,
};
use tokio::sync::Mutex;

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
    /// Authorize with Spotify API
    Auth,

    /// Show your top tracks with their genres
    Tracks(SelectionOptions),

    /// Show listening statistics for a time range or across all of them
    Stats(StatsOptions),

    /// Compare the genres of the time ranges
    Similarity(LimitOptions),

    /// Show the listening personality of a time range
    Profile(ProfileOptions),

    /// Serve the interactive dashboard
    Dashboard,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct LimitOptions {
    /// Number of top tracks to fetch per time range (1-50)
    #[clap(long, default_value_t = utils::MAX_LIMIT)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct SelectionOptions {
    /// Time range to analyze (short, medium, long)
    #[clap(long, value_parser = utils::parse_time_window)]
    pub window: Option<TimeWindow>,

    /// Analyze all time ranges side by side
    #[clap(long)]
    pub evolution: bool,

    #[clap(flatten)]
    pub limit: LimitOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct StatsOptions {
    #[clap(flatten)]
    pub selection: SelectionOptions,

    /// Number of top genres to show (5-20)
    #[clap(long, default_value_t = utils::DEFAULT_TOP_N, value_parser = utils::parse_top_n)]
    pub top_n: usize,

    /// Print Vega-Lite chart specs instead of tables
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ProfileOptions {
    /// Time range to profile (short, medium, long)
    #[clap(long, value_parser = utils::parse_time_window)]
    pub window: TimeWindow,

    #[clap(flatten)]
    pub limit: LimitOptions,
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
        Command::Auth => {
            let auth_state: Arc<Mutex<Option<AuthState>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&auth_state)).await;
        }
        Command::Tracks(opt) => cli::tracks(opt.window, opt.evolution, opt.limit.limit).await,
        Command::Stats(opt) => {
            cli::stats(
                opt.selection.window,
                opt.selection.evolution,
                opt.top_n,
                opt.selection.limit.limit,
                opt.json,
            )
            .await
        }
        Command::Similarity(opt) => cli::similarity(opt.limit).await,
        Command::Profile(opt) => cli::profile(opt.window, opt.limit.limit).await,
        Command::Dashboard => cli::dashboard().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
