use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pomotick", version, about = "Pomodoro interval tracker")]
struct Cli {
    /// Override the pomodoro length (minutes)
    #[arg(long, global = true)]
    pomodoro: Option<u64>,
    /// Override the short break length (minutes)
    #[arg(long, global = true)]
    short_break: Option<u64>,
    /// Override the long break length (minutes)
    #[arg(long, global = true)]
    long_break: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or resume the current interval and tick until it ends
    Start,
    /// Pause the running interval
    Pause,
    /// Print the current interval as JSON
    Status,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("POMOTICK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let overrides = commands::interval::Overrides {
        pomodoro_min: cli.pomodoro,
        short_break_min: cli.short_break,
        long_break_min: cli.long_break,
    };
    let result = match cli.command {
        Commands::Start => commands::interval::start(&overrides),
        Commands::Pause => commands::interval::pause(&overrides),
        Commands::Status => commands::interval::status(&overrides),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
