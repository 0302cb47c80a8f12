use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "quitplan-cli", version, about = "Quitplan CLI")]
pub struct Cli {
    /// User the command acts for
    #[arg(long, global = true, default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Smoking baseline
    Baseline {
        #[command(subcommand)]
        action: commands::baseline::BaselineAction,
    },
    /// Quit plan management
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Daily progress log
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Cigarettes, money and time saved on the active plan
    Savings,
    /// Today's target on the active plan
    Status {
        /// Date to report on (YYYY-MM-DD, defaults to today)
        #[arg(long, value_parser = commands::parse_date)]
        date: Option<chrono::NaiveDate>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completion scripts
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    logging::init_tracing();

    let cli = Cli::parse();
    let user = cli.user;
    tracing::debug!(user = %user, "dispatching command");
    let result = match cli.command {
        Commands::Baseline { action } => commands::baseline::run(&user, action),
        Commands::Plan { action } => commands::plan::run(&user, action),
        Commands::Progress { action } => commands::progress::run(&user, action),
        Commands::Savings => commands::savings::run(&user),
        Commands::Status { date } => commands::status::run(&user, date),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
