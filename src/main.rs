use anyhow::Result;
use clap::{Parser, Subcommand};
use lunchline::config::Config;
use lunchline_menu::ReportMode;
use time::Date;

mod cli;

/// lunchline - School cafeteria menu notifier
#[derive(Parser)]
#[command(name = "lunchline")]
#[command(about = "Emails upcoming school cafeteria menus", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Treat this run as a test run (overrides TEST_RUN)
    #[arg(long, global = true)]
    test_run: bool,

    /// Use this date as today (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = cli::parse_iso_date)]
    today: Option<Date>,

    /// Print the report instead of emailing it
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send tomorrow's menu (today's on a test run)
    Daily,
    /// Send next week's menu (rest of this week on a test run)
    Weekly,
    /// Fetch a single menu and print a summary
    Probe {
        /// Serving date (MM/DD/YYYY), defaults to today
        #[arg(long, value_parser = cli::parse_serving_date)]
        date: Option<Date>,

        /// Grade (overrides config)
        #[arg(long)]
        grade: Option<String>,

        /// Serving line (overrides config)
        #[arg(long)]
        line: Option<String>,
    },
    /// Validate and print the effective configuration
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.clone())?;
    if cli.test_run {
        config.test_run = true;
    }

    lunchline::observability::init_observability(
        "lunchline",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;
    config.log_summary();

    match cli.command {
        Commands::Daily => {
            cli::run::notify(config, ReportMode::Daily, cli.today, cli.dry_run).await
        }
        Commands::Weekly => {
            cli::run::notify(config, ReportMode::Weekly, cli.today, cli.dry_run).await
        }
        Commands::Probe { date, grade, line } => {
            let date = date.or(cli.today);
            cli::probe::probe(config, date, grade, line).await
        }
        Commands::CheckConfig => cli::check::check_config(&config),
    }
}
