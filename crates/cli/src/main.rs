use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use cli::report;
use ledger_core::config;
use ledger_core::config::AppConfig;
use ledger_core::filename::parse_contract_filename;
use ledger_core::pipeline;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file_name, json } => run_parse(&file_name, json),
        Commands::Sync { json } => {
            let cfg = config::load(cli.config.as_deref())?;
            run_sync(cfg, json).await
        }
        Commands::Remind { today, json } => {
            let cfg = config::load(cli.config.as_deref())?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            run_remind(cfg, today, json).await
        }
    }
}

#[derive(Parser)]
#[command(name = "contract-ledger")]
#[command(about = "Contract PDF bookkeeping and overdue reminders", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record new contract PDFs from the watched folder in the sheet
    Sync {
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Mail a digest of overdue, underpaid contracts and flag them
    Remind {
        /// Date to evaluate against (YYYY-MM-DD); defaults to the local date
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Parse a contract filename without touching any service
    Parse {
        file_name: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn run_parse(file_name: &str, json: bool) -> Result<()> {
    let record = parse_contract_filename(file_name)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        for line in report::record_lines(&record) {
            println!("{line}");
        }
    }
    Ok(())
}

async fn run_sync(cfg: AppConfig, json: bool) -> Result<()> {
    let summary = pipeline::run_sync(&cfg).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report::sync_json(&summary))?);
    } else {
        for line in report::sync_lines(&summary) {
            println!("{line}");
        }
    }
    Ok(())
}

async fn run_remind(cfg: AppConfig, today: NaiveDate, json: bool) -> Result<()> {
    tracing::debug!(%today, "evaluating reminders");
    let summary = pipeline::run_reminders(&cfg, today).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report::reminder_json(&summary))?);
    } else {
        for line in report::reminder_lines(&summary) {
            println!("{line}");
        }
    }
    Ok(())
}
