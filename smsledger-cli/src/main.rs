use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use smsledger_core::{RawMessage, TransactionDraft};
use smsledger_ingest::{JsonFileSource, MessageSource, SmsPipeline};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(name = "smsledger", version, about = "Turn bank and mobile-money SMS into transactions")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an exported inbox (JSON array of messages) into transactions
    Parse {
        /// Path to the exported inbox JSON
        #[arg(long)]
        input: PathBuf,

        /// Print drafts as pretty JSON instead of one line each
        #[arg(long)]
        json: bool,

        /// Override the USD → RWF conversion rate
        #[arg(long)]
        usd_rate: Option<f64>,

        /// Override the maximum number of messages read
        #[arg(long)]
        max_count: Option<usize>,
    },

    /// Show which messages the classifier accepts
    Classify {
        /// Path to the exported inbox JSON
        #[arg(long)]
        input: PathBuf,
    },

    /// Manage ~/.smsledger/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Command::Parse {
            input,
            json,
            usd_rate,
            max_count,
        } => parse(input, json, usd_rate, max_count).await?,

        Command::Classify { input } => classify(input).await?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

async fn parse(
    input: PathBuf,
    json: bool,
    usd_rate: Option<f64>,
    max_count: Option<usize>,
) -> Result<()> {
    if !input.exists() {
        bail!("Inbox export not found: {} (pass --input <path>)", input.display());
    }

    let mut cfg = config::load_config()?;
    if let Some(rate) = usd_rate {
        cfg.ingest = cfg.ingest.with_usd_rate(rate);
    }
    if let Some(n) = max_count {
        cfg.source.max_count = n;
    }

    let pipeline = SmsPipeline::new(cfg.ingest)
        .context("building sms pipeline")?
        .with_filter(cfg.source.filter());
    let source = JsonFileSource::new(&input);

    let txns = pipeline
        .parse_inbox(&source)
        .await
        .with_context(|| format!("parsing {}", input.display()))?;

    info!(count = txns.len(), input = %input.display(), "parsed transactions");

    if json {
        println!("{}", serde_json::to_string_pretty(&txns)?);
        return Ok(());
    }

    for t in &txns {
        println!("{}", summary_line(t));
    }

    let expenses = txns.iter().filter(|t| t.is_expense()).count();
    let income = txns.iter().filter(|t| t.is_income()).count();
    println!(
        "\nTransactions: {} (expenses: {}, income: {})",
        txns.len(),
        expenses,
        income
    );
    Ok(())
}

async fn classify(input: PathBuf) -> Result<()> {
    let cfg = config::load_config()?;
    let pipeline = SmsPipeline::new(cfg.ingest).context("building sms pipeline")?;
    let source = JsonFileSource::new(&input);

    let payload = source
        .list(&cfg.source.filter())
        .await
        .with_context(|| format!("reading {}", input.display()))?;
    let messages: Vec<RawMessage> =
        serde_json::from_str(&payload).with_context(|| format!("parsing {}", input.display()))?;

    for m in &messages {
        let verdict = if pipeline.is_transaction_message(m) {
            "accept"
        } else {
            "reject"
        };
        let institution = pipeline
            .config()
            .institution_for(&m.address)
            .map(|i| i.wallet_id())
            .unwrap_or("-");
        println!(
            "[{}] {:<12} {:<12} {}",
            verdict,
            m.address,
            institution,
            preview(&m.body, 60)
        );
    }
    Ok(())
}

fn summary_line(t: &TransactionDraft) -> String {
    format!(
        "{} [{:?}] {} | {} | balance={:.2} fee={:.2} | ref={}",
        t.id,
        t.kind,
        t.wallet_id,
        t.category.name,
        t.balance,
        t.fee,
        t.reference
    )
}

fn preview(body: &str, max_chars: usize) -> String {
    let flat = body.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{cut}…")
}
