//! docqa-eval CLI
//!
//! `extract` asks one document's fixed query set; `run` scores the selected
//! fixture suites against a provider.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docqa_eval::{
    metrics::METRICS, run_suites, Config, DocumentKind, OcrClient, Provider, Suite,
};
use std::path::PathBuf;
use tracing::{debug, info, warn, Instrument};

#[derive(Parser)]
#[command(name = "docqa-eval")]
#[command(about = "Evaluate document question answering across OCR/vision providers")]
struct Args {
    /// Configuration file (optional)
    #[arg(long, global = true, default_value = "docqa.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask the fixed query set for one document
    Extract {
        /// Document type: receipt, truckticket, vaccination, insurance, mortgage, paystub
        #[arg(short, long)]
        document: DocumentKind,

        /// Image to query (default: the fixture image for the document type)
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Provider: textract, openai or google
        #[arg(short, long, default_value = "textract")]
        provider: Provider,
    },

    /// Run fixture suites and print accuracy per suite
    Run {
        #[arg(long)]
        receipts: bool,

        #[arg(long)]
        truck_tickets: bool,

        #[arg(long)]
        vaccination: bool,

        #[arg(long)]
        mortgage: bool,

        #[arg(long)]
        insurance: bool,

        #[arg(long)]
        paystub: bool,

        /// Run every suite
        #[arg(long)]
        all: bool,

        /// Provider: openai, google or textract
        #[arg(short, long, default_value = "openai")]
        provider: Provider,

        /// Print Prometheus metrics after the run
        #[arg(long)]
        metrics: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docqa_eval=info".parse()?),
        )
        .init();

    let args = Args::parse();

    load_dotenv();

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    let span = tracing::info_span!("docqa", run_id = %uuid::Uuid::new_v4());
    async move {
        info!("Started at {}", chrono::Utc::now().to_rfc3339());
        match args.command {
            Command::Extract {
                document,
                image,
                provider,
            } => extract(config, document, image, provider).await,
            Command::Run {
                receipts,
                truck_tickets,
                vaccination,
                mortgage,
                insurance,
                paystub,
                all,
                provider,
                metrics,
            } => {
                let flags = [
                    (Suite::Receipts, receipts),
                    (Suite::TruckTickets, truck_tickets),
                    (Suite::Vaccination, vaccination),
                    (Suite::Mortgage, mortgage),
                    (Suite::Insurance, insurance),
                    (Suite::Paystub, paystub),
                ];
                let selected: Vec<Suite> = flags
                    .into_iter()
                    .filter(|(_, on)| all || *on)
                    .map(|(suite, _)| suite)
                    .collect();
                run(config, provider, selected, metrics).await
            }
        }
    }
    .instrument(span)
    .await
}

/// Load `.env` into the environment without overriding set variables.
///
/// Malformed lines are skipped so later keys still load.
fn load_dotenv() {
    let entries = match dotenvy::dotenv_iter() {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No .env loaded: {}", e);
            return;
        }
    };

    for entry in entries {
        match entry {
            Ok((key, value)) => {
                if std::env::var_os(&key).is_none() {
                    std::env::set_var(key, value);
                }
            }
            Err(e) => warn!("Skipping unparseable .env line: {}", e),
        }
    }
}

async fn extract(
    config: Config,
    document: DocumentKind,
    image: Option<PathBuf>,
    provider: Provider,
) -> Result<()> {
    let image = image.unwrap_or_else(|| config.data_dir.join(document.default_image()));
    let questions = document.queries();
    info!("Extracting {} from {} via {}", document, image.display(), provider);

    let client = OcrClient::new(config)?;
    let answers = client.ocr(provider, &image, &questions).await?;

    for (question, answer) in questions.iter().zip(&answers) {
        match (&answer.text, answer.confidence) {
            (Some(text), Some(confidence)) => {
                println!("{question}\n\tAnswer: {text}\n\tConfidence: {confidence}\n")
            }
            (Some(text), None) => println!("{question}\n\tAnswer: {text}\n"),
            (None, _) => println!("{question}\n\tNo Answer\n"),
        }
    }

    println!("Estimated cost: ${:.5}", METRICS.cost_for(provider.as_str()));
    Ok(())
}

async fn run(config: Config, provider: Provider, selected: Vec<Suite>, metrics: bool) -> Result<()> {
    if selected.is_empty() {
        warn!("No suites selected; pass --all or one of the suite flags");
        return Ok(());
    }

    let data_dir = config.data_dir.clone();
    let client = OcrClient::new(config)?;
    run_suites(&client, provider, &data_dir, &selected).await?;

    println!("Estimated total cost: ${:.5}", METRICS.cost_for(provider.as_str()));
    if metrics {
        print!("{}", METRICS.export_prometheus());
    }
    Ok(())
}
