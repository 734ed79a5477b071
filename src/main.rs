// src/main.rs
use clap::Parser;
use filing_context::assistant::{self, DEFAULT_PERSONA};
use filing_context::edgar::TickerSymbol;
use filing_context::utils::{self, AppError};
use filing_context::{
    EdgarClient, FilingContext, FilingPipeline, LocatorOrdering, PipelineConfig, ReduceMode,
};
use std::sync::Arc;

/// Fetch a company's latest 10-K from SEC EDGAR and reduce it to assistant context
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol of the company
    #[arg(short, long)]
    ticker: String,

    /// Reduction mode: "text" strips all markup, "tables" keeps bare table tags
    #[arg(short, long)]
    mode: Option<ReduceMode>,

    /// Rank annual filings by filing date instead of trusting append order
    #[arg(long)]
    chronological: bool,

    /// Print the assistant prompt for this question instead of the bare filing text
    #[arg(short, long)]
    question: Option<String>,

    /// Maximum filing characters placed in the prompt
    #[arg(long)]
    max_context_chars: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments; they override the environment
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    let mut config = PipelineConfig::from_env()?;
    if let Some(mode) = args.mode {
        config.reduce_mode = mode;
    }
    if args.chronological {
        config.ordering = LocatorOrdering::Chronological;
    }
    if let Some(chars) = args.max_context_chars {
        config.context_char_budget = chars;
    }
    tracing::debug!("Effective configuration: {:?}", config);

    // 3. Run the pipeline once for the requested ticker
    let client = EdgarClient::new(&config)?;
    let pipeline = FilingPipeline::new(Arc::new(client), config);
    let context = pipeline.get_reduced_filing_text(&args.ticker).await;

    match &context {
        FilingContext::Found(text) => {
            tracing::info!("Filing context ready ({} bytes)", text.as_str().len())
        }
        FilingContext::NotFound(stage) => {
            tracing::warn!("No filing context for {}: nothing found at {} stage", args.ticker, stage)
        }
        FilingContext::Superseded => {
            return Err(AppError::Processing("Filing run was superseded".to_string()));
        }
    }

    // 4. Print the composed prompt or the bare filing text
    match &args.question {
        Some(question) => {
            let prompt = assistant::compose_prompt(
                DEFAULT_PERSONA,
                &TickerSymbol::new(&args.ticker),
                context.text(),
                question,
                pipeline.config().context_char_budget,
            );
            println!("{}", prompt);
        }
        None if context.is_found() => println!("{}", context.text()),
        None => {}
    }

    Ok(())
}
