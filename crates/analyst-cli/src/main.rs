//! Command-line interface for the stock analysis pipeline

mod report;

use analyst_core::AnalysisType;
use analyst_llm::{OpenAIConfig, OpenAIProvider};
use analyst_market::{
    ChartStage, FundamentalsStage, LlmNarrativeGenerator, MarketConfig, NarrativeStage,
    NewsApiProvider, NewsStage, PriceChartRenderer, YahooFinanceClient,
};
use analyst_pipeline::{BatchRunner, Pipeline, TickerOutcome, normalize_tickers};
use clap::Parser;
use std::env;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// OpenAI-compatible endpoint used when `OPENAI_API_BASE` is not set.
/// Points at a local Ollama server so the tool works without an account.
const DEFAULT_API_BASE: &str = "http://localhost:11434/v1";
const DEFAULT_API_KEY: &str = "not-needed";
const DEFAULT_MODEL: &str = "llama3.1";

#[derive(Parser, Debug)]
#[command(name = "analyst")]
#[command(about = "Stock analysis pipeline: fundamentals, price chart, pros and cons, news", long_about = None)]
struct Args {
    /// Ticker symbol to analyze
    ticker: Option<String>,

    /// Comma-separated ticker symbols (e.g. "AAPL,MSFT,GOOG")
    #[arg(short = 't', long = "ticker", value_name = "TICKERS")]
    tickers: Option<String>,

    /// Analysis perspective: growth, value, general, dividend, or momentum
    #[arg(short = 'y', long = "type", value_name = "TYPE", default_value = "growth")]
    analysis_type: AnalysisType,

    /// Extra instruction appended to the analysis prompt
    #[arg(
        short = 'p',
        long,
        default_value = "Focus on long-term investment potential."
    )]
    prompt: String,

    /// Print a short per-ticker summary instead of the full report
    #[arg(short = 's', long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    let config = MarketConfig::new().with_env_news_key();
    config.validate()?;
    debug!(
        charts_dir = %config.charts_dir.display(),
        news_key = config.news_api_key.is_some(),
        "loaded configuration"
    );

    let tickers = collect_tickers(args.ticker.as_deref(), args.tickers.as_deref());

    println!(
        "Running stock analysis for {} ticker(s): {}",
        tickers.len(),
        tickers.join(", ")
    );
    println!("Analysis type: {}", args.analysis_type);
    println!("Custom prompt: {}", args.prompt);

    let pipeline = build_pipeline(&config)?;
    let runner = BatchRunner::new(pipeline);
    let batch = runner.run(&tickers, args.analysis_type, &args.prompt).await;

    for outcome in batch.outcomes() {
        match outcome {
            TickerOutcome::Completed(state) => {
                if args.summary {
                    println!("{}", report::summary_report(state));
                } else {
                    println!("{}", report::verbose_report(state));
                }
            }
            TickerOutcome::Failed(failure) => {
                println!("Error analyzing {}: {}", failure.ticker, failure.error);
            }
        }
    }

    let summary = batch.summary();
    println!(
        "\nAnalysis complete for {}/{} stocks!",
        summary.succeeded, summary.attempted
    );
    if summary.succeeded > 0 {
        println!(
            "Charts saved to the '{}' directory.",
            config.charts_dir.display()
        );
    }

    Ok(())
}

/// Initialize tracing subscriber with default configuration
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Merge the positional ticker with the `--ticker` list, then normalize
fn collect_tickers(positional: Option<&str>, list: Option<&str>) -> Vec<String> {
    let mut raw: Vec<String> = Vec::new();
    if let Some(ticker) = positional {
        raw.push(ticker.to_string());
    }
    if let Some(list) = list {
        raw.extend(list.split(',').map(str::to_string));
    }
    normalize_tickers(raw)
}

/// Assemble the four-stage analysis pipeline from the environment
fn build_pipeline(config: &MarketConfig) -> anyhow::Result<Pipeline> {
    let yahoo = Arc::new(YahooFinanceClient::new(config.request_timeout)?);

    let api_base = env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
    let api_key = env::var("OPENAI_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string());
    let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    let llm = Arc::new(OpenAIProvider::with_config(
        OpenAIConfig::new(api_key).with_api_base(api_base),
    )?);

    let pipeline = Pipeline::builder()
        .add_stage(Arc::new(FundamentalsStage::new(yahoo.clone())))
        .add_stage(Arc::new(ChartStage::new(
            Arc::new(PriceChartRenderer::new(yahoo, config.chart_history_days)),
            config.charts_dir.clone(),
        )))
        .add_stage(Arc::new(NarrativeStage::new(Arc::new(
            LlmNarrativeGenerator::new(llm, model),
        ))))
        .add_stage(Arc::new(NewsStage::new(Arc::new(NewsApiProvider::new(
            config.news_api_key.clone(),
            config.news_limit,
        )))))
        .build()?;

    Ok(pipeline)
}
