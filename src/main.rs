use anyhow::Result;
use chess_vision::app::App;
use chess_vision::models::{AnalysisResult, Config, Provider};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "chess-vision")]
#[command(about = "Read a chess diagram photo into FEN notation")]
struct CliArgs {
    /// Photo of the chess diagram (book page, screen, or board).
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Vision provider: xai, anthropic, openai, or zai. Overrides VISION_PROVIDER.
    #[arg(short, long, value_parser = parse_provider_arg)]
    provider: Option<Provider>,

    /// Model name. Overrides VISION_MODEL.
    #[arg(short, long)]
    model: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_provider_arg(input: &str) -> std::result::Result<Provider, String> {
    input.parse::<Provider>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_vision=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = Config::from_env()?;
    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if args.model.is_some() {
        config.model = args.model;
    }

    let app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            eprintln!("{}", AnalysisResult::from(e));
            std::process::exit(1);
        }
    };

    let result = app.analyze_file(&args.image).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    match &result {
        AnalysisResult::Fen(fen) => {
            info!("Analysis completed successfully");
            if !args.json {
                println!("{}", fen);
                println!("{}", fen.analysis_url());
            }
            Ok(())
        }
        _ => {
            eprintln!("{}", result);
            std::process::exit(1);
        }
    }
}
