use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_transcript::captions::parse_caption_payload;
use yt_transcript::cli::{Cli, Commands, OutputFormat};
use yt_transcript::config::Config;
use yt_transcript::{output, ReqwestFetcher, Summarizer, YoutubeExtractor};

struct ExtractArgs {
    url: String,
    prompt: Option<String>,
    output_dir: Option<PathBuf>,
    model: Option<String>,
    format: Option<OutputFormat>,
    no_transcript: bool,
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "yt_transcript=debug" } else { "yt_transcript=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Extract {
            url,
            prompt,
            output_dir,
            model,
            format,
            no_transcript,
            api_key,
        } => {
            let config = Config::load().await?;
            let args = ExtractArgs {
                url,
                prompt,
                output_dir,
                model,
                format,
                no_transcript,
                api_key,
            };
            run_extract(config, args, cli.quiet).await?;
        }
        Commands::Parse { file } => {
            let payload = fs_err::read_to_string(&file)?;
            let lines = parse_caption_payload(&payload)
                .with_context(|| format!("Failed to parse caption payload {}", file.display()))?;
            output::print_to_console(&lines.join("\n"));
        }
        Commands::Config { show } => {
            let config = Config::load().await?;
            if show {
                config.display();
            } else {
                println!("Configuration file:");
                println!("  {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

async fn run_extract(config: Config, args: ExtractArgs, quiet: bool) -> Result<()> {
    // Fail before any network work if a summary can't be produced
    let summarizer = match &args.prompt {
        Some(_) => {
            let api_key = args.api_key.clone().context(
                "ANTHROPIC_API_KEY environment variable not set. \
                 Set it with: export ANTHROPIC_API_KEY='sk-ant-...'",
            )?;
            let mut summarizer = Summarizer::new(config.summary.clone(), api_key)?;
            if let Some(model) = &args.model {
                summarizer = summarizer.with_model(model.clone());
            }
            Some(summarizer)
        }
        None => None,
    };

    let format = match args.format {
        Some(format) => format,
        None => config.default_format()?,
    };
    let output_dir = args.output_dir.or_else(|| config.app.output_dir.clone());

    tracing::info!("Starting transcript extraction for: {}", args.url);

    let extractor = YoutubeExtractor::new(ReqwestFetcher::new(&config.http)?);
    let progress = spinner(quiet, "Fetching transcript...");
    let result = extractor.extract(&args.url).await;
    progress.finish_and_clear();
    let transcript = result?;

    tracing::info!(
        "Extracted {} lines ({}) for video {}",
        transcript.lines().len(),
        transcript.language_code(),
        transcript.video_id()
    );

    let mut printed_transcript = false;
    if !args.no_transcript {
        match &output_dir {
            Some(dir) => {
                let path = output::save_transcript(&transcript, dir, format)?;
                println!(
                    "Transcript saved: {}  ({} chars)",
                    path.display(),
                    transcript.text().chars().count()
                );
            }
            None => {
                output::print_to_console(&output::format_transcript(&transcript, format)?);
                printed_transcript = true;
            }
        }
    }

    if let (Some(summarizer), Some(prompt)) = (summarizer, args.prompt.as_deref()) {
        let progress = spinner(quiet, &format!("Summarizing with {}...", summarizer.model()));
        let result = summarizer.summarize(&transcript.text(), Some(prompt)).await;
        progress.finish_and_clear();
        let summary = result?;

        match &output_dir {
            Some(dir) => {
                let path = output::save_summary(&summary, dir, transcript.video_id())?;
                println!(
                    "Summary saved:    {}  ({} chars)",
                    path.display(),
                    summary.chars().count()
                );
            }
            None => {
                if printed_transcript {
                    println!("\n---\n");
                }
                output::print_to_console(&summary);
            }
        }
    }

    Ok(())
}

fn spinner(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        progress.set_style(style);
    }
    progress.set_message(message.to_string());
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}
