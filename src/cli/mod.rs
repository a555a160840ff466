use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yt-transcript",
    about = "yt-transcript - Pull clean transcripts from YouTube captions \
             and summarize them with Claude",
    version,
    long_about = "A CLI tool that extracts the caption transcript of a YouTube video as \
                  plain, ordered text lines. Optionally sends the transcript to Claude \
                  for a general or focused summary."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the transcript of a YouTube video
    Extract {
        /// YouTube URL (youtube.com/watch?v=..., youtu.be/..., /shorts/...) or bare video ID
        #[arg(value_name = "URL_OR_ID")]
        url: String,

        /// Summarize the transcript with this focus prompt ("" for a general summary)
        #[arg(short, long, value_name = "TEXT")]
        prompt: Option<String>,

        /// Directory to save output files (prints to console if not specified)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Claude model for summarization (defaults to the configured model)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Transcript output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Skip the transcript output (summary only)
        #[arg(long)]
        no_transcript: bool,

        /// Anthropic API key used for summaries
        #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Parse a saved caption payload (timedtext XML) and print its lines
    Parse {
        /// Caption payload file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show or locate the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, one caption line per row
    Text,
    /// JSON with video ID, language and lines
    Json,
}

impl OutputFormat {
    /// File extension for saved transcripts
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_empty_prompt_requests_summary() {
        let cli = Cli::try_parse_from([
            "yt-transcript",
            "extract",
            "https://youtu.be/abc123def45",
            "--prompt",
            "",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract { prompt, format, .. } => {
                assert_eq!(prompt.as_deref(), Some(""));
                assert_eq!(format, None);
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn test_format_flag() {
        let cli = Cli::try_parse_from([
            "yt-transcript", "-q", "extract", "abc123def45", "-f", "json", "-o", "out",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Extract {
                format,
                output_dir,
                prompt,
                ..
            } => {
                assert_eq!(format, Some(OutputFormat::Json));
                assert_eq!(output_dir, Some(PathBuf::from("out")));
                assert!(prompt.is_none());
            }
            _ => panic!("expected extract command"),
        }
    }
}
