//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::params::{AspectRatio, DEFAULT_REPLICATE_PROMPT};

/// AI thumbnail studio - generate a thumbnail from a prompt, or replicate
/// the style of an existing one.
#[derive(Parser, Debug)]
#[command(name = "thumbsmith", version, about)]
pub struct Cli {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,

    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output. Remote failure causes are logged at error level
    /// even without this flag.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a new thumbnail from a text prompt.
    Generate(GenerateArgs),
    /// Replicate a reference thumbnail's style for a new topic.
    Replicate(ReplicateArgs),
    /// Interactive session with both tabs.
    Studio(StudioArgs),
}

/// Prompt source shared by the one-shot commands.
#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Text prompt.
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(short = 'p', long, conflicts_with = "prompt")]
    pub prompt_file: Option<PathBuf>,
}

/// Where a one-shot command saves its result.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output file path (defaults to the fixed download name in the output dir).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory for the fixed-name download.
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for `generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Prompt source.
    #[command(flatten)]
    pub prompt: PromptArgs,

    /// Aspect ratio: 16:9, 4:3, 1:1.
    #[arg(short, long)]
    pub aspect_ratio: Option<AspectRatio>,

    /// Destination.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `replicate`.
#[derive(Args, Debug)]
pub struct ReplicateArgs {
    /// Prompt source. Defaults to generic replication instructions.
    #[command(flatten)]
    pub prompt: PromptArgs,

    /// Reference thumbnail to replicate.
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Destination.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `studio`.
#[derive(Args, Debug)]
pub struct StudioArgs {
    /// Directory the download command writes into.
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,
}

impl PromptArgs {
    /// Resolve the prompt from the positional argument or the file flag.
    ///
    /// Emptiness is not checked here.
    ///
    /// # Errors
    ///
    /// Returns an error if neither is given and there is no default, or if
    /// the file cannot be read.
    pub fn resolve(&self, default: Option<&str>) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.prompt {
            Ok(text.clone())
        } else if let Some(ref path) = self.prompt_file {
            std::fs::read_to_string(path)
        } else if let Some(text) = default {
            Ok(text.to_string())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide a prompt string or use -p/--prompt-file",
            ))
        }
    }
}

impl ReplicateArgs {
    /// Resolve the replicate prompt, falling back to the default instructions.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt file cannot be read.
    pub fn resolve_prompt(&self) -> Result<String, std::io::Error> {
        self.prompt.resolve(Some(DEFAULT_REPLICATE_PROMPT))
    }
}
