//! Thumbsmith - AI thumbnail studio.

mod adapters;
mod app;
mod cassette;
mod cli;
mod config;
mod context;
mod encoder;
mod error;
mod model;
mod orchestrator;
mod output;
mod params;
mod ports;
mod state;
mod studio;
mod view;

use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::{Action, Model};
use crate::cli::{Cli, Command, OutputArgs};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::encoder::encode_file;
use crate::error::{StudioError, ValidationError};
use crate::orchestrator::{Orchestrator, Submission};
use crate::params::Mode;
use crate::output::{resolve_output_path, save_image};
use crate::state::{Phase, RequestState};
use crate::studio::Studio;
use crate::view::render_state;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "thumbsmith=debug" } else { "warn" })
    });
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), StudioError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(StudioError::Config)?;
    tracing::debug!(config = %config_path.display(), "Loaded configuration");

    // Form input is resolved before any adapter is built
    let (model, destination) = match cli.command {
        Command::Generate(ref args) => {
            let mut model = Model::default();
            model.update(Action::SetPrompt(args.prompt.resolve(None)?));
            model.update(Action::SetAspectRatio(
                args.aspect_ratio.unwrap_or(config.defaults.aspect_ratio),
            ));
            (model, Some(&args.output))
        }
        Command::Replicate(ref args) => {
            let mut model = Model::default();
            model.update(Action::SwitchMode(Mode::Replicate));
            model.update(Action::SetPrompt(args.resolve_prompt()?));
            if let Some(ref path) = args.image {
                let image = encode_file(path).await.map_err(|e| {
                    tracing::warn!(path = %path.display(), error = %e, "Could not read reference");
                    ValidationError::UnreadableReference(path.display().to_string())
                })?;
                model.update(Action::SetReference(image));
            }
            (model, Some(&args.output))
        }
        Command::Studio(_) => {
            let mut model = Model::default();
            model.update(Action::SetAspectRatio(config.defaults.aspect_ratio));
            (model, None)
        }
    };

    // Rejected input never needs credentials
    if destination.is_some() {
        model.submission().check()?;
    }

    let (ctx, recording_session) = ServiceContext::from_env(&config)?;
    let orchestrator = Orchestrator::new(ctx.service);

    let outcome = match destination {
        Some(output) => {
            run_once(&orchestrator, model.submission(), output, &config.defaults.output_dir).await
        }
        None => {
            let output_dir = match cli.command {
                Command::Studio(ref args) => args.output_dir.clone(),
                _ => None,
            }
            .unwrap_or_else(|| config.defaults.output_dir.clone());
            let studio = Studio::new(orchestrator, model, output_dir, std::io::stdout());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            studio.run(stdin).await.map(|_| ())
        }
    };

    if let Some(session) = recording_session {
        match session.finish() {
            Ok(Some(path)) => eprintln!("Cassette saved: {}", path.display()),
            Ok(None) => {}
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    outcome
}

/// Submit once, report progress on stderr, and save a successful result.
async fn run_once(
    orchestrator: &Orchestrator,
    submission: Submission,
    output: &OutputArgs,
    default_dir: &Path,
) -> Result<(), StudioError> {
    let mut states = orchestrator.subscribe();
    let handle = orchestrator.spawn(submission)?;

    eprintln!("{}", render_state(&states.borrow_and_update()));
    let phase = handle.wait().await;
    let state: RequestState = orchestrator.snapshot();

    match (phase, state.result) {
        (Phase::Succeeded, Some(ref image)) => {
            let dir = output.output_dir.as_deref().unwrap_or(default_dir);
            let path = resolve_output_path(output.output.as_deref(), dir, image);
            save_image(image, &path)?;
            eprintln!("Saved: {}", path.display());
            Ok(())
        }
        _ => Err(StudioError::RequestFailed(
            state.error.unwrap_or_else(|| "Request did not complete".to_string()),
        )),
    }
}
