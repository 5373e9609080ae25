//! Interactive session: both tabs, one request state, line commands.

use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::app::{Action, Model};
use crate::encoder::encode_file;
use crate::error::{StudioError, ValidationError};
use crate::orchestrator::{Orchestrator, SubmitHandle};
use crate::output::download;
use crate::params::{AspectRatio, Mode};
use crate::view::{render_form, render_state};

const HELP: &str = "\
Commands:
  tab generate|replicate   switch tabs (form input is kept)
  prompt <text>            set the active tab's prompt
  ratio 16:9|4:3|1:1       set the generate aspect ratio
  image <path>             choose the reference thumbnail
  submit                   send the active form
  wait                     wait for in-flight requests
  status                   show the result area
  download [dir]           save the displayed thumbnail
  uri                      print the displayed thumbnail as a data URI
  form                     show the active form
  help                     show this help
  quit                     leave the studio";

/// A parsed studio command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudioCommand {
    /// Switch tabs.
    Tab(Mode),
    /// Set the active prompt.
    Prompt(String),
    /// Set the aspect ratio.
    Ratio(AspectRatio),
    /// Choose a reference image.
    Image(PathBuf),
    /// Submit the active form.
    Submit,
    /// Wait for in-flight requests.
    Wait,
    /// Show the result area.
    Status,
    /// Save the displayed result.
    Download(Option<PathBuf>),
    /// Print the displayed result as a data URI.
    Uri,
    /// Show the active form.
    Form,
    /// Show help.
    Help,
    /// Leave.
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a message for unknown commands or bad arguments.
pub fn parse_command(line: &str) -> Result<Option<StudioCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_ascii_lowercase().as_str() {
        "tab" => StudioCommand::Tab(rest.parse()?),
        "prompt" => StudioCommand::Prompt(rest.to_string()),
        "ratio" => StudioCommand::Ratio(rest.parse()?),
        "image" if rest.is_empty() => return Err("Usage: image <path>".to_string()),
        "image" => StudioCommand::Image(PathBuf::from(rest)),
        "submit" => StudioCommand::Submit,
        "wait" => StudioCommand::Wait,
        "status" => StudioCommand::Status,
        "download" => StudioCommand::Download((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "uri" => StudioCommand::Uri,
        "form" => StudioCommand::Form,
        "help" | "?" => StudioCommand::Help,
        "quit" | "exit" => StudioCommand::Quit,
        other => return Err(format!("Unknown command '{other}'. Type 'help' for commands.")),
    };
    Ok(Some(command))
}

/// Runs the interactive loop over any line source and writer.
pub struct Studio<W> {
    orchestrator: Orchestrator,
    model: Model,
    output_dir: PathBuf,
    pending: Vec<SubmitHandle>,
    out: W,
}

impl<W: Write> Studio<W> {
    /// Create a session starting from `model`.
    pub fn new(orchestrator: Orchestrator, model: Model, output_dir: PathBuf, out: W) -> Self {
        Self { orchestrator, model, output_dir, pending: Vec::new(), out }
    }

    /// Process commands until `quit` or end of input.
    ///
    /// State changes are rendered as they happen. At end of input the
    /// session waits for in-flight requests before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, input: R) -> Result<Model, StudioError> {
        let mut states = self.orchestrator.subscribe();
        let mut lines = input.lines();
        writeln!(self.out, "{}", render_form(&self.model, &self.orchestrator.snapshot()))?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match parse_command(&line) {
                        Ok(Some(StudioCommand::Quit)) => break,
                        Ok(Some(command)) => self.handle(command).await?,
                        Ok(None) => {}
                        Err(message) => writeln!(self.out, "{message}")?,
                    }
                }
                changed = states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let text = render_state(&states.borrow_and_update());
                    writeln!(self.out, "{text}")?;
                }
            }
        }

        self.wait_pending().await;
        if states.has_changed().unwrap_or(false) {
            let text = render_state(&states.borrow_and_update());
            writeln!(self.out, "{text}")?;
        }
        Ok(self.model)
    }

    async fn handle(&mut self, command: StudioCommand) -> Result<(), StudioError> {
        match command {
            StudioCommand::Tab(mode) => {
                self.model.update(Action::SwitchMode(mode));
                self.show_form()?;
            }
            StudioCommand::Prompt(text) => self.model.update(Action::SetPrompt(text)),
            StudioCommand::Ratio(ratio) => self.model.update(Action::SetAspectRatio(ratio)),
            StudioCommand::Image(path) => self.select_image(&path).await?,
            StudioCommand::Submit => self.submit()?,
            StudioCommand::Wait => self.wait_pending().await,
            StudioCommand::Status => {
                writeln!(self.out, "{}", render_state(&self.orchestrator.snapshot()))?;
            }
            StudioCommand::Download(dir) => {
                let dir = dir.unwrap_or_else(|| self.output_dir.clone());
                match download(&self.orchestrator.snapshot(), &dir) {
                    Ok(Some(path)) => writeln!(self.out, "Saved: {}", path.display())?,
                    Ok(None) => writeln!(self.out, "Nothing to download yet.")?,
                    Err(e) => {
                        tracing::warn!(dir = %dir.display(), error = %e, "Download failed");
                        writeln!(self.out, "Could not save thumbnail to {}.", dir.display())?;
                    }
                }
            }
            StudioCommand::Uri => match self.orchestrator.snapshot().result {
                Some(image) => writeln!(self.out, "{}", image.data_uri())?,
                None => writeln!(self.out, "Nothing to show yet.")?,
            },
            StudioCommand::Form => self.show_form()?,
            StudioCommand::Help => writeln!(self.out, "{HELP}")?,
            StudioCommand::Quit => {}
        }
        Ok(())
    }

    async fn select_image(&mut self, path: &Path) -> Result<(), StudioError> {
        match encode_file(path).await {
            Ok(image) => {
                writeln!(self.out, "Selected {} ({})", image.display_name, image.media_type)?;
                self.model.update(Action::SetReference(image));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read reference image");
                self.model.update(Action::ClearReference);
                let error = ValidationError::UnreadableReference(path.display().to_string());
                // Loading keeps its error slot empty
                if self.orchestrator.snapshot().is_loading() {
                    writeln!(self.out, "{error}")?;
                } else {
                    self.orchestrator.report(&error);
                }
            }
        }
        Ok(())
    }

    fn submit(&mut self) -> Result<(), StudioError> {
        if self.orchestrator.snapshot().is_loading() {
            writeln!(self.out, "A request is already in progress.")?;
            return Ok(());
        }
        self.pending.retain(|h| !h.is_finished());
        // Rejections are already recorded in the request state.
        if let Ok(handle) = self.orchestrator.spawn(self.model.submission()) {
            self.pending.push(handle);
        }
        Ok(())
    }

    async fn wait_pending(&mut self) {
        for handle in std::mem::take(&mut self.pending) {
            handle.wait().await;
        }
    }

    fn show_form(&mut self) -> Result<(), StudioError> {
        writeln!(self.out, "{}", render_form(&self.model, &self.orchestrator.snapshot()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::orchestrator::tests::FakeService;
    use crate::params::DEFAULT_REPLICATE_PROMPT;

    async fn run_script(
        service: std::sync::Arc<FakeService>,
        script: &str,
        output_dir: &Path,
    ) -> (Model, String) {
        let mut out = Vec::new();
        let studio = Studio::new(
            Orchestrator::new(service),
            Model::default(),
            output_dir.to_path_buf(),
            &mut out,
        );
        let model = studio.run(script.as_bytes()).await.unwrap();
        (model, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("  "), Ok(None));
        assert_eq!(parse_command("tab replicate"), Ok(Some(StudioCommand::Tab(Mode::Replicate))));
        assert_eq!(
            parse_command("prompt  retro gaming setup review "),
            Ok(Some(StudioCommand::Prompt("retro gaming setup review".into())))
        );
        assert_eq!(
            parse_command("ratio 4:3"),
            Ok(Some(StudioCommand::Ratio(AspectRatio::Standard)))
        );
        assert_eq!(parse_command("download"), Ok(Some(StudioCommand::Download(None))));
        assert_eq!(
            parse_command("download out"),
            Ok(Some(StudioCommand::Download(Some(PathBuf::from("out")))))
        );
        assert_eq!(parse_command("EXIT"), Ok(Some(StudioCommand::Quit)));
        assert!(parse_command("cancel").unwrap_err().contains("Unknown command"));
        assert_eq!(parse_command("uri"), Ok(Some(StudioCommand::Uri)));
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(parse_command("ratio 9:16").unwrap_err().contains("Unsupported aspect ratio"));
        assert!(parse_command("tab edit").is_err());
        assert!(parse_command("image").is_err());
        assert!(parse_command("frobnicate").unwrap_err().contains("Unknown command"));
    }

    #[tokio::test]
    async fn generate_then_download() {
        let dir = std::env::temp_dir().join("thumbsmith_studio_generate_test");
        let _ = std::fs::remove_dir_all(&dir);
        let script = "prompt retro gaming setup review\nratio 16:9\nsubmit\nwait\ndownload\nquit\n";

        let (_, output) = run_script(FakeService::ok("QUJDRA=="), script, &dir).await;

        assert!(output.contains("Thumbnail ready (image/jpeg"), "output: {output}");
        assert!(output.contains("Saved:"), "output: {output}");
        assert_eq!(std::fs::read(dir.join("ai-thumbnail.jpg")).unwrap(), b"ABCD");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn replicate_without_image_never_calls_service() {
        let dir = std::env::temp_dir().join("thumbsmith_studio_noimage_test");
        let service = FakeService::ok("QUJDRA==");

        let (_, output) = run_script(service.clone(), "tab replicate\nsubmit\n", &dir).await;

        assert!(output.contains("Please upload an image to replicate."), "output: {output}");
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unreadable_image_is_reported() {
        let dir = std::env::temp_dir().join("thumbsmith_studio_badimage_test");
        let script = "tab replicate\nimage /nonexistent/ref.png\nstatus\n";

        let (model, output) = run_script(FakeService::ok("QUJDRA=="), script, &dir).await;

        assert!(output.contains("Could not read '/nonexistent/ref.png'"), "output: {output}");
        assert!(model.replicate.reference.is_none());
    }

    #[tokio::test]
    async fn tabs_keep_form_input() {
        let dir = std::env::temp_dir().join("thumbsmith_studio_tabs_test");
        let script = "prompt my topic\nratio 1:1\ntab replicate\nprompt new style\ntab generate\n";

        let (model, _) = run_script(FakeService::ok("QUJDRA=="), script, &dir).await;

        assert_eq!(model.active, Mode::Generate);
        assert_eq!(model.generate.prompt, "my topic");
        assert_eq!(model.generate.aspect_ratio, AspectRatio::Square);
        assert_eq!(model.replicate.prompt, "new style");
        assert_ne!(model.replicate.prompt, DEFAULT_REPLICATE_PROMPT);
    }

    #[tokio::test]
    async fn download_before_result_is_noop() {
        let dir = std::env::temp_dir().join("thumbsmith_studio_nodownload_test");
        let (_, output) = run_script(FakeService::ok("QUJDRA=="), "download\n", &dir).await;
        assert!(output.contains("Nothing to download yet."));
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn remote_failure_shows_error_panel() {
        let dir = std::env::temp_dir().join("thumbsmith_studio_failure_test");
        let (_, output) =
            run_script(FakeService::failing("quota"), "prompt topic\nsubmit\nwait\nstatus\n", &dir)
                .await;
        assert!(output.contains("An Error Occurred"));
        assert!(output.contains("Failed to generate thumbnail."));
        assert!(!output.contains("quota"));
    }

    #[tokio::test]
    async fn uri_prints_tagged_data_uri() {
        let dir = std::env::temp_dir().join("thumbsmith_studio_uri_test");
        let script = "uri
tab replicate
image Cargo.toml
submit
wait
uri
";

        let (_, output) = run_script(FakeService::ok("QUJDRA=="), script, &dir).await;

        assert!(output.contains("Nothing to show yet."), "output: {output}");
        assert!(output.contains("data:image/png;base64,QUJDRA=="), "output: {output}");
    }

    #[tokio::test]
    async fn failed_download_keeps_session_running() {
        let dir = std::env::temp_dir().join("thumbsmith_studio_baddownload_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let target = blocker.join("sub");
        let script =
            format!("prompt topic\nsubmit\nwait\ndownload {}\nstatus\n", target.display());

        let (_, output) = run_script(FakeService::ok("QUJDRA=="), &script, &dir).await;

        assert!(output.contains("Could not save thumbnail to"), "output: {output}");
        let after = output.split("Could not save thumbnail to").nth(1).unwrap();
        assert!(after.contains("Thumbnail ready"), "output: {output}");
        assert!(!target.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn unreadable_image_while_loading_is_printed() {
        let (service, mut gates) = crate::orchestrator::tests::GatedService::new(&["slow"]);
        let orchestrator = Orchestrator::new(service);
        let mut model = Model::default();
        model.update(Action::SetPrompt("slow".into()));
        let handle = orchestrator.spawn(model.submission()).unwrap();

        let mut out = Vec::new();
        let studio = Studio::new(orchestrator, model, std::env::temp_dir(), &mut out);
        let script = "tab replicate\nimage /nonexistent/ref.png\n";
        let model = studio.run(script.as_bytes()).await.unwrap();
        gates.remove("slow").unwrap().send(Ok("QUJDRA==".into())).unwrap();
        handle.wait().await;
        let output = String::from_utf8(out).unwrap();

        assert!(output.contains("Could not read '/nonexistent/ref.png'"), "output: {output}");
        assert!(model.replicate.reference.is_none());
    }
}
