//! Text rendering of the form and the result area.

use std::fmt::Write as _;

use crate::app::Model;
use crate::params::{AspectRatio, Mode};
use crate::state::RequestState;

/// Render the result area.
///
/// Loading takes precedence over an error, and an error over an image.
#[must_use]
pub fn render_state(state: &RequestState) -> String {
    if state.is_loading() {
        return format!("... {}", state.loading_message);
    }
    if let Some(ref error) = state.error {
        return format!("An Error Occurred\n{error}");
    }
    if let Some(ref image) = state.result {
        let approx_bytes = image.data_base64.len() / 4 * 3;
        return format!(
            "Thumbnail ready ({}, ~{approx_bytes} bytes). Use download to save it as {}.",
            image.kind.mime_type(),
            image.kind.download_filename()
        );
    }
    "Your Thumbnail Awaits\nUse the controls to generate or replicate a new thumbnail.".to_string()
}

/// Render the tabs and the active form.
#[must_use]
pub fn render_form(model: &Model, state: &RequestState) -> String {
    let mut out = String::new();
    for mode in [Mode::Generate, Mode::Replicate] {
        if mode == model.active {
            let _ = write!(out, "[{}] ", mode.title());
        } else {
            let _ = write!(out, " {}  ", mode.title());
        }
    }
    out.push('\n');

    match model.active {
        Mode::Generate => {
            let _ = writeln!(out, "Thumbnail Topic: {}", display_prompt(&model.generate.prompt));
            let ratios: Vec<String> = AspectRatio::ALL
                .iter()
                .map(|&r| {
                    if r == model.generate.aspect_ratio {
                        format!("({r})")
                    } else {
                        r.to_string()
                    }
                })
                .collect();
            let _ = writeln!(out, "Aspect Ratio: {}", ratios.join(" "));
        }
        Mode::Replicate => {
            let reference = model
                .replicate
                .reference
                .as_ref()
                .map_or("(none) PNG, JPG, GIF", |r| r.display_name.as_str());
            let _ = writeln!(out, "Reference Thumbnail: {reference}");
            let _ =
                writeln!(out, "Instructions for AI: {}", display_prompt(&model.replicate.prompt));
        }
    }

    let label = model.active.submit_label(state.is_loading());
    if model.submit_enabled(state.phase) {
        let _ = write!(out, "<{label}>");
    } else {
        let _ = write!(out, "<{label}> (disabled)");
    }
    out
}

fn display_prompt(prompt: &str) -> &str {
    if prompt.is_empty() {
        "(empty)"
    } else {
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Action;
    use crate::params::OutputKind;
    use crate::state::{DisplayImage, Phase};

    #[test]
    fn idle_placeholder() {
        assert!(render_state(&RequestState::default()).starts_with("Your Thumbnail Awaits"));
    }

    #[test]
    fn loading_shows_message() {
        let mut state = RequestState::default();
        state.begin("Generating...");
        assert_eq!(render_state(&state), "... Generating...");
    }

    #[test]
    fn error_panel() {
        let mut state = RequestState::default();
        state.fail("Failed to generate thumbnail.");
        assert_eq!(render_state(&state), "An Error Occurred\nFailed to generate thumbnail.");
    }

    #[test]
    fn ready_line_names_download_file() {
        let mut state = RequestState::default();
        state.succeed(DisplayImage { kind: OutputKind::Png, data_base64: "QUJDRA==".into() });
        let text = render_state(&state);
        assert!(text.contains("image/png"));
        assert!(text.contains("ai-thumbnail-replica.png"));
    }

    #[test]
    fn generate_form_marks_selection() {
        let mut model = Model::default();
        model.update(Action::SetAspectRatio(AspectRatio::Standard));
        let text = render_form(&model, &RequestState::default());
        assert!(text.starts_with("[Generate]"));
        assert!(text.contains("16:9 (4:3) 1:1"));
        assert!(text.contains("Thumbnail Topic: (empty)"));
        assert!(text.ends_with("<Generate Thumbnail>"));
    }

    #[test]
    fn replicate_form_disabled_without_reference() {
        let mut model = Model::default();
        model.update(Action::SwitchMode(Mode::Replicate));
        let text = render_form(&model, &RequestState::default());
        assert!(text.contains("[Replicate]"));
        assert!(text.contains("<Replicate Thumbnail> (disabled)"));
    }

    #[test]
    fn loading_label() {
        let model = Model::default();
        let state = RequestState { phase: Phase::Loading, ..RequestState::default() };
        assert!(render_form(&model, &state).ends_with("<Generating...> (disabled)"));
    }
}
