use colored::*;

use crate::form::FormState;

const TITLE: &str = "🎨 AI Image Generator";

pub fn submit_label(state: &FormState) -> &'static str {
    if state.loading {
        "Generating..."
    } else {
        "Generate image"
    }
}

/// Terminal rendering of the form. Sections appear in the same order as the
/// page they stand in for: inputs, error banner, result, spinner.
pub fn render(state: &FormState) -> String {
    let mut lines = vec![TITLE.bold().to_string()];

    let prompt = if state.prompt.is_empty() {
        "Describe the image you want to generate...".bright_black().to_string()
    } else {
        state.prompt.clone()
    };
    lines.push(format!("Prompt: {}", prompt));
    lines.push(format!(
        "Style:  {}",
        state.style.map(|s| s.as_str()).unwrap_or("default")
    ));

    let button = if state.can_submit() {
        format!("[ {} ]", submit_label(state)).blue().bold()
    } else {
        format!("[ {} ]", submit_label(state)).bright_black()
    };
    lines.push(button.to_string());

    if let Some(error) = &state.error {
        lines.push(format!("❌ {}", error).red().to_string());
    }

    if let Some(url) = &state.image_url {
        lines.push(format!("🖼️  {}", url.underline()));
        lines.push("[ Download image ]".green().bold().to_string());
    }

    if state.loading {
        lines.push("⏳ Generating image...".cyan().to_string());
    }

    lines.join("\n")
}
