//! Prompts for summary generation and parsing of the generated text.

use serde::Deserialize;
use serde_json::json;

use crate::server::{
    error::generation::GenerationError,
    generation::model::Prompt,
    model::db::CometModel,
    service::window::FlybyWindow,
};

const SUMMARY_SYSTEM: &str = "You are a historian of science writing for curious citizen \
astronomers. Stay factual, mention notable events on Earth and in astronomy, and never \
invent observations of the comet itself.";

const SUMMARY_INSTRUCTIONS: &str = "Summarize what happened in the world between the two \
perihelion passages described in the context. Answer with a single JSON object of the form \
{\"title\": string, \"body\": string}. The body is three to five short paragraphs of plain text.";

const ILLUSTRATION_SYSTEM: &str = "You create painterly illustrations for an astronomy \
almanac.";

fn format_year(year: Option<f64>) -> serde_json::Value {
    match year {
        Some(year) if year.is_finite() => json!((year * 100.0).round() / 100.0),
        _ => serde_json::Value::Null,
    }
}

fn window_context(comet: &CometModel, window: &FlybyWindow) -> serde_json::Value {
    json!({
        "comet": {
            "designation": comet.designation,
            "name": comet.name,
        },
        "window": {
            "from_year": format_year(window.earlier.year),
            "to_year": format_year(window.later.year),
            "from_description": window.earlier.description,
            "to_description": window.later.description,
        },
    })
}

/// Prompt asking for the narrative of a window.
pub fn summary_prompt(comet: &CometModel, window: &FlybyWindow, focus: Option<&str>) -> Prompt {
    let mut context = window_context(comet, window);
    if let Some(focus) = focus.map(str::trim).filter(|focus| !focus.is_empty()) {
        context["focus"] = json!(focus);
    }

    Prompt {
        system: SUMMARY_SYSTEM.to_string(),
        instructions: SUMMARY_INSTRUCTIONS.to_string(),
        context,
    }
}

/// Prompt asking for an illustration of an already written summary.
pub fn illustration_prompt(comet: &CometModel, window: &FlybyWindow, title: &str) -> Prompt {
    let mut context = window_context(comet, window);
    context["title"] = json!(title);

    Prompt {
        system: ILLUSTRATION_SYSTEM.to_string(),
        instructions: "Illustrate the period described in the context. No text in the image."
            .to_string(),
        context,
    }
}

/// Title and body parsed from generated text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryDraft {
    pub title: String,
    pub body: String,
}

#[derive(Deserialize)]
struct RawDraft {
    title: Option<String>,
    body: Option<String>,
}

/// Removes a surrounding markdown code fence (with or without a language tag).
fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };

    let inner = match inner.find('\n') {
        Some(newline) => &inner[newline + 1..],
        None => inner,
    };

    inner.trim_end().strip_suffix("```").unwrap_or(inner).trim()
}

impl SummaryDraft {
    /// Parses generated text of the form `{"title": .., "body": ..}`, optionally fenced.
    ///
    /// # Returns
    /// - `Err(GenerationError::EmptyContent)` - Text is empty or whitespace
    /// - `Err(GenerationError::Unparseable)` - Not JSON, or title or body missing or blank
    pub fn parse(text: &str) -> Result<Self, GenerationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyContent);
        }

        let raw: RawDraft = serde_json::from_str(strip_code_fence(text))
            .map_err(|err| GenerationError::Unparseable(err.to_string()))?;

        let field = |value: Option<String>, name: &str| {
            value
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| GenerationError::Unparseable(format!("missing {name}")))
        };

        Ok(Self {
            title: field(raw.title, "title")?,
            body: field(raw.body, "body")?,
        })
    }
}
