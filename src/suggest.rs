//! Style suggestions from an external text-completion collaborator.
//!
//! The collaborator is asked for `{backgroundColor, textColor, fontFamily}`
//! given a free-text topic. Whatever comes back is treated as best effort:
//! only fields that are present and valid are merged, and a failed call
//! leaves the design untouched.

use std::str::FromStr;

use color::DynamicColor;
use log::{debug, warn};
use serde::Deserialize;

use crate::design::{CardDesign, FontFamily};
use crate::error::CardError;

/// A partial style suggestion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleSuggestion {
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: Option<String>,
}

impl StyleSuggestion {
    /// Extract the first JSON object from free completion text, tolerating
    /// surrounding prose and code fences.
    pub fn from_completion(text: &str) -> Result<Self, CardError> {
        let start = text
            .find('{')
            .ok_or_else(|| CardError::Suggestion("no JSON object in completion".to_string()))?;

        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<StyleSuggestion>()
            .next()
            .ok_or_else(|| CardError::Suggestion("unterminated JSON object".to_string()))?
            .map_err(|e| CardError::Suggestion(format!("Invalid suggestion: {}", e)))
    }
}

/// The external collaborator producing suggestions for a topic.
pub trait StyleSuggester {
    fn suggest(&self, topic: &str) -> Result<StyleSuggestion, CardError>;
}

impl<F> StyleSuggester for F
where
    F: Fn(&str) -> Result<StyleSuggestion, CardError>,
{
    fn suggest(&self, topic: &str) -> Result<StyleSuggestion, CardError> {
        self(topic)
    }
}

fn valid_color(value: &str) -> Option<&str> {
    let value = value.trim();
    DynamicColor::from_str(value).is_ok().then_some(value)
}

/// Merge the present, valid fields of `suggestion` into `design`.
/// Returns whether anything changed.
pub fn apply_suggestion(design: &mut CardDesign, suggestion: &StyleSuggestion) -> bool {
    let mut changed = false;

    if let Some(color) = suggestion.background_color.as_deref().and_then(valid_color) {
        design.set_background_color(color);
        changed = true;
    }
    if let Some(color) = suggestion.text_color.as_deref().and_then(valid_color) {
        design.set_text_color(color);
        changed = true;
    }
    if let Some(font) = suggestion
        .font_family
        .as_deref()
        .and_then(|name| FontFamily::from_str(name).ok())
    {
        design.set_font_family(font);
        changed = true;
    }

    debug!(changed; "Style suggestion merged");
    changed
}

/// Ask `suggester` for a style and merge it. Collaborator failures are
/// logged and swallowed; the design is then unchanged.
pub fn suggest_and_apply(design: &mut CardDesign, suggester: &dyn StyleSuggester, topic: &str) -> bool {
    match suggester.suggest(topic) {
        Ok(suggestion) => apply_suggestion(design, &suggestion),
        Err(err) => {
            warn!(topic, err:err; "Style suggestion failed, keeping design");
            false
        }
    }
}
