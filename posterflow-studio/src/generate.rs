//! AI background generation boundary.
//!
//! The actual inference call (a hosted text-to-image API) is an external
//! collaborator behind [`BackgroundGenerator`]; this module owns the
//! per-event-type prompt presets and the error taxonomy. Missing API
//! credentials are reported distinctly from generation failures so the UI
//! can say "contact support" instead of "try again".

use std::fmt;

use async_trait::async_trait;
use posterflow_core::EventType;

/// Credits consumed per successful generation.
pub const GENERATION_COST: u32 = 1;

/// Curated background prompt for an event type.
pub fn background_prompt(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Church => {
            "majestic church background, cross, holy light, golden rays, \
             divine atmosphere, 8k, photorealistic, cinematic lighting --no text"
        }
        EventType::Party => {
            "cyberpunk nightlife background, neon lights, dj, club crowd, \
             vibrant pink and purple, 8k, photorealistic --no text"
        }
        EventType::Business => {
            "modern corporate background, blue glass building, office seminar, \
             sleek, minimal, professional, 8k --no text"
        }
        EventType::Funeral => {
            "dignified funeral background, red roses, black silk, candlelight, \
             sunset, peaceful, respectful, 8k --no text"
        }
    }
}

/// Generation failures.
#[derive(Debug, Clone)]
pub enum GenerateError {
    /// The inference API credentials are not configured.
    MissingCredentials,
    /// The inference call failed (network, model error, timeout).
    Failed(String),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "inference API credentials not configured"),
            Self::Failed(why) => write!(f, "background generation failed: {why}"),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Seam over the hosted text-to-image API.
#[async_trait]
pub trait BackgroundGenerator: Send + Sync {
    /// Generate a background for `prompt`, returning an image reference
    /// (URL or data URI).
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_event_type_has_a_prompt() {
        for event_type in EventType::ALL {
            let prompt = background_prompt(event_type);
            assert!(!prompt.is_empty());
            // Posters carry their own text; the background must not.
            assert!(prompt.ends_with("--no text"));
        }
    }

    #[test]
    fn test_prompts_are_distinct() {
        let prompts: Vec<_> = EventType::ALL.map(background_prompt).to_vec();
        for (i, a) in prompts.iter().enumerate() {
            for b in prompts.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
