//! Story generation service: prompt assembly, reply parsing, fallback, logging.
//!
//! Malformed model replies never fail outward — they become the canned
//! fallback story. A failure of the Gemini call itself is the one error that
//! propagates (see [`GeminiError`]).

use crate::badges;
use crate::gemini::{GeminiError, StoryModel};
use crate::learning_path::tier_for;
use crate::story_log::{Interaction, StoryLog};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Canned story substituted when the model's reply cannot be parsed.
pub const FALLBACK_STORY: &str =
    "Once upon a time, a curious explorer asked a wonderful question!";

/// Canned learning point for the fallback story.
pub const FALLBACK_LEARNING_POINT: &str = "Explored creative thinking and curiosity.";

/// Response for one generated story, including the learning-path tier at the
/// moment of generation. Not persisted; the matching [`Interaction`] is.
#[derive(Debug, Clone, Serialize)]
pub struct StoryResult {
    pub story: String,
    pub learning_point: String,
    pub badge: String,
    pub badge_icon: String,
    pub learning_path_badge: String,
}

/// Three-key reply shape the prompt demands from the model. All keys required;
/// a missing key fails the parse and triggers the full fallback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ParsedReply {
    pub story: String,
    pub learning_point: String,
    pub badge: String,
}

/// Outcome of parsing the model reply. Kept as a tagged value so the fallback
/// path stays testable even though both arms produce the same response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReplyOutcome {
    Parsed(ParsedReply),
    Fallback,
}

/// Strip markdown code fences and surrounding whitespace from a model reply.
pub(crate) fn clean_reply(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse the cleaned reply. Any JSON error or missing key abandons the reply entirely.
pub(crate) fn parse_reply(raw: &str) -> ReplyOutcome {
    match serde_json::from_str::<ParsedReply>(&clean_reply(raw)) {
        Ok(reply) => ReplyOutcome::Parsed(reply),
        Err(e) => {
            tracing::warn!(target: "quest::story", error = %e, "Model reply not usable as JSON; serving fallback story");
            ReplyOutcome::Fallback
        }
    }
}

/// Generates stories for questions and records every interaction in the shared log.
pub struct StoryService {
    model: Arc<dyn StoryModel>,
    log: Arc<StoryLog>,
}

impl StoryService {
    pub fn new(model: Arc<dyn StoryModel>, log: Arc<StoryLog>) -> Self {
        Self { model, log }
    }

    /// Prompt sent to the model for one question. Badge vocabulary is closed
    /// to the catalog; the reply must be a three-key JSON object.
    fn build_prompt(question: &str) -> String {
        format!(
            "You are a creative and friendly storyteller for children.\n\
             Create a short, child-friendly story (3-4 sentences) based on this question: \"{question}\"\n\
             The story should be educational, safe, and positive.\n\
             Also, provide a \"learning point\" for a parent and a \"badge\" category.\n\
             The badge MUST be one of these exact categories: {badges}.\n\
             Return a JSON object with three keys: \"story\", \"learning_point\", and \"badge\".",
            question = question,
            badges = badges::prompt_list(),
        )
    }

    /// Generate a story for `question`, append exactly one [`Interaction`] to
    /// the log (fallback content included), and return the result.
    pub async fn generate(&self, question: &str) -> Result<StoryResult, GeminiError> {
        let prompt = Self::build_prompt(question);
        let raw = self.model.generate_content(&prompt).await?;

        let (story, learning_point, badge) = match parse_reply(&raw) {
            ReplyOutcome::Parsed(reply) => {
                let badge = if badges::is_known_category(&reply.badge) {
                    reply.badge
                } else {
                    // Category-only repair: the story text is kept as-is.
                    tracing::warn!(target: "quest::story", badge = %reply.badge, "Unknown badge category; repairing to {}", badges::FALLBACK_BADGE);
                    badges::FALLBACK_BADGE.to_string()
                };
                (reply.story, reply.learning_point, badge)
            }
            ReplyOutcome::Fallback => (
                FALLBACK_STORY.to_string(),
                FALLBACK_LEARNING_POINT.to_string(),
                badges::FALLBACK_BADGE.to_string(),
            ),
        };

        let badge_icon = badges::icon_or_fallback(&badge).to_string();
        // The tier counts this interaction as already appended (+1); the
        // dashboard counts only what is logged so far. The two differ by one.
        let learning_path_badge = tier_for(self.log.len() + 1).to_string();

        self.log.append(Interaction {
            question: question.to_string(),
            story: story.clone(),
            learning_point: learning_point.clone(),
            badge: badge.clone(),
            badge_icon: badge_icon.clone(),
        });

        Ok(StoryResult {
            story,
            learning_point,
            badge,
            badge_icon,
            learning_path_badge,
        })
    }
}
