//! magicquest-core: story backend core (badge catalog, learning-path classifier,
//! Gemini bridge, story log, dashboard aggregation).
//!
//! The gateway add-on composes these pieces; nothing here touches HTTP routing.

mod badges;
mod config;
mod dashboard;
mod gemini;
mod learning_path;
mod story;
mod story_log;

pub use badges::{
    category_names, icon_for, icon_or_fallback, is_known_category, prompt_list, BADGE_CATALOG,
    FALLBACK_BADGE, FALLBACK_ICON,
};
pub use config::QuestConfig;
pub use dashboard::DashboardView;
pub use gemini::{GeminiBridge, GeminiError, StoryModel, DEFAULT_MODEL};
pub use learning_path::{tier_for, LEARNING_PATH_TIERS};
pub use story::{StoryResult, StoryService, FALLBACK_LEARNING_POINT, FALLBACK_STORY};
pub use story_log::{Interaction, StoryLog};
