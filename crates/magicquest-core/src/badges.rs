//! Badge catalog: fixed category names with display icons.
//!
//! The catalog constrains the generation prompt to a closed vocabulary and
//! validates/repairs the model's answer afterward. It is defined at compile
//! time and never mutated.

/// Fixed catalog, in prompt order.
pub const BADGE_CATALOG: &[(&str, &str)] = &[
    ("Science", "🔬"),
    ("Math", "🧮"),
    ("History", "📜"),
    ("Geography", "🌍"),
    ("Art", "🎨"),
    ("Music", "🎵"),
    ("Literature", "📚"),
    ("Technology", "💻"),
    ("Nature", "🌳"),
    ("Health", "❤️"),
];

/// Badge substituted when the model's category is unknown or the reply cannot be parsed.
/// Deliberately outside the catalog so the model can never claim it directly.
pub const FALLBACK_BADGE: &str = "Creativity";

/// Icon for [`FALLBACK_BADGE`].
pub const FALLBACK_ICON: &str = "✨";

/// Icon for a catalog category, `None` for anything else (including the fallback badge).
pub fn icon_for(name: &str) -> Option<&'static str> {
    BADGE_CATALOG
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, icon)| *icon)
}

pub fn is_known_category(name: &str) -> bool {
    icon_for(name).is_some()
}

/// Icon for a badge, falling back to [`FALLBACK_ICON`] for unknown names.
pub fn icon_or_fallback(name: &str) -> &'static str {
    icon_for(name).unwrap_or(FALLBACK_ICON)
}

/// Category names in catalog order.
pub fn category_names() -> impl Iterator<Item = &'static str> {
    BADGE_CATALOG.iter().map(|(name, _)| *name)
}

/// Comma-joined category names for the generation prompt.
pub fn prompt_list() -> String {
    category_names().collect::<Vec<_>>().join(", ")
}
