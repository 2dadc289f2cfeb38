//! Server-rendered parental dashboard. Plain string templating; every piece of
//! user- or model-supplied text goes through [`escape_html`].

use magicquest_core::DashboardView;
use std::fmt::Write;

/// Minimal HTML escaping for untrusted text.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>MagicQuest — Parent Dashboard</title>
  <style>
    body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
    .tier { font-size: 1.2rem; }
    .badge-count { display: inline-block; margin-right: 1rem; }
    .story { border: 1px solid #ddd; border-radius: 8px; padding: 0.75rem 1rem; margin: 0.75rem 0; }
    .learning-point { color: #555; font-style: italic; }
    .empty { color: #888; }
  </style>
</head>
<body>
  <h1>Parent Dashboard</h1>
"#;

const PAGE_FOOT: &str = r#"  <p><a href="/">← Back to MagicQuest</a></p>
</body>
</html>
"#;

/// Full dashboard page for one [`DashboardView`] snapshot.
pub(crate) fn dashboard_page(view: &DashboardView) -> String {
    let mut page = String::from(PAGE_HEAD);

    let _ = writeln!(
        page,
        "  <p class=\"tier\">Learning path: <strong>{}</strong> ({} question{})</p>",
        escape_html(&view.learning_path_badge),
        view.stories.len(),
        if view.stories.len() == 1 { "" } else { "s" },
    );

    page.push_str("  <section>\n    <h2>Badges</h2>\n    <ul>\n");
    if view.badge_counts.is_empty() {
        page.push_str("      <li class=\"badge-count empty\">No badges earned yet.</li>\n");
    }
    for (badge, count) in &view.badge_counts {
        let _ = writeln!(
            page,
            "      <li class=\"badge-count\">{} × {}</li>",
            escape_html(badge),
            count
        );
    }
    page.push_str("    </ul>\n  </section>\n");

    page.push_str("  <section>\n    <h2>Stories</h2>\n");
    if view.stories.is_empty() {
        page.push_str("    <p class=\"empty\">No stories yet — ask a question first!</p>\n");
    }
    for story in &view.stories {
        let _ = writeln!(
            page,
            "    <article class=\"story\">\n      <h3>{} {} — “{}”</h3>\n      <p>{}</p>\n      <p class=\"learning-point\">Learning point: {}</p>\n    </article>",
            escape_html(&story.badge_icon),
            escape_html(&story.badge),
            escape_html(&story.question),
            escape_html(&story.story),
            escape_html(&story.learning_point),
        );
    }
    page.push_str("  </section>\n");

    page.push_str(PAGE_FOOT);
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use magicquest_core::Interaction;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html("<script>\"a\" & 'b'</script>"),
            "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn page_shows_tier_badges_and_stories() {
        let view = DashboardView::from_stories(vec![Interaction {
            question: "Why is the sky blue?".to_string(),
            story: "Light scatters.".to_string(),
            learning_point: "Physics everywhere.".to_string(),
            badge: "Science".to_string(),
            badge_icon: "🔬".to_string(),
        }]);
        let page = dashboard_page(&view);
        assert!(page.contains("Beginner"));
        assert!(page.contains("Science × 1"));
        assert!(page.contains("Why is the sky blue?"));
        assert!(page.contains("Physics everywhere."));
    }

    #[test]
    fn page_escapes_user_questions() {
        let view = DashboardView::from_stories(vec![Interaction {
            question: "<img src=x>".to_string(),
            story: "s".to_string(),
            learning_point: "l".to_string(),
            badge: "Art".to_string(),
            badge_icon: "🎨".to_string(),
        }]);
        let page = dashboard_page(&view);
        assert!(!page.contains("<img src=x>"));
        assert!(page.contains("&lt;img src=x&gt;"));
    }

    #[test]
    fn empty_log_renders_placeholders() {
        let page = dashboard_page(&DashboardView::from_stories(Vec::new()));
        assert!(page.contains("No stories yet"));
        assert!(page.contains("No badges earned yet"));
    }
}
