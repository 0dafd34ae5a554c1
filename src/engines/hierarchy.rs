//! Three-level heading outline extraction, shared by every adapter regardless
//! of whether the source document is HTML or already-converted markdown.

use std::collections::HashMap;

use crate::crawl_engine::Hierarchy;

const OTHER_BUCKET: &str = "other";

/// Extract `{depth1, depth2, depth3}` from a markdown document by walking its
/// `#`/`##`/`###` headings in document order.
///
/// `depth1` is the first H1 encountered (or the document title if none).
/// `depth2` maps each H1 to its following H2s until the next H1 (using the
/// `"other"` bucket for H2s that appear before any H1). `depth3` maps each H2
/// (or H1, if no H2 preceded it) to its following H3s.
#[must_use]
pub fn extract_from_markdown(markdown: &str, fallback_title: &str) -> Hierarchy {
    let mut depth1 = String::new();
    let mut depth2: HashMap<String, Vec<String>> = HashMap::new();
    let mut depth3: HashMap<String, Vec<String>> = HashMap::new();

    let mut current_h1 = OTHER_BUCKET.to_string();
    let mut current_h2_key = OTHER_BUCKET.to_string();

    for line in markdown.lines() {
        let trimmed = line.trim();
        if let Some(text) = trimmed.strip_prefix("### ") {
            depth3.entry(current_h2_key.clone()).or_default().push(text.trim().to_string());
        } else if let Some(text) = trimmed.strip_prefix("## ") {
            let heading = text.trim().to_string();
            depth2.entry(current_h1.clone()).or_default().push(heading.clone());
            current_h2_key = heading;
        } else if let Some(text) = trimmed.strip_prefix("# ") {
            let heading = text.trim().to_string();
            if depth1.is_empty() {
                depth1 = heading.clone();
            }
            current_h1 = heading;
            current_h2_key = current_h1.clone();
        }
    }

    if depth1.is_empty() {
        depth1 = fallback_title.to_string();
    }

    Hierarchy { depth1, depth2, depth3 }
}

/// Extract the same outline directly from parsed HTML, for adapters that have
/// a DOM available before markdown conversion happens.
#[must_use]
pub fn extract_from_html(html: &str, fallback_title: &str) -> Hierarchy {
    use scraper::{Html, Selector};

    let document = Html::parse_document(html);
    let Ok(heading_selector) = Selector::parse("h1, h2, h3") else {
        return Hierarchy {
            depth1: fallback_title.to_string(),
            ..Default::default()
        };
    };

    let mut depth1 = String::new();
    let mut depth2: HashMap<String, Vec<String>> = HashMap::new();
    let mut depth3: HashMap<String, Vec<String>> = HashMap::new();
    let mut current_h1 = OTHER_BUCKET.to_string();
    let mut current_h2_key = OTHER_BUCKET.to_string();

    for element in document.select(&heading_selector) {
        let text = element.text().collect::<String>().trim().to_string();
        if text.is_empty() {
            continue;
        }
        match element.value().name() {
            "h1" => {
                if depth1.is_empty() {
                    depth1 = text.clone();
                }
                current_h1 = text.clone();
                current_h2_key = current_h1.clone();
            }
            "h2" => {
                depth2.entry(current_h1.clone()).or_default().push(text.clone());
                current_h2_key = text;
            }
            "h3" => {
                depth3.entry(current_h2_key.clone()).or_default().push(text);
            }
            _ => {}
        }
    }

    if depth1.is_empty() {
        depth1 = fallback_title.to_string();
    }

    Hierarchy { depth1, depth2, depth3 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_outline_from_markdown() {
        let markdown = "# Title\n## Section A\n### Sub A1\n### Sub A2\n## Section B\n### Sub B1\n";
        let hierarchy = extract_from_markdown(markdown, "fallback");
        assert_eq!(hierarchy.depth1, "Title");
        assert_eq!(hierarchy.depth2.get("Title").unwrap(), &vec!["Section A", "Section B"]);
        assert_eq!(hierarchy.depth3.get("Section A").unwrap(), &vec!["Sub A1", "Sub A2"]);
        assert_eq!(hierarchy.depth3.get("Section B").unwrap(), &vec!["Sub B1"]);
    }

    #[test]
    fn h2_before_any_h1_lands_in_other_bucket() {
        let markdown = "## Orphan\n";
        let hierarchy = extract_from_markdown(markdown, "fallback");
        assert_eq!(hierarchy.depth1, "fallback");
        assert_eq!(hierarchy.depth2.get(OTHER_BUCKET).unwrap(), &vec!["Orphan"]);
    }

    #[test]
    fn falls_back_to_title_when_no_h1() {
        let hierarchy = extract_from_markdown("no headings here", "Fallback Title");
        assert_eq!(hierarchy.depth1, "Fallback Title");
    }

    #[test]
    fn extracts_from_html_headings() {
        let html = "<html><body><h1>Main</h1><h2>Sub</h2><h3>Leaf</h3></body></html>";
        let hierarchy = extract_from_html(html, "fallback");
        assert_eq!(hierarchy.depth1, "Main");
        assert_eq!(hierarchy.depth2.get("Main").unwrap(), &vec!["Sub"]);
        assert_eq!(hierarchy.depth3.get("Sub").unwrap(), &vec!["Leaf"]);
    }
}

#[cfg(test)]
mod roundtrip_proptests {
    use super::*;
    use proptest::prelude::*;

    /// Render a single-H1 outline as markdown headings, index-naming each H2/H3
    /// so names never collide, and return the `Hierarchy` that outline should
    /// produce when re-parsed.
    fn render_single_root_outline(h1: &str, h3_counts: &[usize]) -> (String, Hierarchy) {
        let mut markdown = format!("# {h1}\n");
        let mut depth2: HashMap<String, Vec<String>> = HashMap::new();
        let mut depth3: HashMap<String, Vec<String>> = HashMap::new();
        let mut h2_names = Vec::new();

        for (i, &h3_count) in h3_counts.iter().enumerate() {
            let h2 = format!("section-{i}");
            markdown.push_str(&format!("## {h2}\n"));
            h2_names.push(h2.clone());

            let mut h3_names = Vec::new();
            for j in 0..h3_count {
                let h3 = format!("sub-{i}-{j}");
                markdown.push_str(&format!("### {h3}\n"));
                h3_names.push(h3);
            }
            if !h3_names.is_empty() {
                depth3.insert(h2, h3_names);
            }
        }
        if !h2_names.is_empty() {
            depth2.insert(h1.to_string(), h2_names);
        }

        (markdown, Hierarchy { depth1: h1.to_string(), depth2, depth3 })
    }

    proptest! {
        /// A markdown document built from an arbitrary single-H1 outline must
        /// re-extract to exactly that outline, regardless of how many H2s it
        /// has or how many H3s sit under each one.
        #[test]
        fn hierarchy_round_trips_through_markdown(
            h1 in "[a-zA-Z][a-zA-Z0-9 ]{2,16}",
            h3_counts in prop::collection::vec(0usize..3, 0..5),
        ) {
            let h1 = h1.trim().to_string();
            let (markdown, expected) = render_single_root_outline(&h1, &h3_counts);
            let actual = extract_from_markdown(&markdown, "unused fallback");
            prop_assert_eq!(actual, expected);
        }
    }
}
