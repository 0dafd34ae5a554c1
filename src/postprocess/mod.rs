//! Text Post-processor: strips UI chrome left over from markdown conversion
//! and records a reduction-quality score. Idempotent by construction — a
//! second pass over already-cleaned text is a no-op.

use lazy_static::lazy_static;
use regex::Regex;

use crate::crawl_engine::CrawlResult;

const ICON_BUTTON_PLACEHOLDER_MARKERS: &[&str] = &["_아이콘_", "_버튼_", "_링크_", "_icon_", "_button_", "_link_"];
const TRAILING_LINE_ENDERS: &[&str] = &["more", "search", "login", "더보기", "검색", "로그인"];

lazy_static! {
    static ref JS_LINK: Regex = Regex::new(r"\[([^\]]*)\]\(javascript:[^)]*\)").expect("static regex");
    static ref ANCHOR_LINK: Regex = Regex::new(r"\[([^\]]*)\]\(#[^)]*\)").expect("static regex");
    static ref MAILTO_LINK: Regex = Regex::new(r"\[([^\]]*)\]\(mailto:[^)]*\)").expect("static regex");
    static ref HTTP_LINK: Regex = Regex::new(r"\[([^\]]+)\]\((https?://([^/)]+)[^)]*)\)").expect("static regex");
    static ref BLANK_RUN: Regex = Regex::new(r"\n{3,}").expect("static regex");
    static ref SKIP_LINK: Regex = Regex::new(r"(?i)skip to (main )?content").expect("static regex");
    static ref COPYRIGHT_LINE: Regex = Regex::new(r"(?im)^.*(copyright|all rights reserved|©\s*\d{4}).*$").expect("static regex");
    static ref BRACKETED_URL: Regex = Regex::new(r"\[(https?://[^\]]+)\]").expect("static regex");
}

fn strip_chrome_placeholders(text: &str) -> String {
    let mut out = text.to_string();
    for marker in ICON_BUTTON_PLACEHOLDER_MARKERS {
        out = out.replace(marker, "");
    }
    out
}

fn strip_trailing_line_enders(text: &str) -> String {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim().to_lowercase();
            !TRAILING_LINE_ENDERS.iter().any(|ender| trimmed == *ender)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_non_navigable_links(text: &str) -> String {
    let text = JS_LINK.replace_all(text, "$1");
    let text = ANCHOR_LINK.replace_all(&text, "$1");
    MAILTO_LINK.replace_all(&text, "$1").into_owned()
}

fn shorten_http_links(text: &str) -> String {
    HTTP_LINK.replace_all(text, "$1 ($3)").into_owned()
}

fn normalize_list_markers(text: &str) -> String {
    text.lines()
        .map(|line| {
            let trimmed_start = line.trim_start();
            let indent = &line[..line.len() - trimmed_start.len()];
            if let Some(rest) = trimmed_start.strip_prefix("* ") {
                format!("{indent}- {rest}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn remove_navigation_blocks(text: &str) -> String {
    let text = SKIP_LINK.replace_all(text, "");
    let text = COPYRIGHT_LINE.replace_all(&text, "");
    BRACKETED_URL.replace_all(&text, "").into_owned()
}

fn cap_blank_line_runs(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n\n").into_owned()
}

/// Idempotent cleanup pipeline: `clean(clean(x)) == clean(x)` for all inputs,
/// because every step either removes a pattern outright or normalizes it to
/// a form none of the other steps would further rewrite.
#[must_use]
pub fn clean_crawled_text_str(text: &str) -> String {
    let text = strip_chrome_placeholders(text);
    let text = strip_trailing_line_enders(&text);
    let text = collapse_non_navigable_links(&text);
    let text = shorten_http_links(&text);
    let text = normalize_list_markers(&text);
    let text = remove_navigation_blocks(&text);
    cap_blank_line_runs(&text)
}

fn markdown_marker_count(text: &str) -> usize {
    text.matches('#').count() + text.matches("](").count() + text.matches("- ").count()
}

/// Clean `result.text` in place when `clean_text` processing is requested,
/// recording the reduction metrics §4.7 asks for.
pub fn clean_crawled_text(result: &mut CrawlResult) {
    if !result.is_success() {
        return;
    }

    let original_text_length = result.text.len();
    let original_markers = markdown_marker_count(&result.text);
    let cleaned = clean_crawled_text_str(&result.text);
    let processed_text_length = cleaned.len();
    let processed_markers = markdown_marker_count(&cleaned);

    let retention_ratio = if original_text_length == 0 {
        1.0
    } else {
        processed_text_length as f64 / original_text_length as f64
    };
    let markdown_reduction_ratio = if original_markers == 0 {
        1.0
    } else {
        1.0 - (processed_markers as f64 / original_markers as f64).min(1.0)
    };
    let chrome_removal_ratio = if original_text_length == 0 {
        0.0
    } else {
        1.0 - retention_ratio
    };
    let processing_quality_score =
        ((retention_ratio + markdown_reduction_ratio + chrome_removal_ratio) / 3.0).clamp(0.0, 1.0);

    result.text = cleaned;
    result.metadata.insert("post_processing_applied".to_string(), true.into());
    result.metadata.insert("original_text_length".to_string(), original_text_length.into());
    result.metadata.insert("processed_text_length".to_string(), processed_text_length.into());
    result.metadata.insert(
        "text_reduction_ratio".to_string(),
        (1.0 - retention_ratio).into(),
    );
    result
        .metadata
        .insert("processing_quality_score".to_string(), processing_quality_score.into());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_js_and_anchor_links_preserving_text() {
        let text = "click [here](javascript:void(0)) or [top](#top)";
        let cleaned = clean_crawled_text_str(text);
        assert_eq!(cleaned, "click here or top");
    }

    #[test]
    fn shortens_http_links_to_text_and_domain() {
        let text = "[Example](https://example.com/a/b/c)";
        let cleaned = clean_crawled_text_str(text);
        assert_eq!(cleaned, "Example (example.com)");
    }

    #[test]
    fn normalizes_star_list_markers() {
        let text = "* one\n* two";
        assert_eq!(clean_crawled_text_str(text), "- one\n- two");
    }

    #[test]
    fn caps_blank_line_runs_at_two() {
        let text = "a\n\n\n\n\nb";
        assert_eq!(clean_crawled_text_str(text), "a\n\nb");
    }

    #[test]
    fn is_idempotent() {
        let text = "* item [x](javascript:0) [y](https://example.com/a)\n\n\n\nmore text";
        let once = clean_crawled_text_str(text);
        let twice = clean_crawled_text_str(&once);
        assert_eq!(once, twice);
    }
}
