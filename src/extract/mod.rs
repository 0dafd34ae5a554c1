//! Selective Extractor: pulls one named field out of a crawled document.
//! Dispatches on `target_content`; each target has its own scoring rule but
//! shares the same `{target_content, extracted_data, quality_score, confidence}` shape.

mod targets;

use serde::Serialize;
use serde_json::Value;

pub use targets::SUPPORTED_TARGETS;

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub target_content: String,
    pub extracted_data: Value,
    pub quality_score: u32,
    pub confidence: f64,
}

/// Extract `target` from `html` (falling back to `markdown_text` when no HTML
/// is available, e.g. for AI/premium engines that only return markdown).
#[must_use]
pub fn extract(target: &str, html: Option<&str>, markdown_text: &str) -> ExtractionResult {
    match target {
        "title" => targets::extract_title(html, markdown_text),
        "price" => targets::extract_price(html, markdown_text),
        "body" => targets::extract_body(html, markdown_text),
        "review" => targets::extract_review(html, markdown_text),
        "summary" => targets::extract_summary(html, markdown_text),
        "image" => targets::extract_image(html),
        "link" => targets::extract_link(html, markdown_text),
        "date" => targets::extract_date(html, markdown_text),
        other => ExtractionResult {
            target_content: other.to_string(),
            extracted_data: Value::Null,
            quality_score: 0,
            confidence: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_target_returns_zero_confidence() {
        let result = extract("nonsense", None, "");
        assert_eq!(result.confidence, 0.0);
    }
}
