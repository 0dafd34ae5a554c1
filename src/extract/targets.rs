//! Per-target extraction heuristics. Scoring rules are count×weight formulas
//! per target; any equivalent ranking is acceptable, so these stay simple and
//! auditable rather than chasing an exact upstream formula.

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{json, Value};

use super::ExtractionResult;

pub const SUPPORTED_TARGETS: &[&str] =
    &["title", "price", "body", "review", "summary", "image", "link", "date"];

fn select_first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn select_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

pub fn extract_title(html: Option<&str>, markdown_text: &str) -> ExtractionResult {
    let mut candidates: Vec<(String, u32)> = Vec::new();

    if let Some(html) = html {
        let document = Html::parse_document(html);
        if let Some(title) = select_first_text(&document, "title") {
            candidates.push((title, 30));
        }
        if let Some(title) = select_first_text(&document, "h1") {
            candidates.push((title, 25));
        }
        if let Some(title) = select_attr(&document, r#"meta[property="og:title"]"#, "content") {
            candidates.push((title, 20));
        }
    }

    if candidates.is_empty() {
        if let Some(first_line) = markdown_text.lines().find(|l| !l.trim().is_empty()) {
            candidates.push((first_line.trim_start_matches('#').trim().to_string(), 10));
        }
    }

    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    match candidates.into_iter().next() {
        Some((title, weight)) => ExtractionResult {
            target_content: "title".to_string(),
            extracted_data: json!(title),
            quality_score: weight.min(100),
            confidence: (f64::from(weight) / 30.0).min(1.0),
        },
        None => empty_result("title"),
    }
}

pub fn extract_price(html: Option<&str>, markdown_text: &str) -> ExtractionResult {
    let price_pattern = Regex::new(r"[$₩¥€£]\s?[\d,]+(?:\.\d{1,2})?|\d[\d,]*\s?(?:원|USD|KRW)").expect("static");

    let mut found: Vec<String> = Vec::new();
    if let Some(html) = html {
        let document = Html::parse_document(html);
        if let Ok(selector) = Selector::parse("[class*=price]") {
            for el in document.select(&selector) {
                let text = el.text().collect::<String>();
                found.extend(price_pattern.find_iter(&text).map(|m| m.as_str().to_string()));
            }
        }
    }
    if found.is_empty() {
        found.extend(price_pattern.find_iter(markdown_text).map(|m| m.as_str().to_string()));
    }

    if found.is_empty() {
        return empty_result("price");
    }

    ExtractionResult {
        target_content: "price".to_string(),
        extracted_data: json!(found[0]),
        quality_score: 70,
        confidence: 0.7,
    }
}

pub fn extract_body(html: Option<&str>, markdown_text: &str) -> ExtractionResult {
    if let Some(html) = html {
        let document = Html::parse_document(html);
        for selector in ["article", "main", "[class*=content]"] {
            if let Some(text) = select_first_text(&document, selector) {
                return ExtractionResult {
                    target_content: "body".to_string(),
                    extracted_data: json!(text),
                    quality_score: 75,
                    confidence: 0.75,
                };
            }
        }
    }

    ExtractionResult {
        target_content: "body".to_string(),
        extracted_data: json!(markdown_text),
        quality_score: 50,
        confidence: 0.5,
    }
}

pub fn extract_review(html: Option<&str>, markdown_text: &str) -> ExtractionResult {
    let rating_pattern = Regex::new(r"(\d(?:\.\d)?)\s?/\s?5|★{1,5}").expect("static");

    if let Some(html) = html {
        let document = Html::parse_document(html);
        if let Ok(selector) = Selector::parse("[class*=review]") {
            if let Some(el) = document.select(&selector).next() {
                let text = el.text().collect::<String>().trim().to_string();
                let rating = rating_pattern.find(&text).map(|m| m.as_str().to_string());
                return ExtractionResult {
                    target_content: "review".to_string(),
                    extracted_data: json!({ "text": text, "rating": rating }),
                    quality_score: 65,
                    confidence: 0.65,
                };
            }
        }
    }

    match rating_pattern.find(markdown_text) {
        Some(m) => ExtractionResult {
            target_content: "review".to_string(),
            extracted_data: json!({ "rating": m.as_str() }),
            quality_score: 40,
            confidence: 0.4,
        },
        None => empty_result("review"),
    }
}

pub fn extract_summary(html: Option<&str>, markdown_text: &str) -> ExtractionResult {
    if let Some(html) = html {
        let document = Html::parse_document(html);
        if let Some(description) = select_attr(&document, r#"meta[name="description"]"#, "content")
            .or_else(|| select_attr(&document, r#"meta[property="og:description"]"#, "content"))
        {
            return ExtractionResult {
                target_content: "summary".to_string(),
                extracted_data: json!(description),
                quality_score: 80,
                confidence: 0.8,
            };
        }
    }

    match markdown_text.split("\n\n").find(|p| !p.trim().is_empty()) {
        Some(paragraph) => ExtractionResult {
            target_content: "summary".to_string(),
            extracted_data: json!(paragraph.trim()),
            quality_score: 50,
            confidence: 0.5,
        },
        None => empty_result("summary"),
    }
}

pub fn extract_image(html: Option<&str>) -> ExtractionResult {
    let Some(html) = html else { return empty_result("image") };
    let document = Html::parse_document(html);

    if let Some(url) = select_attr(&document, r#"meta[property="og:image"]"#, "content") {
        return ExtractionResult {
            target_content: "image".to_string(),
            extracted_data: json!(url),
            quality_score: 70,
            confidence: 0.7,
        };
    }
    if let Some(url) = select_attr(&document, "img", "src") {
        return ExtractionResult {
            target_content: "image".to_string(),
            extracted_data: json!(url),
            quality_score: 45,
            confidence: 0.45,
        };
    }
    empty_result("image")
}

pub fn extract_link(html: Option<&str>, markdown_text: &str) -> ExtractionResult {
    if let Some(html) = html {
        let document = Html::parse_document(html);
        if let Some(href) = select_attr(&document, "a[href]", "href") {
            return ExtractionResult {
                target_content: "link".to_string(),
                extracted_data: json!(href),
                quality_score: 60,
                confidence: 0.6,
            };
        }
    }

    let link_pattern = Regex::new(r"\[[^\]]*\]\((https?://[^)]+)\)").expect("static");
    match link_pattern.captures(markdown_text) {
        Some(caps) => ExtractionResult {
            target_content: "link".to_string(),
            extracted_data: json!(caps.get(1).map(|m| m.as_str()).unwrap_or_default()),
            quality_score: 40,
            confidence: 0.4,
        },
        None => empty_result("link"),
    }
}

pub fn extract_date(html: Option<&str>, markdown_text: &str) -> ExtractionResult {
    let date_pattern = Regex::new(r"\d{4}-\d{2}-\d{2}|\d{4}\.\d{2}\.\d{2}").expect("static");

    if let Some(html) = html {
        let document = Html::parse_document(html);
        if let Some(datetime) = select_attr(&document, "time[datetime]", "datetime") {
            return ExtractionResult {
                target_content: "date".to_string(),
                extracted_data: json!(datetime),
                quality_score: 75,
                confidence: 0.75,
            };
        }
    }

    match date_pattern.find(markdown_text) {
        Some(m) => ExtractionResult {
            target_content: "date".to_string(),
            extracted_data: json!(m.as_str()),
            quality_score: 50,
            confidence: 0.5,
        },
        None => empty_result("date"),
    }
}

fn empty_result(target: &str) -> ExtractionResult {
    ExtractionResult {
        target_content: target.to_string(),
        extracted_data: Value::Null,
        quality_score: 0,
        confidence: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_from_html_title_tag() {
        let html = "<html><head><title>Page Title</title></head><body></body></html>";
        let result = extract_title(Some(html), "");
        assert_eq!(result.extracted_data, json!("Page Title"));
    }

    #[test]
    fn extracts_price_from_class_match() {
        let html = r#"<div class="price">$19.99</div>"#;
        let result = extract_price(Some(html), "");
        assert_eq!(result.extracted_data, json!("$19.99"));
    }

    #[test]
    fn falls_back_to_markdown_for_summary_when_no_html() {
        let result = extract_summary(None, "First paragraph.\n\nSecond paragraph.");
        assert_eq!(result.extracted_data, json!("First paragraph."));
    }

    #[test]
    fn missing_image_returns_empty_result() {
        let result = extract_image(Some("<html><body></body></html>"));
        assert_eq!(result.confidence, 0.0);
    }
}
