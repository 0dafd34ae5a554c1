//! Intent Router: reduces a free-text request into one of four request
//! shapes plus whatever URLs/targets/queries it was able to recover.

mod vocabulary;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

lazy_static! {
    static ref FULL_URL: Regex = Regex::new(r"https?://[^\s<>\x22']+").expect("static regex");
    static ref BARE_DOMAIN: Regex =
        Regex::new(r"\b(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}\b").expect("static regex");
    static ref QUERY_PATTERNS: Vec<Regex> = vocabulary::QUERY_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("static query pattern"))
        .collect();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Single,
    Bulk,
    Selective,
    Search,
    Invalid,
    BulkSelective,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnifiedIntent {
    pub request_type: RequestType,
    pub urls: Vec<String>,
    pub target_content: Option<String>,
    pub search_query: Option<String>,
    pub platform: Option<String>,
    pub confidence: f64,
}

/// Extract URLs from free text: full `https?://…` matches first, then bare
/// domain matches normalized with a `https://` (and `www.` if missing)
/// prefix. De-duplicated, order preserved.
#[must_use]
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for m in FULL_URL.find_iter(text) {
        let url = m.as_str().trim_end_matches(['.', ',', ')', ']']).to_string();
        if seen.insert(url.clone()) {
            urls.push(url);
        }
    }

    if urls.is_empty() {
        for m in BARE_DOMAIN.find_iter(text) {
            let domain = m.as_str();
            if !domain.contains('.') {
                continue;
            }
            let normalized = if domain.starts_with("www.") {
                format!("https://{domain}")
            } else {
                format!("https://www.{domain}")
            };
            if seen.insert(normalized.clone()) {
                urls.push(normalized);
            }
        }
    }

    urls
}

struct TargetMatch {
    target: String,
    confidence: f64,
}

fn detect_target(text: &str) -> Option<TargetMatch> {
    for (target, synonyms) in vocabulary::TARGET_KEYWORDS {
        for synonym in *synonyms {
            let Some(pos) = text.find(synonym) else { continue };
            let after = &text[pos + synonym.len()..];
            let trimmed_after = after.trim_start();

            let is_only = vocabulary::ONLY_SUFFIX_MARKERS
                .iter()
                .any(|marker| trimmed_after.starts_with(marker) || after.starts_with(marker));

            let mut confidence: f64 = if is_only { 0.8 } else { 0.5 };

            if *target == "title" && vocabulary::EXTRACTION_VERBS.iter().any(|verb| text.contains(verb)) {
                confidence += 0.2;
            }

            return Some(TargetMatch {
                target: (*target).to_string(),
                confidence: confidence.clamp(0.0, 1.0),
            });
        }
    }
    None
}

struct SearchMatch {
    platform: Option<String>,
    query: Option<String>,
}

fn detect_search(text: &str) -> Option<SearchMatch> {
    let platform = vocabulary::PLATFORM_KEYWORDS
        .iter()
        .find(|kw| text.contains(*kw))
        .map(|kw| (*kw).to_string());

    let has_search_verb = vocabulary::SEARCH_VERBS.iter().any(|verb| text.contains(verb));

    if !has_search_verb {
        return None;
    }

    let query = QUERY_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());

    Some(SearchMatch { platform, query })
}

/// Classify free text into a `UnifiedIntent` per the decision table: URL
/// count × extraction-keyword presence × platform+verb presence.
#[must_use]
pub fn classify(text: &str) -> UnifiedIntent {
    let urls = extract_urls(text);
    let target = detect_target(text);

    if urls.is_empty() {
        if let Some(search) = detect_search(text) {
            let confidence = if search.platform.is_some() && search.query.is_some() { 0.7 } else { 0.3 };
            return UnifiedIntent {
                request_type: RequestType::Search,
                urls,
                target_content: None,
                search_query: search.query,
                platform: search.platform,
                confidence,
            };
        }

        return UnifiedIntent {
            request_type: RequestType::Invalid,
            urls,
            target_content: None,
            search_query: None,
            platform: None,
            confidence: 0.0,
        };
    }

    if urls.len() == 1 {
        return match target {
            None => UnifiedIntent {
                request_type: RequestType::Single,
                urls,
                target_content: None,
                search_query: None,
                platform: None,
                confidence: 0.9,
            },
            Some(target) => UnifiedIntent {
                request_type: RequestType::Selective,
                urls,
                target_content: Some(target.target),
                search_query: None,
                platform: None,
                confidence: target.confidence,
            },
        };
    }

    match target {
        None => UnifiedIntent {
            request_type: RequestType::Bulk,
            urls,
            target_content: None,
            search_query: None,
            platform: None,
            confidence: 0.8,
        },
        Some(target) => {
            let confidence = (0.6 + 0.2).min(1.0);
            UnifiedIntent {
                request_type: RequestType::BulkSelective,
                urls,
                target_content: Some(target.target),
                search_query: None,
                platform: None,
                confidence,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_url_with_no_keyword_is_single() {
        let intent = classify("https://example.com");
        assert_eq!(intent.request_type, RequestType::Single);
    }

    #[test]
    fn selective_request_recovers_title_only_keyword() {
        let intent = classify("https://naver.com의 제목만 추출해줘");
        assert_eq!(intent.request_type, RequestType::Selective);
        assert_eq!(intent.target_content.as_deref(), Some("title"));
        assert!(intent.confidence >= 0.8);
    }

    #[test]
    fn multiple_urls_with_no_keyword_is_bulk() {
        let intent = classify("https://a.com https://b.com https://c.com");
        assert_eq!(intent.request_type, RequestType::Bulk);
    }

    #[test]
    fn no_url_and_no_search_signal_is_invalid() {
        let intent = classify("hello there");
        assert_eq!(intent.request_type, RequestType::Invalid);
    }

    #[test]
    fn url_extraction_is_whitespace_invariant() {
        let a = extract_urls("visit https://example.com/page today");
        let b = extract_urls("visit   https://example.com/page   today");
        assert_eq!(a, b);
    }

    #[test]
    fn deduplicates_repeated_urls() {
        let urls = extract_urls("https://example.com and https://example.com again");
        assert_eq!(urls.len(), 1);
    }
}
