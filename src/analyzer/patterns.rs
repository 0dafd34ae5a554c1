//! Feature-based scoring tables behind the Site Analyzer. Kept separate from
//! `mod.rs` so the thresholds and keyword lists are easy to audit in one place.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
    ComplexSpa,
    StandardDynamic,
    SimpleStatic,
    AiAnalysisNeeded,
    AntiBotHeavy,
}

impl SiteType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ComplexSpa => "complex_spa",
            Self::StandardDynamic => "standard_dynamic",
            Self::SimpleStatic => "simple_static",
            Self::AiAnalysisNeeded => "ai_analysis_needed",
            Self::AntiBotHeavy => "anti_bot_heavy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsComplexity {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AntiBotRisk {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentLoadingPattern {
    InfiniteScroll,
    Pagination,
    AjaxLoad,
    RequiresInteraction,
}

const SPA_FRAMEWORK_MARKERS: &[&str] = &[
    "react", "ReactDOM", "vue.js", "Vue(", "angular", "ng-app", "svelte", "__NEXT_DATA__", "_next",
];
const SSR_STATE_MARKERS: &[&str] = &["data-reactroot", "__NEXT_DATA__"];

/// SPA score: `+30` for `<script>` count > 10, `+40` for a framework
/// fingerprint, `+50` for SSR-serialized state markers, `+30` for
/// visible-text-starved but DOM-heavy pages.
#[must_use]
pub fn spa_score(html: &str) -> u32 {
    let mut score = 0u32;

    if html.matches("<script").count() > 10 {
        score += 30;
    }

    if SPA_FRAMEWORK_MARKERS.iter().any(|marker| html.contains(marker)) {
        score += 40;
    }

    if SSR_STATE_MARKERS.iter().any(|marker| html.contains(marker)) {
        score += 50;
    }

    let visible_text_len = visible_text_length(html);
    let dom_node_count = html.matches('<').count();
    if visible_text_len < 500 && dom_node_count > 50 {
        score += 30;
    }

    score
}

fn visible_text_length(html: &str) -> usize {
    let mut depth = 0i32;
    let mut len = 0usize;
    for ch in html.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = (depth - 1).max(0),
            _ if depth == 0 && !ch.is_whitespace() => len += 1,
            _ => {}
        }
    }
    len
}

/// `>= 70 -> complex_spa, >= 40 -> standard_dynamic, else simple_static`.
#[must_use]
pub fn site_type_for(spa_score: u32) -> SiteType {
    if spa_score >= 70 {
        SiteType::ComplexSpa
    } else if spa_score >= 40 {
        SiteType::StandardDynamic
    } else {
        SiteType::SimpleStatic
    }
}

const AJAX_MARKERS: &[&str] = &[".ajax(", "fetch(", "axios.", "XMLHttpRequest"];
const DYNAMIC_IMPORT_MARKERS: &[&str] = &["import(", "require("];
const EVENT_LISTENER_MARKERS: &[&str] = &["addEventListener", "onClick", "onLoad"];
const DOM_MANIPULATION_MARKERS: &[&str] = &["getElementById", "querySelector", "createElement"];
const ASYNC_PRIMITIVE_MARKERS: &[&str] = &["async", "await", "Promise", "setTimeout"];

/// Sum of occurrences across five marker families, each occurrence counted
/// double.
#[must_use]
pub fn js_complexity_score(html: &str) -> u32 {
    let families: [&[&str]; 5] = [
        AJAX_MARKERS,
        DYNAMIC_IMPORT_MARKERS,
        EVENT_LISTENER_MARKERS,
        DOM_MANIPULATION_MARKERS,
        ASYNC_PRIMITIVE_MARKERS,
    ];

    let occurrences: usize = families
        .iter()
        .flat_map(|family| family.iter())
        .map(|marker| html.matches(marker).count())
        .sum();

    (occurrences * 2) as u32
}

/// `low` / `medium` / `high` / `very_high` at thresholds 20/50/100.
#[must_use]
pub fn js_complexity_for(score: u32) -> JsComplexity {
    if score >= 100 {
        JsComplexity::VeryHigh
    } else if score >= 50 {
        JsComplexity::High
    } else if score >= 20 {
        JsComplexity::Medium
    } else {
        JsComplexity::Low
    }
}

const WAF_MARKERS: &[&str] = &["distil_r_captcha", "perimeterx", "imperva", "akamai", "datadome"];
const RATE_LIMIT_HEADER_NAMES: &[&str] = &["x-ratelimit", "retry-after", "x-rate-limit"];

/// Count of boolean anti-bot indicators present (Cloudflare fingerprint,
/// CAPTCHA, known WAF, rate-limit headers, JS challenge).
#[must_use]
pub fn anti_bot_indicator_count(html: &str, headers: &reqwest::header::HeaderMap) -> u32 {
    let html_lower = html.to_lowercase();
    let mut count = 0u32;

    if headers.contains_key("cf-ray") || html_lower.contains("cloudflare") {
        count += 1;
    }
    if html_lower.contains("grecaptcha") || html_lower.contains("captcha") {
        count += 1;
    }
    if WAF_MARKERS.iter().any(|marker| html_lower.contains(marker)) {
        count += 1;
    }
    if RATE_LIMIT_HEADER_NAMES
        .iter()
        .any(|name| headers.contains_key(*name))
    {
        count += 1;
    }
    if html_lower.contains("challenge") && html_lower.contains("javascript") {
        count += 1;
    }

    count
}

/// `low`/`medium`/`high`/`very_high` at score thresholds 25/50/75.
#[must_use]
pub fn anti_bot_risk_for(score: u32) -> AntiBotRisk {
    if score >= 75 {
        AntiBotRisk::VeryHigh
    } else if score >= 50 {
        AntiBotRisk::High
    } else if score >= 25 {
        AntiBotRisk::Medium
    } else {
        AntiBotRisk::Low
    }
}

/// Regex sniff for infinite-scroll / pagination / ajax-load / interaction
/// content-loading patterns.
#[must_use]
pub fn content_loading_patterns(html: &str) -> Vec<ContentLoadingPattern> {
    let html_lower = html.to_lowercase();
    let mut patterns = Vec::new();

    if contains_any(&html_lower, &["infinite scroll", "infinitescroll", "lazy load", "lazyload"]) {
        patterns.push(ContentLoadingPattern::InfiniteScroll);
    }
    if contains_any(&html_lower, &["pagination"]) || contains_page_number_marker(&html_lower) {
        patterns.push(ContentLoadingPattern::Pagination);
    }
    if contains_any(&html_lower, &["load-more", "ajax-load", "dynamic-content"]) {
        patterns.push(ContentLoadingPattern::AjaxLoad);
    }
    if contains_any(&html_lower, &["click-to-load", "show-more", "expand"]) {
        patterns.push(ContentLoadingPattern::RequiresInteraction);
    }

    patterns
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn contains_page_number_marker(haystack: &str) -> bool {
    haystack.contains("next-page")
        || haystack.split("page-").any(|rest| rest.chars().next().is_some_and(|c| c.is_ascii_digit()))
}

/// Count of `src="https?://…"` style external resource references.
#[must_use]
pub fn external_resource_count(html: &str) -> usize {
    html.matches("src=\"http://")
        .chain(html.matches("src=\"https://"))
        .count()
        + html.matches("src='http://").chain(html.matches("src='https://")).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spa_score_accumulates_independent_signals() {
        let html = "<script></script>".repeat(11) + "__NEXT_DATA__" + "react";
        assert_eq!(spa_score(&html), 30 + 40 + 50);
    }

    #[test]
    fn js_complexity_thresholds() {
        assert_eq!(js_complexity_for(19), JsComplexity::Low);
        assert_eq!(js_complexity_for(20), JsComplexity::Medium);
        assert_eq!(js_complexity_for(50), JsComplexity::High);
        assert_eq!(js_complexity_for(100), JsComplexity::VeryHigh);
    }

    #[test]
    fn anti_bot_risk_thresholds() {
        assert_eq!(anti_bot_risk_for(0), AntiBotRisk::Low);
        assert_eq!(anti_bot_risk_for(25), AntiBotRisk::Medium);
        assert_eq!(anti_bot_risk_for(50), AntiBotRisk::High);
        assert_eq!(anti_bot_risk_for(75), AntiBotRisk::VeryHigh);
    }

    #[test]
    fn detects_infinite_scroll_pattern() {
        let html = "<div class='infinite-scroll-container'></div>";
        assert!(content_loading_patterns(html).contains(&ContentLoadingPattern::InfiniteScroll));
    }
}
