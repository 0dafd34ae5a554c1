//! Strategy Builder: maps a site-type classification (or a URL heuristic,
//! when the analyzer can't reach the page) onto an ordered engine priority
//! list and per-type timing hints.

use crate::analyzer::SiteType;
use crate::crawl_engine::CrawlStrategy;
use crate::engines::registry::EngineRegistry;

/// SPA keywords (checked first), ordered the way `§4.3` specifies.
const SPA_KEYWORDS: &[&str] = &["react.dev", "vue", "angular", "spa"];
const COMMERCE_KEYWORDS: &[&str] = &["shop", "shopping", "ecommerce", "store"];
const SECURITY_KEYWORDS: &[&str] = &["cloudflare", "protected", "secure"];
const DYNAMIC_APP_KEYWORDS: &[&str] = &["dynamic", "app", "portal"];

/// Engine priority for a site type, as name strings matching `EngineAdapter::name()`.
#[must_use]
pub fn engine_priority_for(site_type: SiteType) -> Vec<&'static str> {
    match site_type {
        SiteType::ComplexSpa | SiteType::AiAnalysisNeeded => {
            vec!["ai_crawler", "premium_scraper", "playwright", "requests"]
        }
        SiteType::AntiBotHeavy => vec!["playwright", "premium_scraper", "ai_crawler", "requests"],
        SiteType::StandardDynamic => vec!["playwright", "ai_crawler", "premium_scraper", "requests"],
        SiteType::SimpleStatic => vec!["requests", "ai_crawler", "premium_scraper", "playwright"],
    }
}

/// Per-type timeout hint in seconds.
#[must_use]
pub fn timeout_hint_for(site_type: SiteType) -> u64 {
    match site_type {
        SiteType::ComplexSpa => 60,
        SiteType::AntiBotHeavy => 60,
        SiteType::AiAnalysisNeeded => 45,
        SiteType::StandardDynamic => 40,
        SiteType::SimpleStatic => 30,
    }
}

/// URL-substring fallback used when the analyzer can't reach the page.
/// Checked in the declared order; first match wins.
#[must_use]
pub fn classify_by_url_heuristic(url: &str) -> SiteType {
    let url_lower = url.to_lowercase();

    if SPA_KEYWORDS.iter().any(|kw| url_lower.contains(kw)) {
        SiteType::ComplexSpa
    } else if COMMERCE_KEYWORDS.iter().any(|kw| url_lower.contains(kw)) {
        SiteType::AiAnalysisNeeded
    } else if SECURITY_KEYWORDS.iter().any(|kw| url_lower.contains(kw)) {
        SiteType::AntiBotHeavy
    } else if DYNAMIC_APP_KEYWORDS.iter().any(|kw| url_lower.contains(kw)) {
        SiteType::StandardDynamic
    } else {
        SiteType::SimpleStatic
    }
}

pub struct BuiltStrategy {
    pub strategy: CrawlStrategy,
    pub site_type: SiteType,
    pub is_fallback: bool,
}

/// Build a `CrawlStrategy` for `site_type`, intersecting the declared engine
/// priority with the registry. Falls back to the full registry (in its
/// declared order) rather than failing if the intersection is empty.
#[must_use]
pub fn build_strategy(site_type: SiteType, registry: &EngineRegistry, is_fallback: bool) -> BuiltStrategy {
    let declared_priority = engine_priority_for(site_type);
    let mut engine_priority: Vec<String> = declared_priority
        .iter()
        .filter(|name| registry.contains(name))
        .map(|name| (*name).to_string())
        .collect();

    if engine_priority.is_empty() {
        engine_priority = registry.available_names();
    }

    let strategy = CrawlStrategy {
        engine_priority,
        timeout: timeout_hint_for(site_type),
        is_fallback,
        ..CrawlStrategy::default()
    };

    BuiltStrategy { strategy, site_type, is_fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_heuristic_checks_spa_keywords_first() {
        assert_eq!(classify_by_url_heuristic("https://react.dev/docs"), SiteType::ComplexSpa);
    }

    #[test]
    fn fallback_heuristic_defaults_to_simple_static() {
        assert_eq!(classify_by_url_heuristic("https://example.com"), SiteType::SimpleStatic);
    }

    #[test]
    fn fallback_heuristic_detects_commerce_keywords() {
        assert_eq!(classify_by_url_heuristic("https://myshop.example.com"), SiteType::AiAnalysisNeeded);
    }

    #[test]
    fn every_site_type_has_a_non_empty_declared_priority() {
        for site_type in [
            SiteType::ComplexSpa,
            SiteType::StandardDynamic,
            SiteType::SimpleStatic,
            SiteType::AiAnalysisNeeded,
            SiteType::AntiBotHeavy,
        ] {
            assert!(!engine_priority_for(site_type).is_empty());
        }
    }
}
