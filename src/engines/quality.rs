//! Per-engine quality scoring: a 0-100 advisory score plus the derived
//! `content_quality` tier. Intra-engine ordinal, not cross-engine comparable
//! (different adapters use different base floors and bonus structures).

/// Tiered content-quality label derived from a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentQuality {
    Low,
    Medium,
    High,
}

impl ContentQuality {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// `score > 80 -> high, > 50 -> medium, else low`.
#[must_use]
pub fn content_quality_for(score: u32) -> ContentQuality {
    if score > 80 {
        ContentQuality::High
    } else if score > 50 {
        ContentQuality::Medium
    } else {
        ContentQuality::Low
    }
}

/// Text-length bonus tiers: `>5000 -> +25, >1000 -> +15, >100 -> +5`.
#[must_use]
fn text_length_bonus(text_len: usize) -> u32 {
    if text_len > 5000 {
        25
    } else if text_len > 1000 {
        15
    } else if text_len > 100 {
        5
    } else {
        0
    }
}

/// Structural bonus for markdown/HTML structure present in `text`: headings,
/// list markers, links, each worth a few points, capped.
#[must_use]
fn structural_bonus(text: &str) -> u32 {
    let mut bonus = 0;
    if text.contains('#') {
        bonus += 5;
    }
    if text.contains("- ") || text.contains("* ") {
        bonus += 5;
    }
    if text.contains("](") {
        bonus += 5;
    }
    bonus
}

/// Metadata-richness bonus: title, description/social tags present.
#[must_use]
fn metadata_bonus(has_title: bool, has_description: bool) -> u32 {
    let mut bonus = 0;
    if has_title {
        bonus += 5;
    }
    if has_description {
        bonus += 5;
    }
    bonus
}

/// Compute a 0-100 quality score from `base_floor` (engine-dependent: ~40 for
/// simple HTTP, ~50 for AI-assisted) plus the text/structure/metadata bonuses,
/// clamped to 100.
#[must_use]
pub fn score(base_floor: u32, text: &str, has_title: bool, has_description: bool) -> u32 {
    let total = base_floor
        + text_length_bonus(text.len())
        + structural_bonus(text)
        + metadata_bonus(has_title, has_description);
    total.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_quality_thresholds() {
        assert_eq!(content_quality_for(81), ContentQuality::High);
        assert_eq!(content_quality_for(80), ContentQuality::Medium);
        assert_eq!(content_quality_for(51), ContentQuality::Medium);
        assert_eq!(content_quality_for(50), ContentQuality::Low);
    }

    #[test]
    fn score_clamps_to_100() {
        let long_text = "# Heading\n- item\n[link](url)\n".repeat(500);
        assert_eq!(score(50, &long_text, true, true), 100);
    }

    #[test]
    fn score_respects_base_floor() {
        assert_eq!(score(40, "", false, false), 40);
    }
}
