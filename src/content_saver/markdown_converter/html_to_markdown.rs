//! HTML to Markdown conversion functionality.
//!
//! This module wraps the htmd-based converter (see `custom_handlers`) and adds
//! additional post-processing to produce clean, well-formatted markdown output.

use anyhow::{Context, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use super::custom_handlers::create_converter;

// Compile regex patterns once at first use
// These are syntactically valid hardcoded patterns - if they fail, it's a compile-time bug
static EMPTY_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}")
        .expect("SAFETY: hardcoded regex r\"\\n{3,}\" is statically valid")
});

static SPACE_AFTER_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s*[-*+])\s*").expect(
        "SAFETY: hardcoded regex r\"(?m)^(\\s*[-*+])\\s*\" is statically valid",
    )
});

static HEADING_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(#+)([^ ])")
        .expect("SAFETY: hardcoded regex r\"(?m)^(#+)([^ ])\" is statically valid")
});

static TABLE_ALIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|(\s*:?-+:?\s*\|)+").expect(
        "SAFETY: hardcoded regex r\"\\|(\\s*:?-+:?\\s*\\|)+\" is statically valid",
    )
});

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```([a-zA-Z]*)\n").expect(
        "SAFETY: hardcoded regex r\"```([a-zA-Z]*)\\n\" is statically valid",
    )
});

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^\)]+)\)")
        .expect("SAFETY: hardcoded regex r\"\\[([^\\]]+)\\]\\(([^\\)]+)\\)\" is statically valid")
});

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[[^\]]*\]\([^\)]+\)")
        .expect("SAFETY: hardcoded regex r\"!\\[[^\\]]*\\]\\([^\\)]+\\)\" is statically valid")
});

/// HTML to Markdown converter with configurable options
pub struct MarkdownConverter {
    preserve_tables: bool,
    preserve_links: bool,
    preserve_images: bool,
    code_highlighting: bool,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self {
            preserve_tables: true,
            preserve_links: true,
            preserve_images: true,
            code_highlighting: true,
        }
    }
}

impl MarkdownConverter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_preserve_tables(mut self, preserve: bool) -> Self {
        self.preserve_tables = preserve;
        self
    }

    #[must_use]
    pub fn with_preserve_links(mut self, preserve: bool) -> Self {
        self.preserve_links = preserve;
        self
    }

    #[must_use]
    pub fn with_preserve_images(mut self, preserve: bool) -> Self {
        self.preserve_images = preserve;
        self
    }

    #[must_use]
    pub fn with_code_highlighting(mut self, highlight: bool) -> Self {
        self.code_highlighting = highlight;
        self
    }

    /// Convert HTML to Markdown synchronously.
    ///
    /// Delegates the actual HTML→Markdown walk to the htmd-based converter
    /// (`custom_handlers::create_converter`), then applies the same regex
    /// cleanup pass the rest of this struct has always performed.
    pub fn convert_sync(&self, html: &str) -> Result<String> {
        let mut markdown = create_converter()
            .convert(html)
            .context("htmd conversion failed")?;

        // Clean up the markdown
        markdown = Self::clean_markdown_static(&markdown);

        // Handle code blocks
        if self.code_highlighting {
            markdown = CODE_BLOCK.replace_all(&markdown, "```$1\n").to_string();
        }

        // Clean up lists
        markdown = SPACE_AFTER_LIST.replace_all(&markdown, "$1 ").to_string();

        // Fix heading spacing
        markdown = HEADING_SPACE.replace_all(&markdown, "$1 $2").to_string();

        // Handle tables if enabled
        if self.preserve_tables {
            markdown = Self::format_tables_static(&markdown);
        }

        // Remove excessive newlines
        markdown = EMPTY_LINES.replace_all(&markdown, "\n\n").to_string();

        // Handle links and images based on settings
        if !self.preserve_links {
            markdown = Self::remove_links_static(&markdown);
        }
        if !self.preserve_images {
            markdown = Self::remove_images_static(&markdown);
        }

        Ok(markdown.trim().to_string())
    }

    /// Convert HTML to Markdown asynchronously
    ///
    /// Performs the same conversion as `convert_sync()` but in an async context.
    /// Since the work is CPU-bound, this simply calls the sync version.
    ///
    /// # Arguments
    ///
    /// * `html` - Raw HTML content to convert
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Converted markdown
    /// * `Err(anyhow::Error)` - Conversion error
    pub async fn convert(&self, html: &str) -> Result<String> {
        self.convert_sync(html)
    }

    fn clean_markdown_static(markdown: &str) -> String {
        let mut cleaned = markdown.to_string();

        // Remove HTML comments
        cleaned = cleaned
            .lines()
            .filter(|line| !line.trim_start().starts_with("<!--"))
            .collect::<Vec<_>>()
            .join("\n");

        // Fix list indentation
        cleaned = cleaned
            .lines()
            .map(|line| {
                if line.trim_start().starts_with(['-', '*', '+']) {
                    let indent = line.chars().take_while(|c| c.is_whitespace()).count();
                    format!("{}{}", " ".repeat(indent), line.trim_start())
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        cleaned
    }

    fn format_tables_static(markdown: &str) -> String {
        let mut formatted = markdown.to_string();

        // Ensure table headers are properly aligned
        formatted = TABLE_ALIGN
            .replace_all(&formatted, |caps: &regex::Captures| {
                caps[0]
                    .trim_matches('|')
                    .split('|')
                    .map(str::trim)
                    .map(|col| {
                        if col.starts_with(':') && col.ends_with(':') {
                            "|:---:|"
                        } else if col.starts_with(':') {
                            "|:---|"
                        } else if col.ends_with(':') {
                            "|---:|"
                        } else {
                            "|---|"
                        }
                    })
                    .collect::<String>()
            })
            .to_string();

        formatted
    }

    fn remove_links_static(markdown: &str) -> String {
        // Convert [text](url) to just text
        LINK_RE.replace_all(markdown, "$1").to_string()
    }

    fn remove_images_static(markdown: &str) -> String {
        // Remove ![alt](url) completely
        IMAGE_RE.replace_all(markdown, "").to_string()
    }
}

/// Resolve every relative link target in `markdown` against `base_url`.
///
/// Fragment-only links (`#section`) and links that already parse as absolute
/// URLs are left untouched; anything else is resolved via RFC 3986 rules
/// (`Url::join`). Targets that fail to resolve are left as-is rather than
/// dropped, since a malformed link is still better than losing the link text.
pub fn process_markdown_links(markdown: &str, base_url: &str) -> String {
    let Ok(base) = Url::parse(base_url) else {
        return markdown.to_string();
    };

    LINK_RE
        .replace_all(markdown, |caps: &regex::Captures| {
            let text = &caps[1];
            let target = &caps[2];

            if target.starts_with('#') || Url::parse(target).is_ok() {
                return format!("[{text}]({target})");
            }

            match base.join(target) {
                Ok(resolved) => format!("[{text}]({resolved})"),
                Err(_) => format!("[{text}]({target})"),
            }
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_link_against_base() {
        let markdown = "See [docs](/guide) for more.";
        let resolved = process_markdown_links(markdown, "https://example.com/articles/post.html");
        assert_eq!(resolved, "See [docs](https://example.com/guide) for more.");
    }

    #[test]
    fn resolves_dot_dot_relative_link() {
        let markdown = "[intro](../concepts/intro)";
        let resolved = process_markdown_links(markdown, "https://example.com/docs/guide.html");
        assert_eq!(
            resolved,
            "[intro](https://example.com/concepts/intro)"
        );
    }

    #[test]
    fn leaves_fragment_only_link_untouched() {
        let markdown = "[section](#section)";
        let resolved = process_markdown_links(markdown, "https://example.com/docs/guide.html");
        assert_eq!(resolved, "[section](#section)");
    }

    #[test]
    fn leaves_absolute_link_untouched() {
        let markdown = "[other](https://other.com/page)";
        let resolved = process_markdown_links(markdown, "https://example.com/docs/guide.html");
        assert_eq!(resolved, "[other](https://other.com/page)");
    }

    #[test]
    fn invalid_base_url_leaves_markdown_untouched() {
        let markdown = "[docs](/guide)";
        let resolved = process_markdown_links(markdown, "not a url");
        assert_eq!(resolved, markdown);
    }
}
