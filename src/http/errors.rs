//! Maps a failed `CrawlResult`'s raw error string to a user-friendly message
//! via a fixed substring/regex table, sanitizing local-filesystem detail
//! before matching so it never leaks to end users.

use lazy_static::lazy_static;
use regex::Regex;

struct ErrorPattern {
    regex: Regex,
    message: &'static str,
    suggestion: &'static str,
}

lazy_static! {
    static ref FILE_PATH_PATTERN: Regex = Regex::new(r"(?:[A-Za-z]:\\|/)[^\s:]+").expect("static regex");
    static ref LINE_MARKER_PATTERN: Regex = Regex::new(r"(?i)\bat line \d+\b|\bline \d+:").expect("static regex");

    static ref PATTERNS: Vec<ErrorPattern> = vec![
        ErrorPattern {
            regex: Regex::new(r"(?i)timeout.*exceeded|timed out|connection timeout").unwrap(),
            message: "웹사이트 응답 시간이 초과되었습니다",
            suggestion: "잠시 후 다시 시도해보세요",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)connection.*refused|connection.*failed|network.*unreachable").unwrap(),
            message: "웹사이트에 연결할 수 없습니다",
            suggestion: "인터넷 연결을 확인하거나 잠시 후 다시 시도해보세요",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)name.*resolution.*failed|dns.*error|host.*not.*found").unwrap(),
            message: "웹사이트 주소를 찾을 수 없습니다",
            suggestion: "URL이 올바른지 확인해보세요",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)404|not found").unwrap(),
            message: "요청한 페이지를 찾을 수 없습니다",
            suggestion: "URL이 올바른지 확인해보세요",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)403|forbidden|access.*denied").unwrap(),
            message: "페이지 접근이 거부되었습니다",
            suggestion: "해당 웹사이트에서 크롤링을 허용하지 않을 수 있습니다",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)500|internal.*server.*error").unwrap(),
            message: "웹사이트 서버에 오류가 발생했습니다",
            suggestion: "잠시 후 다시 시도해보세요",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)502|bad.*gateway").unwrap(),
            message: "웹사이트 서버가 일시적으로 사용할 수 없습니다",
            suggestion: "잠시 후 다시 시도해보세요",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)503|service.*unavailable").unwrap(),
            message: "웹사이트 서비스가 일시적으로 중단되었습니다",
            suggestion: "잠시 후 다시 시도해보세요",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)ssl.*certificate|certificate.*verify.*failed|ssl.*error").unwrap(),
            message: "웹사이트의 보안 인증서에 문제가 있습니다",
            suggestion: "해당 웹사이트의 보안 설정을 확인해보세요",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)bot.*detected|captcha|cloudflare|access.*denied.*bot").unwrap(),
            message: "웹사이트에서 자동화된 접근을 차단했습니다",
            suggestion: "해당 웹사이트는 크롤링을 허용하지 않을 수 있습니다",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)page.*goto.*failed|navigation.*failed|load.*failed").unwrap(),
            message: "페이지를 불러올 수 없습니다",
            suggestion: "웹사이트가 일시적으로 접근하기 어려울 수 있습니다",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)javascript.*error|script.*error").unwrap(),
            message: "페이지의 동적 콘텐츠를 처리하는 중 오류가 발생했습니다",
            suggestion: "해당 페이지는 복잡한 구조를 가지고 있을 수 있습니다",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)memory.*error|out.*of.*memory").unwrap(),
            message: "페이지가 너무 복잡하여 처리할 수 없습니다",
            suggestion: "더 간단한 페이지로 시도해보세요",
        },
        ErrorPattern {
            regex: Regex::new(r"(?i)crawling.*failed|scraping.*failed").unwrap(),
            message: "페이지 내용을 추출할 수 없습니다",
            suggestion: "다른 크롤링 방식을 시도하거나 잠시 후 다시 시도해보세요",
        },
    ];
}

const DEFAULT_MESSAGE: &str = "페이지를 처리하는 중 오류가 발생했습니다";
const DEFAULT_SUGGESTION: &str = "다른 URL로 시도하거나 잠시 후 다시 시도해보세요";

/// Strip local-filesystem detail (absolute paths, `line N:` markers) before
/// the raw error ever reaches a user-facing message or the match table.
#[must_use]
pub fn sanitize(raw_error: &str) -> String {
    let sanitized = FILE_PATH_PATTERN.replace_all(raw_error, "<path>");
    LINE_MARKER_PATTERN.replace_all(&sanitized, "").trim().to_string()
}

pub struct FriendlyError {
    pub message: &'static str,
    pub suggestion: &'static str,
}

/// Map a sanitized error string to a user-friendly `{message, suggestion}`
/// pair via the fixed pattern table; falls back to a generic message on no match.
#[must_use]
pub fn friendly_error(raw_error: &str) -> FriendlyError {
    let sanitized = sanitize(raw_error);
    PATTERNS
        .iter()
        .find(|pattern| pattern.regex.is_match(&sanitized))
        .map(|pattern| FriendlyError { message: pattern.message, suggestion: pattern.suggestion })
        .unwrap_or(FriendlyError { message: DEFAULT_MESSAGE, suggestion: DEFAULT_SUGGESTION })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_404_pattern() {
        let result = friendly_error("HTTP 404 Not Found");
        assert_eq!(result.message, "요청한 페이지를 찾을 수 없습니다");
    }

    #[test]
    fn falls_back_to_default_on_no_match() {
        let result = friendly_error("something completely unrecognized happened");
        assert_eq!(result.message, DEFAULT_MESSAGE);
    }

    #[test]
    fn sanitizes_absolute_paths() {
        let sanitized = sanitize("crawling failed at /home/user/secret/file.rs line 42: boom");
        assert!(!sanitized.contains("/home/user"));
    }

    #[test]
    fn pattern_priority_checks_timeout_before_default() {
        let result = friendly_error("request timed out after 30s");
        assert_eq!(result.message, "웹사이트 응답 시간이 초과되었습니다");
    }
}
