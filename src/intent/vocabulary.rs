//! Keyword tables for the Intent Router, declared as ordinary data so a
//! deployment can localize them without touching control flow.

/// Extraction-target keyword table: target name -> synonym list (host
/// languages mixed, matching the domain this vocabulary was drawn from).
pub const TARGET_KEYWORDS: &[(&str, &[&str])] = &[
    ("title", &["제목", "타이틀", "title", "헤드라인", "headline"]),
    ("price", &["가격", "price", "비용", "cost", "금액", "요금"]),
    ("body", &["본문", "내용", "content", "글", "article", "텍스트", "text"]),
    ("review", &["리뷰", "review", "후기", "평가", "댓글", "comment"]),
    ("summary", &["요약", "summary", "개요", "핵심", "정리"]),
    ("image", &["이미지", "image", "사진", "photo", "그림", "picture"]),
    ("link", &["링크", "link", "url", "주소"]),
    ("date", &["날짜", "date", "시간", "time", "작성일"]),
];

/// "Only"-suffix markers: a synonym immediately followed by one of these
/// grants 0.8 confidence instead of the plain 0.5.
pub const ONLY_SUFFIX_MARKERS: &[&str] = &["만", "only"];

/// Verbs that, co-occurring with a resolved target, add +0.2 confidence.
/// Matches the original heuristic: title target only.
pub const EXTRACTION_VERBS: &[&str] = &["추출", "extract", "가져", "fetch"];

/// Known marketplace platforms recognized by the search-intent detector.
pub const PLATFORM_KEYWORDS: &[&str] = &["쿠팡", "네이버", "구글", "아마존"];

/// Search verbs that, combined with a platform keyword and no URL, signal
/// a `search` intent.
pub const SEARCH_VERBS: &[&str] = &["찾아줘", "검색", "찾기", "알아봐"];

/// Ordered query-extraction patterns, first match wins.
pub const QUERY_PATTERNS: &[&str] = &[
    r"에서\s+(.+?)\s+찾아줘",
    r"에서\s+(.+?)\s+검색",
    r"(.+?)\s+정보\s+찾아줘",
];
