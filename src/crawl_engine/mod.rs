//! Shared crawl types: the normalized result, the per-fetch strategy, and the
//! retry/timeout primitives every engine adapter builds on.

pub mod crawl_types;
pub mod page_timeout;

pub use crawl_types::{
    is_permanent_error, retry_delay_secs, CrawlResult, CrawlStatus, CrawlStrategy, Hierarchy,
};
pub use page_timeout::with_page_timeout;
