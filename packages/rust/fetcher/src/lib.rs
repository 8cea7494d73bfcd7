//! Remote conversation fetching for shiftscope.
//!
//! Provides [`SearchClient`] — paginated range search, single-record fetch,
//! and the team directory — plus the [`RetryPolicy`] governing all calls.

pub mod client;
pub mod record;
pub mod retry;

pub use client::{FetchOutcome, SearchClient};
pub use record::{RawPart, RawRecord, SearchResponse};
pub use retry::{RetryClass, RetryPolicy};
