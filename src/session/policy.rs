//! Session tuning knobs.

use std::time::Duration;

/// Default per-brand diversity cap: lenient enough that small groups are
/// not starved, strict enough that one brand cannot dominate a 4-item set.
pub const DEFAULT_BRAND_CAP: u32 = 2;

/// Default oracle retry attempts per backfill.
pub const DEFAULT_ORACLE_RETRIES: u32 = 3;

/// Default size of an initial recommendation batch.
pub const DEFAULT_BATCH_SIZE: usize = 4;

/// Default deadline for each index/oracle call.
pub const DEFAULT_EXTERNAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Arbitration and backfill parameters for a session.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// Max recommendations sharing one brand per session.
    pub brand_cap: u32,

    /// Results requested per phrased retrieval query.
    pub retrieval_limit: u64,

    /// Results requested by the unfiltered relaxation query.
    pub relaxed_retrieval_limit: u64,

    /// Max ids resolved to full metadata per backfill.
    pub metadata_fetch_limit: usize,

    /// Max shortlist entries offered to the oracle.
    pub shortlist_limit: usize,

    /// Oracle attempts before falling through to synthesis (or suffix
    /// disambiguation for duplicates).
    pub oracle_retries: u32,

    /// Initial batch size.
    pub batch_size: usize,

    /// Deadline applied to every index/oracle call; a timeout is a
    /// recoverable failure routed to the next tier.
    pub external_timeout: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            brand_cap: DEFAULT_BRAND_CAP,
            retrieval_limit: 20,
            relaxed_retrieval_limit: 100,
            metadata_fetch_limit: 100,
            shortlist_limit: 25,
            oracle_retries: DEFAULT_ORACLE_RETRIES,
            batch_size: DEFAULT_BATCH_SIZE,
            external_timeout: DEFAULT_EXTERNAL_TIMEOUT,
        }
    }
}
