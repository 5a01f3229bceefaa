// Single source of truth for all default values.

// --- Client ---
pub const DEFAULT_RETRY_WAIT_SECS: u64 = 1;
pub const DEFAULT_AUTOCREATE_QUEUES: bool = false;

// --- Transport ---
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

// --- Subscription ---
pub const DEFAULT_START_SEQ: i64 = crate::constants::SEQ_NEXT_NEW;
pub const DEFAULT_KEEP: bool = false;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "hmb_client=info";
