// Protocol constants shared by every HMB client component.

// --- Endpoints ---
pub const OPEN_PATH: &str = "open";
pub const SEND_PATH: &str = "send";
pub const RECV_PATH: &str = "recv";
pub const INFO_PATH: &str = "info";
pub const FEATURES_PATH: &str = "features";
pub const STATUS_PATH: &str = "status";

// --- Content types ---
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const BSON_CONTENT_TYPE: &str = "application/bson";

// --- Message types ---
pub const TYPE_DATA: &str = "DATA";
pub const TYPE_HEARTBEAT: &str = "HEARTBEAT";
pub const TYPE_EOF: &str = "EOF";
pub const TYPE_TOUCH: &str = "TOUCH";

// --- Sequence sentinels (relative to the queue head) ---
pub const SEQ_NEXT_NEW: i64 = -1;
pub const SEQ_MOST_RECENT: i64 = -2;

/// Cursor assigned to a queue that was just created by a TOUCH message.
pub const SEQ_AFTER_TOUCH: i64 = 1;

/// Error string the server reports for an unknown queue on open.
pub const QUEUE_NOT_FOUND: &str = "queue not found";
