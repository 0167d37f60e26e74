//! Canonical schema constants for structured logging
//!
//! These constants keep field names identical across the cache, store and engine.
//! Use them as constant field names: `tracing::info!({ FIELD_TABLE } = "blocks")`.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_SETTING_KEY: &str = "setting_key";
pub const FIELD_TABLE: &str = "table";

// Collection sizes
pub const FIELD_CLASSROOM_COUNT: &str = "classroom_count";
pub const FIELD_BLOCK_COUNT: &str = "block_count";
pub const FIELD_SESSION_COUNT: &str = "session_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_MESSAGE: &str = "err_message";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
