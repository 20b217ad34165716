// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3030;
pub const HEALTH_PATH: &str = "health";

// Session constants
pub const SESSION_COOKIE: &str = "folio_session";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;
pub const SESSION_ISSUER: &str = "rusty-folio";

// Login throttling
pub const DEFAULT_LOGIN_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_LOGIN_WINDOW_SECS: u64 = 15 * 60;

// Minimum time spent answering any authentication request
pub const AUTH_MIN_DURATION_MS: u64 = 100;

// Request body limit for JSON endpoints
pub const MAX_JSON_BODY_BYTES: u64 = 64 * 1024;
