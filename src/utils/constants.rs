//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_CACHE_VERSION: &str = "v1";

// Storage keys; absence of either token key means logged out
pub const ACCESS_TOKEN_KEY: &str = "auth.access_token";
pub const REFRESH_TOKEN_KEY: &str = "auth.refresh_token";
pub const QUERY_CACHE_KEY: &str = "query-cache";

// Auth endpoints
pub const LOGIN_PATH: &str = "/auth/jwt-login";
pub const LOGOUT_PATH: &str = "/auth/jwt-logout";
pub const REFRESH_PATH: &str = "/auth/jwt-refresh";
