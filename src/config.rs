use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "AyurDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Standard consultation fee charged at booking, in whole rupees.
pub const STANDARD_CONSULTATION_FEE: i64 = 500;

/// A new visit within this many days of the previous one is a free follow-up.
pub const FEE_WAIVER_WINDOW_DAYS: i64 = 10;

/// Upper bound for visit attachments and registration documents (5 MB).
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=debug,info", env!("CARGO_PKG_NAME"))
}

/// Base URL of the clinic REST backend.
/// Overridable via AYURDESK_API_URL, e.g. for a staging server.
pub fn api_base_url() -> String {
    std::env::var("AYURDESK_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000/api".to_string())
}

/// Get the application data directory
/// ~/AyurDesk/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("AyurDesk")
}

/// Where the logged-in session (tokens + user) is persisted between runs.
pub fn session_file() -> PathBuf {
    app_data_dir().join("session.json")
}
