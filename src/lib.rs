// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # garmin-session - Cookie-backed HTTP session client
//!
//! A small blocking HTTP client for logging into Garmin Connect and talking
//! to it afterwards. It keeps one session per account identifier, persisted
//! in a cookie file, and remembers the outcome of the last request.
//!
//! ## Features
//!
//! - Persistent sessions: cookies survive transport refreshes and restarts
//! - GET/POST with query parameters, form data, raw payloads and referers
//! - DELETE via POST with `X-HTTP-Method-Override`
//! - Last status code and request diagnostics
//! - Compatibility defaults for the service, with opt-in strict mode
//!
//! ## Example
//!
//! ```rust,no_run
//! use garmin_session::{PostRequest, SessionClient, SessionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = SessionClient::with_config("runner@example.com", SessionConfig::strict())?;
//!
//!     let body = session.post(
//!         "https://connect.garmin.com/modern/proxy/activity-service/activity/1",
//!         PostRequest::new()
//!             .header("Content-Type", "application/json")
//!             .raw_payload(r#"{"activityName":"Morning run"}"#),
//!     );
//!
//!     if session.last_status_code() != 200 {
//!         eprintln!("update failed: {:?}", session.last_error());
//!     }
//!     println!("{}", String::from_utf8_lossy(&body));
//!
//!     session.cleanup_session()?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;
pub mod session;

// Re-exports for convenience

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{Cookie, CookieJar, PostRequest, RequestInfo};

// Session
pub use session::{SessionClient, SessionConfig, COOKIE_FILE_PREFIX, NO_STATUS};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
