// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie-backed session client

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::config::SessionConfig;
use crate::error::{Error, Result};
use crate::http::{CookieJar, Outgoing, PostRequest, RequestInfo, Transport};

/// File name prefix of the per-identifier cookie file
pub const COOKIE_FILE_PREFIX: &str = "GarminCookie_";

/// Status reported before any request has completed
pub const NO_STATUS: i32 = -1;

/// A persistent, cookie-backed HTTP session
///
/// Requests block until the exchange completes and never return errors:
/// a failed request yields an empty body, a status of `0` and the cause in
/// [`last_error`](Self::last_error). An empty body on its own says nothing,
/// since the service may legitimately answer with one.
///
/// ```rust,no_run
/// use garmin_session::{PostRequest, SessionClient};
///
/// let mut session = SessionClient::new("runner@example.com")?;
/// session.get("https://sso.garmin.com/sso/signin", &[("service", "https://connect.garmin.com")], true);
/// session.post(
///     "https://sso.garmin.com/sso/signin",
///     PostRequest::new()
///         .form_field("username", "runner@example.com")
///         .form_field("password", "secret"),
/// );
/// println!("login answered {}", session.last_status_code());
/// session.cleanup_session()?;
/// # Ok::<(), garmin_session::Error>(())
/// ```
#[derive(Debug)]
pub struct SessionClient {
    identifier: String,
    cookie_path: PathBuf,
    config: SessionConfig,
    transport: Transport,
    last_status: i32,
    last_info: Option<RequestInfo>,
    last_error: Option<Error>,
}

impl SessionClient {
    /// Create a session with the default configuration
    pub fn new(identifier: &str) -> Result<Self> {
        Self::with_config(identifier, SessionConfig::default())
    }

    /// Create a session with a custom configuration
    ///
    /// The cookie file is not created until the service sets a cookie.
    pub fn with_config(identifier: &str, config: SessionConfig) -> Result<Self> {
        let identifier = validate_identifier(identifier)?;
        let cookie_path = config
            .resolved_cookie_dir()
            .join(format!("{}{}", COOKIE_FILE_PREFIX, identifier));

        let transport = Transport::open(&config, &cookie_path)?;

        tracing::info!(
            identifier = %identifier,
            cookie_path = %cookie_path.display(),
            "Session opened"
        );

        Ok(Self {
            identifier,
            cookie_path,
            config,
            transport,
            last_status: NO_STATUS,
            last_info: None,
            last_error: None,
        })
    }

    /// Replace the transport with a fresh one built from the same options
    ///
    /// Cookies are flushed to the cookie file first and reloaded by the new
    /// transport, so the session carries over. On error the current
    /// transport is kept.
    pub fn refresh_session(&mut self) -> Result<()> {
        if let Err(e) = self.transport.cookie_jar().save(&self.cookie_path) {
            tracing::warn!(
                path = %self.cookie_path.display(),
                error = %e,
                "Failed to persist cookies before refresh"
            );
        }

        self.transport = Transport::open(&self.config, &self.cookie_path)?;

        tracing::info!(identifier = %self.identifier, "Session refreshed");
        Ok(())
    }

    /// Issue a GET request and return the raw body
    ///
    /// Non-empty `params` are appended as `?{query}` without looking at the
    /// URL, so they must not be combined with a URL that has a query already.
    /// Diagnostics are only recorded when `record_get_info` is configured.
    pub fn get(&mut self, url: &str, params: &[(&str, &str)], allow_redirects: bool) -> Bytes {
        let outgoing = Outgoing::get(url, params, allow_redirects);
        let record_info = self.config.record_get_info;
        self.execute(outgoing, record_info)
    }

    /// Issue a POST request and return the raw body
    pub fn post(&mut self, url: &str, request: PostRequest) -> Bytes {
        let outgoing = request.prepare(
            url,
            self.config.marker_on_post,
            self.config.strict_content_length,
        );
        self.execute(outgoing, true)
    }

    /// Issue a DELETE, sent as POST with a method override header
    pub fn delete(&mut self, url: &str) -> Bytes {
        self.execute(Outgoing::delete(url), true)
    }

    fn execute(&mut self, outgoing: Outgoing, record_info: bool) -> Bytes {
        self.last_error = None;
        let method = outgoing.method.clone();
        let url = outgoing.url.clone();

        match self.transport.dispatch(outgoing) {
            Ok(exchange) => {
                self.last_status = i32::from(exchange.status);
                if record_info {
                    self.last_info = Some(exchange.info);
                }
                exchange.body
            }
            Err(e) => {
                tracing::warn!(method = %method, url = %url, error = %e, "Request failed");
                self.last_status = 0;
                self.last_error = Some(e);
                Bytes::new()
            }
        }
    }

    /// Diagnostics of the most recent POST or DELETE
    pub fn last_request_info(&self) -> Option<&RequestInfo> {
        self.last_info.as_ref()
    }

    /// Status of the most recent request
    ///
    /// [`NO_STATUS`] before the first request, `0` when the most recent
    /// request got no response.
    pub fn last_status_code(&self) -> i32 {
        self.last_status
    }

    /// Transport error of the most recent request, if it failed
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Identifier the session was created with (trimmed)
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Path of the cookie file
    pub fn cookie_path(&self) -> &Path {
        &self.cookie_path
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Cookies currently held by the transport
    pub fn cookies(&self) -> &CookieJar {
        self.transport.cookie_jar()
    }

    /// Delete the cookie file and forget the cookies in memory
    ///
    /// A missing file is not an error.
    pub fn clear_cookie(&self) -> Result<()> {
        self.transport.cookie_jar().clear();
        remove_cookie_file(&self.cookie_path)
    }

    /// Release the transport and delete the cookie file
    pub fn cleanup_session(self) -> Result<()> {
        let SessionClient {
            identifier,
            cookie_path,
            transport,
            ..
        } = self;

        drop(transport);
        remove_cookie_file(&cookie_path)?;

        tracing::info!(identifier = %identifier, "Session cleaned up");
        Ok(())
    }
}

fn validate_identifier(identifier: &str) -> Result<String> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() || trimmed.contains(|c: char| matches!(c, '/' | '\\' | '\0')) {
        return Err(Error::invalid_identifier(identifier));
    }
    Ok(trimmed.to_string())
}

fn remove_cookie_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Cookie file removed");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
