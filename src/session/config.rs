// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session configuration

use std::path::PathBuf;
use std::time::Duration;

/// Options applied to every request a session makes
///
/// The defaults reproduce what the target service is known to accept,
/// including skipped TLS verification. [`SessionConfig::strict`] turns the
/// compatibility behaviour off.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Accept invalid TLS certificates and host names (dangerous!)
    pub accept_invalid_certs: bool,
    /// Send a Referer header when following redirects
    pub auto_referer: bool,
    /// Open a new connection for every request
    pub fresh_connect: bool,
    /// Transport-level connection logging
    pub verbose: bool,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Request timeout; transport default when unset
    pub timeout: Option<Duration>,
    /// User agent; none sent when unset
    pub user_agent: Option<String>,
    /// Directory for the cookie file; system temp dir when unset
    pub cookie_dir: Option<PathBuf>,
    /// Capture request diagnostics for GET as well as POST and DELETE
    pub record_get_info: bool,
    /// Send the service marker header on POST as well as GET and DELETE
    pub marker_on_post: bool,
    /// Drop a raw payload's Content-Length when form data replaces the body
    pub strict_content_length: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            accept_invalid_certs: true,
            auto_referer: true,
            fresh_connect: true,
            verbose: false,
            max_redirects: 10,
            timeout: None,
            user_agent: None,
            cookie_dir: None,
            record_get_info: false,
            marker_on_post: false,
            strict_content_length: false,
        }
    }
}

impl SessionConfig {
    /// Create a new session config
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept invalid certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Enable/disable automatic Referer on redirects
    pub fn auto_referer(mut self, enabled: bool) -> Self {
        self.auto_referer = enabled;
        self
    }

    /// Enable/disable a fresh connection per request
    pub fn fresh_connect(mut self, enabled: bool) -> Self {
        self.fresh_connect = enabled;
        self
    }

    /// Enable/disable connection logging
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Set max redirects
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the cookie file directory
    pub fn cookie_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cookie_dir = Some(dir.into());
        self
    }

    /// Capture diagnostics for GET requests
    pub fn record_get_info(mut self, enabled: bool) -> Self {
        self.record_get_info = enabled;
        self
    }

    /// Send the marker header on POST requests
    pub fn marker_on_post(mut self, enabled: bool) -> Self {
        self.marker_on_post = enabled;
        self
    }

    /// Keep Content-Length consistent with the body actually sent
    pub fn strict_content_length(mut self, enabled: bool) -> Self {
        self.strict_content_length = enabled;
        self
    }

    /// Verified TLS and uniform request handling
    pub fn strict() -> Self {
        Self {
            accept_invalid_certs: false,
            record_get_info: true,
            marker_on_post: true,
            strict_content_length: true,
            ..Default::default()
        }
    }

    /// Directory the cookie file lives in
    pub fn resolved_cookie_dir(&self) -> PathBuf {
        self.cookie_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
