// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The owned transport handle

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use parking_lot::RwLock;
use reqwest::blocking::Client;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::redirect::Policy;
use url::Url;

use super::cookie::CookieJar;
use super::request::Outgoing;
use super::response::RequestInfo;
use crate::error::{Error, Result};
use crate::session::SessionConfig;

/// Redirect behaviour for the request in flight
///
/// Written right before each dispatch and read by the redirect policy, which
/// is fixed when the client is built.
#[derive(Debug)]
struct RedirectSwitch {
    follow: bool,
    max: usize,
    followed: u32,
}

/// Result of a completed exchange
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Response status code
    pub status: u16,
    /// Raw response body
    pub body: Bytes,
    /// Exchange diagnostics
    pub info: RequestInfo,
}

/// A configured blocking HTTP client bound to one cookie file
pub struct Transport {
    client: Client,
    cookie_jar: CookieJar,
    cookie_path: PathBuf,
    redirects: Arc<RwLock<RedirectSwitch>>,
}

impl Transport {
    /// Build a transport, loading cookies from `cookie_path` if present
    pub fn open(config: &SessionConfig, cookie_path: &Path) -> Result<Self> {
        let cookie_jar = CookieJar::load(cookie_path).unwrap_or_else(|e| {
            tracing::warn!(
                path = %cookie_path.display(),
                error = %e,
                "Ignoring unreadable cookie file"
            );
            CookieJar::new()
        });

        let redirects = Arc::new(RwLock::new(RedirectSwitch {
            follow: true,
            max: config.max_redirects,
            followed: 0,
        }));

        let switch = Arc::clone(&redirects);
        let policy = Policy::custom(move |attempt| {
            let mut state = switch.write();
            let hops = attempt.previous().len();
            if !state.follow {
                attempt.stop()
            } else if hops > state.max {
                attempt.error(format!("too many redirects (max {})", state.max))
            } else {
                state.followed = hops as u32;
                attempt.follow()
            }
        });

        let mut builder = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .referer(config.auto_referer)
            .connection_verbose(config.verbose)
            .redirect(policy)
            .cookie_provider(Arc::new(cookie_jar.clone()));

        if config.fresh_connect {
            builder = builder.pool_max_idle_per_host(0);
        }

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(ref user_agent) = config.user_agent {
            let value = HeaderValue::from_str(user_agent)
                .map_err(|e| Error::Config(format!("Invalid user agent: {}", e)))?;
            builder = builder.user_agent(value);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            cookie_jar,
            cookie_path: cookie_path.to_path_buf(),
            redirects,
        })
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Send a request and block until the whole body has been read
    ///
    /// Cookies are written back to the cookie file whether or not the
    /// exchange succeeded, since redirects may have set some on the way.
    pub fn dispatch(&mut self, outgoing: Outgoing) -> Result<Exchange> {
        let result = self.exchange(outgoing);
        if let Err(e) = self.cookie_jar.save(&self.cookie_path) {
            tracing::warn!(
                path = %self.cookie_path.display(),
                error = %e,
                "Failed to persist cookies"
            );
        }
        result
    }

    fn exchange(&mut self, outgoing: Outgoing) -> Result<Exchange> {
        let url = Url::parse(&outgoing.url)?;

        let mut headers = Vec::with_capacity(outgoing.headers.len());
        for (name, value) in &outgoing.headers {
            let header_name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|e| Error::header(name.as_str(), e))?;
            let header_value =
                HeaderValue::from_str(value.trim()).map_err(|e| Error::header(name.as_str(), e))?;
            headers.push((header_name, header_value));
        }

        {
            let mut switch = self.redirects.write();
            switch.follow = outgoing.follow_redirects;
            switch.followed = 0;
        }

        tracing::debug!(
            method = %outgoing.method,
            url = %url,
            follow_redirects = outgoing.follow_redirects,
            "Request"
        );

        let method = outgoing.method;
        let size_upload = outgoing.body.as_ref().map_or(0, |b| b.len() as u64);

        let mut builder = self.client.request(method.clone(), url);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = outgoing.body {
            builder = builder.body(body.to_vec());
        }

        let start = Instant::now();
        let response = builder.send()?;

        let status = response.status();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let download_content_length = response.content_length();
        let remote = response.remote_addr();

        let body = response.bytes()?;
        let total_time = start.elapsed();

        let info = RequestInfo {
            url: final_url,
            method: method.to_string(),
            http_code: status.as_u16(),
            content_type,
            redirect_count: self.redirects.read().followed,
            total_time,
            size_upload,
            size_download: body.len() as u64,
            download_content_length,
            primary_ip: remote.map(|addr| addr.ip().to_string()),
            primary_port: remote.map(|addr| addr.port()),
        };

        tracing::debug!(
            url = %info.url,
            status = info.http_code,
            time_ms = info.total_time_ms(),
            bytes = info.size_download,
            "Response"
        );

        Ok(Exchange {
            status: status.as_u16(),
            body,
            info,
        })
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("cookie_path", &self.cookie_path)
            .field("cookies", &self.cookie_jar.len())
            .finish_non_exhaustive()
    }
}
