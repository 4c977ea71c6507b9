// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Outgoing request preparation
//!
//! Every request is reduced to an [`Outgoing`] value before it touches the
//! transport. The header and body precedence rules the target service relies
//! on live here so they can be checked without a network.

use bytes::Bytes;
use reqwest::Method;
use url::form_urlencoded;

use super::headers::{CONTENT_LENGTH, CONTENT_TYPE, METHOD_OVERRIDE, REFERER};
use super::{FORM_CONTENT_TYPE, MARKER_HEADER};

/// Form-urlencode an ordered list of pairs (space becomes `+`)
pub fn encode_pairs<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    serializer.finish()
}

/// Append `?{query}` to a URL when there are parameters
///
/// The URL is not inspected, so a URL that already carries a query string
/// ends up with two `?` separators. Callers combine those themselves.
pub fn append_query<K, V>(url: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if params.is_empty() {
        url.to_string()
    } else {
        format!("{}?{}", url, encode_pairs(params))
    }
}

/// Insert or replace a key in an ordered pair list
fn upsert(pairs: &mut Vec<(String, String)>, key: String, value: String) {
    match pairs.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => pairs.push((key, value)),
    }
}

/// A request ready for dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    /// Wire method
    pub method: Method,
    /// Full URL including any appended query string
    pub url: String,
    /// Headers in the order they are sent
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: Option<Bytes>,
    /// Follow redirects for this call
    pub follow_redirects: bool,
}

impl Outgoing {
    /// GET with the service marker header
    pub fn get<K, V>(url: &str, params: &[(K, V)], follow_redirects: bool) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self {
            method: Method::GET,
            url: append_query(url, params),
            headers: vec![marker()],
            body: None,
            follow_redirects,
        }
    }

    /// DELETE emulated as POST with a method override header
    pub fn delete(url: &str) -> Self {
        Self {
            method: Method::POST,
            url: url.to_string(),
            headers: vec![marker(), (METHOD_OVERRIDE.to_string(), "DELETE".to_string())],
            body: None,
            follow_redirects: true,
        }
    }

    /// Look up the first header with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn marker() -> (String, String) {
    (MARKER_HEADER.0.to_string(), MARKER_HEADER.1.to_string())
}

/// Options for a POST request
///
/// ```rust
/// use garmin_session::PostRequest;
///
/// let request = PostRequest::new()
///     .param("service", "https://connect.garmin.com/modern")
///     .form_field("username", "runner@example.com")
///     .form_field("password", "secret")
///     .referer("https://sso.garmin.com/sso/signin");
/// ```
#[derive(Debug, Clone)]
pub struct PostRequest {
    params: Vec<(String, String)>,
    form: Vec<(String, String)>,
    follow_redirects: bool,
    referer: Option<String>,
    headers: Vec<(String, String)>,
    raw_payload: Option<Bytes>,
}

impl Default for PostRequest {
    fn default() -> Self {
        Self {
            params: Vec::new(),
            form: Vec::new(),
            follow_redirects: true,
            referer: None,
            headers: Vec::new(),
            raw_payload: None,
        }
    }
}

impl PostRequest {
    /// Create an empty POST request
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a query parameter; an existing key keeps its position
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        upsert(&mut self.params, key.into(), value.into());
        self
    }

    /// Set several query parameters
    pub fn params<I, K, V>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        params.into_iter().fold(self, |req, (k, v)| req.param(k, v))
    }

    /// Set a form field; an existing key keeps its position
    pub fn form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        upsert(&mut self.form, key.into(), value.into());
        self
    }

    /// Set several form fields
    pub fn form<I, K, V>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        fields.into_iter().fold(self, |req, (k, v)| req.form_field(k, v))
    }

    /// Follow redirects (default true)
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Set the Referer header
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Add an explicit header
    ///
    /// Once any header is given, the default form Content-Type is no longer
    /// sent.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a raw request body
    pub fn raw_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.raw_payload = Some(payload.into());
        self
    }

    /// Reduce to an [`Outgoing`] request
    ///
    /// A raw payload adds a `Content-Length` header for its own length. Form
    /// fields, when present, replace the raw payload as the body but leave
    /// that header in place unless `strict_content_length` is set.
    /// `with_marker` adds the service marker header.
    pub fn prepare(self, url: &str, with_marker: bool, strict_content_length: bool) -> Outgoing {
        let mut headers = self.headers;
        if headers.is_empty() {
            headers.push((CONTENT_TYPE.to_string(), FORM_CONTENT_TYPE.to_string()));
        }

        let mut body = None;
        let mut payload_length_header = false;
        if let Some(payload) = self.raw_payload.filter(|p| !p.is_empty()) {
            headers.push((CONTENT_LENGTH.to_string(), payload.len().to_string()));
            payload_length_header = true;
            body = Some(payload);
        }

        if !self.form.is_empty() {
            let encoded = encode_pairs(&self.form);
            if strict_content_length && payload_length_header {
                headers.pop();
            }
            body = Some(Bytes::from(encoded));
        }

        if let Some(referer) = self.referer {
            headers.push((REFERER.to_string(), referer));
        }

        if with_marker {
            headers.push(marker());
        }

        Outgoing {
            method: Method::POST,
            url: append_query(url, &self.params),
            headers,
            body,
            follow_redirects: self.follow_redirects,
        }
    }
}
