// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP transport layer for the session client
//!
//! Provides the owned transport handle, a file-backed cookie jar and the
//! request preparation rules the target service depends on.

mod cookie;
mod request;
mod response;
mod transport;

pub use cookie::{Cookie, CookieJar, SameSite};
pub use request::{append_query, encode_pairs, Outgoing, PostRequest};
pub use response::RequestInfo;
pub use transport::{Exchange, Transport};

/// Content type used for form bodies and as the POST default
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Application marker the target service expects on GET and DELETE
pub const MARKER_HEADER: (&str, &str) = ("NK", "NT");

/// Common HTTP headers
pub mod headers {
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const CONTENT_LENGTH: &str = "Content-Length";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const REFERER: &str = "Referer";
    pub const METHOD_OVERRIDE: &str = "X-HTTP-Method-Override";
}
