// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-exchange diagnostics

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Diagnostic fields of one request/response exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Final URL (after redirects)
    pub url: String,
    /// Wire method
    pub method: String,
    /// Response status code
    pub http_code: u16,
    /// Response content type
    pub content_type: Option<String>,
    /// Number of redirects followed
    pub redirect_count: u32,
    /// Time from dispatch until the body was read
    pub total_time: Duration,
    /// Request body bytes sent
    pub size_upload: u64,
    /// Response body bytes received
    pub size_download: u64,
    /// Content-Length announced by the server
    pub download_content_length: Option<u64>,
    /// Remote peer address
    pub primary_ip: Option<String>,
    /// Remote peer port
    pub primary_port: Option<u16>,
}

impl RequestInfo {
    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_code)
    }

    /// Whether the exchange ended on a different URL than requested
    pub fn redirected(&self) -> bool {
        self.redirect_count > 0
    }

    /// Total time in milliseconds
    pub fn total_time_ms(&self) -> u64 {
        self.total_time.as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(http_code: u16, redirect_count: u32) -> RequestInfo {
        RequestInfo {
            url: "https://connect.garmin.com/modern/".to_string(),
            method: "POST".to_string(),
            http_code,
            content_type: Some("text/html".to_string()),
            redirect_count,
            total_time: Duration::from_millis(125),
            size_upload: 3,
            size_download: 512,
            download_content_length: Some(512),
            primary_ip: Some("127.0.0.1".to_string()),
            primary_port: Some(443),
        }
    }

    #[test]
    fn test_request_info_status() {
        assert!(info(200, 0).is_success());
        assert!(!info(302, 0).is_success());
        assert!(info(200, 2).redirected());
        assert_eq!(info(200, 0).total_time_ms(), 125);
    }

    #[test]
    fn test_request_info_serializes() {
        let json = serde_json::to_value(info(201, 1)).unwrap();
        assert_eq!(json["http_code"], 201);
        assert_eq!(json["size_upload"], 3);
        assert_eq!(json["primary_port"], 443);
    }
}
