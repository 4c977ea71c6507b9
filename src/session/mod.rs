// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session API
//!
//! One [`SessionClient`] per account identifier.

mod client;
mod config;

pub use client::{SessionClient, COOKIE_FILE_PREFIX, NO_STATUS};
pub use config::SessionConfig;
