// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.
//!
//! Signing never reads the system time directly: it asks a [`Clock`] carried
//! by [`crate::Context`], which keeps signing deterministic under test.

use crate::Error;
use crate::Result;
use chrono::NaiveDateTime;
use chrono::TimeDelta;
use chrono::Utc;
use std::fmt::Debug;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Differences beyond this many seconds between local and server time are
/// treated as clock skew.
pub const MAX_CLOCK_SKEW_SECONDS: i64 = 5 * 60;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// DATE is the format of date: "20220313"
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// ISO8601 basic format: "20220313T072004Z"
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Parse ISO8601 basic format: "20220313T072004Z"
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%SZ")
        .map(|t| t.and_utc())
        .map_err(|e| {
            Error::request_invalid(format!("parse '{s}' into iso8601 failed")).with_source(e)
        })
}

/// Parse an HTTP `Date` header: "Sun, 30 Aug 2015 12:36:00 GMT"
pub fn parse_rfc2822(s: &str) -> Result<DateTime> {
    chrono::DateTime::parse_from_rfc2822(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            Error::request_invalid(format!("parse '{s}' into rfc2822 failed")).with_source(e)
        })
}

/// Offset that must be added to `local` to reach `server`.
///
/// Feed the result into [`SystemClock::with_offset`] after a service rejected
/// a request for clock skew.
pub fn clock_offset(server: DateTime, local: DateTime) -> TimeDelta {
    server - local
}

/// Returns true if `server` and `local` disagree by more than five minutes.
pub fn is_clock_skewed(server: DateTime, local: DateTime) -> bool {
    (server - local).num_seconds().abs() > MAX_CLOCK_SKEW_SECONDS
}

/// Clock supplies the current time used for signing.
///
/// Implementations must be safe to read from many threads at once.
pub trait Clock: Debug + Send + Sync + 'static {
    /// Current time, with any configured correction already applied.
    fn now(&self) -> DateTime;
}

/// SystemClock reads the system time and applies a fixed offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: TimeDelta,
}

impl SystemClock {
    /// Create a system clock without offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a system clock corrected by `offset`.
    pub fn with_offset(offset: TimeDelta) -> Self {
        Self { offset }
    }

    /// The configured offset.
    pub fn offset(&self) -> TimeDelta {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        now() + self.offset
    }
}

/// FixedClock always returns the same instant.
///
/// This is useful for testing.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime);

impl Clock for FixedClock {
    fn now(&self) -> DateTime {
        self.0
    }
}
