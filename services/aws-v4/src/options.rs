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

use crate::constants::*;
use amzsign_core::time::DateTime;
use amzsign_core::{Context, Error, Result};
use std::collections::BTreeSet;
use std::time::Duration;

/// Options that tune how a request or url is signed.
///
/// ```
/// use amzsign_aws_v4::SigningOptions;
/// use std::time::Duration;
///
/// let opts = SigningOptions::new()
///     .with_unsignable_header("X-Custom-Proxy")
///     .with_expires_in(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SigningOptions {
    /// Sign at this instant instead of asking the context clock.
    pub signing_date: Option<DateTime>,
    /// Extra header names, lower-cased, that must not be signed.
    pub unsignable_headers: BTreeSet<String>,
    /// How long a presigned url stays valid.
    ///
    /// Defaults to 15 minutes. Ignored by header signing.
    pub expires_in: Option<Duration>,
    /// Use `UNSIGNED-PAYLOAD` instead of hashing the payload.
    pub unsigned_payload: bool,
    /// Send the payload hash in a signed `x-amz-content-sha256` header.
    ///
    /// Required by S3 for header signing.
    pub content_sha256_header: bool,
}

impl SigningOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign at the given instant.
    pub fn with_signing_date(mut self, time: DateTime) -> Self {
        self.signing_date = Some(time);
        self
    }

    /// Exclude one more header from signing.
    pub fn with_unsignable_header(mut self, name: &str) -> Self {
        self.unsignable_headers.insert(name.to_ascii_lowercase());
        self
    }

    /// Set the presign expiration.
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Don't hash the payload.
    pub fn with_unsigned_payload(mut self) -> Self {
        self.unsigned_payload = true;
        self
    }

    /// Emit the `x-amz-content-sha256` header.
    pub fn with_content_sha256_header(mut self) -> Self {
        self.content_sha256_header = true;
        self
    }

    pub(crate) fn signing_time(&self, ctx: &Context) -> DateTime {
        self.signing_date.unwrap_or_else(|| ctx.now())
    }

    /// Check if the header with this lower-cased name stays out of the signature.
    pub(crate) fn is_unsignable(&self, name: &str) -> bool {
        if matches!(name, "host" | X_AMZ_DATE | X_AMZ_SECURITY_TOKEN) {
            return false;
        }

        DEFAULT_UNSIGNABLE_HEADERS.contains(&name) || self.unsignable_headers.contains(name)
    }

    /// The presign expiration to embed in `X-Amz-Expires`.
    pub(crate) fn presign_expires(&self) -> Result<Duration> {
        let expires = self.expires_in.unwrap_or(DEFAULT_PRESIGN_EXPIRES);

        if expires.as_secs() == 0 {
            return Err(Error::expiration_invalid(
                "presigned url must be valid for at least one second",
            ));
        }
        if expires > MAX_PRESIGN_EXPIRES {
            return Err(Error::expiration_invalid(format!(
                "presigned url expiration {}s exceeds the maximum of {}s",
                expires.as_secs(),
                MAX_PRESIGN_EXPIRES.as_secs()
            )));
        }

        Ok(expires)
    }
}
