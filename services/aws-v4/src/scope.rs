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

use crate::canonical::CanonicalRequest;
use crate::constants::{AWS4_HMAC_SHA256, AWS4_REQUEST};
use crate::ServiceInfo;
use amzsign_core::hash::hmac_sha256;
use amzsign_core::time::{format_date, format_iso8601, DateTime};
use amzsign_core::Result;
use std::fmt;

/// CredentialScope binds a signature to a day, a region and a service.
///
/// Its string form is `<yyyymmdd>/<region>/<service>/aws4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    /// Signing date in `yyyymmdd`.
    pub date: String,
    /// Signing region.
    pub region: String,
    /// Signing service.
    pub service: String,
}

impl CredentialScope {
    /// Build the scope for signing at `time`.
    pub fn new(time: DateTime, info: &ServiceInfo) -> Self {
        Self {
            date: format_date(time),
            region: info.region.clone(),
            service: info.service.clone(),
        }
    }

    /// Derive the signing key of this scope.
    pub fn signing_key(&self, secret_access_key: &str) -> Result<Vec<u8>> {
        derive_signing_key(
            secret_access_key,
            &self.date,
            &self.region,
            &self.service,
        )
    }

    /// Build the string to sign for `creq` signed at `time`.
    pub fn string_to_sign(&self, time: DateTime, creq: &CanonicalRequest) -> String {
        format!(
            "{AWS4_HMAC_SHA256}\n{}\n{self}\n{}",
            format_iso8601(time),
            creq.hashed()
        )
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{AWS4_REQUEST}",
            self.date, self.region, self.service
        )
    }
}

/// Derive the SigV4 signing key.
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
pub fn derive_signing_key(
    secret_access_key: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>> {
    let secret = format!("AWS4{secret_access_key}");
    let k_date = hmac_sha256(secret.as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, AWS4_REQUEST.as_bytes())
}
