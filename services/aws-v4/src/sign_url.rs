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

use crate::canonical::{canonical_query_string, canonical_uri, canonicalize, payload_hash};
use crate::canonical::signed_header_names;
use crate::constants::*;
use crate::{Credential, CredentialScope, ServiceInfo, SigningOptions};
use amzsign_core::hash::hex_hmac_sha256;
use amzsign_core::time::{format_iso8601, DateTime};
use amzsign_core::{Context, Error, RequestDescriptor, Result, SignRequest};
use chrono::TimeDelta;
use http::{header, HeaderValue};
use log::debug;
use std::fmt;

/// UrlSigner that implement AWS SigV4 query string signing.
///
/// - [Authenticating Requests: Using Query Parameters](https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html)
///
/// Expiration comes from [`SigningOptions::expires_in`]. Values of zero or
/// above seven days are rejected instead of clamped.
#[derive(Debug, Clone)]
pub struct UrlSigner {
    service_info: ServiceInfo,
    options: SigningOptions,
}

impl UrlSigner {
    /// Create a new url signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self::from_service_info(ServiceInfo::new(region, service))
    }

    /// Create a new url signer from resolved service info.
    pub fn from_service_info(service_info: ServiceInfo) -> Self {
        Self {
            service_info,
            options: SigningOptions::default(),
        }
    }

    /// Replace the signing options.
    pub fn with_options(mut self, options: SigningOptions) -> Self {
        self.options = options;
        self
    }

    /// Build a presigned url for the request.
    pub fn sign(
        &self,
        ctx: &Context,
        req: &RequestDescriptor,
        cred: &Credential,
    ) -> Result<SignedUrl> {
        if cred.access_key_id.is_empty() || cred.secret_access_key.is_empty() {
            return Err(Error::credential_invalid(
                "access key id and secret access key must not be empty",
            ));
        }
        req.validate()?;
        let expires = self.options.presign_expires()?;

        let now = self.options.signing_time(ctx);
        let scope = CredentialScope::new(now, &self.service_info);
        let mut req = req.clone();

        if !req.headers.contains_key(header::HOST) {
            req.headers
                .insert(header::HOST, HeaderValue::from_str(req.authority.as_str())?);
        }
        let signed_headers = signed_header_names(&req.headers, &self.options);

        req.query_push(X_AMZ_ALGORITHM_QUERY, AWS4_HMAC_SHA256);
        req.query_push(
            X_AMZ_CREDENTIAL_QUERY,
            format!("{}/{scope}", cred.access_key_id),
        );
        req.query_push(X_AMZ_DATE_QUERY, format_iso8601(now));
        req.query_push(X_AMZ_EXPIRES_QUERY, expires.as_secs().to_string());
        req.query_push(X_AMZ_SIGNED_HEADERS_QUERY, signed_headers.join(";"));
        if let Some(token) = &cred.session_token {
            req.query_push(X_AMZ_SECURITY_TOKEN_QUERY, token);
        }

        let payload_hash = payload_hash(&req, &self.options)?;
        let creq = canonicalize(&req, &signed_headers, &payload_hash)?;
        debug!("calculated canonical request: {creq}");

        let string_to_sign = scope.string_to_sign(now, &creq);
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = scope.signing_key(&cred.secret_access_key)?;
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes())?;

        // The signature is appended last and never part of the canonical query.
        let url = format!(
            "{}://{}{}?{}&{X_AMZ_SIGNATURE_QUERY}={signature}",
            req.scheme,
            req.authority,
            canonical_uri(&req.path)?,
            canonical_query_string(&req.query),
        );

        let expires_at = TimeDelta::from_std(expires)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| {
                Error::expiration_invalid(format!(
                    "presigned url expiration {}s overflows signing time",
                    expires.as_secs()
                ))
            })?;

        Ok(SignedUrl {
            url,
            signature,
            signing_time: now,
            expires_at,
        })
    }
}

impl SignRequest for UrlSigner {
    type Credential = Credential;
    type Output = SignedUrl;

    fn sign_request(
        &self,
        ctx: &Context,
        req: &RequestDescriptor,
        credential: &Self::Credential,
    ) -> Result<Self::Output> {
        self.sign(ctx, req, credential)
    }
}

/// SignedUrl is a presigned url with its validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    /// Full url including `X-Amz-Signature`.
    pub url: String,
    /// Hex encoded signature.
    pub signature: String,
    /// Instant used for signing.
    pub signing_time: DateTime,
    /// Instant after which the url is refused.
    pub expires_at: DateTime,
}

impl SignedUrl {
    /// Borrow the url.
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
