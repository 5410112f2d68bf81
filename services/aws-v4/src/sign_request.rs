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

use crate::canonical::{canonicalize, payload_hash, signed_header_names};
use crate::constants::{AWS4_HMAC_SHA256, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN};
use crate::{Credential, CredentialScope, ServiceInfo, SigningOptions};
use amzsign_core::hash::hex_hmac_sha256;
use amzsign_core::time::{format_iso8601, DateTime};
use amzsign_core::{Context, Error, RequestDescriptor, Result, SignRequest};
use bytes::Bytes;
use http::{header, HeaderValue};
use log::debug;

/// RequestSigner that implement AWS SigV4 header signing.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The signer never mutates the input request. Each call derives the
/// signing key from scratch.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service_info: ServiceInfo,
    options: SigningOptions,
}

impl RequestSigner {
    /// Create a new signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self::from_service_info(ServiceInfo::new(region, service))
    }

    /// Create a new signer from resolved service info.
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

    /// Sign the request with the given credential.
    ///
    /// The returned request carries `host`, `x-amz-date`, `authorization`
    /// and, when a session token is present, `x-amz-security-token`.
    pub fn sign(
        &self,
        ctx: &Context,
        req: &RequestDescriptor,
        cred: &Credential,
    ) -> Result<SignedRequest> {
        if cred.access_key_id.is_empty() || cred.secret_access_key.is_empty() {
            return Err(Error::credential_invalid(
                "access key id and secret access key must not be empty",
            ));
        }
        req.validate()?;

        let now = self.options.signing_time(ctx);
        let mut req = req.clone();

        if !req.headers.contains_key(header::HOST) {
            req.headers
                .insert(header::HOST, HeaderValue::from_str(req.authority.as_str())?);
        }
        req.headers
            .insert(X_AMZ_DATE, HeaderValue::from_str(&format_iso8601(now))?);
        if let Some(token) = &cred.session_token {
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            req.headers.insert(X_AMZ_SECURITY_TOKEN, value);
        }

        let payload_hash = payload_hash(&req, &self.options)?;
        if self.options.content_sha256_header && !req.headers.contains_key(X_AMZ_CONTENT_SHA_256) {
            req.headers
                .insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(&payload_hash)?);
        }

        let signed_headers = signed_header_names(&req.headers, &self.options);
        let creq = canonicalize(&req, &signed_headers, &payload_hash)?;
        debug!("calculated canonical request: {creq}");

        let scope = CredentialScope::new(now, &self.service_info);
        debug!("calculated scope: {scope}");

        let string_to_sign = scope.string_to_sign(now, &creq);
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = scope.signing_key(&cred.secret_access_key)?;
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes())?;

        let mut authorization = HeaderValue::from_str(&format!(
            "{AWS4_HMAC_SHA256} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
            cred.access_key_id, creq.signed_headers,
        ))?;
        authorization.set_sensitive(true);
        req.headers.insert(header::AUTHORIZATION, authorization);

        Ok(SignedRequest {
            request: req,
            signature,
            signed_headers: creq.signed_headers,
            scope,
            signing_time: now,
        })
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;
    type Output = SignedRequest;

    fn sign_request(
        &self,
        ctx: &Context,
        req: &RequestDescriptor,
        credential: &Self::Credential,
    ) -> Result<Self::Output> {
        self.sign(ctx, req, credential)
    }
}

/// SignedRequest is a request ready to be sent.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// The request with signing headers applied.
    pub request: RequestDescriptor,
    /// Hex encoded signature.
    pub signature: String,
    /// Signed header names joined by `;`.
    pub signed_headers: String,
    /// Scope the signature is bound to.
    pub scope: CredentialScope,
    /// Instant used for signing.
    pub signing_time: DateTime,
}

impl SignedRequest {
    /// Value of the `authorization` header.
    pub fn authorization(&self) -> Option<&str> {
        self.request
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Convert into an `http::Request` carrying the payload.
    pub fn into_http_request(self) -> Result<http::Request<Bytes>> {
        self.request.into_http_request()
    }
}
