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

use std::fmt::Write;

use bytes::Bytes;
use http::header::HeaderName;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

use crate::Error;
use crate::Result;

/// RFC 3986 unreserved characters are kept, everything else is encoded.
static UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Description of an HTTP request to be signed.
///
/// Query parameters are stored percent-decoded, in their original order, and
/// duplicates are kept. Headers live in a [`HeaderMap`], so names are
/// case-insensitive and a name may carry several values.
///
/// `body` and `data` are two ways of passing a payload. They are mutually
/// exclusive: [`RequestDescriptor::validate`] rejects a descriptor that sets
/// both, and signing refuses it as well.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, as it appears in the URL.
    pub path: String,
    /// HTTP query parameters, percent-decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Pre-serialized request body.
    pub body: Option<Bytes>,
    /// Raw request data.
    pub data: Option<Bytes>,
}

impl RequestDescriptor {
    /// Build a descriptor from method and url.
    pub fn new(method: Method, url: &str) -> Result<Self> {
        let uri = url
            .parse::<Uri>()
            .map_err(|e| Error::request_invalid(format!("malformed url: {url}")).with_source(e))?;
        Self::from_uri(method, uri)
    }

    /// Build a descriptor from method and parsed uri.
    pub fn from_uri(method: Method, uri: Uri) -> Result<Self> {
        let uri = uri.into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(RequestDescriptor {
            method,
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            headers: HeaderMap::new(),
            body: None,
            data: None,
        })
    }

    /// Build a descriptor from http::request::Parts.
    ///
    /// The payload is not part of `Parts`; attach it with
    /// [`RequestDescriptor::with_body`] or [`RequestDescriptor::with_data`].
    pub fn from_parts(parts: &http::request::Parts) -> Result<Self> {
        let mut req = Self::from_uri(parts.method.clone(), parts.uri.clone())?;
        req.headers = parts.headers.clone();
        Ok(req)
    }

    /// Append a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        self.headers.append(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
        Ok(self)
    }

    /// Set the pre-serialized body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the raw data payload.
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Check that the descriptor can be signed.
    pub fn validate(&self) -> Result<()> {
        if self.body.is_some() && self.data.is_some() {
            return Err(Error::payload_conflict(
                "request sets both body and data, only one payload is allowed",
            ));
        }
        Ok(())
    }

    /// The payload to sign, if any.
    pub fn payload(&self) -> Result<Option<&[u8]>> {
        self.validate()?;
        Ok(self.body.as_deref().or(self.data.as_deref()))
    }

    /// Render query pairs as `k=v&k2=v2`.
    ///
    /// Pairs are written as given; empty values are written without `=`.
    pub fn query_to_string(query: &[(String, String)]) -> String {
        let mut s = String::with_capacity(
            query.iter().map(|(k, v)| k.len() + v.len() + 2).sum::<usize>(),
        );

        for (idx, (k, v)) in query.iter().enumerate() {
            if idx != 0 {
                s.push('&');
            }

            s.push_str(k);
            if !v.is_empty() {
                s.push('=');
                s.push_str(v);
            }
        }

        s
    }

    /// Full url of this request with the query re-encoded.
    pub fn url(&self) -> String {
        let mut s = format!("{}://{}{}", self.scheme, self.authority, self.path);
        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(k, v)| {
                    (
                        utf8_percent_encode(k, UNRESERVED).to_string(),
                        utf8_percent_encode(v, UNRESERVED).to_string(),
                    )
                })
                .collect::<Vec<_>>();
            // Writing into a String never fails.
            let _ = write!(s, "?{}", Self::query_to_string(&query));
        }
        s
    }

    /// Convert into an `http::Request` carrying the payload.
    pub fn into_http_request(self) -> Result<http::Request<Bytes>> {
        self.validate()?;

        let uri = self.url();
        let mut req = http::Request::builder()
            .method(self.method)
            .uri(uri)
            .body(self.body.or(self.data).unwrap_or_default())?;
        *req.headers_mut() = self.headers;

        Ok(req)
    }
}
