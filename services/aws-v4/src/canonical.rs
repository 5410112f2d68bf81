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

//! Canonical request construction.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use crate::constants::*;
use crate::SigningOptions;
use amzsign_core::hash::{hex_sha256, EMPTY_STRING_SHA256};
use amzsign_core::{Error, RequestDescriptor, Result};
use http::HeaderMap;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::fmt;

/// CanonicalRequest is the normalized form of a request that gets hashed
/// into the string to sign.
///
/// It is rebuilt for every signing call and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// HTTP method.
    pub method: String,
    /// Encoded path, `/` when empty.
    pub canonical_uri: String,
    /// Encoded and sorted query.
    pub canonical_query_string: String,
    /// `name:value\n` for every signed header, sorted by name.
    pub canonical_headers: String,
    /// Sorted signed header names joined by `;`.
    pub signed_headers: String,
    /// Hex encoded payload hash or `UNSIGNED-PAYLOAD`.
    pub payload_hash: String,
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.canonical_uri)?;
        writeln!(f, "{}", self.canonical_query_string)?;
        // Every header line already ends with '\n'.
        writeln!(f, "{}", self.canonical_headers)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)
    }
}

impl CanonicalRequest {
    /// Hex encoded SHA256 of the canonical request.
    pub fn hashed(&self) -> String {
        hex_sha256(self.to_string().as_bytes())
    }
}

/// Build the canonical request of `req`, signing the headers named in
/// `signed_headers`.
///
/// Header names are matched case-insensitively. Every signed header must be
/// present on the request.
pub fn canonicalize(
    req: &RequestDescriptor,
    signed_headers: &[String],
    payload_hash: &str,
) -> Result<CanonicalRequest> {
    req.validate()?;

    let mut names = signed_headers
        .iter()
        .map(|v| v.to_ascii_lowercase())
        .collect::<Vec<_>>();
    names.sort_unstable();
    names.dedup();

    Ok(CanonicalRequest {
        method: req.method.to_string(),
        canonical_uri: canonical_uri(&req.path)?,
        canonical_query_string: canonical_query_string(&req.query),
        canonical_headers: canonical_headers(&req.headers, &names)?,
        signed_headers: names.join(";"),
        payload_hash: payload_hash.to_string(),
    })
}

/// Encode every path segment on its own.
///
/// Segments are percent-decoded first so that an already encoded path is not
/// encoded twice.
pub fn canonical_uri(path: &str) -> Result<String> {
    if path.is_empty() {
        return Ok("/".to_string());
    }

    let segments = path
        .split('/')
        .map(|seg| -> Result<String> {
            let decoded = percent_decode_str(seg).decode_utf8().map_err(|e| {
                Error::request_invalid(format!("path segment {seg} is not valid utf-8"))
                    .with_source(e)
            })?;
            Ok(utf8_percent_encode(&decoded, &AWS_QUERY_ENCODE_SET).to_string())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(segments.join("/"))
}

/// Encode query pairs and sort them by name, then by value.
pub fn canonical_query_pairs(query: &[(String, String)]) -> Vec<(String, String)> {
    let mut pairs = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort();
    pairs
}

/// Canonical query string: `a=1&a=10&b=2`.
///
/// Parameters without value keep the trailing `=`.
pub fn canonical_query_string(query: &[(String, String)]) -> String {
    canonical_query_pairs(query)
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn canonical_headers(headers: &HeaderMap, names: &[String]) -> Result<String> {
    let mut s = String::with_capacity(names.len() * 32);

    for name in names {
        let mut values = headers.get_all(name.as_str()).iter().peekable();
        if values.peek().is_none() {
            return Err(Error::request_invalid(format!(
                "signed header {name} is missing from request"
            )));
        }

        let values = values
            .map(|v| -> Result<String> {
                let v = std::str::from_utf8(v.as_bytes()).map_err(|e| {
                    Error::request_invalid(format!("value of header {name} is not valid utf-8"))
                        .with_source(e)
                })?;
                Ok(normalize_header_value(v))
            })
            .collect::<Result<Vec<_>>>()?;

        s.push_str(name);
        s.push(':');
        s.push_str(&values.join(","));
        s.push('\n');
    }

    Ok(s)
}

/// Trim a header value and fold whitespace runs into one space.
///
/// Whitespace inside double-quoted segments is kept as is.
pub fn normalize_header_value(value: &str) -> String {
    let mut s = String::with_capacity(value.len());
    let mut in_quotes = false;
    let mut pending_space = false;

    for c in value.trim_matches(|c| c == ' ' || c == '\t').chars() {
        if !in_quotes && (c == ' ' || c == '\t') {
            pending_space = true;
            continue;
        }
        if pending_space {
            s.push(' ');
            pending_space = false;
        }
        if c == '"' {
            in_quotes = !in_quotes;
        }
        s.push(c);
    }

    s
}

/// Names of the headers to sign, lower-cased and sorted.
pub fn signed_header_names(headers: &HeaderMap, options: &SigningOptions) -> Vec<String> {
    let mut names = headers
        .keys()
        .map(|k| k.as_str())
        .filter(|k| !options.is_unsignable(k))
        .map(|k| k.to_string())
        .collect::<Vec<_>>();
    names.sort_unstable();
    names.dedup();
    names
}

/// Hash of the payload to put at the end of the canonical request.
///
/// A caller supplied `x-amz-content-sha256` header always wins. Otherwise the
/// payload is hashed, or `UNSIGNED-PAYLOAD` is used if asked to.
pub fn payload_hash(req: &RequestDescriptor, options: &SigningOptions) -> Result<String> {
    let payload = req.payload()?;

    if let Some(v) = req.headers.get(X_AMZ_CONTENT_SHA_256) {
        return Ok(v.to_str()?.to_string());
    }
    if options.unsigned_payload {
        return Ok(UNSIGNED_PAYLOAD.to_string());
    }

    Ok(match payload {
        Some(bs) if !bs.is_empty() => hex_sha256(bs),
        _ => EMPTY_STRING_SHA256.to_string(),
    })
}
