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

//! AWS SigV4 signing for requests and presigned urls.
//!
//! - [`RequestSigner`] signs a request with the `Authorization` header.
//! - [`UrlSigner`] builds a presigned url carrying the signature in its query.
//!
//! Both are pure functions of the request, the credential, the service info
//! and the signing time. Credentials are loaded by the providers in this crate
//! and glued to a signer by [`amzsign_core::Signer`].
//!
//! ## Example
//!
//! ```no_run
//! use amzsign_aws_v4::{Credential, RequestSigner};
//! use amzsign_core::{Context, RequestDescriptor};
//! use http::Method;
//!
//! # fn main() -> amzsign_core::Result<()> {
//! let ctx = Context::new();
//! let req = RequestDescriptor::new(Method::GET, "https://iam.amazonaws.com/?Action=ListUsers")?;
//! let cred = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//!
//! let signed = RequestSigner::new("iam", "us-east-1").sign(&ctx, &req, &cred)?;
//! println!("{:?}", signed.authorization());
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::{DEFAULT_PRESIGN_EXPIRES, MAX_PRESIGN_EXPIRES};

mod config;
pub use config::{Config, ServiceInfo};

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod options;
pub use options::SigningOptions;

pub mod canonical;
pub use canonical::{canonicalize, CanonicalRequest};

mod scope;
pub use scope::{derive_signing_key, CredentialScope};

mod sign_request;
pub use sign_request::{RequestSigner, SignedRequest};

mod sign_url;
pub use sign_url::{SignedUrl, UrlSigner};
