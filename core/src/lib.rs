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

//! Core components for signing AWS requests.
//!
//! This crate provides the service-agnostic building blocks shared by the
//! amzsign signers:
//!
//! - [`RequestDescriptor`]: the request to be signed.
//! - [`Context`]: the clock and environment signing runs in.
//! - Traits at the seams: [`SigningCredential`], [`ProvideCredential`] and
//!   [`SignRequest`].
//! - [`Signer`]: ties a credential provider to a request signer.
//!
//! ## Utilities
//!
//! - [`hash`]: SHA256 and HMAC-SHA256 helpers.
//! - [`time`]: time formatting and the [`time::Clock`] abstraction.
//! - [`utils`]: redaction of secrets for logging.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
mod env;
pub use env::Env;
pub use env::OsEnv;
pub use env::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::RequestDescriptor;
mod signer;
pub use signer::Signer;
