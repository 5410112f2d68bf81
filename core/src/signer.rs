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

use crate::SigningCredential;
use crate::{Context, Error, ProvideCredential, RequestDescriptor, Result, SignRequest};
use log::debug;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Signer is the main struct used to sign the request.
///
/// It loads a credential through its provider on every call and hands it to
/// the request signer. Nothing is cached between calls.
pub struct Signer<K: SigningCredential, O: 'static> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K, Output = O>>,
}

impl<K: SigningCredential, O: 'static> Debug for Signer<K, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("ctx", &self.ctx)
            .field("loader", &self.loader)
            .field("builder", &self.builder)
            .finish()
    }
}

impl<K: SigningCredential, O: 'static> Clone for Signer<K, O> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            loader: self.loader.clone(),
            builder: self.builder.clone(),
        }
    }
}

impl<K: SigningCredential, O: 'static> Signer<K, O> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K, Output = O>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
        }
    }

    /// The context this signer runs in.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Signing request.
    pub async fn sign(&self, req: &RequestDescriptor) -> Result<O> {
        let cred = self
            .loader
            .provide_credential(&self.ctx)
            .await?
            .ok_or_else(|| Error::credential_invalid("no credential could be loaded"))?;
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "loaded credential is missing required fields",
            ));
        }
        debug!("loaded credential: {cred:?}");

        self.builder.sign_request(&self.ctx, req, &cred)
    }
}
