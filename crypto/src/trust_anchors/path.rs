// Copyright 2024 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use openssl::{
    stack::Stack,
    x509::{
        store::X509StoreBuilder,
        verify::{X509VerifyFlags, X509VerifyParam},
        X509StoreContext, X509,
    },
};
use thiserror::Error;

use crate::{openssl::OpenSslMutex, trust_anchors::TrustAnchorError};

pub(super) fn verify_path(
    roots: &[&[u8]],
    sub_der: &[u8],
    leaf_der: &[u8],
    at_epoch: Option<i64>,
) -> Result<(), PathValidationError> {
    let _openssl = OpenSslMutex::acquire()?;

    let leaf = X509::from_der(leaf_der).map_err(|_| PathValidationError::InvalidCertificate)?;

    let mut chain = Stack::new()?;
    chain.push(X509::from_der(sub_der)?)?;

    let mut builder = X509StoreBuilder::new()?;

    let mut verify_param = X509VerifyParam::new()?;
    verify_param.set_flags(X509VerifyFlags::X509_STRICT)?;
    if let Some(at) = at_epoch {
        verify_param.set_time(at);
    }
    builder.set_param(&verify_param)?;

    if roots.is_empty() {
        return Err(PathValidationError::Rejected {
            reason: "no root anchors configured".to_string(),
        });
    }

    for der in roots {
        builder.add_cert(X509::from_der(der)?)?;
    }

    let store = builder.build();

    let mut store_ctx = X509StoreContext::new()?;
    let outcome = store_ctx.init(&store, &leaf, &chain, |ctx| {
        let ok = ctx.verify_cert()?;
        Ok((ok, ctx.error().error_string().to_string()))
    })?;

    match outcome {
        (true, _) => Ok(()),
        (false, reason) => Err(PathValidationError::Rejected { reason }),
    }
}

/// Describes why a certification path could not be validated.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum PathValidationError {
    /// Path validation ran and failed.
    #[error("certification path rejected: {reason}")]
    Rejected {
        /// Verification failure reported by the path builder.
        reason: String,
    },

    /// The end-entity certificate could not be decoded.
    #[error("the certificate could not be decoded")]
    InvalidCertificate,

    /// The trust anchors for the requested ecosystem are unavailable.
    #[error(transparent)]
    TrustAnchor(#[from] TrustAnchorError),

    /// An error was reported by the underlying cryptography implementation.
    #[error("an error was reported by the cryptography library: {0}")]
    CryptoLibraryError(String),

    /// An unexpected internal error occured.
    #[error("internal error ({0})")]
    InternalError(String),
}

impl From<openssl::error::ErrorStack> for PathValidationError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        Self::CryptoLibraryError(err.to_string())
    }
}

impl From<crate::openssl::OpenSslMutexUnavailable> for PathValidationError {
    fn from(err: crate::openssl::OpenSslMutexUnavailable) -> Self {
        Self::InternalError(err.to_string())
    }
}
