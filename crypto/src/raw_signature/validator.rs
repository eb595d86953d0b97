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

use thiserror::Error;

use crate::{
    openssl::validators::{EcValidator, RsaValidator},
    raw_signature::oids::*,
};

/// A `RawSignatureValidator` implementation checks a signature encoded using a
/// specific signature algorithm and a private/public key pair.
pub trait RawSignatureValidator {
    /// Return `Ok(())` if the signature `sig` is valid for the raw content
    /// `data` and the DER-encoded `SubjectPublicKeyInfo` `public_key`.
    fn validate(
        &self,
        sig: &[u8],
        data: &[u8],
        public_key: &[u8],
    ) -> Result<(), RawSignatureValidationError>;
}

/// Return a built-in signature validator for the signature algorithm
/// identified by `sig_alg` (dotted-decimal OID).
///
/// Returns `None` for algorithms this crate does not verify.
pub fn validator_for_sig_alg(sig_alg: &str) -> Option<Box<dyn RawSignatureValidator>> {
    match sig_alg {
        SHA1_WITH_RSAENCRYPTION_OID => Some(Box::new(RsaValidator::Sha1)),
        SHA256_WITH_RSAENCRYPTION_OID => Some(Box::new(RsaValidator::Sha256)),
        SHA384_WITH_RSAENCRYPTION_OID => Some(Box::new(RsaValidator::Sha384)),
        SHA512_WITH_RSAENCRYPTION_OID => Some(Box::new(RsaValidator::Sha512)),
        ECDSA_WITH_SHA256_OID => Some(Box::new(EcValidator::Sha256)),
        ECDSA_WITH_SHA384_OID => Some(Box::new(EcValidator::Sha384)),
        ECDSA_WITH_SHA512_OID => Some(Box::new(EcValidator::Sha512)),
        _ => None,
    }
}

/// Describes errors that can be identified when validating a raw signature.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum RawSignatureValidationError {
    /// The signature does not match the provided data or public key.
    #[error("the signature does not match the provided data or public key")]
    SignatureMismatch,

    /// An error was reported by the underlying cryptography implementation.
    #[error("an error was reported by the cryptography library: {0}")]
    CryptoLibraryError(String),

    /// An invalid public key was provided.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// An invalid signature value was provided.
    #[error("invalid signature value")]
    InvalidSignature,

    /// The signature uses an unsupported signing or hash algorithm.
    #[error("signature uses an unsupported algorithm ({0})")]
    UnsupportedAlgorithm(String),

    /// An unexpected internal error occured while validating the signature.
    #[error("internal error ({0})")]
    InternalError(String),
}

impl From<openssl::error::ErrorStack> for RawSignatureValidationError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        Self::CryptoLibraryError(err.to_string())
    }
}

impl From<crate::openssl::OpenSslMutexUnavailable> for RawSignatureValidationError {
    fn from(err: crate::openssl::OpenSslMutexUnavailable) -> Self {
        Self::InternalError(err.to_string())
    }
}

/// Verify `sig` over `data` with the algorithm named by `sig_alg`.
pub(crate) fn verify_signature(
    sig_alg: &str,
    sig: &[u8],
    data: &[u8],
    public_key: &[u8],
) -> Result<(), RawSignatureValidationError> {
    let validator = validator_for_sig_alg(sig_alg)
        .ok_or_else(|| RawSignatureValidationError::UnsupportedAlgorithm(sig_alg.to_string()))?;

    validator.validate(sig, data, public_key)
}
