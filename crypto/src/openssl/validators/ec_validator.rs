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

use openssl::{ec::EcKey, hash::MessageDigest, pkey::PKey, sign::Verifier};

use crate::{
    openssl::OpenSslMutex,
    raw_signature::{RawSignatureValidationError, RawSignatureValidator},
};

/// Validates DER-encoded ECDSA signatures.
pub(crate) enum EcValidator {
    Sha256,
    Sha384,
    Sha512,
}

impl RawSignatureValidator for EcValidator {
    fn validate(
        &self,
        sig: &[u8],
        data: &[u8],
        public_key: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        let _openssl = OpenSslMutex::acquire()?;

        let public_key = EcKey::public_key_from_der(public_key)
            .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;
        let key = PKey::from_ec_key(public_key)?;

        let mut verifier = match self {
            Self::Sha256 => Verifier::new(MessageDigest::sha256(), &key)?,
            Self::Sha384 => Verifier::new(MessageDigest::sha384(), &key)?,
            Self::Sha512 => Verifier::new(MessageDigest::sha512(), &key)?,
        };

        verifier.update(data)?;

        // OpenSSL reports a malformed DER signature as an error rather than a
        // mismatch.
        match verifier.verify(sig) {
            Ok(true) => Ok(()),
            Ok(false) => Err(RawSignatureValidationError::SignatureMismatch),
            Err(_) => Err(RawSignatureValidationError::InvalidSignature),
        }
    }
}
