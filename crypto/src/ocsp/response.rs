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

use asn1_rs::{Any, FromDer};
use log::{debug, warn};
use rasn_ocsp::{BasicOcspResponse, CertId, CertStatus, OcspResponseStatus, ResponderId};
use rasn_pkix::Certificate;
use thiserror::Error;
use x509_parser::certificate::X509Certificate;

use crate::{
    hash::sha1,
    ocsp::request::NONCE_OID,
    openssl::{OpenSslMutex, OpenSslMutexUnavailable},
    raw_signature::{verify_signature, RawSignatureValidationError},
    validation_result::ValidationResult,
};

const BASIC_RESPONSE_OID: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 48, 1, 1];

/// Interpret the DER-encoded OCSP response `der` for the certificate
/// identified by `cert_id`.
///
/// `issuer_spki` is the DER-encoded public key of the issuing CA. It signs
/// the response, or it issued the delegated responder certificate embedded
/// in the response.
pub(crate) fn interpret(
    der: &[u8],
    cert_id: &CertId,
    issuer_spki: &[u8],
    expected_nonce: Option<&[u8]>,
) -> ValidationResult {
    let response = match rasn::der::decode::<rasn_ocsp::OcspResponse>(der) {
        Ok(response) => response,
        Err(err) => {
            warn!("undecodable OCSP response: {err}");
            return ValidationResult::ServerError;
        }
    };

    match response.status {
        OcspResponseStatus::Successful => {}
        OcspResponseStatus::MalformedRequest => return ValidationResult::MalformedRequest,
        OcspResponseStatus::InternalError | OcspResponseStatus::TryLater => {
            return ValidationResult::ServerError;
        }
        OcspResponseStatus::SigRequired => return ValidationResult::SigRequired,
        OcspResponseStatus::Unauthorized => return ValidationResult::Unauthorized,
    }

    match verified_status(response, cert_id, issuer_spki, expected_nonce) {
        Ok(result) => result,
        Err(err) => {
            warn!("rejecting OCSP response: {err}");
            ValidationResult::ServerError
        }
    }
}

fn verified_status(
    response: rasn_ocsp::OcspResponse,
    cert_id: &CertId,
    issuer_spki: &[u8],
    expected_nonce: Option<&[u8]>,
) -> Result<ValidationResult, ResponseError> {
    let bytes = response.bytes.ok_or(ResponseError::Malformed)?;
    if bytes.r#type.as_ref() != BASIC_RESPONSE_OID {
        return Err(ResponseError::UnsupportedType(bytes.r#type.to_string()));
    }

    let basic: BasicOcspResponse =
        rasn::der::decode(&bytes.response).map_err(|_| ResponseError::Malformed)?;
    let tbs = tbs_response_data(&bytes.response).ok_or(ResponseError::Malformed)?;

    let signer_key = signer_key(&basic, issuer_spki)?;
    let sig_alg = basic.signature_algorithm.algorithm.to_string();
    verify_signature(&sig_alg, basic.signature.as_raw_slice(), tbs, &signer_key)?;

    let response_data = &basic.tbs_response_data;

    if let Some(expected) = expected_nonce {
        let echoed = response_data
            .response_extensions
            .iter()
            .flat_map(|extensions| extensions.iter())
            .find(|ext| ext.extn_id.as_ref() == NONCE_OID)
            .ok_or(ResponseError::MissingNonce)?;

        if echoed.extn_value.as_ref() != expected {
            return Err(ResponseError::NonceMismatch);
        }
    }

    let Some(single) = response_data
        .responses
        .iter()
        .find(|single| same_certificate(&single.cert_id, cert_id))
    else {
        debug!("OCSP response has no entry for the requested certificate");
        return Ok(ValidationResult::Unknown);
    };

    Ok(match single.cert_status {
        CertStatus::Good => ValidationResult::Valid,
        CertStatus::Revoked(_) => ValidationResult::Revoked,
        CertStatus::Unknown(_) => ValidationResult::Unknown,
    })
}

// The hash algorithm parameters are not compared: responders disagree on
// NULL versus absent.
fn same_certificate(a: &CertId, b: &CertId) -> bool {
    a.hash_algorithm.algorithm == b.hash_algorithm.algorithm
        && a.issuer_name_hash == b.issuer_name_hash
        && a.issuer_key_hash == b.issuer_key_hash
        && a.serial_number == b.serial_number
}

/// Return the encoded `tbsResponseData` of an encoded `BasicOCSPResponse`,
/// exactly as signed.
fn tbs_response_data(basic_der: &[u8]) -> Option<&[u8]> {
    let (_rem, outer) = Any::from_der(basic_der).ok()?;
    let content = outer.data;
    let (rem, _tbs) = Any::from_der(content).ok()?;
    Some(&content[..content.len() - rem.len()])
}

/// Return the public key expected to have signed `basic`.
///
/// An embedded certificate matching the responder ID is accepted only if
/// the issuing CA signed it and it is authorised for OCSP signing.
/// Otherwise the issuing CA must have signed the response itself.
fn signer_key(basic: &BasicOcspResponse, issuer_spki: &[u8]) -> Result<Vec<u8>, ResponseError> {
    let responder_id = &basic.tbs_response_data.responder_id;

    let Some(responder) = basic
        .certs
        .iter()
        .flatten()
        .find(|cert| matches_responder(cert, responder_id))
    else {
        return Ok(issuer_spki.to_vec());
    };

    let responder_spki = rasn::der::encode(&responder.tbs_certificate.subject_public_key_info)
        .map_err(|_| ResponseError::Malformed)?;

    if responder_spki == issuer_spki {
        return Ok(responder_spki);
    }

    let responder_der = rasn::der::encode(responder).map_err(|_| ResponseError::Malformed)?;

    if !issued_by(&responder_der, issuer_spki)? {
        return Err(ResponseError::UntrustedResponder);
    }

    if !has_ocsp_signing(&responder_der) {
        return Err(ResponseError::ResponderNotAuthorized);
    }

    Ok(responder_spki)
}

fn matches_responder(cert: &Certificate, responder_id: &ResponderId) -> bool {
    match responder_id {
        ResponderId::ByName(name) => *name == cert.tbs_certificate.subject,
        ResponderId::ByKey(key_hash) => {
            let key = cert
                .tbs_certificate
                .subject_public_key_info
                .subject_public_key
                .as_raw_slice();
            key_hash.as_ref() == sha1(key).as_slice()
        }
    }
}

fn issued_by(cert_der: &[u8], issuer_spki: &[u8]) -> Result<bool, ResponseError> {
    let _openssl = OpenSslMutex::acquire()?;

    let cert = openssl::x509::X509::from_der(cert_der)?;
    let issuer_key = openssl::pkey::PKey::public_key_from_der(issuer_spki)?;

    Ok(cert.verify(&issuer_key)?)
}

fn has_ocsp_signing(cert_der: &[u8]) -> bool {
    let Ok((_rem, cert)) = X509Certificate::from_der(cert_der) else {
        return false;
    };

    matches!(
        cert.extended_key_usage(),
        Ok(Some(eku)) if eku.value.ocsp_signing
    )
}

#[derive(Debug, Error)]
enum ResponseError {
    #[error("malformed response")]
    Malformed,

    #[error("unsupported response type {0}")]
    UnsupportedType(String),

    #[error("responder certificate not issued by the issuing CA")]
    UntrustedResponder,

    #[error("responder certificate lacks the OCSP signing usage")]
    ResponderNotAuthorized,

    #[error("invalid signature: {0}")]
    Signature(#[from] RawSignatureValidationError),

    #[error("nonce missing from response")]
    MissingNonce,

    #[error("nonce does not match the request")]
    NonceMismatch,

    #[error("crypto library error: {0}")]
    CryptoLibrary(String),
}

impl From<openssl::error::ErrorStack> for ResponseError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        Self::CryptoLibrary(err.to_string())
    }
}

impl From<OpenSslMutexUnavailable> for ResponseError {
    fn from(err: OpenSslMutexUnavailable) -> Self {
        Self::CryptoLibrary(err.to_string())
    }
}
