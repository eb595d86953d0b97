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

use rand::RngCore;
use rasn::prelude::*;
use rasn_ocsp::CertId;
use rasn_pkix::{AlgorithmIdentifier, Certificate, Extension, Extensions};

use crate::{hash::sha1, ocsp::OcspError};

const SHA1_OID: &[u32] = &[1, 3, 14, 3, 2, 26];
pub(crate) const NONCE_OID: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 48, 1, 2];
const NONCE_LEN: usize = 16;

/// An encoded OCSP request and what its response must match.
pub(crate) struct PreparedRequest {
    pub der: Vec<u8>,
    pub cert_id: CertId,

    /// Encoded `extnValue` of the nonce extension, if one was sent.
    pub nonce: Option<Vec<u8>>,
}

/// Build the SHA-1 `CertID` of `cert_der` as issued by `issuer_der`.
///
/// Returns `None` if either certificate does not decode.
pub(crate) fn cert_id(cert_der: &[u8], issuer_der: &[u8]) -> Option<CertId> {
    let subject: Certificate = rasn::der::decode(cert_der).ok()?;
    let issuer: Certificate = rasn::der::decode(issuer_der).ok()?;

    let issuer_name_raw = rasn::der::encode(&issuer.tbs_certificate.subject).ok()?;
    let issuer_key_raw = issuer
        .tbs_certificate
        .subject_public_key_info
        .subject_public_key
        .as_raw_slice();

    let sha1_ai = AlgorithmIdentifier {
        algorithm: ObjectIdentifier::new(SHA1_OID)?,
        // Many OCSP responders expect this to be NULL not None.
        parameters: Some(Any::new(rasn::der::encode(&()).ok()?)),
    };

    Some(CertId {
        hash_algorithm: sha1_ai,
        issuer_name_hash: OctetString::from(sha1(&issuer_name_raw)),
        issuer_key_hash: OctetString::from(sha1(issuer_key_raw)),
        serial_number: subject.tbs_certificate.serial_number,
    })
}

/// Encode an unsigned request for `cert_id`, with a random nonce if
/// `send_nonce` is set.
pub(crate) fn build(cert_id: CertId, send_nonce: bool) -> Result<PreparedRequest, OcspError> {
    let nonce = if send_nonce {
        let mut value = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut value);

        let encoded = rasn::der::encode(&OctetString::from(value.to_vec()))
            .map_err(|err| OcspError::Request(err.to_string()))?;
        Some(encoded)
    } else {
        None
    };

    let request_extensions = match &nonce {
        Some(encoded) => {
            let extn_id = ObjectIdentifier::new(NONCE_OID)
                .ok_or_else(|| OcspError::Request("invalid nonce OID".to_string()))?;

            Some(Extensions::from(vec![Extension {
                extn_id,
                critical: false,
                extn_value: OctetString::from(encoded.clone()),
            }]))
        }
        None => None,
    };

    let tbs_request = rasn_ocsp::TbsRequest {
        version: rasn_ocsp::Version::from(0u8),
        requestor_name: None,
        request_list: vec![rasn_ocsp::Request {
            req_cert: cert_id.clone(),
            single_request_extensions: None,
        }],
        request_extensions,
    };

    let ocsp_request = rasn_ocsp::OcspRequest {
        tbs_request,
        optional_signature: None,
    };

    let der =
        rasn::der::encode(&ocsp_request).map_err(|err| OcspError::Request(err.to_string()))?;

    Ok(PreparedRequest {
        der,
        cert_id,
        nonce,
    })
}
