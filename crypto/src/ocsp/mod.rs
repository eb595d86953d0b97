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

//! OCSP-based revocation checking.

use http::{header, Method, Request};
use log::{info, warn};
use thiserror::Error;
use x509_parser::{
    certificate::X509Certificate,
    extensions::{GeneralName, ParsedExtension},
    prelude::FromDer,
};

use crate::{
    certificate::{
        classify_der,
        oids::{AD_OCSP_OID, AUTHORITY_INFO_ACCESS_OID},
    },
    http::{read_body, HttpResolverError, SyncHttpResolver},
    settings::{FallbackResponders, Settings},
    validation_result::ValidationResult,
};

mod request;
mod response;

/// Queries OCSP responders about certificates.
pub struct OcspChecker<H> {
    http: H,
    send_nonce: bool,
    fallback_responders: FallbackResponders,
    max_response_size: usize,
}

impl<H: SyncHttpResolver> OcspChecker<H> {
    /// Create a checker sending requests through `http`.
    pub fn new(http: H, settings: &Settings) -> Self {
        Self {
            http,
            send_nonce: settings.ocsp.send_nonce,
            fallback_responders: settings.ocsp.fallback_responders.clone(),
            max_response_size: settings.network.max_response_size,
        }
    }

    /// Return the revocation status of the DER-encoded certificate
    /// `cert_der`, issued by the DER-encoded certificate `issuer_der`.
    ///
    /// The responder is taken from the certificate's Authority Information
    /// Access extension, or else from the fallback responder configured for
    /// its ecosystem.
    ///
    /// A timeout is returned as [`OcspError::Timeout`] rather than as a
    /// [`ValidationResult`] so that callers can fall back to CRLs.
    pub fn check_ocsp(
        &self,
        cert_der: &[u8],
        issuer_der: &[u8],
    ) -> Result<ValidationResult, OcspError> {
        let Ok((_rem, cert)) = X509Certificate::from_der(cert_der) else {
            return Ok(ValidationResult::Corrupt);
        };

        let url = match ocsp_responders(&cert).into_iter().next() {
            Some(url) => url,
            None => classify_der(cert_der)
                .ok()
                .and_then(|(ecosystem, _)| self.fallback_responders.get(ecosystem))
                .map(str::to_string)
                .ok_or(OcspError::NoResponder)?,
        };

        self.check_with_responder(cert_der, issuer_der, &url)
    }

    /// Like [`check_ocsp`](Self::check_ocsp), but ask the responder at
    /// `url`.
    pub fn check_with_responder(
        &self,
        cert_der: &[u8],
        issuer_der: &[u8],
        url: &str,
    ) -> Result<ValidationResult, OcspError> {
        let Some(cert_id) = request::cert_id(cert_der, issuer_der) else {
            return Ok(ValidationResult::Corrupt);
        };

        let Some(issuer_spki) = issuer_public_key(issuer_der) else {
            return Ok(ValidationResult::Corrupt);
        };

        let prepared = request::build(cert_id, self.send_nonce)?;

        let request = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(header::CONTENT_TYPE, "application/ocsp-request")
            .header(header::ACCEPT, "application/ocsp-response")
            .body(prepared.der)
            .map_err(|err| OcspError::transport(url, err.into()))?;

        let response = self
            .http
            .http_resolve(request)
            .map_err(|err| OcspError::transport(url, err))?;

        let status = response.status();
        if !status.is_success() {
            warn!("OCSP responder {url} answered with HTTP status {status}");
            return Err(OcspError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = read_body(response, self.max_response_size, url)
            .map_err(|err| OcspError::transport(url, err))?;

        let result = response::interpret(
            &body,
            &prepared.cert_id,
            &issuer_spki,
            prepared.nonce.as_deref(),
        );

        info!("OCSP responder {url} reports {result}");
        Ok(result)
    }
}

/// Interpret a DER-encoded OCSP response obtained elsewhere, for example
/// stapled to a signature.
///
/// `expected_nonce` is the encoded `extnValue` of the nonce extension sent
/// with the request, if any.
pub fn verify_response(
    response_der: &[u8],
    cert_der: &[u8],
    issuer_der: &[u8],
    expected_nonce: Option<&[u8]>,
) -> ValidationResult {
    let Some(cert_id) = request::cert_id(cert_der, issuer_der) else {
        return ValidationResult::Corrupt;
    };

    let Some(issuer_spki) = issuer_public_key(issuer_der) else {
        return ValidationResult::Corrupt;
    };

    response::interpret(response_der, &cert_id, &issuer_spki, expected_nonce)
}

/// Return the OCSP responder URLs listed in the Authority Information
/// Access extension of `cert`.
pub fn ocsp_responders(cert: &X509Certificate<'_>) -> Vec<String> {
    let Ok(Some(aia)) = cert.get_extension_unique(&AUTHORITY_INFO_ACCESS_OID) else {
        return Vec::new();
    };

    let ParsedExtension::AuthorityInfoAccess(aia) = aia.parsed_extension() else {
        return Vec::new();
    };

    aia.accessdescs
        .iter()
        .filter(|ad| ad.access_method == AD_OCSP_OID)
        .filter_map(|ad| match ad.access_location {
            GeneralName::URI(uri) => Some(uri.to_string()),
            _ => None,
        })
        .collect()
}

fn issuer_public_key(issuer_der: &[u8]) -> Option<Vec<u8>> {
    let (_rem, issuer) = X509Certificate::from_der(issuer_der).ok()?;
    Some(issuer.public_key().raw.to_vec())
}

/// Describes errors that keep an OCSP check from producing a
/// [`ValidationResult`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OcspError {
    /// The responder did not answer within the configured timeouts.
    #[error("OCSP request to \"{url}\" timed out")]
    Timeout {
        /// Responder URL.
        url: String,
    },

    /// The certificate names no responder and none is configured for its
    /// ecosystem.
    #[error("no OCSP responder for this certificate")]
    NoResponder,

    /// The responder answered with a non-success HTTP status.
    #[error("OCSP responder \"{url}\" answered with HTTP status {status}")]
    HttpStatus {
        /// Responder URL.
        url: String,

        /// HTTP status code.
        status: u16,
    },

    /// The request could not be sent or the response could not be read.
    #[error("OCSP request to \"{url}\" failed: {source}")]
    Transport {
        /// Responder URL.
        url: String,

        /// Underlying error.
        source: HttpResolverError,
    },

    /// The OCSP request could not be encoded.
    #[error("unable to build OCSP request: {0}")]
    Request(String),
}

impl OcspError {
    fn transport(url: &str, err: HttpResolverError) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Return `true` if the responder did not answer in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
