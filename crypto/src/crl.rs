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

//! CRL-based revocation checking.
//!
//! [`CrlChecker::check_crl`] walks the distribution points of a certificate
//! in order. Each point is downloaded, parsed, optionally verified against
//! the issuer key and searched for the certificate serial number. The first
//! CRL listing the serial ends the walk with [`ValidationResult::Revoked`].
//!
//! A point that cannot be downloaded does not end the walk. A point that
//! serves a CRL which does not parse or whose signature does not verify
//! ends it with [`ValidationResult::ServerError`].

use http::{Method, Request};
use log::{debug, info, warn};
use thiserror::Error;
use x509_parser::{
    certificate::X509Certificate,
    extensions::{DistributionPointName, GeneralName, ParsedExtension},
    prelude::FromDer,
    revocation_list::CertificateRevocationList,
};

use crate::{
    certificate::oids::CRL_DISTRIBUTION_POINTS_OID,
    http::{read_body, HttpResolverError, SyncHttpResolver},
    ldap::{DirectoryError, DirectoryResolver},
    raw_signature::{verify_signature, RawSignatureValidationError},
    settings::Settings,
    validation_result::ValidationResult,
};

/// Checks certificates against the CRLs of their distribution points.
///
/// HTTP(S) points are fetched through `H` and LDAP points through `D`.
pub struct CrlChecker<H, D> {
    http: H,
    directory: D,
    ldap_attribute: String,
    max_response_size: usize,
}

impl<H: SyncHttpResolver, D: DirectoryResolver> CrlChecker<H, D> {
    /// Create a checker using `http` and `directory` as transports.
    pub fn new(http: H, directory: D, settings: &Settings) -> Self {
        Self {
            http,
            directory,
            ldap_attribute: settings.crl.ldap_attribute.clone(),
            max_response_size: settings.network.max_response_size,
        }
    }

    /// Return the revocation status of the DER-encoded certificate
    /// `cert_der`.
    ///
    /// If `verifier_key` (a DER-encoded `SubjectPublicKeyInfo`) is given,
    /// every CRL must be signed by it. If `override_points` is given, those
    /// URLs are used instead of the certificate's own distribution points.
    ///
    /// The result is `Valid` once any point was checked without finding the
    /// serial, `CannotDownloadCrl` if no point could be checked and at least
    /// one download failed, and `Unknown` if there was nothing to download.
    pub fn check_crl(
        &self,
        cert_der: &[u8],
        verifier_key: Option<&[u8]>,
        override_points: Option<&[String]>,
    ) -> ValidationResult {
        let Ok((_rem, cert)) = X509Certificate::from_der(cert_der) else {
            return ValidationResult::Corrupt;
        };

        let points = match override_points {
            Some(points) => points.to_vec(),
            None => distribution_points(&cert),
        };

        let mut checked = false;
        let mut download_failed = false;

        for point in &points {
            if point.contains("ocsp") {
                debug!("skipping distribution point {point}: looks like an OCSP endpoint");
                continue;
            }

            let crl_der = match self.download(point) {
                Ok(crl_der) => crl_der,
                Err(err) => {
                    warn!("unable to download CRL from {point}: {err}");
                    download_failed = true;
                    continue;
                }
            };

            let crl = match CertificateRevocationList::from_der(&crl_der) {
                Ok((_rem, crl)) => crl,
                Err(err) => {
                    warn!("malformed CRL from {point}: {err}");
                    return ValidationResult::ServerError;
                }
            };

            if let Some(key) = verifier_key {
                if let Err(err) = verify_crl_signature(&crl, key) {
                    warn!("CRL from {point} failed signature check: {err}");
                    return ValidationResult::ServerError;
                }
            }

            if crl
                .iter_revoked_certificates()
                .any(|revoked| revoked.serial() == &cert.serial)
            {
                info!(
                    "certificate {} is revoked according to {point}",
                    cert.raw_serial_as_string()
                );
                return ValidationResult::Revoked;
            }

            debug!("certificate {} not listed in {point}", cert.raw_serial_as_string());
            checked = true;
        }

        if checked {
            ValidationResult::Valid
        } else if download_failed {
            ValidationResult::CannotDownloadCrl
        } else {
            ValidationResult::Unknown
        }
    }

    fn download(&self, point: &str) -> Result<Vec<u8>, DownloadError> {
        let scheme = point
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .unwrap_or_default();

        let body = match scheme.as_str() {
            "http" | "https" => self.download_http(point)?,
            "ldap" | "ldaps" => self
                .directory
                .read_binary_attribute(point, &self.ldap_attribute)?,
            _ => return Err(DownloadError::UnsupportedScheme(point.to_string())),
        };

        if body.is_empty() {
            return Err(DownloadError::Empty);
        }

        Ok(body)
    }

    fn download_http(&self, point: &str) -> Result<Vec<u8>, DownloadError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(point)
            .body(Vec::new())
            .map_err(HttpResolverError::from)?;

        let response = self.http.http_resolve(request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status.as_u16()));
        }

        Ok(read_body(response, self.max_response_size, point)?)
    }
}

/// Return the `fullName` URIs of the `cRLDistributionPoints` extension of
/// `cert`, in extension order.
///
/// A missing or malformed extension yields an empty list.
pub fn distribution_points(cert: &X509Certificate<'_>) -> Vec<String> {
    let ext = match cert.get_extension_unique(&CRL_DISTRIBUTION_POINTS_OID) {
        Ok(Some(ext)) => ext,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!("unable to read CRL distribution points: {err}");
            return Vec::new();
        }
    };

    let ParsedExtension::CRLDistributionPoints(points) = ext.parsed_extension() else {
        warn!("malformed CRL distribution points extension");
        return Vec::new();
    };

    points
        .iter()
        .filter_map(|point| match &point.distribution_point {
            Some(DistributionPointName::FullName(names)) => Some(names),
            _ => None,
        })
        .flatten()
        .filter_map(|name| match name {
            GeneralName::URI(uri) => Some(uri.to_string()),
            _ => None,
        })
        .collect()
}

fn verify_crl_signature(
    crl: &CertificateRevocationList<'_>,
    public_key: &[u8],
) -> Result<(), RawSignatureValidationError> {
    let sig_alg = crl.signature_algorithm.algorithm.to_id_string();

    verify_signature(
        &sig_alg,
        &crl.signature_value.data,
        crl.tbs_cert_list.as_ref(),
        public_key,
    )
}

#[derive(Debug, Error)]
enum DownloadError {
    #[error(transparent)]
    Http(#[from] HttpResolverError),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("unsupported distribution point \"{0}\"")]
    UnsupportedScheme(String),

    #[error("empty CRL")]
    Empty,
}
