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

//! The unified revocation check.
//!
//! A certificate is classified first, so that certificates from unsupported
//! authorities are rejected before any network request. The sub-CA anchor of
//! its ecosystem then serves as OCSP issuer and CRL signer. OCSP is tried
//! first and CRLs are the fallback, unless [`OcspSettings`] says otherwise.
//!
//! [`OcspSettings`]: crate::settings::OcspSettings

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::{
    certificate::{classify_der, ClassifyError, EcosystemId, HolderType},
    crl::CrlChecker,
    http::{HttpResolverError, SyncHttpResolver, UreqResolver},
    ldap::{DirectoryResolver, LdapDirectory},
    ocsp::{OcspChecker, OcspError},
    settings::Settings,
    trust_anchors::{TrustAnchor, TrustAnchorError, TrustAnchorRegistry},
    validation_result::ValidationResult,
};

/// How a [`Verdict`] was reached.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// An OCSP responder.
    Ocsp,

    /// One or more CRLs.
    Crl,
}

/// Outcome of [`RevocationValidator::validate`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Verdict {
    /// Ecosystem of the certificate, `Unknown` if not recognised.
    pub ecosystem: EcosystemId,

    /// Holder type of the certificate, `Unknown` if not classified.
    pub holder_type: HolderType,

    /// The final outcome.
    pub result: ValidationResult,

    /// The check that produced `result`. `None` if no revocation source was
    /// consulted.
    pub method: Option<Method>,
}

impl Verdict {
    fn unchecked(ecosystem: EcosystemId, result: ValidationResult) -> Self {
        Self {
            ecosystem,
            holder_type: HolderType::Unknown,
            result,
            method: None,
        }
    }
}

/// Classifies certificates and checks their revocation status against the
/// infrastructure of their ecosystem.
pub struct RevocationValidator<'a, H, D> {
    registry: &'a TrustAnchorRegistry,
    http: H,
    insecure_http: Option<H>,
    directory: D,
    insecure_directory: Option<D>,
    settings: Settings,
}

impl RevocationValidator<'static, UreqResolver, LdapDirectory> {
    /// Create a validator using the embedded trust anchors, [`ureq`] for
    /// HTTP and [`ldap3`] for LDAP.
    pub fn from_settings(settings: Settings) -> Result<Self, ValidatorError> {
        let registry = TrustAnchorRegistry::builtin()?;

        let http = UreqResolver::new(&settings.network);
        let directory = LdapDirectory::new(&settings.network);

        let (insecure_http, insecure_directory) =
            if settings.network.insecure_tls_ecosystems.is_empty() {
                (None, None)
            } else {
                (
                    Some(UreqResolver::insecure(&settings.network)?),
                    Some(directory.clone().with_no_tls_verify(true)),
                )
            };

        Ok(Self {
            registry,
            http,
            insecure_http,
            directory,
            insecure_directory,
            settings,
        })
    }
}

impl<'a, H: SyncHttpResolver, D: DirectoryResolver> RevocationValidator<'a, H, D> {
    /// Create a validator from explicit collaborators.
    pub fn new(registry: &'a TrustAnchorRegistry, http: H, directory: D, settings: Settings) -> Self {
        Self {
            registry,
            http,
            insecure_http: None,
            directory,
            insecure_directory: None,
            settings,
        }
    }

    /// Use `http` instead of the default resolver for the ecosystems listed
    /// in [`NetworkSettings::insecure_tls_ecosystems`].
    ///
    /// [`NetworkSettings::insecure_tls_ecosystems`]: crate::settings::NetworkSettings::insecure_tls_ecosystems
    pub fn with_insecure_http(mut self, http: H) -> Self {
        self.insecure_http = Some(http);
        self
    }

    /// Use `directory` instead of the default one for the ecosystems listed
    /// in [`NetworkSettings::insecure_tls_ecosystems`].
    ///
    /// [`NetworkSettings::insecure_tls_ecosystems`]: crate::settings::NetworkSettings::insecure_tls_ecosystems
    pub fn with_insecure_directory(mut self, directory: D) -> Self {
        self.insecure_directory = Some(directory);
        self
    }

    /// Classify the DER-encoded certificate `cert_der` and determine whether
    /// it is revoked.
    pub fn validate(&self, cert_der: &[u8]) -> Verdict {
        let (ecosystem, holder_type) = match classify_der(cert_der) {
            Ok(classified) => classified,
            Err(err) => {
                debug!("not checking revocation: {err}");
                let ecosystem = match err {
                    ClassifyError::UnsupportedProfile(ecosystem) => ecosystem,
                    _ => EcosystemId::Unknown,
                };
                return Verdict::unchecked(ecosystem, ValidationResult::from(err));
            }
        };

        let sub = match self.registry.sub_anchor(ecosystem) {
            Ok(sub) => sub,
            Err(err) => {
                warn!("no trust anchor for {ecosystem}: {err}");
                return Verdict::unchecked(ecosystem, ValidationResult::CaNotSupported);
            }
        };

        let (result, method) = self.check_revocation(cert_der, ecosystem, sub);

        Verdict {
            ecosystem,
            holder_type,
            result,
            method: Some(method),
        }
    }

    fn check_revocation(
        &self,
        cert_der: &[u8],
        ecosystem: EcosystemId,
        sub: &TrustAnchor,
    ) -> (ValidationResult, Method) {
        let http = self.http_for(ecosystem);
        let directory = self.directory_for(ecosystem);

        if !self.settings.ocsp.prefer_ocsp {
            return (self.check_crl(http, directory, cert_der, sub), Method::Crl);
        }

        let ocsp = OcspChecker::new(http, &self.settings);
        let ocsp_result = match ocsp.check_ocsp(cert_der, sub.der()) {
            Ok(result) if result.is_definitive() => return (result, Method::Ocsp),
            Ok(result) => {
                debug!("OCSP gave no definitive answer: {result}");
                Some(result)
            }
            Err(err) => {
                warn!("OCSP check failed: {err}");
                if !self.settings.ocsp.crl_fallback {
                    return (ocsp_failure(&err), Method::Ocsp);
                }
                None
            }
        };

        if !self.settings.ocsp.crl_fallback {
            let result = ocsp_result.unwrap_or(ValidationResult::Unknown);
            return (result, Method::Ocsp);
        }

        let crl_result = self.check_crl(http, directory, cert_der, sub);

        // A CRL walk with nothing to download says less than any OCSP answer.
        match (crl_result, ocsp_result) {
            (ValidationResult::Unknown, Some(ocsp_result)) => (ocsp_result, Method::Ocsp),
            (crl_result, _) => (crl_result, Method::Crl),
        }
    }

    fn check_crl(
        &self,
        http: &H,
        directory: &D,
        cert_der: &[u8],
        sub: &TrustAnchor,
    ) -> ValidationResult {
        let crl = CrlChecker::new(http, directory, &self.settings);

        let verifier_key = self
            .settings
            .crl
            .verify_signature
            .then_some(sub.public_key_der());

        crl.check_crl(
            cert_der,
            verifier_key,
            self.settings.crl.override_points.as_deref(),
        )
    }

    fn http_for(&self, ecosystem: EcosystemId) -> &H {
        match (&self.insecure_http, self.is_insecure(ecosystem)) {
            (Some(insecure_http), true) => insecure_http,
            _ => &self.http,
        }
    }

    fn directory_for(&self, ecosystem: EcosystemId) -> &D {
        match (&self.insecure_directory, self.is_insecure(ecosystem)) {
            (Some(insecure_directory), true) => insecure_directory,
            _ => &self.directory,
        }
    }

    fn is_insecure(&self, ecosystem: EcosystemId) -> bool {
        self.settings
            .network
            .insecure_tls_ecosystems
            .contains(&ecosystem)
    }
}

fn ocsp_failure(err: &OcspError) -> ValidationResult {
    match err {
        OcspError::NoResponder => ValidationResult::Unknown,
        _ => ValidationResult::ServerError,
    }
}

/// Describes errors that can occur while creating a [`RevocationValidator`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidatorError {
    /// The embedded trust anchors could not be loaded.
    #[error(transparent)]
    TrustAnchor(#[from] TrustAnchorError),

    /// The HTTP client could not be created.
    #[error(transparent)]
    Http(#[from] HttpResolverError),
}
