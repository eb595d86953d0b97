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

//! Embedded root and sub-CA certificates of each supported ecosystem.
//!
//! The built-in table is parsed once, on first use, and never changes
//! afterwards. Hosts that ship their own copies of the CA certificates can
//! build a registry with [`TrustAnchorRegistry::from_pems`] instead.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use thiserror::Error;
use x509_parser::{certificate::X509Certificate, pem::Pem, prelude::FromDer};

use crate::{certificate::EcosystemId, hash::sha256};

mod path;
pub use path::PathValidationError;

/// Position of an anchor in the certification hierarchy.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AnchorRole {
    /// Self-signed root certificate.
    Root,

    /// Intermediate certificate that issues end-entity certificates and signs
    /// OCSP responses and CRLs.
    Sub,
}

/// An embedded CA certificate together with the fields used during
/// validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrustAnchor {
    ecosystem: EcosystemId,
    role: AnchorRole,
    der: Vec<u8>,
    subject: String,
    serial: String,
    public_key_der: Vec<u8>,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl TrustAnchor {
    /// Parse a DER certificate as the anchor `role` of `ecosystem`.
    pub fn from_der(
        ecosystem: EcosystemId,
        role: AnchorRole,
        der: &[u8],
    ) -> Result<Self, TrustAnchorError> {
        let (_, cert) = X509Certificate::from_der(der)
            .map_err(|err| TrustAnchorError::InvalidCertificate(err.to_string()))?;

        let validity = cert.validity();
        let not_before = DateTime::from_timestamp(validity.not_before.timestamp(), 0)
            .ok_or_else(|| TrustAnchorError::InvalidCertificate("bad notBefore".to_string()))?;
        let not_after = DateTime::from_timestamp(validity.not_after.timestamp(), 0)
            .ok_or_else(|| TrustAnchorError::InvalidCertificate("bad notAfter".to_string()))?;

        Ok(Self {
            ecosystem,
            role,
            der: der.to_vec(),
            subject: cert.subject().to_string(),
            serial: cert.raw_serial_as_string(),
            public_key_der: cert.public_key().raw.to_vec(),
            not_before,
            not_after,
        })
    }

    /// Ecosystem this anchor belongs to.
    pub fn ecosystem(&self) -> EcosystemId {
        self.ecosystem
    }

    /// Root or sub-CA.
    pub fn role(&self) -> AnchorRole {
        self.role
    }

    /// DER encoding of the certificate.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Subject distinguished name (RFC 4514 form).
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Serial number as colon-separated hex.
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// DER encoding of the `SubjectPublicKeyInfo`.
    pub fn public_key_der(&self) -> &[u8] {
        &self.public_key_der
    }

    /// Start of the validity period.
    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    /// End of the validity period.
    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// Hex-encoded SHA-256 fingerprint of the certificate.
    pub fn fingerprint(&self) -> String {
        hex::encode(sha256(&self.der))
    }
}

/// A fixed table of trust anchors keyed by `(ecosystem, role)`.
///
/// Every known ecosystem has exactly one sub anchor and one root anchor.
#[derive(Debug)]
pub struct TrustAnchorRegistry {
    anchors: Vec<TrustAnchor>,
}

const BUILTIN_ANCHORS: &[(EcosystemId, AnchorRole, &[u8])] = &[
    (
        EcosystemId::BancoCentral,
        AnchorRole::Root,
        include_bytes!("certs/bce_root.pem"),
    ),
    (
        EcosystemId::BancoCentral,
        AnchorRole::Sub,
        include_bytes!("certs/bce_sub.pem"),
    ),
    (
        EcosystemId::BancoCentralTest,
        AnchorRole::Root,
        include_bytes!("certs/bce_test_root.pem"),
    ),
    (
        EcosystemId::BancoCentralTest,
        AnchorRole::Sub,
        include_bytes!("certs/bce_test_sub.pem"),
    ),
    (
        EcosystemId::SecurityData,
        AnchorRole::Root,
        include_bytes!("certs/sd_root.pem"),
    ),
    (
        EcosystemId::SecurityData,
        AnchorRole::Sub,
        include_bytes!("certs/sd_sub.pem"),
    ),
    // Both Security Data sub-CAs chain to the same root.
    (
        EcosystemId::SecurityDataLegacy,
        AnchorRole::Root,
        include_bytes!("certs/sd_root.pem"),
    ),
    (
        EcosystemId::SecurityDataLegacy,
        AnchorRole::Sub,
        include_bytes!("certs/sd_legacy_sub.pem"),
    ),
];

static BUILTIN: OnceLock<Result<TrustAnchorRegistry, TrustAnchorError>> = OnceLock::new();

impl TrustAnchorRegistry {
    /// Return the registry of embedded CA certificates.
    pub fn builtin() -> Result<&'static TrustAnchorRegistry, TrustAnchorError> {
        BUILTIN
            .get_or_init(|| Self::from_pems(BUILTIN_ANCHORS))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Build a registry from PEM certificates.
    ///
    /// Each entry must hold exactly one certificate, and each known ecosystem
    /// must receive exactly one root and one sub anchor.
    pub fn from_pems(
        entries: &[(EcosystemId, AnchorRole, &[u8])],
    ) -> Result<Self, TrustAnchorError> {
        let mut anchors = Vec::with_capacity(entries.len());

        for (ecosystem, role, pem_bytes) in entries {
            if *ecosystem == EcosystemId::Unknown {
                return Err(TrustAnchorError::UnknownEcosystem);
            }

            let mut pems = Pem::iter_from_buffer(pem_bytes);
            let pem = match (pems.next(), pems.next()) {
                (Some(Ok(pem)), None) => pem,
                (Some(Err(err)), _) => {
                    return Err(TrustAnchorError::InvalidCertificate(err.to_string()))
                }
                _ => {
                    return Err(TrustAnchorError::InvalidCertificate(format!(
                        "expected exactly one certificate for {ecosystem} {role:?}"
                    )))
                }
            };

            anchors.push(TrustAnchor::from_der(*ecosystem, *role, &pem.contents)?);
        }

        for ecosystem in EcosystemId::KNOWN {
            for role in [AnchorRole::Root, AnchorRole::Sub] {
                let count = anchors
                    .iter()
                    .filter(|a| a.ecosystem == ecosystem && a.role == role)
                    .count();

                if count != 1 {
                    return Err(TrustAnchorError::IncompleteTable { ecosystem, role });
                }
            }
        }

        Ok(Self { anchors })
    }

    /// Return the sub-CA anchor of `ecosystem`.
    ///
    /// This anchor is the expected issuer of end-entity certificates and the
    /// expected signer of OCSP responses and CRLs.
    pub fn sub_anchor(&self, ecosystem: EcosystemId) -> Result<&TrustAnchor, TrustAnchorError> {
        self.find(ecosystem, AnchorRole::Sub)
    }

    /// Return the root anchor of `ecosystem`.
    pub fn root_anchor(&self, ecosystem: EcosystemId) -> Result<&TrustAnchor, TrustAnchorError> {
        self.find(ecosystem, AnchorRole::Root)
    }

    /// Return every distinct anchor certificate in the table: roots first,
    /// then sub-CAs.
    ///
    /// A root shared by several ecosystems is listed once.
    pub fn root_anchors(&self) -> Vec<&TrustAnchor> {
        let roots = self.anchors.iter().filter(|a| a.role == AnchorRole::Root);
        let subs = self.anchors.iter().filter(|a| a.role == AnchorRole::Sub);

        let mut all: Vec<&TrustAnchor> = Vec::new();
        for anchor in roots.chain(subs) {
            if !all.iter().any(|seen| seen.der() == anchor.der()) {
                all.push(anchor);
            }
        }

        all
    }

    /// Validate the certification path `[leaf, sub]` for `ecosystem` against
    /// the roots of this registry.
    ///
    /// Revocation is not checked here. The validity periods are evaluated at
    /// `at`, or at the current time when `at` is `None`.
    pub fn verify_path(
        &self,
        leaf_der: &[u8],
        ecosystem: EcosystemId,
        at: Option<DateTime<Utc>>,
    ) -> Result<(), PathValidationError> {
        let sub = self.sub_anchor(ecosystem)?;

        let mut roots: Vec<&[u8]> = Vec::new();
        for anchor in self.anchors.iter().filter(|a| a.role == AnchorRole::Root) {
            if !roots.contains(&anchor.der()) {
                roots.push(anchor.der());
            }
        }

        path::verify_path(&roots, sub.der(), leaf_der, at.map(|at| at.timestamp()))
    }

    fn find(
        &self,
        ecosystem: EcosystemId,
        role: AnchorRole,
    ) -> Result<&TrustAnchor, TrustAnchorError> {
        if ecosystem == EcosystemId::Unknown {
            return Err(TrustAnchorError::UnknownEcosystem);
        }

        self.anchors
            .iter()
            .find(|a| a.ecosystem == ecosystem && a.role == role)
            .ok_or(TrustAnchorError::IncompleteTable { ecosystem, role })
    }
}

/// Describes errors that can occur while building or querying a
/// [`TrustAnchorRegistry`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum TrustAnchorError {
    /// Trust anchors were requested for [`EcosystemId::Unknown`].
    #[error("no trust anchors exist for an unknown ecosystem")]
    UnknownEcosystem,

    /// An anchor certificate could not be parsed.
    #[error("invalid trust anchor certificate: {0}")]
    InvalidCertificate(String),

    /// An ecosystem is missing an anchor or has more than one for a role.
    #[error("trust anchor table needs exactly one {role:?} anchor for {ecosystem}")]
    IncompleteTable {
        /// Affected ecosystem.
        ecosystem: EcosystemId,

        /// Affected role.
        role: AnchorRole,
    },
}
