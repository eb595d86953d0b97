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

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use x509_parser::{certificate::X509Certificate, prelude::FromDer};

use crate::certificate::{
    oids::{
        EcosystemProfile, BCE_PROFILE, SECURITY_DATA_LEGACY_PROFILE, SECURITY_DATA_PROFILE,
    },
    policy::{oid_has_prefix, policy_ids},
};

/// Issuing certification authority family of a certificate.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EcosystemId {
    /// Banco Central del Ecuador, production hierarchy.
    BancoCentral,

    /// Banco Central del Ecuador, test hierarchy.
    BancoCentralTest,

    /// Security Data, current sub-CA.
    SecurityData,

    /// Security Data, first sub-CA with the older field arc.
    SecurityDataLegacy,

    /// Not issued by a supported certification authority.
    Unknown,
}

impl EcosystemId {
    /// Every supported ecosystem, in classification priority order.
    pub const KNOWN: [EcosystemId; 4] = [
        Self::BancoCentral,
        Self::BancoCentralTest,
        Self::SecurityData,
        Self::SecurityDataLegacy,
    ];

    pub(crate) fn profile(self) -> Option<&'static EcosystemProfile> {
        match self {
            Self::BancoCentral | Self::BancoCentralTest => Some(&BCE_PROFILE),
            Self::SecurityData => Some(&SECURITY_DATA_PROFILE),
            Self::SecurityDataLegacy => Some(&SECURITY_DATA_LEGACY_PROFILE),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for EcosystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BancoCentral => "Banco Central del Ecuador",
            Self::BancoCentralTest => "Banco Central del Ecuador (test)",
            Self::SecurityData => "Security Data",
            Self::SecurityDataLegacy => "Security Data (legacy)",
            Self::Unknown => "unknown",
        };

        f.write_str(name)
    }
}

/// Kind of holder a qualified certificate was issued to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderType {
    /// Natural person, including the "professional" profile.
    NaturalPerson,

    /// Company or other legal person.
    LegalPerson,

    /// Public servant acting for an institution.
    PublicOfficial,

    /// Legal representative of a company.
    LegalRepresentative,

    /// Member of a company.
    CompanyMember,

    /// Holder of a certificate issued for testing.
    TestSubject,

    /// No recognised holder policy.
    Unknown,
}

/// Describes why a certificate could not be classified.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum ClassifyError {
    /// The certificate carries no marker extension of a supported ecosystem.
    #[error("certificate is not issued by a supported certification authority")]
    NotRecognized,

    /// The certificate belongs to a supported ecosystem but uses a holder
    /// profile this crate does not handle.
    #[error("unsupported certificate profile for {0}")]
    UnsupportedProfile(EcosystemId),

    /// The certificate could not be decoded.
    #[error("the certificate could not be decoded")]
    Corrupt,
}

/// Return `true` if the issuer distinguished name of `cert` contains the
/// literal `TEST`.
pub fn is_test_issuer(cert: &X509Certificate<'_>) -> bool {
    cert.issuer().to_string().contains("TEST")
}

/// Cheap check for whether `cert` was issued within `ecosystem`, based only on
/// the presence of one of its private field extensions.
///
/// The two Banco Central hierarchies are told apart by [`is_test_issuer`].
pub fn looks_like(cert: &X509Certificate<'_>, ecosystem: EcosystemId) -> bool {
    let Some(profile) = ecosystem.profile() else {
        return false;
    };

    if !has_marker(cert, profile) {
        return false;
    }

    match ecosystem {
        EcosystemId::BancoCentral => !is_test_issuer(cert),
        EcosystemId::BancoCentralTest => is_test_issuer(cert),
        _ => true,
    }
}

/// Determine the ecosystem and holder type of `cert`.
///
/// Ecosystems are tried in the order of [`EcosystemId::KNOWN`]; within the
/// first one whose marker is present, the holder policies are tried in their
/// table order and the first match wins.
pub fn classify(cert: &X509Certificate<'_>) -> Result<(EcosystemId, HolderType), ClassifyError> {
    let ecosystem = EcosystemId::KNOWN
        .into_iter()
        .find(|ecosystem| looks_like(cert, *ecosystem))
        .ok_or(ClassifyError::NotRecognized)?;

    let profile = ecosystem
        .profile()
        .ok_or(ClassifyError::NotRecognized)?;

    let policies = policy_ids(cert);

    let holder = profile
        .holder_policies
        .iter()
        .find(|(arc, _)| policies.iter().any(|policy| oid_has_prefix(policy, arc)))
        .map(|(_, holder)| *holder)
        .ok_or(ClassifyError::UnsupportedProfile(ecosystem))?;

    debug!("classified certificate as {holder:?} in {ecosystem}");
    Ok((ecosystem, holder))
}

/// Parse a DER certificate and [`classify`] it.
pub fn classify_der(cert_der: &[u8]) -> Result<(EcosystemId, HolderType), ClassifyError> {
    let (_, cert) =
        X509Certificate::from_der(cert_der).map_err(|_| ClassifyError::Corrupt)?;
    classify(&cert)
}

fn has_marker(cert: &X509Certificate<'_>, profile: &EcosystemProfile) -> bool {
    cert.iter_extensions()
        .any(|ext| oid_has_prefix(&ext.oid.to_id_string(), profile.marker))
}
