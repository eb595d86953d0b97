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

use log::{debug, warn};
use x509_parser::{certificate::X509Certificate, extensions::ParsedExtension, x509::X509Version};

use crate::certificate::oids::CERTIFICATE_POLICIES_OID;

/// Return `true` if one of the certificate policies of `cert` starts with
/// `oid_prefix`.
///
/// The match is textual: `1.3.6.1.4.1.37947.2.1` matches the policy
/// `1.3.6.1.4.1.37947.2.1.1` and also `1.3.6.1.4.1.37947.2.10`.
///
/// A missing or malformed `certificatePolicies` extension yields `false`.
pub fn has_policy(cert: &X509Certificate<'_>, oid_prefix: &str) -> bool {
    policy_ids(cert)
        .iter()
        .any(|policy| oid_has_prefix(policy, oid_prefix))
}

/// Return the dotted-decimal policy identifiers of `cert`, in extension order.
pub(crate) fn policy_ids(cert: &X509Certificate<'_>) -> Vec<String> {
    if cert.version() != X509Version::V3 {
        return Vec::new();
    }

    let ext = match cert.get_extension_unique(&CERTIFICATE_POLICIES_OID) {
        Ok(Some(ext)) => ext,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!("unable to read certificate policies: {err}");
            return Vec::new();
        }
    };

    match ext.parsed_extension() {
        ParsedExtension::CertificatePolicies(policies) => policies
            .iter()
            .map(|policy| policy.policy_id.to_id_string())
            .collect(),
        ParsedExtension::ParseError { error } => {
            warn!("malformed certificate policies extension: {error}");
            Vec::new()
        }
        other => {
            debug!("unexpected certificate policies content: {other:?}");
            Vec::new()
        }
    }
}

pub(crate) fn oid_has_prefix(oid: &str, prefix: &str) -> bool {
    oid.starts_with(prefix)
}
