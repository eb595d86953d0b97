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

use log::warn;
use serde::Serialize;
use x509_parser::certificate::X509Certificate;

use crate::certificate::{
    classify, decode_extension_string, decode_other_name, ClassifyError, EcosystemId, HolderType,
};

/// Holder attributes read from the private extensions of a classified
/// certificate.
///
/// Every attribute is optional; which ones are present depends on the holder
/// type and on the issuing sub-CA.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HolderDetails {
    /// Issuing ecosystem.
    pub ecosystem: EcosystemId,

    /// Holder type derived from the certificate policies.
    pub holder_type: HolderType,

    /// National identity card or passport number.
    pub cedula: Option<String>,

    /// Given names.
    pub given_names: Option<String>,

    /// First surname.
    pub first_surname: Option<String>,

    /// Second surname.
    pub second_surname: Option<String>,

    /// Position held within `institution`.
    pub position: Option<String>,

    /// Employing institution or company.
    pub institution: Option<String>,

    /// Postal address.
    pub address: Option<String>,

    /// Phone number.
    pub phone: Option<String>,

    /// City.
    pub city: Option<String>,

    /// Registered company name.
    pub company_name: Option<String>,

    /// Taxpayer registry number (RUC).
    pub ruc: Option<String>,
}

impl HolderDetails {
    /// Classify `cert` and read its holder attributes.
    ///
    /// When the cédula extension is missing, the subject alternative name is
    /// searched for an `otherName` carrying the same OID.
    pub fn from_certificate(cert: &X509Certificate<'_>) -> Result<Self, ClassifyError> {
        let (ecosystem, holder_type) = classify(cert)?;
        let fields = ecosystem
            .profile()
            .ok_or(ClassifyError::NotRecognized)?
            .fields;

        let read = |oid: &str| decode_extension_string(cert, oid);

        Ok(Self {
            ecosystem,
            holder_type,
            cedula: read(fields.cedula).or_else(|| other_name_in_san(cert, fields.cedula)),
            given_names: read(fields.given_names),
            first_surname: read(fields.first_surname),
            second_surname: read(fields.second_surname),
            position: read(fields.position),
            institution: read(fields.institution),
            address: read(fields.address),
            phone: read(fields.phone),
            city: read(fields.city),
            company_name: read(fields.company_name),
            ruc: read(fields.ruc),
        })
    }

    /// Given names followed by the surnames, or `None` if no part is known.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.given_names, &self.first_surname, &self.second_surname]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

fn other_name_in_san(cert: &X509Certificate<'_>, oid: &str) -> Option<String> {
    let san = match cert.subject_alternative_name() {
        Ok(Some(san)) => san,
        Ok(None) => return None,
        Err(err) => {
            warn!("unable to read subject alternative name: {err}");
            return None;
        }
    };

    san.value
        .general_names
        .iter()
        .find_map(|name| decode_other_name(name, oid))
}
