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

//! Object identifiers used to recognise and read Ecuadorian qualified
//! certificates.
//!
//! Each ecosystem publishes a policy arc (one sub-arc per kind of holder)
//! and a field arc (one private extension per holder attribute). Any
//! extension under the field arc marks a certificate as belonging to the
//! ecosystem.

use asn1_rs::{oid, Oid};

use crate::certificate::HolderType;

pub(crate) const CERTIFICATE_POLICIES_OID: Oid<'static> = oid!(2.5.29 .32);
pub(crate) const CRL_DISTRIBUTION_POINTS_OID: Oid<'static> = oid!(2.5.29 .31);
pub(crate) const AUTHORITY_INFO_ACCESS_OID: Oid<'static> = oid!(1.3.6 .1 .5 .5 .7 .1 .1);
pub(crate) const AD_OCSP_OID: Oid<'static> = oid!(1.3.6 .1 .5 .5 .7 .48 .1);

/// Private extension OIDs holding the holder attributes of one ecosystem.
#[derive(Debug)]
pub(crate) struct FieldOids {
    pub cedula: &'static str,
    pub given_names: &'static str,
    pub first_surname: &'static str,
    pub second_surname: &'static str,
    pub position: &'static str,
    pub institution: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub city: &'static str,
    pub company_name: &'static str,
    pub ruc: &'static str,
}

/// Recognition data for one certification authority family.
#[derive(Debug)]
pub(crate) struct EcosystemProfile {
    /// Field arc. An extension under it marks a certificate as issued by
    /// this family.
    pub marker: &'static str,

    /// Policy arcs in the order they are tested. First match wins.
    pub holder_policies: &'static [(&'static str, HolderType)],

    pub fields: &'static FieldOids,
}

pub(crate) const BCE_PROFILE: EcosystemProfile = EcosystemProfile {
    marker: "1.3.6.1.4.1.37947.3",
    holder_policies: &[
        ("1.3.6.1.4.1.37947.2.1", HolderType::NaturalPerson),
        ("1.3.6.1.4.1.37947.2.2", HolderType::LegalPerson),
        ("1.3.6.1.4.1.37947.2.3", HolderType::LegalRepresentative),
        ("1.3.6.1.4.1.37947.2.4", HolderType::CompanyMember),
        ("1.3.6.1.4.1.37947.2.5", HolderType::PublicOfficial),
        // natural person, professional
        ("1.3.6.1.4.1.37947.2.6", HolderType::NaturalPerson),
        ("1.3.6.1.4.1.37947.2.7", HolderType::TestSubject),
    ],
    fields: &FieldOids {
        cedula: "1.3.6.1.4.1.37947.3.1",
        given_names: "1.3.6.1.4.1.37947.3.2",
        first_surname: "1.3.6.1.4.1.37947.3.3",
        second_surname: "1.3.6.1.4.1.37947.3.4",
        position: "1.3.6.1.4.1.37947.3.5",
        institution: "1.3.6.1.4.1.37947.3.6",
        address: "1.3.6.1.4.1.37947.3.7",
        phone: "1.3.6.1.4.1.37947.3.8",
        city: "1.3.6.1.4.1.37947.3.9",
        company_name: "1.3.6.1.4.1.37947.3.10",
        ruc: "1.3.6.1.4.1.37947.3.11",
    },
};

const SECURITY_DATA_POLICIES: &[(&str, HolderType)] = &[
    ("1.3.6.1.4.1.37746.2.1", HolderType::NaturalPerson),
    ("1.3.6.1.4.1.37746.2.2", HolderType::LegalPerson),
    ("1.3.6.1.4.1.37746.2.3", HolderType::LegalRepresentative),
    ("1.3.6.1.4.1.37746.2.4", HolderType::CompanyMember),
    ("1.3.6.1.4.1.37746.2.5", HolderType::PublicOfficial),
    ("1.3.6.1.4.1.37746.2.6", HolderType::NaturalPerson),
    ("1.3.6.1.4.1.37746.2.7", HolderType::TestSubject),
];

pub(crate) const SECURITY_DATA_PROFILE: EcosystemProfile = EcosystemProfile {
    marker: "1.3.6.1.4.1.37746.3",
    holder_policies: SECURITY_DATA_POLICIES,
    fields: &FieldOids {
        cedula: "1.3.6.1.4.1.37746.3.1",
        given_names: "1.3.6.1.4.1.37746.3.2",
        first_surname: "1.3.6.1.4.1.37746.3.3",
        second_surname: "1.3.6.1.4.1.37746.3.4",
        position: "1.3.6.1.4.1.37746.3.5",
        institution: "1.3.6.1.4.1.37746.3.6",
        address: "1.3.6.1.4.1.37746.3.7",
        phone: "1.3.6.1.4.1.37746.3.8",
        city: "1.3.6.1.4.1.37746.3.9",
        company_name: "1.3.6.1.4.1.37746.3.10",
        ruc: "1.3.6.1.4.1.37746.3.11",
    },
};

// Certificates from the first Security Data sub-CA use the older field arc
// but the same policy arc.
pub(crate) const SECURITY_DATA_LEGACY_PROFILE: EcosystemProfile = EcosystemProfile {
    marker: "1.3.6.1.4.1.37746.1",
    holder_policies: SECURITY_DATA_POLICIES,
    fields: &FieldOids {
        cedula: "1.3.6.1.4.1.37746.1.1",
        given_names: "1.3.6.1.4.1.37746.1.2",
        first_surname: "1.3.6.1.4.1.37746.1.3",
        second_surname: "1.3.6.1.4.1.37746.1.4",
        position: "1.3.6.1.4.1.37746.1.5",
        institution: "1.3.6.1.4.1.37746.1.6",
        address: "1.3.6.1.4.1.37746.1.7",
        phone: "1.3.6.1.4.1.37746.1.8",
        city: "1.3.6.1.4.1.37746.1.9",
        company_name: "1.3.6.1.4.1.37746.1.10",
        ruc: "1.3.6.1.4.1.37746.1.11",
    },
};
