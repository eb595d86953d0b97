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

use x509_parser::{certificate::X509Certificate, prelude::FromDer};

use crate::{
    certificate::{ClassifyError, EcosystemId, HolderDetails, HolderType},
    tests::test_utils::*,
};

fn details(pem: &[u8]) -> Result<HolderDetails, ClassifyError> {
    let cert_der = der(pem);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();
    HolderDetails::from_certificate(&cert)
}

#[test]
fn natural_person() {
    let details = details(BCE_TEST_NATURAL).unwrap();

    assert_eq!(details.ecosystem, EcosystemId::BancoCentralTest);
    assert_eq!(details.holder_type, HolderType::NaturalPerson);
    assert_eq!(details.cedula.as_deref(), Some("1712345678"));
    assert_eq!(details.given_names.as_deref(), Some("JUAN CARLOS"));
    assert_eq!(details.first_surname.as_deref(), Some("PEREZ"));
    assert_eq!(details.second_surname.as_deref(), Some("LOPEZ"));
    assert_eq!(details.ruc, None);
    assert_eq!(
        details.full_name().as_deref(),
        Some("JUAN CARLOS PEREZ LOPEZ")
    );
}

#[test]
fn legal_person_cedula_from_san() {
    let details = details(BCE_TEST_LEGAL).unwrap();

    assert_eq!(details.holder_type, HolderType::LegalPerson);
    assert_eq!(details.cedula.as_deref(), Some("1790012345001"));
    assert_eq!(details.company_name.as_deref(), Some("ACME SOLUCIONES S.A."));
    assert_eq!(details.ruc.as_deref(), Some("1790012345001"));

    // Malformed optional field.
    assert_eq!(details.city, None);
    assert_eq!(details.full_name(), None);
}

#[test]
fn public_official() {
    let details = details(BCE_OFFICIAL).unwrap();

    assert_eq!(details.ecosystem, EcosystemId::BancoCentral);
    assert_eq!(details.position.as_deref(), Some("DIRECTORA"));
    assert_eq!(details.institution.as_deref(), Some("MINISTERIO DE PRUEBAS"));
}

#[test]
fn legacy_field_arc() {
    let details = details(SD_LEGACY_REPRESENTATIVE).unwrap();

    assert_eq!(details.ecosystem, EcosystemId::SecurityDataLegacy);
    assert_eq!(details.cedula.as_deref(), Some("1309876543"));
    assert_eq!(details.ruc.as_deref(), Some("1391234567001"));
}

#[test]
fn unclassified() {
    assert_eq!(details(FOREIGN), Err(ClassifyError::NotRecognized));
}

#[test]
fn serializes() {
    let details = details(SD_PROFESSIONAL).unwrap();
    let json = serde_json::to_value(&details).unwrap();

    assert_eq!(json["ecosystem"], "security_data");
    assert_eq!(json["holder_type"], "natural_person");
    assert_eq!(json["given_names"], "LUIS ALBERTO");
    assert!(json["ruc"].is_null());
}
