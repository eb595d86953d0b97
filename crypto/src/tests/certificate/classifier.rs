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
    certificate::{
        classify, classify_der, is_test_issuer, looks_like, ClassifyError, EcosystemId,
        HolderType,
    },
    tests::test_utils::*,
};

fn classify_pem(pem: &[u8]) -> Result<(EcosystemId, HolderType), ClassifyError> {
    classify_der(&der(pem))
}

#[test]
fn bce_test_natural_person() {
    assert_eq!(
        classify_pem(BCE_TEST_NATURAL),
        Ok((EcosystemId::BancoCentralTest, HolderType::NaturalPerson))
    );
}

#[test]
fn bce_test_legal_person() {
    assert_eq!(
        classify_pem(BCE_TEST_LEGAL),
        Ok((EcosystemId::BancoCentralTest, HolderType::LegalPerson))
    );
}

#[test]
fn bce_test_company_member() {
    assert_eq!(
        classify_pem(BCE_TEST_COMPANY_MEMBER),
        Ok((EcosystemId::BancoCentralTest, HolderType::CompanyMember))
    );
}

#[test]
fn bce_test_test_subject() {
    assert_eq!(
        classify_pem(BCE_TEST_SUBJECT),
        Ok((EcosystemId::BancoCentralTest, HolderType::TestSubject))
    );
}

#[test]
fn holder_policy_table_order_wins() {
    // Lists the legal person policy first, then the natural person one.
    assert_eq!(
        classify_pem(BCE_TEST_MULTI_POLICY),
        Ok((EcosystemId::BancoCentralTest, HolderType::NaturalPerson))
    );
}

#[test]
fn banco_central_wins_over_security_data() {
    // Carries both marker families, Security Data first.
    let cert_der = der(BCE_TEST_DUAL_MARKER);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    assert!(looks_like(&cert, EcosystemId::SecurityData));
    assert!(looks_like(&cert, EcosystemId::BancoCentralTest));
    assert_eq!(
        classify(&cert),
        Ok((EcosystemId::BancoCentralTest, HolderType::LegalPerson))
    );
}

#[test]
fn bce_production_public_official() {
    assert_eq!(
        classify_pem(BCE_OFFICIAL),
        Ok((EcosystemId::BancoCentral, HolderType::PublicOfficial))
    );
}

#[test]
fn security_data_professional_is_natural_person() {
    assert_eq!(
        classify_pem(SD_PROFESSIONAL),
        Ok((EcosystemId::SecurityData, HolderType::NaturalPerson))
    );
}

#[test]
fn security_data_legacy_representative() {
    assert_eq!(
        classify_pem(SD_LEGACY_REPRESENTATIVE),
        Ok((
            EcosystemId::SecurityDataLegacy,
            HolderType::LegalRepresentative
        ))
    );
}

#[test]
fn unknown_holder_policy() {
    assert_eq!(
        classify_pem(BCE_TEST_UNSUPPORTED),
        Err(ClassifyError::UnsupportedProfile(
            EcosystemId::BancoCentralTest
        ))
    );
}

#[test]
fn foreign_certificate() {
    assert_eq!(classify_pem(FOREIGN), Err(ClassifyError::NotRecognized));
}

#[test]
fn corrupt_certificate() {
    assert_eq!(
        classify_der(b"definitely not a certificate"),
        Err(ClassifyError::Corrupt)
    );
}

#[test]
fn deterministic() {
    let cert_der = der(BCE_TEST_LEGAL);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    assert_eq!(classify(&cert), classify(&cert));
    assert_eq!(classify(&cert), classify_der(&cert_der));
}

#[test]
fn test_issuer() {
    let natural = der(BCE_TEST_NATURAL);
    let (_, natural) = X509Certificate::from_der(&natural).unwrap();
    assert!(is_test_issuer(&natural));

    let official = der(BCE_OFFICIAL);
    let (_, official) = X509Certificate::from_der(&official).unwrap();
    assert!(!is_test_issuer(&official));
}

#[test]
fn marker_precheck() {
    let natural = der(BCE_TEST_NATURAL);
    let (_, natural) = X509Certificate::from_der(&natural).unwrap();

    assert!(looks_like(&natural, EcosystemId::BancoCentralTest));
    assert!(!looks_like(&natural, EcosystemId::BancoCentral));
    assert!(!looks_like(&natural, EcosystemId::SecurityData));
    assert!(!looks_like(&natural, EcosystemId::SecurityDataLegacy));
    assert!(!looks_like(&natural, EcosystemId::Unknown));

    let legacy = der(SD_LEGACY_REPRESENTATIVE);
    let (_, legacy) = X509Certificate::from_der(&legacy).unwrap();

    assert!(looks_like(&legacy, EcosystemId::SecurityDataLegacy));
    assert!(!looks_like(&legacy, EcosystemId::SecurityData));
}

#[test]
fn ecosystem_serde_names() {
    assert_eq!(
        serde_json::to_string(&EcosystemId::BancoCentralTest).unwrap(),
        "\"banco_central_test\""
    );
    assert_eq!(
        serde_json::from_str::<EcosystemId>("\"security_data_legacy\"").unwrap(),
        EcosystemId::SecurityDataLegacy
    );
}
