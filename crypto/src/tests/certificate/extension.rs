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
    certificate::{decode_extension_string, decode_other_name},
    tests::test_utils::*,
};

#[test]
fn utf8_string() {
    let cert_der = der(BCE_TEST_NATURAL);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    assert_eq!(
        decode_extension_string(&cert, "1.3.6.1.4.1.37947.3.1").as_deref(),
        Some("1712345678")
    );
    assert_eq!(
        decode_extension_string(&cert, "1.3.6.1.4.1.37947.3.2").as_deref(),
        Some("JUAN CARLOS")
    );
}

#[test]
fn octet_string_wrapped() {
    let cert_der = der(BCE_TEST_LEGAL);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    assert_eq!(
        decode_extension_string(&cert, "1.3.6.1.4.1.37947.3.10").as_deref(),
        Some("ACME SOLUCIONES S.A.")
    );
}

#[test]
fn printable_string() {
    let cert_der = der(BCE_TEST_LEGAL);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    assert_eq!(
        decode_extension_string(&cert, "1.3.6.1.4.1.37947.3.11").as_deref(),
        Some("1790012345001")
    );
}

#[test]
fn not_a_string() {
    // 1.3.6.1.4.1.37947.3.9 holds the raw bytes 01 02 03 04.
    let cert_der = der(BCE_TEST_LEGAL);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    assert_eq!(decode_extension_string(&cert, "1.3.6.1.4.1.37947.3.9"), None);
}

#[test]
fn absent() {
    let cert_der = der(BCE_TEST_NATURAL);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    assert_eq!(decode_extension_string(&cert, "1.3.6.1.4.1.37947.3.11"), None);
    assert_eq!(decode_extension_string(&cert, "1.2.3.4"), None);
}

#[test]
fn other_name() {
    let cert_der = der(BCE_TEST_LEGAL);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    let san = cert.subject_alternative_name().unwrap().unwrap();
    let names = &san.value.general_names;
    assert_eq!(names.len(), 2);

    let found: Vec<String> = names
        .iter()
        .filter_map(|name| decode_other_name(name, "1.3.6.1.4.1.37947.3.1"))
        .collect();
    assert_eq!(found, vec!["1790012345001".to_string()]);

    assert!(names
        .iter()
        .all(|name| decode_other_name(name, "1.3.6.1.4.1.37947.3.2").is_none()));
}
