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

use crate::{certificate::has_policy, tests::test_utils::*, trust_anchors::TrustAnchorRegistry};

#[test]
fn prefix_match() {
    let cert_der = der(BCE_TEST_NATURAL);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    // The certificate carries 1.3.6.1.4.1.37947.2.1.1.
    assert!(has_policy(&cert, "1.3.6.1.4.1.37947.2.1"));
    assert!(has_policy(&cert, "1.3.6.1.4.1.37947.2.1.1"));
    assert!(has_policy(&cert, "1.3.6.1.4.1.37947"));
    assert!(!has_policy(&cert, "1.3.6.1.4.1.37947.2.2"));
    assert!(!has_policy(&cert, "1.3.6.1.4.1.37947.2.1.1.1"));
}

#[test]
fn other_holder_policy() {
    // The only policy is 1.3.6.1.4.1.37947.2.2.1.
    let cert_der = der(BCE_TEST_LEGAL);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    assert!(!has_policy(&cert, "1.3.6.1.4.1.37947.2.1"));
    assert!(has_policy(&cert, "1.3.6.1.4.1.37947.2.2"));
}

#[test]
fn partial_arc_prefix() {
    let cert_der = der(BCE_TEST_NATURAL);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    assert!(has_policy(&cert, "1.3.6.1.4.1.37947.2.1."));
    assert!(has_policy(&cert, "1.3.6.1.4.1.37947.2."));
    assert!(has_policy(&cert, "1.3.6.1.4.1.3794"));

    let cert_der = der(FOREIGN);
    let (_, cert) = X509Certificate::from_der(&cert_der).unwrap();

    // The certificate carries 2.23.140.1.2.1.
    assert!(has_policy(&cert, "2.23.140.1"));
    assert!(has_policy(&cert, "2.23.14"));
    assert!(!has_policy(&cert, "2.23.140.1.2.11"));
}

#[test]
fn no_policies_extension() {
    let registry = TrustAnchorRegistry::builtin().unwrap();
    let root = registry
        .root_anchor(crate::EcosystemId::BancoCentral)
        .unwrap();

    let (_, cert) = X509Certificate::from_der(root.der()).unwrap();
    assert!(!has_policy(&cert, "1.3.6.1.4.1.37947.2"));
}
