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

use std::io::Write;

use crate::{
    certificate::EcosystemId,
    settings::{Settings, SettingsError},
};

#[test]
fn defaults() {
    let settings = Settings::new();

    assert_eq!(settings.network.connect_timeout_ms, 10_000);
    assert_eq!(settings.network.read_timeout().as_secs(), 20);
    assert_eq!(settings.network.max_response_size, 10 * 1024 * 1024);
    assert!(settings.network.user_agent.starts_with("firmaec-crypto/"));
    assert!(settings.network.insecure_tls_ecosystems.is_empty());

    assert!(settings.ocsp.prefer_ocsp);
    assert!(settings.ocsp.crl_fallback);
    assert!(settings.ocsp.send_nonce);
    assert_eq!(
        settings
            .ocsp
            .fallback_responders
            .get(EcosystemId::BancoCentral),
        None
    );

    assert!(settings.crl.verify_signature);
    assert_eq!(settings.crl.override_points, None);
    assert_eq!(
        settings.crl.ldap_attribute,
        "certificateRevocationList;binary"
    );
}

#[test]
fn toml_overlay() {
    let settings = Settings::new()
        .with_toml(
            r#"
                [network]
                connect_timeout_ms = 1500
                insecure_tls_ecosystems = ["security_data_legacy"]

                [ocsp]
                send_nonce = false

                [ocsp.fallback_responders]
                banco_central_test = "http://ocsp.bce-test.invalid/ocsp"

                [crl]
                override_points = ["http://crl.bce-test.invalid/crl/bce_test.crl"]
            "#,
        )
        .unwrap();

    assert_eq!(settings.network.connect_timeout().as_millis(), 1500);
    assert_eq!(settings.network.read_timeout_ms, 20_000);
    assert_eq!(
        settings.network.insecure_tls_ecosystems,
        [EcosystemId::SecurityDataLegacy]
    );

    assert!(!settings.ocsp.send_nonce);
    assert!(settings.ocsp.prefer_ocsp);
    assert_eq!(
        settings
            .ocsp
            .fallback_responders
            .get(EcosystemId::BancoCentralTest),
        Some("http://ocsp.bce-test.invalid/ocsp")
    );
    assert_eq!(
        settings
            .ocsp
            .fallback_responders
            .get(EcosystemId::Unknown),
        None
    );

    assert_eq!(settings.crl.override_points.unwrap().len(), 1);
}

#[test]
fn json_overlay() {
    let settings = Settings::new()
        .with_json(r#"{"ocsp": {"prefer_ocsp": false}, "crl": {"verify_signature": false}}"#)
        .unwrap();

    assert!(!settings.ocsp.prefer_ocsp);
    assert!(!settings.crl.verify_signature);
    assert!(settings.ocsp.crl_fallback);
}

#[test]
fn bad_document() {
    assert!(matches!(
        Settings::new().with_toml("[network]\nread_timeout_ms = \"soon\""),
        Err(SettingsError::Config(_))
    ));

    assert!(Settings::new().with_json("{").is_err());
}

#[test]
fn settings_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[ocsp]\ncrl_fallback = false").unwrap();

    let settings = Settings::new().with_file(file.path()).unwrap();
    assert!(!settings.ocsp.crl_fallback);

    assert!(matches!(
        Settings::new().with_file("settings.yaml"),
        Err(SettingsError::UnsupportedFormat(ext)) if ext == "yaml"
    ));

    assert!(matches!(
        Settings::new().with_file("does-not-exist.json"),
        Err(SettingsError::Io(_))
    ));
}

#[test]
fn toml_round_trip() {
    let mut settings = Settings::new();
    settings.ocsp.fallback_responders.security_data =
        Some("http://ocsp.securitydata.invalid".to_string());
    settings.crl.override_points = Some(vec!["ldap://ldap.bce-test.invalid/cn=CRL1".to_string()]);

    let toml = settings.to_toml().unwrap();
    let reloaded = Settings::new().with_toml(&toml).unwrap();

    assert_eq!(reloaded, settings);
}
