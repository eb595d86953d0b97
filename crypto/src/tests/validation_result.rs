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

use crate::{
    certificate::{ClassifyError, EcosystemId},
    validation_result::{Outcome, ValidationError, ValidationReport, ValidationResult},
};

#[test]
fn valid_json() {
    assert_eq!(ValidationResult::Valid.to_json().unwrap(), r#"{"result":"OK"}"#);
}

#[test]
fn negative_json() {
    assert_eq!(
        ValidationResult::CannotDownloadCrl.to_json().unwrap(),
        r#"{"result":"KO","reason":"CANNOT_DOWNLOAD_CRL"}"#
    );

    for result in ValidationResult::ALL {
        let json = result.to_json().unwrap();

        if !result.is_valid() {
            assert_eq!(
                json,
                format!(r#"{{"result":"KO","reason":"{}"}}"#, result.name())
            );
        }

        assert_eq!(ValidationResult::from_json(&json).unwrap(), result);
    }
}

#[test]
fn ko_without_reason() {
    let report: ValidationReport = serde_json::from_str(r#"{"result":"KO"}"#).unwrap();

    assert_eq!(report.result, Outcome::Ko);
    assert_eq!(report.outcome(), ValidationResult::Unknown);
}

#[test]
fn rejects_inconsistent_report() {
    assert!(ValidationResult::from_json(r#"{"result":"KO","reason":"VALID"}"#).is_err());
    assert!(ValidationResult::from_json(r#"{"result":"OK","reason":"REVOKED"}"#).is_err());
    assert!(ValidationResult::from_json(r#"{"result":"OK","reason":"VALID"}"#).is_err());

    assert_eq!(
        ValidationResult::from_json(r#"{"result":"KO"}"#).unwrap(),
        ValidationResult::Unknown
    );
}

#[test]
fn rejects_unknown_reason() {
    assert!(ValidationResult::from_json(r#"{"result":"KO","reason":"MAYBE"}"#).is_err());
}

#[test]
fn names_are_distinct() {
    let mut names: Vec<&str> = ValidationResult::ALL.iter().map(|r| r.name()).collect();
    names.sort_unstable();
    names.dedup();

    assert_eq!(names.len(), 12);
    assert_eq!(ValidationResult::Expired.to_string(), "EXPIRED");
}

#[test]
fn check() {
    ValidationResult::Valid.check().unwrap();

    for result in ValidationResult::ALL.into_iter().filter(|r| !r.is_valid()) {
        assert!(result.check().is_err(), "{result}");
    }

    let err = ValidationResult::Revoked.check().unwrap_err();
    assert_eq!(err, ValidationError::Revoked);
    assert_eq!(err.to_string(), "certificate revoked");
}

#[test]
fn definitive() {
    let definitive: Vec<ValidationResult> = ValidationResult::ALL
        .into_iter()
        .filter(|r| r.is_definitive())
        .collect();

    assert_eq!(
        definitive,
        [ValidationResult::Valid, ValidationResult::Revoked]
    );
}

#[test]
fn from_classify_error() {
    assert_eq!(
        ValidationResult::from(ClassifyError::Corrupt),
        ValidationResult::Corrupt
    );
    assert_eq!(
        ValidationResult::from(ClassifyError::NotRecognized),
        ValidationResult::CaNotSupported
    );
    assert_eq!(
        ValidationResult::from(ClassifyError::UnsupportedProfile(
            EcosystemId::SecurityData
        )),
        ValidationResult::CaNotSupported
    );
}
