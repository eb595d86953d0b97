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

//! The closed set of outcomes of a certificate validation.

use std::fmt;

use serde::{de, Deserialize, Serialize};
use thiserror::Error;

use crate::certificate::ClassifyError;

/// Outcome of validating a certificate.
///
/// Exactly one value is produced per validation. [`ValidationResult::Valid`]
/// is the only success; every other value is a terminal negative outcome.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationResult {
    /// The certificate is not revoked.
    Valid,

    /// The certificate under test could not be decoded.
    Corrupt,

    /// The issuing certification authority is not supported.
    CaNotSupported,

    /// The certificate validity period has not started.
    NotYetValid,

    /// The certificate validity period has ended.
    Expired,

    /// The certificate is revoked.
    Revoked,

    /// No definitive revocation status could be obtained.
    Unknown,

    /// A revocation server failed or sent an unusable response.
    ServerError,

    /// The OCSP responder refused to answer for this certificate.
    Unauthorized,

    /// The OCSP responder rejected the request as malformed.
    MalformedRequest,

    /// The OCSP responder requires signed requests.
    SigRequired,

    /// None of the CRL distribution points could be downloaded.
    CannotDownloadCrl,
}

impl ValidationResult {
    /// Every outcome, `Valid` first.
    pub const ALL: [ValidationResult; 12] = [
        Self::Valid,
        Self::Corrupt,
        Self::CaNotSupported,
        Self::NotYetValid,
        Self::Expired,
        Self::Revoked,
        Self::Unknown,
        Self::ServerError,
        Self::Unauthorized,
        Self::MalformedRequest,
        Self::SigRequired,
        Self::CannotDownloadCrl,
    ];

    /// Return the wire name of this outcome, such as `CANNOT_DOWNLOAD_CRL`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Corrupt => "CORRUPT",
            Self::CaNotSupported => "CA_NOT_SUPPORTED",
            Self::NotYetValid => "NOT_YET_VALID",
            Self::Expired => "EXPIRED",
            Self::Revoked => "REVOKED",
            Self::Unknown => "UNKNOWN",
            Self::ServerError => "SERVER_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::MalformedRequest => "MALFORMED_REQUEST",
            Self::SigRequired => "SIG_REQUIRED",
            Self::CannotDownloadCrl => "CANNOT_DOWNLOAD_CRL",
        }
    }

    /// Return `true` for [`ValidationResult::Valid`].
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }

    /// Return `true` if this outcome settles the revocation status, that is
    /// `Valid` or `Revoked`.
    pub fn is_definitive(self) -> bool {
        matches!(self, Self::Valid | Self::Revoked)
    }

    /// Convert into a `Result` for callers that propagate failures with `?`.
    pub fn check(self) -> Result<(), ValidationError> {
        let err = match self {
            Self::Valid => return Ok(()),
            Self::Corrupt => ValidationError::Corrupt,
            Self::CaNotSupported => ValidationError::CaNotSupported,
            Self::NotYetValid => ValidationError::NotYetValid,
            Self::Expired => ValidationError::Expired,
            Self::Revoked => ValidationError::Revoked,
            Self::Unknown => ValidationError::Unknown,
            Self::ServerError => ValidationError::ServerError,
            Self::Unauthorized => ValidationError::Unauthorized,
            Self::MalformedRequest => ValidationError::MalformedRequest,
            Self::SigRequired => ValidationError::SigRequired,
            Self::CannotDownloadCrl => ValidationError::CannotDownloadCrl,
        };

        Err(err)
    }

    /// Return the structured report for this outcome.
    pub fn report(self) -> ValidationReport {
        if self.is_valid() {
            ValidationReport {
                result: Outcome::Ok,
                reason: None,
            }
        } else {
            ValidationReport {
                result: Outcome::Ko,
                reason: Some(self),
            }
        }
    }

    /// Serialize as `{"result":"OK"}` or `{"result":"KO","reason":"<NAME>"}`.
    pub fn to_json(self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.report())
    }

    /// Parse the output of [`ValidationResult::to_json`].
    ///
    /// An `OK` report with a reason, or a `KO` report whose reason is
    /// `VALID`, is rejected.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let report: ValidationReport = serde_json::from_str(json)?;

        match (report.result, report.reason) {
            (Outcome::Ok, Some(reason)) => Err(de::Error::custom(format!(
                "result OK cannot carry reason {reason}"
            ))),
            (Outcome::Ko, Some(Self::Valid)) => {
                Err(de::Error::custom("result KO cannot carry reason VALID"))
            }
            _ => Ok(report.outcome()),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ClassifyError> for ValidationResult {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::Corrupt => Self::Corrupt,
            _ => Self::CaNotSupported,
        }
    }
}

/// Minimal structured form of a [`ValidationResult`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ValidationReport {
    /// `OK` for a valid certificate, `KO` otherwise.
    pub result: Outcome,

    /// The negative outcome, absent when `result` is `OK`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ValidationResult>,
}

impl ValidationReport {
    /// Return the outcome this report describes.
    ///
    /// A `KO` report without a reason reads as [`ValidationResult::Unknown`].
    pub fn outcome(self) -> ValidationResult {
        match self.result {
            Outcome::Ok => ValidationResult::Valid,
            Outcome::Ko => self.reason.unwrap_or(ValidationResult::Unknown),
        }
    }
}

/// Success flag of a [`ValidationReport`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    /// Validation succeeded.
    Ok,

    /// Validation failed.
    Ko,
}

/// Named failure for each negative [`ValidationResult`].
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ValidationError {
    /// See [`ValidationResult::Corrupt`].
    #[error("certificate is corrupt")]
    Corrupt,

    /// See [`ValidationResult::CaNotSupported`].
    #[error("certification authority not supported")]
    CaNotSupported,

    /// See [`ValidationResult::NotYetValid`].
    #[error("certificate is not yet valid")]
    NotYetValid,

    /// See [`ValidationResult::Expired`].
    #[error("certificate expired")]
    Expired,

    /// See [`ValidationResult::Revoked`].
    #[error("certificate revoked")]
    Revoked,

    /// See [`ValidationResult::Unknown`].
    #[error("certificate revocation status unknown")]
    Unknown,

    /// See [`ValidationResult::ServerError`].
    #[error("revocation server error")]
    ServerError,

    /// See [`ValidationResult::Unauthorized`].
    #[error("not authorized to query the OCSP responder")]
    Unauthorized,

    /// See [`ValidationResult::MalformedRequest`].
    #[error("the OCSP responder rejected the request as malformed")]
    MalformedRequest,

    /// See [`ValidationResult::SigRequired`].
    #[error("the OCSP responder requires a signed request")]
    SigRequired,

    /// See [`ValidationResult::CannotDownloadCrl`].
    #[error("cannot download CRL")]
    CannotDownloadCrl,
}
