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

//! Verification of raw signatures over DER structures.
//!
//! Certificates, CRLs and OCSP responses all carry a signature algorithm
//! identifier next to a signature value computed over a `tbs` structure.
//! This module maps the algorithm OID to a validator that checks the value
//! against a `SubjectPublicKeyInfo`.

pub(crate) mod oids;

mod validator;
pub(crate) use validator::verify_signature;
pub use validator::{validator_for_sig_alg, RawSignatureValidationError, RawSignatureValidator};
