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

//! Signature algorithm identifiers, in dotted-decimal form.

pub(crate) const SHA1_WITH_RSAENCRYPTION_OID: &str = "1.2.840.113549.1.1.5";
pub(crate) const SHA256_WITH_RSAENCRYPTION_OID: &str = "1.2.840.113549.1.1.11";
pub(crate) const SHA384_WITH_RSAENCRYPTION_OID: &str = "1.2.840.113549.1.1.12";
pub(crate) const SHA512_WITH_RSAENCRYPTION_OID: &str = "1.2.840.113549.1.1.13";

pub(crate) const ECDSA_WITH_SHA256_OID: &str = "1.2.840.10045.4.3.2";
pub(crate) const ECDSA_WITH_SHA384_OID: &str = "1.2.840.10045.4.3.3";
pub(crate) const ECDSA_WITH_SHA512_OID: &str = "1.2.840.10045.4.3.4";
