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

//! Recognition of Ecuadorian qualified certificates.
//!
//! [`classify`] tells which certification authority family issued a
//! certificate and what kind of holder it was issued to. The building blocks
//! ([`has_policy`], [`decode_extension_string`], [`decode_other_name`]) are
//! exposed for callers that read individual fields.

mod classifier;
pub use classifier::{
    classify, classify_der, is_test_issuer, looks_like, ClassifyError, EcosystemId, HolderType,
};

mod extension;
pub use extension::{decode_extension_string, decode_other_name};

mod holder;
pub use holder::HolderDetails;

pub(crate) mod oids;

mod policy;
pub use policy::has_policy;
