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

//! Reading values out of certificate extensions.
//!
//! Both ecosystems store holder data (cédula, names, RUC, ...) in private,
//! non-critical extensions whose value is a DER character string. Some
//! issuers wrap that string in an additional OCTET STRING. A few copies of
//! the same value also appear as `otherName` entries in the subject
//! alternative name.
//!
//! Everything here is best-effort: a malformed optional field is reported as
//! absent and logged, it never aborts classification.

use asn1_rs::{Any, Class, FromDer, Tag};
use log::debug;
use x509_parser::{certificate::X509Certificate, extensions::GeneralName};

// Upper bound on nested OCTET STRING wrappers.
const MAX_WRAPPING_DEPTH: usize = 4;

/// Return the text held by the extension `oid` of `cert`.
///
/// Returns `None` if the extension is absent or if its value is not a
/// (possibly OCTET STRING wrapped) DER character string.
pub fn decode_extension_string(cert: &X509Certificate<'_>, oid: &str) -> Option<String> {
    let ext = cert
        .iter_extensions()
        .find(|ext| ext.oid.to_id_string() == oid)?;

    let text = decode_string_value(ext.value);
    if text.is_none() {
        debug!("extension {oid} does not hold a character string");
    }

    text
}

/// Return the text of a subject alternative name entry if it is an
/// `otherName` whose type identifier is `oid`.
pub fn decode_other_name(san_entry: &GeneralName<'_>, oid: &str) -> Option<String> {
    let GeneralName::OtherName(type_id, value) = san_entry else {
        return None;
    };

    if type_id.to_id_string() != oid {
        return None;
    }

    // value is `[0] EXPLICIT ANY DEFINED BY type-id`
    let explicit = match Any::from_der(value) {
        Ok((_, any)) if any.class() == Class::ContextSpecific && any.tag() == Tag(0) => any,
        Ok((_, any)) => {
            debug!(
                "otherName {oid} has unexpected tag {} ({})",
                any.tag(),
                any.class()
            );
            return None;
        }
        Err(err) => {
            debug!("otherName {oid} could not be decoded: {err}");
            return None;
        }
    };

    let text = decode_string_value(explicit.data);
    if text.is_none() {
        debug!("otherName {oid} does not hold a character string");
    }

    text
}

/// Decode a DER character string, unwrapping any OCTET STRING layers around
/// it.
fn decode_string_value(der: &[u8]) -> Option<String> {
    let mut der = der;

    for _ in 0..MAX_WRAPPING_DEPTH {
        let any = match Any::from_der(der) {
            Ok((_, any)) => any,
            Err(err) => {
                debug!("invalid DER in extension value: {err}");
                return None;
            }
        };

        if any.class() != Class::Universal {
            return None;
        }

        match any.tag() {
            Tag::OctetString => der = any.data,
            tag => return string_from_tagged(tag, any.data),
        }
    }

    None
}

fn string_from_tagged(tag: Tag, data: &[u8]) -> Option<String> {
    match tag {
        Tag::Utf8String
        | Tag::PrintableString
        | Tag::Ia5String
        | Tag::VisibleString
        | Tag::NumericString => std::str::from_utf8(data).ok().map(str::to_owned),

        // Treated as Latin-1; the CAs only ever put ASCII here.
        Tag::T61String => Some(data.iter().map(|&b| b as char).collect()),

        Tag::BmpString => {
            if data.len() % 2 != 0 {
                return None;
            }

            let units: Vec<u16> = data
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();

            String::from_utf16(&units).ok()
        }

        Tag::UniversalString => {
            if data.len() % 4 != 0 {
                return None;
            }

            data.chunks_exact(4)
                .map(|quad| char::from_u32(u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]])))
                .collect()
        }

        _ => None,
    }
}
