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

//! LDAP access for CRL distribution points.
//!
//! Distribution points of the form
//! `ldap://host[:port]/<dn>?<attribute>` name a directory entry whose
//! attribute holds the DER-encoded CRL.

use std::time::Duration;

use ldap3::{LdapConn, LdapConnSettings, LdapError, Scope, SearchEntry};
use log::debug;
use thiserror::Error;
use url::Url;

use crate::settings::NetworkSettings;

/// A directory client able to read one binary attribute of one entry.
pub trait DirectoryResolver {
    /// Read `attribute` of the entry named by the DN in `url`.
    ///
    /// An attribute list in the URL takes precedence over `attribute`.
    fn read_binary_attribute(&self, url: &str, attribute: &str) -> Result<Vec<u8>, DirectoryError>;
}

impl<T: DirectoryResolver + ?Sized> DirectoryResolver for &T {
    fn read_binary_attribute(&self, url: &str, attribute: &str) -> Result<Vec<u8>, DirectoryError> {
        (**self).read_binary_attribute(url, attribute)
    }
}

impl<T: DirectoryResolver + ?Sized> DirectoryResolver for Box<T> {
    fn read_binary_attribute(&self, url: &str, attribute: &str) -> Result<Vec<u8>, DirectoryError> {
        (**self).read_binary_attribute(url, attribute)
    }
}

/// [`DirectoryResolver`] backed by a synchronous [`ldap3`] connection.
///
/// Each call opens a connection, binds anonymously, performs one base-scope
/// search and unbinds.
#[derive(Clone, Debug)]
pub struct LdapDirectory {
    connect_timeout: Duration,
    operation_timeout: Duration,
    no_tls_verify: bool,
}

impl LdapDirectory {
    /// Create a directory client using the timeouts of `settings`.
    pub fn new(settings: &NetworkSettings) -> Self {
        Self {
            connect_timeout: settings.connect_timeout(),
            operation_timeout: settings.read_timeout(),
            no_tls_verify: false,
        }
    }

    /// Skip TLS certificate verification for `ldaps` URLs.
    pub fn with_no_tls_verify(mut self, no_tls_verify: bool) -> Self {
        self.no_tls_verify = no_tls_verify;
        self
    }
}

impl DirectoryResolver for LdapDirectory {
    fn read_binary_attribute(&self, url: &str, attribute: &str) -> Result<Vec<u8>, DirectoryError> {
        let target = LdapUrl::parse(url)?;
        let attribute = target.attribute.as_deref().unwrap_or(attribute);

        let conn_settings = LdapConnSettings::new()
            .set_conn_timeout(self.connect_timeout)
            .set_no_tls_verify(self.no_tls_verify);

        let wrap = |err: LdapError| DirectoryError::from_ldap(url, err);

        let mut ldap = LdapConn::with_settings(conn_settings, &target.server).map_err(wrap)?;

        ldap.with_timeout(self.operation_timeout)
            .simple_bind("", "")
            .and_then(|result| result.success())
            .map_err(wrap)?;

        let (entries, _) = ldap
            .with_timeout(self.operation_timeout)
            .search(&target.dn, Scope::Base, "(objectClass=*)", vec![attribute])
            .and_then(|result| result.success())
            .map_err(wrap)?;

        if let Err(err) = ldap.unbind() {
            debug!("LDAP unbind from {} failed: {err}", target.server);
        }

        entries
            .into_iter()
            .map(SearchEntry::construct)
            .find_map(|entry| attribute_value(entry, attribute))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| DirectoryError::EmptyAttribute {
                url: url.to_string(),
                attribute: attribute.to_string(),
            })
    }
}

/// The parts of an RFC 4516 LDAP URL needed to read a CRL.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct LdapUrl {
    /// `scheme://host:port`
    pub server: String,

    /// Percent-decoded base DN.
    pub dn: String,

    /// First attribute of the URL's attribute list.
    pub attribute: Option<String>,
}

impl LdapUrl {
    pub(crate) fn parse(url: &str) -> Result<Self, DirectoryError> {
        let invalid = || DirectoryError::InvalidUrl(url.to_string());

        let parsed = Url::parse(url).map_err(|_| invalid())?;

        let default_port = match parsed.scheme() {
            "ldap" => 389,
            "ldaps" => 636,
            _ => return Err(invalid()),
        };

        let host = parsed.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
        let port = parsed.port().unwrap_or(default_port);

        let dn = urlencoding::decode(parsed.path().trim_start_matches('/'))
            .map_err(|_| invalid())?
            .into_owned();

        let attribute = match parsed.query() {
            Some(query) => {
                let first = query.split('?').next().unwrap_or_default();
                let first = first.split(',').next().unwrap_or_default();
                let first = urlencoding::decode(first).map_err(|_| invalid())?;
                (!first.is_empty()).then(|| first.into_owned())
            }
            None => None,
        };

        Ok(Self {
            server: format!("{}://{host}:{port}", parsed.scheme()),
            dn,
            attribute,
        })
    }
}

fn attribute_value(entry: SearchEntry, attribute: &str) -> Option<Vec<u8>> {
    // Servers may return the type with or without the ";binary" option.
    let base_name = attribute.split(';').next().unwrap_or(attribute);
    let matches = |name: &str| {
        name.eq_ignore_ascii_case(attribute)
            || name
                .split(';')
                .next()
                .is_some_and(|n| n.eq_ignore_ascii_case(base_name))
    };

    let binary = entry
        .bin_attrs
        .into_iter()
        .find(|(name, _)| matches(name))
        .and_then(|(_, mut values)| values.drain(..).next());

    binary.or_else(|| {
        entry
            .attrs
            .into_iter()
            .find(|(name, _)| matches(name))
            .and_then(|(_, mut values)| values.drain(..).next())
            .map(String::into_bytes)
    })
}

/// Describes errors that can occur while reading from a directory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DirectoryError {
    /// The URL is not a usable `ldap` or `ldaps` URL.
    #[error("invalid LDAP URL \"{0}\"")]
    InvalidUrl(String),

    /// The connect or operation timeout elapsed.
    #[error("LDAP request to \"{url}\" timed out")]
    Timeout {
        /// Requested URL.
        url: String,
    },

    /// The entry has no value for the requested attribute.
    #[error("\"{url}\" has no value for {attribute}")]
    EmptyAttribute {
        /// Requested URL.
        url: String,

        /// Requested attribute.
        attribute: String,
    },

    /// The directory server or the LDAP client reported an error.
    #[error("LDAP error for \"{url}\": {source}")]
    Ldap {
        /// Requested URL.
        url: String,

        /// Underlying error.
        source: LdapError,
    },
}

impl DirectoryError {
    fn from_ldap(url: &str, err: LdapError) -> Self {
        match err {
            LdapError::Timeout { .. } => Self::Timeout {
                url: url.to_string(),
            },
            source => Self::Ldap {
                url: url.to_string(),
                source,
            },
        }
    }

    /// Return `true` if the request failed because a timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
