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

//! Configuration for revocation checking.
//!
//! Settings are plain values injected into each component; nothing here is
//! global. A partial TOML or JSON document can be overlaid on the defaults:
//!
//! ```
//! # use firmaec_crypto::settings::Settings;
//! let settings = Settings::new()
//!     .with_toml(
//!         r#"
//!             [network]
//!             read_timeout_ms = 5000
//!         "#,
//!     )
//!     .unwrap();
//!
//! assert_eq!(settings.network.read_timeout_ms, 5000);
//! assert!(settings.ocsp.send_nonce);
//! ```

use std::{path::Path, time::Duration};

use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::certificate::EcosystemId;

/// Settings for the HTTP and LDAP clients.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Connect timeout for each request, in milliseconds.
    ///
    /// The default value is 10000.
    pub connect_timeout_ms: u64,

    /// Read timeout for each request, in milliseconds.
    ///
    /// The default value is 20000.
    pub read_timeout_ms: u64,

    /// Largest CRL or OCSP response accepted, in bytes.
    ///
    /// The default value is 10 MiB.
    pub max_response_size: usize,

    /// `User-Agent` header sent with HTTP requests.
    pub user_agent: String,

    /// Ecosystems whose revocation servers are reached without verifying
    /// their TLS certificate chain or host name.
    ///
    /// Applies to `https` OCSP responders and CRL distribution points as
    /// well as `ldaps` distribution points.
    ///
    /// The default value is empty.
    ///
    /// <div class="warning">
    /// Only list an ecosystem here if its revocation infrastructure uses a TLS
    /// chain that is not publicly trusted. Responses are still verified
    /// against the ecosystem's sub-CA key.
    /// </div>
    pub insecure_tls_ecosystems: Vec<EcosystemId>,
}

impl NetworkSettings {
    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Read timeout as a [`Duration`].
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            read_timeout_ms: 20_000,
            max_response_size: 10 * 1024 * 1024,
            user_agent: concat!("firmaec-crypto/", env!("CARGO_PKG_VERSION")).to_string(),
            insecure_tls_ecosystems: Vec::new(),
        }
    }
}

/// Settings for OCSP checking.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct OcspSettings {
    /// Whether the unified validator queries OCSP before CRLs.
    ///
    /// The default value is true.
    pub prefer_ocsp: bool,

    /// Whether to fall back to CRLs when OCSP times out, has no responder or
    /// gives no definitive answer.
    ///
    /// The default value is true.
    pub crl_fallback: bool,

    /// Whether to send a nonce and require the responder to echo it.
    ///
    /// The default value is true.
    pub send_nonce: bool,

    /// Responder URLs used when a certificate has no OCSP entry in its
    /// Authority Information Access extension.
    pub fallback_responders: FallbackResponders,
}

impl Default for OcspSettings {
    fn default() -> Self {
        Self {
            prefer_ocsp: true,
            crl_fallback: true,
            send_nonce: true,
            fallback_responders: FallbackResponders::default(),
        }
    }
}

/// Static OCSP responder URL per ecosystem.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct FallbackResponders {
    /// Banco Central del Ecuador.
    pub banco_central: Option<String>,

    /// Banco Central del Ecuador, test hierarchy.
    pub banco_central_test: Option<String>,

    /// Security Data.
    pub security_data: Option<String>,

    /// Security Data, legacy sub-CA.
    pub security_data_legacy: Option<String>,
}

impl FallbackResponders {
    /// Return the fallback responder of `ecosystem`, if configured.
    pub fn get(&self, ecosystem: EcosystemId) -> Option<&str> {
        match ecosystem {
            EcosystemId::BancoCentral => self.banco_central.as_deref(),
            EcosystemId::BancoCentralTest => self.banco_central_test.as_deref(),
            EcosystemId::SecurityData => self.security_data.as_deref(),
            EcosystemId::SecurityDataLegacy => self.security_data_legacy.as_deref(),
            EcosystemId::Unknown => None,
        }
    }
}

/// Settings for CRL checking.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct CrlSettings {
    /// Whether to verify each CRL signature against the ecosystem's sub-CA
    /// key.
    ///
    /// The default value is true.
    pub verify_signature: bool,

    /// Distribution points that replace the ones listed in certificates.
    pub override_points: Option<Vec<String>>,

    /// LDAP attribute holding the CRL.
    ///
    /// The default value is `certificateRevocationList;binary`.
    pub ldap_attribute: String,
}

impl Default for CrlSettings {
    fn default() -> Self {
        Self {
            verify_signature: true,
            override_points: None,
            ldap_attribute: "certificateRevocationList;binary".to_string(),
        }
    }
}

/// All settings of this crate.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP and LDAP clients.
    pub network: NetworkSettings,

    /// OCSP checking.
    pub ocsp: OcspSettings,

    /// CRL checking.
    pub crl: CrlSettings,
}

impl Settings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay a (possibly partial) TOML document on these settings.
    pub fn with_toml(self, toml: &str) -> Result<Self, SettingsError> {
        self.with_string(toml, FileFormat::Toml)
    }

    /// Overlay a (possibly partial) JSON document on these settings.
    pub fn with_json(self, json: &str) -> Result<Self, SettingsError> {
        self.with_string(json, FileFormat::Json)
    }

    /// Overlay a settings file on these settings.
    ///
    /// The format is taken from the file extension, which must be `toml` or
    /// `json`.
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();

        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();

        let format = match ext.as_str() {
            "toml" => FileFormat::Toml,
            "json" => FileFormat::Json,
            _ => return Err(SettingsError::UnsupportedFormat(ext)),
        };

        let contents = std::fs::read_to_string(path)?;
        self.with_string(&contents, format)
    }

    /// Serialize these settings as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string(self)?)
    }

    fn with_string(self, settings_str: &str, format: FileFormat) -> Result<Self, SettingsError> {
        let current = Config::try_from(&self)?;

        let updated = Config::builder()
            .add_source(current)
            .add_source(config::File::from_str(settings_str, format))
            .build()?;

        Ok(updated.try_deserialize::<Settings>()?)
    }
}

/// Describes errors that can occur while loading [`Settings`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// The settings document could not be parsed or does not match the
    /// expected shape.
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// The settings file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Settings could not be serialized as TOML.
    #[error(transparent)]
    Toml(#[from] toml::ser::Error),

    /// The settings file extension is not `toml` or `json`.
    #[error("unsupported settings format \"{0}\"")]
    UnsupportedFormat(String),
}
