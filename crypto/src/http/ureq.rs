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

use std::{
    io::{self, Read},
    sync::Arc,
};

use http::{header, Request, Response};

use crate::{
    http::{HttpResolverError, SyncHttpResolver},
    settings::NetworkSettings,
};

/// [`SyncHttpResolver`] backed by a [`ureq::Agent`].
///
/// Connect and read timeouts are applied to every request.
pub struct UreqResolver {
    agent: ureq::Agent,
}

impl UreqResolver {
    /// Create a resolver that verifies TLS certificates.
    pub fn new(settings: &NetworkSettings) -> Self {
        Self {
            agent: Self::agent_builder(settings).build(),
        }
    }

    /// Create a resolver that accepts any TLS certificate and host name.
    ///
    /// Only meant for revocation servers whose responses are authenticated
    /// by their own signature.
    pub fn insecure(settings: &NetworkSettings) -> Result<Self, HttpResolverError> {
        let connector = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()
            .map_err(|err| HttpResolverError::Other(Box::new(err)))?;

        Ok(Self {
            agent: Self::agent_builder(settings)
                .tls_connector(Arc::new(connector))
                .build(),
        })
    }

    fn agent_builder(settings: &NetworkSettings) -> ureq::AgentBuilder {
        ureq::AgentBuilder::new()
            .timeout_connect(settings.connect_timeout())
            .timeout_read(settings.read_timeout())
            .user_agent(&settings.user_agent)
    }
}

impl SyncHttpResolver for UreqResolver {
    fn http_resolve(
        &self,
        request: Request<Vec<u8>>,
    ) -> Result<Response<Box<dyn Read>>, HttpResolverError> {
        let uri = request.uri().to_string();

        let mut ureq_request = self.agent.request(request.method().as_str(), &uri);
        for (name, value) in request.headers() {
            if let Ok(value) = value.to_str() {
                ureq_request = ureq_request.set(name.as_str(), value);
            }
        }

        let body = request.into_body();
        let result = if body.is_empty() {
            ureq_request.call()
        } else {
            ureq_request.send_bytes(&body)
        };

        let response = match result {
            Ok(response) => response,
            // Callers look at the status themselves.
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(transport_error(transport, uri));
            }
        };

        let mut builder = Response::builder().status(response.status());

        if let Some(content_type) = response.header(header::CONTENT_TYPE.as_str()) {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }

        let body = response.into_reader();
        Ok(builder.body(Box::new(body) as Box<dyn Read>)?)
    }
}

fn transport_error(transport: ureq::Transport, uri: String) -> HttpResolverError {
    let timed_out = std::error::Error::source(&transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .is_some_and(|err| err.kind() == io::ErrorKind::TimedOut);

    if timed_out {
        HttpResolverError::Timeout { uri }
    } else {
        HttpResolverError::Other(Box::new(transport))
    }
}
