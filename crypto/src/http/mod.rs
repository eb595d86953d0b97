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

//! HTTP abstraction layer.
//!
//! CRL downloads and OCSP queries go through [`SyncHttpResolver`] so that
//! host applications can plug in their own client, restrict where the crate
//! connects, or serve canned responses in tests. [`UreqResolver`] is the
//! default implementation.

use std::io::{self, Read};

use http::{Request, Response};

mod ureq;
pub use self::ureq::UreqResolver;

/// A resolver for sync (blocking) HTTP requests.
pub trait SyncHttpResolver {
    /// Resolve a [`Request`] into a [`Response`] with a streaming body.
    ///
    /// Implementations return non-success statuses as responses. Errors are
    /// reserved for requests that produced no response at all.
    fn http_resolve(
        &self,
        request: Request<Vec<u8>>,
    ) -> Result<Response<Box<dyn Read>>, HttpResolverError>;
}

impl<T: SyncHttpResolver + ?Sized> SyncHttpResolver for &T {
    fn http_resolve(
        &self,
        request: Request<Vec<u8>>,
    ) -> Result<Response<Box<dyn Read>>, HttpResolverError> {
        (**self).http_resolve(request)
    }
}

impl<T: SyncHttpResolver + ?Sized> SyncHttpResolver for Box<T> {
    fn http_resolve(
        &self,
        request: Request<Vec<u8>>,
    ) -> Result<Response<Box<dyn Read>>, HttpResolverError> {
        (**self).http_resolve(request)
    }
}

/// An error that occurs while resolving an HTTP request.
#[derive(Debug, thiserror::Error)]
pub enum HttpResolverError {
    /// An error occured in the [`http`] crate.
    #[error(transparent)]
    Http(#[from] http::Error),

    /// An error occured during I/O.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The connect or read timeout elapsed.
    #[error("request to \"{uri}\" timed out")]
    Timeout {
        /// Requested URI.
        uri: String,
    },

    /// The response body is larger than the configured limit.
    #[error("response from \"{uri}\" exceeds {limit} bytes")]
    ResponseTooLarge {
        /// Requested URI.
        uri: String,

        /// Configured limit in bytes.
        limit: usize,
    },

    /// An error occured in the underlying HTTP client.
    #[error("an error occurred from the underlying http resolver: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl HttpResolverError {
    /// Return `true` if the request failed because a timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Io(err) => err.kind() == io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

/// Read a response body, failing if it exceeds `limit` bytes.
pub(crate) fn read_body(
    response: Response<Box<dyn Read>>,
    limit: usize,
    uri: &str,
) -> Result<Vec<u8>, HttpResolverError> {
    let mut body = Vec::new();

    response
        .into_body()
        .take(limit as u64 + 1)
        .read_to_end(&mut body)
        .map_err(|err| {
            if err.kind() == io::ErrorKind::TimedOut {
                HttpResolverError::Timeout {
                    uri: uri.to_string(),
                }
            } else {
                HttpResolverError::Io(err)
            }
        })?;

    if body.len() > limit {
        return Err(HttpResolverError::ResponseTooLarge {
            uri: uri.to_string(),
            limit,
        });
    }

    Ok(body)
}
