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
    io::{Cursor, Read},
    time::Duration,
};

use http::{Method, Request, Response};
use httpmock::prelude::*;

use crate::{
    http::{read_body, HttpResolverError, SyncHttpResolver, UreqResolver},
    settings::NetworkSettings,
};

fn get(uri: &str) -> Request<Vec<u8>> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Vec::new())
        .unwrap()
}

#[test]
fn ureq_get() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/crl/bce_test.crl");
        then.status(200)
            .header("content-type", "application/pkix-crl")
            .body(b"\x30\x00");
    });

    let resolver = UreqResolver::new(&NetworkSettings::default());
    let response = resolver
        .http_resolve(get(&server.url("/crl/bce_test.crl")))
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "application/pkix-crl"
    );

    let body = read_body(response, 1024, "test").unwrap();
    assert_eq!(body, b"\x30\x00");

    mock.assert();
}

#[test]
fn ureq_error_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing.crl");
        then.status(404);
    });

    let resolver = UreqResolver::new(&NetworkSettings::default());
    let response = resolver
        .http_resolve(get(&server.url("/missing.crl")))
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[test]
fn ureq_timeout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/slow.crl");
        then.status(200).delay(Duration::from_secs(3));
    });

    let settings = NetworkSettings {
        read_timeout_ms: 200,
        ..Default::default()
    };

    let resolver = UreqResolver::new(&settings);
    let Err(err) = resolver.http_resolve(get(&server.url("/slow.crl"))) else {
        panic!("expected a timeout");
    };

    assert!(err.is_timeout(), "{err}");
}

#[test]
fn ureq_connection_refused() {
    let resolver = UreqResolver::new(&NetworkSettings::default());
    let Err(err) = resolver.http_resolve(get("http://127.0.0.1:1/crl")) else {
        panic!("expected a connection error");
    };

    assert!(!err.is_timeout(), "{err}");
}

#[test]
fn body_limit() {
    let response = Response::builder()
        .status(200)
        .body(Box::new(Cursor::new(vec![0u8; 16])) as Box<dyn Read>)
        .unwrap();

    let err = read_body(response, 15, "http://crl.bce-test.invalid/big.crl").unwrap_err();

    assert!(matches!(
        err,
        HttpResolverError::ResponseTooLarge { limit: 15, .. }
    ));

    let response = Response::builder()
        .status(200)
        .body(Box::new(Cursor::new(vec![0u8; 16])) as Box<dyn Read>)
        .unwrap();

    assert_eq!(read_body(response, 16, "test").unwrap().len(), 16);
}

#[test]
fn insecure_resolver_builds() {
    UreqResolver::insecure(&NetworkSettings::default()).unwrap();
}
