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
    error::Error,
    fmt,
    sync::{Mutex, MutexGuard},
};

static FFI_MUTEX: Mutex<()> = Mutex::new(());

/// This mutex must be held by all code that calls into OpenSSL native code.
///
/// Validators, the CRL signature check and certification path validation may
/// run concurrently on caller threads; OpenSSL calls are serialised here.
pub struct OpenSslMutex<'a> {
    // Only held so the guard is dropped together with this struct.
    #[allow(dead_code)]
    guard: MutexGuard<'a, ()>,
}

impl OpenSslMutex<'_> {
    /// Acquire a mutex on OpenSSL FFI code.
    ///
    /// WARNING: Calling code MUST NOT PANIC while holding this mutex, even in
    /// test code. Doing so poisons it and leaves OpenSSL unusable for the
    /// remainder of the process lifetime.
    pub fn acquire() -> Result<Self, OpenSslMutexUnavailable> {
        match FFI_MUTEX.lock() {
            Ok(guard) => Ok(Self { guard }),
            Err(_) => Err(OpenSslMutexUnavailable {}),
        }
    }
}

/// Error returned when unable to acquire the OpenSSL native code mutex.
///
/// A prior holder of the mutex panicked, so it is considered poisoned for the
/// remainder of the process lifetime.
#[derive(Debug, Eq, PartialEq)]
pub struct OpenSslMutexUnavailable;

impl fmt::Display for OpenSslMutexUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unable to acquire OpenSSL native code mutex")
    }
}

impl Error for OpenSslMutexUnavailable {}
