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

use crate::hash::{sha1, sha256};

#[test]
fn test_sha1() {
    let hash = sha1(b"test message");
    assert_eq!(hex::encode(hash), "35ee8386410d41d14b3f779fc95f4695f4851682");
}

#[test]
fn test_sha256() {
    let hash = sha256(b"test message");
    assert_eq!(
        hex::encode(hash),
        "3f0a377ba0a4a460ecb616f6507ce0d8cfa3e704025d4fda3ed0c5ca05468728"
    );
}
