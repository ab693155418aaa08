// Copyright 2024 The shamir39 Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Implements hex utilities used by tests and callers

use crate::error::{Error, ErrorKind};
use std::fmt::Write;

/// Encode bytes into a lowercase hex string
pub fn to_hex(bytes: &[u8]) -> String {
	let mut s = String::with_capacity(bytes.len() * 2);
	for b in bytes {
		let _ = write!(s, "{:02x}", b);
	}
	s
}

/// Decode a hex string into bytes
pub fn from_hex(hex: &str) -> Result<Vec<u8>, Error> {
	let hex = hex.trim().trim_start_matches("0x");
	if hex.len() % 2 != 0 {
		return Err(ErrorKind::InvalidInput(
			"Hex string must have an even number of digits".to_string(),
		))?;
	}
	let mut retval = Vec::with_capacity(hex.len() / 2);
	for i in (0..hex.len()).step_by(2) {
		let byte = u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| {
			Error::from(ErrorKind::InvalidInput(format!(
				"Invalid hex string: {}",
				e,
			)))
		})?;
		retval.push(byte);
	}
	Ok(retval)
}
