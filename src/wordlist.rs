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

//! The 1024-word share wordlist and its bijection with 10-bit indices.
//! Any two words differ within their first four letters, so prefixes are
//! enough to identify a word during transcription.

use crate::error::{Error, ErrorKind};
use std::collections::HashMap;

/// Number of bits encoded by one word
pub const RADIX_BITS: u8 = 10;
/// Number of words in the list
pub const RADIX: u16 = 1 << RADIX_BITS;
/// Words are pairwise distinct within this many leading letters
pub const UNIQUE_PREFIX_LENGTH: usize = 4;

lazy_static! {
	/// List of share words. The invariants are checked once here; the list
	/// is compile-time data, so a violation is a build defect and panics.
	pub static ref WORDLIST: Vec<String> = {
		let list: Vec<String> = include_str!("wordlists/en.txt")
			.split_whitespace()
			.map(|s| s.into())
			.collect();
		assert_eq!(
			list.len(),
			RADIX as usize,
			"the wordlist must contain exactly {} words",
			RADIX,
		);
		for pair in list.windows(2) {
			assert!(
				pair[0] < pair[1],
				"the wordlist must be sorted and free of duplicates",
			);
			assert!(
				prefix(&pair[0]) != prefix(&pair[1]),
				"words must be unique within their first {} letters",
				UNIQUE_PREFIX_LENGTH,
			);
		}
		list
	};
	pub static ref WORD_INDEX_MAP: HashMap<String, u16> = {
		let mut retval = HashMap::new();
		for (i, item) in WORDLIST.iter().enumerate() {
			retval.insert(item.to_owned(), i as u16);
		}
		retval
	};
}

// the list is sorted, so words sharing a prefix would be adjacent
fn prefix(word: &str) -> &str {
	&word[..UNIQUE_PREFIX_LENGTH.min(word.len())]
}

/// The word at the given 10-bit index
pub fn word_at(index: u16) -> Result<&'static str, Error> {
	match WORDLIST.get(index as usize) {
		Some(w) => Ok(w),
		None => Err(ErrorKind::InvalidInput(format!(
			"Word index must be below {}, got {}",
			RADIX, index,
		)))?,
	}
}

/// Index of the given word, tolerating case and surrounding whitespace
pub fn index_of(word: &str) -> Result<u16, Error> {
	let normalized = word.trim().to_lowercase();
	match WORD_INDEX_MAP.get(&normalized) {
		Some(i) => Ok(*i),
		None => Err(ErrorKind::InvalidMnemonic(format!(
			"'{}' is not a valid share word",
			word.trim(),
		)))?,
	}
}
