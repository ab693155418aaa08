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

//! Reed-Solomon code over GF(1024), used as the share checksum.
//! Detects any 3 symbol errors with certainty, more with probability
//! better than 2^-30.

use crate::error::{Error, ErrorKind};

/// Customization string fed into the checksum of non-extendable shares
pub const CUSTOMIZATION_STRING: &[u8] = b"shamir";
/// Customization string fed into the checksum of extendable shares
pub const CUSTOMIZATION_STRING_EXTENDABLE: &[u8] = b"shamir_extendable";

// feedback coefficients of the generator polynomial
const GEN: [u32; 10] = [
	0xe0e040, 0x1c1c080, 0x3838100, 0x7070200, 0xe0e0009, 0x1c0c2412, 0x38086c24, 0x3090fc48,
	0x21b1f890, 0x3f3f120,
];

/// Select the checksum customization string by the share's extendable flag
pub fn customization_string(extendable: bool) -> &'static [u8] {
	if extendable {
		CUSTOMIZATION_STRING_EXTENDABLE
	} else {
		CUSTOMIZATION_STRING
	}
}

/// values interpreted as a list of 10 bit integers
fn polymod(values: &[u32]) -> u32 {
	let mut chk = 1;
	let mut b: u32;
	for v in values {
		b = chk >> 20;
		chk = (chk & 0xfffff) << 10 ^ v;
		for (i, g) in GEN.iter().enumerate() {
			if (b >> i) & 1 == 1 {
				chk ^= g;
			}
		}
	}
	chk
}

pub fn create_checksum(
	custom_string: &[u8],
	data: &[u32],
	checksum_length_words: u8,
) -> Vec<u32> {
	let mut values: Vec<u32> = custom_string.iter().map(|d| u32::from(*d)).collect();
	values.extend_from_slice(data);
	for _ in 0..checksum_length_words {
		values.push(0);
	}
	let polymod = polymod(&values) ^ 1;
	let mut retval = vec![];
	for i in 0..checksum_length_words as usize {
		retval.push(polymod >> (10 * (2 - i)) & 1023);
	}
	retval
}

pub fn verify_checksum(custom_string: &[u8], data: &[u32]) -> Result<(), Error> {
	let mut values: Vec<u32> = custom_string.iter().map(|d| u32::from(*d)).collect();
	values.extend_from_slice(data);
	if polymod(&values) != 1 {
		return Err(ErrorKind::InvalidChecksum(format!(
			"checksum mismatch on {} words",
			data.len(),
		)))?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	use crate::error::Error;

	#[test]
	fn checksum() -> Result<(), Error> {
		let mut test_vec = vec![
			663, 96, 0, 66, 132, 27, 234, 28, 191, 405, 992, 848, 257, 36, 858, 1012, 858,
		];
		let expected = vec![1001, 340, 369];
		let checksum = create_checksum(CUSTOMIZATION_STRING, &test_vec, 3);
		assert_eq!(checksum, expected);
		for c in &checksum {
			test_vec.push(*c);
		}
		verify_checksum(CUSTOMIZATION_STRING, &test_vec)?;
		assert!(verify_checksum(b"fhamir", &test_vec).is_err());
		test_vec[0] = 23;
		assert!(verify_checksum(CUSTOMIZATION_STRING, &test_vec).is_err());

		let mut test_vec = vec![
			663, 96, 0, 66, 177, 310, 288, 156, 827, 77, 232, 34, 965, 772, 962, 966, 754,
		];
		let expected = vec![247, 29, 757];
		let checksum = create_checksum(CUSTOMIZATION_STRING, &test_vec, 3);
		assert_eq!(checksum, expected);
		for c in &checksum {
			test_vec.push(*c);
		}
		verify_checksum(CUSTOMIZATION_STRING, &test_vec)?;
		assert!(verify_checksum(b"fhamir", &test_vec).is_err());
		test_vec[1] = 99;
		assert!(verify_checksum(CUSTOMIZATION_STRING, &test_vec).is_err());

		Ok(())
	}

	#[test]
	fn customization_selects_by_flag() {
		assert_eq!(customization_string(false), b"shamir");
		assert_eq!(customization_string(true), b"shamir_extendable");
	}

	#[test]
	fn extendable_checksum_differs() -> Result<(), Error> {
		let data = vec![663, 96, 0, 66, 132, 27, 234, 28, 191, 405, 992, 848, 257];
		let std = create_checksum(CUSTOMIZATION_STRING, &data, 3);
		let ext = create_checksum(CUSTOMIZATION_STRING_EXTENDABLE, &data, 3);
		assert_ne!(std, ext);

		let mut full = data.clone();
		full.extend_from_slice(&ext);
		verify_checksum(CUSTOMIZATION_STRING_EXTENDABLE, &full)?;
		assert!(verify_checksum(CUSTOMIZATION_STRING, &full).is_err());
		Ok(())
	}

	#[test]
	fn single_symbol_errors_detected() -> Result<(), Error> {
		let data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];
		let checksum = create_checksum(CUSTOMIZATION_STRING, &data, 3);
		let mut full = data.clone();
		full.extend_from_slice(&checksum);
		verify_checksum(CUSTOMIZATION_STRING, &full)?;
		// exhaustive over positions, sampled over substituted values
		for pos in 0..full.len() {
			for delta in &[1u32, 2, 511, 1023] {
				let mut corrupt = full.clone();
				corrupt[pos] ^= delta;
				assert!(
					verify_checksum(CUSTOMIZATION_STRING, &corrupt).is_err(),
					"corruption at {} undetected",
					pos,
				);
			}
		}
		Ok(())
	}

	#[test]
	fn triple_symbol_errors_detected() -> Result<(), Error> {
		let data = vec![700, 42, 0, 1023, 512, 77, 13, 600, 222, 45, 901, 4, 88];
		let checksum = create_checksum(CUSTOMIZATION_STRING, &data, 3);
		let mut full = data.clone();
		full.extend_from_slice(&checksum);
		verify_checksum(CUSTOMIZATION_STRING, &full)?;
		// sampled triples
		for (a, b, c) in &[(0usize, 1usize, 2usize), (0, 7, 15), (3, 9, 14), (10, 11, 12)] {
			let mut corrupt = full.clone();
			corrupt[*a] ^= 0x155;
			corrupt[*b] ^= 0x2aa;
			corrupt[*c] ^= 0x0f0;
			assert!(verify_checksum(CUSTOMIZATION_STRING, &corrupt).is_err());
		}
		Ok(())
	}
}
