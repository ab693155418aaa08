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

//! Conformance checks: a fixture table of malformed inputs tagged by the
//! error kind they must produce, plus exhaustive subset behaviour of
//! generated splits.
#[macro_use]
extern crate serde_derive;

use itertools::Itertools;

use shamir39::{
	combine_mnemonics, from_hex, generate_mnemonics, generate_mnemonics_with_source,
	EntropySource, Error, ErrorKind, GroupShare,
};

// test vector entry, for deser from the fixture json
#[derive(Serialize, Deserialize, Debug, Clone)]
struct TVEntry {
	// What the vector exercises
	pub description: String,
	// List of mnemonics, each a space separated string
	pub mnemonics: Vec<String>,
	// Passphrase handed to combine
	pub passphrase: String,
	// Expected master secret as hex (empty when combining should fail)
	pub master_secret: String,
	// Expected error kind tag for negative vectors
	pub expected_error: Option<String>,
}

impl TVEntry {
	// get mnemonics as Vec<Vec<String>>
	pub fn mnemonics_to_vecs(&self) -> Vec<Vec<String>> {
		let mut retvec = vec![];
		for mn in self.mnemonics.iter() {
			retvec.push(mn.split_whitespace().map(|s| s.into()).collect());
		}
		retvec
	}
	// master secret to u8
	pub fn master_secret_to_u8_vec(&self) -> Vec<u8> {
		if self.master_secret.is_empty() {
			vec![]
		} else {
			from_hex(&self.master_secret).unwrap()
		}
	}
}

fn kind_tag(kind: &ErrorKind) -> &'static str {
	match kind {
		ErrorKind::InvalidInput(_) => "InvalidInput",
		ErrorKind::InvalidMnemonic(_) => "InvalidMnemonic",
		ErrorKind::InvalidChecksum(_) => "InvalidChecksum",
		ErrorKind::InconsistentShares(_) => "InconsistentShares",
		ErrorKind::InsufficientShares(_) => "InsufficientShares",
		ErrorKind::InvalidDigest(_) => "InvalidDigest",
		ErrorKind::InvalidPadding => "InvalidPadding",
	}
}

#[test]
fn fixture_vectors() -> Result<(), Error> {
	let src = include_str!("fixtures/vectors.json");
	let tv_list: Vec<TVEntry> = serde_json::from_str(src).unwrap();
	for tv in tv_list {
		let ref_ms = tv.master_secret_to_u8_vec();
		let result = combine_mnemonics(&tv.mnemonics_to_vecs(), &tv.passphrase);
		if !ref_ms.is_empty() {
			let returned_ms = result.unwrap_or_else(|e| {
				panic!("vector '{}' should combine, got {}", tv.description, e)
			});
			assert_eq!(ref_ms, returned_ms, "vector '{}'", tv.description);
		} else {
			let err = match result {
				Ok(_) => panic!("vector '{}' should have failed", tv.description),
				Err(e) => e,
			};
			if let Some(expected) = &tv.expected_error {
				assert_eq!(
					kind_tag(&err.kind()),
					expected.as_str(),
					"vector '{}' failed with the wrong kind: {}",
					tv.description,
					err,
				);
			}
		}
	}
	Ok(())
}

fn flatten_mnemonics(nms: &[GroupShare]) -> Result<Vec<Vec<String>>, Error> {
	let mut ret = vec![];
	for m in nms {
		for s in m.member_shares.iter() {
			ret.push(s.to_mnemonic()?);
		}
	}
	Ok(ret)
}

#[test]
fn roundtrip_matrix() -> Result<(), Error> {
	let configs: Vec<(u8, Vec<(u8, u8)>)> = vec![
		(1, vec![(1, 1)]),
		(1, vec![(2, 3)]),
		(2, vec![(2, 3), (3, 5)]),
		(3, vec![(2, 3), (2, 2), (4, 4)]),
	];
	for (group_threshold, groups) in configs {
		for secret_len in &[16usize, 32] {
			for extendable in &[false, true] {
				let master_secret: Vec<u8> = (0..*secret_len as u8).collect();
				let mns = generate_mnemonics(
					group_threshold,
					&groups,
					&master_secret,
					"TREZOR",
					0,
					*extendable,
				)?;
				let result = combine_mnemonics(&flatten_mnemonics(&mns)?, "TREZOR")?;
				assert_eq!(
					result, master_secret,
					"round trip failed for {} of {:?}, {} bytes, extendable {}",
					group_threshold, groups, secret_len, extendable,
				);
			}
		}
	}
	Ok(())
}

#[test]
fn every_threshold_subset_recovers() -> Result<(), Error> {
	let master_secret: Vec<u8> = (0x10..0x20).collect();
	let mns = generate_mnemonics(1, &[(3, 5)], &master_secret, "", 0, false)?;
	let mnemonics = mns[0].mnemonic_list()?;
	for subset in mnemonics.iter().combinations(3) {
		let subset: Vec<Vec<String>> = subset.into_iter().cloned().collect();
		assert_eq!(combine_mnemonics(&subset, "")?, master_secret);
	}
	Ok(())
}

#[test]
fn every_undersized_subset_refuses() -> Result<(), Error> {
	let master_secret: Vec<u8> = (0x10..0x20).collect();
	let mns = generate_mnemonics(1, &[(3, 5)], &master_secret, "", 0, false)?;
	let mnemonics = mns[0].mnemonic_list()?;
	for size in 1..3usize {
		for subset in mnemonics.iter().combinations(size) {
			let subset: Vec<Vec<String>> = subset.into_iter().cloned().collect();
			let res = combine_mnemonics(&subset, "");
			match res.unwrap_err().kind() {
				ErrorKind::InsufficientShares(_) => (),
				k => panic!("expected InsufficientShares, got {:?}", k),
			}
		}
	}
	Ok(())
}

#[test]
fn below_group_threshold_refuses() -> Result<(), Error> {
	let master_secret: Vec<u8> = (0x10..0x30).collect();
	let mns = generate_mnemonics(2, &[(2, 3), (3, 5)], &master_secret, "", 0, false)?;
	// a complete member set from only one of the two required groups
	let g0 = mns[0].mnemonic_list()?;
	let res = combine_mnemonics(&[g0[0].clone(), g0[1].clone()], "");
	match res.unwrap_err().kind() {
		ErrorKind::InsufficientShares(_) => (),
		k => panic!("expected InsufficientShares, got {:?}", k),
	}
	Ok(())
}

#[test]
fn no_secret_leaks_from_undersized_subsets() -> Result<(), Error> {
	// fuzz a handful of random splits; no undersized subset may produce an
	// error-free master secret
	struct StepEntropy(u64);
	impl EntropySource for StepEntropy {
		fn fill(&mut self, dest: &mut [u8]) {
			for b in dest.iter_mut() {
				self.0 = self
					.0
					.wrapping_mul(6364136223846793005)
					.wrapping_add(1442695040888963407);
				*b = (self.0 >> 33) as u8;
			}
		}
	}
	for seed in 1..6u64 {
		let mut source = StepEntropy(seed);
		let mut master_secret = vec![0u8; 16];
		source.fill(&mut master_secret);
		let mns = generate_mnemonics_with_source(
			1,
			&[(3, 4)],
			&master_secret,
			"",
			0,
			false,
			&mut source,
		)?;
		let mnemonics = mns[0].mnemonic_list()?;
		for size in 1..3usize {
			for subset in mnemonics.iter().combinations(size) {
				let subset: Vec<Vec<String>> = subset.into_iter().cloned().collect();
				assert!(combine_mnemonics(&subset, "").is_err());
			}
		}
	}
	Ok(())
}

#[test]
fn mixed_length_mnemonics_rejected() -> Result<(), Error> {
	let short = generate_mnemonics(1, &[(2, 3)], &vec![1u8; 16], "", 0, false)?;
	let long = generate_mnemonics(1, &[(2, 3)], &vec![1u8; 32], "", 0, false)?;
	let mixed = vec![
		short[0].member_shares[0].to_mnemonic()?,
		long[0].member_shares[0].to_mnemonic()?,
	];
	let res = combine_mnemonics(&mixed, "");
	match res.unwrap_err().kind() {
		ErrorKind::InconsistentShares(_) => (),
		k => panic!("expected InconsistentShares, got {:?}", k),
	}
	Ok(())
}

#[test]
fn checksum_guard_on_generated_shares() -> Result<(), Error> {
	let master_secret: Vec<u8> = (0x00..0x10).collect();
	let mns = generate_mnemonics(1, &[(2, 3)], &master_secret, "TREZOR", 0, false)?;
	let mnemonics = mns[0].mnemonic_list()?;
	let mut corrupted = vec![mnemonics[0].clone(), mnemonics[1].clone()];
	// replace the last word of one share with its lexical neighbour
	let last = corrupted[1].pop().unwrap();
	let index = shamir39::wordlist::index_of(&last)?;
	let neighbour = if index == 0 { 1 } else { index - 1 };
	corrupted[1].push(shamir39::wordlist::word_at(neighbour)?.to_owned());
	let res = combine_mnemonics(&corrupted, "TREZOR");
	match res.unwrap_err().kind() {
		ErrorKind::InvalidChecksum(_) => (),
		k => panic!("expected InvalidChecksum, got {:?}", k),
	}
	Ok(())
}
