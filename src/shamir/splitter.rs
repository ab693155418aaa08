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

//! Single-level T-of-N splitting of a byte string, working byte-parallel
//! over Gf(256). The secret rides at abscissa 255 and a digest point at
//! 254 guards recovery against corrupted or forged shares.

use crate::error::{Error, ErrorKind};
use crate::random::{self, EntropySource};
use crate::shamir::Share;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::field::gf256::Gf256;
use crate::field::lagrange;

// Create alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Share split configuration values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitterConfig {
	/// The maximum number of shares that can be created
	pub max_share_count: u8,
	/// The length of the digest of the shared secret in bytes
	pub digest_length_bytes: u8,
	/// The index of the share containing the shared secret
	pub secret_index: u8,
	/// The index of the share containing the digest of the shared secret
	pub digest_index: u8,
}

impl Default for SplitterConfig {
	fn default() -> Self {
		let max_share_count = 16;
		let digest_length_bytes = 4;
		let secret_index = 255;
		let digest_index = 254;

		SplitterConfig {
			max_share_count,
			digest_length_bytes,
			secret_index,
			digest_index,
		}
	}
}

impl SplitterConfig {
	/// Just use defaults for now
	pub fn new() -> Self {
		SplitterConfig {
			..Default::default()
		}
	}
}

/// Main Struct
pub struct Splitter {
	/// Configuration values
	config: SplitterConfig,
}

impl Splitter {
	/// Create new
	pub fn new(config: Option<&SplitterConfig>) -> Splitter {
		Splitter {
			config: match config {
				Some(c) => c.to_owned(),
				None => SplitterConfig::new(),
			},
		}
	}

	/// Split a secret of at least 16 bytes (and an even number of them)
	/// into share_count shares, any threshold of which recover it. The
	/// member index and threshold of each returned share are filled in; all
	/// other fields are copied from proto_share.
	pub fn split_secret(
		&self,
		proto_share: &Share,
		threshold: u8,
		share_count: u8,
		shared_secret: &[u8],
		source: &mut dyn EntropySource,
	) -> Result<Vec<Share>, Error> {
		if threshold == 0 || threshold > self.config.max_share_count {
			return Err(ErrorKind::InvalidInput(format!(
				"Threshold must be between 1 and {}",
				self.config.max_share_count
			)))?;
		}
		if share_count < threshold || share_count > self.config.max_share_count {
			return Err(ErrorKind::InvalidInput(format!(
				"Share count with given member threshold must be between {} and {}",
				threshold, self.config.max_share_count
			)))?;
		}
		if shared_secret.len() < 16 || shared_secret.len() % 2 != 0 {
			return Err(ErrorKind::InvalidInput(
				"Secret must be at least 16 bytes in length and a multiple of 2".to_string(),
			))?;
		}

		let mut shares = vec![];
		// if the threshold is 1, the digest of the shared secret is not used
		if threshold == 1 {
			for i in 0..share_count {
				let mut s = proto_share.clone();
				s.member_index = i;
				s.member_threshold = threshold;
				s.share_value = shared_secret.to_owned();
				shares.push(s);
			}
			return Ok(shares);
		}

		let random_share_count = threshold - 2;

		for i in 0..random_share_count {
			let mut s = proto_share.clone();
			s.member_index = i;
			s.member_threshold = threshold;
			s.share_value = random::fill_vec_rand(source, shared_secret.len());
			shares.push(s);
		}

		let random_part = random::fill_vec_rand(
			source,
			shared_secret.len() - self.config.digest_length_bytes as usize,
		);
		let mut digest = self.create_digest(&random_part, shared_secret);
		digest.extend_from_slice(&random_part);

		let mut base_shares = shares.clone();
		let mut s = proto_share.clone();
		s.member_index = self.config.digest_index;
		s.member_threshold = threshold;
		s.share_value = digest;
		base_shares.push(s);

		let mut s = proto_share.clone();
		s.member_index = self.config.secret_index;
		s.member_threshold = threshold;
		s.share_value = shared_secret.to_owned();
		base_shares.push(s);

		for i in random_share_count..share_count {
			let mut r = self.interpolate(&base_shares, i, proto_share)?;
			r.member_index = i;
			r.member_threshold = threshold;
			shares.push(r);
		}

		Ok(shares)
	}

	/// Recover the secret from at least threshold distinct shares. The
	/// digest point is validated for any threshold above 1.
	pub fn recover_secret(&self, shares: &[Share], threshold: u8) -> Result<Share, Error> {
		if shares.is_empty() {
			return Err(ErrorKind::InsufficientShares(
				"Share set must not be empty.".to_string(),
			))?;
		}
		let mut proto_share = shares[0].clone();
		proto_share.share_value = vec![];

		let shared_secret = self.interpolate(shares, self.config.secret_index, &proto_share)?;

		if threshold != 1 {
			self.check_digest(shares, &shared_secret, &proto_share)?;
		}

		Ok(shared_secret)
	}

	fn interpolate(&self, shares: &[Share], x: u8, proto_share: &Share) -> Result<Share, Error> {
		for s in shares {
			if s.member_index == x {
				let mut ret_s = proto_share.clone();
				ret_s.member_index = x;
				ret_s.share_value = s.share_value.clone();
				return Ok(ret_s);
			}
		}

		let share_value_length = shares[0].share_value.len();
		for s in shares {
			if s.share_value.len() != share_value_length {
				return Err(ErrorKind::InconsistentShares(
					"Invalid set of shares. All share values must have the same length".to_string(),
				))?;
			}
		}

		let mut ret_share = proto_share.clone();
		ret_share.member_index = x;

		for i in 0..share_value_length {
			let points: Vec<(Gf256, Gf256)> = shares
				.iter()
				.map(|s| {
					(
						Gf256::from_byte(s.member_index),
						Gf256::from_byte(s.share_value[i]),
					)
				})
				.collect();
			let y = lagrange::interpolate_at(&points, Gf256::from_byte(x))?;
			ret_share.share_value.push(y.to_byte());
		}

		Ok(ret_share)
	}

	fn create_digest(&self, random_data: &[u8], shared_secret: &[u8]) -> Vec<u8> {
		let mut mac = HmacSha256::new_from_slice(random_data).expect("HMAC takes a key of any size");
		mac.update(shared_secret);
		let result = mac.finalize().into_bytes();
		result[..self.config.digest_length_bytes as usize].to_vec()
	}

	fn check_digest(
		&self,
		shares: &[Share],
		shared_secret: &Share,
		proto_share: &Share,
	) -> Result<(), Error> {
		let digest_share = self.interpolate(shares, self.config.digest_index, proto_share)?;
		let mut digest = digest_share.share_value;
		let random_part = digest.split_off(self.config.digest_length_bytes as usize);
		if digest != self.create_digest(&random_part, &shared_secret.share_value) {
			return Err(ErrorKind::InvalidDigest(
				"Invalid digest of the shared secret".to_string(),
			))?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::random::SystemEntropy;
	use rand::{thread_rng, Rng};

	// run split and recover given shares and thresholds, then check random
	// combinations of threshold shares reconstruct the secret
	fn split_recover_impl(
		secret_length_bytes: usize,
		threshold: u8,
		total_shares: u8,
	) -> Result<(), Error> {
		let sp = Splitter::new(None);
		let mut source = SystemEntropy::new();
		let secret = random::fill_vec_rand(&mut source, secret_length_bytes);
		let proto_share = Share::default();
		let mut shares =
			sp.split_secret(&proto_share, threshold, total_shares, &secret, &mut source)?;
		for _ in threshold..=total_shares {
			let recovered_secret = sp.recover_secret(&shares, threshold)?;
			assert_eq!(secret, recovered_secret.share_value);
			if threshold == 1 {
				return Ok(());
			}
			// randomly remove a share till we're at threshold
			let remove_index = thread_rng().gen_range(0..shares.len());
			shares.remove(remove_index);
		}
		// one share below the threshold, and recovery must fail
		assert!(sp.recover_secret(&shares, threshold).is_err());
		Ok(())
	}

	#[test]
	fn split_recover() -> Result<(), Error> {
		// test invalid inputs
		assert!(split_recover_impl(14, 3, 5).is_err());
		assert!(split_recover_impl(2047, 10, 12).is_err());
		assert!(split_recover_impl(16, 0, 5).is_err());
		assert!(split_recover_impl(16, 5, 3).is_err());
		assert!(split_recover_impl(16, 5, 0).is_err());
		// test a range of thresholds
		let config = SplitterConfig::new();
		for sc in 1..=config.max_share_count {
			for t in 1..=sc {
				split_recover_impl(16, t, sc)?;
			}
		}
		// test a range of lengths
		for sl in (16..32).step_by(2) {
			split_recover_impl(sl, 3, 5)?;
			split_recover_impl(sl, 2, 3)?;
		}
		// test a couple of nice long lengths
		split_recover_impl(2048, 3, 5)?;
		split_recover_impl(4096, 10, 16)?;
		Ok(())
	}

	#[test]
	fn tampered_share_fails_digest() -> Result<(), Error> {
		let sp = Splitter::new(None);
		let mut source = SystemEntropy::new();
		let secret = random::fill_vec_rand(&mut source, 16);
		let proto_share = Share::default();
		let mut shares = sp.split_secret(&proto_share, 3, 3, &secret, &mut source)?;
		shares[1].share_value[0] ^= 0x40;
		let res = sp.recover_secret(&shares, 3);
		match res.unwrap_err().kind() {
			ErrorKind::InvalidDigest(_) => (),
			k => panic!("expected InvalidDigest, got {:?}", k),
		}
		Ok(())
	}

	#[test]
	fn threshold_one_shares_carry_secret() -> Result<(), Error> {
		let sp = Splitter::new(None);
		let mut source = SystemEntropy::new();
		let secret = random::fill_vec_rand(&mut source, 16);
		let proto_share = Share::default();
		let shares = sp.split_secret(&proto_share, 1, 4, &secret, &mut source)?;
		assert_eq!(shares.len(), 4);
		for s in &shares {
			assert_eq!(s.share_value, secret);
		}
		Ok(())
	}

	#[test]
	fn split_is_deterministic_given_entropy() -> Result<(), Error> {
		struct CountingEntropy(u8);
		impl EntropySource for CountingEntropy {
			fn fill(&mut self, dest: &mut [u8]) {
				for b in dest.iter_mut() {
					self.0 = self.0.wrapping_mul(31).wrapping_add(7);
					*b = self.0;
				}
			}
		}
		let sp = Splitter::new(None);
		let secret = vec![0x5a; 16];
		let proto_share = Share::default();
		let a = sp.split_secret(&proto_share, 3, 5, &secret, &mut CountingEntropy(1))?;
		let b = sp.split_secret(&proto_share, 3, 5, &secret, &mut CountingEntropy(1))?;
		assert_eq!(a, b);
		Ok(())
	}
}
