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

//! Injectable source of uniform random bytes. Split operations draw the
//! 15-bit identifier and all Shamir randomness through this seam, so tests
//! can substitute a deterministic generator.

use rand::{thread_rng, RngCore};

/// A cryptographically strong source of uniform bytes
pub trait EntropySource {
	/// Fill `dest` with uniform random bytes
	fn fill(&mut self, dest: &mut [u8]);
}

/// Default source, backed by the thread-local CSPRNG
#[derive(Debug, Clone, Default)]
pub struct SystemEntropy;

impl SystemEntropy {
	pub fn new() -> SystemEntropy {
		SystemEntropy
	}
}

impl EntropySource for SystemEntropy {
	fn fill(&mut self, dest: &mut [u8]) {
		thread_rng().fill_bytes(dest);
	}
}

/// Draw n random bytes from the given source
pub fn fill_vec_rand(source: &mut dyn EntropySource, n: usize) -> Vec<u8> {
	let mut v = vec![0u8; n];
	source.fill(&mut v);
	v
}

/// Draw a random identifier of `id_length_bits` (<= 16) low bits
pub fn random_identifier(source: &mut dyn EntropySource, id_length_bits: u8) -> u16 {
	let mut bytes = [0u8; 2];
	source.fill(&mut bytes);
	let mask = ((1u32 << id_length_bits) - 1) as u16;
	u16::from_be_bytes(bytes) & mask
}
