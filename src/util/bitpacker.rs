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

//! Operations that allow packing bits from primitives into a bitvec
//! Slower, but easier to follow and modify than a lot of bit twiddling
//! BigEndian throughout, high bit first

use bitvec::prelude::*;

use crate::error::{Error, ErrorKind};

/// Simple struct that wraps a bitvec and defines packing operations on it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitPacker {
	bv: BitVec<u8, Msb0>,
}

impl BitPacker {
	/// Create a new bitpacker
	pub fn new() -> Self {
		BitPacker { bv: BitVec::new() }
	}

	/// Append num_bits of zero padding to the internal bitvec
	pub fn append_padding(&mut self, num_bits: u8) {
		for _ in 0..num_bits {
			self.bv.push(false);
		}
	}

	/// Append each element of a u8 slice to the bitvec
	pub fn append_vec_u8(&mut self, data: &[u8]) -> Result<(), Error> {
		for b in data {
			self.append_u8(*b, 8)?;
		}
		Ok(())
	}

	/// Append first num_bits of a u32 to the bitvec, num_bits must be <= 32
	pub fn append_u32(&mut self, val: u32, num_bits: u8) -> Result<(), Error> {
		if num_bits > 32 {
			return Err(ErrorKind::InvalidInput(
				"number of bits to pack must be <= 32".to_string(),
			))?;
		}
		for i in (0u8..num_bits).rev() {
			self.bv.push(val & (1u32 << i) != 0);
		}
		Ok(())
	}

	/// Append first num_bits of a u16 to the bitvec, num_bits must be <= 16
	pub fn append_u16(&mut self, val: u16, num_bits: u8) -> Result<(), Error> {
		if num_bits > 16 {
			return Err(ErrorKind::InvalidInput(
				"number of bits to pack must be <= 16".to_string(),
			))?;
		}
		for i in (0u8..num_bits).rev() {
			self.bv.push(val & (1u16 << i) != 0);
		}
		Ok(())
	}

	/// Append first num_bits of a u8 to the bitvec, num_bits must be <= 8
	pub fn append_u8(&mut self, val: u8, num_bits: u8) -> Result<(), Error> {
		if num_bits > 8 {
			return Err(ErrorKind::InvalidInput(
				"number of bits to pack must be <= 8".to_string(),
			))?;
		}
		for i in (0u8..num_bits).rev() {
			self.bv.push(val & (1u8 << i) != 0);
		}
		Ok(())
	}

	/// Read num_bits (<= 32) starting at bit index start, high bit first
	pub fn get_u32(&self, start: usize, num_bits: usize) -> Result<u32, Error> {
		if num_bits > 32 {
			return Err(ErrorKind::InvalidInput(
				"number of bits to read must be <= 32".to_string(),
			))?;
		}
		if start + num_bits > self.bv.len() {
			return Err(ErrorKind::InvalidInput(format!(
				"bit range {}..{} is out of bounds (length {})",
				start,
				start + num_bits,
				self.bv.len(),
			)))?;
		}
		let mut retval: u32 = 0;
		for i in start..start + num_bits {
			retval <<= 1;
			if self.bv[i] {
				retval |= 1;
			}
		}
		Ok(retval)
	}

	/// Read num_bits (<= 16) starting at bit index start
	pub fn get_u16(&self, start: usize, num_bits: usize) -> Result<u16, Error> {
		if num_bits > 16 {
			return Err(ErrorKind::InvalidInput(
				"number of bits to read must be <= 16".to_string(),
			))?;
		}
		Ok(self.get_u32(start, num_bits)? as u16)
	}

	/// Read num_bits (<= 8) starting at bit index start
	pub fn get_u8(&self, start: usize, num_bits: usize) -> Result<u8, Error> {
		if num_bits > 8 {
			return Err(ErrorKind::InvalidInput(
				"number of bits to read must be <= 8".to_string(),
			))?;
		}
		Ok(self.get_u32(start, num_bits)? as u8)
	}

	/// Read num_bytes whole bytes starting at bit index start
	pub fn get_vec_u8(&self, start: usize, num_bytes: usize) -> Result<Vec<u8>, Error> {
		let mut retval = Vec::with_capacity(num_bytes);
		for i in 0..num_bytes {
			retval.push(self.get_u8(start + i * 8, 8)?);
		}
		Ok(retval)
	}

	/// Retain only the bits in start..end
	pub fn split_out(&mut self, start: usize, end: usize) {
		self.bv = self.bv[start..end].to_bitvec();
	}

	/// Remove num_bits of leading padding, all of which must be zero
	pub fn remove_padding(&mut self, num_bits: usize) -> Result<(), Error> {
		if self.bv[..num_bits].any() {
			return Err(ErrorKind::InvalidPadding)?;
		}
		self.bv.drain(..num_bits);
		Ok(())
	}

	/// Truncate trailing bits so the length is a multiple of radix_bits
	pub fn normalize(&mut self, radix_bits: usize) {
		let excess = self.bv.len() % radix_bits;
		self.bv.truncate(self.bv.len() - excess);
	}

	/// Return length of internal bit vector
	pub fn len(&self) -> usize {
		self.bv.len()
	}

	/// Whether the bit vector is empty
	pub fn is_empty(&self) -> bool {
		self.bv.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn append_and_read_back() -> Result<(), Error> {
		let mut bp = BitPacker::new();
		bp.append_u16(0b101_1100_1010_0011, 15)?;
		bp.append_u8(1, 1)?;
		bp.append_u8(0b1001, 4)?;
		assert_eq!(bp.len(), 20);
		assert_eq!(bp.get_u16(0, 15)?, 0b101_1100_1010_0011);
		assert_eq!(bp.get_u8(15, 1)?, 1);
		assert_eq!(bp.get_u8(16, 4)?, 0b1001);
		// the same 20 bits again, as two 10-bit words
		assert_eq!(bp.get_u32(0, 10)?, 0b10_1110_0101);
		assert_eq!(bp.get_u32(10, 10)?, 0b00_0111_1001);
		Ok(())
	}

	#[test]
	fn byte_vec_roundtrip() -> Result<(), Error> {
		let data = vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x7f];
		let mut bp = BitPacker::new();
		bp.append_vec_u8(&data)?;
		assert_eq!(bp.get_vec_u8(0, data.len())?, data);
		Ok(())
	}

	#[test]
	fn padding_must_be_zero() -> Result<(), Error> {
		let mut bp = BitPacker::new();
		bp.append_padding(2);
		bp.append_u8(0xff, 8)?;
		assert!(bp.remove_padding(2).is_ok());
		assert_eq!(bp.len(), 8);

		let mut bp = BitPacker::new();
		bp.append_u8(1, 2)?;
		bp.append_u8(0xff, 8)?;
		let res = bp.remove_padding(2);
		assert_eq!(res.unwrap_err().kind(), ErrorKind::InvalidPadding);
		Ok(())
	}

	#[test]
	fn split_out_and_normalize() -> Result<(), Error> {
		let mut bp = BitPacker::new();
		bp.append_vec_u8(&[0xab, 0xcd, 0xef])?;
		bp.split_out(8, 24);
		assert_eq!(bp.get_vec_u8(0, 2)?, vec![0xcd, 0xef]);
		bp.normalize(10);
		assert_eq!(bp.len(), 10);
		Ok(())
	}

	#[test]
	fn oversized_bit_counts_rejected() {
		let mut bp = BitPacker::new();
		assert!(bp.append_u8(0, 9).is_err());
		assert!(bp.append_u16(0, 17).is_err());
		assert!(bp.append_u32(0, 33).is_err());
		assert!(bp.get_u32(0, 1).is_err());
	}
}
