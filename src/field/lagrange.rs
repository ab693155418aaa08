// Derived from RustySecrets Project at
// https://github.com/SpinResearch/RustySecrets.git
//
// BSD 3-Clause License
//
// Copyright (c) 2016-2018, Spin Research
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// * Redistributions of source code must retain the above copyright notice, this
//   list of conditions and the following disclaimer.
//
// * Redistributions in binary form must reproduce the above copyright notice,
//   this list of conditions and the following disclaimer in the documentation
//   and/or other materials provided with the distribution.
//
// * Neither the name of the copyright holder nor the names of its
//   contributors may be used to endorse or promote products derived from
//   this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
//
// Modifications Copyright 2024 The shamir39 Developers
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
//

//! Lagrange interpolation over Gf(256)

use crate::error::{Error, ErrorKind};
use crate::field::gf256::Gf256;
use crate::field::poly::Poly;

/// Computes the coefficients of the Lagrange polynomial interpolated
/// from the given `points`, in the G(2^8) Galois field.
pub fn interpolate(points: &[(Gf256, Gf256)]) -> Poly {
	let len = points.len();

	let mut poly = vec![Gf256::zero(); len];

	for &(x, y) in points {
		let mut coeffs = vec![Gf256::zero(); len];
		coeffs[0] = y;

		let mut prod = Gf256::one();
		for &(x1, _) in points {
			if x != x1 {
				prod *= x - x1;

				let mut prec = Gf256::zero();
				coeffs = coeffs
					.into_iter()
					.map(|coeff| {
						let new_coeff = coeff * (-x1) + prec;
						prec = coeff;
						new_coeff
					})
					.collect();
			}
		}

		poly = poly
			.iter()
			.zip(coeffs.iter())
			.map(|(&old_coeff, &add)| old_coeff + add / prod)
			.collect();
	}

	Poly::new(poly)
}

/// Value at `x` of the unique polynomial of degree < |points| passing
/// through all `points`. The abscissae must be pairwise distinct and the
/// point set non-empty.
pub fn interpolate_at(points: &[(Gf256, Gf256)], x: Gf256) -> Result<Gf256, Error> {
	if points.is_empty() {
		return Err(ErrorKind::InvalidInput(
			"Interpolation requires at least one point".to_string(),
		))?;
	}
	for (i, &(xi, yi)) in points.iter().enumerate() {
		for &(xj, _) in points.iter().skip(i + 1) {
			if xi == xj {
				return Err(ErrorKind::InvalidInput(format!(
					"Interpolation requires distinct abscissae, {} is duplicated",
					xi.to_byte(),
				)))?;
			}
		}
		if xi == x {
			return Ok(yi);
		}
	}
	Ok(interpolate(points).evaluate_at(x))
}

#[cfg(test)]
#[allow(trivial_casts)]
mod tests {

	use super::*;
	use crate::field::gf256::*;
	use quickcheck::*;

	quickcheck! {

		fn interpolate_evaluate_at_works(ys: Vec<Gf256>) -> TestResult {
			if ys.is_empty() || ys.len() > std::u8::MAX as usize {
				return TestResult::discard();
			}

			let points = ys.into_iter()
						   .zip(1..std::u8::MAX)
						   .map(|(y, x)| (gf256!(x), y))
						   .collect::<Vec<_>>();
			let poly = interpolate(&points);

			for (x, y) in points {
				if poly.evaluate_at(x) != y {
					return TestResult::failed();
				}
			}

			TestResult::passed()
		}

		fn interpolate_at_matches_poly_evaluation(ys: Vec<Gf256>) -> TestResult {
			if ys.is_empty() || ys.len() > std::u8::MAX as usize {
				return TestResult::discard();
			}

			let points = ys.into_iter()
						   .zip(1..std::u8::MAX)
						   .map(|(y, x)| (gf256!(x), y))
						   .collect::<Vec<_>>();

			let poly = interpolate(&points);

			let equals = poly.evaluate_at(Gf256::zero())
				== interpolate_at(&points, Gf256::zero()).unwrap();

			TestResult::from_bool(equals)
		}

	}

	#[test]
	fn interpolate_at_rejects_empty_set() {
		assert!(interpolate_at(&[], Gf256::zero()).is_err());
	}

	#[test]
	fn interpolate_at_rejects_duplicate_abscissae() {
		let points = vec![
			(gf256!(1), gf256!(10)),
			(gf256!(2), gf256!(20)),
			(gf256!(1), gf256!(30)),
		];
		assert!(interpolate_at(&points, Gf256::zero()).is_err());
	}

	#[test]
	fn interpolate_at_returns_matching_point() {
		let points = vec![(gf256!(5), gf256!(123)), (gf256!(7), gf256!(45))];
		assert_eq!(
			interpolate_at(&points, gf256!(7)).unwrap(),
			gf256!(45)
		);
	}
}
