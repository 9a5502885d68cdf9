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
// Modifications Copyright 2019 The Grin Developers
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

//! Elements of GF(2^8) reduced by the polynomial x^8 + x^4 + x^3 + x + 1,
//! with multiplication and division via discrete log tables on the
//! generator x + 1.

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub};

/// Discrete exponent and log tables for the field
pub struct Tables {
	/// (x + 1)^i for i in 0..255
	pub exp: [u8; 255],
	/// inverse of exp; log[0] is never read
	pub log: [u8; 256],
}

impl Tables {
	/// Walk the powers of x + 1, reducing by 0x11B on overflow
	pub fn generate() -> Tables {
		let mut tabs = Tables {
			exp: [0; 255],
			log: [0; 256],
		};
		let mut poly: u16 = 1;
		for power in 0..255usize {
			tabs.exp[power] = poly as u8;
			tabs.log[poly as usize] = power as u8;
			poly = (poly << 1) ^ poly;
			if poly & 0x100 > 0 {
				poly ^= 0x11B;
			}
		}
		tabs
	}
}

lazy_static! {
	/// Field tables, generated once
	pub static ref TABLES: Tables = Tables::generate();
}

/// An element of the field with 256 elements
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub struct Gf256 {
	/// polynomial representation
	pub poly: u8,
}

impl Gf256 {
	/// the additive neutral element
	#[inline]
	pub fn zero() -> Gf256 {
		Gf256 { poly: 0 }
	}
	/// the multiplicative neutral element
	#[inline]
	pub fn one() -> Gf256 {
		Gf256 { poly: 1 }
	}
	/// element from its byte representation
	#[inline]
	pub fn from_byte(b: u8) -> Gf256 {
		Gf256 { poly: b }
	}
	/// byte representation of the element
	#[inline]
	pub fn to_byte(self) -> u8 {
		self.poly
	}
	/// (x + 1)^power
	pub fn exp(power: u8) -> Gf256 {
		Gf256::from_byte(TABLES.exp[power as usize])
	}
	/// discrete log of the element, None for zero
	pub fn log(self) -> Option<u8> {
		if self.poly == 0 {
			None
		} else {
			Some(TABLES.log[self.poly as usize])
		}
	}
}

impl Add<Gf256> for Gf256 {
	type Output = Gf256;
	#[inline]
	#[allow(clippy::suspicious_arithmetic_impl)]
	fn add(self, rhs: Gf256) -> Gf256 {
		Gf256::from_byte(self.poly ^ rhs.poly)
	}
}

impl AddAssign<Gf256> for Gf256 {
	#[inline]
	fn add_assign(&mut self, rhs: Gf256) {
		*self = *self + rhs;
	}
}

impl Sub<Gf256> for Gf256 {
	type Output = Gf256;
	#[inline]
	#[allow(clippy::suspicious_arithmetic_impl)]
	fn sub(self, rhs: Gf256) -> Gf256 {
		Gf256::from_byte(self.poly ^ rhs.poly)
	}
}

impl Mul<Gf256> for Gf256 {
	type Output = Gf256;
	fn mul(self, rhs: Gf256) -> Gf256 {
		if let (Some(l1), Some(l2)) = (self.log(), rhs.log()) {
			let sum = (u16::from(l1) + u16::from(l2)) % 255;
			Gf256::exp(sum as u8)
		} else {
			Gf256::zero()
		}
	}
}

impl MulAssign<Gf256> for Gf256 {
	fn mul_assign(&mut self, rhs: Gf256) {
		*self = *self * rhs;
	}
}

impl Div<Gf256> for Gf256 {
	type Output = Gf256;
	fn div(self, rhs: Gf256) -> Gf256 {
		let l2 = rhs.log().expect("division by zero");
		if let Some(l1) = self.log() {
			let diff = (u16::from(l1) + 255 - u16::from(l2)) % 255;
			Gf256::exp(diff as u8)
		} else {
			Gf256::zero()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use quickcheck::{quickcheck, Arbitrary, Gen, TestResult};

	impl Arbitrary for Gf256 {
		fn arbitrary(g: &mut Gen) -> Gf256 {
			Gf256::from_byte(u8::arbitrary(g))
		}
	}

	#[test]
	fn table_known_values() {
		// leading powers of x + 1 and a few logs, from the SLIP-0039
		// reference tables
		assert_eq!(&TABLES.exp[0..8], &[1, 3, 5, 15, 17, 51, 85, 255]);
		assert_eq!(TABLES.exp[254], 246);
		assert_eq!(TABLES.log[3], 1);
		assert_eq!(TABLES.log[255], 7);
	}

	#[test]
	fn inverses() {
		for b in 1..=255u8 {
			let x = Gf256::from_byte(b);
			assert_eq!((x * (Gf256::one() / x)).to_byte(), 1);
		}
	}

	quickcheck! {
		fn law_add_commutativity(a: Gf256, b: Gf256) -> bool {
			a + b == b + a
		}

		fn law_add_identity(a: Gf256) -> bool {
			a + Gf256::zero() == a
		}

		fn law_add_self_inverse(a: Gf256) -> bool {
			a + a == Gf256::zero()
		}

		fn law_mul_associativity(a: Gf256, b: Gf256, c: Gf256) -> bool {
			(a * b) * c == a * (b * c)
		}

		fn law_mul_commutativity(a: Gf256, b: Gf256) -> bool {
			a * b == b * a
		}

		fn law_distributivity(a: Gf256, b: Gf256, c: Gf256) -> bool {
			a * (b + c) == a * b + a * c
		}

		fn law_mul_inverses(a: Gf256) -> TestResult {
			if a == Gf256::zero() {
				return TestResult::discard();
			}
			TestResult::from_bool(a * (Gf256::one() / a) == Gf256::one())
		}
	}
}
