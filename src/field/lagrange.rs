// Copyright 2019 The Grin Developers
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

//! Lagrange interpolation over GF(256)

use crate::field::gf256::Gf256;

/// Evaluates at `x` the unique polynomial of degree < points.len()
/// passing through all `points`, in Lagrange form:
/// y = sum_i y_i * prod_{m != i} (x - x_m) / (x_i - x_m)
///
/// The x coordinates of `points` must be pairwise distinct; callers
/// enforce this before any field arithmetic runs.
pub fn evaluate_at(x: Gf256, points: &[(Gf256, Gf256)]) -> Gf256 {
	// an x coordinate among the points short-circuits to its y value
	for &(x_i, y_i) in points {
		if x_i == x {
			return y_i;
		}
	}
	let mut acc = Gf256::zero();
	for (i, &(x_i, y_i)) in points.iter().enumerate() {
		let mut num = Gf256::one();
		let mut denom = Gf256::one();
		for (m, &(x_m, _)) in points.iter().enumerate() {
			if m == i {
				continue;
			}
			num *= x - x_m;
			denom *= x_i - x_m;
		}
		acc += y_i * (num / denom);
	}
	acc
}
