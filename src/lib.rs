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

//! Two-level Shamir secret sharing over mnemonic codes, as defined by
//! SLIP-0039. A master secret is encrypted with a Feistel network keyed
//! by a passphrase, split first across groups and then across members
//! within each group, and each resulting share is rendered as a 20- or
//! 33-word mnemonic from a fixed 1024-word list.
//!
//! Security note: share arithmetic in GF(256) is table-driven and the
//! tables are indexed with secret-dependent values. An attacker able to
//! observe cache timing of this process may learn share bytes.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod constants;
pub mod error;
pub mod field;
pub mod mnemonic;
pub mod shamir;
pub mod util;

mod share;
mod shareset;

pub use crate::error::{Error, ErrorKind};
pub use crate::share::Share;
pub use crate::shareset::{ShareGroup, ShareSet};
pub use crate::util::hex::{from_hex, to_hex};
