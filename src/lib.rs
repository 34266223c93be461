// Copyright 2025 Johann Kempter
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
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # ssagraph
//!
//! The in-memory core of a compiler or assembler backend: an SSA value graph
//! whose instructions live in basic blocks, and the control flow graph that
//! connects those blocks.
//!
//! ## Features
//!
//! - **Use-def tracking** - every operand slot has a matching use entry on the value it references
//! - **CFG maintenance** - successor and predecessor lists are updated together
//! - **Safe mutation** - rejected operations leave the graph untouched
//! - **Dominance** - dominator sets, immediate dominators and dominator trees
//! - **Verification** - configurable invariant checks, fatal in debug builds
//!
//! ## Quick Start
//!
//! ```rust
//! use ssagraph::prelude::*;
//!
//! let mut func = Function::new("count");
//! let entry = func.create_block("entry");
//! let exit = func.create_block("exit");
//!
//! let br = func.create_br(exit)?;
//! func.push_back(entry, br)?;
//! func.link_successor(entry, exit)?;
//!
//! let zero = func.const_int(0);
//! let ret = func.create_ret(Some(zero))?;
//! func.push_back(exit, ret)?;
//!
//! assert!(func.is_complete(exit)?);
//! assert!(func.dominates(entry, exit)?);
//! func.verify_function();
//! # Ok::<(), ssagraph::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`ir`] - values, instructions, blocks, functions and the verifier
//! - [`utils`] - bit sets, graph traits and graph algorithms
//! - [`prelude`] - the commonly used types in one import
//! - [`Error`] and [`Result`] - caller contract violations
//!
//! ## Logging
//!
//! Structural edits are logged through the [`log`](https://docs.rs/log) facade
//! at `debug` and `trace` level; verifier failures are logged at `error` level
//! before the verifier aborts. Install any logger to see them.

pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use ssagraph::prelude::*;
///
/// let mut func = Function::new("f");
/// let entry = func.create_block("entry");
/// assert_eq!(func.entry_block(), Some(entry));
/// ```
pub mod prelude;

pub mod ir;
pub mod utils;

/// `ssagraph` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `ssagraph` Error type
///
/// Returned when a caller breaks the contract of a graph operation.
///
/// # Examples
///
/// ```rust
/// use ssagraph::{ir::Function, Error};
///
/// let mut func = Function::new("f");
/// let block = func.create_block("entry");
/// let ret = func.create_ret(None)?;
/// func.push_back(block, ret)?;
///
/// let br = func.create_br(block)?;
/// match func.push_back(block, br) {
///     Err(Error::BlockTerminated(b)) => assert_eq!(b, block),
///     other => panic!("unexpected {other:?}"),
/// }
/// # Ok::<(), Error>(())
/// ```
pub use error::Error;
