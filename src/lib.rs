// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `classic` - a library of classic in-memory associative containers.
//!
//! Nine interchangeable key-value engines sit behind a uniform [`ContainerMap`]
//! facade: two hash tables (separate-chaining, open-addressing) and six
//! ordered search structures (AVL, red-black, weight-balanced, internal
//! path-reduction, splay, treap) and a skip list, plus the peripheral
//! [`Vector`] and [`List`] sequence containers.
//!
//! Pick an engine module directly for its typed operations, or build a
//! [`MapEngine`] to hold one of several engines behind a single type.

pub mod arena;
pub mod callbacks;
pub mod error;
pub mod hash;
pub mod list;
pub mod map;
pub mod skiplist;
pub mod tree;
pub mod vector;

pub use callbacks::InsertOutcome;
pub use error::{ClassicError, ClassicResult};
pub use list::List;
pub use map::{ContainerMap, MapEngine};
pub use vector::Vector;
