// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A point-region quad tree with two roles: an in-memory collision detector
//! for label placement, and a persisted spatial index that can be queried
//! directly from a byte stream without reconstructing a tree in memory.
//!
//! Both roles share one node/partitioning algorithm: [`QuadTree`] bulk-inserts
//! axis-aligned boxes into overlapping quadrants (see [`QuadTree::insert`])
//! and can serialize itself to a stable on-disk format (see
//! [`QuadTree::write`]). [`CollisionDetector`] is a thin margin/repeat-distance
//! policy layer over a `QuadTree<CollisionLabel>`. [`StreamIndex`] reads that
//! on-disk format back, filtering by node extent as it walks, without ever
//! materializing a `QuadTree`.
//!
//! Callers are expected to supply already-projected boxes in the coordinate
//! system of the tree's extent — this crate does not project coordinates —
//! and a comparable Unicode string for label-aware collision, compared only
//! by equality.
//!
//! # Example
//!
//! ```rust
//! use quadindex::{BBox, QuadTree};
//!
//! let mut tree: QuadTree<i32> = QuadTree::new(BBox::new(0.0, 0.0, 100.0, 100.0));
//! tree.insert(BBox::new(10.0, 10.0, 20.0, 20.0), 1);
//! tree.insert(BBox::new(30.0, 30.0, 40.0, 40.0), 2);
//!
//! assert!(tree.find_near(&BBox::new(5.0, 5.0, 25.0, 25.0), |v| *v == 1));
//! assert_eq!(tree.count_items(), 2);
//! ```
//!
//! Label placement with margin and repeat-distance policy:
//!
//! ```rust
//! use quadindex::{BBox, CollisionDetector};
//!
//! let mut det = CollisionDetector::new(BBox::new(0.0, 0.0, 1000.0, 1000.0));
//! det.insert(BBox::new(10.0, 10.0, 20.0, 20.0));
//! assert!(det.has_placement(BBox::new(25.0, 10.0, 30.0, 20.0)));
//! assert!(!det.has_placement_with_margin(BBox::new(25.0, 10.0, 30.0, 20.0), 6.0));
//! ```
//!
//! With the `std` feature (on by default), a serialized tree can be queried
//! directly from a byte stream:
//!
//! ```rust
//! use quadindex::{BBox, FilterInBox, QuadTree, StreamIndex};
//! use std::io::Cursor;
//!
//! let mut tree: QuadTree<i32> = QuadTree::new(BBox::new(0.0, 0.0, 100.0, 100.0));
//! tree.insert(BBox::new(10.0, 10.0, 20.0, 20.0), 1);
//! tree.insert(BBox::new(30.0, 30.0, 40.0, 40.0), 2);
//!
//! let mut bytes = Vec::new();
//! tree.write(&mut bytes).unwrap();
//!
//! let mut stream = Cursor::new(bytes);
//! let filter = FilterInBox::new(BBox::new(0.0, 0.0, 100.0, 100.0));
//! let items = StreamIndex::<i32>::query(&filter, &mut stream).unwrap();
//! assert_eq!(items, vec![1, 2]);
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: enables [`StreamIndex`], which reads a persisted tree
//!   via `std::io::{Read, Seek}`. Without this feature the crate is `no_std`
//!   + `alloc`: [`BBox`], [`QuadTree`], and [`CollisionDetector`] need no byte
//!   stream and no allocator beyond `alloc`.

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod bbox;
mod collision;
#[cfg(feature = "std")]
mod error;
mod quadtree;
#[cfg(feature = "std")]
mod stream;

pub use bbox::BBox;
pub use collision::{CollisionDetector, CollisionLabel};
#[cfg(feature = "std")]
pub use error::{Error, Result};
pub use quadtree::{DEFAULT_MAX_DEPTH, DEFAULT_RATIO, QuadTree};
#[cfg(feature = "std")]
pub use stream::{Filter, FilterInBox, StreamIndex};
