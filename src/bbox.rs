// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding box used throughout this crate.

/// Axis-aligned 2D rectangle `(minx, miny, maxx, maxy)`.
///
/// Callers are expected to supply boxes already in the coordinate system of
/// the tree's extent (this crate does not project or transform coordinates)
/// and to uphold `minx <= maxx && miny <= maxy`. A box with `minx > maxx` or
/// `miny > maxy` is not rejected, but every predicate below assumes the
/// invariant holds.
///
/// `BBox` is also the on-disk representation of a node's extent (see
/// [`crate::QuadTree::write`]): it derives [`bytemuck::Pod`], so its byte
/// image is four raw, host-endian `f64`s with no padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BBox {
    /// Minimum x (left).
    pub minx: f64,
    /// Minimum y (bottom).
    pub miny: f64,
    /// Maximum x (right).
    pub maxx: f64,
    /// Maximum y (top).
    pub maxy: f64,
}

impl BBox {
    /// Create a new box from its four corners.
    #[inline]
    pub const fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        Self {
            minx,
            miny,
            maxx,
            maxy,
        }
    }

    /// Whether this box intersects `other`. Touching edges count as
    /// intersecting (closed-interval overlap).
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.minx <= other.maxx
            && other.minx <= self.maxx
            && self.miny <= other.maxy
            && other.miny <= self.maxy
    }

    /// Whether this box fully contains `other`.
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        self.minx <= other.minx
            && other.maxx <= self.maxx
            && self.miny <= other.miny
            && other.maxy <= self.maxy
    }

    /// Return a copy of this box inflated by `margin` on every side.
    ///
    /// A non-positive margin is not honored: the box is returned unchanged.
    /// This matches the observed behavior of the original collision
    /// detector, which never contracts a box via a negative margin.
    #[inline]
    #[must_use]
    pub fn expand(&self, margin: f64) -> Self {
        if margin > 0.0 {
            Self::new(
                self.minx - margin,
                self.miny - margin,
                self.maxx + margin,
                self.maxy + margin,
            )
        } else {
            *self
        }
    }
}
