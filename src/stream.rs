// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Querying a persisted spatial index directly from a byte stream, without
//! reconstructing a [`crate::QuadTree`] in memory.

use std::io::{Read, Seek, SeekFrom};
use std::marker::PhantomData;

use crate::bbox::BBox;
use crate::error::{Error, Result};

const HEADER: &[u8; 12] = b"mapnik-index";

/// A predicate over a node's extent, used to prune subtrees while reading a
/// persisted index.
///
/// Unlike [`crate::QuadTree::find_near`], which filters *items*, a `Filter`
/// filters *node extents*: the node walk calls [`Filter::pass`] once per
/// node and, on failure, skips that node's items and its entire subtree
/// without reading any of it.
pub trait Filter {
    /// Whether a node whose extent is `node_extent` should be descended
    /// into (and have its items collected).
    fn pass(&self, node_extent: &BBox) -> bool;
}

/// The canonical filter: keep nodes whose extent intersects a query box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterInBox {
    /// The box nodes are tested against.
    pub box_: BBox,
}

impl FilterInBox {
    /// Create a filter over `box_`.
    #[inline]
    pub fn new(box_: BBox) -> Self {
        Self { box_ }
    }
}

impl Filter for FilterInBox {
    #[inline]
    fn pass(&self, node_extent: &BBox) -> bool {
        self.box_.intersects(node_extent)
    }
}

/// A non-instantiable handle for querying a persisted spatial index of
/// items of type `V`, directly from a `Read + Seek` stream.
///
/// Every entry point here re-validates the stream's header and seeks to a
/// known position first, so a single stream may be reused for repeated
/// queries (each call is independent; none assume the cursor was left where
/// a previous call ended).
#[derive(Debug)]
pub struct StreamIndex<V> {
    _marker: PhantomData<V>,
}

impl<V: bytemuck::Pod> StreamIndex<V> {
    /// Check whether `input` begins with a valid index header, leaving the
    /// cursor at byte 16 (just past the header) on success.
    pub fn check_header<R: Read + Seek>(input: &mut R) -> Result<bool> {
        reject_zero_sized::<V>()?;
        let mut header = [0u8; 16];
        input.seek(SeekFrom::Start(0))?;
        input.read_exact(&mut header)?;
        Ok(&header[..12] == HEADER)
    }

    /// Read the root node's extent without reading any items.
    pub fn bounding_box<R: Read + Seek>(input: &mut R) -> Result<BBox> {
        if !Self::check_header(input)? {
            return Err(Error::InvalidFormat);
        }
        input.seek(SeekFrom::Current(4))?;
        read_raw(input)
    }

    /// Collect every item in every node whose extent passes `filter`.
    pub fn query<R: Read + Seek, F: Filter>(filter: &F, input: &mut R) -> Result<Vec<V>> {
        if !Self::check_header(input)? {
            return Err(Error::InvalidFormat);
        }
        let mut results = Vec::new();
        query_node(filter, input, &mut results)?;
        Ok(results)
    }

    /// Like [`StreamIndex::query`], but stop collecting once `count` items
    /// have been gathered.
    ///
    /// Once the cap is reached, every further call in the recursive walk
    /// returns immediately without reading or seeking — it does not finish
    /// skipping past the node it stopped in. Callers that need the stream
    /// left at a well-defined position afterward should not reuse it
    /// without first seeking back to a known offset.
    pub fn query_first_n<R: Read + Seek, F: Filter>(
        filter: &F,
        input: &mut R,
        count: usize,
    ) -> Result<Vec<V>> {
        if !Self::check_header(input)? {
            return Err(Error::InvalidFormat);
        }
        let mut results = Vec::with_capacity(count);
        query_first_n_node(filter, input, &mut results, count)?;
        Ok(results)
    }
}

fn read_raw<T: bytemuck::Pod, R: Read>(input: &mut R) -> Result<T> {
    let mut buf = alloc::vec![0u8; core::mem::size_of::<T>()];
    input.read_exact(&mut buf)?;
    Ok(bytemuck::pod_read_unaligned(&buf))
}

fn query_node<V: bytemuck::Pod, R: Read + Seek, F: Filter>(
    filter: &F,
    input: &mut R,
    results: &mut Vec<V>,
) -> Result<()> {
    let offset: u32 = read_raw(input)?;
    let node_ext: BBox = read_raw(input)?;
    let num_shapes: u32 = read_raw(input)?;

    if !filter.pass(&node_ext) {
        let skip = i64::from(offset) + i64::from(num_shapes) * core::mem::size_of::<V>() as i64 + 4;
        input.seek(SeekFrom::Current(skip))?;
        return Ok(());
    }

    for _ in 0..num_shapes {
        results.push(read_raw(input)?);
    }

    let num_children: u32 = read_raw(input)?;
    for _ in 0..num_children {
        query_node(filter, input, results)?;
    }
    Ok(())
}

fn query_first_n_node<V: bytemuck::Pod, R: Read + Seek, F: Filter>(
    filter: &F,
    input: &mut R,
    results: &mut Vec<V>,
    count: usize,
) -> Result<()> {
    if results.len() == count {
        return Ok(());
    }

    let offset: u32 = read_raw(input)?;
    let node_ext: BBox = read_raw(input)?;
    let num_shapes: u32 = read_raw(input)?;

    if !filter.pass(&node_ext) {
        let skip = i64::from(offset) + i64::from(num_shapes) * core::mem::size_of::<V>() as i64 + 4;
        input.seek(SeekFrom::Current(skip))?;
        return Ok(());
    }

    for _ in 0..num_shapes {
        let item: V = read_raw(input)?;
        if results.len() < count {
            results.push(item);
        }
    }

    let num_children: u32 = read_raw(input)?;
    for _ in 0..num_children {
        query_first_n_node(filter, input, results, count)?;
    }
    Ok(())
}

fn reject_zero_sized<V>() -> Result<()> {
    if core::mem::size_of::<V>() == 0 {
        Err(Error::ZeroSizedValue)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadtree::QuadTree;
    use std::io::Cursor;

    fn s1_tree() -> QuadTree<i32> {
        let mut tree = QuadTree::new(BBox::new(0.0, 0.0, 100.0, 100.0));
        tree.insert(BBox::new(10.0, 10.0, 20.0, 20.0), 1);
        tree.insert(BBox::new(30.0, 30.0, 40.0, 40.0), 2);
        tree.insert(BBox::new(30.0, 10.0, 40.0, 20.0), 3);
        tree.insert(BBox::new(1.0, 1.0, 2.0, 2.0), 4);
        tree
    }

    fn s1_bytes() -> Vec<u8> {
        let tree = s1_tree();
        let mut out = Vec::new();
        tree.write(&mut out).unwrap();
        out
    }

    #[test]
    fn rejects_stream_without_header() {
        let mut input = Cursor::new(alloc::vec![0u8; 32]);
        let err = StreamIndex::<i32>::bounding_box(&mut input).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat));
    }

    #[test]
    fn bounding_box_matches_root_extent() {
        let bytes = s1_bytes();
        let mut input = Cursor::new(bytes);
        let bbox = StreamIndex::<i32>::bounding_box(&mut input).unwrap();
        assert_eq!(bbox, BBox::new(0.0, 0.0, 100.0, 100.0));
    }

    // Scenario S3: the full query visits every item, in arena order.
    #[test]
    fn query_everything_returns_all_items_in_arena_order() {
        let bytes = s1_bytes();
        let mut input = Cursor::new(bytes);
        let filter = FilterInBox::new(BBox::new(0.0, 0.0, 100.0, 100.0));
        let results = StreamIndex::<i32>::query(&filter, &mut input).unwrap();
        assert_eq!(results, alloc::vec![1, 4, 3, 2]);
    }

    // Scenario S4: query_first_n caps without reordering.
    #[test]
    fn query_first_n_caps_without_reordering() {
        let bytes = s1_bytes();
        let filter = FilterInBox::new(BBox::new(0.0, 0.0, 100.0, 100.0));

        let mut input = Cursor::new(bytes.clone());
        let first_two = StreamIndex::<i32>::query_first_n(&filter, &mut input, 2).unwrap();
        assert_eq!(first_two, alloc::vec![1, 4]);

        let mut input = Cursor::new(bytes);
        let first_five = StreamIndex::<i32>::query_first_n(&filter, &mut input, 5).unwrap();
        assert_eq!(first_five, alloc::vec![1, 4, 3, 2]);
    }

    #[test]
    fn query_with_narrow_filter_skips_non_matching_subtrees() {
        let bytes = s1_bytes();
        let mut input = Cursor::new(bytes);
        let filter = FilterInBox::new(BBox::new(0.0, 0.0, 5.0, 5.0));
        let results = StreamIndex::<i32>::query(&filter, &mut input).unwrap();
        assert_eq!(results, alloc::vec![4]);
    }

    #[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
    #[repr(C)]
    struct Empty;

    #[test]
    fn zero_sized_value_is_rejected() {
        let bytes = s1_bytes();
        let mut input = Cursor::new(bytes);
        let err = StreamIndex::<Empty>::bounding_box(&mut input).unwrap_err();
        assert!(matches!(err, Error::ZeroSizedValue));
    }
}
