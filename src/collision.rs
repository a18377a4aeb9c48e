// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label placement collision detector built on [`QuadTree`].

use alloc::string::String;

use crate::bbox::BBox;
use crate::quadtree::QuadTree;

/// A placed label: the box it occupies plus the text it was placed with.
///
/// `text` is empty for labels inserted via [`CollisionDetector::insert`]'s
/// box-only overload, since those have nothing to compare for the
/// repeat-distance rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionLabel {
    /// The box this label occupies.
    pub bbox: BBox,
    /// The label's text, compared by equality for the repeat-distance rule.
    pub text: String,
}

/// A quad-tree-backed index of placed labels, used to decide whether a new
/// label can be placed without colliding with (or repeating too close to)
/// ones already placed.
///
/// This has no remove operation: labels accumulate for the lifetime of a
/// rendering pass and are all dropped together via [`CollisionDetector::clear`].
#[derive(Clone, Debug)]
pub struct CollisionDetector {
    tree: QuadTree<CollisionLabel>,
}

impl CollisionDetector {
    /// Create a detector over `extent`. Labels placed outside `extent` are
    /// silently dropped by the underlying tree, the same as
    /// [`QuadTree::insert`].
    pub fn new(extent: BBox) -> Self {
        Self {
            tree: QuadTree::new(extent),
        }
    }

    /// The detector's extent.
    #[inline]
    pub fn extent(&self) -> BBox {
        self.tree.extent()
    }

    /// Record a label occupying `bbox`, with no text (so it can never
    /// satisfy a repeat-distance text match).
    pub fn insert(&mut self, bbox: BBox) {
        self.tree.insert(
            bbox,
            CollisionLabel {
                bbox,
                text: String::new(),
            },
        );
    }

    /// Record a label occupying `bbox` with `text`, usable by the
    /// repeat-distance overload of [`CollisionDetector::has_placement`].
    pub fn insert_with_text(&mut self, bbox: BBox, text: String) {
        self.tree.insert(bbox, CollisionLabel { bbox, text });
    }

    /// Whether `bbox` can be placed without overlapping any existing label.
    ///
    /// Equivalent to `has_placement(bbox, 0.0)`.
    pub fn has_placement(&self, bbox: BBox) -> bool {
        !self.tree.find_near(&bbox, |item| item.bbox.intersects(&bbox))
    }

    /// Whether `bbox`, inflated by `margin` on every side, can be placed
    /// without overlapping any existing label's (raw, un-inflated) box.
    ///
    /// A non-positive `margin` is not honored (see [`BBox::expand`]).
    pub fn has_placement_with_margin(&self, bbox: BBox, margin: f64) -> bool {
        let margin_box = bbox.expand(margin);
        !self
            .tree
            .find_near(&margin_box, |item| item.bbox.intersects(&margin_box))
    }

    /// Whether `bbox` can be placed, honoring both a collision margin and a
    /// same-text repeat distance.
    ///
    /// If `repeat_distance <= margin` the repeat check can never change the
    /// outcome (any box close enough to trip it would already be caught by
    /// the margin check), so this degenerates to
    /// [`CollisionDetector::has_placement_with_margin`].
    ///
    /// Otherwise an existing label blocks placement if either:
    /// - its box intersects the margin-inflated `bbox`, or
    /// - its box intersects the repeat-distance-inflated `bbox` *and* its
    ///   text equals `text`.
    pub fn has_placement_with_repeat(
        &self,
        bbox: BBox,
        margin: f64,
        text: &str,
        repeat_distance: f64,
    ) -> bool {
        if repeat_distance <= margin {
            return self.has_placement_with_margin(bbox, margin);
        }

        let margin_box = bbox.expand(margin);
        let repeat_box = bbox.expand(repeat_distance);

        !self.tree.find_near(&repeat_box, |item| {
            item.bbox.intersects(&repeat_box)
                && (item.bbox.intersects(&margin_box) || item.text == text)
        })
    }

    /// Drop every placed label, keeping the original extent.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Visit every placed label.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&CollisionLabel),
    {
        self.tree.for_each(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn detector() -> CollisionDetector {
        CollisionDetector::new(BBox::new(0.0, 0.0, 1000.0, 1000.0))
    }

    #[test]
    fn empty_detector_has_placement_everywhere() {
        let d = detector();
        assert!(d.has_placement(BBox::new(10.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn overlapping_box_has_no_placement() {
        let mut d = detector();
        d.insert(BBox::new(10.0, 10.0, 20.0, 20.0));
        assert!(!d.has_placement(BBox::new(15.0, 15.0, 25.0, 25.0)));
        assert!(d.has_placement(BBox::new(50.0, 50.0, 60.0, 60.0)));
    }

    // Scenario S5: margin inflates both sides of the collision test.
    #[test]
    fn margin_blocks_a_near_miss() {
        let mut d = detector();
        d.insert(BBox::new(10.0, 10.0, 20.0, 20.0));
        // Just clear of the raw box...
        assert!(d.has_placement(BBox::new(20.1, 10.0, 30.0, 20.0)));
        // ...but not clear once a margin is applied to both.
        assert!(!d.has_placement_with_margin(BBox::new(20.1, 10.0, 30.0, 20.0), 1.0));
    }

    // Scenario S6: repeat distance lets same-text labels be placed closer
    // together than the margin alone would allow, but blocks them within
    // the repeat distance; different text is unaffected by repeat_distance.
    #[test]
    fn repeat_distance_only_blocks_matching_text() {
        let mut d = detector();
        d.insert_with_text(BBox::new(10.0, 10.0, 20.0, 20.0), "A".to_string());

        // Same text, inside repeat distance but outside margin: blocked.
        assert!(!d.has_placement_with_repeat(
            BBox::new(25.0, 10.0, 35.0, 20.0),
            1.0,
            "A",
            10.0,
        ));

        // Different text, same geometry: not blocked by the repeat rule,
        // and far enough to also clear the margin rule.
        assert!(d.has_placement_with_repeat(
            BBox::new(25.0, 10.0, 35.0, 20.0),
            1.0,
            "B",
            10.0,
        ));
    }

    #[test]
    fn repeat_distance_not_exceeding_margin_degenerates_to_margin_check() {
        let mut d = detector();
        d.insert_with_text(BBox::new(10.0, 10.0, 20.0, 20.0), "A".to_string());

        // repeat_distance <= margin: the repeat branch is skipped entirely,
        // so even matching text doesn't save a box within the margin.
        assert!(!d.has_placement_with_repeat(
            BBox::new(20.5, 10.0, 30.0, 20.0),
            1.0,
            "A",
            1.0,
        ));
    }

    #[test]
    fn clear_allows_reinserting_into_same_space() {
        let mut d = detector();
        d.insert(BBox::new(10.0, 10.0, 20.0, 20.0));
        assert!(!d.has_placement(BBox::new(10.0, 10.0, 20.0, 20.0)));
        d.clear();
        assert!(d.has_placement(BBox::new(10.0, 10.0, 20.0, 20.0)));
    }
}
