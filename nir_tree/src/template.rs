// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain-data description of a tree, used to build fixtures and to dump a
//! tree for debugging.
//!
//! With the `serde` feature a template reads and writes JSON shaped like
//! `{"branches":[{"child":{"points":[[2,2]]},"polygon":[[[1,1],[9,3]]]}]}`.

use crate::types::{Point, Polygon, Rectangle};

/// A node and, recursively, everything below it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum NodeTemplate<const D: usize> {
    /// A leaf holding points.
    Leaf {
        /// Points of the leaf.
        points: Vec<Point<D>>,
    },
    /// A routing node holding branches.
    Routing {
        /// Branches of the node.
        branches: Vec<BranchTemplate<D>>,
    },
}

/// A branch of a routing node template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchTemplate<const D: usize> {
    /// The subtree behind the branch.
    pub child: NodeTemplate<D>,
    /// Region claimed by the subtree.
    pub polygon: Polygon<D>,
}

impl<const D: usize> NodeTemplate<D> {
    /// A leaf template.
    pub fn leaf(points: impl IntoIterator<Item = Point<D>>) -> Self {
        Self::Leaf {
            points: points.into_iter().collect(),
        }
    }

    /// A routing template from `(polygon, child)` pairs.
    pub fn routing(branches: impl IntoIterator<Item = (Polygon<D>, Self)>) -> Self {
        Self::Routing {
            branches: branches
                .into_iter()
                .map(|(polygon, child)| BranchTemplate { child, polygon })
                .collect(),
        }
    }
}

fn rect(lower: [f64; 2], upper: [f64; 2]) -> Rectangle<2> {
    Rectangle::from_corners_unchecked(Point(lower), Point(upper))
}

/// The three-branch reference tree.
///
/// ```text
///  9   |       ┌───┬─────┐
///      |       │ D │ B   │
///  7   | ┌─────┼───┼───┐ │       ┌─────┐
///  6   | │ A1  │ ┌─┤ E ├─┤       │ C2  │
///  5   | │     │ │F├───┤F├───────┤     │
///      | │     │ │1│ F2│3│ C1    │     │
///  3   | ├─────┴─┴─┴───┴─┼───────┴─────┘
///  2   | │ A2            │
///  1   | └───────────────┘
///      + - - - - - - - - - - - - - - - - -
///        1     4 5 6 7 8 9 10    13    16
/// ```
///
/// The root has branches A (leaf), B (routing node with leaves D, E, F) and
/// C (leaf). Every leaf starts empty.
pub fn reference_tree() -> NodeTemplate<2> {
    let empty = || NodeTemplate::leaf([]);
    NodeTemplate::routing([
        (
            Polygon::new(vec![rect([1., 3.], [4., 7.]), rect([1., 1.], [9., 3.])]),
            empty(),
        ),
        (
            Polygon::new(vec![rect([4., 3.], [9., 9.])]),
            NodeTemplate::routing([
                (Polygon::new(vec![rect([4., 7.], [6., 9.])]), empty()),
                (Polygon::new(vec![rect([6., 5.], [8., 7.])]), empty()),
                (
                    Polygon::new(vec![
                        rect([5., 3.], [6., 6.]),
                        rect([6., 3.], [8., 5.]),
                        rect([8., 3.], [9., 6.]),
                    ]),
                    empty(),
                ),
            ]),
        ),
        (
            Polygon::new(vec![rect([9., 3.], [13., 5.]), rect([13., 3.], [16., 7.])]),
            empty(),
        ),
    ])
}
