// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! NIR-tree: a spatial index whose node regions are unions of rectangles.
//!
//! In an R-tree every node is described by one minimum bounding rectangle, so
//! sibling regions overlap freely and a point query may have to descend into
//! many of them. A NIR-tree instead describes each node by a [`Polygon`]: a
//! union of axis-aligned [`Rectangle`]s. Sibling polygons are kept disjoint
//! (they may share faces, never interiors), so every point has one path down.
//!
//! - [`NirTree::choose_leaf`] finds the leaf for a new point, growing and
//!   reshaping branch regions on the way down so the invariant holds.
//! - [`NirTree::split_node`] cuts a node along an axis-aligned hyperplane into
//!   two siblings, splitting straddling subtrees recursively.
//! - The [`geometry`] module holds the rectangle and polygon kernel both rely
//!   on: disjointness, expansion, fragmentation and refinement.
//!
//! The tree is generic over the dimension `D`; coordinates are `f64`.
//!
//! # Example
//!
//! ```rust
//! use nir_tree::{NirTree, Point, reference_tree};
//!
//! // The three-branch reference tree over x in [1, 16], y in [1, 9].
//! let mut tree = NirTree::from_template(&reference_tree());
//!
//! // (10, 7) is outside every branch: branch B grows to take it.
//! let leaf = tree.insert(Point([10.0, 7.0])).unwrap();
//! assert_eq!(tree.points(leaf).unwrap(), &[Point([10.0, 7.0])]);
//! assert!(tree.node_polygon(leaf).unwrap().unwrap().includes_point(&Point([10.0, 7.0])));
//!
//! // Split the grown leaf at x = 9 and put both halves back in its parent.
//! let (left, right) = tree.split_and_replace(leaf, 9.0, 0).unwrap();
//! assert_eq!(tree.points(left).unwrap().len() + tree.points(right).unwrap().len(), 1);
//! assert!(tree.validate().is_ok());
//! ```
//!
//! ## Features
//!
//! - `serde` (default): `Serialize`/`Deserialize` for points, rectangles,
//!   polygons and [`NodeTemplate`], in the JSON shape used by tree fixtures.
//!
//! ### Float semantics
//!
//! Coordinates are compared exactly; faces meet only when coordinates are
//! equal. NaN coordinates are not supported.

mod choose_leaf;
mod error;
pub mod geometry;
mod split;
pub mod template;
mod tree;
mod types;

pub use error::{NirError, Result};
pub use geometry::{
    Expansion, point_in_perimeter, polygon_expand, polygon_fragmentation, polygons_are_disjoint,
    rectangle_fragmentation, rectangle_in_perimeter, rectangles_are_disjoint, refine,
};
pub use template::{BranchTemplate, NodeTemplate, reference_tree};
pub use tree::{Branch, Iter, NirTree, Node, NodeId, NodeKind};
pub use types::{Point, Polygon, Rectangle};
