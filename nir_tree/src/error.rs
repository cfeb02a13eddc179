// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by the geometry kernel and the tree algorithms.

use thiserror::Error;

use crate::tree::NodeId;

/// Everything that can go wrong in this crate.
///
/// Empty intersections and disjoint rectangles are not errors; the geometry
/// kernel reports them as `None` or as an empty [`Polygon`](crate::Polygon).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NirError {
    /// A routing node without branches was reached during descent or splitting.
    #[error("routing node {0} has no branches")]
    EmptyRoutingNode(NodeId),

    /// The operation needs at least one rectangle (or point) to work on.
    #[error("geometric degeneracy: the operation needs a non-empty region")]
    EmptyPolygon,

    /// The upper corner does not dominate the lower corner.
    #[error("upper corner {upper:?} does not dominate lower corner {lower:?}")]
    InvertedRectangle {
        /// Offending lower-left corner.
        lower: Vec<f64>,
        /// Offending upper-right corner.
        upper: Vec<f64>,
    },

    /// The handle is stale or belongs to another tree.
    #[error("node {0} is not part of this tree")]
    UnknownNode(NodeId),

    /// A leaf operation was applied to a routing node.
    #[error("node {0} is not a leaf")]
    NotALeaf(NodeId),

    /// A routing operation was applied to a leaf.
    #[error("node {0} is not a routing node")]
    NotARouting(NodeId),

    /// The split axis does not exist in this dimensionality.
    #[error("axis {axis} is out of range for {dimensions} dimensions")]
    AxisOutOfRange {
        /// Requested axis.
        axis: usize,
        /// Dimensionality of the tree.
        dimensions: usize,
    },

    /// A split cut misses the region being split, leaving one half empty.
    #[error("cut at {cut} on axis {axis} leaves one half without a region")]
    EmptySplitHalf {
        /// Requested cut value.
        cut: f64,
        /// Requested axis.
        axis: usize,
    },

    /// A node's parent link and its parent's branch list disagree.
    #[error("node {child} records parent {parent:?}, which does not claim it")]
    BrokenParentLink {
        /// Node whose link is broken.
        child: NodeId,
        /// Parent recorded on the node.
        parent: Option<NodeId>,
    },

    /// The same node is the child of more than one branch.
    #[error("node {0} is claimed by more than one branch")]
    DuplicateChild(NodeId),
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, NirError>;
