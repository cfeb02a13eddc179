// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hyperplane splitting of nodes.
//!
//! Splitting at `l` on axis `d` produces two sibling nodes. The one named
//! *left* receives the part of the region at or above `l` and the one named
//! *right* the part at or below it. Both halves claim the cut itself, so a
//! rectangle with a face on the cut leaves a flat piece on the other side.
//! Callers that rely on which side is which should go through
//! [`NirTree::split_and_replace`], which keeps the order.

use tracing::{debug, instrument, trace};

use crate::error::{NirError, Result};
use crate::geometry::{polygons_are_disjoint, refine};
use crate::tree::{Branch, NirTree, NodeId, NodeKind};
use crate::types::{Point, Polygon, Rectangle};

/// Cut `polygon` at `l` on `axis`, returning `(left, right)` refined slices.
///
/// Only rectangles strictly on one side move whole; a rectangle touching the
/// cut is clipped, possibly into a zero-width piece.
fn slice_polygon<const D: usize>(
    polygon: &Polygon<D>,
    l: f64,
    axis: usize,
) -> (Polygon<D>, Polygon<D>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for rectangle in polygon {
        let lo = rectangle.lower_left()[axis];
        let hi = rectangle.upper_right()[axis];
        if hi < l {
            right.push(*rectangle);
        } else if lo > l {
            left.push(*rectangle);
        } else {
            right.push(rectangle.with_axis(axis, lo, l));
            left.push(rectangle.with_axis(axis, l, hi));
        }
    }
    (refine(&Polygon::new(left)), refine(&Polygon::new(right)))
}

/// Split a leaf's points between the two slices.
fn partition_points<const D: usize>(
    points: Vec<Point<D>>,
    left_polygon: &Polygon<D>,
    right_polygon: &Polygon<D>,
    l: f64,
    axis: usize,
) -> (Vec<Point<D>>, Vec<Point<D>>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for point in points {
        let goes_left = match (
            left_polygon.includes_point(&point),
            right_polygon.includes_point(&point),
        ) {
            (true, true) => left.len() <= right.len(),
            (true, false) => true,
            (false, true) => false,
            (false, false) => point[axis] >= l,
        };
        if goes_left {
            left.push(point);
        } else {
            right.push(point);
        }
    }
    (left, right)
}

impl<const D: usize> NirTree<D> {
    /// Split `node` along the hyperplane `x[axis] = l`.
    ///
    /// Returns the `(left, right)` branches. Both lead to new nodes that have
    /// no parent yet; attaching them is up to the caller. Points and branches
    /// of `node` are moved into the new nodes, straddling subtrees are split
    /// recursively and `node` is left alive but empty.
    ///
    /// The region being cut is the node's own polygon, or the bounding box of
    /// its content when its parent does not claim it (as for the root).
    ///
    /// Fails with [`NirError::EmptySplitHalf`] when the cut misses the region,
    /// since one of the halves would claim nothing. The subtree is checked
    /// before anything moves, so a call that fails leaves the tree untouched.
    #[instrument(level = "trace", skip(self))]
    pub fn split_node(
        &mut self,
        node: NodeId,
        l: f64,
        axis: usize,
    ) -> Result<(Branch<D>, Branch<D>)> {
        if axis >= D {
            return Err(NirError::AxisOutOfRange {
                axis,
                dimensions: D,
            });
        }
        self.check_subtree(node)?;
        let reference = self.reference_polygon(node)?;
        let (left_polygon, right_polygon) = slice_polygon(&reference, l, axis);
        if left_polygon.is_empty() || right_polygon.is_empty() {
            return Err(NirError::EmptySplitHalf { cut: l, axis });
        }
        self.split_sliced(node, left_polygon, right_polygon, l, axis)
    }

    fn reference_polygon(&self, node: NodeId) -> Result<Polygon<D>> {
        if let Some(own) = self.node_polygon(node)? {
            return Ok(own.clone());
        }
        let bounds = match self.node(node)?.kind() {
            NodeKind::Leaf { points } => points
                .iter()
                .map(|p| Rectangle::from_point(*p))
                .reduce(|a, b| a.union(&b)),
            NodeKind::Routing { branches } => branches
                .iter()
                .filter_map(|b| b.polygon.bounding_rectangle())
                .reduce(|a, b| a.union(&b)),
        };
        let bounds = bounds.ok_or(NirError::EmptyPolygon)?;
        trace!(%node, ?bounds, "splitting bounding box of unclaimed node");
        Ok(Polygon::new(vec![bounds]))
    }

    fn split_sliced(
        &mut self,
        node: NodeId,
        left_polygon: Polygon<D>,
        right_polygon: Polygon<D>,
        l: f64,
        axis: usize,
    ) -> Result<(Branch<D>, Branch<D>)> {
        let kind = {
            let source = self.node_mut(node)?;
            let emptied = match source.kind() {
                NodeKind::Leaf { .. } => NodeKind::Leaf { points: Vec::new() },
                NodeKind::Routing { .. } => NodeKind::Routing {
                    branches: Vec::new(),
                },
            };
            core::mem::replace(source.kind_mut(), emptied)
        };

        let (left, right) = match kind {
            NodeKind::Leaf { points } => {
                let (left_points, right_points) =
                    partition_points(points, &left_polygon, &right_polygon, l, axis);
                debug!(
                    %node,
                    left = left_points.len(),
                    right = right_points.len(),
                    "split leaf"
                );
                (
                    self.alloc(None, NodeKind::Leaf { points: left_points }),
                    self.alloc(None, NodeKind::Leaf { points: right_points }),
                )
            }
            NodeKind::Routing { branches } => {
                let left = self.alloc(None, NodeKind::Routing { branches: Vec::new() });
                let right = self.alloc(None, NodeKind::Routing { branches: Vec::new() });
                let mut left_branches = Vec::new();
                let mut right_branches = Vec::new();
                let mut straddling = 0_usize;
                for branch in branches {
                    if polygons_are_disjoint(&branch.polygon, &left_polygon) {
                        self.set_parent(branch.child, Some(right))?;
                        right_branches.push(branch);
                    } else if polygons_are_disjoint(&branch.polygon, &right_polygon) {
                        self.set_parent(branch.child, Some(left))?;
                        left_branches.push(branch);
                    } else {
                        straddling += 1;
                        let (left_part, right_part) = slice_polygon(&branch.polygon, l, axis);
                        let (l_branch, r_branch) =
                            self.split_sliced(branch.child, left_part, right_part, l, axis)?;
                        self.release(branch.child);
                        self.set_parent(l_branch.child, Some(left))?;
                        self.set_parent(r_branch.child, Some(right))?;
                        left_branches.push(l_branch);
                        right_branches.push(r_branch);
                    }
                }
                debug!(
                    %node,
                    left = left_branches.len(),
                    right = right_branches.len(),
                    straddling,
                    "split routing node"
                );
                *self.branches_mut(left)? = left_branches;
                *self.branches_mut(right)? = right_branches;
                (left, right)
            }
        };
        Ok((
            Branch {
                child: left,
                polygon: left_polygon,
            },
            Branch {
                child: right,
                polygon: right_polygon,
            },
        ))
    }

    /// Split `node` and put the two halves where it stood.
    ///
    /// Within a parent the halves take the node's branch position, left
    /// first. Splitting the root grows the tree by one level: a new routing
    /// root is created with the two halves as its branches. The source node
    /// is freed, so its handle goes stale. A cut that would leave a half
    /// without a region is refused as in [`NirTree::split_node`].
    ///
    /// Returns the `(left, right)` node handles.
    #[instrument(level = "debug", skip(self))]
    pub fn split_and_replace(
        &mut self,
        node: NodeId,
        l: f64,
        axis: usize,
    ) -> Result<(NodeId, NodeId)> {
        let parent = self.parent(node)?;
        let position = match parent {
            Some(parent_id) => Some(
                self.branches(parent_id)?
                    .iter()
                    .position(|b| b.child == node)
                    .ok_or(NirError::BrokenParentLink {
                        child: node,
                        parent,
                    })?,
            ),
            None if node == self.root() => None,
            None => {
                return Err(NirError::BrokenParentLink {
                    child: node,
                    parent: None,
                });
            }
        };

        let (left, right) = self.split_node(node, l, axis)?;
        let halves = (left.child, right.child);
        let new_parent = match (parent, position) {
            (Some(parent_id), Some(index)) => {
                let branches = self.branches_mut(parent_id)?;
                branches[index] = right;
                branches.insert(index, left);
                parent_id
            }
            _ => {
                let root = self.alloc(
                    None,
                    NodeKind::Routing {
                        branches: vec![left, right],
                    },
                );
                self.set_root(root);
                debug!(%root, "split grew a new root");
                root
            }
        };
        self.set_parent(halves.0, Some(new_parent))?;
        self.set_parent(halves.1, Some(new_parent))?;
        self.release(node);
        Ok(halves)
    }
}
