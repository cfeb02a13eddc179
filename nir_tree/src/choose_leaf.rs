// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf selection for point insertion.

use tracing::{debug, instrument, trace};

use crate::error::{NirError, Result};
use crate::geometry::{polygon_expand, polygon_fragmentation, polygons_are_disjoint, refine};
use crate::tree::{Branch, NirTree, NodeId, NodeKind};
use crate::types::{Point, Polygon};

/// What to do at one routing node.
enum Step<const D: usize> {
    /// A branch already covers the point.
    Descend(NodeId),
    /// No branch covers the point: grow branch `index` to `candidate`.
    Grow {
        index: usize,
        child: NodeId,
        candidate: Polygon<D>,
    },
}

impl<const D: usize> NirTree<D> {
    /// Find the leaf that should receive `point`, growing branch regions on
    /// the way down.
    ///
    /// This mutates the tree: wherever no branch covers the point, the branch
    /// needing the least extra volume is grown to enclose it, carved away from
    /// the regions its siblings claim, clipped to its own parent's region and
    /// refined. The point itself is not stored; see [`NirTree::insert`].
    ///
    /// Fails with [`NirError::EmptyRoutingNode`] on a routing node without
    /// branches and with [`NirError::EmptyPolygon`] if a candidate branch has
    /// an empty region. Nothing is modified at the failing level.
    #[instrument(level = "trace", skip(self))]
    pub fn choose_leaf(&mut self, point: &Point<D>) -> Result<NodeId> {
        let mut current = self.root();
        loop {
            let step = match self.node(current)?.kind() {
                NodeKind::Leaf { .. } => {
                    trace!(leaf = %current, "reached leaf");
                    return Ok(current);
                }
                NodeKind::Routing { branches } => {
                    match branches.iter().find(|b| b.polygon.includes_point(point)) {
                        Some(branch) => Step::Descend(branch.child),
                        None => Self::plan_growth(current, branches, point)?,
                    }
                }
            };
            current = match step {
                Step::Descend(child) => child,
                Step::Grow {
                    index,
                    child,
                    mut candidate,
                } => {
                    if let Some(own) = self.node_polygon(current)? {
                        candidate = candidate.intersection(own);
                    }
                    let refined = refine(&candidate);
                    trace!(node = %current, index, polygon = ?refined, "updated branch");
                    self.branches_mut(current)?[index].polygon = refined;
                    child
                }
            };
        }
    }

    /// Pick the branch to grow and carve the grown region out of its siblings.
    fn plan_growth(
        node: NodeId,
        branches: &[Branch<D>],
        point: &Point<D>,
    ) -> Result<Step<D>> {
        let mut best: Option<(usize, Polygon<D>, f64)> = None;
        for (index, branch) in branches.iter().enumerate() {
            let expansion = polygon_expand(&branch.polygon, point)?;
            if best
                .as_ref()
                .is_none_or(|(_, _, added)| expansion.added_volume < *added)
            {
                best = Some((index, expansion.polygon, expansion.added_volume));
            }
        }
        let (index, mut candidate, added) = best.ok_or(NirError::EmptyRoutingNode(node))?;
        debug!(%node, index, added, "growing branch to enclose point");

        let overlapping: Vec<&Polygon<D>> = branches
            .iter()
            .enumerate()
            .filter(|&(i, b)| i != index && !polygons_are_disjoint(&b.polygon, &candidate))
            .map(|(_, b)| &b.polygon)
            .collect();
        for sibling in overlapping {
            trace!(?sibling, "carving sibling region");
            candidate = polygon_fragmentation(&candidate, sibling);
        }
        Ok(Step::Grow {
            index,
            child: branches[index].child,
            candidate,
        })
    }

    /// Store `point` in the leaf chosen by [`NirTree::choose_leaf`].
    pub fn insert(&mut self, point: Point<D>) -> Result<NodeId> {
        let leaf = self.choose_leaf(&point)?;
        self.push_point(leaf, point)?;
        Ok(leaf)
    }
}
