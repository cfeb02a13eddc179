// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree storage: nodes, branches, handles and structural queries.

use core::fmt;
use std::collections::HashSet;

use tracing::{instrument, trace};

use crate::error::{NirError, Result};
use crate::template::{BranchTemplate, NodeTemplate};
use crate::types::{Point, Polygon};

/// Generational handle for a node in a [`NirTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeId uses 32-bit indices by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0, self.1)
    }
}

/// A child node together with the region it claims.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch<const D: usize> {
    /// The node this branch leads to.
    pub child: NodeId,
    /// Region claimed by `child`, as seen from its parent.
    pub polygon: Polygon<D>,
}

/// The two kinds of node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind<const D: usize> {
    /// Stores points.
    Leaf {
        /// Points stored in this leaf, in no particular order.
        points: Vec<Point<D>>,
    },
    /// Routes to children through branches.
    Routing {
        /// Branches in insertion order.
        branches: Vec<Branch<D>>,
    },
}

/// A node of the tree.
///
/// A node does not store its own region: that lives in the branch of its
/// parent that points at it (see [`NirTree::node_polygon`]).
#[derive(Clone, Debug)]
pub struct Node<const D: usize> {
    generation: u32,
    parent: Option<NodeId>,
    kind: NodeKind<D>,
}

impl<const D: usize> Node<D> {
    /// The routing node whose branch holds this node, `None` for the root and
    /// for detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Leaf or routing contents.
    pub fn kind(&self) -> &NodeKind<D> {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind<D> {
        &mut self.kind
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Points of a leaf, `None` for routing nodes.
    pub fn points(&self) -> Option<&[Point<D>]> {
        match &self.kind {
            NodeKind::Leaf { points } => Some(points),
            NodeKind::Routing { .. } => None,
        }
    }

    /// Branches of a routing node, `None` for leaves.
    pub fn branches(&self) -> Option<&[Branch<D>]> {
        match &self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Routing { branches } => Some(branches),
        }
    }
}

/// A NIR-tree over `D`-dimensional points.
///
/// Nodes live in an arena and refer to each other through [`NodeId`] handles,
/// so parent links carry no ownership. Freed slots are recycled with a bumped
/// generation, which turns stale handles into [`NirError::UnknownNode`].
pub struct NirTree<const D: usize> {
    nodes: Vec<Option<Node<D>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
}

impl<const D: usize> fmt::Debug for NirTree<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("NirTree")
            .field("dimensions", &D)
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<const D: usize> Default for NirTree<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize> NirTree<D> {
    /// Create a tree whose root is an empty leaf.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
        };
        tree.root = tree.alloc(None, NodeKind::Leaf { points: Vec::new() });
        tree
    }

    /// Build a tree from a template, filling in parent links.
    #[instrument(level = "debug", skip_all)]
    pub fn from_template(template: &NodeTemplate<D>) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
        };
        tree.root = tree.build(template, None);
        tree
    }

    fn build(&mut self, template: &NodeTemplate<D>, parent: Option<NodeId>) -> NodeId {
        match template {
            NodeTemplate::Leaf { points } => self.alloc(
                parent,
                NodeKind::Leaf {
                    points: points.clone(),
                },
            ),
            NodeTemplate::Routing { branches } => {
                let id = self.alloc(parent, NodeKind::Routing { branches: Vec::new() });
                let built: Vec<_> = branches
                    .iter()
                    .map(|b| Branch {
                        child: self.build(&b.child, Some(id)),
                        polygon: b.polygon.clone(),
                    })
                    .collect();
                if let Some(Some(node)) = self.nodes.get_mut(id.idx()) {
                    node.kind = NodeKind::Routing { branches: built };
                }
                id
            }
        }
    }

    /// The template describing the whole tree.
    pub fn to_template(&self) -> NodeTemplate<D> {
        // The root is always alive.
        self.subtree_template(self.root)
            .unwrap_or(NodeTemplate::Leaf { points: Vec::new() })
    }

    /// The template describing the subtree rooted at `id`.
    pub fn subtree_template(&self, id: NodeId) -> Result<NodeTemplate<D>> {
        Ok(match &self.node(id)?.kind {
            NodeKind::Leaf { points } => NodeTemplate::Leaf {
                points: points.clone(),
            },
            NodeKind::Routing { branches } => NodeTemplate::Routing {
                branches: branches
                    .iter()
                    .map(|b| {
                        Ok(BranchTemplate {
                            child: self.subtree_template(b.child)?,
                            polygon: b.polygon.clone(),
                        })
                    })
                    .collect::<Result<_>>()?,
            },
        })
    }

    pub(crate) fn alloc(&mut self, parent: Option<NodeId>, kind: NodeKind<D>) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        self.nodes[idx] = Some(Node {
            generation,
            parent,
            kind,
        });
        let id = NodeId::new(idx, generation);
        trace!(%id, ?parent, "allocated node");
        id
    }

    /// Release a single slot. Children are left alone.
    pub(crate) fn release(&mut self, id: NodeId) {
        if self.contains(id) {
            self.nodes[id.idx()] = None;
            self.free_list.push(id.idx());
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        self.root = id;
    }

    /// Whether `id` refers to a live node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// The node behind `id`, if it is alive.
    pub fn get(&self, id: NodeId) -> Option<&Node<D>> {
        match self.nodes.get(id.idx()) {
            Some(Some(node)) if node.generation == id.1 => Some(node),
            _ => None,
        }
    }

    /// The node behind `id`.
    pub fn node(&self, id: NodeId) -> Result<&Node<D>> {
        self.get(id).ok_or(NirError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<D>> {
        match self.nodes.get_mut(id.idx()) {
            Some(Some(node)) if node.generation == id.1 => Ok(node),
            _ => Err(NirError::UnknownNode(id)),
        }
    }

    /// Parent of `id`.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<()> {
        self.node_mut(id)?.parent = parent;
        Ok(())
    }

    /// Branches of the routing node `id`.
    pub fn branches(&self, id: NodeId) -> Result<&[Branch<D>]> {
        self.node(id)?.branches().ok_or(NirError::NotARouting(id))
    }

    pub(crate) fn branches_mut(&mut self, id: NodeId) -> Result<&mut Vec<Branch<D>>> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Routing { branches } => Ok(branches),
            NodeKind::Leaf { .. } => Err(NirError::NotARouting(id)),
        }
    }

    /// Points of the leaf `id`.
    pub fn points(&self, id: NodeId) -> Result<&[Point<D>]> {
        self.node(id)?.points().ok_or(NirError::NotALeaf(id))
    }

    /// Append a point to the leaf `id`.
    pub fn push_point(&mut self, id: NodeId, point: Point<D>) -> Result<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Leaf { points } => {
                points.push(point);
                Ok(())
            }
            NodeKind::Routing { .. } => Err(NirError::NotALeaf(id)),
        }
    }

    /// The region claimed for `id` by its parent.
    ///
    /// Found by scanning the parent's branches for the one leading to `id`.
    /// `None` for the root, for detached nodes, and for a node its parent does
    /// not list.
    pub fn node_polygon(&self, id: NodeId) -> Result<Option<&Polygon<D>>> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(None);
        };
        Ok(self
            .branches(parent)?
            .iter()
            .find(|b| b.child == id)
            .map(|b| &b.polygon))
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Pre-order traversal from the root, branches visited in order.
    pub fn iter(&self) -> Iter<'_, D> {
        self.iter_from(self.root)
    }

    /// Pre-order traversal of the subtree rooted at `id`.
    pub fn iter_from(&self, id: NodeId) -> Iter<'_, D> {
        Iter {
            tree: self,
            stack: vec![id],
        }
    }

    /// Leaves in traversal order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of levels; a lone root leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.depth_of(self.root)
    }

    fn depth_of(&self, id: NodeId) -> usize {
        match self.get(id).map(Node::kind) {
            Some(NodeKind::Routing { branches }) => {
                1 + branches
                    .iter()
                    .map(|b| self.depth_of(b.child))
                    .max()
                    .unwrap_or(0)
            }
            Some(NodeKind::Leaf { .. }) => 1,
            None => 0,
        }
    }

    /// Check the structure below `id`: every routing node has branches, every
    /// child is alive and is claimed by exactly one branch, and every child
    /// points back at the node that claims it.
    pub(crate) fn check_subtree(&self, id: NodeId) -> Result<()> {
        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            let NodeKind::Routing { branches } = &node.kind else {
                continue;
            };
            if branches.is_empty() {
                return Err(NirError::EmptyRoutingNode(current));
            }
            for branch in branches {
                let child = self.node(branch.child)?;
                if child.parent != Some(current) {
                    return Err(NirError::BrokenParentLink {
                        child: branch.child,
                        parent: child.parent,
                    });
                }
                if !seen.insert(branch.child) {
                    return Err(NirError::DuplicateChild(branch.child));
                }
                stack.push(branch.child);
            }
        }
        Ok(())
    }

    /// Check the whole tree, reporting the first structural problem found.
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self) -> Result<()> {
        let root = self.node(self.root)?;
        if root.parent.is_some() {
            return Err(NirError::BrokenParentLink {
                child: self.root,
                parent: root.parent,
            });
        }
        self.check_subtree(self.root)
    }
}

/// Pre-order iterator over `(NodeId, &Node)` pairs.
#[derive(Debug)]
pub struct Iter<'a, const D: usize> {
    tree: &'a NirTree<D>,
    stack: Vec<NodeId>,
}

impl<'a, const D: usize> Iterator for Iter<'a, D> {
    type Item = (NodeId, &'a Node<D>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if let NodeKind::Routing { branches } = &node.kind {
                // Reverse so the first branch is visited first.
                self.stack.extend(branches.iter().rev().map(|b| b.child));
            }
            return Some((id, node));
        }
        None
    }
}
