use super::placement::{Candidate, LocalGeometry, place_candidate};
use crate::core::models::atom::Atom;
use crate::core::models::clique::Clique;
use crate::core::models::ids::NodeId;
use crate::core::transform::{
    Handedness, HomogeneousTransform, anchor_transform, compose, position_of,
    second_anchor_transform, third_anchor_transform,
};
use crate::core::utils::geometry::Confidence;
use slotmap::SlotMap;
use std::iter;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TreeError {
    #[error("Node {0:?} not found in the placement tree")]
    NodeNotFound(NodeId),
    #[error("Placement tree has not been initialized with an anchor triplet")]
    NotInitialized,
    #[error("Placement tree is already initialized")]
    AlreadyInitialized,
    #[error("Node {parent:?} already has a {handedness:?} child")]
    SlotOccupied {
        parent: NodeId,
        handedness: Handedness,
    },
    #[error("Cannot grow pruned node {0:?}")]
    PrunedParent(NodeId),
    #[error("Node {node:?} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        node: NodeId,
        from: NodeState,
        to: NodeState,
    },
}

/// Lifecycle of a node in the placement tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Live, with no children yet.
    Unexpanded,
    /// Both children exist but have not been judged.
    ChildrenPending,
    /// Children have been judged, or the node could not be grown at all.
    Evaluated,
    /// Excluded from growth and from solutions, together with its subtree.
    Pruned,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub atom: Atom,
    pub parent: Option<NodeId>,
    pub children: [Option<NodeId>; 2],
    pub cumulative: HomogeneousTransform,
    pub handedness: Option<Handedness>,
    pub state: NodeState,
    /// Distance matching error recorded when the node was judged.
    pub dme: Option<f64>,
    pub confidence: Confidence,
}

impl Node {
    fn new(atom: Atom, parent: Option<NodeId>, cumulative: HomogeneousTransform) -> Self {
        Self {
            atom,
            parent,
            children: [None, None],
            cumulative,
            handedness: None,
            state: NodeState::Unexpanded,
            dme: None,
            confidence: Confidence::Nominal,
        }
    }

    pub fn index(&self) -> usize {
        self.atom.index()
    }

    pub fn is_live(&self) -> bool {
        self.state != NodeState::Pruned
    }
}

/// Arena of candidate placements, rooted at the first anchor atom.
///
/// Nodes are never removed; pruning only flips their state, so ancestor walks stay valid
/// for the lifetime of the tree. The tree enforces structure, not policy: deciding which
/// nodes to prune belongs to the driver.
#[derive(Debug, Default)]
pub struct PlacementTree {
    nodes: SlotMap<NodeId, Node>,
    root: Option<NodeId>,
}

impl PlacementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the anchor triplet as a straight chain and fixes the global frame.
    ///
    /// # Return
    ///
    /// The id of the third anchor, the only frontier node of the first growth level.
    pub fn initialize(&mut self, anchor: &Clique) -> Result<NodeId, TreeError> {
        if self.root.is_some() {
            return Err(TreeError::AlreadyInitialized);
        }
        let [first, second, third] = anchor.atoms();

        let t1 = anchor_transform();
        let t2 = compose(&t1, &second_anchor_transform(anchor.first_bond().length()));
        let t3 = compose(
            &t2,
            &third_anchor_transform(anchor.second_bond().length(), anchor.bond_angle()),
        );

        let root = self.insert(first, None, t1);
        let n2 = self.insert(second, Some(root), t2);
        let n3 = self.insert(third, Some(n2), t3);
        self.link_single(root, n2);
        self.link_single(n2, n3);

        self.root = Some(root);
        Ok(n3)
    }

    fn insert(&mut self, template: &Atom, parent: Option<NodeId>, t: HomogeneousTransform) -> NodeId {
        let atom = Atom::new(template.name(), template.index(), position_of(&t));
        self.nodes.insert(Node::new(atom, parent, t))
    }

    fn link_single(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children[0] = Some(child);
            node.state = NodeState::Evaluated;
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(id).ok_or(TreeError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::NodeNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates one child of `parent` from the level's local geometry.
    ///
    /// The geometry depends only on the input bonds, so the caller resolves the level's
    /// cliques once and passes the same [`LocalGeometry`] for every frontier node. Only
    /// the parent's cumulative transform differs between siblings of different parents.
    pub fn create_child(
        &mut self,
        parent: NodeId,
        geometry: &LocalGeometry,
        handedness: Handedness,
    ) -> Result<NodeId, TreeError> {
        if self.root.is_none() {
            return Err(TreeError::NotInitialized);
        }
        let cumulative = self.get(parent)?.cumulative;
        self.attach(parent, place_candidate(&cumulative, geometry, handedness))
    }

    /// Attaches an already positioned child under `parent`.
    ///
    /// Once both mirror slots are filled the parent moves to
    /// [`NodeState::ChildrenPending`].
    pub fn attach(&mut self, parent: NodeId, candidate: Candidate) -> Result<NodeId, TreeError> {
        if self.root.is_none() {
            return Err(TreeError::NotInitialized);
        }
        let slot = candidate.handedness.slot();
        let parent_node = self.get(parent)?;
        match parent_node.state {
            NodeState::Pruned => return Err(TreeError::PrunedParent(parent)),
            NodeState::Unexpanded => {}
            from => {
                return Err(TreeError::InvalidTransition {
                    node: parent,
                    from,
                    to: NodeState::ChildrenPending,
                });
            }
        }
        if parent_node.children[slot].is_some() {
            return Err(TreeError::SlotOccupied {
                parent,
                handedness: candidate.handedness,
            });
        }

        let mut child = Node::new(candidate.atom, Some(parent), candidate.cumulative);
        child.handedness = Some(candidate.handedness);
        child.confidence = candidate.confidence;
        let id = self.nodes.insert(child);

        let parent_node = self.get_mut(parent)?;
        parent_node.children[slot] = Some(id);
        if parent_node.children.iter().all(Option::is_some) {
            parent_node.state = NodeState::ChildrenPending;
        }
        Ok(id)
    }

    /// Records the score of a judged node and whether it survived.
    pub fn record_judgement(&mut self, id: NodeId, dme: f64, live: bool) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        if node.state != NodeState::Unexpanded {
            return Err(TreeError::InvalidTransition {
                node: id,
                from: node.state,
                to: if live {
                    NodeState::Unexpanded
                } else {
                    NodeState::Pruned
                },
            });
        }
        node.dme = Some(dme);
        if !live {
            node.state = NodeState::Pruned;
        }
        Ok(())
    }

    /// Marks a node as done: its children were judged or it could not be grown.
    pub fn mark_evaluated(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        match node.state {
            NodeState::Unexpanded | NodeState::ChildrenPending => {
                node.state = NodeState::Evaluated;
                Ok(())
            }
            from => Err(TreeError::InvalidTransition {
                node: id,
                from,
                to: NodeState::Evaluated,
            }),
        }
    }

    pub fn children(&self, id: NodeId) -> Result<impl Iterator<Item = NodeId> + '_, TreeError> {
        Ok(self.get(id)?.children.iter().flatten().copied())
    }

    /// Walks from the parent of `id` up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        let start = self.nodes.get(id).and_then(|n| n.parent);
        iter::successors(start, move |&current| self.nodes.get(current).and_then(|n| n.parent))
            .filter_map(move |current| self.nodes.get(current).map(|n| (current, n)))
    }

    /// The path from the root down to `id`, inclusive.
    pub fn lineage(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        self.get(id)?;
        let mut path: Vec<NodeId> = self.ancestors(id).map(|(ancestor, _)| ancestor).collect();
        path.reverse();
        path.push(id);
        Ok(path)
    }
}
