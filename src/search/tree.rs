// Search tree stored as an arena of nodes
//
// Nodes refer to their parent and children by index. The arena owns every
// node; a parent index is only ever used to walk upwards or read visit counts.

use super::moves::Move;
use crate::rules::BoardState;

pub type NodeId = usize;

/// One simulated outcome of a joint move set
#[derive(Debug, Clone)]
pub struct Node {
    pub board: BoardState,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Our move that led here
    pub mv: Move,
    /// Cumulative rollout score per snake, indexed by the snake's board slot
    pub scores: Vec<i32>,
    pub visits: u32,
    /// Set once a rollout has been played from this node
    pub played: bool,
    /// Set once the child list has been populated
    pub expanded: bool,
}

impl Node {
    fn new(board: BoardState, parent: Option<NodeId>, mv: Move) -> Self {
        let scores = vec![0; board.snakes.len()];
        Node {
            board,
            parent,
            children: Vec::new(),
            mv,
            scores,
            visits: 0,
            played: false,
            expanded: false,
        }
    }

    pub fn score(&self, slot: usize) -> i32 {
        self.scores.get(slot).copied().unwrap_or(0)
    }
}

#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub const ROOT: NodeId = 0;

    pub fn new(board: BoardState, mv: Move) -> Self {
        Tree {
            nodes: vec![Node::new(board, None, mv)],
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Total nodes ever allocated, including detached ones
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_child(&mut self, parent: NodeId, board: BoardState, mv: Move) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(board, Some(parent), mv));
        self.nodes[parent].children.push(id);
        id
    }

    /// Unlinks a node from its parent so selection can no longer reach it.
    /// The node itself stays allocated until the tree is dropped.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent {
            self.nodes[parent].children.retain(|&c| c != id);
        }
    }

    /// Visit count of the node's parent, 0 for the root
    pub fn parent_visits(&self, id: NodeId) -> u32 {
        self.nodes[id]
            .parent
            .map(|p| self.nodes[p].visits)
            .unwrap_or(0)
    }

    /// Adds `deltas` to every node from `from` up to the root and counts one
    /// visit on each of them.
    pub fn backpropagate(&mut self, from: NodeId, deltas: &[i32]) {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let node = &mut self.nodes[id];
            for (score, delta) in node.scores.iter_mut().zip(deltas) {
                *score += delta;
            }
            node.visits += 1;
            cursor = node.parent;
        }
    }
}
