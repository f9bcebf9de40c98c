use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Forest, Node, NodeId, NodePatch};

/// Why a re-parenting was refused. A stale source id is not one of these;
/// see [`Forest::move_node`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("cannot move a node onto itself")]
    SelfTarget,

    #[error("target folder {0} not found")]
    TargetNotFound(NodeId),

    #[error("target {0} is a link and cannot hold children")]
    TargetIsLink(NodeId),

    #[error("target {0} is inside the subtree being moved")]
    TargetInSubtree(NodeId),
}

impl Forest {
    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Append `node` to the children of the folder matching `parent`, or
    /// to the roots when `parent` is `None`. An unknown or non-folder
    /// parent leaves the forest unchanged. Id uniqueness is the caller's
    /// contract.
    pub fn insert(&self, parent: Option<&NodeId>, node: Node) -> Forest {
        let Some(parent) = parent else {
            let mut roots = self.roots.clone();
            roots.push(node);
            return Forest { roots };
        };

        let mut pending = Some(node);
        let roots = attach(&self.roots, parent, &mut pending);
        if let Some(node) = pending {
            warn!(parent = %parent, id = %node.id, "insert parent is not a folder in this forest");
        }
        Forest { roots }
    }

    /// Drop the node matching `id`, subtree and all. Unknown ids are a no-op.
    pub fn delete(&self, id: &NodeId) -> Forest {
        Forest {
            roots: prune(&self.roots, id),
        }
    }

    /// Merge `patch` into the node matching `id`; absent fields keep their
    /// values and folders never take a url. Unknown ids are a no-op.
    pub fn update(&self, id: &NodeId, patch: &NodePatch) -> Forest {
        if !self.contains(id) {
            warn!(id = %id, "update target not in this forest");
            return self.clone();
        }
        Forest {
            roots: apply(&self.roots, id, patch),
        }
    }

    /// Detach the node matching `dragged` and re-attach it as the last
    /// child of the folder matching `target`. Destinations that would
    /// strand the detached subtree are refused: the node itself, a link,
    /// a folder inside the moved subtree, or an unknown id. A stale
    /// `dragged` id is the usual benign no-op.
    pub fn move_node(&self, dragged: &NodeId, target: &NodeId) -> Result<Forest, MoveError> {
        if dragged == target {
            return Err(MoveError::SelfTarget);
        }

        let mut captured = None;
        let roots = detach(&self.roots, dragged, &mut captured);
        let Some(node) = captured else {
            debug!(dragged = %dragged, "move source not in this forest");
            return Ok(self.clone());
        };

        let detached = Forest { roots };
        match detached.get(target) {
            Some(t) if t.is_folder() => {}
            Some(_) => return Err(MoveError::TargetIsLink(target.clone())),
            None if subtree_contains(&node, target) => {
                return Err(MoveError::TargetInSubtree(target.clone()));
            }
            None => return Err(MoveError::TargetNotFound(target.clone())),
        }

        debug!(dragged = %dragged, target = %target, "re-parenting node");
        Ok(detached.insert(Some(target), node))
    }
}

/// Place the pending node under the first folder matching `parent`.
fn attach(nodes: &[Node], parent: &NodeId, pending: &mut Option<Node>) -> Vec<Node> {
    nodes
        .iter()
        .map(|n| {
            if pending.is_none() {
                return n.clone();
            }
            let mut n = n.clone();
            if n.id == *parent && n.is_folder() {
                if let Some(node) = pending.take() {
                    n.children.push(node);
                }
            } else if !n.children.is_empty() {
                n.children = attach(&n.children, parent, pending);
            }
            n
        })
        .collect()
}

fn prune(nodes: &[Node], id: &NodeId) -> Vec<Node> {
    nodes
        .iter()
        .filter(|n| &n.id != id)
        .map(|n| {
            let mut n = n.clone();
            if !n.children.is_empty() {
                n.children = prune(&n.children, id);
            }
            n
        })
        .collect()
}

fn apply(nodes: &[Node], id: &NodeId, patch: &NodePatch) -> Vec<Node> {
    nodes
        .iter()
        .map(|n| {
            let mut n = n.clone();
            if &n.id == id {
                if let Some(name) = &patch.name {
                    n.name = name.clone();
                }
                if let Some(url) = &patch.url {
                    if n.is_link() {
                        n.url = Some(url.clone());
                    }
                }
            } else if !n.children.is_empty() {
                n.children = apply(&n.children, id, patch);
            }
            n
        })
        .collect()
}

/// Remove the node matching `id`, handing it back through `captured`.
fn detach(nodes: &[Node], id: &NodeId, captured: &mut Option<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for n in nodes {
        if captured.is_none() && &n.id == id {
            *captured = Some(n.clone());
            continue;
        }
        let mut n = n.clone();
        if captured.is_none() && !n.children.is_empty() {
            n.children = detach(&n.children, id, captured);
        }
        out.push(n);
    }
    out
}

/// True when `id` names a strict descendant of `node`.
fn subtree_contains(node: &Node, id: &NodeId) -> bool {
    node.children
        .iter()
        .any(|c| &c.id == id || subtree_contains(c, id))
}
