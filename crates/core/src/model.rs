use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn generate() -> Self {
        NodeId(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

/// Fixed at creation; a folder never becomes a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Link,
}

/// `url` is `Some` only on links and `children` is non-empty only on
/// folders; the constructors uphold both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn folder(id: NodeId, name: impl Into<String>) -> Self {
        Node {
            id,
            name: name.into(),
            kind: NodeKind::Folder,
            url: None,
            children: Vec::new(),
        }
    }

    pub fn link(id: NodeId, name: impl Into<String>, url: impl Into<String>) -> Self {
        Node {
            id,
            name: name.into(),
            kind: NodeKind::Link,
            url: Some(url.into()),
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_link(&self) -> bool {
        self.kind == NodeKind::Link
    }
}

/// Root nodes in display order, as is every `children` list below them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    pub roots: Vec<Node>,
}

impl Forest {
    pub fn new(roots: Vec<Node>) -> Self {
        Forest { roots }
    }

    /// Pre-order: each node before its children, children before later siblings.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.roots.iter().rev().collect(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children reversed so the first child is popped next
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

/// Partial update for one node. Absent fields keep their current values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Editor form binding for a selected link. The node stores only a name
/// and a url; the other fields start from their defaults on every build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDraft {
    pub id: NodeId,
    pub original_url: String,
    pub short_url: String,
    pub title: String,
    pub description: String,
    pub is_active: bool,
}

impl LinkDraft {
    /// Folders have no draft.
    pub fn from_node(node: &Node) -> Option<Self> {
        if !node.is_link() {
            return None;
        }
        Some(LinkDraft {
            id: node.id.clone(),
            original_url: node.url.clone().unwrap_or_default(),
            short_url: node.id.0.clone(),
            title: node.name.clone(),
            description: String::new(),
            is_active: true,
        })
    }

    pub fn into_patch(self) -> NodePatch {
        NodePatch {
            name: Some(self.title),
            url: Some(self.original_url),
        }
    }
}
