use linkforest_core::export;
use linkforest_core::{Forest, LinkDraft, MoveError, Node, NodeId, NodeKind, NodePatch};
use tracing::warn;

/// Editing state layered over the pure forest ops: the current snapshot,
/// the selection, and the link-editor draft.
pub struct EditorState {
    pub forest: Forest,
    pub selected: Option<NodeId>,
    pub draft: Option<LinkDraft>,
}

impl EditorState {
    pub fn new(forest: Forest) -> Self {
        Self {
            forest,
            selected: None,
            draft: None,
        }
    }

    /// Select a node. Links get an editor draft built from their fields;
    /// folders clear it. A stale id clears the selection entirely.
    pub fn select(&mut self, id: &NodeId) {
        match self.forest.get(id) {
            Some(node) => {
                self.draft = LinkDraft::from_node(node);
                self.selected = Some(id.clone());
            }
            None => {
                warn!(id = %id, "selected node is no longer in the forest");
                self.selected = None;
                self.draft = None;
            }
        }
    }

    /// Add a node with default fields under `parent` (root when `None`)
    /// and select it. A stale parent lands nowhere and keeps the old
    /// selection.
    pub fn add(&mut self, parent: Option<&NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId::generate();
        let node = match kind {
            NodeKind::Folder => Node::folder(id.clone(), "New Folder"),
            NodeKind::Link => Node::link(id.clone(), "New Link", "https://example.com"),
        };
        self.forest = self.forest.insert(parent, node);
        if self.forest.contains(&id) {
            self.select(&id);
        }
        id
    }

    /// Delete a node and its subtree, clearing the selection whenever the
    /// selected node is gone afterwards.
    pub fn remove(&mut self, id: &NodeId) {
        self.forest = self.forest.delete(id);
        if let Some(selected) = &self.selected {
            if !self.forest.contains(selected) {
                self.selected = None;
                self.draft = None;
            }
        }
    }

    /// Apply a field patch, rebuilding the draft when it lands on the
    /// selection.
    pub fn update_node(&mut self, id: &NodeId, patch: &NodePatch) {
        self.forest = self.forest.update(id, patch);
        if self.selected.as_ref() == Some(id) {
            if let Some(node) = self.forest.get(id) {
                self.draft = LinkDraft::from_node(node);
            }
        }
    }

    /// Commit an edited draft back into the forest. Only applies when the
    /// draft targets the currently selected link.
    pub fn apply_draft(&mut self, draft: LinkDraft) {
        let selected_link = self
            .selected
            .as_ref()
            .filter(|selected| **selected == draft.id)
            .and_then(|selected| self.forest.get(selected))
            .map(|node| node.is_link())
            .unwrap_or(false);
        if !selected_link {
            warn!(id = %draft.id, "draft does not target the selected link, dropping it");
            return;
        }

        let id = draft.id.clone();
        let patch = draft.clone().into_patch();
        self.forest = self.forest.update(&id, &patch);
        self.draft = Some(draft);
    }

    /// Re-parent a node onto a folder; the selection stays put.
    pub fn move_node(&mut self, dragged: &NodeId, target: &NodeId) -> Result<(), MoveError> {
        self.forest = self.forest.move_node(dragged, target)?;
        Ok(())
    }

    /// The `{nodes, currentLink}` payload handed to the persistence side.
    pub fn save_payload(&self) -> serde_json::Value {
        export::to_json(&self.forest, self.draft.as_ref())
    }
}

/// Seed forest written by `init`: nested folders plus one loose bio link.
pub fn starter_forest() -> Forest {
    let mut marketing = Node::folder(NodeId::from("1"), "Marketing Links");
    let mut social = Node::folder(NodeId::from("2"), "Social Media");
    social.children.push(Node::link(
        NodeId::from("3"),
        "Instagram Campaign",
        "https://example.com/instagram",
    ));
    social.children.push(Node::link(
        NodeId::from("4"),
        "Twitter Posts",
        "https://example.com/twitter",
    ));
    marketing.children.push(social);
    marketing.children.push(Node::link(
        NodeId::from("5"),
        "Email Newsletter",
        "https://example.com/newsletter",
    ));

    let mut product = Node::folder(NodeId::from("6"), "Product Links");
    product.children.push(Node::link(
        NodeId::from("7"),
        "New Features",
        "https://example.com/features",
    ));

    Forest::new(vec![
        marketing,
        product,
        Node::link(NodeId::from("8"), "Personal Bio Link", "https://example.com/bio"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selecting_a_link_builds_a_draft() {
        let mut state = EditorState::new(starter_forest());
        state.select(&NodeId::from("3"));

        assert_eq!(state.selected, Some(NodeId::from("3")));
        let draft = state.draft.as_ref().unwrap();
        assert_eq!(draft.title, "Instagram Campaign");
        assert_eq!(draft.original_url, "https://example.com/instagram");
    }

    #[test]
    fn selecting_a_folder_clears_the_draft() {
        let mut state = EditorState::new(starter_forest());
        state.select(&NodeId::from("3"));
        state.select(&NodeId::from("2"));

        assert_eq!(state.selected, Some(NodeId::from("2")));
        assert!(state.draft.is_none());
    }

    #[test]
    fn selecting_a_stale_id_clears_everything() {
        let mut state = EditorState::new(starter_forest());
        state.select(&NodeId::from("3"));
        state.select(&NodeId::from("ghost"));

        assert!(state.selected.is_none());
        assert!(state.draft.is_none());
    }

    #[test]
    fn add_selects_the_new_node() {
        let mut state = EditorState::new(starter_forest());
        let id = state.add(Some(&NodeId::from("6")), NodeKind::Link);

        assert_eq!(state.selected, Some(id.clone()));
        let node = state.forest.get(&id).unwrap();
        assert_eq!(node.name, "New Link");
        assert_eq!(node.url.as_deref(), Some("https://example.com"));
        assert_eq!(state.draft.as_ref().unwrap().id, id);

        let folder = state.add(None, NodeKind::Folder);
        assert_eq!(state.selected, Some(folder.clone()));
        assert!(state.draft.is_none());
        assert_eq!(state.forest.roots.last().unwrap().id, folder);
    }

    #[test]
    fn add_under_stale_parent_changes_nothing() {
        let mut state = EditorState::new(starter_forest());
        state.select(&NodeId::from("8"));
        let id = state.add(Some(&NodeId::from("ghost")), NodeKind::Link);

        assert!(!state.forest.contains(&id));
        assert_eq!(state.selected, Some(NodeId::from("8")));
        assert_eq!(state.forest, starter_forest());
    }

    #[test]
    fn removing_an_ancestor_clears_a_nested_selection() {
        let mut state = EditorState::new(starter_forest());
        state.select(&NodeId::from("3"));
        state.remove(&NodeId::from("1"));

        assert!(state.selected.is_none());
        assert!(state.draft.is_none());
        assert!(state.forest.get(&NodeId::from("3")).is_none());
    }

    #[test]
    fn removing_an_unrelated_node_keeps_the_selection() {
        let mut state = EditorState::new(starter_forest());
        state.select(&NodeId::from("7"));
        state.remove(&NodeId::from("1"));

        assert_eq!(state.selected, Some(NodeId::from("7")));
        assert!(state.draft.is_some());
    }

    #[test]
    fn update_refreshes_the_draft_for_the_selection() {
        let mut state = EditorState::new(starter_forest());
        state.select(&NodeId::from("5"));
        state.update_node(
            &NodeId::from("5"),
            &NodePatch {
                name: Some("Weekly Digest".to_string()),
                url: None,
            },
        );

        assert_eq!(state.draft.as_ref().unwrap().title, "Weekly Digest");
    }

    #[test]
    fn apply_draft_writes_through_to_the_node() {
        let mut state = EditorState::new(starter_forest());
        state.select(&NodeId::from("5"));
        let mut draft = state.draft.clone().unwrap();
        draft.title = "Weekly Digest".to_string();
        draft.original_url = "https://example.com/digest".to_string();
        state.apply_draft(draft);

        let node = state.forest.get(&NodeId::from("5")).unwrap();
        assert_eq!(node.name, "Weekly Digest");
        assert_eq!(node.url.as_deref(), Some("https://example.com/digest"));
        assert_eq!(state.draft.as_ref().unwrap().title, "Weekly Digest");
    }

    #[test]
    fn apply_draft_ignores_a_mismatched_target() {
        let mut state = EditorState::new(starter_forest());
        state.select(&NodeId::from("5"));
        let mut draft = state.draft.clone().unwrap();
        draft.id = NodeId::from("7");
        draft.title = "Hijacked".to_string();
        state.apply_draft(draft);

        assert_eq!(state.forest, starter_forest());
        assert_eq!(state.draft.as_ref().unwrap().title, "Email Newsletter");
    }

    #[test]
    fn apply_draft_needs_a_link_selected() {
        let mut state = EditorState::new(starter_forest());
        state.select(&NodeId::from("5"));
        let draft = state.draft.clone().unwrap();
        state.select(&NodeId::from("1"));
        state.apply_draft(draft);

        assert_eq!(state.forest, starter_forest());
    }

    #[test]
    fn save_payload_mirrors_forest_and_draft() {
        let mut state = EditorState::new(starter_forest());
        let plain = state.save_payload();
        assert!(plain.get("currentLink").is_none());
        assert_eq!(plain["nodes"].as_array().unwrap().len(), 3);

        state.select(&NodeId::from("8"));
        let with_draft = state.save_payload();
        assert_eq!(with_draft["currentLink"]["shortUrl"], "8");
    }

    #[test]
    fn move_through_the_state_keeps_selection() {
        let mut state = EditorState::new(starter_forest());
        state.select(&NodeId::from("8"));
        state
            .move_node(&NodeId::from("8"), &NodeId::from("6"))
            .unwrap();

        assert_eq!(state.selected, Some(NodeId::from("8")));
        let product = state.forest.get(&NodeId::from("6")).unwrap();
        assert_eq!(product.children.last().unwrap().id, NodeId::from("8"));
    }

    #[test]
    fn rejected_move_keeps_the_forest() {
        let mut state = EditorState::new(starter_forest());
        let err = state
            .move_node(&NodeId::from("1"), &NodeId::from("2"))
            .unwrap_err();
        assert_eq!(err, MoveError::TargetInSubtree(NodeId::from("2")));
        assert_eq!(state.forest, starter_forest());
    }
}
