use crate::model::{Forest, LinkDraft, Node, NodeId, NodeKind};

/// One flattened link: the slash-joined folder trail, then its own fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub path: String,
    pub id: NodeId,
    pub name: String,
    pub url: String,
}

/// Flatten the forest to its link records, in forest order.
pub fn link_rows(forest: &Forest) -> Vec<LinkRow> {
    let mut rows = Vec::new();
    for root in &forest.roots {
        collect(root, "", &mut rows);
    }
    rows
}

fn collect(node: &Node, prefix: &str, rows: &mut Vec<LinkRow>) {
    match node.kind {
        NodeKind::Link => rows.push(LinkRow {
            path: prefix.to_string(),
            id: node.id.clone(),
            name: node.name.clone(),
            url: node.url.clone().unwrap_or_default(),
        }),
        NodeKind::Folder => {
            let prefix = if prefix.is_empty() {
                node.name.clone()
            } else {
                format!("{}/{}", prefix, node.name)
            };
            for child in &node.children {
                collect(child, &prefix, rows);
            }
        }
    }
}

pub fn to_csv(forest: &Forest, mut w: impl std::io::Write) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record(["path", "id", "name", "url"]).ok();
    for row in link_rows(forest) {
        writer.write_record([row.path, row.id.0, row.name, row.url])?;
    }
    writer.flush()?;
    Ok(())
}

/// The `{nodes, currentLink}` save payload; `currentLink` is omitted when
/// no link is mid-edit.
pub fn to_json(forest: &Forest, current: Option<&LinkDraft>) -> serde_json::Value {
    let mut payload = serde_json::json!({ "nodes": forest });
    if let Some(draft) = current {
        payload["currentLink"] = serde_json::json!(draft);
    }
    payload
}
