use linkforest_core::{Forest, Node, NodeKind};

/// Render the forest as an indented list, one node per line, with distinct
/// icons for folders and links.
pub fn render_forest(forest: &Forest) -> String {
    let mut out = String::new();
    for node in &forest.roots {
        render_node(node, 0, &mut out);
    }
    out
}

fn render_node(node: &Node, level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str("  ");
    }
    let label = match node.kind {
        NodeKind::Folder => format!("📁 {}  ({} items)", node.name, node.children.len()),
        NodeKind::Link => format!(
            "🔗 {}  ({})",
            node.name,
            node.url.as_deref().unwrap_or("")
        ),
    };
    out.push_str(&label);
    out.push('\n');
    for child in &node.children {
        render_node(child, level + 1, out);
    }
}
