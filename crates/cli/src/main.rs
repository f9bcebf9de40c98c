mod render;
mod state;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use linkforest_core::export;
use linkforest_core::{Forest, NodeId, NodeKind, NodePatch};

use state::EditorState;

/// Hierarchical link manager: folders and short links in one editable tree
#[derive(Parser)]
#[command(name = "linkforest", about = "Edit a tree of folders and short links")]
struct Cli {
    /// Snapshot file holding the link tree
    #[arg(short, long, global = true, default_value = "links.json")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh snapshot file
    Init {
        /// Start from an empty forest instead of the demo tree
        #[arg(long)]
        empty: bool,
    },
    /// Print the tree
    Show,
    /// Add a folder, at the root unless --parent names a folder
    AddFolder {
        /// Display name (defaults to "New Folder")
        name: Option<String>,
        /// Parent folder id
        #[arg(long)]
        parent: Option<String>,
    },
    /// Add a link, at the root unless --parent names a folder
    AddLink {
        /// Display name (defaults to "New Link")
        name: Option<String>,
        /// Destination address
        #[arg(long)]
        url: Option<String>,
        /// Parent folder id
        #[arg(long)]
        parent: Option<String>,
    },
    /// Delete a node and everything under it
    Rm {
        /// Node id
        id: String,
    },
    /// Patch a node's fields in place
    Update {
        /// Node id
        id: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New destination address (links only)
        #[arg(long)]
        url: Option<String>,
    },
    /// Re-parent a node onto a folder
    Move {
        /// Node to move
        id: String,
        /// Destination folder id
        target: String,
    },
    /// Show what the editor pane shows for one node
    Inspect {
        /// Node id
        id: String,
    },
    /// Edit a link through the editor draft
    Edit {
        /// Link id
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New destination address
        #[arg(long)]
        url: Option<String>,
        /// New description (kept on the draft, not the node)
        #[arg(long)]
        description: Option<String>,
        /// Mark the link inactive in the draft
        #[arg(long)]
        inactive: bool,
    },
    /// Fuzzy-search node names and link urls
    Search {
        query: String,
    },
    /// Write the forest out for the persistence side
    Export {
        /// JSON payload path
        #[arg(long)]
        json: Option<PathBuf>,
        /// CSV of flattened link records
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Init { empty } => init(&cli.file, empty),
        Commands::Show => show(&cli.file),
        Commands::AddFolder { name, parent } => {
            add(&cli.file, NodeKind::Folder, name, None, parent)
        }
        Commands::AddLink { name, url, parent } => {
            add(&cli.file, NodeKind::Link, name, url, parent)
        }
        Commands::Rm { id } => rm(&cli.file, id),
        Commands::Update { id, name, url } => update(&cli.file, id, name, url),
        Commands::Move { id, target } => move_node(&cli.file, id, target),
        Commands::Inspect { id } => inspect(&cli.file, id),
        Commands::Edit {
            id,
            title,
            url,
            description,
            inactive,
        } => edit(&cli.file, id, title, url, description, inactive),
        Commands::Search { query } => search(&cli.file, &query),
        Commands::Export { json, csv } => export_cmd(&cli.file, json, csv),
    }
}

fn init(file: &Path, empty: bool) -> Result<()> {
    if file.exists() {
        bail!("{} already exists", file.display());
    }
    let forest = if empty {
        Forest::default()
    } else {
        state::starter_forest()
    };
    save_forest(file, &forest)?;
    println!(
        "initialized {} with {} nodes",
        file.display(),
        forest.node_count()
    );
    Ok(())
}

fn show(file: &Path) -> Result<()> {
    let forest = load_forest(file)?;
    if forest.is_empty() {
        println!("no links or folders yet");
    } else {
        print!("{}", render::render_forest(&forest));
    }
    Ok(())
}

fn add(
    file: &Path,
    kind: NodeKind,
    name: Option<String>,
    url: Option<String>,
    parent: Option<String>,
) -> Result<()> {
    let mut state = EditorState::new(load_forest(file)?);
    let parent = parent.map(NodeId::from);
    if let Some(parent) = &parent {
        match state.forest.get(parent).map(|n| n.is_folder()) {
            Some(true) => {}
            Some(false) => bail!("{} is a link and cannot hold children", parent),
            None => bail!("no node {} in this forest", parent),
        }
    }

    let id = state.add(parent.as_ref(), kind);
    let patch = NodePatch { name, url };
    if patch.name.is_some() || patch.url.is_some() {
        state.update_node(&id, &patch);
    }
    save_forest(file, &state.forest)?;

    let node = state.forest.get(&id).context("freshly added node vanished")?;
    match kind {
        NodeKind::Folder => println!("added folder {:?} as {}", node.name, id),
        NodeKind::Link => println!("added link {:?} as {}", node.name, id),
    }
    Ok(())
}

fn rm(file: &Path, id: String) -> Result<()> {
    let mut state = EditorState::new(load_forest(file)?);
    let id = NodeId::from(id);
    if !state.forest.contains(&id) {
        bail!("no node {} in this forest", id);
    }
    state.remove(&id);
    save_forest(file, &state.forest)?;
    println!("deleted {}", id);
    Ok(())
}

fn update(file: &Path, id: String, name: Option<String>, url: Option<String>) -> Result<()> {
    let mut state = EditorState::new(load_forest(file)?);
    let id = NodeId::from(id);
    if !state.forest.contains(&id) {
        bail!("no node {} in this forest", id);
    }
    if name.is_none() && url.is_none() {
        bail!("nothing to update, pass --name and/or --url");
    }
    state.update_node(&id, &NodePatch { name, url });
    save_forest(file, &state.forest)?;
    println!("updated {}", id);
    Ok(())
}

fn move_node(file: &Path, id: String, target: String) -> Result<()> {
    let mut state = EditorState::new(load_forest(file)?);
    let dragged = NodeId::from(id);
    let target = NodeId::from(target);
    if !state.forest.contains(&dragged) {
        bail!("no node {} in this forest", dragged);
    }
    state.move_node(&dragged, &target)?;
    save_forest(file, &state.forest)?;
    println!("moved {} under {}", dragged, target);
    Ok(())
}

fn inspect(file: &Path, id: String) -> Result<()> {
    let mut state = EditorState::new(load_forest(file)?);
    let id = NodeId::from(id);
    state.select(&id);

    match &state.draft {
        Some(draft) => {
            println!("Link Editor");
            println!("  title:        {}", draft.title);
            println!("  originalUrl:  {}", draft.original_url);
            println!("  shortUrl:     {}", draft.short_url);
            println!("  description:  {}", draft.description);
            println!("  active:       {}", draft.is_active);
        }
        None => {
            let Some(selected) = &state.selected else {
                bail!("no node {} in this forest", id);
            };
            let node = state.forest.get(selected).context("selection out of sync")?;
            println!("Folder: {}  ({} items)", node.name, node.children.len());
            println!("Add links or folders inside it with --parent {}", node.id);
        }
    }
    Ok(())
}

fn edit(
    file: &Path,
    id: String,
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    inactive: bool,
) -> Result<()> {
    let mut state = EditorState::new(load_forest(file)?);
    let id = NodeId::from(id);
    state.select(&id);
    if state.selected.is_none() {
        bail!("no node {} in this forest", id);
    }
    let Some(mut draft) = state.draft.clone() else {
        bail!("{} is a folder, only links can be edited", id);
    };

    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(url) = url {
        draft.original_url = url;
    }
    if let Some(description) = description {
        draft.description = description;
    }
    if inactive {
        draft.is_active = false;
    }
    state.apply_draft(draft);
    save_forest(file, &state.forest)?;
    println!("saved {}", id);
    Ok(())
}

fn search(file: &Path, query: &str) -> Result<()> {
    let forest = load_forest(file)?;
    let hits = linkforest_core::search::search(&forest, query);
    if hits.is_empty() {
        println!("no matches for {:?}", query);
        return Ok(());
    }
    for hit in hits {
        match hit.kind {
            NodeKind::Folder => println!("{:>4}  📁 {}  [{}]", hit.score, hit.name, hit.id),
            NodeKind::Link => println!(
                "{:>4}  🔗 {}  ({})  [{}]",
                hit.score,
                hit.name,
                hit.url.as_deref().unwrap_or(""),
                hit.id
            ),
        }
    }
    Ok(())
}

fn export_cmd(file: &Path, json: Option<PathBuf>, csv: Option<PathBuf>) -> Result<()> {
    let forest = load_forest(file)?;
    if json.is_none() && csv.is_none() {
        bail!("nothing to export, pass --json and/or --csv");
    }
    if let Some(path) = json {
        let payload = export::to_json(&forest, None);
        fs::write(&path, serde_json::to_string_pretty(&payload)?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    if let Some(path) = csv {
        let out = fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        export::to_csv(&forest, out)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn load_forest(file: &Path) -> Result<Forest> {
    let data = fs::read_to_string(file).with_context(|| {
        format!(
            "reading {} (run `linkforest init` to create it)",
            file.display()
        )
    })?;
    let forest =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", file.display()))?;
    Ok(forest)
}

fn save_forest(file: &Path, forest: &Forest) -> Result<()> {
    let data = serde_json::to_string_pretty(forest)?;
    fs::write(file, data).with_context(|| format!("writing {}", file.display()))?;
    Ok(())
}
