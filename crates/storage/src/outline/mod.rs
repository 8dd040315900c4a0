#![forbid(unsafe_code)]

mod alias;
mod attr;
mod erase;
mod moves;
mod nodes;

pub use alias::AliasStore;
pub use attr::{GENESIS_HEADING, ORDER_HEADING};

use crate::store::{Database, FlushStats, StoreConfig, StoreError};
use ol_core::NodeId;
use tracing::{debug, info};

pub const ROOT_HEADING: &str = "root";
pub const ROOT_TITLE: &str = "Root";
const WELCOME_BODY: &str = "Welcome to your outline.\n\nEvery node lives under exactly one parent and may be aliased beneath others.";

/// Node-level API over a [`Database`]: a rooted outline with attribute
/// nodes, display order and alias placements.
#[derive(Debug)]
pub struct Outline {
    db: Database,
    root: NodeId,
    aliases: AliasStore,
}

impl Outline {
    /// Fresh in-memory outline holding only the root node.
    pub fn new() -> Result<Self, StoreError> {
        let root = NodeId::new();
        let mut outline = Self {
            db: Database::new(),
            root,
            aliases: AliasStore::new(root),
        };
        outline.db.push_node(root)?;
        outline.db.push_heading(root, ROOT_HEADING)?;
        outline.db.push_title(root, ROOT_TITLE)?;
        outline.db.push_body(root, WELCOME_BODY)?;
        outline.stamp_genesis(root)?;
        debug!(root = %root, "outline.new");
        Ok(outline)
    }

    /// Loads an existing file, discovers the root and rebuilds the alias
    /// overlay from the persisted top-level placements.
    pub fn load(config: &StoreConfig) -> Result<Self, StoreError> {
        let db = Database::load(config)?;
        let root = discover_root(&db)?;
        let mut outline = Self {
            db,
            root,
            aliases: AliasStore::new(root),
        };

        let mut placements = outline.db.cache().aliases().iter().collect::<Vec<_>>();
        placements.sort();
        for (src, dst) in placements {
            outline.aliases.place_top(&outline.db, src, dst)?;
        }
        info!(root = %root, aliases = outline.aliases.len(), "outline.load");
        Ok(outline)
    }

    pub fn create_on_disk(&mut self, config: &StoreConfig) -> Result<FlushStats, StoreError> {
        self.db.create_on_disk(config)
    }

    pub fn flush(&mut self) -> Result<FlushStats, StoreError> {
        self.db.flush_delta_to_disk()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn aliases(&self) -> &AliasStore {
        &self.aliases
    }

    /// Maps an alias id to the node it stands for; any other id maps to itself.
    pub fn resolve(&self, id: NodeId) -> NodeId {
        self.aliases.get(id).map_or(id, |entry| entry.src)
    }

    pub fn is_alias(&self, id: NodeId) -> bool {
        self.aliases.contains(id)
    }

    /// True for stored nodes and for live alias placements.
    pub fn exists(&self, id: NodeId) -> bool {
        self.db.node_exists(id) || self.aliases.contains(id)
    }
}

// Climbs parent and attribute-owner edges from the lowest node id until
// neither exists.
fn discover_root(db: &Database) -> Result<NodeId, StoreError> {
    let mut current = db
        .cache()
        .nodes()
        .iter()
        .map(|(id, _)| *id)
        .min()
        .ok_or(StoreError::InvalidRoot)?;
    let limit = db.cache().nodes().len();
    for _ in 0..=limit {
        let next = db.fetch_parent(current).or_else(|| db.fetch_attr_owner(current));
        match next {
            Some(up) => current = up,
            None => return Ok(current),
        }
    }
    Err(StoreError::InvalidRoot)
}

#[cfg(test)]
mod tests;
