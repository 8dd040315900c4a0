#![forbid(unsafe_code)]

use super::{Database, StoreError, Table};
use ol_core::NodeId;
use ol_core::delta::Decision;
use tracing::debug;

impl Database {
    /// Removes `id` from every table it participates in, dependents first.
    ///
    /// Only entries that are currently present are erased, so calling this on
    /// a node whose footprint is partial or already gone is fine. Child and
    /// attribute rows are matched by their owning parent; alias rows are
    /// matched by partner in both directions. Returns how many entries were
    /// erased or retracted.
    pub fn erase_all(&mut self, id: NodeId) -> Result<usize, StoreError> {
        let mut erased = 0;
        for table in Table::ERASE_ORDER {
            erased += match table {
                Table::Headings => self.erase_present(id, |db| db.fetch_heading(id).is_some(), Self::erase_heading)?,
                Table::Titles => self.erase_present(id, |db| db.fetch_title(id).is_some(), Self::erase_title)?,
                Table::Bodies => self.erase_present(id, |db| db.fetch_body(id).is_some(), Self::erase_body)?,
                Table::Resources => {
                    self.erase_present(id, |db| db.fetch_resource(id).is_some(), Self::erase_resource)?
                }
                Table::Nodes => self.erase_present(id, |db| db.node_exists(id), Self::erase_node)?,
                Table::Attributes => {
                    let owners = self.cache.attributes.lefts_of(id);
                    for owner in &owners {
                        self.erase_attr(*owner, id)?;
                    }
                    owners.len()
                }
                Table::Children => {
                    let parents = self.cache.children.lefts_of(id);
                    for parent in &parents {
                        self.erase_child(*parent, id)?;
                    }
                    parents.len()
                }
                Table::Aliases => {
                    let destinations = self.cache.aliases.rights_of(id);
                    for dst in &destinations {
                        self.erase_alias(id, *dst)?;
                    }
                    let sources = self.cache.aliases.lefts_of(id);
                    for src in &sources {
                        self.erase_alias(*src, id)?;
                    }
                    destinations.len() + sources.len()
                }
            };
        }
        debug!(node = %id, erased, "store.erase_all");
        Ok(erased)
    }

    fn erase_present(
        &mut self,
        id: NodeId,
        present: impl Fn(&Self) -> bool,
        erase: fn(&mut Self, NodeId) -> Result<Decision, StoreError>,
    ) -> Result<usize, StoreError> {
        if !present(self) {
            return Ok(0);
        }
        erase(self, id)?;
        Ok(1)
    }
}
