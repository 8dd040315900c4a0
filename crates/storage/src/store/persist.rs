#![forbid(unsafe_code)]

use super::cache::{Cache, KeyedTable, RelationTable};
use super::support::{id_text, install_schema, parse_id};
use super::{Database, StoreConfig, StoreError, Table};
use ol_core::NodeId;
use rusqlite::types::FromSql;
use rusqlite::{Connection, ToSql, Transaction, params};
use tracing::info;

/// Row counts applied to disk by one flush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub written: usize,
    pub deleted: usize,
}

impl FlushStats {
    pub fn total(&self) -> usize {
        self.written + self.deleted
    }
}

impl Database {
    /// Attaches a store that has only lived in memory to a brand-new file and
    /// dumps the whole cache into it in one transaction.
    pub fn create_on_disk(&mut self, config: &StoreConfig) -> Result<FlushStats, StoreError> {
        if self.conn.is_some() {
            return Err(StoreError::InvalidConfig("store is already attached".to_string()));
        }
        let path = config.db_path();
        if path.exists() {
            return Err(StoreError::AlreadyExists(path));
        }

        let mut conn = config.open_connection()?;
        install_schema(&conn)?;

        let mut stats = FlushStats::default();
        let tx = conn.transaction()?;
        dump_ids(&tx, Table::Nodes, &self.cache.nodes, &mut stats)?;
        dump_values(&tx, Table::Headings, &self.cache.headings, &mut stats)?;
        dump_values(&tx, Table::Titles, &self.cache.titles, &mut stats)?;
        dump_values(&tx, Table::Bodies, &self.cache.bodies, &mut stats)?;
        dump_values(&tx, Table::Resources, &self.cache.resources, &mut stats)?;
        dump_pairs(&tx, Table::Children, &self.cache.children, &mut stats)?;
        dump_pairs(&tx, Table::Aliases, &self.cache.aliases, &mut stats)?;
        dump_pairs(&tx, Table::Attributes, &self.cache.attributes, &mut stats)?;
        tx.commit()?;

        self.cache.fold_all();
        info!(path = %path.display(), written = stats.written, "store.create_on_disk");
        self.conn = Some(conn);
        self.path = Some(path);
        Ok(stats)
    }

    /// Opens an existing file and reads every table into the cache snapshot.
    pub fn load(config: &StoreConfig) -> Result<Self, StoreError> {
        let path = config.db_path();
        if !path.exists() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("database file not found: {}", path.display()),
            )));
        }

        let conn = config.open_connection()?;
        install_schema(&conn)?;

        let mut cache = Cache::default();
        for id in read_ids(&conn, Table::Nodes)? {
            cache.nodes.load_cached(id, ());
        }
        load_values(&conn, Table::Headings, &mut cache.headings)?;
        load_values(&conn, Table::Titles, &mut cache.titles)?;
        load_values(&conn, Table::Bodies, &mut cache.bodies)?;
        load_values(&conn, Table::Resources, &mut cache.resources)?;
        load_pairs(&conn, Table::Children, &mut cache.children)?;
        load_pairs(&conn, Table::Aliases, &mut cache.aliases)?;
        load_pairs(&conn, Table::Attributes, &mut cache.attributes)?;

        info!(
            path = %path.display(),
            nodes = cache.nodes.len(),
            children = cache.children.len(),
            aliases = cache.aliases.len(),
            "store.load"
        );
        Ok(Self {
            cache,
            conn: Some(conn),
            path: Some(path),
        })
    }

    /// Replays the last pending action of every key against disk inside one
    /// transaction, then folds the delta log into the snapshot.
    pub fn flush_delta_to_disk(&mut self) -> Result<FlushStats, StoreError> {
        let conn = self.conn.as_mut().ok_or(StoreError::NotAttached)?;
        if !self.cache.has_delta() {
            return Ok(FlushStats::default());
        }

        let mut stats = FlushStats::default();
        let tx = conn.transaction()?;
        flush_ids(&tx, Table::Nodes, &self.cache.nodes, &mut stats)?;
        flush_values(&tx, Table::Headings, &self.cache.headings, &mut stats)?;
        flush_values(&tx, Table::Titles, &self.cache.titles, &mut stats)?;
        flush_values(&tx, Table::Bodies, &self.cache.bodies, &mut stats)?;
        flush_values(&tx, Table::Resources, &self.cache.resources, &mut stats)?;
        flush_pairs(&tx, Table::Children, &self.cache.children, &mut stats)?;
        flush_pairs(&tx, Table::Aliases, &self.cache.aliases, &mut stats)?;
        flush_pairs(&tx, Table::Attributes, &self.cache.attributes, &mut stats)?;
        tx.commit()?;

        self.cache.fold_all();
        info!(written = stats.written, deleted = stats.deleted, "store.flush");
        Ok(stats)
    }
}

fn dump_ids(tx: &Transaction<'_>, table: Table, rows: &KeyedTable<()>, stats: &mut FlushStats) -> Result<(), StoreError> {
    let mut upsert = tx.prepare(&table.upsert_sql())?;
    for (id, _) in rows.iter() {
        upsert.execute(params![id_text(*id)])?;
        stats.written += 1;
    }
    Ok(())
}

fn dump_values<V>(tx: &Transaction<'_>, table: Table, rows: &KeyedTable<V>, stats: &mut FlushStats) -> Result<(), StoreError>
where
    V: ToSql + Clone + PartialEq,
{
    let mut upsert = tx.prepare(&table.upsert_sql())?;
    for (id, value) in rows.iter() {
        upsert.execute(params![id_text(*id), value])?;
        stats.written += 1;
    }
    Ok(())
}

fn dump_pairs(tx: &Transaction<'_>, table: Table, rows: &RelationTable, stats: &mut FlushStats) -> Result<(), StoreError> {
    let mut upsert = tx.prepare(&table.upsert_sql())?;
    for (left, right) in rows.iter() {
        upsert.execute(params![id_text(left), id_text(right)])?;
        stats.written += 1;
    }
    Ok(())
}

fn flush_ids(tx: &Transaction<'_>, table: Table, rows: &KeyedTable<()>, stats: &mut FlushStats) -> Result<(), StoreError> {
    let mut upsert = tx.prepare(&table.upsert_sql())?;
    let mut delete = tx.prepare(&table.delete_sql())?;
    for (id, delta) in rows.pending() {
        if delta.is_erased() {
            delete.execute(params![id_text(*id)])?;
            stats.deleted += 1;
        } else {
            upsert.execute(params![id_text(*id)])?;
            stats.written += 1;
        }
    }
    Ok(())
}

fn flush_values<V>(tx: &Transaction<'_>, table: Table, rows: &KeyedTable<V>, stats: &mut FlushStats) -> Result<(), StoreError>
where
    V: ToSql + Clone + PartialEq,
{
    let mut upsert = tx.prepare(&table.upsert_sql())?;
    let mut delete = tx.prepare(&table.delete_sql())?;
    for (id, delta) in rows.pending() {
        match delta.value() {
            Some(value) => {
                upsert.execute(params![id_text(*id), value])?;
                stats.written += 1;
            }
            None => {
                delete.execute(params![id_text(*id)])?;
                stats.deleted += 1;
            }
        }
    }
    Ok(())
}

fn flush_pairs(tx: &Transaction<'_>, table: Table, rows: &RelationTable, stats: &mut FlushStats) -> Result<(), StoreError> {
    let mut upsert = tx.prepare(&table.upsert_sql())?;
    let mut delete = tx.prepare(&table.delete_sql())?;
    for ((left, right), delta) in rows.pending() {
        if delta.is_erased() {
            delete.execute(params![id_text(left), id_text(right)])?;
            stats.deleted += 1;
        } else {
            upsert.execute(params![id_text(left), id_text(right)])?;
            stats.written += 1;
        }
    }
    Ok(())
}

fn read_ids(conn: &Connection, table: Table) -> Result<Vec<NodeId>, StoreError> {
    let mut stmt = conn.prepare(&table.select_sql())?;
    let raw = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    raw.iter().map(|text| parse_id(table, text)).collect()
}

fn load_values<V>(conn: &Connection, table: Table, rows: &mut KeyedTable<V>) -> Result<(), StoreError>
where
    V: FromSql + Clone + PartialEq,
{
    let mut stmt = conn.prepare(&table.select_sql())?;
    let raw = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, V>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    for (text, value) in raw {
        rows.load_cached(parse_id(table, &text)?, value);
    }
    Ok(())
}

fn load_pairs(conn: &Connection, table: Table, rows: &mut RelationTable) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(&table.select_sql())?;
    let raw = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    for (left, right) in raw {
        rows.load_cached(parse_id(table, &left)?, parse_id(table, &right)?);
    }
    Ok(())
}
