//! In-process store used by tests and `--ephemeral` runs.

use super::{store_err, DispatchStore};
use dispatch_shared::{Collection, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct Table {
    next_seq: u64,
    rows: HashMap<String, (u64, Value)>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Collection, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DispatchStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn get_raw(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let tables = self.tables.read().map_err(store_err)?;
        Ok(tables
            .get(&collection)
            .and_then(|t| t.rows.get(id))
            .map(|(_, body)| body.clone()))
    }

    fn list_raw(&self, collection: Collection) -> Result<Vec<Value>> {
        let tables = self.tables.read().map_err(store_err)?;
        let Some(table) = tables.get(&collection) else {
            return Ok(Vec::new());
        };
        let mut rows: Vec<&(u64, Value)> = table.rows.values().collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, body)| body.clone()).collect())
    }

    fn put_raw(&self, collection: Collection, id: &str, body: Value) -> Result<()> {
        let mut tables = self.tables.write().map_err(store_err)?;
        let table = tables.entry(collection).or_default();
        match table.rows.get_mut(id) {
            Some((_, existing)) => *existing = body,
            None => {
                let seq = table.next_seq;
                table.next_seq += 1;
                table.rows.insert(id.to_string(), (seq, body));
            }
        }
        Ok(())
    }

    fn delete_raw(&self, collection: Collection, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().map_err(store_err)?;
        Ok(tables
            .get_mut(&collection)
            .map(|t| t.rows.remove(id).is_some())
            .unwrap_or(false))
    }
}
