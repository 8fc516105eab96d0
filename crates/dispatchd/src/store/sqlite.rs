//! SQLite-backed document store.
//!
//! One `documents` table keyed by (collection, id). Upserts keep the row id,
//! so ordering by rowid gives first-insert order.

use super::{store_err, DispatchStore};
use dispatch_shared::{Collection, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

const SCHEMA_VERSION: u32 = 1;

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create the store at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(store_err)?;
            }
        }
        let conn = Connection::open(path).map_err(store_err)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        info!("Opened document store at {}", path.display());
        Ok(store)
    }

    /// Private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(store_err)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            );
            CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
            CREATE TABLE IF NOT EXISTS schema_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .map_err(store_err)?;
        conn.execute(
            "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('version', ?)",
            params![SCHEMA_VERSION.to_string()],
        )
        .map_err(store_err)?;
        Ok(())
    }
}

impl DispatchStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn get_raw(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let conn = self.lock()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ? AND id = ?",
                params![collection.as_str(), id],
                |row| row.get(0),
            )
            .optional()
            .map_err(store_err)?;
        match body {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn list_raw(&self, collection: Collection) -> Result<Vec<Value>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT body FROM documents WHERE collection = ? ORDER BY rowid")
            .map_err(store_err)?;
        let rows = stmt
            .query_map(params![collection.as_str()], |row| row.get::<_, String>(0))
            .map_err(store_err)?;

        let mut out = Vec::new();
        for row in rows {
            let text = row.map_err(store_err)?;
            out.push(serde_json::from_str(&text)?);
        }
        Ok(out)
    }

    fn put_raw(&self, collection: Collection, id: &str, body: Value) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO documents (collection, id, body, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(collection, id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
            params![
                collection.as_str(),
                id,
                serde_json::to_string(&body)?,
                chrono::Utc::now().to_rfc3339()
            ],
        )
        .map_err(store_err)?;
        Ok(())
    }

    fn delete_raw(&self, collection: Collection, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "DELETE FROM documents WHERE collection = ? AND id = ?",
                params![collection.as_str(), id],
            )
            .map_err(store_err)?;
        Ok(changed > 0)
    }
}
