//! SQLite-backed product and history store.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::{
    history::{HistoryDraft, HistoryEntry},
    product::{Product, ProductDraft},
    types::{ActionType, HistoryId, ProductId, StockStatus},
};

use super::{HistoryStore, InventoryStore, ProductStore, StoreError, StoreResult};

const PRODUCT_COLUMNS: &str = "id, name, category, brand, stock, unit, status, image";

/// SQLite implementation of [`InventoryStore`].
pub struct SqliteInventoryStore {
    conn: Connection,
}

impl SqliteInventoryStore {
    /// Opens or creates a SQLite-backed store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        log::info!("opening inventory database at {}", path.display());
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory SQLite store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        // In-memory databases answer "memory" here.
        let mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        log::debug!("sqlite journal_mode={mode}");
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    fn query_products(&self, sql: &str, args: impl rusqlite::Params) -> StoreResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, product_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl ProductStore for SqliteInventoryStore {
    fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let product = self
            .conn
            .query_row(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
                params![id],
                product_from_row,
            )
            .optional()?;
        Ok(product)
    }

    fn insert_product(&mut self, draft: &ProductDraft) -> StoreResult<ProductId> {
        self.conn
            .execute(
                "INSERT INTO products (name, category, brand, stock, unit, status, image)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    draft.name,
                    draft.category,
                    draft.brand,
                    draft.stock,
                    draft.unit,
                    draft.status.as_str(),
                    draft.image,
                ],
            )
            .map_err(|err| name_error(err, &draft.name))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn replace_product(&mut self, product: &Product) -> StoreResult<()> {
        let changed = update_row(&self.conn, product)?;
        if changed == 0 {
            return Err(StoreError::MissingProduct(product.id));
        }
        Ok(())
    }

    fn delete_product(&mut self, id: ProductId) -> StoreResult<bool> {
        let count = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1", params![id])?;
        Ok(count > 0)
    }

    fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.query_products(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC"),
            [],
        )
    }

    fn search_products(&self, query: &str, category: Option<&str>) -> StoreResult<Vec<Product>> {
        self.query_products(
            &format!(
                "SELECT {PRODUCT_COLUMNS} FROM products
                 WHERE instr(lower(name), lower(?1)) > 0
                   AND (?2 IS NULL OR category = ?2)
                 ORDER BY id ASC"
            ),
            params![query, category],
        )
    }

    fn list_categories(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT category FROM products
             WHERE category IS NOT NULL AND category <> '' ORDER BY category ASC",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl HistoryStore for SqliteInventoryStore {
    fn append_history(&mut self, draft: &HistoryDraft) -> StoreResult<HistoryId> {
        insert_history(&self.conn, draft)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn history_for(&self, product_id: ProductId) -> StoreResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, product_id, old_quantity, new_quantity, change_date, action_type
             FROM inventory_history WHERE product_id = ?1
             ORDER BY change_date DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![product_id], history_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl InventoryStore for SqliteInventoryStore {
    fn commit_update(
        &mut self,
        product: &Product,
        history: Option<&HistoryDraft>,
    ) -> StoreResult<Option<HistoryEntry>> {
        let tx = self.conn.transaction()?;
        let entry = match history {
            Some(draft) => {
                insert_history(&tx, draft)?;
                Some(HistoryEntry::from_draft(tx.last_insert_rowid(), draft.clone()))
            }
            None => None,
        };
        if update_row(&tx, product)? == 0 {
            return Err(StoreError::MissingProduct(product.id));
        }
        tx.commit()?;
        Ok(entry)
    }
}

fn update_row(conn: &Connection, product: &Product) -> StoreResult<usize> {
    conn.execute(
        "UPDATE products SET name = ?1, category = ?2, brand = ?3, stock = ?4,
         unit = ?5, status = ?6, image = ?7 WHERE id = ?8",
        params![
            product.name,
            product.category,
            product.brand,
            product.stock,
            product.unit,
            product.status.as_str(),
            product.image,
            product.id,
        ],
    )
    .map_err(|err| name_error(err, &product.name))
}

fn insert_history(conn: &Connection, draft: &HistoryDraft) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO inventory_history (product_id, old_quantity, new_quantity, change_date, action_type)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            draft.product_id,
            draft.old_quantity,
            draft.new_quantity,
            draft.change_date.to_rfc3339_opts(SecondsFormat::Micros, true),
            draft.action_type.as_str(),
        ],
    )?;
    Ok(())
}

fn name_error(err: rusqlite::Error, name: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::NameConflict(name.to_string())
        }
        _ => StoreError::Sqlite(err),
    }
}

fn conversion_error(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::other(msg)),
    )
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    let label: String = row.get(6)?;
    let status = StockStatus::from_label(&label)
        .ok_or_else(|| conversion_error(6, format!("unknown status label: {label}")))?;
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        brand: row.get(3)?,
        stock: row.get(4)?,
        unit: row.get(5)?,
        status,
        image: row.get(7)?,
    })
}

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    let raw_date: String = row.get(4)?;
    let change_date = DateTime::parse_from_rfc3339(&raw_date)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| conversion_error(4, format!("bad change_date {raw_date}: {e}")))?;
    let label: String = row.get(5)?;
    let action_type = ActionType::from_label(&label)
        .ok_or_else(|| conversion_error(5, format!("unknown action type: {label}")))?;
    Ok(HistoryEntry {
        id: row.get(0)?,
        product_id: row.get(1)?,
        old_quantity: row.get(2)?,
        new_quantity: row.get(3)?,
        change_date,
        action_type,
    })
}
