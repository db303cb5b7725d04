use super::Database;
use crate::error::Result;
use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension, Row};
use serde::Serialize;
use std::marker::PhantomData;
use std::ops::Deref;
use tracing::debug;

/// A plain data struct that maps onto one table.
///
/// `COLUMNS` lists every column except `id`, in the order `to_values`
/// produces them. `from_row` reads by column name.
pub trait Record: Clone + Send + Sync + 'static {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const ORDER_BY: &'static str = "id";

    fn to_values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// A record together with the id the database assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stored<T> {
    pub id: i64,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

impl<T: Record> Stored<T> {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            record: T::from_row(row)?,
        })
    }
}

/// CRUD operations every entity supports. App-specific queries live on the
/// app stores next to the repositories they use.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<Stored<T>>>;
    async fn list(&self) -> Result<Vec<Stored<T>>>;
    async fn count(&self) -> Result<i64>;
    async fn insert(&self, record: T) -> Result<Stored<T>>;
    /// Returns `false` when no row has that id.
    async fn update(&self, entity: &Stored<T>) -> Result<bool>;
    /// Returns `false` when no row has that id.
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct SqliteRepository<T> {
    db: Database,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for SqliteRepository<T> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> SqliteRepository<T> {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// `SELECT id, <columns> FROM <table>`, for composing app queries.
    pub fn select_sql() -> String {
        format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
    }

    fn insert_sql() -> String {
        let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("?{i}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            T::TABLE,
            T::COLUMNS.join(", "),
            placeholders.join(", ")
        )
    }

    fn update_sql() -> String {
        let assignments: Vec<String> = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c} = ?{}", i + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            T::TABLE,
            assignments.join(", "),
            T::COLUMNS.len() + 1
        )
    }
}

#[async_trait]
impl<T: Record> Repository<T> for SqliteRepository<T> {
    async fn get(&self, id: i64) -> Result<Option<Stored<T>>> {
        let sql = format!("{} WHERE id = ?1", Self::select_sql());
        self.db
            .call(move |conn| Ok(conn.query_row(&sql, [id], Stored::<T>::from_row).optional()?))
            .await
    }

    async fn list(&self) -> Result<Vec<Stored<T>>> {
        let sql = format!("{} ORDER BY {}", Self::select_sql(), T::ORDER_BY);
        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], Stored::<T>::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
    }

    async fn count(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
        self.db
            .call(move |conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
            .await
    }

    async fn insert(&self, record: T) -> Result<Stored<T>> {
        let sql = Self::insert_sql();
        let stored = self
            .db
            .transaction(move |tx| {
                tx.execute(&sql, params_from_iter(record.to_values()))?;
                Ok(Stored {
                    id: tx.last_insert_rowid(),
                    record,
                })
            })
            .await?;
        debug!("Inserted {} row with id {}", T::TABLE, stored.id);
        Ok(stored)
    }

    async fn update(&self, entity: &Stored<T>) -> Result<bool> {
        let sql = Self::update_sql();
        let mut values = entity.record.to_values();
        values.push(Value::Integer(entity.id));
        let id = entity.id;
        let changed = self
            .db
            .transaction(move |tx| Ok(tx.execute(&sql, params_from_iter(values))?))
            .await?;
        debug!("Updated {} row {} ({} changed)", T::TABLE, id, changed);
        Ok(changed > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", T::TABLE);
        let changed = self
            .db
            .transaction(move |tx| Ok(tx.execute(&sql, [id])?))
            .await?;
        debug!("Deleted {} row {} ({} changed)", T::TABLE, id, changed);
        Ok(changed > 0)
    }
}
