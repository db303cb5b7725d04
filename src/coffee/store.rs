use super::models::Drink;
use crate::error::Result;
use crate::storage::{Database, SqliteRepository};
use tracing::info;

const SCHEMA: &str = include_str!("../../migrations/003_coffee.sql");

#[derive(Clone)]
pub struct CoffeeStore {
    db: Database,
    pub drinks: SqliteRepository<Drink>,
}

impl CoffeeStore {
    pub async fn open(db: Database) -> Result<Self> {
        db.migrate(SCHEMA).await?;
        info!("Coffee shop schema ready");
        Ok(Self {
            drinks: SqliteRepository::new(db.clone()),
            db,
        })
    }

    pub async fn clear(&self) -> Result<()> {
        self.db.clear(&["drinks"]).await
    }
}
