use super::models::{Category, Question};
use crate::error::Result;
use crate::storage::codec::contains_ignore_case;
use crate::storage::{Database, Repository, SqliteRepository, Stored};
use rusqlite::params;
use tracing::info;

const SCHEMA: &str = include_str!("../../migrations/002_trivia.sql");

/// Questions and categories behind the trivia API.
#[derive(Clone)]
pub struct TriviaStore {
    db: Database,
    pub questions: SqliteRepository<Question>,
    pub categories: SqliteRepository<Category>,
}

impl TriviaStore {
    pub async fn open(db: Database) -> Result<Self> {
        db.migrate(SCHEMA).await?;
        info!("Trivia schema ready");
        Ok(Self {
            questions: SqliteRepository::new(db.clone()),
            categories: SqliteRepository::new(db.clone()),
            db,
        })
    }

    /// One page of questions in listing order, plus the total count.
    pub async fn question_page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Stored<Question>>, i64)> {
        let sql = format!(
            "{} ORDER BY category, id LIMIT ?1 OFFSET ?2",
            SqliteRepository::<Question>::select_sql()
        );
        let page = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![limit, offset], Stored::<Question>::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;
        let total = self.questions.count().await?;
        Ok((page, total))
    }

    /// Case-insensitive substring match on the question text, in listing
    /// order. Filtered in Rust because SQLite's `LIKE` only folds ASCII.
    pub async fn search_questions(&self, term: &str) -> Result<Vec<Stored<Question>>> {
        let questions = self.questions.list().await?;
        Ok(questions
            .into_iter()
            .filter(|q| contains_ignore_case(&q.question, term))
            .collect())
    }

    pub async fn questions_in_category(&self, category: i64) -> Result<Vec<Stored<Question>>> {
        let sql = format!(
            "{} WHERE category = ?1 ORDER BY id",
            SqliteRepository::<Question>::select_sql()
        );
        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([category], Stored::<Question>::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
    }

    /// Quiz candidates: every question filed under `category`.
    pub async fn quiz_pool(&self, category: i64) -> Result<Vec<Stored<Question>>> {
        self.questions_in_category(category).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.db.clear(&["questions", "categories"]).await
    }
}
