use crate::storage::Record;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

impl Record for Question {
    const TABLE: &'static str = "questions";
    const COLUMNS: &'static [&'static str] = &["question", "answer", "category", "difficulty"];
    // Listing order; pagination windows are cut from this ordering
    const ORDER_BY: &'static str = "category, id";

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.question.clone()),
            Value::Text(self.answer.clone()),
            Value::Integer(self.category),
            Value::Integer(self.difficulty),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            question: row.get("question")?,
            answer: row.get("answer")?,
            category: row.get("category")?,
            difficulty: row.get("difficulty")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Record for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &["type"];

    fn to_values(&self) -> Vec<Value> {
        vec![Value::Text(self.kind.clone())]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            kind: row.get("type")?,
        })
    }
}
