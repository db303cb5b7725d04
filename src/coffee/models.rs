use super::recipe::{self, Ingredient, ShortIngredient};
use crate::storage::{Record, Stored};
use rusqlite::types::{Type, Value};
use rusqlite::Row;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Record for Drink {
    const TABLE: &'static str = "drinks";
    const COLUMNS: &'static [&'static str] = &["title", "recipe"];

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.title.clone()),
            Value::Text(recipe::encode(&self.recipe)),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let stored: String = row.get("recipe")?;
        let recipe = recipe::decode(&stored).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
        })?;
        Ok(Self {
            title: row.get("title")?,
            recipe,
        })
    }
}

/// Public view: ingredient names hidden.
#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

/// Full view for holders of `get:drinks-detail`.
#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Stored<Drink> {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.iter().map(ShortIngredient::from).collect(),
        }
    }

    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }
}
