//! Drink recipes: request validation and the stored JSON text form.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

/// Ingredient as shown to unauthenticated clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

impl From<&Ingredient> for ShortIngredient {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            color: ingredient.color.clone(),
            parts: ingredient.parts,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RecipeError {
    #[error("recipe must be an ingredient object or a list of them")]
    WrongShape,

    #[error("recipe has no ingredients")]
    Empty,

    #[error("ingredient {index}: {reason}")]
    BadIngredient { index: usize, reason: String },

    #[error("stored recipe cannot be decoded: {0}")]
    Undecodable(String),
}

/// Validate a request's `recipe` value. A single object is treated as a
/// one-ingredient recipe.
pub fn parse(value: &Value) -> Result<Vec<Ingredient>, RecipeError> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![value],
        _ => return Err(RecipeError::WrongShape),
    };
    if items.is_empty() {
        return Err(RecipeError::Empty);
    }
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_ingredient(index, item))
        .collect()
}

fn parse_ingredient(index: usize, item: &Value) -> Result<Ingredient, RecipeError> {
    let bad = |reason: &str| RecipeError::BadIngredient {
        index,
        reason: reason.to_string(),
    };
    let object = item.as_object().ok_or_else(|| bad("not an object"))?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| bad("name is required"))?;
    let color = object
        .get("color")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| bad("color is required"))?;
    let parts = object
        .get("parts")
        .and_then(Value::as_u64)
        .filter(|p| *p > 0)
        .and_then(|p| u32::try_from(p).ok())
        .ok_or_else(|| bad("parts must be a positive integer"))?;

    Ok(Ingredient {
        name: name.to_string(),
        color: color.to_string(),
        parts,
    })
}

pub fn encode(recipe: &[Ingredient]) -> String {
    // Serializing plain strings and integers cannot fail.
    serde_json::to_string(recipe).unwrap_or_else(|_| "[]".to_string())
}

/// Decode stored recipe text. Rows written with single quotes instead of
/// JSON double quotes are retried after swapping the quotes.
pub fn decode(stored: &str) -> Result<Vec<Ingredient>, RecipeError> {
    match serde_json::from_str::<Value>(stored) {
        Ok(value) => parse(&value),
        Err(first) => {
            let swapped = stored.replace('\'', "\"");
            let value = serde_json::from_str::<Value>(&swapped)
                .map_err(|_| RecipeError::Undecodable(first.to_string()))?;
            parse(&value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn water() -> Ingredient {
        Ingredient {
            name: "water".into(),
            color: "blue".into(),
            parts: 1,
        }
    }

    #[test]
    fn single_object_is_one_ingredient() {
        let parsed = parse(&json!({"name": "water", "color": "blue", "parts": 1})).unwrap();
        assert_eq!(parsed, vec![water()]);
    }

    #[test]
    fn rejects_bad_ingredients() {
        assert_eq!(parse(&json!("water")), Err(RecipeError::WrongShape));
        assert_eq!(parse(&json!([])), Err(RecipeError::Empty));
        assert!(parse(&json!([{"name": "", "color": "blue", "parts": 1}])).is_err());
        assert!(parse(&json!([{"name": "milk", "color": "white", "parts": 0}])).is_err());
        assert!(parse(&json!([{"name": "milk", "color": "white", "parts": -2}])).is_err());
        assert!(parse(&json!([{"name": "milk", "parts": 1}])).is_err());
    }

    #[test]
    fn stored_text_is_real_json() {
        let text = encode(&[water()]);
        assert_eq!(text, r#"[{"name":"water","color":"blue","parts":1}]"#);
        assert_eq!(decode(&text).unwrap(), vec![water()]);
    }

    #[test]
    fn legacy_single_quoted_rows_still_decode() {
        let legacy = "[{'name': 'water', 'color': 'blue', 'parts': 1}]";
        assert_eq!(decode(legacy).unwrap(), vec![water()]);
        assert!(matches!(
            decode("not a recipe"),
            Err(RecipeError::Undecodable(_))
        ));
    }
}
