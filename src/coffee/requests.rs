use super::recipe::{self, Ingredient, RecipeError};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DrinkRequestError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("title must be a non-empty string")]
    BadTitle,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("nothing to update")]
    Empty,

    #[error(transparent)]
    Recipe(#[from] RecipeError),
}

fn title(value: &Value) -> Result<String, DrinkRequestError> {
    value
        .as_str()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or(DrinkRequestError::BadTitle)
}

fn present<'a>(body: &'a Value, name: &str) -> Option<&'a Value> {
    body.get(name).filter(|v| !v.is_null())
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl NewDrink {
    pub fn from_json(body: &Value) -> Result<Self, DrinkRequestError> {
        if !body.is_object() {
            return Err(DrinkRequestError::NotAnObject);
        }
        let title = title(present(body, "title").ok_or(DrinkRequestError::MissingField("title"))?)?;
        let recipe = recipe::parse(
            present(body, "recipe").ok_or(DrinkRequestError::MissingField("recipe"))?,
        )?;
        Ok(Self { title, recipe })
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkPatch {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl DrinkPatch {
    pub fn from_json(body: &Value) -> Result<Self, DrinkRequestError> {
        if !body.is_object() {
            return Err(DrinkRequestError::NotAnObject);
        }
        let patch = Self {
            title: present(body, "title").map(title).transpose()?,
            recipe: present(body, "recipe").map(recipe::parse).transpose()?,
        };
        if patch.title.is_none() && patch.recipe.is_none() {
            return Err(DrinkRequestError::Empty);
        }
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_drink_requires_title_and_recipe() {
        let ok = NewDrink::from_json(&json!({
            "title": " Water3 ",
            "recipe": {"name": "Water", "color": "blue", "parts": 1}
        }))
        .unwrap();
        assert_eq!(ok.title, "Water3");
        assert_eq!(ok.recipe.len(), 1);

        assert_eq!(
            NewDrink::from_json(&json!({"recipe": []})),
            Err(DrinkRequestError::MissingField("title"))
        );
        assert_eq!(
            NewDrink::from_json(&json!({"title": "x"})),
            Err(DrinkRequestError::MissingField("recipe"))
        );
        assert_eq!(
            NewDrink::from_json(&json!({"title": "", "recipe": []})),
            Err(DrinkRequestError::BadTitle)
        );
    }

    #[test]
    fn patch_accepts_either_field() {
        let p = DrinkPatch::from_json(&json!({"title": "Latte"})).unwrap();
        assert_eq!(p.title.as_deref(), Some("Latte"));
        assert!(p.recipe.is_none());

        let p = DrinkPatch::from_json(&json!({"recipe": [{"name": "milk", "color": "white", "parts": 2}]}))
            .unwrap();
        assert!(p.title.is_none());

        assert_eq!(DrinkPatch::from_json(&json!({})), Err(DrinkRequestError::Empty));
        assert!(DrinkPatch::from_json(&json!({"recipe": "milk"})).is_err());
    }
}
