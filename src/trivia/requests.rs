//! Typed trivia request bodies, validated before any storage call.

use super::models::Question;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RequestError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

type Result<T> = std::result::Result<T, RequestError>;

fn field<'a>(body: &'a Value, name: &'static str) -> Result<&'a Value> {
    let object = body.as_object().ok_or(RequestError::NotAnObject)?;
    match object.get(name) {
        None | Some(Value::Null) => Err(RequestError::MissingField(name)),
        Some(value) => Ok(value),
    }
}

fn text_field(body: &Value, name: &'static str) -> Result<String> {
    match field(body, name)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::String(_) => Err(RequestError::InvalidField {
            field: name,
            reason: "must not be blank".to_string(),
        }),
        other => Err(RequestError::InvalidField {
            field: name,
            reason: format!("expected a string, got {other}"),
        }),
    }
}

/// Integers arrive either as JSON numbers or as numeric strings ("2").
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn int_field(body: &Value, name: &'static str) -> Result<i64> {
    let value = field(body, name)?;
    as_int(value).ok_or_else(|| RequestError::InvalidField {
        field: name,
        reason: format!("expected an integer, got {value}"),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion(pub Question);

impl NewQuestion {
    pub fn from_json(body: &Value) -> Result<Self> {
        let difficulty = int_field(body, "difficulty")?;
        if !(1..=5).contains(&difficulty) {
            return Err(RequestError::InvalidField {
                field: "difficulty",
                reason: format!("{difficulty} is outside 1..=5"),
            });
        }
        Ok(Self(Question {
            question: text_field(body, "question")?,
            answer: text_field(body, "answer")?,
            category: int_field(body, "category")?,
            difficulty,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub term: String,
}

impl SearchRequest {
    pub fn from_json(body: &Value) -> Result<Self> {
        match field(body, "searchTerm")? {
            Value::String(s) => Ok(Self {
                term: s.trim().to_string(),
            }),
            other => Err(RequestError::InvalidField {
                field: "searchTerm",
                reason: format!("expected a string, got {other}"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizRequest {
    pub category: i64,
    pub previous_questions: Vec<i64>,
}

impl QuizRequest {
    pub fn from_json(body: &Value) -> Result<Self> {
        let category = int_field(body, "quiz_category")?;
        let previous = match field(body, "previous_questions") {
            Ok(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    as_int(item).ok_or_else(|| RequestError::InvalidField {
                        field: "previous_questions",
                        reason: format!("{item} is not a question id"),
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Ok(other) => {
                return Err(RequestError::InvalidField {
                    field: "previous_questions",
                    reason: format!("expected a list of ids, got {other}"),
                })
            }
            Err(err) => return Err(err),
        };
        Ok(Self {
            category,
            previous_questions: previous,
        })
    }
}
