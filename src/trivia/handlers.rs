use super::models::Question;
use super::pagination::{Page, PageQuery};
use super::quiz;
use super::requests::{NewQuestion, QuizRequest, RequestError, SearchRequest};
use super::store::TriviaStore;
use crate::envelope::{json_body, parse_id, ApiError};
use crate::observability::metrics;
use crate::storage::Repository;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

type ApiResult = Result<Json<Value>, ApiError>;

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        metrics::request_rejected("trivia", 400);
        ApiError::BadRequest(err.to_string())
    }
}

pub async fn list_categories(State(store): State<TriviaStore>) -> ApiResult {
    let categories = store.categories.list().await?;
    Ok(Json(json!({
        "success": true,
        "categories": categories,
    })))
}

pub async fn list_questions(
    State(store): State<TriviaStore>,
    Query(query): Query<PageQuery>,
) -> ApiResult {
    let page = Page::from_query(&query).ok_or(ApiError::NotFound)?;
    let (questions, total) = store.question_page(page.offset(), page.limit()).await?;
    if questions.is_empty() {
        debug!("Page {} is past the last question", page.number);
        return Err(ApiError::NotFound);
    }
    let categories = store.categories.list().await?;
    Ok(Json(json!({
        "success": true,
        "questions": questions,
        "total_questions": total,
        "categories": categories,
    })))
}

pub async fn delete_question(
    State(store): State<TriviaStore>,
    Path(raw_id): Path<String>,
) -> ApiResult {
    let id = parse_id(&raw_id)?;
    if !store.questions.delete(id).await? {
        return Err(ApiError::NotFound);
    }
    metrics::record_deleted("question");
    info!("Deleted question {id}");
    Ok(Json(json!({
        "success": true,
        "deleted_question": id,
    })))
}

pub async fn create_question(State(store): State<TriviaStore>, body: Bytes) -> ApiResult {
    let NewQuestion(question) = NewQuestion::from_json(&json_body(&body)?)?;
    let stored = store.questions.insert(question).await?;
    metrics::record_created("question");
    info!("Created question {}", stored.id);
    let Question {
        question,
        answer,
        category,
        difficulty,
    } = stored.record;
    Ok(Json(json!({
        "success": true,
        "question": question,
        "answer": answer,
        "category": category,
        "difficulty": difficulty,
    })))
}

pub async fn search_questions(State(store): State<TriviaStore>, body: Bytes) -> ApiResult {
    let request = SearchRequest::from_json(&json_body(&body)?)?;
    let questions = store.search_questions(&request.term).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(json!({
        "success": true,
        "total_questions": questions.len(),
        "questions": questions,
    })))
}

pub async fn questions_by_category(
    State(store): State<TriviaStore>,
    Path(raw_id): Path<String>,
) -> ApiResult {
    let id = parse_id(&raw_id)?;
    let category = store.categories.get(id).await?.ok_or(ApiError::NotFound)?;
    let questions = store.questions_in_category(id).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(json!({
        "success": true,
        "total_questions": questions.len(),
        "questions": questions,
        "current_category": category.kind,
    })))
}

pub async fn next_quiz_question(State(store): State<TriviaStore>, body: Bytes) -> ApiResult {
    let request = QuizRequest::from_json(&json_body(&body)?)?;
    let pool = store.quiz_pool(request.category).await?;
    let next = quiz::draw(&pool, &request.previous_questions, &mut rand::thread_rng());
    metrics::trivia::quiz_draw(next.is_none());

    let question = match next {
        Some(q) => serde_json::to_value(q).map_err(|e| ApiError::Internal(e.to_string()))?,
        None => Value::Bool(false),
    };
    Ok(Json(json!({
        "success": true,
        "question": question,
    })))
}
