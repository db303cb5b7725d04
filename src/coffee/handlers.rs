use super::auth::{
    Authorized, DeleteDrinks, GetBaristas, GetDrinksDetail, GetManagers, PatchDrinks, PostBaristas,
    PostDrinks, PostManagers,
};
use super::directory::{DirectoryError, Role};
use super::models::Drink;
use super::requests::{DrinkPatch, DrinkRequestError, NewDrink};
use super::state::CoffeeApp;
use crate::envelope::{json_body, parse_id, ApiError};
use crate::observability::metrics;
use crate::storage::Repository;
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

type ApiResult = Result<Json<Value>, ApiError>;

impl From<DrinkRequestError> for ApiError {
    fn from(err: DrinkRequestError) -> Self {
        metrics::request_rejected("coffee", 400);
        ApiError::BadRequest(err.to_string())
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

pub async fn list_drinks(State(app): State<CoffeeApp>) -> ApiResult {
    let drinks = app.store.drinks.list().await?;
    if drinks.is_empty() {
        return Err(ApiError::NotFound);
    }
    let drinks: Vec<_> = drinks.iter().map(|d| d.short()).collect();
    Ok(Json(json!({ "success": true, "drinks": drinks })))
}

pub async fn drinks_detail(
    State(app): State<CoffeeApp>,
    _auth: Authorized<GetDrinksDetail>,
) -> ApiResult {
    let drinks = app.store.drinks.list().await?;
    if drinks.is_empty() {
        return Err(ApiError::NotFound);
    }
    let drinks: Vec<_> = drinks.iter().map(|d| d.long()).collect();
    Ok(Json(json!({ "success": true, "drinks": drinks })))
}

pub async fn create_drink(
    State(app): State<CoffeeApp>,
    _auth: Authorized<PostDrinks>,
    body: Bytes,
) -> ApiResult {
    let NewDrink { title, recipe } = NewDrink::from_json(&json_body(&body)?)?;
    let stored = app.store.drinks.insert(Drink { title, recipe }).await?;
    metrics::record_created("drink");
    info!("Created drink {} ({})", stored.id, stored.title);
    Ok(Json(json!({ "success": true, "drinks": [stored.long()] })))
}

pub async fn update_drink(
    State(app): State<CoffeeApp>,
    Path(raw_id): Path<String>,
    _auth: Authorized<PatchDrinks>,
    body: Bytes,
) -> ApiResult {
    let id = parse_id(&raw_id)?;
    let mut drink = app.store.drinks.get(id).await?.ok_or(ApiError::NotFound)?;

    let DrinkPatch { title, recipe } = DrinkPatch::from_json(&json_body(&body)?)?;
    if let Some(title) = title {
        drink.record.title = title;
    }
    if let Some(recipe) = recipe {
        drink.record.recipe = recipe;
    }
    if !app.store.drinks.update(&drink).await? {
        return Err(ApiError::NotFound);
    }
    metrics::record_updated("drink");
    info!("Updated drink {id}");
    Ok(Json(json!({ "success": true, "drinks": [drink.long()] })))
}

pub async fn delete_drink(
    State(app): State<CoffeeApp>,
    Path(raw_id): Path<String>,
    _auth: Authorized<DeleteDrinks>,
) -> ApiResult {
    let id = parse_id(&raw_id)?;
    if !app.store.drinks.delete(id).await? {
        return Err(ApiError::NotFound);
    }
    metrics::record_deleted("drink");
    info!("Deleted drink {id}");
    Ok(Json(json!({ "success": true, "delete": id })))
}

async fn members(app: &CoffeeApp, role: Role) -> ApiResult {
    let data = app.directory.role_members(app.roles.id(role)).await?;
    Ok(Json(json!({ "success": true, "data": data })))
}

pub async fn list_baristas(State(app): State<CoffeeApp>, _auth: Authorized<GetBaristas>) -> ApiResult {
    members(&app, Role::Barista).await
}

pub async fn add_barista(
    State(app): State<CoffeeApp>,
    Path(user_id): Path<String>,
    _auth: Authorized<PostBaristas>,
) -> ApiResult {
    app.directory
        .assign_role(&user_id, app.roles.id(Role::Barista))
        .await?;
    info!(user = %user_id, "Granted barista role");
    Ok(Json(json!({ "success": true, "barista_id": user_id })))
}

pub async fn remove_barista(
    State(app): State<CoffeeApp>,
    Path(user_id): Path<String>,
    _auth: Authorized<PostBaristas>,
) -> ApiResult {
    app.directory
        .revoke_role(&user_id, app.roles.id(Role::Barista))
        .await?;
    info!(user = %user_id, "Revoked barista role");
    Ok(Json(json!({ "success": true, "barista_id": user_id })))
}

pub async fn list_managers(State(app): State<CoffeeApp>, _auth: Authorized<GetManagers>) -> ApiResult {
    members(&app, Role::Manager).await
}

pub async fn add_manager(
    State(app): State<CoffeeApp>,
    Path(user_id): Path<String>,
    _auth: Authorized<PostManagers>,
) -> ApiResult {
    app.directory
        .assign_role(&user_id, app.roles.id(Role::Manager))
        .await?;
    info!(user = %user_id, "Granted manager role");
    Ok(Json(json!({ "success": true, "manager_id": user_id })))
}

pub async fn remove_manager(
    State(app): State<CoffeeApp>,
    Path(user_id): Path<String>,
    _auth: Authorized<PostManagers>,
) -> ApiResult {
    app.directory
        .revoke_role(&user_id, app.roles.id(Role::Manager))
        .await?;
    info!(user = %user_id, "Revoked manager role");
    Ok(Json(json!({ "success": true, "manager_id": user_id })))
}
