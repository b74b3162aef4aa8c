use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::info;

use service::restaurant::domain::{MenuCount, Restaurant, RestaurantInput};

use crate::errors::JsonApiError;
use crate::metrics;
use crate::routes::ServerState;

/// Restaurant routes, mounted under `/restaurants`.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/restaurants", get(list))
        .route("/menucounts", get(menu_counts))
        .route("/restaurant", axum::routing::post(create))
        .route("/restaurant/:id", get(get_by_id).put(replace).patch(merge).delete(delete))
        .route("/restaurant/name/:name", get(get_by_name))
        .route("/restaurant/state/:state", get(by_state))
        .route("/restaurant/likename/:sub", get(like_name))
        .route("/restaurant/likedish/:sub", get(like_dish))
}

#[utoipa::path(
    get, path = "/restaurants/restaurants", tag = "restaurants",
    responses((status = 200, description = "All restaurants", body = [crate::openapi::RestaurantDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Restaurant>>, JsonApiError> {
    let all = state.restaurants.list().await?;
    info!(count = all.len(), "list restaurants");
    Ok(Json(all))
}

#[utoipa::path(
    get, path = "/restaurants/restaurant/{id}", tag = "restaurants",
    params(("id" = i64, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::RestaurantDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<Restaurant>, JsonApiError> {
    Ok(Json(state.restaurants.get_by_id(id).await?))
}

#[utoipa::path(
    get, path = "/restaurants/restaurant/name/{name}", tag = "restaurants",
    params(("name" = String, Path, description = "Exact restaurant name")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::RestaurantDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_by_name(State(state): State<ServerState>, Path(name): Path<String>) -> Result<Json<Restaurant>, JsonApiError> {
    Ok(Json(state.restaurants.get_by_name(&name).await?))
}

#[utoipa::path(
    get, path = "/restaurants/restaurant/state/{state}", tag = "restaurants",
    params(("state" = String, Path, description = "State code, case-insensitive")),
    responses((status = 200, description = "Matching restaurants", body = [crate::openapi::RestaurantDoc]))
)]
pub async fn by_state(State(state): State<ServerState>, Path(code): Path<String>) -> Result<Json<Vec<Restaurant>>, JsonApiError> {
    Ok(Json(state.restaurants.search_by_state(&code).await?))
}

#[utoipa::path(
    get, path = "/restaurants/restaurant/likename/{sub}", tag = "restaurants",
    params(("sub" = String, Path, description = "Name substring, case-insensitive")),
    responses((status = 200, description = "Matching restaurants", body = [crate::openapi::RestaurantDoc]))
)]
pub async fn like_name(State(state): State<ServerState>, Path(sub): Path<String>) -> Result<Json<Vec<Restaurant>>, JsonApiError> {
    Ok(Json(state.restaurants.search_by_name(&sub).await?))
}

#[utoipa::path(
    get, path = "/restaurants/restaurant/likedish/{sub}", tag = "restaurants",
    params(("sub" = String, Path, description = "Dish substring, case-insensitive")),
    responses((status = 200, description = "Restaurants serving a matching dish", body = [crate::openapi::RestaurantDoc]))
)]
pub async fn like_dish(State(state): State<ServerState>, Path(sub): Path<String>) -> Result<Json<Vec<Restaurant>>, JsonApiError> {
    Ok(Json(state.restaurants.search_by_dish(&sub).await?))
}

#[utoipa::path(
    get, path = "/restaurants/menucounts", tag = "restaurants",
    responses((status = 200, description = "Menu count per restaurant", body = [crate::openapi::MenuCountDoc]))
)]
pub async fn menu_counts(State(state): State<ServerState>) -> Result<Json<Vec<MenuCount>>, JsonApiError> {
    Ok(Json(state.restaurants.menu_counts().await?))
}

#[utoipa::path(
    post, path = "/restaurants/restaurant", tag = "restaurants",
    request_body = crate::openapi::RestaurantInputDoc,
    responses(
        (status = 201, description = "Created; Location header points at the new record"),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Referenced payment not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(State(state): State<ServerState>, Json(input): Json<RestaurantInput>) -> Result<impl IntoResponse, JsonApiError> {
    let created = state.restaurants.create(input).await?;
    metrics::record_write("create");
    let location = format!("/restaurants/restaurant/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

#[utoipa::path(
    put, path = "/restaurants/restaurant/{id}", tag = "restaurants",
    params(("id" = i64, Path, description = "Restaurant ID")),
    request_body = crate::openapi::RestaurantInputDoc,
    responses(
        (status = 200, description = "Replaced", body = crate::openapi::RestaurantDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn replace(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<RestaurantInput>,
) -> Result<Json<Restaurant>, JsonApiError> {
    let updated = state.restaurants.replace(id, input).await?;
    metrics::record_write("replace");
    Ok(Json(updated))
}

#[utoipa::path(
    patch, path = "/restaurants/restaurant/{id}", tag = "restaurants",
    params(("id" = i64, Path, description = "Restaurant ID")),
    request_body = crate::openapi::RestaurantInputDoc,
    responses(
        (status = 200, description = "Merged", body = crate::openapi::RestaurantDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn merge(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<RestaurantInput>,
) -> Result<Json<Restaurant>, JsonApiError> {
    let updated = state.restaurants.merge(id, input).await?;
    metrics::record_write("merge");
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/restaurants/restaurant/{id}", tag = "restaurants",
    params(("id" = i64, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<StatusCode, JsonApiError> {
    state.restaurants.delete(id).await?;
    metrics::record_write("delete");
    Ok(StatusCode::OK)
}
