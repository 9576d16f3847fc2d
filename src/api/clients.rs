use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Map, Value};

use crate::api::error::ApiError;
use crate::api::extract::{AppJson, AppPath};
use crate::api::AppState;
use crate::models::{AnamnesisRecord, ClientFields, ClientView};

/// `POST /`: create a client and its anamnesis from one flat body.
///
/// Echoes the body as received, with the generated `id`.
pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<Map<String, Value>>,
) -> Result<(StatusCode, Json<Map<String, Value>>), ApiError> {
    let client = ClientFields::from_payload(&body);
    let anamnesis = AnamnesisRecord::from_payload(&body);

    let id = state
        .db
        .create_client(&client, &anamnesis)
        .await
        .map_err(|e| ApiError::from_db(e, "Failed to create client"))?;

    tracing::info!(client_id = id, "client created");

    let mut echo = body;
    echo.insert("id".to_string(), Value::from(id));

    Ok((StatusCode::CREATED, Json(echo)))
}

/// `GET /`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ClientView>>, ApiError> {
    let clients = state
        .db
        .list_clients()
        .await
        .map_err(|e| ApiError::from_db(e, "Failed to list clients"))?;

    Ok(Json(clients))
}

/// `GET /{id}`
pub async fn detail(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ClientView>, ApiError> {
    let client = state
        .db
        .get_client(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Failed to load client"))?;

    Ok(Json(client))
}

/// `PUT /{id}`: overwrite the client columns and the whole anamnesis row.
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let client = ClientFields::from_payload(&body);
    let anamnesis = AnamnesisRecord::from_payload(&body);

    state
        .db
        .update_client(id, &client, &anamnesis)
        .await
        .map_err(|e| ApiError::from_db(e, "Failed to update client"))?;

    tracing::info!(client_id = id, "client updated");

    Ok(Json(json!({ "message": "Client updated successfully" })))
}

/// `DELETE /{id}`
pub async fn remove(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, ApiError> {
    state
        .db
        .delete_client(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Failed to delete client"))?;

    tracing::info!(client_id = id, "client deleted");

    Ok(Json(json!({ "message": "Client, anamnesis and photos deleted" })))
}
