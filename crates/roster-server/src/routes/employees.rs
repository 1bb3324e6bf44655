use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use roster_core::employee::Employee;
use roster_core::service::EmployeeService;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/employees: every stored record.
pub async fn list_employees(
    State(app): State<AppState>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let store = app.store.clone();
    let result = tokio::task::spawn_blocking(move || store.list_employees())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(result))
}

/// GET /api/employees/:id
pub async fn get_employee(
    State(app): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Employee>, AppError> {
    let store = app.store.clone();
    let result = tokio::task::spawn_blocking(move || store.get_employee(id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(result))
}

/// POST /api/employees: store a new record. Any `id` in the body is
/// ignored; the store assigns one.
pub async fn add_employee(
    State(app): State<AppState>,
    Json(mut body): Json<Employee>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    body.id = None;
    let store = app.store.clone();
    let result = tokio::task::spawn_blocking(move || store.add_employee(&body))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok((StatusCode::CREATED, Json(result)))
}

/// PUT /api/employees/:id: replace a record. The path id wins over the body.
pub async fn update_employee(
    State(app): State<AppState>,
    Path(id): Path<u64>,
    Json(mut body): Json<Employee>,
) -> Result<Json<Employee>, AppError> {
    body.id = Some(id);
    let store = app.store.clone();
    let result = tokio::task::spawn_blocking(move || {
        store.update_employee(&body)?;
        Ok::<_, roster_core::RosterError>(body)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(result))
}

/// DELETE /api/employees/:id
pub async fn delete_employee(
    State(app): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let store = app.store.clone();
    tokio::task::spawn_blocking(move || store.delete_employee(id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(StatusCode::NO_CONTENT)
}
