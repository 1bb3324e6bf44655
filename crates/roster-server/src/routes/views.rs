use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use roster_core::route::Route;
use roster_core::service::EmployeeService;
use serde_json::{json, Value};
use std::sync::PoisonError;

use crate::error::AppError;
use crate::routes::forms::{discard_session, open_session};
use crate::state::AppState;

/// GET on any view path. The URI is resolved through [`Route`] so the
/// router and the core agree on ids and unknown paths. Navigating anywhere
/// closes the form session the previous view opened.
pub async fn view(State(app): State<AppState>, uri: Uri) -> Result<Response, AppError> {
    let route = Route::parse(uri.path());
    leave_view_session(&app);
    match route {
        Route::Create | Route::Edit(_) => {
            let (sid, session) = open_session(&app, route.employee_id()).await?;
            *app
                .view_session
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(sid);
            Ok(Json(view_body(route, session)).into_response())
        }
        Route::Home => Ok(Json(view_body(route, json!({ "title": "Employee Roster" }))).into_response()),
        Route::List => {
            let store = app.store.clone();
            let employees = tokio::task::spawn_blocking(move || store.list_employees())
                .await
                .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
            Ok(Json(view_body(route, json!({ "employees": employees }))).into_response())
        }
        Route::Delete(id) => {
            if let Some(id) = id {
                let store = app.store.clone();
                let deleted = tokio::task::spawn_blocking(move || store.delete_employee(id))
                    .await
                    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;
                if let Err(e) = deleted {
                    tracing::error!(id, error = %e, "failed to delete employee");
                }
            }
            Ok(Redirect::to(&Route::List.to_string()).into_response())
        }
        Route::NotFound => Ok(not_found_response(uri.path())),
    }
}

fn leave_view_session(app: &AppState) {
    let previous = app
        .view_session
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    if let Some(sid) = previous {
        discard_session(app, sid);
    }
}

/// Anything no route matched.
pub async fn not_found(uri: Uri) -> Response {
    not_found_response(uri.path())
}

fn not_found_response(path: &str) -> Response {
    let body = view_body(Route::NotFound, json!({ "path": path }));
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// The route's own tagged form with `extra`'s keys merged in.
fn view_body(route: Route, extra: Value) -> Value {
    let mut body = serde_json::to_value(route).unwrap_or_else(|_| json!({}));
    if let (Value::Object(target), Value::Object(fields)) = (&mut body, extra) {
        target.extend(fields);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_body_merges_route_tag() {
        let body = view_body(Route::Edit(Some(3)), json!({ "session": "abc" }));
        assert_eq!(body["view"], "edit");
        assert_eq!(body["id"], 3);
        assert_eq!(body["session"], "abc");
    }

    #[test]
    fn unit_routes_carry_only_the_tag() {
        let body = view_body(Route::Home, json!({}));
        assert_eq!(body, json!({ "view": "home" }));
    }
}
