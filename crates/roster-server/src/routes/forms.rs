use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use roster_core::session::{FormSession, SessionSnapshot, SubmitOutcome};
use roster_core::store::EmployeeStore;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::PoisonError;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session_body(sid: Uuid, snapshot: SessionSnapshot) -> Value {
    json!({ "session": sid, "form": snapshot })
}

fn session_not_found(sid: Uuid) -> AppError {
    AppError::not_found(format!("form session not found: {sid}"))
}

/// Open a create or edit session and register it.
pub(crate) async fn open_session(
    app: &AppState,
    id: Option<u64>,
) -> Result<(Uuid, Value), AppError> {
    let store = app.store.clone();
    let config = app.config.clone();
    let sessions = app.sessions.clone();
    tokio::task::spawn_blocking(move || {
        let session = FormSession::open(store.as_ref(), id, &config.form)?;
        let sid = Uuid::new_v4();
        let snapshot = session.snapshot();
        sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(sid, session);
        tracing::debug!(%sid, ?id, "form session opened");
        Ok::<_, AppError>((sid, session_body(sid, snapshot)))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
}

/// Drop a session; `false` when it was already gone.
pub(crate) fn discard_session(app: &AppState, sid: Uuid) -> bool {
    let removed = app
        .sessions
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&sid)
        .is_some();
    if removed {
        tracing::debug!(%sid, "form session closed");
    }
    removed
}

/// Run `f` against one live session on the blocking pool and return the
/// session's snapshot afterwards.
async fn with_session<F>(app: &AppState, sid: Uuid, f: F) -> Result<Value, AppError>
where
    F: FnOnce(&mut FormSession, &EmployeeStore) -> Result<(), AppError> + Send + 'static,
{
    let store = app.store.clone();
    let sessions = app.sessions.clone();
    tokio::task::spawn_blocking(move || {
        let mut sessions = sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(&sid).ok_or_else(|| session_not_found(sid))?;
        f(session, &store)?;
        Ok::<_, AppError>(session_body(sid, session.snapshot()))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct OpenFormBody {
    #[serde(default)]
    pub id: Option<u64>,
}

/// POST /api/forms: open a session, editing `id` when given.
pub async fn open_form(
    State(app): State<AppState>,
    Json(body): Json<OpenFormBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let (_, result) = open_session(&app, body.id).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// DELETE /api/forms/:sid: the client left the form without saving.
pub async fn close_form(
    State(app): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if discard_session(&app, sid) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(sid))
    }
}

/// GET /api/forms/:sid
pub async fn get_form(
    State(app): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(with_session(&app, sid, |_, _| Ok(())).await?))
}

#[derive(Debug, Deserialize)]
pub struct SetValueBody {
    pub path: String,
    pub value: Value,
}

/// PATCH /api/forms/:sid/values: one field edit.
pub async fn set_value(
    State(app): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(body): Json<SetValueBody>,
) -> Result<Json<Value>, AppError> {
    let result = with_session(&app, sid, move |session, _| {
        session.set_value(&body.path, body.value)?;
        Ok(())
    })
    .await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct TouchBody {
    pub path: String,
}

/// POST /api/forms/:sid/touch: a control lost focus.
pub async fn touch(
    State(app): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(body): Json<TouchBody>,
) -> Result<Json<Value>, AppError> {
    let result = with_session(&app, sid, move |session, _| {
        session.touch(&body.path)?;
        Ok(())
    })
    .await?;
    Ok(Json(result))
}

/// POST /api/forms/:sid/skills: append a blank skill row.
pub async fn add_skill(
    State(app): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let result = with_session(&app, sid, |session, _| {
        session.add_skill_row()?;
        Ok(())
    })
    .await?;
    Ok(Json(result))
}

/// DELETE /api/forms/:sid/skills/:index
pub async fn remove_skill(
    State(app): State<AppState>,
    Path((sid, index)): Path<(Uuid, usize)>,
) -> Result<Json<Value>, AppError> {
    let result = with_session(&app, sid, move |session, _| {
        session.remove_skill_row(index)?;
        Ok(())
    })
    .await?;
    Ok(Json(result))
}

/// POST /api/forms/:sid/submit: save the record. Refused with 422 while the
/// form has validation errors, after touching every control so the next
/// snapshot shows them all. A saved session is closed; a failed save keeps
/// it open for another attempt.
pub async fn submit(
    State(app): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let store = app.store.clone();
    let sessions = app.sessions.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut sessions = sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(&sid).ok_or_else(|| session_not_found(sid))?;
        if !session.is_valid() {
            session.touch_all()?;
            return Err(AppError::unprocessable("form has validation errors"));
        }
        let outcome = session.submit(store.as_ref())?;
        let body = match &outcome {
            SubmitOutcome::Navigate { route } => {
                sessions.remove(&sid);
                tracing::debug!(%sid, "form session closed");
                json!({ "outcome": outcome, "location": route.to_string() })
            }
            SubmitOutcome::Failed => json!({ "outcome": outcome }),
        };
        Ok::<_, AppError>(body)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(result))
}
