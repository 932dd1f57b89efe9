//! Page handlers - the calculator form

use std::collections::HashMap;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Form,
};

use crate::AppState;
use crate::binder::{apply_raw_edit, render_inputs, ResultPanel, StickyValues};
use crate::handlers::predict_off_runtime;
use crate::middleware::session::SessionContext;
use crate::model::ModelState;
use crate::render::{render_page, PageBody};

/// Render the form for the caller's session
pub async fn index(
    State(state): State<AppState>,
    session: SessionContext,
) -> Response {
    let loaded = match state.model.ready().await {
        ModelState::Available(loaded) => loaded.clone(),
        ModelState::Unavailable { reason } => return unavailable(reason),
    };

    let (sticky, last_result) = match state.sessions.snapshot(session.id) {
        Some(s) => (s.sticky, s.last_result),
        None => (StickyValues::new(), None),
    };

    let form = render_inputs(&loaded.order, &state.schema, &sticky);
    let panel = ResultPanel::resting(last_result);

    Html(render_page(PageBody::Ready { form: &form, panel: &panel })).into_response()
}

/// Store submitted values, run the classifier, render the result
pub async fn calculate(
    State(state): State<AppState>,
    session: SessionContext,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let loaded = match state.model.ready().await {
        ModelState::Available(loaded) => loaded.clone(),
        ModelState::Unavailable { reason } => return unavailable(reason),
    };

    let (sticky, previous) = state.sessions.with_session(session.id, |s| {
        for feature in loaded.order.iter() {
            let Some(raw) = fields.get(feature) else { continue };
            if let Err(e) = apply_raw_edit(&loaded.order, &state.schema, &mut s.sticky, feature, raw) {
                tracing::warn!("Ignoring submitted value: {}", e);
            }
        }
        (s.sticky.clone(), s.last_result)
    });

    let form = render_inputs(&loaded.order, &state.schema, &sticky);
    let outcome = predict_off_runtime(loaded.clone(), form.record.clone()).await;
    let panel = ResultPanel::after(&outcome, previous);

    match outcome {
        Ok(result) => {
            tracing::info!("Calculated risk {} for session {}", result.message(), session.id);
            state.sessions.with_session(session.id, |s| s.last_result = Some(result));
        }
        Err(e) => tracing::error!("Prediction failed for session {}: {}", session.id, e),
    }

    Html(render_page(PageBody::Ready { form: &form, panel: &panel })).into_response()
}

/// Degraded page: banner only, still a valid page
fn unavailable(reason: &str) -> Response {
    Html(render_page(PageBody::Unavailable { reason })).into_response()
}
