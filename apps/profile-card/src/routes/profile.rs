use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::profile::query::MeVariables;
use crate::profile::sections::Section;
use crate::profile::{build_card, ProfileCard};
use crate::render::{render_page, LoadState};
use crate::state::AppState;

/// One page load: fetch, normalize, project. The query is all-or-nothing.
async fn load_card(state: &AppState) -> Result<ProfileCard, AppError> {
    let variables = MeVariables::for_today(chrono::Local::now().date_naive());
    let raw = state.source.fetch_me(variables).await?;
    let card = build_card(&raw, &state.normalize_options, &state.query_settings);
    info!(
        "Built profile card with {} visible sections (chart: {})",
        card.sections.len(),
        card.shows(Section::HoursChart)
    );
    Ok(card)
}

/// GET /
pub async fn handle_card_page(State(state): State<AppState>) -> Response {
    match load_card(&state).await {
        Ok(card) => Html(render_page(&LoadState::Ready(Box::new(card)))).into_response(),
        Err(e) => {
            e.log();
            let page = render_page(&LoadState::Failed(e.user_message()));
            (e.status(), Html(page)).into_response()
        }
    }
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<ProfileCard>, AppError> {
    Ok(Json(load_card(&state).await?))
}
