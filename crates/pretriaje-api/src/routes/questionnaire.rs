use axum::Json;
use axum::extract::State;

use pretriaje_core::models::questionnaire::Questionnaire;

use crate::state::AppState;

pub async fn get_questionnaire(State(state): State<AppState>) -> Json<Questionnaire> {
    Json(state.questionnaire.as_ref().clone())
}
