use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::CurrentUser,
    error::{ApiResult, AppError},
    extract::{JsonBody, PathParam, QueryParams},
    events::{
        dto::{CreateEventRequest, EventResponse, EventUpdate, MessageResponse, Pagination},
        repo_types::SportsEvent,
    },
    state::AppState,
};

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Event not found".into())
}

async fn load(state: &AppState, id: i64) -> ApiResult<SportsEvent> {
    SportsEvent::find(&state.db, id).await?.ok_or_else(not_found)
}

#[instrument(skip(state, user, body), fields(user_id = user.id))]
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(body): JsonBody<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let event = SportsEvent::insert(&state.db, &body, user.id).await?;
    info!(event_id = event.id, "event created");
    Ok((StatusCode::CREATED, Json(event.into())))
}

#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<EventResponse>> {
    Ok(Json(load(&state, id).await?.into()))
}

#[instrument(skip(state, user, body), fields(user_id = user.id))]
pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(id): PathParam<i64>,
    JsonBody(body): JsonBody<EventUpdate>,
) -> ApiResult<Json<EventResponse>> {
    let mut event = load(&state, id).await?;
    if !event.is_created_by(user.id) {
        warn!(event_id = id, owner = event.created_by, "update by non-creator");
        return Err(AppError::Forbidden(
            "You are not authorized to update this event".into(),
        ));
    }

    body.apply(&mut event);
    let event = event.save(&state.db).await?.ok_or_else(not_found)?;
    info!(event_id = event.id, "event updated");
    Ok(Json(event.into()))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let event = load(&state, id).await?;
    if !event.is_created_by(user.id) {
        warn!(event_id = id, owner = event.created_by, "delete by non-creator");
        return Err(AppError::Forbidden(
            "You are not authorized to delete this event".into(),
        ));
    }

    if !SportsEvent::delete(&state.db, id).await? {
        return Err(not_found());
    }
    info!(event_id = id, "event deleted");
    Ok(Json(MessageResponse {
        message: "Event deleted successfully",
    }))
}

#[instrument(skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
    QueryParams(p): QueryParams<Pagination>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    if p.skip < 0 || p.limit < 0 {
        return Err(AppError::BadRequest(
            "skip and limit must not be negative".into(),
        ));
    }
    let events = SportsEvent::list(&state.db, p.skip, p.limit).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}
