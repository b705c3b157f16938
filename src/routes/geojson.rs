use std::io::ErrorKind;

use anyhow::Context;
use axum::{extract::State, Json};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::{
    error::{ApiResult, AppError},
    state::AppState,
};

/// Serve the sports locations file as JSON, re-read on every request.
#[instrument(skip(state))]
pub async fn sports_geojson(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let path = &state.config.geojson_path;
    let raw = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(%path, "geojson file missing");
            return Err(AppError::NotFound("GeoJSON file not found".into()));
        }
        Err(e) => return Err(anyhow::Error::new(e).context("read geojson").into()),
    };
    let value: Value = serde_json::from_slice(&raw).context("parse geojson")?;
    Ok(Json(value))
}
