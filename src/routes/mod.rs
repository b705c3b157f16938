use axum::{routing::get, Router};

use crate::state::AppState;

pub mod geojson;
pub mod root;

pub fn geo_routes() -> Router<AppState> {
    Router::new().route("/sports_geojson", get(geojson::sports_geojson))
}
