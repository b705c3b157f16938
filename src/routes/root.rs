use axum::Json;
use serde_json::{json, Value};

/// Static map of the public endpoints.
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the SportSpotter API!",
        "endpoints": {
            "user_signup": "/api/signup",
            "user_login": "/api/login",
            "events_get_all": "/api/events",
            "event_create": "/api/events",
            "event_get": "/api/events/{event_id}",
            "event_update": "/api/events/{event_id}",
            "event_delete": "/api/events/{event_id}",
            "sports_locations_get": "/api/sports_geojson"
        }
    }))
}
