use crate::errors::AppError;
use crate::list::RowTarget;
use crate::models::{
    ActivityId, DeleteResponse, FormFields, GeolocationRequest, GeolocationResponse, Location,
    MapClickResponse, TypeChangeRequest,
};
use crate::persistence::ActivityRecord;
use crate::state::AppState;
use crate::storage::persist_blobs;
use crate::tracker::MapSnapshot;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    Html(render_index(&tracker))
}

pub async fn list_activities(State(state): State<AppState>) -> Json<Vec<ActivityRecord>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.store().list().map(ActivityRecord::from).collect())
}

pub async fn get_map(State(state): State<AppState>) -> Json<MapSnapshot> {
    let tracker = state.tracker.lock().await;
    Json(tracker.map_snapshot())
}

pub async fn map_click(
    State(state): State<AppState>,
    Json(location): Json<Location>,
) -> Result<Json<MapClickResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.map_clicked(location)?;
    Ok(Json(MapClickResponse { staged: location }))
}

pub async fn change_type(
    State(state): State<AppState>,
    Json(payload): Json<TypeChangeRequest>,
) -> StatusCode {
    let mut tracker = state.tracker.lock().await;
    tracker.type_changed(payload.kind);
    StatusCode::NO_CONTENT
}

pub async fn submit(
    State(state): State<AppState>,
    Json(fields): Json<FormFields>,
) -> Result<(StatusCode, Json<ActivityRecord>), AppError> {
    let mut tracker = state.tracker.lock().await;
    let activity = tracker.submit(fields)?;
    persist_blobs(&state.data_path, tracker.blobs()).await?;
    Ok((StatusCode::CREATED, Json(ActivityRecord::from(&activity))))
}

pub async fn cancel(State(state): State<AppState>) -> StatusCode {
    let mut tracker = state.tracker.lock().await;
    tracker.cancel();
    StatusCode::NO_CONTENT
}

pub async fn locate_row(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut tracker = state.tracker.lock().await;
    if tracker.row_clicked(&ActivityId::from(id), RowTarget::Body)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("no such activity"))
    }
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let removed = tracker.row_clicked(&ActivityId::from(id), RowTarget::Delete)?;
    persist_blobs(&state.data_path, tracker.blobs()).await?;
    Ok(Json(DeleteResponse { removed }))
}

pub async fn clear_activities(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.clear_all()?;
    persist_blobs(&state.data_path, tracker.blobs()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn geolocation(
    State(state): State<AppState>,
    Json(payload): Json<GeolocationRequest>,
) -> Result<Json<GeolocationResponse>, AppError> {
    let result = match payload {
        GeolocationRequest::Position { lat, lng } => {
            if !(lat.is_finite() && lng.is_finite()) {
                return Err(AppError::bad_request("position must have finite coordinates"));
            }
            Ok(Location::new(lat, lng))
        }
        GeolocationRequest::Failure { error } => Err(error),
    };
    let mut tracker = state.tracker.lock().await;
    Ok(Json(GeolocationResponse {
        initialized: tracker.geolocated(result),
    }))
}
