use axum::{
    Router,
    extract::{Json, Path, State},
    routing::{get, post},
};
use log::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::AppError;
use crate::weather::{CreateWeatherRequest, CreatedWeather, WeatherRecord};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_weather_route))
        .route("/{weather_id}", get(get_weather_route))
        .with_state(state)
}

/// Looks up the current weather for the requested location and stores it
/// together with the request under a fresh id.
pub async fn create_weather(
    state: &AppState,
    request: CreateWeatherRequest,
) -> Result<String, AppError> {
    let weather = state.provider.current(&request.location).await?;

    let id = Uuid::new_v4().to_string();
    state
        .store
        .insert(id.clone(), WeatherRecord::new(request, weather))
        .await?;
    info!("Stored weather record {id}");
    Ok(id)
}

pub async fn get_weather(state: &AppState, id: String) -> Result<WeatherRecord, AppError> {
    state
        .store
        .get(&id)
        .await?
        .ok_or(AppError::NotFound { id })
}

async fn create_weather_route(
    State(state): State<AppState>,
    Json(request): Json<CreateWeatherRequest>,
) -> Result<Json<CreatedWeather>, AppError> {
    let id = create_weather(&state, request).await?;
    Ok(Json(CreatedWeather { id }))
}

async fn get_weather_route(
    State(state): State<AppState>,
    Path(weather_id): Path<String>,
) -> Result<Json<WeatherRecord>, AppError> {
    Ok(Json(get_weather(&state, weather_id).await?))
}
