use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};

use crate::controllers::{CreateVehicleController, ListVehiclesController};
use crate::dto::vehicle_dto::{CreateVehicleRequest, VehicleListResponse};
use crate::models::Vehicle;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new().route("/vehicles", get(list_vehicles).post(create_vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> Result<Json<Vehicle>, AppError> {
    let Json(request) = payload.map_err(|rejection| bad_request_error(&rejection.body_text()))?;
    let controller = CreateVehicleController::new(state.store.clone());
    let vehicle = controller.handle(request).await?;
    Ok(Json(vehicle))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<VehicleListResponse>, AppError> {
    let controller = ListVehiclesController::new(state.store.clone());
    let response = controller.handle().await?;
    Ok(Json(response))
}
