use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::ReservationId;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::reservation::{
    CreateReservationRequest, ReservationResponse, ReservationsResponse,
    UpcomingReservationsQuery, UpdateReservationRequest, UpdateReservationRequestWithId,
};

pub async fn register_reservation(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    registry
        .reservation_service()
        .create(req.into())
        .await
        .map(ReservationResponse::from)
        .map(|res| (StatusCode::CREATED, Json(res)))
}

pub async fn show_upcoming_reservations(
    Query(query): Query<UpcomingReservationsQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_service()
        .list_upcoming(&query.email)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_service()
        .get_by_id(reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn update_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    let update = UpdateReservationRequestWithId::new(reservation_id, req);
    registry
        .reservation_service()
        .update(update.into())
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn cancel_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .reservation_service()
        .cancel(reservation_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
