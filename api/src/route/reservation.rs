use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    cancel_reservation, register_reservation, show_reservation, show_upcoming_reservations,
    update_reservation,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservation_routers = Router::new()
        .route("/", post(register_reservation))
        .route("/", get(show_upcoming_reservations))
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id", put(update_reservation))
        .route("/:reservation_id", delete(cancel_reservation));

    Router::new().nest("/reservations", reservation_routers)
}
