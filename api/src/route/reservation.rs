use axum::{routing::post, Router};
use registry::AppRegistry;

use crate::handler::reservation::{book_parking_spot, release_parking_spot};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/book_parking_spot/:lot_id", post(book_parking_spot))
        .route(
            "/release_parking_spot/:reservation_id",
            post(release_parking_spot),
        )
}
