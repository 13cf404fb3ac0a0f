use axum::Router;
use registry::AppRegistry;

pub mod auth;
pub mod health;
pub mod lot;
pub mod reservation;
pub mod user;

pub fn routes() -> Router<AppRegistry> {
    Router::new()
        .merge(health::build_health_check_routers())
        .merge(auth::build_auth_routers())
        .merge(user::build_user_routers())
        .merge(lot::build_lot_routers())
        .merge(reservation::build_reservation_routers())
}
