use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::auth::{admin_login, index, logout, user_login, user_register};

pub fn build_auth_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/", get(index))
        .route("/user_register", post(user_register))
        .route("/user_login", post(user_login))
        .route("/admin_login", post(admin_login))
        .route("/logout", post(logout))
}
