use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::{
    summary::admin_summary,
    user::{admin_users, user_dashboard, user_history, user_summary},
};

pub fn build_user_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/user_dashboard", get(user_dashboard))
        .route("/user_history", get(user_history))
        .route("/user_summary", get(user_summary))
        .route("/admin_users", get(admin_users))
        .route("/admin_summary", get(admin_summary))
}
