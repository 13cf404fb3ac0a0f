use axum::{
    routing::{delete, get},
    Router,
};
use registry::AppRegistry;

use crate::handler::lot::{
    admin_dashboard, delete_lot, delete_spot, register_lot, show_lot, show_lot_list, update_lot,
};

pub fn build_lot_routers() -> Router<AppRegistry> {
    let lots_routers = Router::new()
        .route("/", get(show_lot_list).post(register_lot))
        .route("/:lot_id", get(show_lot).put(update_lot).delete(delete_lot));

    Router::new()
        .route("/admin_dashboard", get(admin_dashboard))
        .route("/admin_parking_spots/:spot_id", delete(delete_spot))
        .nest("/admin_parking_lots", lots_routers)
}
