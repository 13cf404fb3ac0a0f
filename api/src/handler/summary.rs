use axum::{extract::State, Json};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{extractor::AuthorizedAdmin, model::summary::AdminSummaryResponse};

pub async fn admin_summary(
    _admin: AuthorizedAdmin,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AdminSummaryResponse>> {
    registry
        .summary_repository()
        .admin_summary()
        .await
        .map(AdminSummaryResponse::from)
        .map(Json)
}
