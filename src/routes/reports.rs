use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::reports::{LowStockAlerts, SalesReport},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::ReportQuery,
    services::report_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sales_report))
        .route("/low-stock", get(low_stock_alerts))
}

#[utoipa::path(
    get,
    path = "/api/reports",
    params(
        ("filter" = Option<String>, Query, description = "most_sold, least_sold, or category"),
        ("category" = Option<String>, Query, description = "Required when filter=category")
    ),
    responses(
        (status = 200, description = "Sales totals per product (manager only)", body = ApiResponse<SalesReport>),
        (status = 400, description = "Missing category parameter"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn sales_report(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<ApiResponse<SalesReport>>> {
    let resp = report_service::sales_report(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/low-stock",
    responses(
        (status = 200, description = "Products at or below their low-stock threshold (manager only)", body = ApiResponse<LowStockAlerts>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn low_stock_alerts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<LowStockAlerts>>> {
    let resp = report_service::low_stock_alerts(&state, &user).await?;
    Ok(Json(resp))
}
