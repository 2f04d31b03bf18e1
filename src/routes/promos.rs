use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::promos::{AppliedPromo, ApplyPromoRequest, CreatePromoRequest, PromoList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::PromoCode,
    response::ApiResponse,
    services::promo_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_promos).post(create_promo))
        .route("/apply", post(apply_promo))
}

#[utoipa::path(
    post,
    path = "/api/promocodes",
    request_body = CreatePromoRequest,
    responses(
        (status = 200, description = "Create promo code (manager only)", body = ApiResponse<PromoCode>),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Code already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promo"
)]
pub async fn create_promo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePromoRequest>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = promo_service::create_promo(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/promocodes",
    responses(
        (status = 200, description = "List currently valid promo codes", body = ApiResponse<PromoList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Promo"
)]
pub async fn list_promos(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<PromoList>>> {
    let resp = promo_service::list_active_promos(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/promocodes/apply",
    request_body = ApplyPromoRequest,
    responses(
        (status = 200, description = "Resolve a promo code to its discount", body = ApiResponse<AppliedPromo>),
        (status = 400, description = "Promo code expired or inactive"),
        (status = 404, description = "Promo code not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promo"
)]
pub async fn apply_promo(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<ApplyPromoRequest>,
) -> AppResult<Json<ApiResponse<AppliedPromo>>> {
    let resp = promo_service::apply_promo(&state, payload).await?;
    Ok(Json(resp))
}
