use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::promos::{AppliedPromo, ApplyPromoRequest, CreatePromoRequest, PromoList},
    entity::promo_codes::{
        ActiveModel as PromoActive, Column as PromoCol, Entity as PromoCodes, Model as PromoModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_manager},
    models::PromoCode,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Validity rule: active flag set and expiry strictly in the future.
fn promo_is_valid(active: bool, expiry_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    active && expiry_date > now
}

pub async fn create_promo(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePromoRequest,
) -> AppResult<ApiResponse<PromoCode>> {
    ensure_manager(user)?;

    if !(0..=100).contains(&payload.discount_percent) {
        return Err(AppError::BadRequest(
            "discount_percent must be between 0 and 100".to_string(),
        ));
    }

    let existing = PromoCodes::find()
        .filter(PromoCol::Code.eq(payload.code.clone()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("promo code already exists".to_string()));
    }

    let promo = PromoActive {
        id: Set(Uuid::new_v4()),
        code: Set(payload.code),
        discount_percent: Set(payload.discount_percent),
        active: Set(payload.active),
        expiry_date: Set(payload.expiry_date.into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Promo code created",
        promo_from_entity(promo),
        Some(Meta::empty()),
    ))
}

/// Codes that would currently pass the validity check.
pub async fn list_active_promos(state: &AppState) -> AppResult<ApiResponse<PromoList>> {
    let now = Utc::now();
    let promos = PromoCodes::find()
        .filter(PromoCol::Active.eq(true))
        .filter(PromoCol::ExpiryDate.gt(now))
        .order_by_asc(PromoCol::Code)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(promo_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        PromoList { items: promos },
        Some(Meta::empty()),
    ))
}

/// Resolve a code to its discount percentage. Nothing is mutated; feeding the
/// discount into an order total is left to the caller.
pub async fn apply_promo(
    state: &AppState,
    payload: ApplyPromoRequest,
) -> AppResult<ApiResponse<AppliedPromo>> {
    let promo = PromoCodes::find()
        .filter(PromoCol::Code.eq(payload.code))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("promo code"))?;

    if !promo_is_valid(promo.active, promo.expiry_date.with_timezone(&Utc), Utc::now()) {
        return Err(AppError::BadRequest(
            "Promo code expired or inactive".to_string(),
        ));
    }

    Ok(ApiResponse::success(
        "OK",
        AppliedPromo {
            discount_percent: promo.discount_percent,
        },
        Some(Meta::empty()),
    ))
}

fn promo_from_entity(model: PromoModel) -> PromoCode {
    PromoCode {
        id: model.id,
        code: model.code,
        discount_percent: model.discount_percent,
        active: model.active,
        expiry_date: model.expiry_date.with_timezone(&Utc),
    }
}
