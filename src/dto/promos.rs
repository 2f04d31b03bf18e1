use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::PromoCode;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePromoRequest {
    pub code: String,
    pub discount_percent: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    pub expiry_date: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyPromoRequest {
    pub code: String,
}

/// A valid promo resolves to its discount only; nothing is mutated.
#[derive(Debug, Serialize, ToSchema)]
pub struct AppliedPromo {
    pub discount_percent: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PromoList {
    #[schema(value_type = Vec<PromoCode>)]
    pub items: Vec<PromoCode>,
}
