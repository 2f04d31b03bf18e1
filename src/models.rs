use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    /// Price in minor units (cents).
    pub price: i64,
    pub stock: i32,
    pub image_url: Option<String>,
    pub low_stock_threshold: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Sum of the item subtotals, in minor units.
    pub total_price: i64,
    pub purchase_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Subtotal at purchase time: quantity x unit price, in minor units.
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub sold_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromoCode {
    pub id: Uuid,
    pub code: String,
    pub discount_percent: i32,
    pub active: bool,
    pub expiry_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with_stock(stock: i32, threshold: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Oat Milk".into(),
            category: "Dairy".into(),
            price: 250,
            stock,
            image_url: None,
            low_stock_threshold: threshold,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn low_stock_boundary_is_inclusive() {
        assert!(product_with_stock(10, 10).is_low_stock());
        assert!(product_with_stock(0, 10).is_low_stock());
        assert!(!product_with_stock(11, 10).is_low_stock());
    }
}
