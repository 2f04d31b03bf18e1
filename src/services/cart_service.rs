use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::cart::{AddToCartRequest, CartLine, CartSnapshot},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(FromRow)]
struct CartWithProductRow {
    cart_id: Uuid,
    quantity: i32,
    product_id: Uuid,
    name: String,
    category: String,
    price: i64,
    stock: i32,
    image_url: Option<String>,
    low_stock_threshold: i32,
    created_by: Uuid,
    created_at: DateTime<Utc>,
}

impl From<CartWithProductRow> for CartLine {
    fn from(row: CartWithProductRow) -> Self {
        CartLine {
            id: row.cart_id,
            product: Product {
                id: row.product_id,
                name: row.name,
                category: row.category,
                price: row.price,
                stock: row.stock,
                image_url: row.image_url,
                low_stock_threshold: row.low_stock_threshold,
                created_by: row.created_by,
                created_at: row.created_at,
            },
            quantity: row.quantity,
        }
    }
}

/// Full cart for one user, oldest line first (checkout consumes in this order).
async fn cart_snapshot(pool: &DbPool, user_id: Uuid) -> AppResult<CartSnapshot> {
    let rows = sqlx::query_as::<_, CartWithProductRow>(
        r#"
        SELECT ci.id AS cart_id, ci.quantity,
               p.id AS product_id, p.name, p.category, p.price, p.stock,
               p.image_url, p.low_stock_threshold, p.created_by, p.created_at
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.user_id = $1
        ORDER BY ci.created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(CartSnapshot {
        items: rows.into_iter().map(CartLine::from).collect(),
    })
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartSnapshot>> {
    let snapshot = cart_snapshot(&state.pool, user.user_id).await?;
    let total = snapshot.items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        snapshot,
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartSnapshot>> {
    if payload.quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("product"))?;

    // Availability is checked for the requested amount here; checkout re-checks
    // the whole line against live stock at commit time.
    if product.stock < payload.quantity {
        return Err(AppError::InsufficientStock(format!(
            "{} not available in requested quantity",
            product.name
        )));
    }

    let existing = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::ProductId.eq(payload.product_id))
        .one(&state.orm)
        .await?;

    match existing {
        Some(line) => {
            let new_quantity = line.quantity + payload.quantity;
            let mut active: CartActive = line.into();
            active.quantity = Set(new_quantity);
            active.update(&state.orm).await?;
        }
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                product_id: Set(payload.product_id),
                quantity: Set(payload.quantity),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?;
        }
    }

    let snapshot = cart_snapshot(&state.pool, user.user_id).await?;
    Ok(ApiResponse::success("OK", snapshot, Some(Meta::empty())))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM cart_items WHERE product_id = $1 AND user_id = $2")
        .bind(product_id)
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("cart item"));
    }

    Ok(ApiResponse::confirmation("Removed from cart"))
}
