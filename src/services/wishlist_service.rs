use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::wishlist::{AddWishlistRequest, WishlistProductList},
    entity::{
        products::Entity as Products,
        wishlist_items::{ActiveModel as WishlistActive, Column as WishCol, Entity as WishlistItems},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

async fn wishlist_products(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT p.*
        FROM wishlist_items w
        JOIN products p ON p.id = w.product_id
        WHERE w.user_id = $1
        ORDER BY w.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn list_wishlist(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<WishlistProductList>> {
    let items = wishlist_products(&state.pool, user.user_id).await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        WishlistProductList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn add_to_wishlist(
    state: &AppState,
    user: &AuthUser,
    payload: AddWishlistRequest,
) -> AppResult<ApiResponse<WishlistProductList>> {
    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    if product.is_none() {
        return Err(AppError::NotFound("product"));
    }

    let existing = WishlistItems::find()
        .filter(WishCol::UserId.eq(user.user_id))
        .filter(WishCol::ProductId.eq(payload.product_id))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("product already in wishlist".to_string()));
    }

    WishlistActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        product_id: Set(payload.product_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let items = wishlist_products(&state.pool, user.user_id).await?;
    Ok(ApiResponse::success(
        "Added to wishlist",
        WishlistProductList { items },
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_wishlist(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2")
        .bind(user.user_id)
        .bind(product_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("wishlist item"));
    }

    Ok(ApiResponse::confirmation("Removed from wishlist"))
}
