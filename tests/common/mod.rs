// Not every test binary uses every helper.
#![allow(dead_code)]

use grocery_store_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    entity::products::{ActiveModel as ProductActive, Model as ProductModel},
    middleware::auth::{AuthUser, Role},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

/// Connect to the test database, or None when no URL is configured so callers
/// can skip gracefully.
pub async fn try_setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
                );
                return Ok(None);
            }
        };

    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;
    let pool = create_pool(&database_url).await?;

    Ok(Some(AppState { pool, orm }))
}

pub fn customer() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: Role::Customer,
    }
}

pub fn manager() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: Role::Manager,
    }
}

// Tests share one database, so every fixture gets fresh UUIDs and assertions
// stay scoped to them.
pub async fn create_product(
    state: &AppState,
    name: &str,
    category: &str,
    price: i64,
    stock: i32,
) -> anyhow::Result<ProductModel> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        category: Set(category.to_string()),
        price: Set(price),
        stock: Set(stock),
        image_url: Set(None),
        low_stock_threshold: Set(10),
        created_by: Set(Uuid::new_v4()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(product)
}
