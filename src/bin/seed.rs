use chrono::{Duration, Utc};
use grocery_store_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(&config.database_url).await?;

    // Stand-in manager id; real ids come from the identity provider's tokens.
    let manager_id = Uuid::new_v4();
    seed_products(&pool, manager_id).await?;
    seed_promo_codes(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool, manager_id: Uuid) -> anyhow::Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        println!("Products already seeded");
        return Ok(());
    }

    let products = vec![
        ("Whole Milk 1L", "Dairy", 150, 120, 20),
        ("Cheddar Block 500g", "Dairy", 550, 40, 10),
        ("Sourdough Loaf", "Bakery", 420, 25, 5),
        ("Bananas 1kg", "Produce", 180, 200, 30),
        ("Olive Oil 750ml", "Pantry", 899, 60, 10),
        ("Ground Coffee 250g", "Pantry", 650, 80, 15),
    ];

    for (name, category, price, stock, threshold) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, category, price, stock, low_stock_threshold, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(category)
        .bind(price as i64)
        .bind(stock as i32)
        .bind(threshold as i32)
        .bind(manager_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_promo_codes(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let next_month = Utc::now() + Duration::days(30);
    let codes = vec![("WELCOME10", 10), ("SUMMER20", 20)];

    for (code, discount) in codes {
        sqlx::query(
            r#"
            INSERT INTO promo_codes (id, code, discount_percent, active, expiry_date)
            VALUES ($1, $2, $3, TRUE, $4)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(code)
        .bind(discount as i32)
        .bind(next_month)
        .execute(pool)
        .await?;
    }

    println!("Seeded promo codes");
    Ok(())
}
