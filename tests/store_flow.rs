mod common;

use chrono::{Duration, Utc};
use common::{create_product, customer, manager, try_setup_state};
use grocery_store_api::{
    dto::{
        cart::AddToCartRequest,
        products::CreateProductRequest,
        promos::{ApplyPromoRequest, CreatePromoRequest},
        wishlist::AddWishlistRequest,
    },
    error::AppError,
    routes::params::{ReportFilter, ReportQuery},
    services::{cart_service, order_service, product_service, promo_service, report_service, wishlist_service},
};
use uuid::Uuid;

#[tokio::test]
async fn sales_report_counts_sold_and_unsold_products() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };
    let buyer = customer();
    let boss = manager();

    // Unique category so assertions are unaffected by other tests sharing the DB.
    let category = format!("Specials-{}", Uuid::new_v4());
    let sold = create_product(&state, "Hot Item", &category, 400, 10).await?;
    let unsold = create_product(&state, "Shelf Warmer", &category, 900, 10).await?;

    cart_service::add_to_cart(
        &state,
        &buyer,
        AddToCartRequest {
            product_id: sold.id,
            quantity: 3,
        },
    )
    .await?;
    order_service::checkout(&state, &buyer).await?;

    // Category match is case-insensitive.
    let resp = report_service::sales_report(
        &state,
        &boss,
        ReportQuery {
            filter: Some(ReportFilter::Category),
            category: Some(category.to_uppercase()),
        },
    )
    .await?;
    let report = resp.data.expect("report data");
    assert_eq!(report.items.len(), 2);

    let sold_row = report
        .items
        .iter()
        .find(|r| r.id == sold.id)
        .expect("sold product row");
    assert_eq!(sold_row.total_quantity_sold, 3);

    let unsold_row = report
        .items
        .iter()
        .find(|r| r.id == unsold.id)
        .expect("unsold product row");
    assert_eq!(unsold_row.total_quantity_sold, 0);

    // Most-sold ordering puts the seller before the shelf warmer.
    assert_eq!(report.items[0].id, sold.id);

    Ok(())
}

#[tokio::test]
async fn sales_report_requires_manager_and_category_param() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };

    let err = report_service::sales_report(
        &state,
        &customer(),
        ReportQuery {
            filter: None,
            category: None,
        },
    )
    .await
    .expect_err("customers may not run reports");
    assert!(matches!(err, AppError::Forbidden));

    let err = report_service::sales_report(
        &state,
        &manager(),
        ReportQuery {
            filter: Some(ReportFilter::Category),
            category: None,
        },
    )
    .await
    .expect_err("category filter without category must fail");
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}

#[tokio::test]
async fn low_stock_alerts_use_per_product_thresholds() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };
    let boss = manager();

    let low_name = format!("Nearly Gone {}", Uuid::new_v4());
    let full_name = format!("Well Stocked {}", Uuid::new_v4());
    // create_product fixtures use a threshold of 10.
    create_product(&state, &low_name, "Pantry", 100, 2).await?;
    create_product(&state, &full_name, "Pantry", 100, 50).await?;

    let resp = report_service::low_stock_alerts(&state, &boss).await?;
    let alerts = resp.data.expect("alerts data").low_stock_alerts;

    assert!(alerts.iter().any(|a| a.product == low_name && a.quantity == 2));
    assert!(!alerts.iter().any(|a| a.product == full_name));

    let err = report_service::low_stock_alerts(&state, &customer())
        .await
        .expect_err("customers may not view alerts");
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn promo_codes_validate_and_apply() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };
    let boss = manager();

    let live_code = format!("SAVE15-{}", Uuid::new_v4());
    promo_service::create_promo(
        &state,
        &boss,
        CreatePromoRequest {
            code: live_code.clone(),
            discount_percent: 15,
            active: true,
            expiry_date: Utc::now() + Duration::days(7),
        },
    )
    .await?;

    let err = promo_service::create_promo(
        &state,
        &boss,
        CreatePromoRequest {
            code: live_code.clone(),
            discount_percent: 20,
            active: true,
            expiry_date: Utc::now() + Duration::days(7),
        },
    )
    .await
    .expect_err("duplicate code must fail");
    assert!(matches!(err, AppError::Conflict(_)));

    let err = promo_service::create_promo(
        &state,
        &customer(),
        CreatePromoRequest {
            code: format!("NOPE-{}", Uuid::new_v4()),
            discount_percent: 5,
            active: true,
            expiry_date: Utc::now() + Duration::days(7),
        },
    )
    .await
    .expect_err("customers may not create codes");
    assert!(matches!(err, AppError::Forbidden));

    let resp = promo_service::apply_promo(
        &state,
        ApplyPromoRequest {
            code: live_code.clone(),
        },
    )
    .await?;
    assert_eq!(resp.data.expect("promo data").discount_percent, 15);

    // Still active, but already expired: invalid.
    let expired_code = format!("LATE-{}", Uuid::new_v4());
    promo_service::create_promo(
        &state,
        &boss,
        CreatePromoRequest {
            code: expired_code.clone(),
            discount_percent: 30,
            active: true,
            expiry_date: Utc::now() - Duration::days(1),
        },
    )
    .await?;

    let err = promo_service::apply_promo(
        &state,
        ApplyPromoRequest {
            code: expired_code.clone(),
        },
    )
    .await
    .expect_err("expired code must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = promo_service::apply_promo(
        &state,
        ApplyPromoRequest {
            code: format!("MISSING-{}", Uuid::new_v4()),
        },
    )
    .await
    .expect_err("unknown code must be rejected");
    assert!(matches!(err, AppError::NotFound(_)));

    let listed = promo_service::list_active_promos(&state).await?;
    let codes: Vec<String> = listed
        .data
        .expect("promo list")
        .items
        .into_iter()
        .map(|p| p.code)
        .collect();
    assert!(codes.contains(&live_code));
    assert!(!codes.contains(&expired_code));

    Ok(())
}

#[tokio::test]
async fn wishlist_add_remove_and_conflict() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };
    let user = customer();
    let product = create_product(&state, "Fancy Jam", "Pantry", 750, 12).await?;

    let err = wishlist_service::add_to_wishlist(
        &state,
        &user,
        AddWishlistRequest {
            product_id: Uuid::new_v4(),
        },
    )
    .await
    .expect_err("unknown product must fail");
    assert!(matches!(err, AppError::NotFound(_)));

    let resp = wishlist_service::add_to_wishlist(
        &state,
        &user,
        AddWishlistRequest {
            product_id: product.id,
        },
    )
    .await?;
    let items = resp.data.expect("wishlist data").items;
    assert!(items.iter().any(|p| p.id == product.id));

    let err = wishlist_service::add_to_wishlist(
        &state,
        &user,
        AddWishlistRequest {
            product_id: product.id,
        },
    )
    .await
    .expect_err("duplicate wishlist add must conflict");
    assert!(matches!(err, AppError::Conflict(_)));

    wishlist_service::remove_from_wishlist(&state, &user, product.id).await?;

    let err = wishlist_service::remove_from_wishlist(&state, &user, product.id)
        .await
        .expect_err("second removal must fail");
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn catalog_mutation_is_manager_only() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };

    let err = product_service::create_product(
        &state,
        &customer(),
        CreateProductRequest {
            name: "Contraband".into(),
            category: "Pantry".into(),
            price: 100,
            stock: 1,
            image_url: None,
            low_stock_threshold: None,
        },
    )
    .await
    .expect_err("customers may not create products");
    assert!(matches!(err, AppError::Forbidden));

    let boss = manager();
    let created = product_service::create_product(
        &state,
        &boss,
        CreateProductRequest {
            name: format!("Manager Special {}", Uuid::new_v4()),
            category: "Pantry".into(),
            price: 1250,
            stock: 30,
            image_url: None,
            low_stock_threshold: None,
        },
    )
    .await?;
    let product = created.data.expect("created product");
    assert_eq!(product.created_by, boss.user_id);
    assert_eq!(product.low_stock_threshold, 10);

    Ok(())
}
