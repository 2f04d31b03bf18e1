mod common;

use common::{create_product, customer, try_setup_state};
use grocery_store_api::{
    dto::cart::AddToCartRequest,
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        orders::{Column as OrderCol, Entity as Orders},
        products::Entity as Products,
        sales::{Column as SaleCol, Entity as Sales},
    },
    error::AppError,
    services::{cart_service, order_service},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

// Worked example from the product brief: [2 x 500c, 1 x 300c] -> 1300c total,
// stock decremented per line, cart consumed, sale events recorded.
#[tokio::test]
async fn checkout_converts_cart_and_records_sales() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };
    let user = customer();

    let apples = create_product(&state, "Apples", "Produce", 500, 10).await?;
    let bread = create_product(&state, "Bread", "Bakery", 300, 5).await?;

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: apples.id,
            quantity: 2,
        },
    )
    .await?;
    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: bread.id,
            quantity: 1,
        },
    )
    .await?;

    let resp = order_service::checkout(&state, &user).await?;
    let result = resp.data.expect("checkout data");

    assert_eq!(result.order.total_price, 1300);
    assert_eq!(result.items.len(), 2);
    let item_sum: i64 = result.items.iter().map(|i| i.price).sum();
    assert_eq!(result.order.total_price, item_sum);

    let apple_item = result
        .items
        .iter()
        .find(|i| i.product_id == apples.id)
        .expect("apple order item");
    assert_eq!(apple_item.quantity, 2);
    assert_eq!(apple_item.price, 1000);

    let apples_after = Products::find_by_id(apples.id)
        .one(&state.orm)
        .await?
        .expect("apples still exist");
    assert_eq!(apples_after.stock, 8);
    let bread_after = Products::find_by_id(bread.id)
        .one(&state.orm)
        .await?
        .expect("bread still exists");
    assert_eq!(bread_after.stock, 4);

    let cart = cart_service::list_cart(&state, &user).await?;
    assert!(cart.data.expect("cart data").items.is_empty());

    let apple_sales = Sales::find()
        .filter(SaleCol::ProductId.eq(apples.id))
        .all(&state.orm)
        .await?;
    assert_eq!(apple_sales.len(), 1);
    assert_eq!(apple_sales[0].quantity, 2);

    Ok(())
}

#[tokio::test]
async fn checkout_with_empty_cart_fails_and_changes_nothing() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };
    let user = customer();
    let product = create_product(&state, "Milk", "Dairy", 150, 7).await?;

    let err = order_service::checkout(&state, &user)
        .await
        .expect_err("empty cart must fail");
    assert!(matches!(err, AppError::BadRequest(_)));

    let after = Products::find_by_id(product.id)
        .one(&state.orm)
        .await?
        .expect("product");
    assert_eq!(after.stock, 7);

    let order_count = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .count(&state.orm)
        .await?;
    assert_eq!(order_count, 0);

    Ok(())
}

// Stock moved between add-to-cart and checkout: the whole transaction aborts,
// leaving stock, cart, orders, and sales untouched.
#[tokio::test]
async fn checkout_aborts_when_stock_no_longer_suffices() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };
    let user = customer();
    let product = create_product(&state, "Eggs", "Dairy", 500, 3).await?;

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: product.id,
            quantity: 2,
        },
    )
    .await?;

    // Another sale drains the shelf before this user checks out.
    use grocery_store_api::entity::products::ActiveModel as ProductActive;
    use sea_orm::{ActiveModelTrait, Set};
    let mut active: ProductActive = Products::find_by_id(product.id)
        .one(&state.orm)
        .await?
        .expect("product")
        .into();
    active.stock = Set(1);
    active.update(&state.orm).await?;

    let err = order_service::checkout(&state, &user)
        .await
        .expect_err("insufficient stock must fail");
    assert!(matches!(err, AppError::InsufficientStock(_)));

    let after = Products::find_by_id(product.id)
        .one(&state.orm)
        .await?
        .expect("product");
    assert_eq!(after.stock, 1);

    let cart_lines = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .all(&state.orm)
        .await?;
    assert_eq!(cart_lines.len(), 1);
    assert_eq!(cart_lines[0].quantity, 2);

    let order_count = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .count(&state.orm)
        .await?;
    assert_eq!(order_count, 0);

    let sale_count = Sales::find()
        .filter(SaleCol::ProductId.eq(product.id))
        .count(&state.orm)
        .await?;
    assert_eq!(sale_count, 0);

    Ok(())
}

// Two carts race for the last unit; the row lock lets exactly one win.
#[tokio::test]
async fn concurrent_checkouts_cannot_oversell() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };
    let first = customer();
    let second = customer();
    let product = create_product(&state, "Last Croissant", "Bakery", 250, 1).await?;

    for user in [&first, &second] {
        cart_service::add_to_cart(
            &state,
            user,
            AddToCartRequest {
                product_id: product.id,
                quantity: 1,
            },
        )
        .await?;
    }

    let (first_result, second_result) = tokio::join!(
        order_service::checkout(&state, &first),
        order_service::checkout(&state, &second),
    );

    let successes = [&first_result, &second_result]
        .iter()
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(successes, 1, "exactly one checkout may win the last unit");

    let loser = if first_result.is_ok() {
        second_result
    } else {
        first_result
    };
    assert!(matches!(
        loser.expect_err("loser must fail"),
        AppError::InsufficientStock(_)
    ));

    let after = Products::find_by_id(product.id)
        .one(&state.orm)
        .await?
        .expect("product");
    assert_eq!(after.stock, 0);

    Ok(())
}

#[tokio::test]
async fn repeat_add_increments_cart_line() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };
    let user = customer();
    let product = create_product(&state, "Butter", "Dairy", 350, 10).await?;

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: product.id,
            quantity: 1,
        },
    )
    .await?;
    let resp = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: product.id,
            quantity: 2,
        },
    )
    .await?;

    let snapshot = resp.data.expect("cart data");
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].quantity, 3);

    Ok(())
}

#[tokio::test]
async fn add_to_cart_enforces_stock_and_existence() -> anyhow::Result<()> {
    let Some(state) = try_setup_state().await? else {
        return Ok(());
    };
    let user = customer();
    let product = create_product(&state, "Saffron", "Pantry", 9900, 2).await?;

    let err = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: product.id,
            quantity: 3,
        },
    )
    .await
    .expect_err("over-stock add must fail");
    assert!(matches!(err, AppError::InsufficientStock(_)));

    let err = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: uuid::Uuid::new_v4(),
            quantity: 1,
        },
    )
    .await
    .expect_err("unknown product must fail");
    assert!(matches!(err, AppError::NotFound(_)));

    let err = cart_service::remove_from_cart(&state, &user, product.id)
        .await
        .expect_err("removing a line that was never added must fail");
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}
