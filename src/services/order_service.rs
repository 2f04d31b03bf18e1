use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderList, OrderWithItems},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{ActiveModel as ProductActive, Entity as Products},
        sales::ActiveModel as SaleActive,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// Convert the caller's cart into a finalized order.
///
/// The whole operation runs inside one transaction committed or rolled back at
/// exactly this point; on any error no stock decrement, order, order item, or
/// sale row survives and the cart is untouched.
pub async fn checkout(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;

    let (order, items) = match perform_checkout(&txn, user).await {
        Ok(result) => result,
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(error = %rollback_err, "checkout rollback failed");
            }
            return Err(err);
        }
    };

    txn.commit().await?;

    tracing::info!(
        user_id = %user.user_id,
        order_id = %order.id,
        total_price = order.total_price,
        "checkout complete"
    );

    Ok(ApiResponse::success(
        "Checkout complete",
        OrderWithItems {
            order: order_from_entity(order),
            items: items.into_iter().map(order_item_from_entity).collect(),
        },
        Some(Meta::empty()),
    ))
}

/// Checkout worker. Runs entirely inside the unit of work handed in by the
/// caller; never commits or rolls back itself.
///
/// Each product row is re-read under `SELECT ... FOR UPDATE` before its stock is
/// checked and decremented, so concurrent checkouts of the same product
/// serialize on the row lock and the invariant `stock >= 0` holds.
async fn perform_checkout(
    txn: &DatabaseTransaction,
    user: &AuthUser,
) -> AppResult<(OrderModel, Vec<OrderItemModel>)> {
    let cart_lines = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .all(txn)
        .await?;

    if cart_lines.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty".into()));
    }

    let now = Utc::now();

    // Provisional order; the total is finalized after all lines are priced.
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        total_price: Set(0),
        purchase_date: Set(now.into()),
    }
    .insert(txn)
    .await?;

    let mut total_price: i64 = 0;
    let mut items: Vec<OrderItemModel> = Vec::with_capacity(cart_lines.len());

    for line in &cart_lines {
        let product = Products::find_by_id(line.product_id)
            .lock(LockType::Update)
            .one(txn)
            .await?
            .ok_or(AppError::NotFound("product"))?;

        // Stock may have moved since the line was added; this re-check under the
        // row lock is what makes checkout all-or-nothing.
        if product.stock < line.quantity {
            return Err(AppError::InsufficientStock(format!(
                "{} not available in requested quantity",
                product.name
            )));
        }

        let unit_price = product.price;
        let subtotal = unit_price * i64::from(line.quantity);
        let new_stock = product.stock - line.quantity;

        let mut product_active: ProductActive = product.into();
        product_active.stock = Set(new_stock);
        product_active.update(txn).await?;

        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            price: Set(subtotal),
            created_at: NotSet,
        }
        .insert(txn)
        .await?;
        items.push(item);

        SaleActive {
            id: Set(Uuid::new_v4()),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            sold_at: Set(now.into()),
        }
        .insert(txn)
        .await?;

        total_price += subtotal;
    }

    let mut order_active: OrderActive = order.into();
    order_active.total_price = Set(total_price);
    let order = order_active.update(txn).await?;

    // The cart is consumed by a successful checkout.
    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(txn)
        .await?;

    Ok((order, items))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(OrderCol::UserId.eq(user.user_id));
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::PurchaseDate),
        SortOrder::Desc => finder.order_by_desc(OrderCol::PurchaseDate),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "OK",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .filter(OrderCol::Id.eq(id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("order"))?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        total_price: model.total_price,
        purchase_date: model.purchase_date.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
