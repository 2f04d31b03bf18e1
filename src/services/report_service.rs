use sea_orm::sea_query::Expr;
use sea_orm::{EntityTrait, QueryFilter, QueryOrder};

use crate::{
    dto::reports::{LowStockAlert, LowStockAlerts, SalesReport, SalesReportRow},
    entity::products::{Column as ProdCol, Entity as Products},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_manager},
    response::{ApiResponse, Meta},
    routes::params::{ReportFilter, ReportQuery},
    state::AppState,
};

/// Aggregate sale events per product. Every product appears, with 0 for those
/// that never sold.
pub async fn sales_report(
    state: &AppState,
    user: &AuthUser,
    query: ReportQuery,
) -> AppResult<ApiResponse<SalesReport>> {
    ensure_manager(user)?;

    let filter = query.filter.unwrap_or(ReportFilter::MostSold);

    let category = match filter {
        ReportFilter::Category => Some(query.category.filter(|c| !c.is_empty()).ok_or_else(
            || {
                AppError::BadRequest(
                    "Category parameter is required for category filter".to_string(),
                )
            },
        )?),
        _ => None,
    };

    let order_clause = match filter {
        ReportFilter::LeastSold => "total_quantity_sold ASC, p.name ASC",
        _ => "total_quantity_sold DESC, p.name ASC",
    };

    let where_clause = if category.is_some() {
        "WHERE LOWER(p.category) = LOWER($1)"
    } else {
        ""
    };

    let sql = format!(
        r#"
        SELECT p.id, p.name, p.category, p.price,
               COALESCE(SUM(s.quantity), 0)::BIGINT AS total_quantity_sold
        FROM products p
        LEFT JOIN sales s ON s.product_id = p.id
        {where_clause}
        GROUP BY p.id, p.name, p.category, p.price
        ORDER BY {order_clause}
        "#
    );

    let mut report_query = sqlx::query_as::<_, SalesReportRow>(&sql);
    if let Some(category) = category {
        report_query = report_query.bind(category);
    }
    let rows = report_query.fetch_all(&state.pool).await?;

    let total = rows.len() as i64;
    Ok(ApiResponse::success(
        "Sales report",
        SalesReport { items: rows },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

/// Products at or below their own low-stock threshold.
pub async fn low_stock_alerts(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<LowStockAlerts>> {
    ensure_manager(user)?;

    let products = Products::find()
        .filter(Expr::col(ProdCol::Stock).lte(Expr::col(ProdCol::LowStockThreshold)))
        .order_by_asc(ProdCol::Stock)
        .all(&state.orm)
        .await?;

    let alerts: Vec<LowStockAlert> = products
        .into_iter()
        .map(|p| LowStockAlert {
            product: p.name,
            quantity: p.stock,
        })
        .collect();

    let message = if alerts.is_empty() {
        "All stocks are sufficient"
    } else {
        "Low stock"
    };

    Ok(ApiResponse::success(
        message,
        LowStockAlerts {
            low_stock_alerts: alerts,
        },
        Some(Meta::empty()),
    ))
}
