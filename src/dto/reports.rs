use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// One row of the sales report. Products with no recorded sales report 0.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct SalesReportRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub total_quantity_sold: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SalesReport {
    #[schema(value_type = Vec<SalesReportRow>)]
    pub items: Vec<SalesReportRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LowStockAlert {
    pub product: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LowStockAlerts {
    pub low_stock_alerts: Vec<LowStockAlert>,
}
