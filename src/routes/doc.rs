use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartLine, CartSnapshot},
        orders::{OrderList, OrderWithItems},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        promos::{AppliedPromo, ApplyPromoRequest, CreatePromoRequest, PromoList},
        reports::{LowStockAlert, LowStockAlerts, SalesReport, SalesReportRow},
        wishlist::{AddWishlistRequest, WishlistProductList},
    },
    models::{CartItem, Order, OrderItem, Product, PromoCode, Sale},
    response::{ApiResponse, Meta},
    routes::{cart, health, orders, params, products, promos, reports, wishlist},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::checkout,
        orders::list_orders,
        orders::get_order,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        wishlist::list_wishlist,
        wishlist::add_to_wishlist,
        wishlist::remove_from_wishlist,
        promos::create_promo,
        promos::list_promos,
        promos::apply_promo,
        reports::sales_report,
        reports::low_stock_alerts
    ),
    components(
        schemas(
            Product,
            CartItem,
            Order,
            OrderItem,
            Sale,
            PromoCode,
            AddToCartRequest,
            CartLine,
            CartSnapshot,
            OrderList,
            OrderWithItems,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            AddWishlistRequest,
            WishlistProductList,
            CreatePromoRequest,
            ApplyPromoRequest,
            AppliedPromo,
            PromoList,
            SalesReportRow,
            SalesReport,
            LowStockAlert,
            LowStockAlerts,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            params::ReportQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartSnapshot>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<SalesReport>,
            ApiResponse<PromoCode>,
            ApiResponse<AppliedPromo>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout and order endpoints"),
        (name = "Wishlist", description = "Wishlist endpoints"),
        (name = "Promo", description = "Promo code endpoints"),
        (name = "Reports", description = "Sales reporting endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
