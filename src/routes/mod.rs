use axum::{Router, routing::post};

use crate::state::AppState;

pub mod cart;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod promos;
pub mod reports;
pub mod wishlist;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .route("/checkout", post(orders::checkout))
        .nest("/orders", orders::router())
        .nest("/wishlist", wishlist::router())
        .nest("/promocodes", promos::router())
        .nest("/reports", reports::router())
}
