pub mod cart;
pub mod orders;
pub mod products;
pub mod promos;
pub mod reports;
pub mod wishlist;
