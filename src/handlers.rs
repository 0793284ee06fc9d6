pub mod customer_auth;
pub mod customers;
pub mod storefront;
