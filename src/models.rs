pub mod customer;
pub mod customer_auth;
pub mod stats;
pub mod tenancy;
