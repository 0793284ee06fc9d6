pub mod store;
pub use store::{CustomerStore, TenantStore};
pub mod tenant_repo;
pub use tenant_repo::TenantRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;

#[cfg(test)]
pub mod memory;
