pub mod customer_auth;
pub mod customer_ledger;
pub mod stats;
pub mod tenant_directory;
