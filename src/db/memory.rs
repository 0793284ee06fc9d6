// src/db/memory.rs
//
// Dublê de testes das stores. Cada teste cria a sua instância: não existe
// estado compartilhado de processo (o "mock database" global do legado era
// justamente uma fonte de vazamento entre cenários).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{CustomerStore, TenantStore},
    models::{customer::AdminCustomer, customer_auth::CustomerIdentity, tenancy::Tenant},
};

#[derive(Default)]
pub struct MemoryStore {
    tenants: Mutex<Vec<Tenant>>,
    // Chave: (tenant_id, e-mail canônico). O HashMap faz o papel do índice
    // único do Postgres dentro de cada partição.
    admin: Mutex<HashMap<(String, String), AdminCustomer>>,
    identities: Mutex<HashMap<(String, String), CustomerIdentity>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tenant(&self, tenant: Tenant) {
        self.tenants.lock().unwrap().push(tenant);
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn find_by_id(&self, tenant_id: &str) -> Result<Option<Tenant>, AppError> {
        Ok(self
            .tenants
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == tenant_id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        Ok(self
            .tenants
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.slug == slug)
            .cloned())
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn insert_admin(&self, record: &AdminCustomer) -> Result<(), AppError> {
        let mut admin = self.admin.lock().unwrap();
        let key = (record.tenant_id.clone(), record.email.clone());
        if admin.contains_key(&key) {
            return Err(AppError::DuplicateCustomer);
        }
        admin.insert(key, record.clone());
        Ok(())
    }

    async fn insert_admin_if_absent(&self, record: &AdminCustomer) -> Result<bool, AppError> {
        let mut admin = self.admin.lock().unwrap();
        let key = (record.tenant_id.clone(), record.email.clone());
        if admin.contains_key(&key) {
            return Ok(false);
        }
        admin.insert(key, record.clone());
        Ok(true)
    }

    async fn update_admin(&self, record: &AdminCustomer) -> Result<(), AppError> {
        let mut admin = self.admin.lock().unwrap();
        let key = (record.tenant_id.clone(), record.email.clone());
        // Mesma semântica do UPDATE real: updated_at é carimbado na escrita
        let mut record = record.clone();
        record.updated_at = Utc::now();
        admin.insert(key, record);
        Ok(())
    }

    async fn find_admin_by_email(
        &self,
        tenant_id: &str,
        email: &str,
    ) -> Result<Option<AdminCustomer>, AppError> {
        Ok(self
            .admin
            .lock()
            .unwrap()
            .get(&(tenant_id.to_string(), email.to_string()))
            .cloned())
    }

    async fn list_admin(&self, tenant_id: &str) -> Result<Vec<AdminCustomer>, AppError> {
        let mut records: Vec<AdminCustomer> = self
            .admin
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.tenant_id == tenant_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records)
    }

    async fn insert_identity(&self, identity: &CustomerIdentity) -> Result<(), AppError> {
        let mut identities = self.identities.lock().unwrap();
        let key = (identity.tenant_id.clone(), identity.email.clone());
        if identities.contains_key(&key) {
            return Err(AppError::DuplicateCustomer);
        }
        identities.insert(key, identity.clone());
        Ok(())
    }

    async fn update_identity(&self, identity: &CustomerIdentity) -> Result<(), AppError> {
        let mut identities = self.identities.lock().unwrap();
        let key = (identity.tenant_id.clone(), identity.email.clone());
        let mut identity = identity.clone();
        identity.updated_at = Utc::now();
        identities.insert(key, identity);
        Ok(())
    }

    async fn find_identity_by_id(&self, id: Uuid) -> Result<Option<CustomerIdentity>, AppError> {
        Ok(self
            .identities
            .lock()
            .unwrap()
            .values()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn find_identity_by_email(
        &self,
        tenant_id: &str,
        email: &str,
    ) -> Result<Option<CustomerIdentity>, AppError> {
        Ok(self
            .identities
            .lock()
            .unwrap()
            .get(&(tenant_id.to_string(), email.to_string()))
            .cloned())
    }

    async fn list_identities(&self, tenant_id: &str) -> Result<Vec<CustomerIdentity>, AppError> {
        let mut identities: Vec<CustomerIdentity> = self
            .identities
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.tenant_id == tenant_id)
            .cloned()
            .collect();
        identities.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(identities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::{CustomerStatus, IntakeSource, LoyaltyTier};
    use chrono::Duration;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn updates_stamp_updated_at_like_the_real_store() {
        let store = MemoryStore::new();
        let stale = Utc::now() - Duration::hours(1);

        let record = AdminCustomer {
            id: Uuid::new_v4(),
            tenant_id: "acme".to_string(),
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            phone: "555-0101".to_string(),
            address: None,
            total_orders: 0,
            total_spent: Decimal::ZERO,
            average_order_value: Decimal::ZERO,
            loyalty_tier: LoyaltyTier::Bronze,
            status: CustomerStatus::Active,
            source: IntakeSource::Admin,
            last_order_date: None,
            created_at: stale,
            updated_at: stale,
        };
        store.insert_admin(&record).await.unwrap();
        store.update_admin(&record).await.unwrap();

        let stored = store.find_admin_by_email("acme", "a@x.com").await.unwrap().unwrap();
        assert!(stored.updated_at > stale);

        let identity = CustomerIdentity {
            id: Uuid::new_v4(),
            tenant_id: "acme".to_string(),
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            phone: "555-0101".to_string(),
            password_hash: "hash-de-teste".to_string(),
            address: None,
            date_of_birth: None,
            total_orders: 0,
            total_spent: Decimal::ZERO,
            average_order_value: Decimal::ZERO,
            loyalty_tier: LoyaltyTier::Bronze,
            status: CustomerStatus::Active,
            email_verified: false,
            phone_verified: false,
            last_order_date: None,
            created_at: stale,
            updated_at: stale,
        };
        store.insert_identity(&identity).await.unwrap();
        store.update_identity(&identity).await.unwrap();

        let stored = store
            .find_identity_by_email("acme", "a@x.com")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.updated_at > stale);
    }
}
