// src/services/tenant_directory.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::TenantStore,
    models::tenancy::{Tenant, canonical_slug},
};

// Fonte única de verdade sobre "de quem é este dado": resolve tanto o id
// opaco do tenant quanto o slug público da vitrine.
#[derive(Clone)]
pub struct TenantDirectory {
    store: Arc<dyn TenantStore>,
}

impl TenantDirectory {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }

    // Tenants inativos resolvem normalmente: quem decide se a loja inativa
    // pode ser servida é o chamador, não o diretório.
    pub async fn resolve_by_id(&self, tenant_id: &str) -> Result<Tenant, AppError> {
        self.store
            .find_by_id(tenant_id)
            .await?
            .ok_or(AppError::TenantNotFound)
    }

    // Lookup case-insensitive: a entrada é canonicalizada e o banco só
    // guarda slugs canônicos, então a comparação vira igualdade simples.
    pub async fn resolve_by_slug(&self, slug: &str) -> Result<Tenant, AppError> {
        self.store
            .find_by_slug(&canonical_slug(slug))
            .await?
            .ok_or(AppError::StoreNotFound)
    }

    pub async fn slug_is_available(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.store.find_by_slug(&canonical_slug(slug)).await?.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use chrono::Utc;

    fn tenant(id: &str, slug: &str, is_active: bool) -> Tenant {
        let now = Utc::now();
        Tenant {
            id: id.to_string(),
            slug: canonical_slug(slug),
            name: format!("Loja {id}"),
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    fn directory_with(tenants: Vec<Tenant>) -> TenantDirectory {
        let store = MemoryStore::new();
        for t in tenants {
            store.add_tenant(t);
        }
        TenantDirectory::new(Arc::new(store))
    }

    #[tokio::test]
    async fn resolve_by_slug_is_case_insensitive() {
        let directory = directory_with(vec![tenant("t1", "Valley-Dispensary", true)]);

        let resolved = directory.resolve_by_slug("VALLEY-dispensary").await.unwrap();
        assert_eq!(resolved.id, "t1");

        let resolved = directory.resolve_by_slug("  valley-dispensary ").await.unwrap();
        assert_eq!(resolved.id, "t1");
    }

    #[tokio::test]
    async fn unknown_slug_is_store_not_found() {
        let directory = directory_with(vec![tenant("t1", "acme", true)]);

        let err = directory.resolve_by_slug("nope").await.unwrap_err();
        assert!(matches!(err, AppError::StoreNotFound));

        let err = directory.resolve_by_id("t9").await.unwrap_err();
        assert!(matches!(err, AppError::TenantNotFound));
    }

    #[tokio::test]
    async fn inactive_tenant_still_resolves() {
        let directory = directory_with(vec![tenant("t1", "acme", false)]);

        let resolved = directory.resolve_by_id("t1").await.unwrap();
        assert!(!resolved.is_active);
        let resolved = directory.resolve_by_slug("acme").await.unwrap();
        assert!(!resolved.is_active);
    }

    #[tokio::test]
    async fn slug_availability_ignores_case() {
        let directory = directory_with(vec![tenant("t1", "acme", true)]);

        assert!(!directory.slug_is_available("ACME").await.unwrap());
        assert!(directory.slug_is_available("beta").await.unwrap());
    }
}
