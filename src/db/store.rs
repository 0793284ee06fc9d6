// src/db/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{customer::AdminCustomer, customer_auth::CustomerIdentity, tenancy::Tenant},
};

// O acesso a dados entra nos serviços por estas traits, injetadas no
// construtor. Nada de handle global de banco: quem monta o grafo de
// dependências é o AppState (e os testes montam o deles com o MemoryStore).

#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn find_by_id(&self, tenant_id: &str) -> Result<Option<Tenant>, AppError>;

    /// Espera o slug já na forma canônica (ver `canonical_slug`).
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError>;
}

// As duas partições físicas de clientes atrás de uma única interface.
// Todo método recebe (ou carrega no registro) o tenant_id: nenhuma consulta
// sem filtro de tenant existe nesta camada. Era exatamente a ausência desse
// filtro que vazava clientes entre lojas no sistema legado.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    // --- partição "admin" ---

    /// Falha com `DuplicateCustomer` se (tenant, e-mail) já existe na partição.
    async fn insert_admin(&self, record: &AdminCustomer) -> Result<(), AppError>;

    /// Create-if-missing com semântica de upsert: retorna `true` se gravou.
    /// É o que torna o backfill da reconciliação seguro sob concorrência.
    async fn insert_admin_if_absent(&self, record: &AdminCustomer) -> Result<bool, AppError>;

    async fn update_admin(&self, record: &AdminCustomer) -> Result<(), AppError>;

    async fn find_admin_by_email(
        &self,
        tenant_id: &str,
        email: &str,
    ) -> Result<Option<AdminCustomer>, AppError>;

    async fn list_admin(&self, tenant_id: &str) -> Result<Vec<AdminCustomer>, AppError>;

    // --- partição "storefront" ---

    /// Falha com `DuplicateCustomer` se (tenant, e-mail) já existe na partição.
    async fn insert_identity(&self, identity: &CustomerIdentity) -> Result<(), AppError>;

    async fn update_identity(&self, identity: &CustomerIdentity) -> Result<(), AppError>;

    async fn find_identity_by_id(&self, id: Uuid) -> Result<Option<CustomerIdentity>, AppError>;

    async fn find_identity_by_email(
        &self,
        tenant_id: &str,
        email: &str,
    ) -> Result<Option<CustomerIdentity>, AppError>;

    async fn list_identities(&self, tenant_id: &str) -> Result<Vec<CustomerIdentity>, AppError>;
}
