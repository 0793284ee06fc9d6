// src/db/customer_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::CustomerStore,
    models::{customer::AdminCustomer, customer_auth::CustomerIdentity},
};

const ADMIN_COLUMNS: &str = r#"
    id, tenant_id, name, email, phone, address,
    total_orders, total_spent, average_order_value,
    loyalty_tier, status, source,
    last_order_date, created_at, updated_at
"#;

const IDENTITY_COLUMNS: &str = r#"
    id, tenant_id, name, email, phone, password_hash, address, date_of_birth,
    total_orders, total_spent, average_order_value,
    loyalty_tier, status, email_verified, phone_verified,
    last_order_date, created_at, updated_at
"#;

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Converte violação do índice único (tenant_id, email) em DuplicateCustomer.
fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::DuplicateCustomer;
        }
    }
    e.into()
}

#[async_trait]
impl CustomerStore for CustomerRepository {
    // =========================================================================
    //  PARTIÇÃO "ADMIN" (tabela customers)
    // =========================================================================

    async fn insert_admin(&self, record: &AdminCustomer) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO customers (
                id, tenant_id, name, email, phone, address,
                total_orders, total_spent, average_order_value,
                loyalty_tier, status, source,
                last_order_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(record.id)
        .bind(&record.tenant_id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.address)
        .bind(record.total_orders)
        .bind(record.total_spent)
        .bind(record.average_order_value)
        .bind(record.loyalty_tier)
        .bind(record.status)
        .bind(record.source)
        .bind(record.last_order_date)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn insert_admin_if_absent(&self, record: &AdminCustomer) -> Result<bool, AppError> {
        // O ON CONFLICT no índice (tenant_id, email) faz duas reconciliações
        // concorrentes do mesmo tenant não duplicarem o espelho.
        let result = sqlx::query(
            r#"
            INSERT INTO customers (
                id, tenant_id, name, email, phone, address,
                total_orders, total_spent, average_order_value,
                loyalty_tier, status, source,
                last_order_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (tenant_id, email) DO NOTHING
            "#,
        )
        .bind(record.id)
        .bind(&record.tenant_id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.address)
        .bind(record.total_orders)
        .bind(record.total_spent)
        .bind(record.average_order_value)
        .bind(record.loyalty_tier)
        .bind(record.status)
        .bind(record.source)
        .bind(record.last_order_date)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_admin(&self, record: &AdminCustomer) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, phone = $3, address = $4,
                total_orders = $5, total_spent = $6, average_order_value = $7,
                loyalty_tier = $8, status = $9, source = $10,
                last_order_date = $11, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.phone)
        .bind(&record.address)
        .bind(record.total_orders)
        .bind(record.total_spent)
        .bind(record.average_order_value)
        .bind(record.loyalty_tier)
        .bind(record.status)
        .bind(record.source)
        .bind(record.last_order_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_admin_by_email(
        &self,
        tenant_id: &str,
        email: &str,
    ) -> Result<Option<AdminCustomer>, AppError> {
        let record = sqlx::query_as::<_, AdminCustomer>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM customers WHERE tenant_id = $1 AND email = $2"
        ))
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_admin(&self, tenant_id: &str) -> Result<Vec<AdminCustomer>, AppError> {
        let records = sqlx::query_as::<_, AdminCustomer>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM customers WHERE tenant_id = $1 ORDER BY created_at ASC"
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    // =========================================================================
    //  PARTIÇÃO "STOREFRONT" (tabela customer_identities)
    // =========================================================================

    async fn insert_identity(&self, identity: &CustomerIdentity) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO customer_identities (
                id, tenant_id, name, email, phone, password_hash, address, date_of_birth,
                total_orders, total_spent, average_order_value,
                loyalty_tier, status, email_verified, phone_verified,
                last_order_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(identity.id)
        .bind(&identity.tenant_id)
        .bind(&identity.name)
        .bind(&identity.email)
        .bind(&identity.phone)
        .bind(&identity.password_hash)
        .bind(&identity.address)
        .bind(identity.date_of_birth)
        .bind(identity.total_orders)
        .bind(identity.total_spent)
        .bind(identity.average_order_value)
        .bind(identity.loyalty_tier)
        .bind(identity.status)
        .bind(identity.email_verified)
        .bind(identity.phone_verified)
        .bind(identity.last_order_date)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn update_identity(&self, identity: &CustomerIdentity) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE customer_identities
            SET name = $2, phone = $3, address = $4, date_of_birth = $5,
                total_orders = $6, total_spent = $7, average_order_value = $8,
                loyalty_tier = $9, status = $10,
                email_verified = $11, phone_verified = $12,
                last_order_date = $13, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(identity.id)
        .bind(&identity.name)
        .bind(&identity.phone)
        .bind(&identity.address)
        .bind(identity.date_of_birth)
        .bind(identity.total_orders)
        .bind(identity.total_spent)
        .bind(identity.average_order_value)
        .bind(identity.loyalty_tier)
        .bind(identity.status)
        .bind(identity.email_verified)
        .bind(identity.phone_verified)
        .bind(identity.last_order_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_identity_by_id(&self, id: Uuid) -> Result<Option<CustomerIdentity>, AppError> {
        let identity = sqlx::query_as::<_, CustomerIdentity>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM customer_identities WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }

    async fn find_identity_by_email(
        &self,
        tenant_id: &str,
        email: &str,
    ) -> Result<Option<CustomerIdentity>, AppError> {
        let identity = sqlx::query_as::<_, CustomerIdentity>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM customer_identities WHERE tenant_id = $1 AND email = $2"
        ))
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }

    async fn list_identities(&self, tenant_id: &str) -> Result<Vec<CustomerIdentity>, AppError> {
        let identities = sqlx::query_as::<_, CustomerIdentity>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM customer_identities WHERE tenant_id = $1 ORDER BY created_at ASC"
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(identities)
    }
}
