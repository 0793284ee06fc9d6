// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{CustomerRepository, CustomerStore, TenantRepository, TenantStore},
    services::{
        customer_auth::CustomerAuthService, customer_ledger::CustomerLedger, stats::StatsService,
        tenant_directory::TenantDirectory,
    },
};

// Validade padrão da sessão do cliente da vitrine (mesma do legado)
const DEFAULT_CUSTOMER_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub tenant_directory: TenantDirectory,
    pub customer_ledger: CustomerLedger,
    pub customer_auth: CustomerAuthService,
    pub stats_service: StatsService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let token_ttl_minutes = env::var("CUSTOMER_TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CUSTOMER_TOKEN_TTL_MINUTES);

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o grafo de dependências ---
        // As stores entram nos serviços por injeção explícita; não existe
        // handle global de banco em lugar nenhum.
        let tenant_store: Arc<dyn TenantStore> = Arc::new(TenantRepository::new(db_pool.clone()));
        let customer_store: Arc<dyn CustomerStore> =
            Arc::new(CustomerRepository::new(db_pool.clone()));

        let tenant_directory = TenantDirectory::new(tenant_store);
        let customer_ledger =
            CustomerLedger::new(tenant_directory.clone(), customer_store.clone());
        let customer_auth = CustomerAuthService::new(
            tenant_directory.clone(),
            customer_store,
            jwt_secret,
            token_ttl_minutes,
        );
        let stats_service = StatsService::new(customer_ledger.clone());

        Ok(Self {
            db_pool,
            tenant_directory,
            customer_ledger,
            customer_auth,
            stats_service,
        })
    }
}
