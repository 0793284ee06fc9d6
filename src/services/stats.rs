// src/services/stats.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::customer::{CustomerStatus, LoyaltyTier, Provenance},
    models::stats::{CustomerStatsOverview, LoyaltyDistribution, TierBucket},
    services::customer_ledger::CustomerLedger,
};

// Qual recorte da visão reconciliada a agregação enxerga. A vitrine só
// mostra fidelidade de quem consegue logar nela (proveniência storefront),
// o painel da loja enxerga todo mundo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerScope {
    All,
    StorefrontOnly,
}

// Agrega sempre sobre o ledger reconciliado. Contar as partições físicas
// direto dobraria quem existe nas duas.
#[derive(Clone)]
pub struct StatsService {
    ledger: CustomerLedger,
}

impl StatsService {
    pub fn new(ledger: CustomerLedger) -> Self {
        Self { ledger }
    }

    /// Tenant sem clientes devolve tudo zerado, nunca erro: divisões são
    /// protegidas. Tenant inexistente falha com TenantNotFound.
    pub async fn tenant_stats(&self, tenant_id: &str) -> Result<CustomerStatsOverview, AppError> {
        let records = self.ledger.list_customers(tenant_id).await?;

        let total_customers = records.len() as u64;
        if total_customers == 0 {
            return Ok(CustomerStatsOverview::default());
        }

        let active_customers = records
            .iter()
            .filter(|r| r.status == CustomerStatus::Active)
            .count() as u64;

        let sum: Decimal = records.iter().map(|r| r.average_order_value).sum();
        let avg_order_value = (sum / Decimal::from(total_customers)).round_dp(2);

        // Cliente recorrente: mais de um pedido
        let repeat_customer_count =
            records.iter().filter(|r| r.total_orders > 1).count() as u64;
        let percentage = repeat_customer_count as f64 * 100.0 / total_customers as f64;
        let repeat_customer_percentage = (percentage * 10.0).round() / 10.0;

        Ok(CustomerStatsOverview {
            total_customers,
            active_customers,
            avg_order_value,
            repeat_customer_count,
            repeat_customer_percentage,
        })
    }

    pub async fn loyalty_distribution(
        &self,
        tenant_id: &str,
        scope: LedgerScope,
    ) -> Result<LoyaltyDistribution, AppError> {
        let records = self.ledger.list_customers(tenant_id).await?;

        let mut counts = [0u64; 4];
        for record in &records {
            if scope == LedgerScope::StorefrontOnly && record.provenance == Provenance::Admin {
                continue;
            }
            let slot = match record.loyalty_tier {
                LoyaltyTier::Bronze => 0,
                LoyaltyTier::Silver => 1,
                LoyaltyTier::Gold => 2,
                LoyaltyTier::Platinum => 3,
            };
            counts[slot] += 1;
        }

        let bucket = |tier: LoyaltyTier, count: u64| TierBucket {
            count,
            min_spent: tier.min_spent(),
            discount: tier.discount().to_string(),
        };

        Ok(LoyaltyDistribution {
            bronze: bucket(LoyaltyTier::Bronze, counts[0]),
            silver: bucket(LoyaltyTier::Silver, counts[1]),
            gold: bucket(LoyaltyTier::Gold, counts[2]),
            platinum: bucket(LoyaltyTier::Platinum, counts[3]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::{CustomerStore, TenantStore};
    use crate::models::customer::canonical_email;
    use crate::models::customer_auth::CustomerIdentity;
    use crate::models::tenancy::Tenant;
    use crate::services::tenant_directory::TenantDirectory;
    use chrono::Utc;
    use std::str::FromStr;
    use std::sync::Arc;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn setup() -> (Arc<MemoryStore>, CustomerLedger, StatsService) {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        store.add_tenant(Tenant {
            id: "acme".to_string(),
            slug: "acme".to_string(),
            name: "Acme Dispensary".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        });
        let directory = TenantDirectory::new(store.clone() as Arc<dyn TenantStore>);
        let ledger = CustomerLedger::new(directory, store.clone() as Arc<dyn CustomerStore>);
        let stats = StatsService::new(ledger.clone());
        (store, ledger, stats)
    }

    async fn seed_identity(
        store: &MemoryStore,
        email: &str,
        orders: i32,
        spent: Decimal,
        status: CustomerStatus,
    ) {
        let now = Utc::now();
        let identity = CustomerIdentity {
            id: Uuid::new_v4(),
            tenant_id: "acme".to_string(),
            name: "Cliente".to_string(),
            email: canonical_email(email),
            phone: "555-0100".to_string(),
            password_hash: "hash-de-teste".to_string(),
            address: None,
            date_of_birth: None,
            total_orders: orders,
            total_spent: spent,
            average_order_value: crate::models::customer::average_order_value(spent, orders),
            loyalty_tier: LoyaltyTier::from_total_spent(spent),
            status,
            email_verified: false,
            phone_verified: false,
            last_order_date: None,
            created_at: now,
            updated_at: now,
        };
        store.insert_identity(&identity).await.unwrap();
    }

    #[tokio::test]
    async fn empty_tenant_returns_zeroed_stats() {
        let (_store, _ledger, stats) = setup();

        let overview = stats.tenant_stats("acme").await.unwrap();
        assert_eq!(overview.total_customers, 0);
        assert_eq!(overview.active_customers, 0);
        assert_eq!(overview.avg_order_value, Decimal::ZERO);
        assert_eq!(overview.repeat_customer_count, 0);
        assert_eq!(overview.repeat_customer_percentage, 0.0);
    }

    #[tokio::test]
    async fn missing_tenant_is_an_error_not_zeroes() {
        let (_store, _ledger, stats) = setup();

        let err = stats.tenant_stats("ghost").await.unwrap_err();
        assert!(matches!(err, AppError::TenantNotFound));
    }

    #[tokio::test]
    async fn overview_counts_over_the_reconciled_ledger() {
        let (store, ledger, stats) = setup();

        // Mesma pessoa nas duas partições: conta UMA vez
        ledger
            .create_admin_customer("acme", "Ana", "a@x.com", "555-0101", None)
            .await
            .unwrap();
        seed_identity(&store, "a@x.com", 4, dec("200"), CustomerStatus::Active).await;
        seed_identity(&store, "b@x.com", 1, dec("100"), CustomerStatus::Inactive).await;
        seed_identity(&store, "c@x.com", 2, dec("900"), CustomerStatus::Active).await;

        let overview = stats.tenant_stats("acme").await.unwrap();
        assert_eq!(overview.total_customers, 3);
        assert_eq!(overview.active_customers, 2);
        assert_eq!(overview.repeat_customer_count, 2);
        assert_eq!(overview.repeat_customer_percentage, 66.7);
        // Ticket médio: média dos tickets médios reconciliados
        // (50 + 100 + 450) / 3
        assert_eq!(overview.avg_order_value, dec("200"));
    }

    #[tokio::test]
    async fn loyalty_distribution_respects_scope() {
        let (store, ledger, stats) = setup();

        // Só-admin com gasto de gold
        ledger
            .create_admin_customer("acme", "Ana", "admin@x.com", "555-0101", None)
            .await
            .unwrap();
        let mut admin = store
            .find_admin_by_email("acme", "admin@x.com")
            .await
            .unwrap()
            .unwrap();
        admin.total_orders = 3;
        admin.total_spent = dec("2000");
        admin.recompute_derived();
        store.update_admin(&admin).await.unwrap();

        seed_identity(&store, "bronze@x.com", 1, dec("499"), CustomerStatus::Active).await;
        seed_identity(&store, "silver@x.com", 1, dec("500"), CustomerStatus::Active).await;
        seed_identity(&store, "platinum@x.com", 9, dec("3000"), CustomerStatus::Active).await;

        let all = stats.loyalty_distribution("acme", LedgerScope::All).await.unwrap();
        assert_eq!(all.bronze.count, 1);
        assert_eq!(all.silver.count, 1);
        assert_eq!(all.gold.count, 1);
        assert_eq!(all.platinum.count, 1);
        assert_eq!(all.silver.min_spent, 500);
        assert_eq!(all.platinum.discount, "20%");

        // A visão da vitrine ignora quem não tem cadastro de storefront
        let storefront = stats
            .loyalty_distribution("acme", LedgerScope::StorefrontOnly)
            .await
            .unwrap();
        assert_eq!(storefront.gold.count, 0);
        assert_eq!(storefront.bronze.count, 1);
        assert_eq!(storefront.silver.count, 1);
        assert_eq!(storefront.platinum.count, 1);
    }
}
