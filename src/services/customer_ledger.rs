// src/services/customer_ledger.rs
//
// O coração do subsistema: apresenta exatamente UM CustomerRecord por
// (tenant, e-mail canônico) para todo consumidor, não importa se o dado
// físico veio do cadastro pela equipe (partição admin), do auto-cadastro
// na vitrine (partição storefront), ou dos dois.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CustomerStore,
    models::customer::{
        AdminCustomer, CustomerRecord, CustomerStatus, IntakeSource, LoyaltyTier, Provenance,
        ReconciliationConflict, ReconciliationReport, average_order_value, canonical_email,
    },
    models::customer_auth::CustomerIdentity,
    services::tenant_directory::TenantDirectory,
};

#[derive(Clone)]
pub struct CustomerLedger {
    directory: TenantDirectory,
    customers: Arc<dyn CustomerStore>,
}

impl CustomerLedger {
    pub fn new(directory: TenantDirectory, customers: Arc<dyn CustomerStore>) -> Self {
        Self { directory, customers }
    }

    // =========================================================================
    //  ENTRADA "ADMIN": a equipe da loja cadastra o cliente diretamente
    // =========================================================================

    pub async fn create_admin_customer(
        &self,
        tenant_id: &str,
        name: &str,
        email: &str,
        phone: &str,
        address: Option<String>,
    ) -> Result<AdminCustomer, AppError> {
        let tenant = self.directory.resolve_by_id(tenant_id).await?;
        let email = canonical_email(email);

        if self
            .customers
            .find_admin_by_email(&tenant.id, &email)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateCustomer);
        }

        let now = Utc::now();
        let record = AdminCustomer {
            id: Uuid::new_v4(),
            tenant_id: tenant.id,
            name: name.to_string(),
            email,
            phone: phone.to_string(),
            address,
            total_orders: 0,
            total_spent: Decimal::ZERO,
            average_order_value: Decimal::ZERO,
            loyalty_tier: LoyaltyTier::Bronze,
            status: CustomerStatus::Active,
            source: IntakeSource::Admin,
            last_order_date: None,
            created_at: now,
            updated_at: now,
        };

        // O índice único (tenant, e-mail) segura a corrida entre o check
        // acima e o insert.
        self.customers.insert_admin(&record).await?;

        Ok(record)
    }

    // =========================================================================
    //  LEITURA RECONCILIADA
    // =========================================================================

    /// Visão reconciliada dos clientes do tenant. Leitura pura: nunca grava
    /// nada como efeito colateral, e a ordem é estável (created_at, e-mail)
    /// para a paginação não embaralhar entre chamadas.
    pub async fn list_customers(&self, tenant_id: &str) -> Result<Vec<CustomerRecord>, AppError> {
        let tenant = self.directory.resolve_by_id(tenant_id).await?;

        // As duas buscas filtram pelo tenant DENTRO da store. O merge abaixo
        // só vê dados de uma loja; colisão de e-mail entre lojas diferentes
        // nunca chega aqui.
        let admin_records = self.customers.list_admin(&tenant.id).await?;
        let identities = self.customers.list_identities(&tenant.id).await?;

        let mut by_email: BTreeMap<String, (Option<AdminCustomer>, Option<CustomerIdentity>)> =
            BTreeMap::new();
        for record in admin_records {
            let email = record.email.clone();
            by_email.entry(email).or_default().0 = Some(record);
        }
        for identity in identities {
            let email = identity.email.clone();
            by_email.entry(email).or_default().1 = Some(identity);
        }

        let mut records: Vec<CustomerRecord> = by_email
            .into_values()
            .map(|(admin, identity)| merge_pair(admin.as_ref(), identity.as_ref()))
            .collect();
        records.sort_by(|a, b| (a.created_at, &a.email).cmp(&(b.created_at, &b.email)));

        Ok(records)
    }

    // =========================================================================
    //  RECONCILIAÇÃO EXPLÍCITA (manutenção, idempotente)
    // =========================================================================

    /// Materializa na partição admin o espelho de toda identidade do
    /// storefront que ainda não tem contraparte, e sincroniza estatísticas
    /// divergentes dos pares existentes. Rodar duas vezes seguidas devolve
    /// um relatório zerado na segunda.
    pub async fn reconcile_tenant(
        &self,
        tenant_id: &str,
    ) -> Result<ReconciliationReport, AppError> {
        let tenant = self.directory.resolve_by_id(tenant_id).await?;

        let admin_records = self.customers.list_admin(&tenant.id).await?;
        let identities = self.customers.list_identities(&tenant.id).await?;

        let mut admin_by_email: BTreeMap<String, AdminCustomer> = admin_records
            .into_iter()
            .map(|r| (r.email.clone(), r))
            .collect();

        let mut report = ReconciliationReport::default();

        for identity in &identities {
            match admin_by_email.remove(&identity.email) {
                None => {
                    // Órfão: existe na vitrine, falta o espelho admin.
                    // Clientes só-admin NÃO ganham identidade de login aqui;
                    // credencial não se fabrica em manutenção.
                    let mirror = mirror_of(identity);
                    if self.customers.insert_admin_if_absent(&mirror).await? {
                        report.orphans_backfilled += 1;
                    }
                }
                Some(admin) => {
                    if let Some(conflict) = stats_conflict(&admin, identity) {
                        tracing::warn!(
                            tenant_id = %tenant.id,
                            email = %conflict.email,
                            "conflito de reconciliação: {}",
                            conflict.reason
                        );
                        report.conflicts.push(conflict);
                    }
                    if self.sync_pair(admin, identity).await? {
                        report.records_merged += 1;
                    }
                }
            }
        }

        Ok(report)
    }

    // Alinha o par (admin, identidade) à projeção merged: perfil vem da
    // identidade (dado auto-declarado), estatísticas vão para o máximo dos
    // dois lados. Retorna true se algum lado precisou de escrita.
    async fn sync_pair(
        &self,
        mut admin: AdminCustomer,
        identity: &CustomerIdentity,
    ) -> Result<bool, AppError> {
        let orders = admin.total_orders.max(identity.total_orders);
        let spent = admin.total_spent.max(identity.total_spent);
        let last_order = later(admin.last_order_date, identity.last_order_date);

        let mut changed = false;

        let admin_profile_stale = admin.name != identity.name
            || admin.phone != identity.phone
            || admin.address != identity.address
            || admin.status != identity.status;
        let admin_stats_stale = admin.total_orders != orders
            || admin.total_spent != spent
            || admin.last_order_date != last_order;

        if admin_profile_stale || admin_stats_stale {
            admin.name = identity.name.clone();
            admin.phone = identity.phone.clone();
            admin.address = identity.address.clone();
            admin.status = identity.status;
            admin.total_orders = orders;
            admin.total_spent = spent;
            admin.last_order_date = last_order;
            admin.recompute_derived();
            self.customers.update_admin(&admin).await?;
            changed = true;
        }

        if identity.total_orders != orders
            || identity.total_spent != spent
            || identity.last_order_date != last_order
        {
            let mut identity = identity.clone();
            identity.total_orders = orders;
            identity.total_spent = spent;
            identity.last_order_date = last_order;
            identity.average_order_value = average_order_value(spent, orders);
            identity.loyalty_tier = LoyaltyTier::from_total_spent(spent);
            self.customers.update_identity(&identity).await?;
            changed = true;
        }

        Ok(changed)
    }
}

// --- POLÍTICA DE MERGE ---

// Um registro lógico a partir de até dois físicos do MESMO tenant.
// Presente nos dois lados: perfil da identidade (auto-declarado),
// estatísticas no máximo dos dois. As partições espelham um único histórico
// de pedidos; somar contaria em dobro.
fn merge_pair(
    admin: Option<&AdminCustomer>,
    identity: Option<&CustomerIdentity>,
) -> CustomerRecord {
    match (admin, identity) {
        (Some(admin), Some(identity)) => {
            let total_orders = admin.total_orders.max(identity.total_orders);
            let total_spent = admin.total_spent.max(identity.total_spent);
            CustomerRecord {
                tenant_id: admin.tenant_id.clone(),
                email: admin.email.clone(),
                name: identity.name.clone(),
                phone: identity.phone.clone(),
                address: identity.address.clone(),
                total_orders,
                total_spent,
                average_order_value: average_order_value(total_spent, total_orders),
                loyalty_tier: LoyaltyTier::from_total_spent(total_spent),
                status: identity.status,
                provenance: Provenance::Both,
                last_order_date: later(admin.last_order_date, identity.last_order_date),
                created_at: admin.created_at.min(identity.created_at),
            }
        }
        (Some(admin), None) => CustomerRecord {
            tenant_id: admin.tenant_id.clone(),
            email: admin.email.clone(),
            name: admin.name.clone(),
            phone: admin.phone.clone(),
            address: admin.address.clone(),
            total_orders: admin.total_orders,
            total_spent: admin.total_spent,
            average_order_value: average_order_value(admin.total_spent, admin.total_orders),
            loyalty_tier: LoyaltyTier::from_total_spent(admin.total_spent),
            status: admin.status,
            // O espelho criado pela reconciliação preserva a origem real
            provenance: match admin.source {
                IntakeSource::Admin => Provenance::Admin,
                IntakeSource::Storefront => Provenance::Storefront,
            },
            last_order_date: admin.last_order_date,
            created_at: admin.created_at,
        },
        (None, Some(identity)) => CustomerRecord {
            tenant_id: identity.tenant_id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            phone: identity.phone.clone(),
            address: identity.address.clone(),
            total_orders: identity.total_orders,
            total_spent: identity.total_spent,
            average_order_value: average_order_value(identity.total_spent, identity.total_orders),
            loyalty_tier: LoyaltyTier::from_total_spent(identity.total_spent),
            status: identity.status,
            provenance: Provenance::Storefront,
            last_order_date: identity.last_order_date,
            created_at: identity.created_at,
        },
        (None, None) => unreachable!("merge_pair só é chamado com ao menos um lado"),
    }
}

// Espelho admin de uma identidade órfã do storefront. Marca source =
// storefront para a proveniência sobreviver ao backfill.
fn mirror_of(identity: &CustomerIdentity) -> AdminCustomer {
    AdminCustomer {
        id: Uuid::new_v4(),
        tenant_id: identity.tenant_id.clone(),
        name: identity.name.clone(),
        email: identity.email.clone(),
        phone: identity.phone.clone(),
        address: identity.address.clone(),
        total_orders: identity.total_orders,
        total_spent: identity.total_spent,
        average_order_value: average_order_value(identity.total_spent, identity.total_orders),
        loyalty_tier: LoyaltyTier::from_total_spent(identity.total_spent),
        status: identity.status,
        source: IntakeSource::Storefront,
        last_order_date: identity.last_order_date,
        created_at: identity.created_at,
        updated_at: Utc::now(),
    }
}

// Estatísticas divergentes e não-zeradas dos dois lados: a política "máximo"
// resolve o valor, mas a divergência em si é sinal de escrita fora do fluxo
// e precisa aparecer no relatório.
fn stats_conflict(
    admin: &AdminCustomer,
    identity: &CustomerIdentity,
) -> Option<ReconciliationConflict> {
    let spent_diverges = admin.total_spent != identity.total_spent
        && !admin.total_spent.is_zero()
        && !identity.total_spent.is_zero();
    let orders_diverge = admin.total_orders != identity.total_orders
        && admin.total_orders > 0
        && identity.total_orders > 0;

    if spent_diverges || orders_diverge {
        Some(ReconciliationConflict {
            email: admin.email.clone(),
            reason: format!(
                "estatísticas divergentes: admin {}x/{} vs storefront {}x/{}",
                admin.total_orders, admin.total_spent, identity.total_orders, identity.total_spent
            ),
        })
    } else {
        None
    }
}

fn later(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
