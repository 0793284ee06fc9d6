// src/models/customer.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- CANONICALIZAÇÃO ---

/// Forma canônica do e-mail: minúsculas, sem espaços nas pontas.
/// A chave de identidade do cliente é (tenant_id, e-mail canônico),
/// então TODA leitura e escrita passa por aqui.
pub fn canonical_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// --- ENUMS ---

// Mapeia o CREATE TYPE loyalty_tier do banco
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "loyalty_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyTier {
    /// Classificação derivada do total gasto.
    /// Faixas: bronze >= 0, silver >= 500, gold >= 1500, platinum >= 3000.
    pub fn from_total_spent(total_spent: Decimal) -> Self {
        if total_spent >= Decimal::from(3000) {
            LoyaltyTier::Platinum
        } else if total_spent >= Decimal::from(1500) {
            LoyaltyTier::Gold
        } else if total_spent >= Decimal::from(500) {
            LoyaltyTier::Silver
        } else {
            LoyaltyTier::Bronze
        }
    }

    pub fn min_spent(self) -> u32 {
        match self {
            LoyaltyTier::Bronze => 0,
            LoyaltyTier::Silver => 500,
            LoyaltyTier::Gold => 1500,
            LoyaltyTier::Platinum => 3000,
        }
    }

    /// Rótulo de desconto exibido pela vitrine (mesmos valores do legado).
    pub fn discount(self) -> &'static str {
        match self {
            LoyaltyTier::Bronze => "5%",
            LoyaltyTier::Silver => "10%",
            LoyaltyTier::Gold => "15%",
            LoyaltyTier::Platinum => "20%",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "customer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Suspended,
}

// Qual caminho de entrada gravou o registro físico
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "intake_source", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IntakeSource {
    Admin,
    Storefront,
}

// Em quais partições o cliente lógico existe (visão reconciliada)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Admin,
    Storefront,
    Both,
}

// --- REGISTRO FÍSICO (partição "admin") ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCustomer {
    pub id: Uuid,
    pub tenant_id: String,

    pub name: String,
    // Sempre na forma canônica
    pub email: String,
    pub phone: String,
    pub address: Option<String>,

    pub total_orders: i32,
    pub total_spent: Decimal,
    pub average_order_value: Decimal,
    pub loyalty_tier: LoyaltyTier,
    pub status: CustomerStatus,

    // 'storefront' quando o registro é o espelho criado pela reconciliação
    pub source: IntakeSource,

    pub last_order_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminCustomer {
    /// Recalcula os campos derivados a partir de total_orders/total_spent.
    pub fn recompute_derived(&mut self) {
        self.average_order_value = average_order_value(self.total_spent, self.total_orders);
        self.loyalty_tier = LoyaltyTier::from_total_spent(self.total_spent);
    }
}

/// Ticket médio com divisão protegida: max(total_orders, 1).
pub fn average_order_value(total_spent: Decimal, total_orders: i32) -> Decimal {
    (total_spent / Decimal::from(total_orders.max(1))).round_dp(2)
}

// --- REGISTRO LÓGICO (visão reconciliada, nunca persistido) ---

// É isto que listagem, stats e fidelidade consomem. Exatamente um por
// (tenant, e-mail canônico), não importa quantos registros físicos existam.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub tenant_id: String,
    pub email: String,

    pub name: String,
    pub phone: String,
    pub address: Option<String>,

    pub total_orders: i32,
    pub total_spent: Decimal,
    pub average_order_value: Decimal,
    pub loyalty_tier: LoyaltyTier,
    pub status: CustomerStatus,

    pub provenance: Provenance,

    pub last_order_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// --- RECONCILIAÇÃO ---

// Resultado da passada explícita de manutenção. Uma segunda execução em
// seguida tem que voltar tudo zerado (idempotência).
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub records_merged: u64,
    pub orphans_backfilled: u64,
    pub conflicts: Vec<ReconciliationConflict>,
}

// As duas partições discordam de um jeito que a política padrão de merge
// não resolve sozinha. Vai para o relatório e para o log; nunca é engolido.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationConflict {
    pub email: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn loyalty_tier_boundaries() {
        assert_eq!(LoyaltyTier::from_total_spent(dec("0")), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::from_total_spent(dec("499")), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::from_total_spent(dec("500")), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::from_total_spent(dec("1499.99")), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::from_total_spent(dec("1500")), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::from_total_spent(dec("2999.99")), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::from_total_spent(dec("3000")), LoyaltyTier::Platinum);
    }

    #[test]
    fn canonical_email_normalizes_case_and_whitespace() {
        assert_eq!(canonical_email("  Maria@Email.COM "), "maria@email.com");
        assert_eq!(canonical_email("a@x.com"), "a@x.com");
    }

    #[test]
    fn average_order_value_guards_zero_orders() {
        assert_eq!(average_order_value(dec("100"), 0), dec("100"));
        assert_eq!(average_order_value(dec("100"), 3), dec("33.33"));
    }
}
