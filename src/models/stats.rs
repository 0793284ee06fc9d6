// src/models/stats.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Visão geral de clientes do tenant, calculada sobre a visão reconciliada
// (nunca sobre contagens cruas das partições, que contariam em dobro).
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStatsOverview {
    pub total_customers: u64,
    pub active_customers: u64,
    pub avg_order_value: Decimal,
    pub repeat_customer_count: u64,
    pub repeat_customer_percentage: f64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TierBucket {
    pub count: u64,
    pub min_spent: u32,
    pub discount: String,
}

// Mesmo formato do endpoint legado de fidelidade: um balde por faixa.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyDistribution {
    pub bronze: TierBucket,
    pub silver: TierBucket,
    pub gold: TierBucket,
    pub platinum: TierBucket,
}
