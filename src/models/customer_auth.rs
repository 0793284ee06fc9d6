// src/models/customer_auth.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::customer::{CustomerStatus, LoyaltyTier};

// --- REGISTRO FÍSICO (partição "storefront") ---

// Cliente que se cadastrou sozinho na vitrine pública. É o único tipo de
// registro que carrega credenciais; o hash nunca sai daqui para respostas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomerIdentity {
    pub id: Uuid,
    pub tenant_id: String,

    pub name: String,
    // Sempre na forma canônica
    pub email: String,
    pub phone: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub address: Option<String>,
    // Verificação de idade
    pub date_of_birth: Option<NaiveDate>,

    pub total_orders: i32,
    pub total_spent: Decimal,
    pub average_order_value: Decimal,
    pub loyalty_tier: LoyaltyTier,
    pub status: CustomerStatus,

    pub email_verified: bool,
    pub phone_verified: bool,

    pub last_order_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- RESPOSTA DE PERFIL (sem dados sensíveis) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub total_orders: i32,
    pub total_spent: Decimal,
    pub loyalty_tier: LoyaltyTier,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub last_order_date: Option<DateTime<Utc>>,
}

impl From<CustomerIdentity> for CustomerProfile {
    fn from(identity: CustomerIdentity) -> Self {
        Self {
            id: identity.id,
            name: identity.name,
            email: identity.email,
            phone: identity.phone,
            address: identity.address,
            total_orders: identity.total_orders,
            total_spent: identity.total_spent,
            loyalty_tier: identity.loyalty_tier,
            status: identity.status,
            created_at: identity.created_at,
            last_order_date: identity.last_order_date,
        }
    }
}

// --- JWT ---

// Claims da sessão do cliente: `sub` é o id da identidade do storefront,
// não o tenant. O vínculo com a loja vem do próprio registro.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}
