// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Forma canônica do slug público (subdomínio da vitrine).
/// O banco só guarda slugs canônicos; comparação nunca depende de regex.
pub fn canonical_slug(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// ---
// Tenant (a "Loja")
// ---
// A conta do dono do dispensário. É a unidade de isolamento de dados:
// todo registro de cliente carrega o id do tenant dono.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    // ID opaco herdado do legado (nem sempre é UUID)
    pub id: String,
    pub slug: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_slug_normalizes() {
        assert_eq!(canonical_slug("  Valley-Dispensary "), "valley-dispensary");
        assert_eq!(canonical_slug("acme"), "acme");
    }
}
