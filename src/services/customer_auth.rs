// src/services/customer_auth.rs
//
// Entrada "storefront": o cliente final se cadastra e autentica contra a
// vitrine pública de UMA loja. A senha é hasheada antes de tocar o banco;
// nunca é gravada nem logada em claro.

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{NaiveDate, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CustomerStore,
    models::customer::{CustomerStatus, LoyaltyTier, canonical_email},
    models::customer_auth::{Claims, CustomerIdentity},
    services::tenant_directory::TenantDirectory,
};

pub struct SignupData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct CustomerAuthService {
    directory: TenantDirectory,
    customers: Arc<dyn CustomerStore>,
    jwt_secret: String,
    // Validade da sessão do cliente (o legado usava 30 minutos fixos)
    token_ttl_minutes: i64,
}

impl CustomerAuthService {
    pub fn new(
        directory: TenantDirectory,
        customers: Arc<dyn CustomerStore>,
        jwt_secret: String,
        token_ttl_minutes: i64,
    ) -> Self {
        Self {
            directory,
            customers,
            jwt_secret,
            token_ttl_minutes,
        }
    }

    pub async fn signup(
        &self,
        store_slug: &str,
        data: SignupData,
    ) -> Result<(CustomerIdentity, String), AppError> {
        // Primeiro resolve a loja: cadastro sem loja válida não existe
        let tenant = self.directory.resolve_by_slug(store_slug).await?;
        let email = canonical_email(&data.email);

        if self
            .customers
            .find_identity_by_email(&tenant.id, &email)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateCustomer);
        }

        // Hashing em thread separada para não travar o runtime
        let password = data.password;
        let password_hash = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let now = Utc::now();
        let identity = CustomerIdentity {
            id: Uuid::new_v4(),
            tenant_id: tenant.id,
            name: data.name,
            email,
            phone: data.phone,
            password_hash,
            address: data.address,
            date_of_birth: data.date_of_birth,
            total_orders: 0,
            total_spent: Decimal::ZERO,
            average_order_value: Decimal::ZERO,
            loyalty_tier: LoyaltyTier::Bronze,
            status: CustomerStatus::Active,
            email_verified: false,
            phone_verified: false,
            last_order_date: None,
            created_at: now,
            updated_at: now,
        };

        self.customers.insert_identity(&identity).await?;

        let token = self.create_token(identity.id)?;
        Ok((identity, token))
    }

    pub async fn login(
        &self,
        store_slug: &str,
        email: &str,
        password: &str,
    ) -> Result<(CustomerIdentity, String), AppError> {
        let tenant = self.directory.resolve_by_slug(store_slug).await?;

        let identity = self
            .customers
            .find_identity_by_email(&tenant.id, &canonical_email(email))
            .await?;

        let Some(identity) = identity else {
            // E-mail desconhecido queima o mesmo custo de um verify, e a
            // resposta é idêntica à de senha errada: nada de oráculo de
            // enumeração de contas.
            let _ = tokio::task::spawn_blocking(|| hash("invalido", bcrypt::DEFAULT_COST)).await;
            return Err(AppError::InvalidCredentials);
        };

        let password = password.to_owned();
        let password_hash = identity.password_hash.clone();
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password, &password_hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        if identity.status != CustomerStatus::Active {
            return Err(AppError::AccountNotActive);
        }

        let token = self.create_token(identity.id)?;
        Ok((identity, token))
    }

    pub async fn validate_token(&self, token: &str) -> Result<CustomerIdentity, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let identity = self
            .customers
            .find_identity_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        // Suspensão derruba a sessão na hora, não só no próximo login
        if identity.status != CustomerStatus::Active {
            return Err(AppError::AccountNotActive);
        }

        Ok(identity)
    }

    // Atualização de perfil pelo próprio cliente: só os campos
    // auto-declarados. Credenciais e estatísticas não passam por aqui.
    pub async fn update_profile(
        &self,
        identity: CustomerIdentity,
        name: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        date_of_birth: Option<NaiveDate>,
    ) -> Result<CustomerIdentity, AppError> {
        let mut identity = identity;
        if let Some(name) = name {
            identity.name = name;
        }
        if let Some(phone) = phone {
            identity.phone = phone;
        }
        if let Some(address) = address {
            identity.address = Some(address);
        }
        if let Some(dob) = date_of_birth {
            identity.date_of_birth = Some(dob);
        }
        identity.updated_at = Utc::now();

        self.customers.update_identity(&identity).await?;
        Ok(identity)
    }

    fn create_token(&self, customer_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(self.token_ttl_minutes);

        let claims = Claims {
            sub: customer_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
