// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::customer_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas administrativas de clientes (painel da loja).
    // A loja alvo vem do cabeçalho x-tenant-id em cada requisição.
    let customer_admin_routes = Router::new()
        .route(
            "/",
            post(handlers::customers::create_customer).get(handlers::customers::list_customers),
        )
        .route("/stats/overview", get(handlers::customers::customer_stats))
        .route("/loyalty/tiers", get(handlers::customers::loyalty_tiers))
        .route("/reconcile", post(handlers::customers::reconcile));

    // Rotas públicas da sessão do cliente final
    let customer_public_routes = Router::new()
        .route("/signup", post(handlers::customer_auth::signup))
        .route("/login", post(handlers::customer_auth::login))
        .route("/logout", post(handlers::customer_auth::logout));

    // Rotas de perfil, protegidas pelo token de sessão do cliente
    let customer_session_routes = Router::new()
        .route(
            "/profile",
            get(handlers::customer_auth::get_profile)
                .put(handlers::customer_auth::update_profile),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            customer_guard,
        ));

    // Vitrine pública (resolução por slug)
    let storefront_routes = Router::new()
        .route("/{slug}", get(handlers::storefront::get_storefront))
        .route("/{slug}/available", get(handlers::storefront::slug_available))
        .route(
            "/{slug}/loyalty/tiers",
            get(handlers::storefront::storefront_loyalty_tiers),
        );

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/docs/openapi.json", get(docs::openapi_json))
        .nest("/api/customers", customer_admin_routes)
        .nest(
            "/api/customer",
            customer_public_routes.merge(customer_session_routes),
        )
        .nest("/api/storefront", storefront_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
