//src/main.rs

use axum::{
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Sessão do painel (login/logout)
    let admin_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout));

    // Proxy do catálogo de veículos (público, alimenta o formulário)
    let vehicle_routes = Router::new()
        .route("/makes", get(handlers::vehicles::list_makes))
        .route("/models", get(handlers::vehicles::list_models));

    // O POST é o formulário público do site; o GET e o PATCH são do painel
    // (a guarda de sessão fica no extrator AdminSession de cada handler)
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/leads",
            post(handlers::leads::submit_lead).get(handlers::leads::list_leads),
        )
        .route("/api/leads/{id}", patch(handlers::leads::update_lead))
        .route("/api/lead-stats", get(handlers::marketing::lead_stats))
        .route(
            "/api/marketing-campaigns",
            get(handlers::campaigns::list_campaigns).post(handlers::campaigns::create_campaign),
        )
        .route(
            "/api/marketing-campaigns/{id}",
            patch(handlers::campaigns::update_campaign)
                .delete(handlers::campaigns::delete_campaign),
        )
        .route(
            "/api/marketing/dashboard",
            get(handlers::marketing::dashboard),
        )
        .nest("/api/admin", admin_routes)
        .nest("/api/vehicles", vehicle_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
