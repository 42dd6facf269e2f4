pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use application::auth_service::AuthService;
use application::order_service::OrderService;
use config::Config;
use domain::errors::DomainError;
use domain::ports::OrderSources;
use domain::session::SessionStore;
use infrastructure::session_store::InMemorySessionStore;
use infrastructure::upstream::HttpOrderSources;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::get_all_orders,
        handlers::orders::get_order_stats,
        handlers::auth::login,
        handlers::auth::current_session,
        handlers::auth::logout,
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "orders", description = "Orders merged from the storefront and content-management services"),
        (name = "auth", description = "Admin sessions"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// Shared services handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub orders: web::Data<OrderService>,
    pub auth: web::Data<AuthService>,
}

impl AppState {
    pub fn new(sources: Arc<dyn OrderSources>, auth: AuthService) -> Self {
        Self {
            orders: web::Data::new(OrderService::new(sources)),
            auth: web::Data::new(auth),
        }
    }

    /// Wire the HTTP upstreams and the in-memory session store from `config`.
    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        let sources = HttpOrderSources::new(&config.upstream_origin, config.upstream_timeout)?;
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::default());
        let auth = AuthService::new(config.admin.clone(), sessions, config.session_ttl);
        Ok(Self::new(Arc::new(sources), auth))
    }
}

/// Register the API routes, their state and the OpenAPI UI.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(state.orders)
            .app_data(state.auth)
            .service(
                web::scope("/api")
                    .route("/get-all-orders", web::get().to(handlers::orders::get_all_orders))
                    .route("/order-stats", web::get().to(handlers::orders::get_order_stats))
                    .service(
                        web::scope("/auth")
                            .route("/login", web::post().to(handlers::auth::login))
                            .route("/session", web::get().to(handlers::auth::current_session))
                            .route("/logout", web::post().to(handlers::auth::logout)),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            );
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or spawning) the returned
/// server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(configure(state.clone()))
    })
    .bind((host.to_string(), port))?
    .run())
}
