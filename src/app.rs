use axum::{
    extract::State,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::database::manager;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::require_auth;
use crate::state::AppState;

/// Assemble the full router. Everything outside `/`, `/health` and
/// `/auth/*` requires an authenticated user.
pub fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .merge(user_routes())
        .merge(company_routes())
        .merge(supplier_routes())
        .merge(document_routes())
        .merge(invoice_routes())
        .merge(payment_routes())
        .merge(dashboard_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(protected_routes)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy from configuration: disabled entirely, wildcard, or an
/// explicit origin allowlist.
fn cors_layer() -> CorsLayer {
    let security = &config::config().security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

fn auth_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/users", get(users::list))
        .route("/users/me", get(users::me).put(users::update_me))
        .route("/users/accountants", get(users::list_accountants))
        .route(
            "/users/:id",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/users/:id/password", patch(users::reset_password))
}

fn company_routes() -> Router<AppState> {
    use protected::companies;

    Router::new()
        .route("/companies", post(companies::create).get(companies::list))
        .route(
            "/companies/assign-accountant",
            post(companies::assign_accountant),
        )
        .route(
            "/companies/:id",
            get(companies::get)
                .put(companies::update)
                .delete(companies::delete),
        )
}

fn supplier_routes() -> Router<AppState> {
    use protected::suppliers;

    Router::new()
        .route("/suppliers", post(suppliers::create).get(suppliers::list))
        .route(
            "/suppliers/assign-to-companies",
            post(suppliers::assign_to_companies),
        )
        .route(
            "/suppliers/company/:company_id",
            get(suppliers::list_for_company),
        )
        .route(
            "/suppliers/company/:company_id/supplier/:supplier_id",
            delete(suppliers::remove_from_company),
        )
        .route(
            "/suppliers/:id",
            get(suppliers::get)
                .put(suppliers::update)
                .delete(suppliers::delete),
        )
}

fn document_routes() -> Router<AppState> {
    use protected::documents;

    Router::new()
        .route("/documents", post(documents::create).get(documents::list))
        .route("/documents/upload", post(documents::upload))
        .route(
            "/documents/:id",
            get(documents::get)
                .put(documents::update)
                .delete(documents::delete),
        )
        .route("/documents/:id/status", patch(documents::set_status))
}

fn invoice_routes() -> Router<AppState> {
    use protected::invoices;

    Router::new()
        .route("/invoices", post(invoices::create).get(invoices::list))
        .route(
            "/invoices/document/:document_id",
            get(invoices::list_for_document),
        )
        .route(
            "/invoices/category/:category",
            get(invoices::list_for_category),
        )
        .route(
            "/invoices/:id",
            get(invoices::get)
                .put(invoices::update)
                .delete(invoices::delete),
        )
}

fn payment_routes() -> Router<AppState> {
    use protected::payments;

    Router::new()
        .route("/payments", post(payments::create).get(payments::list))
        .route("/payments/ref/:ref_no", get(payments::get_by_ref))
        .route(
            "/payments/date-range/:start_date/:end_date",
            get(payments::list_date_range),
        )
        .route("/payments/summary/total", get(payments::summary))
        .route(
            "/payments/:id",
            get(payments::get)
                .put(payments::update)
                .delete(payments::delete),
        )
}

fn dashboard_routes() -> Router<AppState> {
    use protected::dashboard;

    Router::new()
        .route("/dashboard/data", get(dashboard::data))
        .route("/dashboard/transactions", get(dashboard::transactions))
}

/// GET / - Service banner
async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "ledgerdesk",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/auth",
                "users": "/users",
                "companies": "/companies",
                "suppliers": "/suppliers",
                "documents": "/documents",
                "invoices": "/invoices",
                "payments": "/payments",
                "dashboard": "/dashboard",
            }
        }
    }))
}

/// GET /health - Liveness plus a database ping
async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Err(e) = manager::health_check(&state.pool).await {
        tracing::error!("health check failed: {}", e);
        return Err(ApiError::service_unavailable("Database unavailable"));
    }

    Ok(Json(json!({
        "success": true,
        "data": {"status": "healthy", "database": "connected"}
    })))
}
