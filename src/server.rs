//! # Server Configuration
//!
//! Router assembly, shared application state and the OpenAPI document.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;
use crate::session::SessionStore;
use crate::telemetry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Sessions
        .route("/login", post(handlers::auth::login))
        .route("/admin-login", post(handlers::auth::admin_login))
        .route("/logout", post(handlers::auth::logout))
        // Customers
        .route(
            "/api/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/api/customers/{id}",
            put(handlers::customers::update_customer).delete(handlers::customers::delete_customer),
        )
        .route(
            "/api/customers/{id}/field",
            put(handlers::customers::update_customer_field),
        )
        .route(
            "/api/customers/{id}/memo",
            put(handlers::customers::update_customer_memo),
        )
        // Residential board
        .route(
            "/api/links",
            get(handlers::boards::list_links).post(handlers::boards::create_link),
        )
        .route(
            "/api/links/{id}",
            put(handlers::boards::update_link).delete(handlers::boards::delete_link),
        )
        // Commercial board
        .route(
            "/api/office-links",
            get(handlers::boards::list_office_links).post(handlers::boards::create_office_link),
        )
        .route(
            "/api/office-links/{id}",
            put(handlers::boards::update_office_link)
                .delete(handlers::boards::delete_office_link),
        )
        // Customer-facing pages
        .route(
            "/customer/{management_site_id}",
            get(handlers::customer_site::residential_page),
        )
        .route(
            "/business/customer/{management_site_id}",
            get(handlers::customer_site::commercial_page),
        )
        .route(
            "/api/mark-residence-likes-checked",
            post(handlers::customer_site::mark_residence_checked),
        )
        .route(
            "/api/mark-business-likes-checked",
            post(handlers::customer_site::mark_business_checked),
        )
        .route(
            "/api/employee/unchecked-likes",
            get(handlers::customer_site::unchecked_likes),
        )
        // Employees
        .route(
            "/api/employees",
            get(handlers::employees::list_employees).post(handlers::employees::create_employee),
        )
        .route(
            "/api/employees/{id}",
            delete(handlers::employees::delete_employee),
        )
        .route(
            "/api/employees/{id}/deactivate",
            put(handlers::employees::deactivate_employee),
        )
        .route(
            "/api/employees/{id}/activate",
            put(handlers::employees::activate_employee),
        )
        .route(
            "/api/employees/{id}/reset-password",
            put(handlers::employees::reset_employee_password),
        )
        .route(
            "/api/employees/{id}/update",
            put(handlers::employees::update_employee),
        )
        .route(
            "/api/employees/{id}/permanent-delete",
            delete(handlers::employees::permanent_delete_employee),
        )
        // Teams
        .route(
            "/api/teams",
            get(handlers::teams::list_teams).post(handlers::teams::create_team),
        )
        .route("/api/teams/{name}", delete(handlers::teams::delete_team))
        // Guarantee insurance
        .route("/api/guarantee-list", get(handlers::guarantee::guarantee_list))
        .route("/api/guarantee-log", post(handlers::guarantee::guarantee_log))
        .route(
            "/api/guarantee-insurance-reset",
            post(handlers::guarantee::guarantee_reset),
        )
        .route(
            "/admin/guarantee-delete/{id}",
            post(handlers::guarantee::guarantee_delete),
        )
        .route(
            "/admin/guarantee-log",
            get(handlers::guarantee::guarantee_click_log),
        )
        // Maintenance
        .route("/api/backup", get(handlers::backup::backup))
        .route("/api/restore", post(handlers::backup::restore))
        .route(
            "/api/admin/cleanup-customer-links/{management_site_id}",
            delete(handlers::backup::cleanup_customer_links),
        )
        .route(
            "/api/customer_info",
            get(handlers::backup::get_customer_info).post(handlers::backup::update_customer_info),
        )
        .layer(middleware::from_fn(telemetry::trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    // Resolve the configured bind address
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let state = AppState::new(db, config);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Server listening on: {}", addr);
    println!("Running in profile: {}", profile);

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::auth::login,
        crate::handlers::auth::admin_login,
        crate::handlers::auth::logout,
        crate::handlers::customers::list_customers,
        crate::handlers::customers::create_customer,
        crate::handlers::customers::update_customer,
        crate::handlers::customers::update_customer_field,
        crate::handlers::customers::update_customer_memo,
        crate::handlers::customers::delete_customer,
        crate::handlers::boards::list_links,
        crate::handlers::boards::create_link,
        crate::handlers::boards::update_link,
        crate::handlers::boards::delete_link,
        crate::handlers::boards::list_office_links,
        crate::handlers::boards::create_office_link,
        crate::handlers::boards::update_office_link,
        crate::handlers::boards::delete_office_link,
        crate::handlers::customer_site::residential_page,
        crate::handlers::customer_site::commercial_page,
        crate::handlers::customer_site::mark_residence_checked,
        crate::handlers::customer_site::mark_business_checked,
        crate::handlers::customer_site::unchecked_likes,
        crate::handlers::employees::list_employees,
        crate::handlers::employees::create_employee,
        crate::handlers::employees::delete_employee,
        crate::handlers::employees::deactivate_employee,
        crate::handlers::employees::activate_employee,
        crate::handlers::employees::reset_employee_password,
        crate::handlers::employees::update_employee,
        crate::handlers::employees::permanent_delete_employee,
        crate::handlers::teams::list_teams,
        crate::handlers::teams::create_team,
        crate::handlers::teams::delete_team,
        crate::handlers::guarantee::guarantee_list,
        crate::handlers::guarantee::guarantee_log,
        crate::handlers::guarantee::guarantee_reset,
        crate::handlers::guarantee::guarantee_delete,
        crate::handlers::guarantee::guarantee_click_log,
        crate::handlers::backup::backup,
        crate::handlers::backup::restore,
        crate::handlers::backup::cleanup_customer_links,
        crate::handlers::backup::get_customer_info,
        crate::handlers::backup::update_customer_info,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::AdminLoginRequest,
            crate::handlers::auth::LoginResponse,
            crate::handlers::customers::CustomerView,
            crate::handlers::customers::CustomerListResponse,
            crate::handlers::customers::CreateCustomerBody,
            crate::handlers::customers::CustomerResponse,
            crate::handlers::customers::FieldUpdateBody,
            crate::handlers::customers::MemoUpdateBody,
            crate::repositories::board::BoardEntry,
            crate::handlers::boards::CreateBoardEntryBody,
            crate::handlers::boards::UpdateBoardEntryBody,
            crate::handlers::boards::NumberedEntry,
            crate::handlers::boards::BoardListResponse,
            crate::handlers::boards::BoardEntryResponse,
            crate::handlers::customer_site::CustomerHeader,
            crate::handlers::customer_site::CustomerPageResponse,
            crate::handlers::customer_site::MarkCheckedBody,
            crate::handlers::employees::EmployeeView,
            crate::handlers::employees::EmployeeListResponse,
            crate::handlers::employees::EmployeeResponse,
            crate::handlers::employees::CreateEmployeeBody,
            crate::handlers::employees::UpdateEmployeeBody,
            crate::handlers::teams::TeamView,
            crate::handlers::teams::TeamListResponse,
            crate::handlers::teams::CreateTeamBody,
            crate::handlers::guarantee::GuaranteeListResponse,
            crate::handlers::guarantee::GuaranteeResetBody,
            crate::handlers::guarantee::GuaranteeLogBody,
            crate::handlers::backup::BackupPayload,
            crate::handlers::backup::BannerInfo,
            crate::handlers::backup::BannerUpdateBody,
        )
    ),
    info(
        title = "Back Office API",
        description = "Customer engagement API for the agency back office",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
