pub mod app;
pub mod app_state;
pub mod category_handlers;
pub mod config;
pub mod credentials;
pub mod identity;
pub mod metrics;
pub mod models;
pub mod product_handlers;
pub mod store;
pub mod user_handlers;

pub use app::build_router;
pub use app_state::AppState;
pub use common_http_errors::ApiError;
