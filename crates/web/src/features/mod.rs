pub mod calculator;

use axum::Router;
use storage::Database;

use crate::middleware::auth::ApiKeys;

pub fn router(api_keys: ApiKeys) -> Router<Database> {
    Router::new().nest("/api/calculator", calculator::routes::routes(api_keys))
}
