use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    calculate, delete_calculation, get_calculation, get_profile, list_history, macros, preview,
    recalculate,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/calculate", post(calculate))
        .route("/recalculate", post(recalculate))
        .route("/profile", get(get_profile))
        .route("/history", get(list_history))
        .route(
            "/history/:calculation_id",
            get(get_calculation).delete(delete_calculation),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/preview", post(preview))
        .route("/macros", get(macros))
        .merge(protected)
}
