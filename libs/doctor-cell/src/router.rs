use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use shared_config::AppConfig;

use crate::handlers;
use crate::services::directory::DoctorDirectory;

pub fn doctor_routes(config: Arc<AppConfig>) -> Router {
    let directory = Arc::new(DoctorDirectory::new(&config));

    // Static segments take priority over /{doctor_id}
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/specialties", get(handlers::list_specialties))
        .route("/suggestions", get(handlers::suggest_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .with_state(directory)
}
