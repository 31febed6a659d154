//! REST endpoints describing what the bridge serves.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chatext::booking::Catalog;
use chatext::ext::{ExtensionDescriptor, ExtensionSet};

/// Shared application state for the REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub extensions: Arc<ExtensionSet>,
    pub catalog: Arc<Catalog>,
}

/// GET /api/extensions: registered extensions in dispatch order.
pub async fn get_extensions(State(app): State<AppState>) -> Json<Vec<ExtensionDescriptor>> {
    Json(app.extensions.descriptors())
}

/// GET /api/catalog: dealerships, vehicles, time slots and form copy.
pub async fn get_catalog(State(app): State<AppState>) -> Json<Catalog> {
    Json(app.catalog.as_ref().clone())
}
