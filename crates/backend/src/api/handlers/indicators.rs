use axum::Json;
use contracts::shared::indicators::*;

use crate::shared::indicators::metadata;

/// GET /api/indicators/meta
///
/// Returns the full catalogue of available indicators and sets.
pub async fn get_indicator_catalog() -> Json<IndicatorCatalogResponse> {
    Json(metadata::build_catalog())
}
