/// Artifact retrieval endpoint
///
/// `GET /blogs/{id}` returns a previously generated artifact, but only to
/// its owner. The lookup is by `(id, owner)` equality, so an artifact owned
/// by a different identity is indistinguishable from one that does not
/// exist: both are `404`, never `403`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use super::generate::BlogGenerationResponse;
use scribeflow_shared::auth::middleware::Identity;

/// Fetch one owned artifact
///
/// # Errors
///
/// - `400`: id is not a well-formed UUID
/// - `404`: no artifact with that id is owned by the caller
/// - `503`: store unconfigured
pub async fn get_blog(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<BlogGenerationResponse>> {
    let stores = state.stores()?;

    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid blog id".to_string()))?;

    let artifact = stores
        .artifacts
        .find_for_owner(id, identity.subject_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog not found".to_string()))?;

    Ok(Json(artifact.into()))
}
