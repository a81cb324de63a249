use super::types::{
    HealthResponse, ReverseSearchRequest, ReverseSearchResponse, TryOnRequest, TryOnResponse,
};
use crate::{
    Error, dataurl,
    gradio::TryOnClient,
    normalize,
    publish::{RequestOrigin, ReverseSearchPublisher},
};
use axum::{
    extract::{Host, State},
    http::HeaderMap,
    response::Json,
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub tryon: Arc<dyn TryOnClient>,
    pub publisher: Arc<ReverseSearchPublisher>,
    /// Base URL relative Space paths are resolved against.
    pub file_base_url: String,
}

pub async fn try_on(
    State(state): State<AppState>,
    Json(request): Json<TryOnRequest>,
) -> Result<Json<TryOnResponse>, Error> {
    let (Some(selfie), Some(garment)) = (request.selfie_data_url, request.garment_data_url) else {
        return Err(Error::validation("Missing selfieDataUrl or garmentDataUrl"));
    };

    let human_bytes = dataurl::decode(&selfie)?;
    let garment_bytes = dataurl::decode(&garment)?;

    info!(
        human_bytes = human_bytes.len(),
        garment_bytes = garment_bytes.len(),
        "Received try-on request"
    );

    let envelope = state.tryon.try_on(&human_bytes, &garment_bytes).await?;

    // The primary image is mandatory; a missing masked image is not.
    let result = normalize::normalize(&envelope.output_image(), &state.file_base_url)
        .ok_or_else(|| Error::NoOutputImage {
            raw: serde_json::to_value(&envelope).unwrap_or_default(),
        })?;
    let masked = normalize::normalize(&envelope.masked_image(), &state.file_base_url);

    info!("Try-on succeeded");

    Ok(Json(TryOnResponse {
        ok: true,
        result,
        masked,
    }))
}

pub async fn reverse_search(
    State(state): State<AppState>,
    Host(host): Host,
    headers: HeaderMap,
    Json(request): Json<ReverseSearchRequest>,
) -> Result<Json<ReverseSearchResponse>, Error> {
    let Some(garment) = request.garment_data_url else {
        return Err(Error::validation("Missing garmentDataUrl"));
    };

    let garment_bytes = dataurl::decode(&garment)?;
    let origin = request_origin(host, &headers);

    let published = state.publisher.publish(&garment_bytes, &origin).await?;

    info!(image_url = %published.image_url, "Published reverse-search image");

    Ok(Json(ReverseSearchResponse {
        ok: true,
        image_url: published.image_url,
        google_url: published.search_url,
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

// Scheme as observed by the client: proxies announce the original scheme in
// X-Forwarded-Proto; a direct connection to this server is plain HTTP.
fn request_origin(host: String, headers: &HeaderMap) -> RequestOrigin {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http")
        .to_string();
    RequestOrigin { scheme, host }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn origin_defaults_to_http() {
        let origin = request_origin("localhost:3000".to_string(), &HeaderMap::new());
        assert_eq!(origin.scheme, "http");
        assert_eq!(origin.host, "localhost:3000");
    }

    #[test]
    fn origin_honors_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        let origin = request_origin("tryme.example.com".to_string(), &headers);
        assert_eq!(origin.scheme, "https");
    }
}
