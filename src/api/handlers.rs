//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, TariffQuery};
use crate::config::EngineConfig;
use crate::dimension::DimensioningResult;
use crate::directory::{LookupError, RegionDirectory, TariffDirectory, TariffQuote};
use crate::project::ProjectInput;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Sizes a project. A missing energy price is resolved from the tariff
/// directory first.
///
/// `POST /dimensioning` → 200 + `DimensioningResult` JSON
/// Invalid project → 400 + `ErrorResponse`
pub async fn post_dimensioning(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<DimensioningResult>, ApiError> {
    let errors = input.validate();
    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))));
    }

    let input = input
        .with_resolved_price(&state.tariffs)
        .map_err(|e| (StatusCode::BAD_GATEWAY, Json(ErrorResponse::new(e.to_string()))))?;

    Ok(Json(state.engine.compute(&input)))
}

/// Lists the localities of a region.
///
/// `GET /regions/{region}/localities` → 200 + `Vec<String>` JSON
/// Region rejected by the directory → 404 + `ErrorResponse`
pub async fn get_localities(
    State(state): State<Arc<AppState>>,
    Path(region): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    state
        .tariffs
        .localities(&region)
        .map(Json)
        .map_err(lookup_error)
}

/// Resolves the tariff for a region and optional locality.
///
/// `GET /tariffs/{region}?locality=Name` → 200 + `TariffQuote` JSON
pub async fn get_tariff(
    State(state): State<Arc<AppState>>,
    Path(region): Path<String>,
    Query(query): Query<TariffQuery>,
) -> Result<Json<TariffQuote>, ApiError> {
    state
        .tariffs
        .tariff(&region, query.locality.as_deref())
        .map(Json)
        .map_err(lookup_error)
}

/// Returns the active engine configuration.
///
/// `GET /config` → 200 + `EngineConfig` JSON
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<EngineConfig> {
    Json(state.engine.config().clone())
}

fn lookup_error(e: LookupError) -> ApiError {
    let status = match e {
        LookupError::UnknownRegion(_) => StatusCode::NOT_FOUND,
        LookupError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(ErrorResponse::new(e.to_string())))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::dimension::Engine;
    use crate::tables::TariffTable;

    fn make_test_state() -> Arc<AppState> {
        Arc::new(AppState {
            engine: Engine::default(),
            tariffs: TariffTable::default(),
        })
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn dimensioning_returns_200() {
        let app = router(make_test_state());
        let req = Request::builder()
            .method("POST")
            .uri("/dimensioning")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"topology":"grid_tied","monthly_consumption_kwh":500.0,"energy_price_per_kwh":0.9}"#,
            ))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["solar"]["module_count"], 7);
        assert_eq!(json["topology"], "grid_tied");
    }

    #[tokio::test]
    async fn dimensioning_without_topology_returns_400() {
        let app = router(make_test_state());
        let req = Request::builder()
            .method("POST")
            .uri("/dimensioning")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"monthly_consumption_kwh":500.0}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("topology"));
    }

    #[tokio::test]
    async fn localities_unknown_region_falls_back() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/regions/XX/localities")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json, serde_json::json!([]));
    }

    #[test]
    fn lookup_errors_map_to_status() {
        let (status, Json(body)) = lookup_error(LookupError::UnknownRegion("XX".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.error.contains("XX"));

        let (status, _) = lookup_error(LookupError::Unavailable("timeout".to_string()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn tariff_with_locality() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/tariffs/rj?locality=Niter%C3%B3i")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["region"], "RJ");
        assert_eq!(json["specificity"], "locality");
        assert_eq!(json["price_per_kwh"], 1.12);
    }

    #[tokio::test]
    async fn config_returns_defaults() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/config")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["finance"]["horizon_years"], 25);
        assert_eq!(json["sizing"]["module_power_wp"], 640.0);
    }
}
