use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use kiezplaces::api;
use kiezplaces::engine::{Engine, EngineConfig};
use kiezplaces::loader;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const DISTRICTS: &str = "\
postcode,district
12524,Treptow-Köpenick
10961,Friedrichshain-Kreuzberg
";

const STREETS: &str = "\
id,name,cluster,postcode,lat,lon,length
1,Elisabeth-Feller-Weg,1,12524,52.51,13.43,10
3,Aalemannufer,1,10961,52.57,13.21,1000
";

const LOCATIONS: &str = "\
id,type,name,street_id,house_number,postcode,lat,lon
4,restaurant,Strandlust,1,3a,12524,52.37,13.65
";

const HOUSENUMBERS: &str = "\
id,street_id,house_number,postcode,lat,lon
5,1,1,12524,52.41,13.57
";

fn app() -> Router {
    let corpus = loader::load(
        DISTRICTS.as_bytes(),
        STREETS.as_bytes(),
        LOCATIONS.as_bytes(),
        HOUSENUMBERS.as_bytes(),
    )
    .expect("fixture corpus should load");
    api::router(Arc::new(Engine::new(corpus, EngineConfig::default())))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_completions_for_an_exact_street() {
    let (status, json) = get(app(), "/places?text=Aalemannufer").await;
    assert_eq!(status, StatusCode::OK);

    let results = json.as_array().expect("JSON array");
    assert!(!results.is_empty());
    assert_eq!(results[0]["distance"], 0);
    assert_eq!(results[0]["place"]["name"], "Aalemannufer");
    assert_eq!(results[0]["place"]["class"], "street");
    assert_eq!(results[0]["place"]["length"], 1000);
}

#[tokio::test]
async fn test_missing_or_empty_text_is_bad_request() {
    let (status, _) = get(app(), "/places").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(app(), "/places?text=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_place_by_id() {
    let (status, json) = get(app(), "/places/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], 1);
    assert_eq!(json["class"], "street");
    assert_eq!(json["postcode"], "12524");
    assert_eq!(json["district"], "Treptow-Köpenick");
}

#[tokio::test]
async fn test_place_by_id_narrowed_by_house_number() {
    let (status, json) = get(app(), "/places/1?houseNumber=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["class"], "houseNumber");
    assert_eq!(json["houseNumber"], "1");
    assert_eq!(json["streetID"], 1);
    assert_eq!(json["street"], "Elisabeth-Feller-Weg");
}

#[tokio::test]
async fn test_unknown_id_and_house_number_are_not_found() {
    let (status, _) = get(app(), "/places/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(app(), "/places/1?houseNumber=42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_integer_id_is_bad_request() {
    let (status, _) = get(app(), "/places/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_location_json_shape() {
    let (status, json) = get(app(), "/places/4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["class"], "location");
    assert_eq!(json["type"], "restaurant");
    assert_eq!(json["street"], "Elisabeth-Feller-Weg");
    assert_eq!(json["houseNumber"], "3a");
    assert!(json.get("length").is_none());
}

#[tokio::test]
async fn test_metrics_report_corpus_and_query_counts() {
    let app = app();

    let (status, _) = get(app.clone(), "/places?text=Aalemannufer").await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["streetCount"], 2);
    assert_eq!(json["locationCount"], 1);
    assert_eq!(json["houseNumberCount"], 1);
    assert_eq!(json["queryCount"], 1);
    assert!(json["prefixCount"].as_u64().unwrap() > 0);
    assert!(json["cache"]["misses"].as_u64().is_some());
}

#[tokio::test]
async fn test_version_reports_build_metadata() {
    let (status, json) = get(app(), "/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["hash"].as_str().is_some());
}
