//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use shrinemap_places::{PlacesApi, PlacesClient, PlacesError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .with_retries(2, 0)
}

#[tokio::test]
async fn find_place_returns_first_candidate() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "candidates": [
            { "place_id": "ChIJ5SZMmreMGGARcz8QSTiJyQ8", "name": "明治神宮" },
            { "place_id": "ChIJ-other", "name": "明治神宮ミュージアム" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/findplacefromtext/json"))
        .and(query_param("input", "明治神宮 東京都渋谷区代々木神園町1-1"))
        .and(query_param("inputtype", "textquery"))
        .and(query_param("fields", "place_id,name"))
        .and(query_param("language", "ja"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidate = client
        .find_place("明治神宮 東京都渋谷区代々木神園町1-1")
        .await
        .expect("should resolve candidate");

    assert_eq!(candidate.place_id, "ChIJ5SZMmreMGGARcz8QSTiJyQ8");
    assert_eq!(candidate.name.as_deref(), Some("明治神宮"));
}

#[tokio::test]
async fn find_place_zero_results_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/findplacefromtext/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "ZERO_RESULTS", "candidates": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.find_place("nowhere").await.unwrap_err();

    assert_eq!(err.provider_status(), Some("ZERO_RESULTS"));
}

#[tokio::test]
async fn find_place_ok_without_candidates_is_no_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/findplacefromtext/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "OK", "candidates": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.find_place("empty").await.unwrap_err();

    assert!(matches!(err, PlacesError::NoCandidates { .. }));
    assert_eq!(err.provider_status(), Some("ZERO_RESULTS"));
}

#[tokio::test]
async fn request_denied_carries_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/findplacefromtext/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "candidates": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.find_place("x").await.unwrap_err();

    match err {
        PlacesError::Status {
            operation,
            status,
            message,
        } => {
            assert_eq!(operation, "findplacefromtext");
            assert_eq!(status, "REQUEST_DENIED");
            assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn place_details_remaps_fields() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "result": {
            "name": "明治神宮",
            "formatted_address": "日本、〒151-8557 東京都渋谷区代々木神園町１−１",
            "photos": [{ "photo_reference": "photo-a" }],
            "rating": 4.6,
            "user_ratings_total": 48211,
            "opening_hours": { "weekday_text": ["月曜日: 5時10分～18時00分"] },
            "url": "https://maps.google.com/?cid=123",
            "formatted_phone_number": "03-3379-5511",
            "reviews": [
                {
                    "author_name": "Hanako",
                    "text": "朝の参拝がおすすめです",
                    "relative_time_description": "2 週間前"
                }
            ]
        }
    });

    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", "ChIJ5SZMmreMGGARcz8QSTiJyQ8"))
        .and(query_param("key", "test-key"))
        .and(query_param("language", "ja"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let details = client
        .place_details("ChIJ5SZMmreMGGARcz8QSTiJyQ8")
        .await
        .expect("should parse details");

    assert_eq!(details.name.as_deref(), Some("明治神宮"));
    assert_eq!(
        details.website_url.as_deref(),
        Some("https://maps.google.com/?cid=123")
    );
    assert_eq!(details.photo_refs, ["photo-a"]);
    assert_eq!(details.rating_count, Some(48211));
    assert_eq!(details.reviews[0].relative_time, "2 週間前");
    assert!(details.location.is_none());
}

#[tokio::test]
async fn place_details_not_found_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/details/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "NOT_FOUND" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.place_details("gone").await.unwrap_err();

    assert_eq!(err.provider_status(), Some("NOT_FOUND"));
}

#[tokio::test]
async fn unknown_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/details/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "UNKNOWN_ERROR" })),
        )
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.place_details("flaky").await.unwrap_err();

    assert_eq!(err.provider_status(), Some("UNKNOWN_ERROR"));
}

#[tokio::test]
async fn http_500_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retries(0, 0);
    let err = client.find_place("x").await.unwrap_err();

    assert!(matches!(err, PlacesError::Http(_)));
    assert!(err.provider_status().is_none());
}

#[tokio::test]
async fn trait_dispatch_reaches_the_client() {
    async fn resolve<P: PlacesApi>(api: &P) -> Result<String, PlacesError> {
        Ok(api.find_place("明治神宮").await?.place_id)
    }

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/findplacefromtext/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "candidates": [{ "place_id": "pid-1" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(resolve(&client).await.unwrap(), "pid-1");
}
