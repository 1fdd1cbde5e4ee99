use crate::api::handlers::api_info;
use crate::api::handlers::mosques::{create_mosque, get_mosque, list_mosques};
use crate::api::handlers::prayer_times::{get_prayer_times, set_manual_prayer_times};
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub fn router() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/", get(api_info))
        .route("/mosques", get(list_mosques).post(create_mosque))
        .route("/mosques/{mosque_id}", get(get_mosque))
        .route("/prayer-times", post(set_manual_prayer_times))
        .route("/prayer-times/{mosque_id}", get(get_prayer_times))
}

#[cfg(test)]
mod tests {
    use crate::api::db::memory::MemoryStore;
    use crate::api::test_support::{FakeProvider, mosque};
    use crate::state::AppState;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(store: &MemoryStore, provider: FakeProvider) -> Router {
        let store = Arc::new(store.clone());
        crate::app(AppState::new(store.clone(), store, Arc::new(provider)))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn override_body() -> Value {
        json!({
            "mosque_id": "M1",
            "date": "2025-06-01",
            "fajr": "05:10",
            "dhuhr": "12:30",
            "asr": "16:00",
            "maghrib": "19:15",
            "isha": "20:45"
        })
    }

    #[tokio::test]
    async fn health_and_api_info() {
        let store = MemoryStore::default();

        let (status, _) = send(app(&store, FakeProvider::succeeding()), get("/health")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app(&store, FakeProvider::succeeding()), get("/api")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Salah Reminder API" }));
    }

    #[tokio::test]
    async fn get_prayer_times_fetches_then_serves_cache() {
        let store = MemoryStore::with_mosques([mosque("M1", Some(21.4225), Some(39.8262))]);
        let app = app(&store, FakeProvider::succeeding());

        let (status, body) = send(
            app.clone(),
            get("/api/prayer-times/M1?date=2025-06-01"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mosque_id"], "M1");
        assert_eq!(body["date"], "2025-06-01");
        assert_eq!(body["fajr"], "04:12 (+03)");
        assert_eq!(body["isha"], "20:31 (+03)");
        assert_eq!(body["is_manual"], false);
        assert!(body["id"].is_string());
        assert!(body["created_at"].is_string());

        let (_, again) = send(app, get("/api/prayer-times/M1?date=2025-06-01")).await;
        assert_eq!(again["id"], body["id"]);
        assert_eq!(store.prayer_time_count(), 1);
    }

    #[tokio::test]
    async fn manual_override_is_served_afterwards() {
        let store = MemoryStore::with_mosques([mosque("M1", Some(21.4225), Some(39.8262))]);
        let app = app(&store, FakeProvider::succeeding());

        send(app.clone(), get("/api/prayer-times/M1?date=2025-06-01")).await;

        let (status, stored) = send(app.clone(), post_json("/api/prayer-times", &override_body())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["is_manual"], true);
        assert_eq!(stored["maghrib"], "19:15");

        let (status, resolved) = send(app, get("/api/prayer-times/M1?date=2025-06-01")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resolved, stored);
        assert_eq!(store.prayer_times_for("M1", "2025-06-01").len(), 1);
    }

    #[tokio::test]
    async fn unknown_mosque_is_404() {
        let store = MemoryStore::default();
        let (status, body) = send(
            app(&store, FakeProvider::succeeding()),
            get("/api/prayer-times/M2?date=2025-06-01"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["statusCode"], 404);
        assert_eq!(store.prayer_time_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_500() {
        let store = MemoryStore::with_mosques([mosque("M1", Some(21.4225), Some(39.8262))]);
        let (status, body) = send(
            app(&store, FakeProvider::failing()),
            get("/api/prayer-times/M1?date=2025-06-01"),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to fetch prayer times");
        assert_eq!(store.prayer_time_count(), 0);
    }

    #[tokio::test]
    async fn missing_or_malformed_date_is_400() {
        let store = MemoryStore::with_mosques([mosque("M1", Some(21.4225), Some(39.8262))]);

        for uri in [
            "/api/prayer-times/M1",
            "/api/prayer-times/M1?date=",
            "/api/prayer-times/M1?date=01-06-2025",
            "/api/prayer-times/M1?date=2025-13-01",
        ] {
            let (status, body) = send(app(&store, FakeProvider::succeeding()), get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["statusCode"], 400);
        }
        assert_eq!(store.prayer_time_count(), 0);
    }

    #[tokio::test]
    async fn invalid_manual_submission_is_400() {
        let store = MemoryStore::default();

        let mut missing_isha = override_body();
        missing_isha.as_object_mut().unwrap().remove("isha");
        let (status, body) = send(
            app(&store, FakeProvider::succeeding()),
            post_json("/api/prayer-times", &missing_isha),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "isha is required");

        let mut bad_time = override_body();
        bad_time["fajr"] = json!("dawn");
        let (status, _) = send(
            app(&store, FakeProvider::succeeding()),
            post_json("/api/prayer-times", &bad_time),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .method("POST")
            .uri("/api/prayer-times")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = send(app(&store, FakeProvider::succeeding()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(store.prayer_time_count(), 0);
    }

    #[tokio::test]
    async fn mosque_directory_routes() {
        let store = MemoryStore::with_mosques([mosque("M1", Some(21.4225), Some(39.8262))]);

        let (status, created) = send(
            app(&store, FakeProvider::succeeding()),
            post_json(
                "/api/mosques",
                &json!({
                    "name": "Al-Noor",
                    "address": "12 Crescent Road",
                    "city": "Leicester",
                    "country": "United Kingdom",
                    "latitude": 52.6369,
                    "longitude": -1.1398
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(
            app(&store, FakeProvider::succeeding()),
            get(&format!("/api/mosques/{id}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Al-Noor");
        assert_eq!(fetched["longitude"], -1.1398);

        let (status, listed) = send(app(&store, FakeProvider::succeeding()), get("/api/mosques")).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Al-Noor", "Mosque M1"]);

        let (status, _) = send(app(&store, FakeProvider::succeeding()), get("/api/mosques/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            app(&store, FakeProvider::succeeding()),
            post_json("/api/mosques", &json!({ "name": "No Address" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "address is required");
    }

    #[tokio::test]
    async fn mosque_search_filters_by_name_and_city_ignoring_case() {
        let mut leeds = mosque("L1", None, None);
        leeds.name = "al-noor masjid".into();
        leeds.city = "Leeds".into();
        let mut leicester = mosque("L2", None, None);
        leicester.name = "Abu Bakr Masjid".into();
        leicester.city = "Leicester".into();
        let store = MemoryStore::with_mosques([
            mosque("M1", Some(21.4225), Some(39.8262)),
            leeds,
            leicester,
        ]);

        let names = |body: Value| -> Vec<String> {
            body.as_array()
                .unwrap()
                .iter()
                .map(|m| m["name"].as_str().unwrap().to_string())
                .collect()
        };

        let (status, all) = send(app(&store, FakeProvider::succeeding()), get("/api/mosques")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(all), ["Abu Bakr Masjid", "al-noor masjid", "Mosque M1"]);

        let (status, found) = send(
            app(&store, FakeProvider::succeeding()),
            get("/api/mosques?search=MASJID"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(found), ["Abu Bakr Masjid", "al-noor masjid"]);

        let (_, in_city) = send(
            app(&store, FakeProvider::succeeding()),
            get("/api/mosques?city=lee"),
        )
        .await;
        assert_eq!(names(in_city), ["al-noor masjid"]);

        let (_, both) = send(
            app(&store, FakeProvider::succeeding()),
            get("/api/mosques?search=masjid&city=makkah"),
        )
        .await;
        assert!(names(both).is_empty());

        let (_, blank) = send(
            app(&store, FakeProvider::succeeding()),
            get("/api/mosques?search=&city="),
        )
        .await;
        assert_eq!(names(blank).len(), 3);
    }
}
