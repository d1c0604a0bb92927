//! Integration tests for `build_dashboard`: per-city isolation of failures and
//! the combined map, driven against a `wiremock` stand-in for the weather API.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cityweather_core::{AccuWeatherClient, ApiSettings, CityPanel, build_dashboard};

fn test_client(server: &MockServer) -> AccuWeatherClient {
    let settings = ApiSettings {
        base_url: server.uri(),
        timeout_secs: 2,
        ..ApiSettings::default()
    };
    AccuWeatherClient::new("TEST_KEY", &settings).expect("failed to build test client")
}

fn daily(date: &str, min: f64, max: f64) -> Value {
    json!({
        "Date": format!("{date}T07:00:00+03:00"),
        "Temperature": {"Minimum": {"Value": min}, "Maximum": {"Value": max}},
        "Day": {"Wind": {"Speed": {"Value": 9.3}}, "PrecipitationProbability": 40}
    })
}

async fn mount_city(server: &MockServer, city: &str, key: &str, lat: f64, lon: f64) {
    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .and(query_param("q", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Key": key, "GeoPosition": {"Latitude": lat, "Longitude": lon}}
        ])))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, key: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/forecasts/v1/daily/5day/{key}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "DailyForecasts": [
                daily("2024-05-01", 10.0, 20.0),
                daily("2024-05-02", 11.0, 21.0),
                daily("2024-05-03", 12.0, 22.0),
                daily("2024-05-04", 13.0, 23.0),
                daily("2024-05-05", 14.0, 24.0)
            ]
        })))
        .mount(server)
        .await;
}

fn cities(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn unknown_city_is_isolated_from_the_others() {
    let server = MockServer::start().await;
    mount_city(&server, "Moscow", "294021", 55.75, 37.62).await;
    mount_city(&server, "Kazan", "295954", 55.79, 49.12).await;
    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .and(query_param("q", "Nowhereville"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    mount_forecast(&server, "294021").await;
    mount_forecast(&server, "295954").await;

    let dash = build_dashboard(
        &test_client(&server),
        &cities(&["Moscow", "Nowhereville", "Kazan"]),
        3,
    )
    .await;

    assert_eq!(dash.days, 3);
    let order: Vec<&str> = dash.panels.iter().map(CityPanel::city).collect();
    assert_eq!(order, vec!["Moscow", "Nowhereville", "Kazan"]);

    match &dash.panels[0] {
        CityPanel::Ready { forecast, chart, .. } => {
            assert_eq!(forecast.dates, vec!["2024-05-01", "2024-05-02", "2024-05-03"]);
            assert_eq!(chart.layout.title.text, "Forecast: Moscow");
        }
        other => panic!("expected Moscow to render, got {other:?}"),
    }
    match &dash.panels[1] {
        CityPanel::Failed { message, .. } => {
            assert!(message.contains("Nowhereville"), "message: {message}")
        }
        other => panic!("expected Nowhereville to fail, got {other:?}"),
    }
    assert!(matches!(dash.panels[2], CityPanel::Ready { .. }));

    let names: Vec<&str> = dash.locations.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Moscow", "Kazan"]);

    let map = serde_json::to_value(dash.map.expect("map present")).expect("serialize");
    assert_eq!(map["data"][0]["text"], json!(["Moscow", "Kazan"]));
    assert_eq!(map["data"][0]["lat"], json!([55.75, 55.79]));
}

#[tokio::test]
async fn resolved_city_stays_on_map_when_forecast_fails() {
    let server = MockServer::start().await;
    mount_city(&server, "Moscow", "294021", 55.75, 37.62).await;
    Mock::given(method("GET"))
        .and(path("/forecasts/v1/daily/5day/294021"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dash = build_dashboard(&test_client(&server), &cities(&["Moscow"]), 5).await;

    assert!(matches!(dash.panels[0], CityPanel::Failed { .. }));
    assert_eq!(dash.locations.len(), 1);
    assert!(dash.map.is_some());
}

#[tokio::test]
async fn invalid_horizon_fails_each_city_after_resolving() {
    let server = MockServer::start().await;
    mount_city(&server, "Moscow", "294021", 55.75, 37.62).await;
    Mock::given(method("GET"))
        .and(path("/forecasts/v1/daily/5day/294021"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dash = build_dashboard(&test_client(&server), &cities(&["Moscow"]), 4).await;

    match &dash.panels[0] {
        CityPanel::Failed { message, .. } => assert!(message.contains("1, 3 or 5")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(dash.locations.len(), 1);
}

#[tokio::test]
async fn no_resolved_city_means_no_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let dash = build_dashboard(&test_client(&server), &cities(&["Nowhereville"]), 1).await;

    assert!(dash.map.is_none());
    assert!(dash.locations.is_empty());
    assert_eq!(dash.panels.len(), 1);
}

#[tokio::test]
async fn empty_city_list_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dash = build_dashboard(&test_client(&server), &[], 3).await;

    assert!(dash.panels.is_empty());
    assert!(dash.map.is_none());
}

#[tokio::test]
async fn non_object_search_result_keeps_city_off_the_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([null])))
        .mount(&server)
        .await;

    let dash = build_dashboard(&test_client(&server), &cities(&["Moscow"]), 3).await;

    match &dash.panels[0] {
        CityPanel::Failed { message, .. } => {
            assert!(message.contains("malformed response"), "message: {message}")
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(dash.locations.is_empty());
    assert!(dash.map.is_none());
}
