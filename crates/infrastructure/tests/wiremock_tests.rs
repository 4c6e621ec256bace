//! End-to-end tests: configured services against wiremock backends

use domain::{Edge, GeoPoint, Node, NodeType, OptimizationObjective, RoutePreference, TransportMode};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use infrastructure::{AppConfig, Services};
use integration_routing::{NominatimConfig, RoutingConfig};

fn config_for(routing: &MockServer, geocoding: &MockServer) -> AppConfig {
    AppConfig {
        routing: RoutingConfig {
            base_url: routing.uri(),
            ..RoutingConfig::for_testing()
        },
        geocoding: NominatimConfig {
            base_url: geocoding.uri(),
            ..NominatimConfig::for_testing()
        },
        ..AppConfig::default()
    }
}

fn majestic() -> GeoPoint {
    GeoPoint::new(12.9767, 77.5713).unwrap()
}

fn whitefield() -> GeoPoint {
    GeoPoint::new(12.9698, 77.75).unwrap()
}

// 20 km in 30 minutes
const DIRECTIONS: &str = r#"{
    "routes": [{
        "summary": { "distance": 20000.0, "duration": 1800.0 },
        "geometry": { "coordinates": [[77.5713, 12.9767], [77.66, 12.973], [77.75, 12.9698]] },
        "segments": [{
            "distance": 20000.0,
            "duration": 1800.0,
            "steps": [
                { "instruction": "Head east on Old Airport Road", "distance": 10000.0, "duration": 900.0, "way_points": [0, 1] },
                { "instruction": "Arrive at destination", "distance": 10000.0, "duration": 900.0, "way_points": [1, 2] }
            ]
        }]
    }]
}"#;

#[tokio::test]
async fn backend_route_is_costed_with_surcharge() {
    let routing = MockServer::start().await;
    let geocoding = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/directions/driving-car"))
        .and(query_param("preference", "shortest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DIRECTIONS))
        .expect(1)
        .mount(&routing)
        .await;

    let services = Services::from_config(&config_for(&routing, &geocoding)).unwrap();
    let outcome = services
        .routes
        .calculate_route(
            majestic(),
            whitefield(),
            TransportMode::LightCommercialVehicle,
            RoutePreference::Shortest,
        )
        .await;

    assert!(!outcome.is_fallback());
    let route = outcome.route();
    // 20 km * 15 + 0.5 h * 50
    assert!((route.cost - 325.0).abs() < f64::EPSILON);
    assert_eq!(route.geometry.len(), 3);
    assert_eq!(route.segments.len(), 2);
    assert_eq!(route.segments[0].instructions, vec!["Head east on Old Airport Road"]);
    assert_eq!(route.segments[0].geometry, route.geometry[0..=1].to_vec());
    assert_eq!(route.segments[1].geometry, route.geometry[1..=2].to_vec());
}

#[tokio::test]
async fn backend_outage_yields_straight_line_route() {
    let routing = MockServer::start().await;
    let geocoding = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/v2/directions/.*"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&routing)
        .await;

    let services = Services::from_config(&config_for(&routing, &geocoding)).unwrap();
    let outcome = services
        .routes
        .calculate_route(
            majestic(),
            whitefield(),
            TransportMode::HeavyGoodsVehicle,
            RoutePreference::Recommended,
        )
        .await;

    assert!(outcome.is_fallback());
    let route = outcome.route();
    let km = majestic().distance_km(&whitefield());
    assert_eq!(route.geometry, vec![majestic(), whitefield()]);
    assert!((route.cost - (km * 25.0).round()).abs() < f64::EPSILON);
}

#[tokio::test]
async fn optimizer_recommends_cheapest_mode() {
    let routing = MockServer::start().await;
    let geocoding = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/v2/directions/.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DIRECTIONS))
        .expect(4)
        .mount(&routing)
        .await;

    let services = Services::from_config(&config_for(&routing, &geocoding)).unwrap();
    let nodes = vec![
        Node::new("n1", "Majestic", NodeType::Warehouse, 12.9767, 77.5713).unwrap(),
        Node::new("n2", "Whitefield", NodeType::Customer, 12.9698, 77.75).unwrap(),
    ];
    let edges = vec![
        Edge::new("e1", "Majestic", "Whitefield", 20.0, 0.5, 525.0)
            .unwrap()
            .with_mode(TransportMode::HeavyGoodsVehicle),
    ];

    let report = services
        .optimizer
        .optimize_transport_modes(&edges, &nodes, OptimizationObjective::Cost)
        .await;

    assert_eq!(report.recommendations.len(), 1);
    let recommendation = &report.recommendations[0];
    assert_eq!(recommendation.recommended_mode, TransportMode::WalkingDelivery);
    // HGV: 20 * 25 + 0.5 * 50 = 525; walking: 20 * 1 + 0.5 * 50 = 45
    assert!((recommendation.cost_delta - 480.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn geocode_hits_backend_once() {
    let routing = MockServer::start().await;
    let geocoding = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Forum Mall"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[
                {
                    "place_id": 101,
                    "lat": "12.9346",
                    "lon": "77.6113",
                    "display_name": "Forum Mall, Koramangala, Bengaluru",
                    "address": { "road": "Hosur Road", "city": "Bengaluru" },
                    "importance": 0.5,
                    "type": "mall"
                },
                {
                    "place_id": 102,
                    "lat": "12.9141",
                    "lon": "74.8560",
                    "display_name": "Forum Fiza Mall, Mangaluru",
                    "address": { "city": "Mangaluru" },
                    "importance": 0.3,
                    "type": "mall"
                }
            ]"#,
        ))
        .expect(1)
        .mount(&geocoding)
        .await;

    let services = Services::from_config(&config_for(&routing, &geocoding)).unwrap();
    let options = services.geocoder.default_options();

    let first = services.geocoder.geocode("Forum Mall", options).await;
    let second = services.geocoder.geocode("  Forum Mall ", options).await;

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].place_id, 101);
    assert_eq!(first, second);
}

#[tokio::test]
async fn suggestions_for_coordinates_use_reverse_lookup() {
    let routing = MockServer::start().await;
    let geocoding = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "place_id": 7,
                "lat": "12.9716",
                "lon": "77.5946",
                "display_name": "MG Road, Bengaluru",
                "address": { "road": "MG Road", "city": "Bengaluru", "postcode": "560001" }
            }"#,
        ))
        .expect(1)
        .mount(&geocoding)
        .await;

    let services = Services::from_config(&config_for(&routing, &geocoding)).unwrap();
    let suggestions = services.geocoder.get_suggestions("12.9716, 77.5946").await;

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].category, "coordinates");
    assert_eq!(suggestions[0].display_name, "MG Road, Bengaluru");
    assert!((suggestions[0].lat - 12.9716).abs() < f64::EPSILON);
}
