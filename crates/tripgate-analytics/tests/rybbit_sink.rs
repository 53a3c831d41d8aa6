use jiff::Timestamp;
use serde_json::json;
use std::num::NonZeroU64;
use std::time::Duration;
use tripgate_analytics::{RybbitConfig, RybbitSink};
use tripgate_core::{Event, EventSink, NormalizedHost, Outcome, ProfileId, RequestContext};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sink(server: &MockServer) -> RybbitSink {
    RybbitSink::new(
        RybbitConfig::builder()
            .api_url(format!("{}/api/track", server.uri()))
            .api_key("secret")
            .site_id("7")
            .timeout(Duration::from_millis(500))
            .build(),
    )
    .unwrap()
}

fn trip_event() -> Event {
    Event::Resolved {
        host: NormalizedHost::new("trip.example"),
        profile: ProfileId::new("alice").unwrap(),
        outcome: Outcome::Trip {
            id: NonZeroU64::new(5).unwrap(),
            slug: "peru".into(),
        },
        target: "https://polarsteps.com/alice/5-peru".into(),
        request: RequestContext {
            path: "/".into(),
            ..Default::default()
        },
        at: Timestamp::UNIX_EPOCH,
    }
}

#[tokio::test]
async fn posts_event_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/track"))
        .and(header("authorization", "Bearer secret"))
        .and(body_partial_json(json!({
            "type": "outbound",
            "site_id": "7",
            "hostname": "trip.example",
            "page_title": "Trip: peru",
            "user_id": "alice"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    sink(&server).handle(&trip_event()).await.unwrap();
}

#[tokio::test]
async fn rejected_event_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/track"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = sink(&server).handle(&trip_event()).await.unwrap_err();
    assert!(err.to_string().contains("401"), "got {err}");
}

#[tokio::test]
async fn unexpected_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/track"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    assert!(sink(&server).handle(&trip_event()).await.is_err());
}
