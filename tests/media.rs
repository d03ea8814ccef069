mod common;

use common::*;
use futures::future::join_all;
use renovalink_content::media::{MediaDescriptor, MediaRef};
use renovalink_content::types::{Project, Service};
use renovalink_content::FallbackReason;
use serde_json::json;
use renovalink_content::ClientConfig;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_media(server: &MockServer, id: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/wp-json/wp/v2/media/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(media(id)))
        .mount(server)
        .await;
}

async fn mount_missing(server: &MockServer, id: u64, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/wp-json/wp/v2/media/{id}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn media_is_shaped_into_a_descriptor() {
    let server = MockServer::start().await;
    mount_media(&server, 12).await;

    let m = client(&server).resolve_media(12).await.unwrap();
    assert_eq!(
        m,
        MediaDescriptor {
            id: 12,
            url: "https://cdn.example.com/12.jpg".to_string(),
            alt: "image 12".to_string(),
            title: "Image 12".to_string(),
            width: Some(800),
            height: Some(600),
            mime_type: Some("image/jpeg".to_string()),
        }
    );
}

#[tokio::test]
async fn concurrent_resolves_of_one_id_hit_the_api_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/media/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(media(5)).set_delay(Duration::from_millis(150)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let all = join_all((0..6).map(|_| client.resolve_media(5))).await;
    assert!(all.iter().all(|m| m.as_ref().map(|m| m.id).ok() == Some(5)));
}

#[tokio::test]
async fn missing_media_is_reported_not_raised() {
    let server = MockServer::start().await;
    mount_missing(&server, 99, 404).await;

    let reason = client(&server).resolve_media(99).await.unwrap_err();
    assert!(matches!(reason, FallbackReason::Api { status: 404, .. }), "{reason:?}");
}

#[tokio::test]
async fn gallery_skips_failed_and_empty_slots_in_order() {
    let server = MockServer::start().await;
    for id in [101, 102, 104, 105, 106] {
        mount_media(&server, id).await;
    }
    mount_missing(&server, 103, 500).await;

    let project: Project = serde_json::from_value(item_with_acf(
        1,
        "kitchen",
        json!({
            "project_image_1": 101,
            "project_image_2": "102",
            "project_image_3": 103,
            "project_image_4": 104,
            "project_image_5": 105,
            "project_image_6": 106,
        }),
    ))
    .unwrap();
    let gallery = client(&server).project_gallery(&project).await;
    let ids: Vec<u64> = gallery.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![101, 102, 104, 105, 106]);
}

#[tokio::test]
async fn service_gallery_passes_expanded_images_through() {
    let server = MockServer::start().await;
    mount_media(&server, 7).await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/media/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(media(8)))
        .expect(0)
        .mount(&server)
        .await;

    let service: Service = serde_json::from_value(item_with_acf(
        3,
        "pool",
        json!({
            "service_image_1": {"ID": 8, "url": "https://cdn.example.com/inline-8.jpg", "alt": "inline"},
            "service_image_2": false,
            "service_image_3": 7,
            "service_image_4": "",
        }),
    ))
    .unwrap();
    let gallery = client(&server).service_gallery(&service).await;
    assert_eq!(gallery.len(), 2);
    assert_eq!(gallery[0].url, "https://cdn.example.com/inline-8.jpg");
    assert_eq!(gallery[1].id, 7);
}

#[tokio::test]
async fn before_and_after_images_resolve_independently() {
    let server = MockServer::start().await;
    mount_media(&server, 21).await;
    mount_missing(&server, 22, 404).await;

    let project: Project = serde_json::from_value(item_with_acf(
        2,
        "deck",
        json!({"project_before_image": 21, "project_after_image": 22}),
    ))
    .unwrap();
    let (before, after) = client(&server).project_before_after(&project).await;
    assert_eq!(before.map(|m| m.id), Some(21));
    assert!(after.is_none());
}

#[tokio::test]
async fn projects_are_enriched_in_place() {
    let server = MockServer::start().await;
    mount_media(&server, 11).await;
    mount_missing(&server, 12, 404).await;
    mount_media(&server, 31).await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/proyectos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item_with_acf(1, "first", json!({
                "project_image_1": 11,
                "project_image_2": 12,
                "project_before_image": {"ID": 40, "url": "https://cdn.example.com/40.jpg"},
                "project_category": "pool",
            })),
            item(2, "no-fields"),
            item_with_acf(3, "third", json!({"project_after_image": 31})),
        ])))
        .mount(&server)
        .await;

    let projects = client(&server).projects().await.unwrap();
    let ids: Vec<u64> = projects.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let first = projects[0].fields();
    assert!(matches!(first.media_ref("project_image_1"), MediaRef::Resolved(m) if m.url == "https://cdn.example.com/11.jpg"));
    assert_eq!(first.get("project_image_2"), Some(&json!(12)));
    assert!(matches!(first.media_ref("project_before_image"), MediaRef::Resolved(m) if m.id == 40));
    assert_eq!(first.text("project_category"), Some("pool"));
    assert!(projects[0].acf_fields.is_none());

    assert!(projects[1].acf.is_none());
    assert!(matches!(projects[2].fields().media_ref("project_after_image"), MediaRef::Resolved(m) if m.id == 31));
}

#[tokio::test]
async fn projects_with_complete_acf_fields_are_left_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/media/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(media(11)))
        .expect(0)
        .mount(&server)
        .await;
    let mut project = item_with_acf(1, "done", json!({"project_image_1": 11}));
    project["acf_fields"] = json!({"project_image_1": {"ID": 11, "url": "https://cdn.example.com/11.jpg"}});
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/proyectos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([project])))
        .mount(&server)
        .await;

    let projects = client(&server).projects().await.unwrap();
    assert_eq!(projects[0].fields().get("project_image_1"), Some(&json!(11)));
}

async fn delayed_gallery(max_concurrency: usize) -> (usize, Duration) {
    let server = MockServer::start().await;
    for id in 201..=206u64 {
        Mock::given(method("GET"))
            .and(path(format!("/wp-json/wp/v2/media/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(media(id)).set_delay(Duration::from_millis(300)))
            .expect(1)
            .mount(&server)
            .await;
    }
    let acf: serde_json::Map<String, serde_json::Value> =
        (1..=6u64).map(|i| (format!("project_image_{i}"), json!(200 + i))).collect();
    let project: Project = serde_json::from_value(item_with_acf(9, "patio", json!(acf))).unwrap();

    let (client, _) = client_with(ClientConfig { max_concurrency, ..config_for(&server) });
    let started = Instant::now();
    let gallery = client.project_gallery(&project).await;
    (gallery.len(), started.elapsed())
}

#[tokio::test]
async fn gallery_lookups_run_concurrently() {
    let (len, elapsed) = delayed_gallery(8).await;
    assert_eq!(len, 6);
    assert!(elapsed < Duration::from_millis(600), "six 300ms lookups took {elapsed:?}");
}

#[tokio::test]
async fn gallery_lookups_respect_the_concurrency_bound() {
    let (len, elapsed) = delayed_gallery(2).await;
    assert_eq!(len, 6);
    assert!(elapsed >= Duration::from_millis(850), "bound of 2 finished in {elapsed:?}");
}
