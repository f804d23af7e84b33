use async_trait::async_trait;
use quakemap::{
    constants::{EARTHQUAKES_OVERLAY, PLATES_OVERLAY},
    data::feed::{FailingFeedSource, StaticFeedSource},
    prelude::*,
};

const ONE_QUAKE: &str = r#"{
    "type": "FeatureCollection",
    "features": [{
        "type": "Feature",
        "id": "test1",
        "properties": {"mag": 6.2, "place": "10km N of Testville", "time": 1700000000000},
        "geometry": {"type": "Point", "coordinates": [-117.5, 35.7, 8.1]}
    }]
}"#;

const MIXED_QUAKES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"mag": 1.4, "place": "A", "time": 1700000000000},
         "geometry": {"type": "Point", "coordinates": [-150.1, 61.2]}},
        {"type": "Feature", "properties": {"mag": 2.0, "place": "B"},
         "geometry": {"type": "Point", "coordinates": [-155.3]}},
        {"type": "Feature", "properties": {"place": "C"},
         "geometry": {"type": "Point", "coordinates": [10.0, 10.0]}},
        {"type": "Feature", "properties": {"mag": -0.4, "place": null},
         "geometry": {"type": "Point", "coordinates": [-116.8, 33.5, 4.0]}}
    ]
}"#;

const PLATES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"Name": "AF-AN"},
         "geometry": {"type": "LineString", "coordinates": [[-0.43, -54.85], [-0.39, -54.5], [-1.02, -54.0]]}},
        {"type": "Feature", "properties": {"Name": "NA-PA"},
         "geometry": {"type": "MultiLineString", "coordinates": [[[-125.0, 40.0], [-124.0, 41.0]], [[-123.0, 42.0], [-122.5, 43.0]]]}}
    ]
}"#;

/// A feed whose request never completes
struct HangingFeed;

#[async_trait]
impl FeedSource for HangingFeed {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn fetch(&self) -> Result<GeoJson> {
        futures::future::pending().await
    }
}

fn context(quakes: Arc<dyn FeedSource>, plates: Arc<dyn FeedSource>) -> AppContext {
    AppContext::with_sources(AppConfig::default(), quakes, plates).unwrap()
}

#[tokio::test]
async fn test_end_to_end_single_quake() {
    let ctx = context(
        Arc::new(StaticFeedSource::new("earthquakes", ONE_QUAKE)),
        Arc::new(StaticFeedSource::new("plates", PLATES)),
    );
    let report = RenderPipeline::new(&ctx).run().await;
    assert_eq!(report.earthquakes, LayerOutcome::Rendered { rendered: 1, skipped: 0 });

    let map = ctx.map.lock().unwrap();
    let group = map.overlay_group(EARTHQUAKES_OVERLAY).unwrap();
    let markers: Vec<_> = group.markers().collect();
    assert_eq!(markers.len(), 1);

    let marker = markers[0];
    assert_eq!(marker.style.fill_color.to_hex(), "#581845");
    assert!((marker.style.radius - 18.6).abs() < 1e-9);
    assert_eq!(marker.position, LatLng::new(35.7, -117.5));

    let html = marker.popup.as_ref().unwrap().to_html();
    assert!(html.contains("Testville"));
    assert!(html.contains("6.2"));
}

#[tokio::test]
async fn test_malformed_features_are_skipped() {
    let ctx = context(
        Arc::new(StaticFeedSource::new("earthquakes", MIXED_QUAKES)),
        Arc::new(StaticFeedSource::new("plates", PLATES)),
    );
    let report = RenderPipeline::new(&ctx).run().await;
    assert_eq!(report.earthquakes, LayerOutcome::Rendered { rendered: 2, skipped: 2 });
    assert_eq!(report.plates, LayerOutcome::Rendered { rendered: 2, skipped: 0 });

    let map = ctx.map.lock().unwrap();
    let places: Vec<_> = map
        .overlay_group(EARTHQUAKES_OVERLAY)
        .unwrap()
        .markers()
        .map(|m| m.popup.as_ref().unwrap().place.clone())
        .collect();
    assert_eq!(places, ["A", "Unknown location"]);
}

#[tokio::test]
async fn test_hanging_plate_feed_keeps_quakes_and_legend() {
    let ctx = context(
        Arc::new(StaticFeedSource::new("earthquakes", ONE_QUAKE)),
        Arc::new(HangingFeed),
    );
    let pipeline = RenderPipeline::new(&ctx);
    let timed_out = tokio::time::timeout(Duration::from_millis(200), pipeline.run()).await;
    assert!(timed_out.is_err());

    let mut map = ctx.map.lock().unwrap();
    assert_eq!(map.overlay_group(EARTHQUAKES_OVERLAY).unwrap().len(), 1);
    assert_eq!(map.is_overlay_visible(PLATES_OVERLAY), Some(false));
    assert_eq!(map.legend().unwrap().entries.len(), 6);

    let mut frame = RenderContext::new(1024, 768);
    map.render(&mut frame).unwrap();
    assert_eq!(frame.circles().count(), 1);
    assert_eq!(frame.lines().count(), 0);
}

#[tokio::test]
async fn test_concurrent_hanging_plate_feed_keeps_quakes() {
    let ctx = context(
        Arc::new(StaticFeedSource::new("earthquakes", ONE_QUAKE)),
        Arc::new(HangingFeed),
    );
    let pipeline = RenderPipeline::new(&ctx).with_strategy(FetchStrategy::Concurrent);
    let timed_out = tokio::time::timeout(Duration::from_millis(200), pipeline.run()).await;
    assert!(timed_out.is_err());

    let mut map = ctx.map.lock().unwrap();
    assert_eq!(map.overlay_group(EARTHQUAKES_OVERLAY).unwrap().len(), 1);
    assert_eq!(map.is_overlay_visible(PLATES_OVERLAY), Some(false));
    assert!(map.legend().is_some());

    let mut frame = RenderContext::new(1024, 768);
    map.render(&mut frame).unwrap();
    assert_eq!(frame.circles().count(), 1);
}

#[tokio::test]
async fn test_failed_quake_feed_leaves_layer_empty() {
    let ctx = context(
        Arc::new(FailingFeedSource::new("earthquakes", "503 Service Unavailable")),
        Arc::new(StaticFeedSource::new("plates", PLATES)),
    );
    let report = RenderPipeline::new(&ctx).run().await;
    assert!(matches!(report.earthquakes, LayerOutcome::Failed(_)));
    assert_eq!(report.plates, LayerOutcome::NotRequested);

    let map = ctx.map.lock().unwrap();
    assert!(map.overlay_group(EARTHQUAKES_OVERLAY).unwrap().is_empty());
    assert!(map.legend().is_some());
}

#[tokio::test]
async fn test_plates_draw_orange_lines() {
    let ctx = context(
        Arc::new(StaticFeedSource::new("earthquakes", ONE_QUAKE)),
        Arc::new(StaticFeedSource::new("plates", PLATES)),
    );
    RenderPipeline::new(&ctx).run().await;

    let mut map = ctx.map.lock().unwrap();
    map.set_view(LatLng::new(0.0, 0.0), 0.0);
    let mut frame = RenderContext::new(1024, 768);
    map.render(&mut frame).unwrap();

    let lines: Vec<_> = frame
        .lines()
        .map(|cmd| match cmd {
            DrawCommand::Line { style, .. } => style.clone(),
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|s| s.color.to_hex() == "#FFA500" && s.weight == 2.0));
}

#[tokio::test]
async fn test_rendered_layers_respect_layer_control() {
    let ctx = context(
        Arc::new(StaticFeedSource::new("earthquakes", ONE_QUAKE)),
        Arc::new(StaticFeedSource::new("plates", PLATES)),
    );
    RenderPipeline::new(&ctx).run().await;

    let mut map = ctx.map.lock().unwrap();
    let control = LayerControl::new();
    control.toggle_overlay(&mut map, EARTHQUAKES_OVERLAY).unwrap();

    let mut frame = RenderContext::new(1024, 768);
    map.render(&mut frame).unwrap();
    assert_eq!(frame.circles().count(), 0);
}
