use lottie_activation::{ControllerConfig, MarkerConfig, RendererKind, RetryPolicy};
use serde_json::json;

#[test]
fn render_request_matches_load_animation_options() {
    let mut marker = MarkerConfig::new("/wp-content/uploads/animations/hero.json");
    marker.renderer = RendererKind::Canvas;
    marker.loop_enabled = false;

    let request = marker.render_request(&ControllerConfig::default());
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        json!({
            "renderer": "canvas",
            "loop": false,
            "autoplay": true,
            "path": "/wp-content/uploads/animations/hero.json",
            "rendererSettings": {
                "progressiveLoad": true,
                "preserveAspectRatio": "xMidYMid slice"
            }
        })
    );
}

#[test]
fn partial_config_object_fills_defaults() {
    let cfg: ControllerConfig = serde_json::from_value(json!({
        "root_margin_px": 120,
        "retry": { "max_attempts": 5 }
    }))
    .unwrap();

    assert_eq!(cfg.root_margin(), "120px");
    assert_eq!(cfg.selector, "[data-lottie-src]");
    assert_eq!(
        cfg.retry,
        RetryPolicy {
            max_attempts: 5,
            ..RetryPolicy::default()
        }
    );
    assert!(cfg.validate().is_ok());
}

#[test]
fn empty_object_is_the_default_config() {
    let cfg: ControllerConfig = serde_json::from_value(json!({})).unwrap();
    assert_eq!(cfg, ControllerConfig::default());
}

#[test]
fn aspect_fit_override_reaches_request() {
    let cfg = ControllerConfig {
        aspect_fit: "xMidYMid meet".into(),
        progressive_load: false,
        ..ControllerConfig::default()
    };
    let request = MarkerConfig::new("a.json").render_request(&cfg);
    assert_eq!(request.renderer_settings.preserve_aspect_ratio, "xMidYMid meet");
    assert!(!request.renderer_settings.progressive_load);
}
