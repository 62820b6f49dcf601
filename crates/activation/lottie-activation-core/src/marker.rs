//! Animation markers: attribute encoding, typed configuration, and the
//! render request handed to the animation runtime.

use serde::{Deserialize, Serialize};

use crate::config::ControllerConfig;

pub const ATTR_SRC: &str = "data-lottie-src";
pub const ATTR_LOOP: &str = "data-lottie-loop";
pub const ATTR_AUTOPLAY: &str = "data-lottie-autoplay";
pub const ATTR_RENDERER: &str = "data-lottie-renderer";
pub const ATTR_IMMEDIATE: &str = "data-lottie-immediate";
/// Written by the controller the first time a marker is scanned.
pub const ATTR_MARKER_ID: &str = "data-lottie-marker-id";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Svg,
    Canvas,
}

impl RendererKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RendererKind::Svg => "svg",
            RendererKind::Canvas => "canvas",
        }
    }

    /// Case-insensitive parse; `None` for names the runtime does not support.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "svg" => Some(RendererKind::Svg),
            "canvas" => Some(RendererKind::Canvas),
            _ => None,
        }
    }
}

/// Lifecycle of a registered marker. `Pending -> Activated` is the only transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerState {
    Pending,
    Activated,
}

/// Typed view of a marker's attributes, parsed once at registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub source: String,
    pub loop_enabled: bool,
    pub autoplay_enabled: bool,
    pub renderer: RendererKind,
    pub immediate: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            loop_enabled: true,
            autoplay_enabled: true,
            renderer: RendererKind::Svg,
            immediate: false,
        }
    }
}

impl MarkerConfig {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Build a config from attribute lookups.
    ///
    /// - `loop` / `autoplay`: only the literal `"false"` disables.
    /// - `renderer`: unknown names fall back to svg.
    /// - `immediate`: presence flag; any value, `"false"` included, counts.
    pub fn from_attributes<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let source = lookup(ATTR_SRC)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let loop_enabled = lookup(ATTR_LOOP).map_or(true, |v| !is_false(&v));
        let autoplay_enabled = lookup(ATTR_AUTOPLAY).map_or(true, |v| !is_false(&v));
        let renderer = match lookup(ATTR_RENDERER) {
            Some(raw) if !raw.trim().is_empty() => RendererKind::parse(&raw).unwrap_or_else(|| {
                log::warn!("unknown lottie renderer {raw:?}; falling back to svg");
                RendererKind::Svg
            }),
            _ => RendererKind::Svg,
        };
        let immediate = lookup(ATTR_IMMEDIATE).is_some();

        Self {
            source,
            loop_enabled,
            autoplay_enabled,
            renderer,
            immediate,
        }
    }

    /// Markers without a source never activate.
    pub fn is_inert(&self) -> bool {
        self.source.is_empty()
    }

    pub fn render_request(&self, cfg: &ControllerConfig) -> RenderRequest {
        RenderRequest {
            renderer: self.renderer,
            r#loop: self.loop_enabled,
            autoplay: self.autoplay_enabled,
            path: self.source.clone(),
            renderer_settings: RendererSettings {
                progressive_load: cfg.progressive_load,
                preserve_aspect_ratio: cfg.aspect_fit.clone(),
            },
        }
    }
}

fn is_false(raw: &str) -> bool {
    raw.trim() == "false"
}

/// Options object for `lottie.loadAnimation`, minus the container.
/// Serializes with the runtime's own field names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub renderer: RendererKind,
    pub r#loop: bool,
    pub autoplay: bool,
    pub path: String,
    pub renderer_settings: RendererSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererSettings {
    pub progressive_load: bool,
    pub preserve_aspect_ratio: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(attrs: &[(&str, &str)]) -> MarkerConfig {
        let map: HashMap<&str, &str> = attrs.iter().copied().collect();
        MarkerConfig::from_attributes(|name| map.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn source_only_uses_defaults() {
        let cfg = parse(&[(ATTR_SRC, "a.json")]);
        assert_eq!(cfg, MarkerConfig::new("a.json"));
        assert!(cfg.loop_enabled);
        assert!(cfg.autoplay_enabled);
        assert_eq!(cfg.renderer, RendererKind::Svg);
        assert!(!cfg.immediate);
    }

    #[test]
    fn only_literal_false_disables_flags() {
        let cfg = parse(&[
            (ATTR_SRC, "a.json"),
            (ATTR_LOOP, "false"),
            (ATTR_AUTOPLAY, "0"),
        ]);
        assert!(!cfg.loop_enabled);
        assert!(cfg.autoplay_enabled);
    }

    #[test]
    fn immediate_is_a_presence_flag() {
        assert!(parse(&[(ATTR_SRC, "a"), (ATTR_IMMEDIATE, "true")]).immediate);
        assert!(parse(&[(ATTR_SRC, "a"), (ATTR_IMMEDIATE, "")]).immediate);
        assert!(parse(&[(ATTR_SRC, "a"), (ATTR_IMMEDIATE, "false")]).immediate);
        assert!(!parse(&[(ATTR_SRC, "a")]).immediate);
    }

    #[test]
    fn renderer_parse_and_fallback() {
        assert_eq!(
            parse(&[(ATTR_SRC, "a"), (ATTR_RENDERER, " Canvas ")]).renderer,
            RendererKind::Canvas
        );
        assert_eq!(
            parse(&[(ATTR_SRC, "a"), (ATTR_RENDERER, "html")]).renderer,
            RendererKind::Svg
        );
    }

    #[test]
    fn blank_source_is_inert() {
        assert!(parse(&[(ATTR_SRC, "   ")]).is_inert());
        assert!(parse(&[]).is_inert());
        assert!(!parse(&[(ATTR_SRC, "a.json")]).is_inert());
    }
}
