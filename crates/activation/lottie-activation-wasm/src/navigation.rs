//! "Back to index" link for standalone test pages.
//!
//! Adds a fixed-position link to `<body>` and maps the Escape key to the
//! same navigation.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, KeyboardEvent, Window};

pub const DEFAULT_BACK_HREF: &str = "../index.html";
pub const BACK_LINK_CLASS: &str = "back-to-index";
const BACK_LINK_TEXT: &str = "\u{2190} Back to Index";

const BACK_LINK_STYLE: &str = "position: fixed; top: 20px; left: 20px; \
background: rgba(255,255,255,0.95); color: #333; padding: 10px 20px; \
border-radius: 25px; text-decoration: none; font-weight: 600; \
font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; \
box-shadow: 0 2px 10px rgba(0,0,0,0.15); transition: all 0.3s ease; \
z-index: 10000; font-size: 14px; border: 1px solid rgba(0,0,0,0.1);";

/// (background, transform, box-shadow)
const HOVER_STYLE: (&str, &str, &str) = (
    "white",
    "translateY(-2px)",
    "0 4px 15px rgba(0,0,0,0.2)",
);
const REST_STYLE: (&str, &str, &str) = (
    "rgba(255,255,255,0.95)",
    "translateY(0)",
    "0 2px 10px rgba(0,0,0,0.15)",
);

fn apply_hover_style(el: &HtmlElement, (background, transform, shadow): (&str, &str, &str)) {
    let s = el.style();
    let _ = s.set_property("background", background);
    let _ = s.set_property("transform", transform);
    let _ = s.set_property("box-shadow", shadow);
}

fn hover_listener(
    el: &HtmlElement,
    event: &str,
    style: (&'static str, &'static str, &'static str),
) -> Result<(), JsValue> {
    let target = el.clone();
    let cb = Closure::wrap(Box::new(move |_event: Event| {
        apply_hover_style(&target, style);
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    // The listener lives as long as the element.
    cb.forget();
    Ok(())
}

/// Create the link and append it to `<body>`.
pub(crate) fn insert_back_link(document: &Document, href: &str) -> Result<HtmlElement, JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    let link: HtmlElement = document.create_element("a")?.unchecked_into();
    link.set_attribute("href", href)?;
    link.set_class_name(BACK_LINK_CLASS);
    link.set_text_content(Some(BACK_LINK_TEXT));
    link.style().set_css_text(BACK_LINK_STYLE);

    hover_listener(&link, "mouseenter", HOVER_STYLE)?;
    hover_listener(&link, "mouseleave", REST_STYLE)?;

    body.append_child(&link)?;
    Ok(link)
}

fn install_escape_listener(
    window: &Window,
    document: &Document,
    href: &str,
) -> Result<(), JsValue> {
    let window = window.clone();
    let href = href.to_string();
    let cb = Closure::wrap(Box::new(move |event: Event| {
        let is_escape = event
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|key| key.key() == "Escape");
        if is_escape {
            if let Err(err) = window.location().set_href(&href) {
                log::warn!("navigation to {href} failed: {err:?}");
            }
        }
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Whether the document is still parsing (`readyState == "loading"`).
pub(crate) fn document_is_loading(document: &Document) -> bool {
    js_sys::Reflect::get(document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|v| v.as_string())
        .is_some_and(|state| state == "loading")
}

/// Install the back link (now, or on `DOMContentLoaded` while the page is
/// still loading) and the Escape shortcut. `href` defaults to `../index.html`.
///
/// # Example (JavaScript)
/// ```js
/// install_back_link();
/// install_back_link("/demos/");
/// ```
#[wasm_bindgen]
pub fn install_back_link(href: Option<String>) -> Result<(), JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsError::new("no document"))?;
    let href = href.unwrap_or_else(|| DEFAULT_BACK_HREF.to_string());

    if document_is_loading(&document) {
        let doc = document.clone();
        let link_href = href.clone();
        let on_ready = Closure::once_into_js(move || {
            if let Err(err) = insert_back_link(&doc, &link_href) {
                log::warn!("back link not inserted: {err:?}");
            }
        });
        document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
            .map_err(|e| JsError::new(&format!("DOMContentLoaded listener: {e:?}")))?;
    } else {
        insert_back_link(&document, &href)
            .map_err(|e| JsError::new(&format!("back link: {e:?}")))?;
    }

    install_escape_listener(&window, &document, &href)
        .map_err(|e| JsError::new(&format!("keydown listener: {e:?}")))?;

    log::info!("Navigation: press Esc or click \"{BACK_LINK_TEXT}\" to return to the index");
    Ok(())
}
