//! [`MarkerDocument`] over live DOM elements.

use lottie_activation::MarkerDocument;
use wasm_bindgen::JsCast as _;
use web_sys::Element;

#[derive(Debug, Default, Clone, Copy)]
pub struct WebDocument;

impl MarkerDocument for WebDocument {
    type Node = Element;

    fn find_markers(&self, root: &Element, selector: &str) -> Vec<Element> {
        let list = match root.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("marker selector {selector:?} rejected: {err:?}");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }
}
