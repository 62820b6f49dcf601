//! The page's global `lottie` object as an [`AnimationRuntime`].

use js_sys::{Function, Reflect};
use lottie_activation::{AnimationRuntime, RenderRequest};
use serde_wasm_bindgen as swb;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::Element;

/// Global name the runtime registers itself under.
pub const LOTTIE_GLOBAL: &str = "lottie";

/// Looks the runtime up on every call; the script usually loads with
/// `defer` and shows up after this module has started.
#[derive(Debug, Clone)]
pub struct LottieRuntime {
    global_name: String,
}

impl Default for LottieRuntime {
    fn default() -> Self {
        Self::new(LOTTIE_GLOBAL)
    }
}

impl LottieRuntime {
    pub fn new(global_name: impl Into<String>) -> Self {
        Self {
            global_name: global_name.into(),
        }
    }

    fn lookup(&self) -> Option<JsValue> {
        let value = Reflect::get(&js_sys::global(), &JsValue::from_str(&self.global_name)).ok()?;
        (!value.is_undefined() && !value.is_null()).then_some(value)
    }

    fn call_load_animation(
        &self,
        target: &Element,
        request: &RenderRequest,
    ) -> Result<(), JsValue> {
        let lottie = self
            .lookup()
            .ok_or_else(|| JsValue::from_str("lottie runtime missing"))?;
        let load: Function = Reflect::get(&lottie, &JsValue::from_str("loadAnimation"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("lottie.loadAnimation is not a function"))?;

        let options = swb::to_value(request).map_err(JsValue::from)?;
        Reflect::set(&options, &JsValue::from_str("container"), target)?;
        load.call1(&lottie, &options)?;
        Ok(())
    }
}

impl AnimationRuntime<Element> for LottieRuntime {
    fn is_available(&self) -> bool {
        self.lookup().is_some()
    }

    fn load_animation(&mut self, target: &Element, request: &RenderRequest) {
        if let Err(err) = self.call_load_animation(target, request) {
            log::error!("lottie.loadAnimation failed for {}: {err:?}", request.path);
        }
    }
}
