/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Reads `innerWidth`/`innerHeight` from the browser window.
    #[cfg(target_arch = "wasm32")]
    pub fn from_window(window: &web_sys::Window) -> Result<Self, crate::error::HostError> {
        use crate::error::HostError;

        let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            value
                .map_err(|e| HostError::Js(format!("{e:?}")))
                .map(|v| v.as_f64().unwrap_or(0.0))
        };
        Ok(Self::new(read(window.inner_width())?, read(window.inner_height())?))
    }

    pub fn target_size(&self, px_per_unit: f64) -> usize {
        compute_target(self.width, px_per_unit)
    }
}

/// Number of units a viewport `width` pixels wide should hold.
///
/// Zero, negative, or non-finite widths give zero.
pub fn compute_target(width: f64, px_per_unit: f64) -> usize {
    if !(width.is_finite() && width > 0.0 && px_per_unit > 0.0) {
        return 0;
    }
    (width / px_per_unit).floor() as usize
}
