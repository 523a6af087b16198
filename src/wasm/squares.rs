use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, prelude::*, JsCast};
use web_sys::Window;

use super::debounce::Debouncer;
use super::dom::{create_container, DomHost};
use crate::config::SquaresConfig;
use crate::error::HostError;
use crate::lifecycle::Coordinator;
use crate::pool::UnitId;
use crate::random::FastRandom;
use crate::viewport::Viewport;

type Shared = Rc<RefCell<Coordinator<DomHost, FastRandom>>>;

impl From<HostError> for JsValue {
    fn from(e: HostError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// Falling-squares background for one page.
///
/// Construct once from the page's startup script; calling `free()` removes
/// the squares and the resize listener.
#[wasm_bindgen]
pub struct Squares {
    coordinator: Shared,
    window: Window,
    on_resize: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl Squares {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Squares, JsValue> {
        Ok(Self::start(SquaresConfig::default())?)
    }

    /// Like the constructor, with a JSON object overriding default ranges.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<Squares, JsValue> {
        let config =
            SquaresConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::start(config)?)
    }

    #[wasm_bindgen(getter, js_name = targetSize)]
    pub fn target_size(&self) -> usize {
        self.coordinator.borrow().stats().target
    }

    #[wasm_bindgen(getter, js_name = activeCount)]
    pub fn active_count(&self) -> usize {
        self.coordinator.borrow().stats().active
    }

    #[wasm_bindgen(getter, js_name = inactiveCount)]
    pub fn inactive_count(&self) -> usize {
        self.coordinator.borrow().stats().inactive
    }

    /// Active squares still running an animation sampled before the latest
    /// resize.
    #[wasm_bindgen(getter, js_name = staleCount)]
    pub fn stale_count(&self) -> usize {
        self.coordinator.borrow().pool().stale_len()
    }
}

impl Squares {
    fn start(config: SquaresConfig) -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        let container = create_container(&document)?;
        let debounce_ms = config.debounce_ms;

        let coordinator: Shared = Rc::new_cyclic(|weak: &Weak<RefCell<_>>| {
            let weak = weak.clone();
            let notify = move |id| deliver_completion(&weak, id);
            let host = DomHost::new(document, container, notify);
            RefCell::new(Coordinator::new(config, host, FastRandom::from_entropy()))
        });

        let mut debouncer = Debouncer::new(debounce_ms, {
            let weak = Rc::downgrade(&coordinator);
            let window = window.clone();
            move || {
                let Some(coordinator) = weak.upgrade() else {
                    return;
                };
                match Viewport::from_window(&window) {
                    Ok(viewport) => coordinator.borrow_mut().resize(viewport),
                    Err(e) => log::warn!("could not read viewport: {e}"),
                }
            }
        });
        let on_resize = Closure::wrap(Box::new(move || debouncer.trigger()) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .map_err(|e| HostError::Js(format!("{e:?}")))?;

        coordinator.borrow_mut().resize(Viewport::from_window(&window)?);
        log::info!("squares started: {:?}", coordinator.borrow().stats());

        Ok(Self {
            coordinator,
            window,
            on_resize,
        })
    }
}

impl Drop for Squares {
    fn drop(&mut self) {
        let listener = self.on_resize.as_ref().unchecked_ref();
        self.window
            .remove_event_listener_with_callback("resize", listener)
            .ok();

        // Finish events must not reach the shared closure once it is freed.
        if let Ok(coordinator) = self.coordinator.try_borrow() {
            for playback in coordinator.pool().units().filter_map(|u| u.playback()) {
                playback.handle.set_onfinish(None);
                playback.handle.cancel();
            }
        }
    }
}

fn deliver_completion(coordinator: &Weak<RefCell<Coordinator<DomHost, FastRandom>>>, id: UnitId) {
    let Some(coordinator) = coordinator.upgrade() else {
        return;
    };
    // Completions arrive as scheduled events, never from inside resize/complete.
    match coordinator.try_borrow_mut() {
        Ok(mut coordinator) => {
            coordinator.complete(id);
        }
        Err(_) => {
            log::error!("completion for square {id:?} arrived while the pool was busy")
        }
    }
}
