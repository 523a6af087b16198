//! Falling-squares page background.
//!
//! The pool and its lifecycle are host-independent and testable natively;
//! the browser binding lives in the wasm32-only `wasm` module.

pub mod animation;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod pool;
pub mod random;
pub mod viewport;

pub use animation::{AnimationDescriptor, Transform};
pub use config::{Range, SquaresConfig};
pub use error::{ConfigError, HostError};
pub use lifecycle::{AnimationHost, Coordinator, Fate};
pub use pool::{ElementPool, PoolStats, UnitId};
pub use random::{FastRandom, RandomSource};
pub use viewport::{compute_target, Viewport};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod debounce;
    mod dom;
    mod squares;

    pub use squares::Squares;

    /// Module start: routes panics and `log` records to the devtools console.
    /// The effect itself is created by the page with `new Squares()`.
    #[wasm_bindgen(start)]
    pub fn init() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::Squares;
