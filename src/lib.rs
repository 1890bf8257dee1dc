//! Animated WebGL2 background for a single-page portfolio site.
//!
//! A point-cloud field, a sphere of grains that periodically flies apart and
//! reassembles, and a holographic octahedron with a CRT fragment shader. The
//! page shell mounts it into a region with [`mount`] (wasm32 only) and calls
//! `teardown` on the returned handle when the region goes away.
//!
//! Everything outside the `wasm` module is target independent so the scene
//! math, the shader stages and the lifecycle can be tested on the host
//! against a recording backend.

pub mod camera;
pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod pointer;
pub mod resources;
pub mod runtime;
pub mod scene;
pub mod shader;

pub use camera::{PerspectiveCamera, Viewport};
pub use clock::{Clock, FrameSignals};
pub use config::SceneConfig;
pub use error::SceneError;
pub use pointer::PointerState;
pub use resources::{GraphicsBackend, ResourceLedger};
pub use runtime::SceneRuntime;
pub use scene::Scene;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod mount;
    mod render;

    pub use mount::{mount, MountHandle};

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("ambient_scene {} loaded", env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{mount, MountHandle};
