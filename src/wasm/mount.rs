//! Mount contract: attach to a host element, animate, tear down once.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, prelude::*, JsCast};
use web_sys::{window, Document, HtmlCanvasElement, HtmlElement, MouseEvent, Window};
use web_time::Instant;

use super::render::{js_err, WebGlBackend};
use crate::camera::Viewport;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::pointer::PointerState;
use crate::runtime::SceneRuntime;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Live state shared by the frame loop and the input listeners.
struct Mounted {
    runtime: SceneRuntime<WebGlBackend>,
    pointer: PointerState,
    started: Instant,
}

struct Listeners {
    resize: Closure<dyn FnMut()>,
    pointer: Closure<dyn FnMut(MouseEvent)>,
}

/// Returned by [`mount`]. Call `teardown` when the host region is removed;
/// freeing the handle from JS tears down too.
#[wasm_bindgen]
pub struct MountHandle {
    state: Rc<RefCell<Option<Mounted>>>,
    frame: FrameCallback,
    frame_id: Rc<Cell<Option<i32>>>,
    listeners: Option<Listeners>,
    host: HtmlElement,
    canvas: HtmlCanvasElement,
}

fn to_js(err: SceneError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn host_err(err: JsValue) -> JsValue {
    to_js(SceneError::Host(js_err(err)))
}

fn viewport_of(window: &Window) -> Result<Viewport, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(1.0);
    let height = window.inner_height()?.as_f64().unwrap_or(1.0);
    Ok(Viewport::new(width as u32, height as u32))
}

fn document_of(window: &Window) -> Result<Document, JsValue> {
    window.document().ok_or_else(|| host_err(JsValue::from_str("no document")))
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Attach the background to `host` and start animating.
///
/// `config` is an optional (partial) JSON [`SceneConfig`]. If no WebGL2
/// context can be created the host is left untouched and an error returned.
#[wasm_bindgen]
pub fn mount(host: HtmlElement, config: Option<String>) -> Result<MountHandle, JsValue> {
    let config = match config.as_deref() {
        Some(json) => SceneConfig::from_json(json).map_err(to_js)?,
        None => SceneConfig::default(),
    };
    let window = window().ok_or("no window")?;
    let document = document_of(&window)?;
    let viewport = viewport_of(&window)?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    let backend = WebGlBackend::new(canvas.clone()).map_err(to_js)?;
    let seed = config.seed.unwrap_or_else(random_seed);
    let runtime = SceneRuntime::construct(backend, &config, viewport, seed).map_err(to_js)?;

    let state = Rc::new(RefCell::new(Some(Mounted {
        runtime,
        pointer: PointerState::default(),
        started: Instant::now(),
    })));

    // Resize must reach the camera and renderer before the next frame.
    let resize = {
        let state = state.clone();
        let window = window.clone();
        Closure::wrap(Box::new(move || {
            let Ok(viewport) = viewport_of(&window) else {
                return;
            };
            if let Some(mounted) = state.borrow_mut().as_mut() {
                mounted.runtime.resize(viewport);
            }
        }) as Box<dyn FnMut()>)
    };

    let pointer = {
        let state = state.clone();
        let window = window.clone();
        Closure::wrap(Box::new(move |event: MouseEvent| {
            let Ok(viewport) = viewport_of(&window) else {
                return;
            };
            if let Some(mounted) = state.borrow_mut().as_mut() {
                mounted.pointer = PointerState::from_client(
                    event.client_x() as f64,
                    event.client_y() as f64,
                    viewport.width as f64,
                    viewport.height as f64,
                );
            }
        }) as Box<dyn FnMut(MouseEvent)>)
    };

    // Animation loop
    // `frame` holds the animation-frame closure so that it can keep calling
    // `request_animation_frame` on itself. Teardown clears it, which breaks
    // the reference cycle and stops the loop.
    let frame: FrameCallback = Rc::new(RefCell::new(None));
    let frame_id = Rc::new(Cell::new(None));
    {
        let state = state.clone();
        let next = frame.clone();
        let frame_id = frame_id.clone();
        let window = window.clone();
        *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |_timestamp: f64| {
            {
                let mut guard = state.borrow_mut();
                let Some(mounted) = guard.as_mut() else {
                    return;
                };
                let elapsed = mounted.started.elapsed();
                if let Err(err) = mounted.runtime.frame(elapsed, mounted.pointer) {
                    log::warn!("frame skipped: {err}");
                }
            }
            if let Some(callback) = next.borrow().as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => frame_id.set(Some(id)),
                    Err(err) => log::error!("request_animation_frame failed: {}", js_err(err)),
                }
            }
        }) as Box<dyn FnMut(f64)>));
    }

    let mut handle = MountHandle {
        state,
        frame,
        frame_id,
        listeners: Some(Listeners { resize, pointer }),
        host,
        canvas,
    };
    if let Err(err) = handle.attach(&window, &document) {
        handle.teardown();
        return Err(err);
    }

    log::info!("mounted at {}x{}", viewport.width, viewport.height);
    Ok(handle)
}

impl MountHandle {
    /// Register listeners, schedule the first frame, then show the canvas.
    /// The host only changes once everything that can fail has succeeded.
    fn attach(&self, window: &Window, document: &Document) -> Result<(), JsValue> {
        let Some(listeners) = self.listeners.as_ref() else {
            return Ok(());
        };
        window.add_event_listener_with_callback("resize", listeners.resize.as_ref().unchecked_ref())?;
        document.add_event_listener_with_callback("mousemove", listeners.pointer.as_ref().unchecked_ref())?;
        if let Some(callback) = self.frame.borrow().as_ref() {
            self.frame_id
                .set(Some(window.request_animation_frame(callback.as_ref().unchecked_ref())?));
        }
        self.host.append_child(&self.canvas)?;
        Ok(())
    }
}

#[wasm_bindgen]
impl MountHandle {
    /// Stop the loop, unregister listeners, detach the canvas and release
    /// every GPU resource. Safe to call more than once.
    pub fn teardown(&mut self) {
        let Some(listeners) = self.listeners.take() else {
            return;
        };

        if let Some(window) = window() {
            if let Some(id) = self.frame_id.take() {
                let _ = window.cancel_animation_frame(id);
            }
            let _ = window
                .remove_event_listener_with_callback("resize", listeners.resize.as_ref().unchecked_ref());
            if let Some(document) = window.document() {
                let _ = document
                    .remove_event_listener_with_callback("mousemove", listeners.pointer.as_ref().unchecked_ref());
            }
        }
        drop(self.frame.borrow_mut().take());

        if self.canvas.parent_node().is_some() {
            let _ = self.host.remove_child(&self.canvas);
        }

        // Dropping the runtime releases its ledger and the renderer.
        if let Some(mut mounted) = self.state.borrow_mut().take() {
            let _ = mounted.runtime.teardown();
        }
        drop(listeners);
        log::info!("unmounted");
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.listeners.is_some()
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}
