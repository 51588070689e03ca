/// spin3d Web - WebGL2 renderer driven by requestAnimationFrame
///
/// Exposes [`WebRenderer`] to JavaScript:
///
/// ```js
/// const renderer = new WebRenderer("canvas");
/// renderer.start();
/// // later
/// renderer.stop();
/// ```

use std::cell::RefCell;
use std::rc::Rc;

use log::Level;

use spin3d_core::{CancellationToken, Error, FrameScheduler, Mesh, SceneConfig, SchedulerState};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub mod backend;

pub use backend::WebGlBackend;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Route `log` records and panics to the browser console
#[wasm_bindgen(start)]
pub fn init() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    console_log::init_with_level(Level::Info).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub struct WebRenderer {
    scheduler: Rc<RefCell<FrameScheduler<WebGlBackend>>>,
    cancel: CancellationToken,
    frame: FrameCallback,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Set up WebGL2 on the canvas with the default scene
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        Self::build(canvas_id, &SceneConfig::default()).map_err(to_js)
    }

    /// Set up WebGL2 on the canvas with a JSON scene config
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(canvas_id: &str, config_json: &str) -> Result<WebRenderer, JsValue> {
        let config = SceneConfig::from_json(config_json).map_err(to_js)?;
        Self::build(canvas_id, &config).map_err(to_js)
    }

    /// Register the first animation frame. Each frame re-registers itself
    /// until `stop()` is called or the context is lost.
    pub fn start(&mut self) -> Result<(), JsValue> {
        {
            let mut scheduler = self.scheduler.borrow_mut();
            if scheduler.state() != SchedulerState::Idle {
                return Err(JsValue::from_str("renderer was already started"));
            }
            scheduler.start();
        }

        let scheduler = Rc::clone(&self.scheduler);
        let frame = Rc::clone(&self.frame);
        let callback = Closure::new(move |now_ms: f64| {
            let mut scheduler = scheduler.borrow_mut();
            if let Err(err) = scheduler.tick_millis(now_ms) {
                log::log!(frame_failure_level(&err), "spin3d frame failed: {}", err);
            }

            if scheduler.should_reschedule() {
                if let Some(callback) = frame.borrow().as_ref() {
                    if let Err(err) = request_animation_frame(callback) {
                        log::error!("requestAnimationFrame failed: {:?}", err);
                    }
                }
            }
        });
        *self.frame.borrow_mut() = Some(callback);

        match self.frame.borrow().as_ref() {
            Some(callback) => request_animation_frame(callback).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Stop before the next frame is drawn
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.scheduler.borrow().should_reschedule()
    }

    #[wasm_bindgen(js_name = framesDrawn)]
    pub fn frames_drawn(&self) -> f64 {
        self.scheduler.borrow().frames_drawn() as f64
    }
}

impl WebRenderer {
    fn build(canvas_id: &str, config: &SceneConfig) -> spin3d_core::Result<WebRenderer> {
        let backend = WebGlBackend::initialize(canvas_id, &Mesh::letter_a())?;
        let scheduler = FrameScheduler::new(backend, config)?;
        let cancel = scheduler.cancellation_token();

        Ok(WebRenderer {
            scheduler: Rc::new(RefCell::new(scheduler)),
            cancel,
            frame: Rc::new(RefCell::new(None)),
        })
    }
}

fn request_animation_frame(callback: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Fatal failures end the loop; anything else is retried on the next frame
fn frame_failure_level(err: &Error) -> Level {
    if err.is_fatal() {
        Level::Error
    } else {
        Level::Warn
    }
}

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}
