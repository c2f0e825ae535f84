use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, prelude::*, JsCast};
use web_sys::{window, HtmlCanvasElement, HtmlElement, Window};

use super::gl::WebGlSurface;
use super::listener::EventListener;
use super::overlay::Overlay;
use super::panel::ControlPanel;
use crate::config::DemoConfig;
use crate::error::{Result, VizError};
use crate::params::{ParameterStore, TextParametersPatch, WaveParametersPatch};
use crate::render::{FrameOutcome, WaveRenderer};
use crate::viewport::Viewport;

type SharedRenderer = Rc<RefCell<WaveRenderer<WebGlSurface>>>;
type SharedStore = Rc<RefCell<ParameterStore>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn host_viewport(window: &Window, use_pixel_ratio: bool) -> Result<Viewport> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    let ratio = if use_pixel_ratio {
        window.device_pixel_ratio()
    } else {
        1.0
    };
    Ok(Viewport::from_css(width, height, ratio))
}

/// `requestAnimationFrame` chain that re-registers itself after every frame.
struct FrameLoop {
    window: Window,
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn start(window: Window, renderer: SharedRenderer, store: SharedStore) -> Result<Self> {
        // `f` holds the animation-frame closure so that it can hand itself back
        // to `request_animation_frame`. Storing it inside an `Option` allows us
        // to create the `Closure` first and then reach it from within itself.
        let f: FrameCallback = Rc::new(RefCell::new(None));
        let g = f.clone();
        let pending = Rc::new(Cell::new(None));

        let next_window = window.clone();
        let next_pending = pending.clone();
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            next_pending.set(None);
            let outcome = {
                let store = store.borrow();
                renderer.borrow_mut().render_frame(timestamp, store.wave())
            };
            if outcome == FrameOutcome::Stopped {
                return;
            }

            // schedule next
            if let Some(callback) = f.borrow().as_ref() {
                match next_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => next_pending.set(Some(id)),
                    Err(err) => log::error!("failed to schedule frame: {:?}", err),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let first = match g.borrow().as_ref() {
            Some(callback) => window.request_animation_frame(callback.as_ref().unchecked_ref())?,
            None => return Err(VizError::ResourceAllocation("frame callback")),
        };
        pending.set(Some(first));

        Ok(Self {
            window,
            callback: g,
            pending,
        })
    }

    fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::warn!("failed to cancel frame {}: {:?}", id, err);
            }
        }
        // Dropping the closure breaks its reference to itself.
        self.callback.borrow_mut().take();
    }
}

/// A mounted experiment: background, panel and overlay for one page.
///
/// Everything acquired in [`start_experiment`] is released by
/// [`ExperimentView::teardown`], which also runs when the handle is freed.
#[wasm_bindgen]
pub struct ExperimentView {
    store: SharedStore,
    renderer: SharedRenderer,
    overlay: Overlay,
    frames: Option<FrameLoop>,
    resize: Option<EventListener>,
    panel: Option<ControlPanel>,
}

#[wasm_bindgen]
impl ExperimentView {
    /// Shallow-merges a JSON object such as `{"freq1": 12}` into the wave record.
    pub fn update_wave_params(&self, json: &str) -> std::result::Result<(), JsValue> {
        let patch = WaveParametersPatch::from_json(json)?;
        self.store.borrow_mut().update_wave(patch);
        self.overlay.refresh(&self.store.borrow());
        Ok(())
    }

    pub fn update_text_params(&self, json: &str) -> std::result::Result<(), JsValue> {
        let patch = TextParametersPatch::from_json(json)?;
        self.store.borrow_mut().update_text(patch);
        self.overlay.refresh(&self.store.borrow());
        Ok(())
    }

    pub fn reset(&self) {
        self.store.borrow_mut().reset();
        self.overlay.refresh(&self.store.borrow());
    }

    /// Current wave record as JSON.
    pub fn wave_params(&self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(self.store.borrow().wave())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Defaults `reset` returns to, as JSON.
    pub fn default_wave_params(&self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(&self.store.borrow().defaults().wave)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Edits applied to the parameters since mount.
    pub fn revision(&self) -> u64 {
        self.store.borrow().revision()
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.renderer.borrow().frames()
    }

    pub fn teardown(&mut self) {
        if let Some(frames) = self.frames.take() {
            frames.cancel();
        }
        self.resize.take();
        self.panel.take();
        self.renderer.borrow_mut().teardown();
    }
}

impl Drop for ExperimentView {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Mounts the experiment view described by `config_json` (all fields optional).
#[wasm_bindgen]
pub fn start_experiment(
    config_json: Option<String>,
) -> std::result::Result<ExperimentView, JsValue> {
    let config = match config_json.as_deref() {
        Some(json) => DemoConfig::from_json(json)?,
        None => DemoConfig::default(),
    };
    Ok(mount(config)?)
}

fn mount(config: DemoConfig) -> Result<ExperimentView> {
    let window = window().ok_or(VizError::NoWindow)?;
    let document = window.document().ok_or(VizError::NoDocument)?;
    let canvas = document
        .get_element_by_id(&config.canvas_id)
        .ok_or_else(|| VizError::MissingElement(config.canvas_id.clone()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| VizError::Dom(format!("#{} is not a canvas", config.canvas_id)))?;

    let viewport = host_viewport(&window, config.use_pixel_ratio)?;
    let surface = WebGlSurface::new(canvas)?;
    let renderer: SharedRenderer =
        Rc::new(RefCell::new(WaveRenderer::initialize(surface, viewport)?));

    let store: SharedStore =
        Rc::new(RefCell::new(ParameterStore::new(config.defaults.clone())));
    {
        let renderer = renderer.clone();
        store.borrow_mut().on_wave_change(move |wave| match renderer.try_borrow_mut() {
            Ok(mut renderer) => renderer.push_parameters(wave),
            Err(_) => log::debug!("renderer busy; parameters land with the next frame"),
        });
    }

    // Resize canvas to fit window
    let resize = {
        let renderer = renderer.clone();
        let host = window.clone();
        let use_pixel_ratio = config.use_pixel_ratio;
        EventListener::new(&window, "resize", move |_| {
            match host_viewport(&host, use_pixel_ratio) {
                Ok(viewport) => renderer.borrow_mut().resize(viewport),
                Err(err) => log::warn!("failed to read window size: {}", err),
            }
        })?
    };

    let overlay = Overlay::new(
        document
            .get_element_by_id(&config.overlay_id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok()),
    );

    let panel = match document.get_element_by_id(&config.panel_id) {
        Some(container) => Some(ControlPanel::mount(
            &document,
            &container,
            store.clone(),
            overlay.clone(),
        )?),
        None => {
            log::warn!("#{} not found; control panel disabled", config.panel_id);
            overlay.refresh(&store.borrow());
            None
        }
    };

    let frames = FrameLoop::start(window, renderer.clone(), store.clone())?;
    log::info!("experiment view mounted on #{}", config.canvas_id);

    Ok(ExperimentView {
        store,
        renderer,
        overlay,
        frames: Some(frames),
        resize: Some(resize),
        panel,
    })
}
