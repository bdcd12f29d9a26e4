pub mod canvas;
pub mod overlay;
pub mod runner;
pub mod storage;

pub use canvas::{CanvasSurface, ImageBank};
pub use overlay::TipOverlay;
pub use runner::GameRunner;
pub use storage::LocalStore;

use std::cell::RefCell;
use std::rc::Rc;

use revdark_engine::{Game, GameConfig, LevelSet, PointerEvent, ProgressStore, Rng, SpriteSheet};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys as web;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner>> = RefCell::new(None);
}

/// Run `f` against the runner; `None` until the assets have loaded.
fn with_runner<R>(f: impl FnOnce(&mut GameRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn window() -> Result<web::Window, JsValue> {
    web::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn viewport_size(window: &web::Window) -> (u32, u32) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32;
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// Boot the game into the page: load the sprite sheet and background tile,
/// then start the frame loop. `config_json` optionally overrides
/// [`GameConfig`] fields.
#[wasm_bindgen]
pub fn game_init(config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json {
        Some(json) => GameConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => GameConfig::default(),
    };
    let sheet = SpriteSheet::builtin();
    let missing = sheet.missing();
    if !missing.is_empty() {
        log::warn!("sprite sheet lacks {:?}", missing);
    }

    let paths = [sheet.path.clone(), sheet.background.clone()];
    runner::load_images(&paths, move |images| {
        if let Err(e) = start(config, sheet, images) {
            log::error!("startup failed: {:?}", e);
        }
    })
}

fn start(
    mut config: GameConfig,
    sheet: SpriteSheet,
    images: Vec<web::HtmlImageElement>,
) -> Result<(), JsValue> {
    let [sheet_image, background_tile]: [web::HtmlImageElement; 2] = images
        .try_into()
        .map_err(|_| JsValue::from_str("expected sheet and background images"))?;
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let (width, height) = viewport_size(&window);
    config.window_width = width as f32;
    config.window_height = height as f32;

    let images = Rc::new(RefCell::new(ImageBank::default()));
    images
        .borrow_mut()
        .slice_sheet(&document, &sheet, &sheet_image)?;

    let (main_canvas, _) = canvas::create_canvas(&document, width, height)?;
    main_canvas.set_attribute("style", "display:block;touch-action:none;")?;
    document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&main_canvas)?;
    let (mask_canvas, _) = canvas::create_canvas(&document, width, height)?;

    let main = CanvasSurface::new(main_canvas.clone(), images.clone())?;
    let mask = CanvasSurface::new(mask_canvas, images.clone())?;
    let overlay = TipOverlay::attach(&document)?;

    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let game = Game::new(
        config,
        LevelSet::builtin(),
        sheet,
        Box::new(LocalStore::new()),
        Box::new(Rng::new(seed)),
    );
    let runner = GameRunner::new(game, main, mask, images, overlay, background_tile)?;
    let button = runner.overlay().button().clone();
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));

    listen_pointer(&main_canvas)?;
    listen(&button, "click", |_| {
        with_runner(|r| r.continue_play());
    })?;
    let resize_window = window.clone();
    listen(&window, "resize", move |_| {
        let (w, h) = viewport_size(&resize_window);
        with_runner(|r| r.resize(w, h));
    })?;

    let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
    with_runner(|r| r.boot(now)).transpose()?;
    runner::run_animation_loop(|now| {
        with_runner(|r| r.tick(now));
    })?;
    log::info!("revdark: initialized");
    Ok(())
}

/// Add a listener that lives as long as the page.
fn listen(
    target: &web::EventTarget,
    kind: &str,
    handler: impl FnMut(web::Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Pointer events in client pixels; the canvas fills the viewport from the
/// top-left corner, so these are also canvas pixels.
fn listen_pointer(canvas: &web::HtmlCanvasElement) -> Result<(), JsValue> {
    fn at(ev: web::Event) -> (f32, f32, f64) {
        let ev: web::PointerEvent = ev.unchecked_into();
        (ev.client_x() as f32, ev.client_y() as f32, ev.time_stamp())
    }

    listen(canvas, "pointerdown", |ev| {
        let (x, y, time_ms) = at(ev);
        with_runner(|r| r.pointer(PointerEvent::Down { x, y, time_ms }));
    })?;
    listen(canvas, "pointermove", |ev| {
        let (x, y, _) = at(ev);
        with_runner(|r| r.pointer(PointerEvent::Move { x, y }));
    })?;
    listen(canvas, "pointerup", |ev| {
        let (_, _, time_ms) = at(ev);
        with_runner(|r| r.pointer(PointerEvent::Up { time_ms }));
    })?;
    for kind in ["pointercancel", "pointerleave"] {
        listen(canvas, kind, |_| {
            with_runner(|r| r.pointer(PointerEvent::Cancel));
        })?;
    }
    Ok(())
}

/// Accept the continue prompt, as the on-screen button does.
#[wasm_bindgen]
pub fn game_continue() {
    with_runner(|r| r.continue_play());
}

/// Forget that the tutorial was seen; the next page load starts with it.
#[wasm_bindgen]
pub fn game_reset_progress() {
    LocalStore::new().set_tutorial_seen(false);
}
