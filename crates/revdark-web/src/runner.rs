use std::cell::{Cell, RefCell};
use std::rc::Rc;

use revdark_engine::{Game, GameEvent, PointerEvent};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

use crate::canvas::{CanvasSurface, ImageBank};
use crate::overlay::TipOverlay;

/// Owns the game and everything the browser side needs to present it.
///
/// Lives in a `thread_local!` (see `lib.rs`), because wasm-bindgen cannot
/// export a struct holding DOM handles and trait objects across frames.
pub struct GameRunner {
    game: Game,
    main: CanvasSurface,
    mask: CanvasSurface,
    images: Rc<RefCell<ImageBank>>,
    overlay: TipOverlay,
    document: web::Document,
    /// Tile repeated over each stage's background.
    background_tile: web::HtmlImageElement,
}

impl GameRunner {
    pub fn new(
        game: Game,
        main: CanvasSurface,
        mask: CanvasSurface,
        images: Rc<RefCell<ImageBank>>,
        overlay: TipOverlay,
        background_tile: web::HtmlImageElement,
    ) -> Result<Self, JsValue> {
        let document = main
            .canvas()
            .owner_document()
            .ok_or_else(|| JsValue::from_str("canvas has no document"))?;
        Ok(Self {
            game,
            main,
            mask,
            images,
            overlay,
            document,
            background_tile,
        })
    }

    pub fn overlay(&self) -> &TipOverlay {
        &self.overlay
    }

    /// Load the first level.
    pub fn boot(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.game
            .boot(now_ms)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.present();
        Ok(())
    }

    /// One animation frame.
    pub fn tick(&mut self, now_ms: f64) {
        self.game.tick(now_ms, &mut self.main, &mut self.mask);
        self.present();
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        self.game.pointer(event);
    }

    pub fn continue_play(&mut self) {
        self.game.continue_play();
        self.present();
    }

    /// Both canvases always match the browser viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.main.resize(width, height);
        self.mask.resize(width, height);
        self.game.resize(width as f32, height as f32);
    }

    /// Drain game events into the DOM. A stage request is answered at once:
    /// the background tile is already loaded, so the stage is ready as soon
    /// as it is tiled.
    fn present(&mut self) {
        loop {
            let events = self.game.drain_events();
            if events.is_empty() {
                break;
            }
            let mut stage_ready = false;
            for event in &events {
                match self.present_one(event) {
                    Ok(ready) => stage_ready |= ready,
                    Err(e) => log::error!("presenting {:?} failed: {:?}", event, e),
                }
            }
            if stage_ready {
                self.game.stage_ready();
            }
        }
    }

    fn present_one(&mut self, event: &GameEvent) -> Result<bool, JsValue> {
        match event {
            GameEvent::ShowTip(text) => self.overlay.show(text)?,
            GameEvent::FadeTip => self.overlay.fade()?,
            GameEvent::ContinuePrompt => self.overlay.show_continue()?,
            GameEvent::StageRequested { level, width, height } => {
                log::debug!("building stage for level {}", level);
                self.images.borrow_mut().build_background(
                    &self.document,
                    &self.background_tile,
                    *width as u32,
                    *height as u32,
                )?;
                return Ok(true);
            }
            GameEvent::LevelStarted { .. }
            | GameEvent::LevelFailed { .. }
            | GameEvent::LevelComplete { .. }
            | GameEvent::CampaignComplete => log::debug!("{:?}", event),
        }
        Ok(false)
    }
}

/// Load every image in `paths`, then call `on_ready` with them in order.
///
/// A failed load is fatal for the host: it is logged and `on_ready` never runs.
pub fn load_images(
    paths: &[String],
    on_ready: impl FnOnce(Vec<web::HtmlImageElement>) + 'static,
) -> Result<(), JsValue> {
    let images = paths
        .iter()
        .map(|_| web::HtmlImageElement::new())
        .collect::<Result<Vec<_>, _>>()?;
    let remaining = Rc::new(Cell::new(images.len()));
    let on_ready: Rc<RefCell<Option<Box<dyn FnOnce(Vec<web::HtmlImageElement>)>>>> =
        Rc::new(RefCell::new(Some(Box::new(on_ready))));

    for (image, path) in images.iter().zip(paths) {
        let remaining = remaining.clone();
        let on_ready = on_ready.clone();
        let all = images.clone();
        let onload = Closure::wrap(Box::new(move || {
            remaining.set(remaining.get().saturating_sub(1));
            if remaining.get() == 0 {
                if let Some(ready) = on_ready.borrow_mut().take() {
                    ready(all.clone());
                }
            }
        }) as Box<dyn FnMut()>);

        let src = path.clone();
        let onerror = Closure::wrap(Box::new(move || {
            log::error!("failed to load image '{}'", src);
        }) as Box<dyn FnMut()>);

        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
        image.set_src(path);
    }
    Ok(())
}

/// Call `frame` on every animation frame with the frame timestamp, forever.
pub fn run_animation_loop(frame: impl FnMut(f64) + 'static) -> Result<(), JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let mut frame = frame;
    let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let window_clone = window.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        frame(now);
        if let Some(next) = tick_clone.borrow().as_ref() {
            if let Err(e) = window_clone.request_animation_frame(next.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {:?}", e);
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(first) = tick.borrow().as_ref() {
        window.request_animation_frame(first.as_ref().unchecked_ref())?;
    }
    Ok(())
}
