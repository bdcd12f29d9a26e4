use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{GameEvent, TipText};
use crate::assets::manifest::SpriteSheet;
use crate::components::behavior::Signal;
use crate::core::cues::{Continuation, Cue, Cues, TIP_FADE_MS};
use crate::core::level::LevelSet;
use crate::core::rng::FlickerSource;
use crate::core::script::{tutorial_handover, ScriptStep};
use crate::core::session::Session;
use crate::core::storage::ProgressStore;
use crate::error::EngineError;
use crate::input::controls::{Controls, InputOutcome};
use crate::input::gesture::{GestureTracker, PointerEvent, DRAG_THRESHOLD, TAP_MAX_MS};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::surface::Surface;
use crate::renderer::viewport::CAMERA_SMOOTHING;
use crate::systems::lighting::{update_lights, TAP_THRESHOLD};
use crate::systems::render::render_frame;

pub const TITLE: &str = "Reverse the Darkness";
pub const FAILURE_LINE: &str = "You're alone, in the dark.";
pub const ENDING_HEADING: &str = "The End";
pub const ENDING_BODY: &str = "You've got yourself a nice bag of orbs there.";

/// Tunables, provided by the host. Every field has a default, so a JSON
/// override only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window (surface) width in pixels.
    pub window_width: f32,
    /// Window (surface) height in pixels.
    pub window_height: f32,
    /// Per-frame camera easing factor (default: 0.03).
    pub camera_smoothing: f32,
    /// Packed mask value a tap must reach (default: 65000).
    pub tap_threshold: u32,
    /// Longest press that counts as a tap (default: 300 ms).
    pub tap_max_ms: f64,
    /// Movement that turns a press into a drag (default: 10 px).
    pub drag_threshold: f32,
    /// Where play resumes after a failure or once the tutorial was seen (default: 1).
    pub first_level: usize,
    /// Levels below this index open with the title tip (default: 2).
    pub title_levels: usize,
    pub title_hold_ms: f64,
    pub failure_hold_ms: f64,
    /// Time between a tip fading and its continuation (default: 1000 ms).
    pub tip_fade_ms: f64,
    /// Camera zoom used to frame the orb after a win (default: 2).
    pub success_zoom: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 800.0,
            window_height: 600.0,
            camera_smoothing: CAMERA_SMOOTHING,
            tap_threshold: TAP_THRESHOLD,
            tap_max_ms: TAP_MAX_MS,
            drag_threshold: DRAG_THRESHOLD,
            first_level: 1,
            title_levels: 2,
            title_hold_ms: 3000.0,
            failure_hold_ms: 2000.0,
            tip_fade_ms: TIP_FADE_MS,
            success_zoom: 2.0,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn window(&self) -> Vec2 {
        Vec2::new(self.window_width, self.window_height)
    }
}

/// The game: campaign progression, timed cues, input and the frame loop.
///
/// The host drives it by calling [`Game::tick`] once per animation frame with
/// its clock and two surfaces, and presents the [`GameEvent`]s it drains.
pub struct Game {
    config: GameConfig,
    levels: LevelSet,
    sheet: SpriteSheet,
    store: Box<dyn ProgressStore>,
    flicker: Box<dyn FlickerSource>,
    session: Session,
    cues: Cues,
    controls: Controls,
    gestures: GestureTracker,
    input: InputQueue,
    /// Continuation to run once the host reports the stage ready.
    pending_stage: Option<Continuation>,
    /// Input is accepted only once the prepared stage is ready.
    accepting_input: bool,
    awaiting_continue: bool,
}

impl Game {
    pub fn new(
        config: GameConfig,
        levels: LevelSet,
        sheet: SpriteSheet,
        store: Box<dyn ProgressStore>,
        flicker: Box<dyn FlickerSource>,
    ) -> Self {
        let window = config.window();
        Self {
            session: Session::empty(window),
            cues: Cues::with_fade(config.tip_fade_ms),
            controls: Controls::with_threshold(config.tap_threshold),
            gestures: GestureTracker::with_thresholds(config.tap_max_ms, config.drag_threshold),
            input: InputQueue::new(),
            pending_stage: None,
            accepting_input: false,
            awaiting_continue: false,
            config,
            levels,
            sheet,
            store,
            flicker,
        }
    }

    // -- Accessors --

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn progress(&self) -> &dyn ProgressStore {
        self.store.as_ref()
    }

    pub fn now_ms(&self) -> f64 {
        self.cues.now_ms()
    }

    pub fn is_awaiting_continue(&self) -> bool {
        self.awaiting_continue
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.cues.drain_events()
    }

    // -- Lifecycle --

    /// Load the first level: the tutorial, unless the player has seen it.
    pub fn boot(&mut self, now_ms: f64) -> Result<(), EngineError> {
        self.cues.set_now(now_ms);
        let level = if self.store.tutorial_seen() {
            self.config.first_level
        } else {
            0
        };
        log::info!("booting at level {}", level);
        self.prepare_level(level, Continuation::Start)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.window_width = width;
        self.config.window_height = height;
        self.session.window = Vec2::new(width, height);
    }

    /// Tear down the current level and build level `index`. Emits
    /// [`GameEvent::StageRequested`]; `then` runs once the host calls
    /// [`Game::stage_ready`].
    pub fn prepare_level(&mut self, index: usize, then: Continuation) -> Result<(), EngineError> {
        let descriptor = self.levels.get(index)?.clone();

        self.cues.next_generation();
        self.input.clear();
        self.gestures.cancel();
        self.controls.reset();
        self.accepting_input = false;
        self.awaiting_continue = false;

        self.session = Session::prepare(index, descriptor, self.config.window());
        log::info!("level {} prepared", index);

        self.cues.emit(GameEvent::StageRequested {
            level: index,
            width: self.session.stage.x,
            height: self.session.stage.y,
        });
        self.pending_stage = Some(then);
        Ok(())
    }

    /// The host finished building the stage background for the prepared level.
    pub fn stage_ready(&mut self) {
        match self.pending_stage.take() {
            Some(then) => {
                self.accepting_input = true;
                self.run(then);
            }
            None => log::warn!("stage_ready with no level pending"),
        }
    }

    /// Show the intro for early levels, then begin play.
    pub fn start(&mut self) {
        self.session.in_loop = false;
        if self.session.level < self.config.title_levels {
            self.cues.show_tip_for(
                TipText::title(TITLE),
                self.config.title_hold_ms,
                Continuation::Begin,
            );
        } else {
            self.cues.show_tip(TipText::Empty);
            self.begin();
        }
    }

    fn begin(&mut self) {
        let hooks = Rc::clone(&self.session.hooks);
        hooks.on_init(&mut self.session, &mut self.cues);
        self.session.started_at_ms = self.cues.now_ms();
        self.session.in_loop = true;
        log::info!("level {} started", self.session.level);
        self.cues.emit(GameEvent::LevelStarted {
            level: self.session.level,
        });
    }

    /// Finish the current level.
    ///
    /// Failure stops the loop, shows the failure line and restarts from the
    /// first playable level. Success leaves only the end light on, frames it,
    /// and waits for [`Game::continue_play`].
    pub fn end_level(&mut self, success: bool) {
        let hooks = Rc::clone(&self.session.hooks);
        hooks.on_end(&mut self.session, &mut self.cues, success);
        self.cues.next_generation();
        let level = self.session.level;

        if !success {
            log::info!("level {} failed", level);
            self.session.in_loop = false;
            self.cues.emit(GameEvent::LevelFailed { level });
            self.cues.show_tip_for(
                TipText::line(FAILURE_LINE),
                self.config.failure_hold_ms,
                Continuation::Restart,
            );
            return;
        }

        log::info!("level {} complete", level);
        let last = self.session.lights.len().saturating_sub(1);
        for light in &mut self.session.lights[..last] {
            light.lit = false;
        }
        if let Some(end) = self.session.end_light_mut() {
            end.lit = true;
            end.interactive = false;
        }
        if let Some(end) = self.session.end_light() {
            let (pos, stage) = (end.pos, self.session.stage);
            self.session.viewport.focus(pos, stage, self.config.success_zoom);
        }
        self.awaiting_continue = true;
        self.cues.emit(GameEvent::LevelComplete { level });
        self.cues.emit(GameEvent::ContinuePrompt);
    }

    /// The player accepted the continue prompt after a win.
    pub fn continue_play(&mut self) {
        if !std::mem::take(&mut self.awaiting_continue) {
            log::debug!("continue ignored: no level won");
            return;
        }
        self.session.in_loop = false;
        let next = self.session.level + 1;
        if self.levels.has(next) {
            self.prepare_or_warn(next);
        } else {
            self.finish_campaign();
        }
    }

    /// Leave the current level for the next one after a short blank tip.
    pub fn next_level(&mut self) {
        self.session.in_loop = false;
        self.cues.show_tip_for(TipText::Empty, 1.0, Continuation::PrepareNext);
    }

    fn finish_campaign(&mut self) {
        log::info!("campaign complete");
        self.session.in_loop = false;
        self.cues.show_tip(TipText::Title {
            heading: ENDING_HEADING.to_string(),
            body: Some(ENDING_BODY.to_string()),
        });
        self.cues.emit(GameEvent::CampaignComplete);
    }

    fn prepare_or_warn(&mut self, index: usize) {
        if let Err(e) = self.prepare_level(index, Continuation::Start) {
            log::warn!("cannot prepare level {}: {}", index, e);
            self.finish_campaign();
        }
    }

    fn run(&mut self, continuation: Continuation) {
        match continuation {
            Continuation::Nothing => {}
            Continuation::Start => self.start(),
            Continuation::Begin => self.begin(),
            Continuation::Restart => self.prepare_or_warn(self.config.first_level),
            Continuation::NextLevel => self.next_level(),
            Continuation::PrepareNext => self.prepare_or_warn(self.session.level + 1),
            Continuation::Tip(tip) => self.cues.play(*tip),
        }
    }

    fn fire(&mut self, cue: Cue) {
        match cue {
            Cue::FadeTip(then) => {
                self.cues.emit(GameEvent::FadeTip);
                let fade = self.cues.fade_ms();
                self.cues.after(fade, Cue::Run(then));
            }
            Cue::Run(then) => self.run(then),
            Cue::Script(step) => self.script_step(step),
        }
    }

    fn script_step(&mut self, step: ScriptStep) {
        step.apply(&mut self.session);
        if step.finish {
            self.store.set_tutorial_seen(true);
            log::info!("tutorial finished");
            self.cues.play(tutorial_handover());
        }
    }

    // -- Input --

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Feed a raw pointer event through gesture classification.
    pub fn pointer(&mut self, event: PointerEvent) {
        if let Some(gesture) = self.gestures.handle(event) {
            self.input.push(gesture);
        }
    }

    fn apply_input<S: Surface>(&mut self, mask: &S) {
        if !self.accepting_input {
            self.input.clear();
            return;
        }
        for event in self.input.drain() {
            let InputOutcome { toggled, handed_off } =
                self.controls.apply(event, &mut self.session, |p| mask.sample(p));
            if handed_off {
                log::debug!("player took over level {}", self.session.level);
            }
            if !toggled.is_empty() {
                log::trace!("toggled {:?}", toggled);
            }
        }
    }

    // -- Frame --

    /// Advance the clock to `now_ms`: fire due cues, apply queued input and,
    /// while the loop is enabled, run one frame into `main`/`mask`.
    ///
    /// Returns whether the loop is still enabled.
    pub fn tick<S: Surface>(&mut self, now_ms: f64, main: &mut S, mask: &mut S) -> bool {
        self.cues.set_now(now_ms);
        while let Some(cue) = self.cues.pop_due() {
            self.fire(cue);
        }

        self.apply_input(mask);

        if self.session.in_loop {
            self.frame(main, mask);
        }
        self.session.in_loop
    }

    /// One frame: camera, light power and behaviors, win/loss, level tick
    /// hook, then rendering.
    pub fn frame<S: Surface>(&mut self, main: &mut S, mask: &mut S) {
        let now = self.cues.now_ms();
        let window = self.session.window;
        let stage = self.session.stage;
        self.session.viewport.update(window, stage, self.config.camera_smoothing);

        let elapsed = self.session.elapsed_ms(now);
        let lit = self.session.count_lit();
        let signal = update_lights(&mut self.session, self.flicker.as_mut(), elapsed);
        if signal == Signal::LevelComplete {
            self.end_level(true);
        }

        if self.session.level > 0 && lit == 0 {
            self.end_level(false);
            return;
        }

        let hooks = Rc::clone(&self.session.hooks);
        hooks.on_tick(&mut self.session, &mut self.cues, elapsed);

        render_frame(&self.session, &self.sheet, main, mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::color::Rgb;
    use crate::core::level::{LevelDescriptor, LevelHooks, LightDef};
    use crate::core::rng::NoFlicker;
    use crate::core::storage::MemoryStore;
    use crate::renderer::software::PixelSurface;
    use std::cell::Cell;

    const W: u32 = 800;
    const H: u32 = 600;

    struct Host {
        game: Game,
        main: PixelSurface,
        mask: PixelSurface,
        events: Vec<GameEvent>,
    }

    impl Host {
        fn new(tutorial_seen: bool) -> Self {
            Self::with_levels(LevelSet::builtin(), tutorial_seen)
        }

        fn with_levels(levels: LevelSet, tutorial_seen: bool) -> Self {
            let game = Game::new(
                GameConfig::default(),
                levels,
                SpriteSheet::builtin(),
                Box::new(MemoryStore::new(tutorial_seen)),
                Box::new(NoFlicker),
            );
            Self {
                game,
                main: PixelSurface::new(W, H),
                mask: PixelSurface::new(W, H),
                events: Vec::new(),
            }
        }

        /// Tick, answering stage requests right away.
        fn tick(&mut self, now_ms: f64) -> bool {
            let running = self.game.tick(now_ms, &mut self.main, &mut self.mask);
            self.collect();
            running
        }

        fn collect(&mut self) {
            loop {
                let events = self.game.drain_events();
                if events.is_empty() {
                    break;
                }
                let stage = events
                    .iter()
                    .any(|e| matches!(e, GameEvent::StageRequested { .. }));
                self.events.extend(events);
                if stage {
                    self.game.stage_ready();
                }
            }
        }

        fn run_until(&mut self, from_ms: f64, to_ms: f64) {
            let mut t = from_ms;
            while t <= to_ms {
                self.tick(t);
                t += 16.0;
            }
        }

        fn saw(&self, event: &GameEvent) -> bool {
            self.events.contains(event)
        }

        fn boot(&mut self) {
            self.game.boot(0.0).unwrap();
            self.collect();
        }

        /// Boot, then sit through the 3 s title and 1 s fade.
        fn boot_and_play(&mut self) {
            self.boot();
            self.tick(3000.0);
            assert!(self.tick(4000.0));
        }
    }

    #[test]
    fn boot_plays_tutorial_when_unseen() {
        let mut host = Host::new(false);
        host.boot();
        assert_eq!(host.game.session().level, 0);
        assert!(host.saw(&GameEvent::StageRequested { level: 0, width: 1000.0, height: 500.0 }));
        assert!(host.saw(&GameEvent::ShowTip(TipText::title(TITLE))));
        assert!(!host.game.session().in_loop);

        host.tick(3000.0);
        assert!(host.saw(&GameEvent::FadeTip));
        assert!(!host.game.session().in_loop);

        assert!(host.tick(4000.0));
        assert!(host.saw(&GameEvent::LevelStarted { level: 0 }));
        assert_eq!(host.game.session().started_at_ms, 4000.0);
        assert!(host.game.session().lights[0].lit);
    }

    #[test]
    fn boot_skips_tutorial_once_seen() {
        let mut host = Host::new(true);
        host.boot();
        assert_eq!(host.game.session().level, 1);
        // Level 1 still gets the title.
        assert!(host.saw(&GameEvent::ShowTip(TipText::title(TITLE))));
    }

    #[test]
    fn later_levels_start_without_title() {
        let mut host = Host::new(true);
        host.game.prepare_level(3, Continuation::Start).unwrap();
        host.collect();
        assert!(host.game.session().in_loop);
        assert!(host.saw(&GameEvent::ShowTip(TipText::Empty)));
        assert!(host.saw(&GameEvent::LevelStarted { level: 3 }));
    }

    #[test]
    fn prepare_sets_fitted_zoom() {
        let mut host = Host::new(true);
        host.boot();
        // level 1 lights span 600 x 0: width-limited at 800 / 600 * 0.8
        let vp = host.game.session().viewport;
        let expected = (800.0f32 / 600.0) * 0.8;
        assert!((vp.target_zoom - expected).abs() < 1e-5);
        assert_eq!(vp.zoom, vp.target_zoom);
    }

    #[test]
    fn no_light_means_failure_and_restart() {
        let mut host = Host::new(true);
        host.game.prepare_level(3, Continuation::Start).unwrap();
        host.collect();
        host.tick(100.0);
        for light in &mut host.game.session_mut().lights {
            light.lit = false;
        }

        assert!(!host.tick(200.0));
        assert!(host.saw(&GameEvent::LevelFailed { level: 3 }));
        assert!(host.saw(&GameEvent::ShowTip(TipText::line(FAILURE_LINE))));
        assert!(!host.game.session().in_loop);

        host.tick(2200.0);
        assert_eq!(host.game.session().level, 3);
        host.tick(3200.0);
        assert_eq!(host.game.session().level, 1);
        assert!(host.saw(&GameEvent::StageRequested { level: 1, width: 1000.0, height: 500.0 }));
    }

    #[test]
    fn tutorial_never_fails() {
        let mut host = Host::new(false);
        host.boot_and_play();
        for light in &mut host.game.session_mut().lights {
            light.lit = false;
        }
        assert!(host.tick(4016.0));
    }

    #[test]
    fn reaching_the_orb_wins() {
        let mut host = Host::new(true);
        host.boot_and_play();
        {
            let s = host.game.session_mut();
            s.lights[3].lit = true;
            let end = s.end_light_mut().unwrap();
            end.lit = true;
            end.interactive = true;
        }

        assert!(host.tick(4016.0));
        assert!(host.saw(&GameEvent::LevelComplete { level: 1 }));
        assert!(host.saw(&GameEvent::ContinuePrompt));
        let s = host.game.session();
        let last = s.lights.len() - 1;
        assert!(s.lights[..last].iter().all(|l| !l.lit));
        assert!(s.lights[last].lit && !s.lights[last].interactive);
        assert_eq!(s.viewport.target_zoom, 2.0);
        assert_eq!(s.viewport.target_offset, Vec2::new(800.0 - 500.0, 0.0));

        // Still running: the camera eases toward the orb.
        host.tick(4032.0);
        assert!(host.game.is_awaiting_continue());

        host.game.continue_play();
        host.collect();
        assert_eq!(host.game.session().level, 2);
        assert!(!host.game.is_awaiting_continue());
    }

    #[test]
    fn winning_the_last_level_ends_the_campaign() {
        let mut host = Host::new(true);
        host.game.prepare_level(7, Continuation::Start).unwrap();
        host.collect();
        host.game.end_level(true);
        host.game.continue_play();
        host.collect();
        assert!(host.saw(&GameEvent::CampaignComplete));
        assert!(host.saw(&GameEvent::ShowTip(TipText::Title {
            heading: ENDING_HEADING.into(),
            body: Some(ENDING_BODY.into()),
        })));
        assert!(!host.game.session().in_loop);
    }

    #[test]
    fn continue_without_win_is_ignored() {
        let mut host = Host::new(true);
        host.boot();
        host.game.continue_play();
        host.collect();
        assert_eq!(host.game.session().level, 1);
    }

    #[test]
    fn tapping_a_lamp_in_the_light() {
        let mut host = Host::new(true);
        host.boot_and_play();
        host.tick(4016.0);

        let target = host.game.session().lights[1].pos;
        let at = host.game.session().viewport.stage_to_screen(target);
        host.game.pointer(PointerEvent::Down { x: at.x, y: at.y, time_ms: 5000.0 });
        host.game.pointer(PointerEvent::Up { time_ms: 5100.0 });
        host.tick(5100.0);

        let s = host.game.session();
        assert!(s.lights[1].lit);
        assert!(s.lights[0].interactive);
        assert!(!s.end_light().unwrap().lit);
        assert!(s.end_light().unwrap().interactive);
    }

    #[test]
    fn tapping_in_the_dark_does_nothing() {
        let mut host = Host::new(true);
        host.boot_and_play();
        host.tick(4016.0);

        // Light 4 sits outside the start lamp's disc.
        let target = host.game.session().lights[4].pos;
        let at = host.game.session().viewport.stage_to_screen(target);
        assert_eq!(host.mask.sample(at), Rgb::BLACK);
        host.game.push_input(InputEvent::Tap { x: at.x, y: at.y });
        host.tick(4032.0);
        assert!(!host.game.session().lights[4].lit);
    }

    #[test]
    fn dragging_pans_the_camera() {
        let mut host = Host::new(true);
        host.boot_and_play();
        let zoom = host.game.session().viewport.zoom;
        let before = host.game.session().viewport.offset;

        host.game.pointer(PointerEvent::Down { x: 400.0, y: 300.0, time_ms: 4010.0 });
        host.game.pointer(PointerEvent::Move { x: 380.0, y: 300.0 });
        host.game.pointer(PointerEvent::Move { x: 350.0, y: 300.0 });
        host.game.pointer(PointerEvent::Up { time_ms: 4100.0 });
        host.game.apply_input(&host.mask);

        let after = host.game.session().viewport.offset;
        assert!((after.x - (before.x + 50.0 / zoom)).abs() < 1e-4);
        assert_eq!(after.y, before.y);
    }

    #[test]
    fn tutorial_runs_to_level_one() {
        let mut host = Host::new(false);
        host.boot();
        // 16 ms frames: the title fades at 3008 and play begins at 4016,
        // so the 13 s timeline finishes at 17016.
        host.run_until(0.0, 17100.0);
        assert!(host.game.progress().tutorial_seen());
        assert!(host.saw(&GameEvent::ShowTip(TipText::line("Now your turn ..."))));
        assert_eq!(host.game.session().level, 0);

        // 2000 hold + 1000 fade, then a 1 ms blank tip + 1000 fade.
        host.run_until(17116.0, 21600.0);
        assert_eq!(host.game.session().level, 1);
        assert!(host.saw(&GameEvent::StageRequested { level: 1, width: 1000.0, height: 500.0 }));
    }

    #[test]
    fn failure_drops_pending_level_cues() {
        let mut host = Host::new(true);
        host.game.prepare_level(2, Continuation::Start).unwrap();
        host.collect();
        assert!(host.events.iter().any(|e| matches!(e, GameEvent::ShowTip(TipText::Quote { .. }))));
        host.events.clear();

        host.game.end_level(false);
        host.collect();
        // Only the failure line's fade is left; the quote's is gone.
        assert_eq!(host.game.cues.pending_len(), 1);
        assert_eq!(host.game.cues.next_deadline(), Some(2000.0));
    }

    #[test]
    fn leaving_the_tutorial_drops_its_timeline() {
        let mut host = Host::new(false);
        host.boot();
        host.run_until(0.0, 5000.0);
        let tutorial_generation = host.game.cues.generation();

        host.game.prepare_level(1, Continuation::Start).unwrap();
        host.collect();
        assert!(host.game.cues.generation() > tutorial_generation);

        // Title 3 s, fade 1 s: level 1 is in play well before 9500.
        host.run_until(5008.0, 9500.0);
        assert!(host.game.session().in_loop);
        let lit: Vec<bool> = host.game.session().lights.iter().map(|l| l.lit).collect();

        // Past the point where the tutorial timeline would have finished.
        host.run_until(9516.0, 20000.0);
        let s = host.game.session();
        assert_eq!(s.level, 1);
        assert_eq!(s.lights.iter().map(|l| l.lit).collect::<Vec<_>>(), lit);
        assert!(!host.game.progress().tutorial_seen());
        assert!(!host.saw(&GameEvent::ShowTip(TipText::line("Now your turn ..."))));
    }

    #[test]
    fn resize_feeds_the_next_frame() {
        let mut host = Host::new(true);
        host.boot_and_play();

        host.game.resize(1200.0, 300.0);
        host.main.resize(1200, 300);
        host.mask.resize(1200, 300);
        assert!(host.tick(4016.0));

        let vp = host.game.session().viewport;
        let visible = vp.extent * vp.zoom;
        assert!((visible - Vec2::new(1200.0, 300.0)).abs().max_element() < 1e-3);
        assert_eq!(host.mask.size(), Vec2::new(1200.0, 300.0));

        // level 1 lights span 600 x 0: width-limited at 1200 / 600 * 0.8
        host.game.prepare_level(1, Continuation::Start).unwrap();
        host.collect();
        let zoom = host.game.session().viewport.target_zoom;
        assert!((zoom - 1.6).abs() < 1e-5);
    }

    #[test]
    fn end_hook_runs_on_both_outcomes() {
        struct Counting(Rc<Cell<(u32, u32)>>);
        impl LevelHooks for Counting {
            fn on_end(&self, _s: &mut Session, _c: &mut Cues, success: bool) {
                let (won, lost) = self.0.get();
                self.0.set(if success { (won + 1, lost) } else { (won, lost + 1) });
            }
        }

        let counts = Rc::new(Cell::new((0, 0)));
        let level = LevelDescriptor::new(400.0, 400.0)
            .with_light(LightDef::new(100.0, 100.0).with_lit(true))
            .with_light(LightDef::new(300.0, 300.0))
            .with_hooks(Rc::new(Counting(Rc::clone(&counts))));
        let mut levels = LevelSet::default();
        levels.push(level.clone());
        levels.push(level);

        let mut host = Host::with_levels(levels, true);
        host.boot();
        host.game.end_level(true);
        host.game.end_level(false);
        assert_eq!(counts.get(), (1, 1));
    }

    #[test]
    fn config_overrides_from_json() {
        let config = GameConfig::from_json(r#"{ "success_zoom": 3.0, "first_level": 2 }"#).unwrap();
        assert_eq!(config.success_zoom, 3.0);
        assert_eq!(config.first_level, 2);
        assert_eq!(config.tap_threshold, 65000);
        assert_eq!(config.camera_smoothing, 0.03);
    }

    #[test]
    fn boot_with_no_levels_is_an_error() {
        let mut host = Host::with_levels(LevelSet::default(), false);
        assert!(matches!(host.game.boot(0.0), Err(EngineError::UnknownLevel(0))));
    }
}
