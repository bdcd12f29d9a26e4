//! Built-in level scripts: the tutorial timeline and opening quotes.

use serde::{Deserialize, Serialize};

use super::cues::{Continuation, Cue, Cues, TimedTip};
use super::level::LevelHooks;
use super::session::Session;
use crate::api::types::TipText;

/// How long narrative and quote tips stay up before fading.
pub const NARRATIVE_HOLD_MS: f64 = 3000.0;
/// How long the hand-over tip at the end of the tutorial stays up.
pub const HANDOVER_HOLD_MS: f64 = 2000.0;

/// Data-driven level hooks, selectable from a level file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelScript {
    /// Show a quotation when the level starts.
    Quote { text: String, author: String },
    /// The scripted walkthrough played on level 0.
    Tutorial,
}

impl LevelHooks for LevelScript {
    fn on_init(&self, session: &mut Session, cues: &mut Cues) {
        match self {
            LevelScript::Quote { text, author } => cues.show_tip_for(
                TipText::Quote {
                    text: text.clone(),
                    author: author.clone(),
                },
                NARRATIVE_HOLD_MS,
                Continuation::Nothing,
            ),
            LevelScript::Tutorial => schedule_tutorial(session, cues),
        }
    }
}

/// One timed change in a scripted level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptStep {
    /// `(light index, lit)` pairs to apply.
    pub switch: Vec<(usize, bool)>,
    /// Stage column to pan the camera to.
    pub pan_x: Option<f32>,
    pub zoom: Option<f32>,
    /// Ends the tutorial: record progress and hand over to the player.
    pub finish: bool,
}

impl ScriptStep {
    fn new() -> Self {
        Self::default()
    }

    fn on(mut self, index: usize) -> Self {
        self.switch.push((index, true));
        self
    }

    fn off(mut self, index: usize) -> Self {
        self.switch.push((index, false));
        self
    }

    fn pan(mut self, x: f32) -> Self {
        self.pan_x = Some(x);
        self
    }

    fn zoom(mut self, zoom: f32) -> Self {
        self.zoom = Some(zoom);
        self
    }

    fn finish(mut self) -> Self {
        self.finish = true;
        self
    }

    /// Apply the light and camera changes. Out-of-range indices are skipped.
    pub fn apply(&self, session: &mut Session) {
        for &(index, lit) in &self.switch {
            match session.lights.get_mut(index) {
                Some(light) => light.lit = lit,
                None => log::warn!("script step names missing light {}", index),
            }
        }
        if let Some(x) = self.pan_x {
            session.pan_to_x(x);
        }
        if let Some(zoom) = self.zoom {
            session.viewport.target_zoom = zoom;
        }
    }
}

/// The tutorial timeline, as (offset from level start in ms, step).
pub fn tutorial_steps() -> Vec<(f64, ScriptStep)> {
    vec![
        (2000.0, ScriptStep::new().on(1)),
        (2500.0, ScriptStep::new().on(2).pan(400.0)),
        (3000.0, ScriptStep::new().on(3).pan(500.0)),
        (3500.0, ScriptStep::new().on(4).pan(600.0)),
        (6000.0, ScriptStep::new().off(0)),
        (6500.0, ScriptStep::new().off(1)),
        (7000.0, ScriptStep::new().off(2)),
        (7500.0, ScriptStep::new().off(3)),
        (8000.0, ScriptStep::new().on(5).pan(700.0)),
        (8500.0, ScriptStep::new().on(6).pan(800.0)),
        (10000.0, ScriptStep::new().off(0).off(4).off(5).zoom(2.0)),
        (13000.0, ScriptStep::new().off(6).finish()),
    ]
}

/// Narrative tips played over the tutorial, chained back to back.
pub fn tutorial_narrative() -> TimedTip {
    let line = |s: &str| TipText::Line(s.to_string());
    let last = TimedTip::new(
        line("... to the orb of awesomeness."),
        NARRATIVE_HOLD_MS,
        Continuation::Nothing,
    );
    let middle = TimedTip::new(
        line("... and finding your way ..."),
        NARRATIVE_HOLD_MS,
        last.into_continuation(),
    );
    TimedTip::new(
        line("Illuminate the darkness around you,\nby tapping the lamps ..."),
        NARRATIVE_HOLD_MS,
        middle.into_continuation(),
    )
}

/// The tip shown once the tutorial timeline is over; leads into level 1.
pub fn tutorial_handover() -> TimedTip {
    TimedTip::new(
        TipText::Line("Now your turn ...".to_string()),
        HANDOVER_HOLD_MS,
        Continuation::NextLevel,
    )
}

fn schedule_tutorial(session: &mut Session, cues: &mut Cues) {
    cues.play(tutorial_narrative());
    if let Some(start) = session.start_light_mut() {
        start.lit = true;
    }
    for (at_ms, step) in tutorial_steps() {
        cues.after(at_ms, Cue::Script(step));
    }
}
