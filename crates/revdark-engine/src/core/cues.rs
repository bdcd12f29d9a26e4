//! Delayed cues: timed tips, level transitions and scripted steps.
//!
//! Cues are fired by the game clock, not by the frame loop, so they keep
//! running while the loop is disabled (intro and failure messages). Every cue
//! is stamped with the generation that scheduled it; a cue from an older
//! generation is dropped instead of fired.

use crate::api::types::{GameEvent, TipText};
use super::script::ScriptStep;

/// Delay between a tip starting to fade and its continuation running.
pub const TIP_FADE_MS: f64 = 1000.0;

/// What happens when a delayed step completes.
#[derive(Debug, Clone, PartialEq)]
pub enum Continuation {
    Nothing,
    /// Play the level intro, then begin.
    Start,
    /// Run the init hook, stamp the start time and enable the loop.
    Begin,
    /// Prepare the first playable level and start it.
    Restart,
    /// Leave the current level and move to the next one.
    NextLevel,
    /// Prepare the level after the current one and start it.
    PrepareNext,
    /// Show another timed tip.
    Tip(Box<TimedTip>),
}

/// A tip shown for `hold_ms`, then faded, then followed by `then`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedTip {
    pub text: TipText,
    pub hold_ms: f64,
    pub then: Continuation,
}

impl TimedTip {
    pub fn new(text: TipText, hold_ms: f64, then: Continuation) -> Self {
        Self { text, hold_ms, then }
    }

    /// Wrap as a continuation, for chaining tips.
    pub fn into_continuation(self) -> Continuation {
        Continuation::Tip(Box::new(self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    /// Fade the tip, then run the continuation after [`TIP_FADE_MS`].
    FadeTip(Continuation),
    Run(Continuation),
    Script(ScriptStep),
}

#[derive(Debug, Clone)]
struct Scheduled {
    due_ms: f64,
    seq: u64,
    generation: u64,
    cue: Cue,
}

/// Clock-driven cue queue plus the outgoing event list.
#[derive(Debug)]
pub struct Cues {
    now_ms: f64,
    generation: u64,
    seq: u64,
    fade_ms: f64,
    pending: Vec<Scheduled>,
    events: Vec<GameEvent>,
}

impl Cues {
    pub fn new() -> Self {
        Self::with_fade(TIP_FADE_MS)
    }

    pub fn with_fade(fade_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            generation: 0,
            seq: 0,
            fade_ms,
            pending: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance the clock. Time never runs backwards.
    pub fn set_now(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn fade_ms(&self) -> f64 {
        self.fade_ms
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidate every cue scheduled so far.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        let current = self.generation;
        let before = self.pending.len();
        self.pending.retain(|s| s.generation == current);
        let dropped = before - self.pending.len();
        if dropped > 0 {
            log::debug!("dropped {} stale cue(s)", dropped);
        }
        current
    }

    /// Schedule `cue` to fire `delay_ms` from now.
    pub fn after(&mut self, delay_ms: f64, cue: Cue) {
        self.seq += 1;
        self.pending.push(Scheduled {
            due_ms: self.now_ms + delay_ms,
            seq: self.seq,
            generation: self.generation,
            cue,
        });
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Show a tip with no timer.
    pub fn show_tip(&mut self, text: TipText) {
        self.emit(GameEvent::ShowTip(text));
    }

    /// Show a tip for `hold_ms`, fade it, then run `then`.
    pub fn show_tip_for(&mut self, text: TipText, hold_ms: f64, then: Continuation) {
        self.emit(GameEvent::ShowTip(text));
        self.after(hold_ms, Cue::FadeTip(then));
    }

    pub fn play(&mut self, tip: TimedTip) {
        self.show_tip_for(tip.text, tip.hold_ms, tip.then);
    }

    /// Remove and return the earliest cue that is due, in scheduling order for ties.
    pub fn pop_due(&mut self) -> Option<Cue> {
        let now = self.now_ms;
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= now)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)?;
        let scheduled = self.pending.swap_remove(idx);
        if scheduled.generation != self.generation {
            log::debug!("dropping stale cue {:?}", scheduled.cue);
            return self.pop_due();
        }
        Some(scheduled.cue)
    }

    /// When the next cue is due, if any.
    pub fn next_deadline(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|s| s.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl Default for Cues {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_fire_in_due_order() {
        let mut cues = Cues::new();
        cues.after(200.0, Cue::Run(Continuation::Restart));
        cues.after(100.0, Cue::Run(Continuation::Start));
        cues.after(100.0, Cue::Run(Continuation::NextLevel));

        cues.set_now(99.0);
        assert_eq!(cues.pop_due(), None);

        cues.set_now(250.0);
        assert_eq!(cues.pop_due(), Some(Cue::Run(Continuation::Start)));
        assert_eq!(cues.pop_due(), Some(Cue::Run(Continuation::NextLevel)));
        assert_eq!(cues.pop_due(), Some(Cue::Run(Continuation::Restart)));
        assert_eq!(cues.pop_due(), None);
    }

    #[test]
    fn new_generation_drops_pending() {
        let mut cues = Cues::new();
        cues.after(10.0, Cue::Run(Continuation::Start));
        cues.next_generation();
        cues.after(20.0, Cue::Run(Continuation::Restart));
        assert_eq!(cues.pending_len(), 1);
        cues.set_now(100.0);
        assert_eq!(cues.pop_due(), Some(Cue::Run(Continuation::Restart)));
    }

    #[test]
    fn timed_tip_emits_and_schedules_fade() {
        let mut cues = Cues::new();
        cues.set_now(1000.0);
        cues.show_tip_for(TipText::Line("hi".into()), 3000.0, Continuation::Start);
        assert_eq!(
            cues.drain_events(),
            vec![GameEvent::ShowTip(TipText::Line("hi".into()))]
        );
        assert_eq!(cues.next_deadline(), Some(4000.0));
        cues.set_now(4000.0);
        assert_eq!(cues.pop_due(), Some(Cue::FadeTip(Continuation::Start)));
    }

    #[test]
    fn clock_is_monotonic() {
        let mut cues = Cues::new();
        cues.set_now(50.0);
        cues.set_now(10.0);
        assert_eq!(cues.now_ms(), 50.0);
    }
}
