/// Gestures the game reacts to, already classified from raw pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A short press released at screen pixel (x, y).
    Tap { x: f32, y: f32 },
    /// The pointer moved far enough from the press point to start panning.
    DragStart,
    /// Press point minus current pointer position, in screen pixels.
    DragMove { dx: f32, dy: f32 },
    DragEnd,
}

/// A queue of input events.
/// The host pushes events as they arrive; the game drains them each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop everything pending, e.g. when a level is torn down.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
