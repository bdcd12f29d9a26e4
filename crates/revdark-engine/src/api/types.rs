/// Text shown in the narrative tip overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipText {
    /// Hide the overlay content.
    Empty,
    /// Large heading with an optional line under it.
    Title { heading: String, body: Option<String> },
    /// Narrative line; `\n` separates lines.
    Line(String),
    /// Quotation with attribution, shown at the start of a level.
    Quote { text: String, author: String },
}

impl TipText {
    pub fn title(heading: &str) -> Self {
        TipText::Title {
            heading: heading.to_string(),
            body: None,
        }
    }

    pub fn line(text: &str) -> Self {
        TipText::Line(text.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TipText::Empty)
    }
}

/// Something the host should present. Drained once per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Replace the tip overlay content and make it visible.
    ShowTip(TipText),
    /// Fade the tip overlay out.
    FadeTip,
    /// A level was prepared; the host builds a stage-sized background and
    /// calls `Game::stage_ready` once it can draw it.
    StageRequested { level: usize, width: f32, height: f32 },
    LevelStarted { level: usize },
    LevelFailed { level: usize },
    LevelComplete { level: usize },
    /// Offer the player a "play more" control that calls `Game::continue_play`.
    ContinuePrompt,
    /// The last level was finished.
    CampaignComplete,
}
