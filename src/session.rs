//! Interactive session view state.
//!
//! The host UI owns one [`SessionState`] and threads it through every
//! render step: each transition consumes the previous state and returns the
//! next, so the pipeline components stay stateless and the display layer
//! only ever reads. Upload progress arrives as [`UploadEvent`]s rather than
//! through a shared mutable value.

use crate::category::{Category, SheetAssignment};
use crate::workshop::UploadEvent;
use std::collections::HashMap;
use std::path::PathBuf;

/// Preview playback rate in frames per second.
pub const PREVIEW_FPS: f64 = 8.0;

/// Which tool tab is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Generate,
    Workshop,
}

/// Everything the interactive surface needs between two render steps.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub tab: Tab,
    pub character_name: String,
    pub additional_names: Vec<String>,
    pub assignments: Vec<SheetAssignment>,
    /// Current preview frame per category name
    pub frame_index: HashMap<String, usize>,
    /// Category currently playing its preview, if any (at most one)
    pub playing: Option<String>,
    /// Clock value of the last frame advance
    pub last_frame_time: f64,
    /// Last reported upload progress in [0, 1]
    pub upload_progress: f32,
    /// Bundle produced by the most recent export, if any
    pub last_bundle: Option<PathBuf>,
}

impl SessionState {
    /// Fresh session over the given category table.
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            tab: Tab::default(),
            character_name: "NewCharacter".to_string(),
            additional_names: Vec::new(),
            assignments: categories
                .into_iter()
                .map(SheetAssignment::unassigned)
                .collect(),
            frame_index: HashMap::new(),
            playing: None,
            last_frame_time: 0.0,
            upload_progress: 0.0,
            last_bundle: None,
        }
    }

    pub fn select_tab(mut self, tab: Tab) -> Self {
        self.tab = tab;
        self
    }

    pub fn add_additional_name(mut self, name: impl Into<String>) -> Self {
        self.additional_names.push(name.into());
        self
    }

    /// Remove one additional name by position; out-of-range is a no-op.
    pub fn remove_additional_name(mut self, index: usize) -> Self {
        if index < self.additional_names.len() {
            self.additional_names.remove(index);
        }
        self
    }

    /// Replace the assignment table (e.g. after an auto-assign run).
    pub fn with_assignments(mut self, assignments: Vec<SheetAssignment>) -> Self {
        self.assignments = assignments;
        self
    }

    /// Start playing one category's preview, stopping any other.
    pub fn play(mut self, category: &str) -> Self {
        self.playing = Some(category.to_string());
        self
    }

    /// Stop the preview if the given category is the one playing.
    pub fn pause(mut self, category: &str) -> Self {
        if self.playing.as_deref() == Some(category) {
            self.playing = None;
        }
        self
    }

    /// Advance the playing preview if enough time has passed.
    ///
    /// `now` is the host clock in seconds; `frame_counts` maps category
    /// names to their available frame count. Advances at [`PREVIEW_FPS`],
    /// wrapping the frame index.
    pub fn advance_preview(mut self, now: f64, frame_counts: &HashMap<String, usize>) -> Self {
        let Some(category) = self.playing.clone() else {
            return self;
        };
        let Some(&count) = frame_counts.get(&category) else {
            return self;
        };
        if count == 0 {
            return self;
        }

        if now - self.last_frame_time > 1.0 / PREVIEW_FPS {
            let index = self.frame_index.entry(category).or_insert(0);
            *index = (*index + 1) % count;
            self.last_frame_time = now;
        }
        self
    }

    /// Fold one upload progress event into the display state.
    pub fn apply_upload_event(mut self, event: &UploadEvent) -> Self {
        match event {
            UploadEvent::Started => self.upload_progress = 0.0,
            UploadEvent::Progress(fraction) => self.upload_progress = *fraction,
            UploadEvent::Finished(outcome) => {
                if outcome.success {
                    self.upload_progress = 1.0;
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::default_categories;
    use crate::workshop::UploadOutcome;

    fn counts(category: &str, count: usize) -> HashMap<String, usize> {
        HashMap::from([(category.to_string(), count)])
    }

    #[test]
    fn test_new_session() {
        let state = SessionState::new(default_categories());
        assert_eq!(state.tab, Tab::Generate);
        assert_eq!(state.character_name, "NewCharacter");
        assert_eq!(state.assignments.len(), 12);
        assert!(state.assignments.iter().all(|a| !a.is_assigned()));
        assert!(state.playing.is_none());
    }

    #[test]
    fn test_play_is_exclusive() {
        let state = SessionState::new(default_categories())
            .play("Idle")
            .play("Move-Front");
        assert_eq!(state.playing.as_deref(), Some("Move-Front"));
    }

    #[test]
    fn test_pause_only_affects_playing_category() {
        let state = SessionState::new(default_categories()).play("Idle");
        let state = state.pause("Move-Front");
        assert_eq!(state.playing.as_deref(), Some("Idle"));
        let state = state.pause("Idle");
        assert!(state.playing.is_none());
    }

    #[test]
    fn test_preview_advances_at_fps_and_wraps() {
        let mut state = SessionState::new(default_categories()).play("Idle");
        let frames = counts("Idle", 8);

        // Too soon: no advance.
        state = state.advance_preview(0.05, &frames);
        assert_eq!(state.frame_index.get("Idle"), None);

        // Past the frame interval: advances once.
        state = state.advance_preview(0.2, &frames);
        assert_eq!(state.frame_index["Idle"], 1);

        // Wraps around after the last frame.
        for tick in 1..8 {
            state = state.advance_preview(0.2 + tick as f64, &frames);
        }
        assert_eq!(state.frame_index["Idle"], 0);
    }

    #[test]
    fn test_preview_ignores_unknown_or_empty_categories() {
        let state = SessionState::new(default_categories()).play("Idle");
        let advanced = state.clone().advance_preview(10.0, &HashMap::new());
        assert_eq!(advanced.frame_index.get("Idle"), None);

        let advanced = state.advance_preview(10.0, &counts("Idle", 0));
        assert_eq!(advanced.frame_index.get("Idle"), None);
    }

    #[test]
    fn test_additional_name_edits() {
        let state = SessionState::new(default_categories())
            .add_additional_name("Rexy")
            .add_additional_name("Wrecks")
            .remove_additional_name(0);
        assert_eq!(state.additional_names, vec!["Wrecks"]);

        // Out of range removal is a no-op.
        let state = state.remove_additional_name(5);
        assert_eq!(state.additional_names, vec!["Wrecks"]);
    }

    #[test]
    fn test_upload_events_drive_progress() {
        let state = SessionState::new(default_categories())
            .apply_upload_event(&UploadEvent::Started)
            .apply_upload_event(&UploadEvent::Progress(0.4));
        assert_eq!(state.upload_progress, 0.4);

        let done = state.clone().apply_upload_event(&UploadEvent::Finished(UploadOutcome {
            success: true,
            needs_agreement: false,
        }));
        assert_eq!(done.upload_progress, 1.0);

        // A failed finish keeps the last reported fraction.
        let failed = state.apply_upload_event(&UploadEvent::Finished(UploadOutcome {
            success: false,
            needs_agreement: false,
        }));
        assert_eq!(failed.upload_progress, 0.4);
    }
}
