use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::config::Config;
use crate::navigation::{FocusTarget, NavigationState};
use crate::presenter::Presenter;
use crate::roster::{Roster, SPEAKER_COUNT};
use crate::store::{self, MalformedSessionError, SessionSnapshot, SpeakerEntry, AD_VOCEM_COUNT, SCORE_MAX};
use crate::timer::{CountdownTimer, TickOutcome, TimerId};

/// Session file operation failure. Malformed input aborts the import
/// with the in-memory state untouched.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Malformed(#[from] MalformedSessionError),
}

/// Everything a running judging session owns: both countdown timers,
/// the speaker roster, the navigation cursor, the ad-vocem panes, the
/// notepad, and the score row. Constructed once per application
/// instance and handed to the presentation layer.
#[derive(Debug)]
pub struct DebateContext {
    pub main_timer: CountdownTimer,
    pub ad_timer: CountdownTimer,
    pub roster: Roster,
    pub nav: NavigationState,
    pub ad_vocem: [String; AD_VOCEM_COUNT],
    pub notepad: String,
    pub scores: [u8; SPEAKER_COUNT],
}

impl DebateContext {
    pub fn new(config: &Config) -> Self {
        Self {
            main_timer: CountdownTimer::new(TimerId::Main, config.main_timer_secs()),
            ad_timer: CountdownTimer::new(TimerId::AdVocem, config.ad_timer_secs()),
            roster: Roster::new(),
            nav: NavigationState::new(),
            ad_vocem: std::array::from_fn(|_| String::new()),
            notepad: String::new(),
            scores: [0; SPEAKER_COUNT],
        }
    }

    fn timer(&self, id: TimerId) -> &CountdownTimer {
        match id {
            TimerId::Main => &self.main_timer,
            TimerId::AdVocem => &self.ad_timer,
        }
    }

    fn timer_mut(&mut self, id: TimerId) -> &mut CountdownTimer {
        match id {
            TimerId::Main => &mut self.main_timer,
            TimerId::AdVocem => &mut self.ad_timer,
        }
    }

    fn publish_timer(&self, id: TimerId, presenter: &mut dyn Presenter) {
        let (minutes, seconds) = self.timer(id).display();
        presenter.on_timer_display_changed(id, minutes, seconds);
    }

    /// Push both timer readings to the presenter, for startup and full
    /// redraws.
    pub fn publish_timer_displays(&self, presenter: &mut dyn Presenter) {
        self.publish_timer(TimerId::Main, presenter);
        self.publish_timer(TimerId::AdVocem, presenter);
    }

    pub fn start_timer(&mut self, id: TimerId) {
        self.timer_mut(id).start();
    }

    pub fn pause_timer(&mut self, id: TimerId) {
        self.timer_mut(id).pause();
    }

    pub fn toggle_timer(&mut self, id: TimerId) {
        self.timer_mut(id).toggle();
    }

    pub fn reset_timer(&mut self, id: TimerId, secs: Option<u32>, presenter: &mut dyn Presenter) {
        self.timer_mut(id).reset(secs);
        self.publish_timer(id, presenter);
    }

    /// One elapsed second: advance both timers and publish whichever
    /// moved.
    pub fn tick(&mut self, presenter: &mut dyn Presenter) {
        for id in [TimerId::Main, TimerId::AdVocem] {
            if self.timer_mut(id).tick() != TickOutcome::Idle {
                self.publish_timer(id, presenter);
            }
        }
    }

    pub fn next_section(&mut self, presenter: &mut dyn Presenter) {
        let target = self.nav.next_section(&mut self.roster);
        notify_focus(presenter, target);
    }

    pub fn previous_section(&mut self, presenter: &mut dyn Presenter) {
        let target = self.nav.previous_section(&mut self.roster);
        notify_focus(presenter, target);
    }

    pub fn next_speaker(&mut self, presenter: &mut dyn Presenter) {
        let target = self.nav.next_speaker(&mut self.roster);
        notify_focus(presenter, target);
    }

    pub fn previous_speaker(&mut self, presenter: &mut dyn Presenter) {
        let target = self.nav.previous_speaker(&mut self.roster);
        notify_focus(presenter, target);
    }

    pub fn jump_to_speaker(&mut self, index: usize, presenter: &mut dyn Presenter) {
        let target = self.nav.jump_to_speaker(index, &mut self.roster);
        notify_focus(presenter, target);
    }

    pub fn set_score(&mut self, speaker: usize, value: u8) {
        self.scores[speaker % SPEAKER_COUNT] = value.min(SCORE_MAX);
    }

    pub fn adjust_score(&mut self, speaker: usize, delta: i8) {
        let slot = speaker % SPEAKER_COUNT;
        let value = (self.scores[slot] as i8 + delta).clamp(0, SCORE_MAX as i8);
        self.scores[slot] = value as u8;
    }

    /// Capture all user-entered text and scores.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            speakers: self
                .roster
                .slots()
                .iter()
                .map(|slot| SpeakerEntry {
                    info: slot.info().to_string(),
                    question1: slot.question1().to_string(),
                    question2: slot.question2().to_string(),
                })
                .collect(),
            ad_vocem: self.ad_vocem.to_vec(),
            notepad: self.notepad.clone(),
            scores: self.scores.to_vec(),
        }
    }

    /// Replace all user-entered state with the snapshot's. Question
    /// visibility re-latches from the loaded content, as typing it
    /// would have. Timers and the navigation cursor are not part of a
    /// snapshot and keep running state.
    pub fn apply_snapshot(&mut self, snapshot: &SessionSnapshot) {
        self.roster = Roster::new();
        for (index, entry) in snapshot.speakers.iter().take(SPEAKER_COUNT).enumerate() {
            let slot = self.roster.slot_mut(index);
            slot.set_text(crate::roster::Section::Info, entry.info.clone());
            slot.set_text(crate::roster::Section::Question1, entry.question1.clone());
            slot.set_text(crate::roster::Section::Question2, entry.question2.clone());
        }
        for (pane, text) in self.ad_vocem.iter_mut().zip(&snapshot.ad_vocem) {
            *pane = text.clone();
        }
        self.notepad = snapshot.notepad.clone();
        for (score, value) in self.scores.iter_mut().zip(&snapshot.scores) {
            *score = (*value).min(SCORE_MAX);
        }
    }

    pub fn export_session(&self, path: &Path) -> Result<(), SessionError> {
        fs::write(path, store::export(&self.snapshot()))?;
        Ok(())
    }

    /// All-or-nothing: the file is read and parsed completely before
    /// any in-memory state is replaced.
    pub fn import_session(&mut self, path: &Path) -> Result<(), SessionError> {
        let bytes = fs::read(path)?;
        let snapshot = store::import(&bytes)?;
        self.apply_snapshot(&snapshot);
        Ok(())
    }
}

fn notify_focus(presenter: &mut dyn Presenter, target: FocusTarget) {
    presenter.on_focus_target_changed(target.speaker, target.section);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Section;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingPresenter {
        timer_displays: Vec<(TimerId, u32, u32)>,
        focus_targets: Vec<(usize, Section)>,
    }

    impl Presenter for RecordingPresenter {
        fn on_timer_display_changed(&mut self, id: TimerId, minutes: u32, seconds: u32) {
            self.timer_displays.push((id, minutes, seconds));
        }

        fn on_focus_target_changed(&mut self, speaker: usize, section: Section) {
            self.focus_targets.push((speaker, section));
        }
    }

    fn context() -> DebateContext {
        DebateContext::new(&Config::default())
    }

    #[test]
    fn main_timer_runs_down_and_reads_zero() {
        // end-to-end: 5 second timer, 5 ticks, display reads 00:00,
        // stopped; a 6th tick changes nothing
        let mut ctx = context();
        let mut presenter = RecordingPresenter::default();
        ctx.reset_timer(TimerId::Main, Some(5), &mut presenter);
        ctx.start_timer(TimerId::Main);

        for _ in 0..5 {
            ctx.tick(&mut presenter);
        }
        assert_eq!(ctx.main_timer.display(), (0, 0));
        assert!(!ctx.main_timer.is_running());
        assert_eq!(
            presenter.timer_displays.last(),
            Some(&(TimerId::Main, 0, 0))
        );

        let published = presenter.timer_displays.len();
        ctx.tick(&mut presenter);
        assert_eq!(presenter.timer_displays.len(), published);
        assert_eq!(ctx.main_timer.display(), (0, 0));
    }

    #[test]
    fn timers_tick_independently() {
        let mut ctx = context();
        let mut presenter = RecordingPresenter::default();
        ctx.start_timer(TimerId::AdVocem);
        ctx.tick(&mut presenter);

        assert_eq!(ctx.main_timer.remaining_secs(), 240);
        assert_eq!(ctx.ad_timer.remaining_secs(), 29);
        assert_eq!(
            presenter.timer_displays,
            vec![(TimerId::AdVocem, 0, 29)]
        );
    }

    #[test]
    fn navigation_commands_notify_focus() {
        let mut ctx = context();
        let mut presenter = RecordingPresenter::default();

        ctx.next_section(&mut presenter);
        ctx.next_speaker(&mut presenter);
        ctx.jump_to_speaker(4, &mut presenter);

        assert_eq!(
            presenter.focus_targets,
            vec![
                (0, Section::Question1),
                (1, Section::Info),
                (4, Section::Info),
            ]
        );
    }

    #[test]
    fn score_adjustment_saturates() {
        let mut ctx = context();
        ctx.adjust_score(2, -1);
        assert_eq!(ctx.scores[2], 0);
        for _ in 0..15 {
            ctx.adjust_score(2, 1);
        }
        assert_eq!(ctx.scores[2], 10);
        ctx.set_score(9, 7); // wraps to slot 1
        assert_eq!(ctx.scores[1], 7);
    }

    #[test]
    fn snapshot_round_trips_through_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut ctx = context();
        ctx.roster
            .slot_mut(0)
            .set_text(Section::Info, "case overview".into());
        ctx.roster
            .slot_mut(2)
            .set_text(Section::Question1, "source?".into());
        ctx.ad_vocem[0] = "proposition reply".into();
        ctx.notepad = "verdict draft".into();
        ctx.scores = [0, 10, 3, 3, 10, 0, 7, 2];
        ctx.export_session(&path).unwrap();

        let mut restored = context();
        restored.import_session(&path).unwrap();
        assert_eq!(restored.snapshot(), ctx.snapshot());
        assert!(
            restored.roster.slot(2).question1_visible(),
            "loaded text re-latches visibility"
        );
        assert!(!restored.roster.slot(2).question2_visible());
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"speakers\": [] }").unwrap();

        let mut ctx = context();
        ctx.notepad = "already here".into();
        ctx.scores[5] = 9;
        let before = ctx.snapshot();

        assert_matches!(
            ctx.import_session(&path),
            Err(SessionError::Malformed(_))
        );
        assert_eq!(ctx.snapshot(), before);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let mut ctx = context();
        assert_matches!(
            ctx.import_session(&dir.path().join("absent.json")),
            Err(SessionError::Io(_))
        );
    }

    #[test]
    fn publish_timer_displays_reports_configured_defaults() {
        let ctx = context();
        let mut presenter = RecordingPresenter::default();
        ctx.publish_timer_displays(&mut presenter);
        assert_eq!(
            presenter.timer_displays,
            vec![(TimerId::Main, 4, 0), (TimerId::AdVocem, 0, 30)]
        );
    }
}
