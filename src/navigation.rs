use crate::roster::{Roster, Section, SPEAKER_COUNT};

/// Which field should receive input focus after a navigation step.
/// Scrolling the field into view is the presentation layer's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusTarget {
    pub speaker: usize,
    pub section: Section,
}

/// Cursor over the roster: current speaker plus current section within
/// that speaker. All operations are total; indices wrap via modulo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigationState {
    speaker: usize,
    section: Section,
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            speaker: 0,
            section: Section::Info,
        }
    }

    pub fn speaker(&self) -> usize {
        self.speaker
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn next_section(&mut self, roster: &mut Roster) -> FocusTarget {
        self.section = self.section.next();
        self.resolve(roster)
    }

    pub fn previous_section(&mut self, roster: &mut Roster) -> FocusTarget {
        self.section = self.section.previous();
        self.resolve(roster)
    }

    pub fn next_speaker(&mut self, roster: &mut Roster) -> FocusTarget {
        self.speaker = (self.speaker + 1) % SPEAKER_COUNT;
        self.section = Section::Info;
        self.resolve(roster)
    }

    pub fn previous_speaker(&mut self, roster: &mut Roster) -> FocusTarget {
        self.speaker = (self.speaker + SPEAKER_COUNT - 1) % SPEAKER_COUNT;
        self.section = Section::Info;
        self.resolve(roster)
    }

    pub fn jump_to_speaker(&mut self, index: usize, roster: &mut Roster) -> FocusTarget {
        self.speaker = index % SPEAKER_COUNT;
        self.section = Section::Info;
        self.resolve(roster)
    }

    fn resolve(&mut self, roster: &mut Roster) -> FocusTarget {
        let (next, target) = resolve_focus(*self, roster);
        *self = next;
        target
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve where focus lands after a transition, in one step: reveals
/// the question field being landed on, and redirects `Question2` to
/// `Question1` while question 1 is still blank. Returns the corrected
/// state together with the focus target so callers never observe an
/// intermediate section value.
pub fn resolve_focus(state: NavigationState, roster: &mut Roster) -> (NavigationState, FocusTarget) {
    let slot = roster.slot_mut(state.speaker);
    let section = match state.section {
        Section::Info => Section::Info,
        Section::Question1 => {
            slot.reveal(Section::Question1);
            Section::Question1
        }
        Section::Question2 => {
            if slot.question1().trim().is_empty() {
                // question 2 is never focusable while question 1 is empty
                slot.reveal(Section::Question1);
                Section::Question1
            } else {
                slot.reveal(Section::Question2);
                Section::Question2
            }
        }
    };
    let next = NavigationState {
        speaker: state.speaker,
        section,
    };
    let target = FocusTarget {
        speaker: state.speaker,
        section,
    };
    (next, target)
}
