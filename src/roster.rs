/// Fixed number of speaker slots: 4 ordinal pairs of (Proposition,
/// Opposition).
pub const SPEAKER_COUNT: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Side {
    Proposition,
    Opposition,
}

impl Side {
    /// Short label used in headers and the score row.
    pub fn abbrev(&self) -> &'static str {
        match self {
            Side::Proposition => "Pro",
            Side::Opposition => "Opp",
        }
    }
}

/// One of the three focusable fields within a speaker slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Section {
    Info,
    Question1,
    Question2,
}

impl Section {
    pub fn next(self) -> Self {
        match self {
            Section::Info => Section::Question1,
            Section::Question1 => Section::Question2,
            Section::Question2 => Section::Info,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Section::Info => Section::Question2,
            Section::Question1 => Section::Info,
            Section::Question2 => Section::Question1,
        }
    }
}

/// A speaker's notes: an info field plus two question fields.
///
/// Question visibility is a one-way latch: it flips on when the text
/// first becomes non-blank (or when navigation lands on the field) and
/// is never cleared by the text becoming blank again.
#[derive(Clone, Debug)]
pub struct SpeakerSlot {
    index: usize,
    side: Side,
    ordinal: usize,
    info: String,
    question1: String,
    question2: String,
    question1_visible: bool,
    question2_visible: bool,
}

impl SpeakerSlot {
    fn new(index: usize, side: Side, ordinal: usize) -> Self {
        Self {
            index,
            side,
            ordinal,
            info: String::new(),
            question1: String::new(),
            question2: String::new(),
            question1_visible: false,
            question2_visible: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// 1-based position within the side (1..=4).
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn question1(&self) -> &str {
        &self.question1
    }

    pub fn question2(&self) -> &str {
        &self.question2
    }

    pub fn question1_visible(&self) -> bool {
        self.question1_visible
    }

    pub fn question2_visible(&self) -> bool {
        self.question2_visible
    }

    pub fn text(&self, section: Section) -> &str {
        match section {
            Section::Info => &self.info,
            Section::Question1 => &self.question1,
            Section::Question2 => &self.question2,
        }
    }

    pub fn set_text(&mut self, section: Section, text: String) {
        *self.text_mut(section) = text;
        self.latch(section);
    }

    pub fn push_char(&mut self, section: Section, c: char) {
        self.text_mut(section).push(c);
        self.latch(section);
    }

    pub fn push_str(&mut self, section: Section, s: &str) {
        self.text_mut(section).push_str(s);
        self.latch(section);
    }

    /// Delete the last character. Never unlatches visibility.
    pub fn backspace(&mut self, section: Section) {
        self.text_mut(section).pop();
    }

    /// Force a question field visible regardless of content, as
    /// navigation does when it lands on the field. `Info` is always
    /// visible, so this is a no-op for it.
    pub fn reveal(&mut self, section: Section) {
        match section {
            Section::Info => {}
            Section::Question1 => self.question1_visible = true,
            Section::Question2 => self.question2_visible = true,
        }
    }

    fn text_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::Info => &mut self.info,
            Section::Question1 => &mut self.question1,
            Section::Question2 => &mut self.question2,
        }
    }

    fn latch(&mut self, section: Section) {
        let blank = self.text(section).trim().is_empty();
        if !blank {
            self.reveal(section);
        }
    }
}

/// The fixed roster of 8 speaker slots, ordered as 4 ordinal pairs:
/// Pro 1, Opp 1, Pro 2, Opp 2, ...
#[derive(Clone, Debug)]
pub struct Roster {
    slots: Vec<SpeakerSlot>,
}

impl Roster {
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(SPEAKER_COUNT);
        for pair in 0..SPEAKER_COUNT / 2 {
            slots.push(SpeakerSlot::new(pair * 2, Side::Proposition, pair + 1));
            slots.push(SpeakerSlot::new(pair * 2 + 1, Side::Opposition, pair + 1));
        }
        Self { slots }
    }

    /// Access a slot; out-of-range indices wrap rather than panic.
    pub fn slot(&self, index: usize) -> &SpeakerSlot {
        &self.slots[index % SPEAKER_COUNT]
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut SpeakerSlot {
        &mut self.slots[index % SPEAKER_COUNT]
    }

    pub fn slots(&self) -> &[SpeakerSlot] {
        &self.slots
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}
