use crate::roster::Section;
use crate::timer::TimerId;

/// Notifications from the core to whatever is drawing it. The core
/// decides what to show; moving input focus and scrolling the target
/// into view stays with the presentation layer.
pub trait Presenter {
    fn on_timer_display_changed(&mut self, id: TimerId, minutes: u32, seconds: u32);
    fn on_focus_target_changed(&mut self, speaker: usize, section: Section);
}

/// Presenter that discards everything, for headless use.
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn on_timer_display_changed(&mut self, _id: TimerId, _minutes: u32, _seconds: u32) {}
    fn on_focus_target_changed(&mut self, _speaker: usize, _section: Section) {}
}
