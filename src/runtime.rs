use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app loop. `Tick` fires on a fixed
/// cadence and drives both countdown timers.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // Windows delivers repeat/release key events too; only
                // presses should reach the key dispatcher.
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Merges terminal events with a fixed tick cadence.
///
/// Ticks are scheduled against wall-clock deadlines, not inactivity: a
/// steady stream of key presses (a judge typing notes while a speaker
/// timer runs) must not delay the countdown.
pub struct Runner<E: EventSource> {
    event_source: E,
    interval: Duration,
    next_tick: Instant,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, interval: Duration) -> Self {
        Self {
            event_source,
            interval,
            next_tick: Instant::now() + interval,
        }
    }

    /// Blocks until the next terminal event or the tick deadline,
    /// whichever comes first. Each elapsed deadline yields exactly one
    /// `Tick`, so a countdown stalled by a busy loop catches back up to
    /// wall clock instead of losing the missed seconds.
    pub fn step(&mut self) -> AppEvent {
        loop {
            let now = Instant::now();
            if now >= self.next_tick {
                self.next_tick += self.interval;
                return AppEvent::Tick;
            }
            match self.event_source.recv_timeout(self.next_tick - now) {
                Ok(ev) => return ev,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    // No producer left; keep ticking on cadence.
                    std::thread::sleep(self.next_tick.saturating_duration_since(Instant::now()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    fn runner(rx: Receiver<AppEvent>, interval_ms: u64) -> Runner<TestEventSource> {
        Runner::new(
            TestEventSource::new(rx),
            Duration::from_millis(interval_ms),
        )
    }

    #[test]
    fn step_yields_tick_when_no_events_arrive() {
        let (_tx, rx) = mpsc::channel();
        let mut runner = runner(rx, 1);

        match runner.step() {
            AppEvent::Tick => {}
            _ => panic!("expected Tick from an idle source"),
        }
    }

    #[test]
    fn queued_events_are_delivered_before_the_deadline() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        let mut runner = runner(rx, 500);

        let start = Instant::now();
        match runner.step() {
            AppEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
        assert!(start.elapsed() < Duration::from_millis(400));
    }

    #[test]
    fn disconnected_source_degrades_to_pure_ticks() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let mut runner = runner(rx, 1);

        for _ in 0..3 {
            match runner.step() {
                AppEvent::Tick => {}
                _ => panic!("expected Tick after disconnect"),
            }
        }
    }

    #[test]
    fn ticks_keep_cadence_under_a_stream_of_keys() {
        let (tx, rx) = mpsc::channel();
        let mut runner = runner(rx, 50);

        // Keys arrive faster than the tick interval for the whole run.
        let producer = std::thread::spawn(move || {
            for _ in 0..20u32 {
                let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
                if tx.send(AppEvent::Key(key)).is_err() {
                    break;
                }
                std::thread::sleep(Duration::from_millis(20));
            }
        });

        let start = Instant::now();
        let mut ticks = 0u32;
        let mut keys = 0u32;
        while start.elapsed() < Duration::from_millis(400) {
            match runner.step() {
                AppEvent::Tick => ticks += 1,
                AppEvent::Key(_) => keys += 1,
                AppEvent::Resize => {}
            }
        }
        producer.join().unwrap();

        assert!(keys > 0, "producer keys should pass through");
        assert!(ticks >= 3, "expected at least 3 ticks, got {}", ticks);
    }
}
