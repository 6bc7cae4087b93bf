use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Everything the game loop reacts to. `Tick` drives the session countdown
/// and is synthesized whenever a full tick interval passes without input.
#[derive(Clone, Debug)]
pub enum HuntEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Where key and resize events come from. Swapped for a plain channel in
/// tests so whole sessions can run without a terminal.
pub trait HuntEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<HuntEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread and forwards them over a
/// channel, so the game loop can wait on input and the tick deadline at once.
pub struct CrosstermEventSource {
    rx: Receiver<HuntEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(HuntEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(HuntEvent::Resize).is_err() {
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

impl HuntEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<HuntEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed source for headless tests.
pub struct TestEventSource {
    rx: Receiver<HuntEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<HuntEvent>) -> Self {
        Self { rx }
    }
}

impl HuntEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<HuntEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the game one event at a time. The countdown runs on whole
/// seconds, so the runner owns that cadence directly; tests shrink the
/// interval to let timeout sessions finish fast.
pub struct Runner<E: HuntEventSource> {
    event_source: E,
    tick: Duration,
}

impl<E: HuntEventSource> Runner<E> {
    /// Production cadence: one `Tick` per second of session time.
    pub fn new(event_source: E) -> Self {
        Self::with_tick(event_source, Duration::from_secs(1))
    }

    pub fn with_tick(event_source: E, tick: Duration) -> Self {
        Self { event_source, tick }
    }

    /// Next input event, or `Tick` once the interval elapses without one.
    /// A disconnected source also degrades to ticks, so an orphaned session
    /// still counts down and times out instead of hanging.
    pub fn step(&self) -> HuntEvent {
        match self.event_source.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                HuntEvent::Tick
            }
        }
    }
}
