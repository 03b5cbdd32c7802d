use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum WizardEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
    /// The input source is gone; no further key or mouse events will arrive
    InputClosed,
}

impl WizardEvent {
    /// Terminal event this was derived from, for activity detection
    pub fn as_terminal_event(&self) -> Option<CtEvent> {
        match self {
            WizardEvent::Key(key) => Some(CtEvent::Key(*key)),
            WizardEvent::Mouse(mouse) => Some(CtEvent::Mouse(*mouse)),
            WizardEvent::Resize | WizardEvent::Tick | WizardEvent::InputClosed => None,
        }
    }
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait WizardEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<WizardEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<WizardEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => WizardEvent::Key(key),
                Ok(CtEvent::Mouse(mouse)) => WizardEvent::Mouse(mouse),
                Ok(CtEvent::Resize(_, _)) => WizardEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal input closed");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
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

impl WizardEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<WizardEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed event source for tests and headless drivers
pub struct TestEventSource {
    rx: Receiver<WizardEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<WizardEvent>) -> Self {
        Self { rx }
    }
}

impl WizardEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<WizardEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: WizardEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: WizardEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, Tick on timeout,
    /// or InputClosed once the source has hung up
    pub fn step(&self) -> WizardEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => WizardEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => WizardEvent::InputClosed,
        }
    }
}
