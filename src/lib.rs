// Library surface for the terminal host, headless drivers and integration tests.
pub mod app;
pub mod clock;
pub mod config;
pub mod event;
pub mod form;
pub mod idle;
pub mod runtime;
pub mod section;
pub mod section_timer;
pub mod tracker;
pub mod transport;
pub mod ui;
pub mod validation;
pub mod wizard;

pub use event::{EventData, EventRecord, EventType};
pub use section::{section_for_step, Section, TOTAL_STEPS};
pub use tracker::{EventSink, Tracker};
pub use wizard::{Transition, Wizard};
