#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod error;
pub mod geom;
pub mod history;
pub mod navigator;
pub mod notify;
pub mod pacer;
pub mod palette;
pub mod planner;
pub mod scheduler;
pub mod sim;
pub mod source;

pub use config::Tuning;
pub use driver::{AccessState, CanvasDriver};
pub use error::{LoomError, LoomResult};
pub use geom::{Direction, WorldPos};
pub use history::TrailingHistory;
pub use notify::{ConsoleNotifier, NotificationSink, ResumeGate, StdinGate};
pub use palette::{Palette, Rgb};
pub use planner::{Axis, Method, PlacementCommand};
pub use scheduler::{RunSummary, Scheduler, SessionCtx, SessionState};
pub use sim::SimCanvas;
pub use source::{PixelSource, RasterImage};
