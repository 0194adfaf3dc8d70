// Library surface shared by the binary and the integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod logging;
pub mod pace;
pub mod plan;
pub mod preset;
pub mod report;
pub mod runtime;
pub mod ui;

pub use editor::{PlanEditor, PlanStatus, Totals};
pub use error::{BuildError, EditError};
pub use plan::{Advisory, Plan, PlanBuilder, PlanRequest, Segment};
