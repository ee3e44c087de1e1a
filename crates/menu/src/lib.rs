pub mod calendar;
mod reconcile;
mod report;
mod source;
mod types;

pub use calendar::{daily_window, next_monday, resolve, today_in, weekly_window};
pub use reconcile::*;
pub use report::*;
pub use source::*;
pub use types::*;
