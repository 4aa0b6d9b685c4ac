mod category;
mod config;
mod factory;
mod model;
mod session;
mod tick;

pub use category::{next_category, BREAKS_BEFORE_LONG_BREAK};
pub use config::{IntervalConfig, DEFAULT_LONG_BREAK, DEFAULT_POMODORO, DEFAULT_SHORT_BREAK};
pub use factory::new_interval;
pub use model::{Category, Interval, IntervalState};
pub use session::{get_interval, pause, start};
pub use tick::{tick, Callback, Callbacks, TICK};
