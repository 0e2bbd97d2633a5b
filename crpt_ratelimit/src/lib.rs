pub mod error;
pub mod fixed_window;

pub use error::RateLimitError;
pub use error::Result;
pub use fixed_window::FixedWindow;
pub use fixed_window::FixedWindowBuilder;
