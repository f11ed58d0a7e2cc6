// Public option types for launching, connecting, and creating contexts

mod connect_options;
mod context_options;
mod launch_options;

pub use connect_options::ConnectOptions;
pub use context_options::{ColorScheme, ContextOptions, RecordVideo, Viewport};
pub use launch_options::LaunchOptions;
