mod atomic;
mod entries;
mod frozen;
mod interface;
mod lock;
mod plugin;

pub use atomic::*;
pub use frozen::*;
pub use interface::*;
pub use lock::*;
pub use plugin::*;
