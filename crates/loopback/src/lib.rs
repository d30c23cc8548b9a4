//! Loopback windows.
//!
//! Each [`Window`] is an origin plus a bounded event queue. A [`Port`]
//! posts into one window on behalf of another and enforces the target
//! origin the way `postMessage` does. [`LoopbackHost`] renders proxy
//! frames for a medium by connecting it to a registered hub window.

mod host;
mod port;
mod window;

pub use host::LoopbackHost;
pub use port::Port;
pub use window::{WINDOW_QUEUE_CAPACITY, Window};
