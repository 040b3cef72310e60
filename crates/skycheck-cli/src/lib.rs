//! Interactive requester for skycheck.
//!
//! Talks to `skycheck-resolver` over its channel to turn a place name into a
//! single location, then asks the weather service about it.

pub mod app;
pub mod console;
pub mod render;
pub mod session;

pub use app::App;
pub use console::{Console, StdConsole};
pub use session::{LookupState, ResolvedLocation, Session};
