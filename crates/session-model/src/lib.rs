//! Snapbooth Session Model
//!
//! Defines the core data contracts for Snapbooth sessions:
//! - **Frames:** Encoded still photos produced by capture attempts
//! - **Layout:** Collage grid parameters and the pixel geometry derived
//!   from them
//! - **Session:** The summary record written next to the shots and the
//!   finished collage
//!
//! All grid geometry is integer pixel arithmetic so that the same inputs
//! always produce the same collage dimensions on every platform.

pub mod frame;
pub mod layout;
pub mod session;

pub use frame::*;
pub use layout::*;
pub use session::*;
