//! Rainbow pointer trail.
//!
//! Records recent pointer positions and repaints them every display frame as a
//! glowing polyline that fades with age and cycles through the rainbow.
//!
//! The [`TrailEngine`] is independent of any windowing system: it talks to a
//! [`Host`] (surfaces, observers, frame scheduling) and a [`Clock`]. The crate
//! ships a desktop host ([`WindowHost`]) drawing into a software [`Canvas`].
//!
//! ```rust,ignore
//! use rainbow_trail::{ConfigPatch, TrailEngine, WindowHost};
//!
//! let host = WindowHost::new("Rainbow Trail", 960, 600, 0x101018)?;
//! let mut engine = TrailEngine::new(host);
//! engine.start(ConfigPatch::new().trail_duration(500.0));
//!
//! while engine.host().is_open() {
//!     for event in engine.host_mut().poll() {
//!         engine.dispatch(event);
//!     }
//!     let (host, canvas) = engine.host_and_surface();
//!     host.present(canvas)?;
//! }
//! ```

pub mod canvas;
pub mod clock;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame_loop;
pub mod host;
pub mod types;
pub mod window;

pub use canvas::Canvas;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigPatch, TrailConfig};
pub use engine::TrailEngine;
pub use error::Error;
pub use host::{Host, HostEvent, Listener, Surface};
pub use types::{Point, Sample, Viewport};
pub use window::{Control, WindowHost};
