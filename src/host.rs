// Boundary between the trail engine and whatever displays it.
//
// A `Host` plays the role of the document + event source + frame scheduler; a
// `Surface` is the 2D drawing target it hands out. The engine only talks to
// these traits, so the same engine drives a desktop window or a test recorder.

use crate::color::Rgba;
use crate::frame_loop::FrameTicket;
use crate::types::{Point, Viewport};

/// Everything needed to stroke one piece of the trail. Strokes are always
/// round-capped and round-joined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub line_width: f64,
    /// Glow radius; the glow uses `shadow_color`
    pub shadow_blur: f64,
    pub shadow_color: Rgba,
}

/// Geometry of one stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrailPath {
    /// Zero-length path: with round caps this renders as a dot
    Dot(Point),
    Segment(Point, Point),
}

/// A 2D drawing target covering the viewport.
pub trait Surface {
    fn viewport(&self) -> Viewport;
    fn resize(&mut self, viewport: Viewport);
    /// Make every pixel fully transparent.
    fn clear(&mut self);
    fn stroke(&mut self, path: TrailPath, style: &StrokeStyle);
}

/// Notifications the engine can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    PointerMove,
    Resize,
}

/// Something the host delivers to `TrailEngine::dispatch`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    PointerMove { x: f64, y: f64 },
    Resize(Viewport),
    Frame(FrameTicket),
}

pub trait Host {
    type Surface: Surface;

    /// Current size of the visible area.
    fn viewport(&self) -> Viewport;

    /// Create a surface of `viewport` size and put it on screen.
    fn attach_surface(&mut self, viewport: Viewport) -> Self::Surface;

    /// Take `surface` off screen; it is dropped afterwards.
    fn detach_surface(&mut self, surface: Self::Surface);

    fn listen(&mut self, listener: Listener);
    fn unlisten(&mut self, listener: Listener);

    /// Ask for `HostEvent::Frame(ticket)` at the next display refresh.
    fn request_frame(&mut self, ticket: FrameTicket);
}
