// Desktop window host for the trail.
// Visual effects provided here:
// 1) A window whose background shows through the transparent trail canvas.
// 2) Pointer moves and window resizes turned into engine events.
// 3) One repaint per window refresh (~60 FPS).

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use tracing::debug;

use crate::canvas::Canvas;
use crate::error::Error;
use crate::frame_loop::FrameTicket;
use crate::host::{Host, HostEvent, Listener};
use crate::types::Viewport;

pub const TARGET_FPS: usize = 60;

/// Keyboard shortcuts for the lifecycle controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TogglePause,   // P
    ToggleRainbow, // R
    WiderLine,     // Up
    NarrowerLine,  // Down
    Start,         // S
    Destroy,       // D
    Quit,          // Esc
}

pub struct WindowHost {
    window: Window,    // the on-screen window you see
    background: u32,   // 0x00RRGGBB behind the trail
    buffer: Vec<u32>,  // composited frame pushed to the window
    input: WindowInput,
}

/// Turns raw window state into engine events, one refresh at a time.
/// Knows nothing about minifb so it can be driven directly.
#[derive(Debug, Default)]
struct WindowInput {
    size: (usize, usize),        // last known client size
    pointer: Option<(f32, f32)>, // None while the pointer is outside
    pointer_listening: bool,
    resize_listening: bool,
    frame_requests: Vec<FrameTicket>,
}

impl WindowInput {
    fn new(size: (usize, usize)) -> Self {
        Self { size, ..Self::default() }
    }

    /// Diff `size` and `pointer` against the previous refresh. Events come out
    /// as resize, then pointer move, then every requested frame.
    /// State is tracked even while nobody listens, so subscribing later does
    /// not replay a stale change.
    fn poll(&mut self, size: (usize, usize), pointer: Option<(f32, f32)>) -> Vec<HostEvent> {
        let mut events = Vec::new();

        if size != self.size {
            self.size = size;
            if self.resize_listening {
                events.push(HostEvent::Resize(viewport_of(size)));
            }
        }

        if pointer != self.pointer {
            self.pointer = pointer;
            if self.pointer_listening {
                if let Some((x, y)) = pointer {
                    events.push(HostEvent::PointerMove { x: x as f64, y: y as f64 });
                }
            }
        }

        events.extend(self.frame_requests.drain(..).map(HostEvent::Frame));
        events
    }
}

impl WindowHost {
    /// Open a resizable window.
    /// Visual: a new window filled with `background` appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, background: u32) -> Result<Self, Error> {
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(TARGET_FPS);

        let size = window.get_size();
        Ok(Self {
            window,
            background,
            buffer: vec![background; size.0 * size.1],
            input: WindowInput::new(size),
        })
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Collect what happened since the last refresh: resize first, then pointer
    /// movement, then the frames the engine asked for.
    pub fn poll(&mut self) -> Vec<HostEvent> {
        let size = self.window.get_size();
        if size != self.input.size {
            self.buffer = vec![self.background; size.0 * size.1];
        }

        // Discard: no position while the pointer is outside the window
        let pointer = self.window.get_mouse_pos(MouseMode::Discard);
        self.input.poll(size, pointer)
    }

    /// Key presses since the last refresh, mapped to controls.
    pub fn controls(&self) -> Vec<Control> {
        let mut controls = Vec::new();
        let bindings = [
            (Key::P, Control::TogglePause),
            (Key::R, Control::ToggleRainbow),
            (Key::Up, Control::WiderLine),
            (Key::Down, Control::NarrowerLine),
            (Key::S, Control::Start),
            (Key::D, Control::Destroy),
        ];
        for (key, control) in bindings {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                controls.push(control);
            }
        }
        if self.window.is_key_down(Key::Escape) {
            controls.push(Control::Quit);
        }
        controls
    }

    /// Push the background plus the attached trail canvas (if any) to the screen.
    /// Visual: the window immediately displays this frame.
    pub fn present(&mut self, surface: Option<&Canvas>) -> Result<(), Error> {
        let (width, height) = self.input.size;
        if width == 0 || height == 0 {
            // Minimized: nothing to draw, but keep input flowing
            self.window.update();
            return Ok(());
        }

        match surface {
            Some(canvas) => canvas.composite_over(self.background, &mut self.buffer, width),
            None => self.buffer.fill(self.background),
        }

        self.window
            .update_with_buffer(&self.buffer, width, height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }
}

impl Host for WindowHost {
    type Surface = Canvas;

    fn viewport(&self) -> Viewport {
        viewport_of(self.input.size)
    }

    fn attach_surface(&mut self, viewport: Viewport) -> Canvas {
        debug!(width = viewport.width, height = viewport.height, "Attaching trail canvas");
        Canvas::new(viewport)
    }

    fn detach_surface(&mut self, surface: Canvas) {
        debug!(width = surface.width(), height = surface.height(), "Detaching trail canvas");
        // Next present() shows the bare background
        drop(surface);
    }

    fn listen(&mut self, listener: Listener) {
        match listener {
            Listener::PointerMove => self.input.pointer_listening = true,
            Listener::Resize => self.input.resize_listening = true,
        }
    }

    fn unlisten(&mut self, listener: Listener) {
        match listener {
            Listener::PointerMove => self.input.pointer_listening = false,
            Listener::Resize => self.input.resize_listening = false,
        }
    }

    fn request_frame(&mut self, ticket: FrameTicket) {
        self.input.frame_requests.push(ticket);
    }
}

fn viewport_of((width, height): (usize, usize)) -> Viewport {
    Viewport::new(width as u32, height as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_loop::FrameLoop;

    fn listening(size: (usize, usize)) -> WindowInput {
        WindowInput { pointer_listening: true, resize_listening: true, ..WindowInput::new(size) }
    }

    #[test]
    fn test_resize_reported_once_and_only_when_listening() {
        let mut input = WindowInput::new((100, 50));
        assert!(input.poll((200, 50), None).is_empty());
        assert_eq!(input.size, (200, 50));

        input.resize_listening = true;
        // Already seen while unsubscribed: not replayed
        assert!(input.poll((200, 50), None).is_empty());
        assert_eq!(
            input.poll((300, 60), None),
            vec![HostEvent::Resize(Viewport::new(300, 60))]
        );
        assert!(input.poll((300, 60), None).is_empty());
    }

    #[test]
    fn test_pointer_moves_are_diffed_and_gated() {
        let mut input = listening((100, 100));
        let moved = |x: f64, y: f64| vec![HostEvent::PointerMove { x, y }];

        assert_eq!(input.poll((100, 100), Some((1.0, 2.0))), moved(1.0, 2.0));
        // Standing still reports nothing
        assert!(input.poll((100, 100), Some((1.0, 2.0))).is_empty());
        // Leaving the window reports nothing, coming back to the same spot does
        assert!(input.poll((100, 100), None).is_empty());
        assert_eq!(input.poll((100, 100), Some((1.0, 2.0))), moved(1.0, 2.0));

        input.pointer_listening = false;
        assert!(input.poll((100, 100), Some((5.5, 6.0))).is_empty());
        input.pointer_listening = true;
        assert!(input.poll((100, 100), Some((5.5, 6.0))).is_empty());
        assert_eq!(input.poll((100, 100), Some((7.0, 6.0))), moved(7.0, 6.0));
    }

    #[test]
    fn test_events_ordered_resize_pointer_frames() {
        let mut frames = FrameLoop::new();
        let stale = frames.arm().unwrap();
        frames.cancel();
        let fresh = frames.arm().unwrap();

        let mut input = listening((100, 100));
        input.frame_requests.extend([stale, fresh]);

        assert_eq!(
            input.poll((120, 80), Some((3.0, 4.0))),
            vec![
                HostEvent::Resize(Viewport::new(120, 80)),
                HostEvent::PointerMove { x: 3.0, y: 4.0 },
                HostEvent::Frame(stale),
                HostEvent::Frame(fresh),
            ]
        );
        // Frames are delivered once
        assert!(input.poll((120, 80), Some((3.0, 4.0))).is_empty());
    }

    #[test]
    fn test_frames_delivered_without_listeners() {
        let mut frames = FrameLoop::new();
        let ticket = frames.arm().unwrap();

        let mut input = WindowInput::new((10, 10));
        input.frame_requests.push(ticket);
        assert_eq!(
            input.poll((20, 20), Some((1.0, 1.0))),
            vec![HostEvent::Frame(ticket)]
        );
    }
}
