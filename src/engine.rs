// The trail engine: pointer samples in, fading rainbow strokes out.
//
// Visual outcomes:
// - While active, every pointer move adds a point; each display refresh clears
//   the overlay and redraws the recent points as a connected, glowing polyline.
// - Points older than `trail_duration` drop off the tail of the trail.
// - Pause freezes the trail in place; destroy removes the overlay entirely.

use tracing::{debug, info, trace};

use crate::clock::{Clock, SystemClock};
use crate::color::{fade_alpha, stroke_color};
use crate::config::{ConfigPatch, TrailConfig};
use crate::frame_loop::{FrameLoop, FrameTicket};
use crate::host::{Host, HostEvent, Listener, StrokeStyle, Surface, TrailPath};
use crate::types::{Point, Sample, Viewport};

/// What one repaint did, for the frame trace log.
#[derive(Debug, Default)]
struct FrameStats {
    expired: usize,
    drawn: usize,
}

pub struct TrailEngine<H: Host, C: Clock = SystemClock> {
    host: H,
    clock: C,
    config: TrailConfig,
    samples: Vec<Sample>, // oldest first
    surface: Option<H::Surface>,
    active: bool,
    pointer_listening: bool,
    resize_listening: bool,
    frames: FrameLoop,
}

impl<H: Host> TrailEngine<H, SystemClock> {
    pub fn new(host: H) -> Self {
        Self::with_clock(host, SystemClock::new())
    }
}

impl<H: Host, C: Clock> TrailEngine<H, C> {
    /// Create an idle engine. Nothing is on screen until `start`.
    pub fn with_clock(host: H, clock: C) -> Self {
        Self {
            host,
            clock,
            config: TrailConfig::default(),
            samples: Vec::new(),
            surface: None,
            active: false,
            pointer_listening: false,
            resize_listening: false,
            frames: FrameLoop::new(),
        }
    }

    /* ------------------------------ Lifecycle ------------------------------ */

    /// Merge `overrides`, put a fresh full-viewport surface on screen (replacing
    /// any previous one), subscribe to pointer/resize and run the first frame.
    pub fn start(&mut self, overrides: ConfigPatch) -> &mut Self {
        self.config.merge(&overrides);

        if let Some(old) = self.surface.take() {
            debug!("Replacing existing trail surface");
            self.host.detach_surface(old);
        }
        // A loop left over from the previous start must not keep ticking
        self.frames.cancel();

        let viewport = self.host.viewport();
        self.surface = Some(self.host.attach_surface(viewport));
        self.active = true;

        self.listen(Listener::Resize);
        self.listen(Listener::PointerMove);

        info!(
            width = viewport.width,
            height = viewport.height,
            config = ?self.config,
            "Trail started"
        );

        self.run_frame();
        self
    }

    /// Merge `patch` into the live config; the next repaint uses it.
    pub fn update_config(&mut self, patch: ConfigPatch) -> &mut Self {
        self.config.merge(&patch);
        debug!(config = ?self.config, "Trail config updated");
        self
    }

    /// Stop sampling and drawing; keeps the points and the surface.
    pub fn pause(&mut self) -> &mut Self {
        if self.active {
            info!("Trail paused");
        }
        self.active = false;
        self.frames.cancel();
        self
    }

    /// Resume sampling and re-enter the repaint loop.
    pub fn resume(&mut self) -> &mut Self {
        if !self.active {
            info!("Trail resumed");
        }
        self.active = true;
        if self.surface.is_some() {
            self.schedule_frame();
        }
        self
    }

    /// Drop all points, unsubscribe and take the surface off screen.
    /// Safe to call any number of times.
    pub fn destroy(&mut self) -> &mut Self {
        self.active = false;
        self.samples.clear();
        self.frames.cancel();

        self.unlisten(Listener::PointerMove);
        self.unlisten(Listener::Resize);

        if let Some(surface) = self.surface.take() {
            self.host.detach_surface(surface);
            info!("Trail destroyed");
        }
        self
    }

    /* ------------------------------ Host events ------------------------------ */

    /// Single entry point for everything the host reports.
    pub fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            HostEvent::Resize(viewport) => self.on_resize(viewport),
            HostEvent::Frame(ticket) => self.on_frame(ticket),
        }
    }

    fn on_pointer_move(&mut self, x: f64, y: f64) {
        if !self.pointer_listening || !self.active || self.surface.is_none() {
            return;
        }
        // Keep the buffer time-ordered even if the clock stalls
        let mut now = self.clock.now_ms();
        if let Some(last) = self.samples.last() {
            now = now.max(last.captured_at());
        }
        self.samples.push(Sample::new(x, y, now));
    }

    fn on_resize(&mut self, viewport: Viewport) {
        if !self.resize_listening {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            debug!(width = viewport.width, height = viewport.height, "Resizing trail surface");
            surface.resize(viewport);
        }
    }

    fn on_frame(&mut self, ticket: FrameTicket) {
        if !self.frames.accept(ticket) {
            trace!(generation = ticket.generation(), "Ignoring stale frame");
            return;
        }
        self.run_frame();
    }

    /* ------------------------------ Repaint ------------------------------ */

    /// One tick of the loop: paint, then ask for the next refresh.
    /// The loop ends here once the engine is inactive or has no surface.
    fn run_frame(&mut self) {
        if !self.active || self.surface.is_none() {
            return;
        }
        let stats = self.repaint();
        trace!(expired = stats.expired, drawn = stats.drawn, "Trail frame");
        self.schedule_frame();
    }

    fn schedule_frame(&mut self) {
        if let Some(ticket) = self.frames.arm() {
            self.host.request_frame(ticket);
        }
    }

    fn repaint(&mut self) -> FrameStats {
        let Some(surface) = self.surface.as_mut() else {
            return FrameStats::default();
        };

        /* 1) Wipe last frame */
        surface.clear();

        /* 2) Drop expired points (they form a prefix, but don't rely on it) */
        let now = self.clock.now_ms();
        let config = self.config;
        let before = self.samples.len();
        self.samples.retain(|s| !is_expired(s, now, config.trail_duration));
        let expired = before - self.samples.len();

        /* 3) Stroke survivors oldest → newest, each joined to the previous one */
        let mut prev: Option<Point> = None;
        for sample in &self.samples {
            let age = sample.age(now);
            let color = stroke_color(config.rainbow_effect, now, age)
                .with_alpha(fade_alpha(age, config.trail_duration));

            let style = StrokeStyle {
                color,
                line_width: config.line_width,
                shadow_blur: config.shadow_blur,
                shadow_color: color,
            };

            let here = sample.point();
            let path = match prev {
                Some(from) => TrailPath::Segment(from, here),
                None => TrailPath::Dot(here),
            };
            surface.stroke(path, &style);
            prev = Some(here);
        }

        FrameStats { expired, drawn: self.samples.len() }
    }

    /* ------------------------------ Subscriptions ------------------------------ */

    fn listen(&mut self, listener: Listener) {
        let flag = match listener {
            Listener::PointerMove => &mut self.pointer_listening,
            Listener::Resize => &mut self.resize_listening,
        };
        if !*flag {
            *flag = true;
            self.host.listen(listener);
        }
    }

    fn unlisten(&mut self, listener: Listener) {
        let flag = match listener {
            Listener::PointerMove => &mut self.pointer_listening,
            Listener::Resize => &mut self.resize_listening,
        };
        if *flag {
            *flag = false;
            self.host.unlisten(listener);
        }
    }

    /* ------------------------------ Inspection ------------------------------ */

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    /// Recorded points, oldest first.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn surface(&self) -> Option<&H::Surface> {
        self.surface.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Host and surface at once, for hosts that present the surface themselves.
    pub fn host_and_surface(&mut self) -> (&mut H, Option<&H::Surface>) {
        (&mut self.host, self.surface.as_ref())
    }
}

// A NaN duration keeps every point: the comparison is false.
#[inline]
fn is_expired(sample: &Sample, now: f64, trail_duration: f64) -> bool {
    sample.age(now) > trail_duration
}
