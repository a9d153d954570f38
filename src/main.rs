// What you SEE:
// • A window; move the mouse over it and a glowing rainbow trail follows.
// • P pauses/resumes the trail, R toggles rainbow/white
//   (start in either mode with --rainbow true|false).
// • Up/Down changes the line width.
// • S (re)starts the trail, D destroys it. ESC quits.

use clap::Parser;
use rainbow_trail::{Control, ConfigPatch, Error, TrailEngine, WindowHost};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about = "Glowing rainbow trail that follows the pointer")]
struct Args {
    /// JSON file with config overrides (trailDuration, lineWidth, shadowBlur, rainbowEffect)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How long a point stays on the trail, in milliseconds
    #[arg(long, allow_negative_numbers = true)]
    trail_duration: Option<f64>,

    /// Stroke width in pixels
    #[arg(long, allow_negative_numbers = true)]
    line_width: Option<f64>,

    /// Glow radius in pixels
    #[arg(long, allow_negative_numbers = true)]
    shadow_blur: Option<f64>,

    /// Cycle trail colors (true) or draw plain white (false)
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    rainbow: Option<bool>,

    /// Initial window width
    #[arg(long, default_value_t = 960)]
    width: usize,

    /// Initial window height
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Background color behind the trail, as RRGGBB hex
    #[arg(long, default_value = "101018", value_parser = parse_hex_color)]
    background: u32,
}

impl Args {
    /// Config file first, then command-line flags on top.
    fn config_patch(&self) -> Result<ConfigPatch, Error> {
        let file = match &self.config {
            Some(path) => ConfigPatch::from_file(path)?,
            None => ConfigPatch::new(),
        };

        let flags = ConfigPatch {
            trail_duration: self.trail_duration,
            line_width: self.line_width,
            shadow_blur: self.shadow_blur,
            rainbow_effect: self.rainbow,
        };

        Ok(file.overlay(&flags))
    }
}

fn parse_hex_color(s: &str) -> Result<u32, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    // from_str_radix alone would also take a leading sign
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("expected RRGGBB hex, got {s:?}"));
    }
    u32::from_str_radix(hex, 16).map_err(|e| format!("invalid color {s:?}: {e}"))
}

fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rainbow_trail=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let patch = args.config_patch()?;

    /* --- Window + engine setup ---
       Visual: window opens; the trail starts right away with the merged config. */
    let host = WindowHost::new("Rainbow Trail", args.width, args.height, args.background)?;
    let mut engine = TrailEngine::new(host);
    engine.start(patch);

    /* --- FPS counter (debug log once per second) --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    'running: while engine.host().is_open() {
        /* 1) Input + scheduled repaints, in the order the window saw them */
        for event in engine.host_mut().poll() {
            engine.dispatch(event);
        }

        /* 2) Keyboard controls */
        for control in engine.host().controls() {
            if !apply_control(&mut engine, control) {
                break 'running;
            }
        }

        /* 3) Present (this is when the on-screen image updates) */
        let (host, canvas) = engine.host_and_surface();
        host.present(canvas)?;

        /* 4) FPS */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f64();
            debug!(
                fps = frames_this_second as f64 / secs,
                points = engine.samples().len(),
                "Frame rate"
            );
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    engine.destroy();
    info!("Window closed");
    Ok(())
}

/// Apply one keyboard control. Returns false when the app should quit.
fn apply_control(engine: &mut TrailEngine<WindowHost>, control: Control) -> bool {
    match control {
        Control::TogglePause => {
            if engine.is_active() {
                engine.pause();
            } else {
                engine.resume();
            }
        }
        Control::ToggleRainbow => {
            let rainbow = !engine.config().rainbow_effect;
            engine.update_config(ConfigPatch::new().rainbow_effect(rainbow));
        }
        Control::WiderLine => {
            let width = engine.config().line_width + 1.0;
            engine.update_config(ConfigPatch::new().line_width(width));
        }
        Control::NarrowerLine => {
            let width = (engine.config().line_width - 1.0).max(1.0);
            engine.update_config(ConfigPatch::new().line_width(width));
        }
        Control::Start => {
            engine.start(ConfigPatch::new());
        }
        Control::Destroy => {
            engine.destroy();
        }
        Control::Quit => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("101018"), Ok(0x00_10_10_18));
        assert_eq!(parse_hex_color("#FFffFF"), Ok(0x00_FF_FF_FF));
        assert!(parse_hex_color("fff").is_err());
        assert!(parse_hex_color("zzzzzz").is_err());
    }

    #[test]
    fn test_parse_hex_color_rejects_signs_and_odd_prefixes() {
        assert!(parse_hex_color("+12345").is_err());
        assert!(parse_hex_color("#+1234a").is_err());
        assert!(parse_hex_color("-12345").is_err());
        assert!(parse_hex_color("##101018").is_err());
        assert!(parse_hex_color(" 10101").is_err());
        assert!(parse_hex_color("éé1010").is_err());
    }

    #[test]
    fn test_flags_override_nothing_by_default() {
        let args = Args::parse_from(["rainbow-trail"]);
        assert_eq!(args.config_patch().unwrap(), ConfigPatch::new());
        assert_eq!(args.background, 0x00_10_10_18);
    }

    #[test]
    fn test_flags_build_patch() {
        let args = Args::parse_from([
            "rainbow-trail",
            "--trail-duration",
            "100",
            "--line-width",
            "-2",
            "--rainbow",
            "false",
        ]);
        let patch = args.config_patch().unwrap();
        assert_eq!(patch.trail_duration, Some(100.0));
        assert_eq!(patch.line_width, Some(-2.0));
        assert_eq!(patch.shadow_blur, None);
        assert_eq!(patch.rainbow_effect, Some(false));
    }

    #[test]
    fn test_rainbow_flag_overrides_config_file_both_ways() {
        let path = std::env::temp_dir()
            .join(format!("rainbow-trail-{}-flags.json", std::process::id()));
        std::fs::write(&path, r#"{"rainbowEffect": false, "lineWidth": 4}"#).unwrap();
        let config = path.to_str().unwrap();

        let from_file = Args::parse_from(["rainbow-trail", "--config", config]);
        let enabled = Args::parse_from(["rainbow-trail", "--config", config, "--rainbow", "true"]);
        let results = (from_file.config_patch(), enabled.config_patch());
        std::fs::remove_file(&path).unwrap();

        let (from_file, enabled) = (results.0.unwrap(), results.1.unwrap());
        assert_eq!(from_file.rainbow_effect, Some(false));
        assert_eq!(enabled.rainbow_effect, Some(true));
        // Fields the flags leave alone still come from the file
        assert_eq!(enabled.line_width, Some(4.0));

        assert!(Args::try_parse_from(["rainbow-trail", "--rainbow", "maybe"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args::parse_from(["rainbow-trail", "--config", "/nonexistent/trail.json"]);
        assert!(matches!(args.config_patch(), Err(Error::ConfigRead { .. })));
    }
}
