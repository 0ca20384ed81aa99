//! Pixel animation: fixed-frame-rate linear fades for a single-colour strip.
//!
//! Every pixel shows the same colour.  Setting a colour or brightness
//! starts a fade from whatever is currently displayed; each frame advances
//! the fade by the real time elapsed since the previous frame:
//!
//! ```text
//!   current = base + (target - base) * min(progress / duration, 1)
//! ```
//!
//! Colour and brightness fade independently.  Each fade keeps the duration
//! it was started with.  Frames are gated by `1000 / fps` milliseconds, and
//! a frame only reaches the strip when the rendered output changed, so a
//! settled animation costs nothing.
//!
//! The first frame only starts the clock: time before it never counts as
//! fade progress.

use heapless::Vec;
use log::warn;
use smart_leds::RGB8;

use crate::config::{MAX_PIXELS, RigConfig};

use super::ports::PixelPort;

/// One fading channel: where it started, where it is going, how far along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fade<T> {
    base: T,
    target: T,
    current: T,
    progress_ms: u32,
    duration_ms: u32,
}

impl<T: Copy> Fade<T> {
    fn settled(value: T) -> Self {
        Self {
            base: value,
            target: value,
            current: value,
            progress_ms: 0,
            duration_ms: 0,
        }
    }

    fn retarget(&mut self, target: T, duration_ms: u16) {
        self.base = self.current;
        self.target = target;
        self.progress_ms = 0;
        self.duration_ms = u32::from(duration_ms);
        if duration_ms == 0 {
            self.current = target;
        }
    }
}

pub struct PixelAnimation<P: PixelPort> {
    port: P,
    frame: Vec<RGB8, MAX_PIXELS>,
    frame_interval_ms: u32,
    last_frame_ms: Option<u64>,
    transition_ms: u16,
    color: Fade<RGB8>,
    brightness: Fade<u8>,
    dirty: bool,
}

impl<P: PixelPort> PixelAnimation<P> {
    /// Create a dark strip of `pixel_count` pixels (capped at [`MAX_PIXELS`]).
    pub fn new(port: P, pixel_count: usize, fps: u8, transition_ms: u16) -> Self {
        let mut frame = Vec::new();
        for _ in 0..pixel_count.min(MAX_PIXELS) {
            let _ = frame.push(RGB8::default());
        }
        Self {
            port,
            frame,
            frame_interval_ms: 1000 / u32::from(fps.max(1)),
            last_frame_ms: None,
            transition_ms,
            color: Fade::settled(RGB8::default()),
            brightness: Fade::settled(u8::MAX),
            dirty: true,
        }
    }

    /// Build from config and start fading towards the configured boot colour.
    pub fn from_config(port: P, config: &RigConfig) -> Self {
        let mut pixels = Self::new(
            port,
            usize::from(config.led_count),
            config.led_fps,
            config.transition_ms,
        );
        let (r, g, b) = config.initial_color;
        pixels.set_base_color(RGB8::new(r, g, b));
        pixels.set_brightness(config.initial_brightness);
        pixels
    }

    // ── Producers ─────────────────────────────────────────────

    pub fn set_base_color(&mut self, color: RGB8) {
        self.color.retarget(color, self.transition_ms);
        self.dirty = true;
    }

    pub fn set_brightness(&mut self, value: u8) {
        self.brightness.retarget(value, self.transition_ms);
        self.dirty = true;
    }

    /// Duration used by fades started after this call.  A fade already in
    /// flight keeps its own duration.
    pub fn set_transition_time(&mut self, ms: u16) {
        self.transition_ms = ms;
    }

    // ── Consumer ──────────────────────────────────────────────

    /// Run one scheduler tick.  Returns `true` if a frame was pushed.
    pub fn process(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_frame_ms {
            let elapsed = now_ms.saturating_sub(last);
            if elapsed < u64::from(self.frame_interval_ms) {
                return false;
            }
            self.advance(u32::try_from(elapsed).unwrap_or(u32::MAX));
        }
        self.last_frame_ms = Some(now_ms);

        if !self.dirty {
            return false;
        }
        self.dirty = false;

        let color = self.color.current;
        self.frame.iter_mut().for_each(|px| *px = color);
        if let Err(e) = self.port.show(&self.frame, self.brightness.current) {
            warn!("PixelAnimation: frame push failed: {}", e);
        }
        true
    }

    fn advance(&mut self, elapsed_ms: u32) {
        if self.color.current != self.color.target {
            let duration = self.color.duration_ms;
            let progress = step(&mut self.color.progress_ms, elapsed_ms, duration);
            let (base, target) = (self.color.base, self.color.target);
            let next = RGB8::new(
                lerp(base.r, target.r, progress, duration),
                lerp(base.g, target.g, progress, duration),
                lerp(base.b, target.b, progress, duration),
            );
            self.dirty |= next != self.color.current;
            self.color.current = next;
        }

        if self.brightness.current != self.brightness.target {
            let duration = self.brightness.duration_ms;
            let progress = step(&mut self.brightness.progress_ms, elapsed_ms, duration);
            let next = lerp(
                self.brightness.base,
                self.brightness.target,
                progress,
                duration,
            );
            self.dirty |= next != self.brightness.current;
            self.brightness.current = next;
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn current_color(&self) -> RGB8 {
        self.color.current
    }

    pub fn target_color(&self) -> RGB8 {
        self.color.target
    }

    pub fn current_brightness(&self) -> u8 {
        self.brightness.current
    }

    pub fn target_brightness(&self) -> u8 {
        self.brightness.target
    }

    pub fn transition_time(&self) -> u16 {
        self.transition_ms
    }

    pub fn pixel_count(&self) -> usize {
        self.frame.len()
    }

    pub fn port(&self) -> &P {
        &self.port
    }
}

/// Advance a progress counter, clamped at `duration`.
fn step(progress_ms: &mut u32, elapsed_ms: u32, duration: u32) -> u32 {
    *progress_ms = progress_ms.saturating_add(elapsed_ms).min(duration);
    *progress_ms
}

fn lerp(base: u8, target: u8, progress: u32, duration: u32) -> u8 {
    if duration == 0 || progress >= duration {
        return target;
    }
    let delta = i64::from(target) - i64::from(base);
    (i64::from(base) + delta * i64::from(progress) / i64::from(duration)) as u8
}
