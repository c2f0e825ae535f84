//! Host-agnostic render driver.
//!
//! [`WaveRenderer`] owns a compiled program on some [`GpuSurface`] and turns
//! `(timestamp, parameters)` into one clear/upload/draw cycle. The browser
//! build drives it from `requestAnimationFrame`; tests drive it with a
//! recording surface.

use crate::color::hex_to_rgb;
use crate::error::Result;
use crate::params::WaveParameters;
use crate::shader::{ShadeInputs, Uniform, FRAGMENT_SOURCE, VERTEX_SOURCE};
use crate::viewport::Viewport;

/// The handful of GPU operations the interference background needs.
pub trait GpuSurface {
    /// Linked program plus whatever location table the backend resolved.
    type Program;

    /// Compiles both stages and links them. Must not leave shader objects
    /// behind on failure.
    fn create_program(&mut self, vertex: &str, fragment: &str) -> Result<Self::Program>;

    /// Resizes the drawing buffer and the viewport transform.
    fn resize(&mut self, viewport: Viewport);

    fn clear(&mut self);

    fn set_float(&mut self, program: &Self::Program, uniform: Uniform, value: f32);

    fn set_vec2(&mut self, program: &Self::Program, uniform: Uniform, value: [f32; 2]);

    fn set_vec3(&mut self, program: &Self::Program, uniform: Uniform, value: [f32; 3]);

    /// Draws the full-screen quad as a 4-vertex triangle strip.
    fn draw_quad(&mut self, program: &Self::Program);

    fn release(&mut self, program: Self::Program);
}

/// Values pushed into the fragment shader for one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformSet {
    pub resolution: [f32; 2],
    pub time: f32,
    pub freq1: f32,
    pub freq2: f32,
    pub speed1: f32,
    pub speed2: f32,
    pub color: [f32; 3],
    pub bg_color: [f32; 3],
}

impl UniformSet {
    pub fn from_frame(viewport: Viewport, seconds: f32, params: &WaveParameters) -> Self {
        Self {
            resolution: viewport.resolution(),
            time: seconds,
            freq1: params.freq1 as f32,
            freq2: params.freq2 as f32,
            speed1: params.speed1 as f32,
            speed2: params.speed2 as f32,
            color: hex_to_rgb(&params.wave_color),
            bg_color: hex_to_rgb(&params.bg_color),
        }
    }

    /// The same values in the shape [`crate::shader::shade`] takes.
    pub fn shade_inputs(&self) -> ShadeInputs {
        ShadeInputs {
            resolution: self.resolution,
            time: self.time,
            freq: [self.freq1, self.freq2],
            speed: [self.speed1, self.speed2],
            color: self.color,
            bg_color: self.bg_color,
        }
    }

    fn push<S: GpuSurface>(&self, surface: &mut S, program: &S::Program) {
        surface.set_vec2(program, Uniform::Resolution, self.resolution);
        surface.set_float(program, Uniform::Time, self.time);
        self.push_parameters(surface, program);
    }

    fn push_parameters<S: GpuSurface>(&self, surface: &mut S, program: &S::Program) {
        surface.set_float(program, Uniform::Freq1, self.freq1);
        surface.set_float(program, Uniform::Freq2, self.freq2);
        surface.set_float(program, Uniform::Speed1, self.speed1);
        surface.set_float(program, Uniform::Speed2, self.speed2);
        surface.set_vec3(program, Uniform::Color, self.color);
        surface.set_vec3(program, Uniform::BgColor, self.bg_color);
    }
}

/// Frame callback timestamps are milliseconds; the shader wants seconds.
pub fn seconds_from_timestamp(timestamp_ms: f64) -> f32 {
    (timestamp_ms * 0.001) as f32
}

/// Whether the frame loop should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Stopped,
}

pub struct WaveRenderer<S: GpuSurface> {
    surface: S,
    program: Option<S::Program>,
    viewport: Viewport,
    last_uniforms: Option<UniformSet>,
    frames: u64,
}

impl<S: GpuSurface> WaveRenderer<S> {
    /// Compiles the canonical shaders on `surface` and applies `viewport`.
    pub fn initialize(mut surface: S, viewport: Viewport) -> Result<Self> {
        let program = match surface.create_program(VERTEX_SOURCE, FRAGMENT_SOURCE) {
            Ok(program) => program,
            Err(err) => {
                log::error!("shader program unavailable: {}", err);
                return Err(err);
            }
        };
        surface.resize(viewport);
        log::info!("wave renderer ready at {}x{}", viewport.width, viewport.height);
        Ok(Self {
            surface,
            program: Some(program),
            viewport,
            last_uniforms: None,
            frames: 0,
        })
    }

    /// One clear, uniform upload and draw. After [`teardown`](Self::teardown)
    /// this does nothing and reports [`FrameOutcome::Stopped`].
    pub fn render_frame(&mut self, timestamp_ms: f64, params: &WaveParameters) -> FrameOutcome {
        let Some(program) = self.program.as_ref() else {
            return FrameOutcome::Stopped;
        };
        let uniforms =
            UniformSet::from_frame(self.viewport, seconds_from_timestamp(timestamp_ms), params);

        self.surface.clear();
        uniforms.push(&mut self.surface, program);
        self.surface.draw_quad(program);

        self.last_uniforms = Some(uniforms);
        self.frames += 1;
        FrameOutcome::Continue
    }

    /// Pushes frequencies, speeds and colors outside the frame loop.
    pub fn push_parameters(&mut self, params: &WaveParameters) {
        let Some(program) = self.program.as_ref() else {
            return;
        };
        let time = self.last_uniforms.map(|u| u.time).unwrap_or(0.0);
        UniformSet::from_frame(self.viewport, time, params)
            .push_parameters(&mut self.surface, program);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            log::warn!("resizing to empty viewport {}x{}", viewport.width, viewport.height);
        }
        self.viewport = viewport;
        self.surface.resize(viewport);
    }

    /// Releases the program. Safe to call more than once.
    pub fn teardown(&mut self) {
        if let Some(program) = self.program.take() {
            self.surface.release(program);
            log::info!("wave renderer torn down after {} frames", self.frames);
        }
    }

    pub fn is_live(&self) -> bool {
        self.program.is_some()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Uniforms pushed by the most recent frame.
    pub fn last_uniforms(&self) -> Option<&UniformSet> {
        self.last_uniforms.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
