//! Canonical shader sources for the interference background.
//!
//! Every host compiles these exact strings. [`shade`] evaluates the fragment
//! stage on the CPU in single precision so the formula can be checked without
//! a GPU.

/// Full-screen quad: the position attribute already spans clip space.
pub const VERTEX_SOURCE: &str = r#"
attribute vec2 a_position;
void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

pub const FRAGMENT_SOURCE: &str = r#"
precision mediump float;

uniform vec2 u_resolution;
uniform float u_time;
uniform float u_freq1;
uniform float u_freq2;
uniform float u_speed1;
uniform float u_speed2;
uniform vec3 u_color;
uniform vec3 u_bgColor;

void main() {
    vec2 st = gl_FragCoord.xy / u_resolution;
    float wave1 = sin(st.x * u_freq1 + u_time * u_speed1) * 0.5 + 0.5;
    float wave2 = sin(st.y * u_freq2 + u_time * u_speed2) * 0.5 + 0.5;
    float interference = (wave1 + wave2) / 2.0;
    vec3 waveColor = u_color * interference;
    gl_FragColor = vec4(mix(u_bgColor, waveColor, interference), 1.0);
}
"#;

pub const POSITION_ATTRIBUTE: &str = "a_position";

/// Triangle strip covering clip space, two floats per vertex.
pub const QUAD_VERTICES: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];

pub const QUAD_VERTEX_COUNT: i32 = 4;

/// Uniforms declared by [`FRAGMENT_SOURCE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    Resolution,
    Time,
    Freq1,
    Freq2,
    Speed1,
    Speed2,
    Color,
    BgColor,
}

impl Uniform {
    pub const COUNT: usize = 8;

    pub const ALL: [Uniform; Uniform::COUNT] = [
        Uniform::Resolution,
        Uniform::Time,
        Uniform::Freq1,
        Uniform::Freq2,
        Uniform::Speed1,
        Uniform::Speed2,
        Uniform::Color,
        Uniform::BgColor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Uniform::Resolution => "u_resolution",
            Uniform::Time => "u_time",
            Uniform::Freq1 => "u_freq1",
            Uniform::Freq2 => "u_freq2",
            Uniform::Speed1 => "u_speed1",
            Uniform::Speed2 => "u_speed2",
            Uniform::Color => "u_color",
            Uniform::BgColor => "u_bgColor",
        }
    }

    /// Position in [`Uniform::ALL`], handy for fixed-size location tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-draw inputs of the fragment stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeInputs {
    pub resolution: [f32; 2],
    pub time: f32,
    pub freq: [f32; 2],
    pub speed: [f32; 2],
    pub color: [f32; 3],
    pub bg_color: [f32; 3],
}

/// RGBA the fragment shader writes for pixel coordinate `frag`.
pub fn shade(frag: [f32; 2], inputs: &ShadeInputs) -> [f32; 4] {
    let st = [frag[0] / inputs.resolution[0], frag[1] / inputs.resolution[1]];
    let wave1 = (st[0] * inputs.freq[0] + inputs.time * inputs.speed[0]).sin() * 0.5 + 0.5;
    let wave2 = (st[1] * inputs.freq[1] + inputs.time * inputs.speed[1]).sin() * 0.5 + 0.5;
    let interference = (wave1 + wave2) / 2.0;

    let mut out = [0.0, 0.0, 0.0, 1.0];
    for i in 0..3 {
        let wave_color = inputs.color[i] * interference;
        out[i] = mix(inputs.bg_color[i], wave_color, interference);
    }
    out
}

/// GLSL `mix`.
fn mix(x: f32, y: f32, a: f32) -> f32 {
    x * (1.0 - a) + y * a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_index_matches_table_order() {
        for (i, uniform) in Uniform::ALL.iter().enumerate() {
            assert_eq!(uniform.index(), i);
        }
    }

    #[test]
    fn every_uniform_is_declared_in_fragment_source() {
        for uniform in Uniform::ALL {
            assert!(
                FRAGMENT_SOURCE.contains(&format!(" {};", uniform.name())),
                "{} missing",
                uniform.name()
            );
        }
        assert!(VERTEX_SOURCE.contains(POSITION_ATTRIBUTE));
    }

    #[test]
    fn quad_is_a_four_vertex_strip() {
        assert_eq!(QUAD_VERTICES.len() as i32, QUAD_VERTEX_COUNT * 2);
        assert!(QUAD_VERTICES.iter().all(|v| v.abs() == 1.0));
    }

    #[test]
    fn mix_endpoints() {
        assert_eq!(mix(0.2, 0.8, 0.0), 0.2);
        assert_eq!(mix(0.2, 0.8, 1.0), 0.8);
    }
}
