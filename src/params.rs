//! Wave and text parameters plus the store the control panel edits.

use serde::{Deserialize, Serialize};

use crate::color;
use crate::error::{Result, VizError};

/// Everything the fragment shader needs from the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaveParameters {
    pub freq1: f64,
    pub freq2: f64,
    pub speed1: f64,
    pub speed2: f64,
    pub wave_color: String,
    pub box_color: String,
    pub bg_color: String,
}

impl Default for WaveParameters {
    fn default() -> Self {
        Self {
            freq1: 2222.0,
            freq2: 11.0,
            speed1: 55.0,
            speed2: 1.0,
            wave_color: "#DCD7F4".to_string(),
            box_color: "#DCD7F4".to_string(),
            bg_color: "#000000".to_string(),
        }
    }
}

/// Glow and blur applied to the overlay text, both in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextParameters {
    pub shadow_intensity: f64,
    pub text_blur: f64,
}

impl Default for TextParameters {
    fn default() -> Self {
        Self {
            shadow_intensity: 22.0,
            text_blur: 4.0,
        }
    }
}

/// Partial wave record; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaveParametersPatch {
    pub freq1: Option<f64>,
    pub freq2: Option<f64>,
    pub speed1: Option<f64>,
    pub speed2: Option<f64>,
    pub wave_color: Option<String>,
    pub box_color: Option<String>,
    pub bg_color: Option<String>,
}

impl WaveParametersPatch {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(VizError::InvalidPatch)
    }

    fn apply(self, target: &mut WaveParameters) {
        merge(&mut target.freq1, self.freq1);
        merge(&mut target.freq2, self.freq2);
        merge(&mut target.speed1, self.speed1);
        merge(&mut target.speed2, self.speed2);
        merge(&mut target.wave_color, self.wave_color);
        merge(&mut target.box_color, self.box_color);
        merge(&mut target.bg_color, self.bg_color);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextParametersPatch {
    pub shadow_intensity: Option<f64>,
    pub text_blur: Option<f64>,
}

impl TextParametersPatch {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(VizError::InvalidPatch)
    }

    fn apply(self, target: &mut TextParameters) {
        merge(&mut target.shadow_intensity, self.shadow_intensity);
        merge(&mut target.text_blur, self.text_blur);
    }
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// The numeric wave fields the panel exposes step buttons for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveField {
    Freq1,
    Freq2,
    Speed1,
    Speed2,
}

impl WaveField {
    pub const ALL: [WaveField; 4] = [
        WaveField::Freq1,
        WaveField::Freq2,
        WaveField::Speed1,
        WaveField::Speed2,
    ];

    pub fn key(self) -> &'static str {
        match self {
            WaveField::Freq1 => "freq1",
            WaveField::Freq2 => "freq2",
            WaveField::Speed1 => "speed1",
            WaveField::Speed2 => "speed2",
        }
    }

    pub fn get(self, params: &WaveParameters) -> f64 {
        match self {
            WaveField::Freq1 => params.freq1,
            WaveField::Freq2 => params.freq2,
            WaveField::Speed1 => params.speed1,
            WaveField::Speed2 => params.speed2,
        }
    }

    pub fn set(self, params: &mut WaveParameters, value: f64) {
        match self {
            WaveField::Freq1 => params.freq1 = value,
            WaveField::Freq2 => params.freq2 = value,
            WaveField::Speed1 => params.speed1 = value,
            WaveField::Speed2 => params.speed2 = value,
        }
    }

    pub fn patch(self, value: f64) -> WaveParametersPatch {
        let mut patch = WaveParametersPatch::default();
        match self {
            WaveField::Freq1 => patch.freq1 = Some(value),
            WaveField::Freq2 => patch.freq2 = Some(value),
            WaveField::Speed1 => patch.speed1 = Some(value),
            WaveField::Speed2 => patch.speed2 = Some(value),
        }
        patch
    }
}

/// The hex color fields of [`WaveParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorField {
    Wave,
    Box,
    Background,
}

impl ColorField {
    pub const ALL: [ColorField; 3] = [ColorField::Wave, ColorField::Box, ColorField::Background];

    pub fn key(self) -> &'static str {
        match self {
            ColorField::Wave => "waveColor",
            ColorField::Box => "boxColor",
            ColorField::Background => "bgColor",
        }
    }

    pub fn get(self, params: &WaveParameters) -> &str {
        match self {
            ColorField::Wave => &params.wave_color,
            ColorField::Box => &params.box_color,
            ColorField::Background => &params.bg_color,
        }
    }

    pub fn set(self, params: &mut WaveParameters, value: impl Into<String>) {
        let slot = match self {
            ColorField::Wave => &mut params.wave_color,
            ColorField::Box => &mut params.box_color,
            ColorField::Background => &mut params.bg_color,
        };
        *slot = value.into();
    }
}

/// Snapshot the store resets to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Defaults {
    pub wave: WaveParameters,
    pub text: TextParameters,
}

type WaveListener = Box<dyn FnMut(&WaveParameters)>;

/// Current wave/text parameters for one mounted view.
pub struct ParameterStore {
    defaults: Defaults,
    wave: WaveParameters,
    text: TextParameters,
    revision: u64,
    listeners: Vec<WaveListener>,
}

impl ParameterStore {
    pub fn new(defaults: Defaults) -> Self {
        Self {
            wave: defaults.wave.clone(),
            text: defaults.text,
            defaults,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    pub fn wave(&self) -> &WaveParameters {
        &self.wave
    }

    pub fn text(&self) -> &TextParameters {
        &self.text
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Number of edits applied since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a callback run synchronously after every wave change.
    pub fn on_wave_change(&mut self, listener: impl FnMut(&WaveParameters) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn update_wave(&mut self, patch: WaveParametersPatch) {
        patch.apply(&mut self.wave);
        self.wave_changed();
    }

    pub fn replace_wave(&mut self, params: WaveParameters) {
        self.wave = params;
        self.wave_changed();
    }

    pub fn update_text(&mut self, patch: TextParametersPatch) {
        patch.apply(&mut self.text);
        self.revision += 1;
        log::debug!("text parameters updated: {:?}", self.text);
    }

    /// Steps a numeric field by `delta`, rounding to one decimal place.
    pub fn nudge(&mut self, field: WaveField, delta: f64) {
        let next = ((field.get(&self.wave) + delta) * 10.0).round() / 10.0;
        self.update_wave(field.patch(next));
    }

    pub fn reset(&mut self) {
        self.wave = self.defaults.wave.clone();
        self.text = self.defaults.text;
        self.revision += 1;
        log::debug!("parameters reset to defaults");
        self.notify();
    }

    fn wave_changed(&mut self) {
        self.revision += 1;
        for hex in [&self.wave.wave_color, &self.wave.box_color, &self.wave.bg_color] {
            if !color::is_well_formed(hex) {
                log::warn!("color {:?} is not #RRGGBB; shader output is undefined", hex);
            }
        }
        log::debug!("wave parameters updated: {:?}", self.wave);
        self.notify();
    }

    fn notify(&mut self) {
        let wave = &self.wave;
        for listener in self.listeners.iter_mut() {
            listener(wave);
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(Defaults::default())
    }
}
