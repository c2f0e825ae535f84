use crate::params::{TextParameters, WaveParameters};

/// CSS applied to the overlay text so it glows in the wave color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayStyle {
    pub text_shadow: String,
    pub filter: String,
}

impl OverlayStyle {
    pub fn from_params(wave: &WaveParameters, text: &TextParameters) -> Self {
        Self {
            text_shadow: format!("0 0 {}px {}", text.shadow_intensity, wave.wave_color),
            filter: format!("blur({}px)", text.text_blur),
        }
    }

    /// `(property, value)` pairs in the order they are applied.
    pub fn properties(&self) -> [(&'static str, &str); 2] {
        [
            ("text-shadow", self.text_shadow.as_str()),
            ("filter", self.filter.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style() {
        let style =
            OverlayStyle::from_params(&WaveParameters::default(), &TextParameters::default());
        assert_eq!(style.text_shadow, "0 0 22px #DCD7F4");
        assert_eq!(style.filter, "blur(4px)");
    }

    #[test]
    fn fractional_blur_keeps_decimal() {
        let text = TextParameters {
            shadow_intensity: 0.0,
            text_blur: 2.5,
        };
        let wave = WaveParameters {
            wave_color: "#FF0000".into(),
            ..WaveParameters::default()
        };
        let style = OverlayStyle::from_params(&wave, &text);
        assert_eq!(style.text_shadow, "0 0 0px #FF0000");
        assert_eq!(style.filter, "blur(2.5px)");
        assert_eq!(style.properties()[1], ("filter", "blur(2.5px)"));
    }
}
