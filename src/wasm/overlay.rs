use web_sys::HtmlElement;

use crate::error::Result;
use crate::overlay::OverlayStyle;
use crate::params::ParameterStore;

/// The glowing text element; reads the store directly, not via the renderer.
#[derive(Clone)]
pub struct Overlay {
    element: Option<HtmlElement>,
}

impl Overlay {
    pub fn new(element: Option<HtmlElement>) -> Self {
        if element.is_none() {
            log::warn!("overlay element not found; text styling disabled");
        }
        Self { element }
    }

    pub fn refresh(&self, store: &ParameterStore) {
        let Some(element) = &self.element else {
            return;
        };
        let style = OverlayStyle::from_params(store.wave(), store.text());
        if let Err(err) = apply(element, &style) {
            log::warn!("failed to style overlay: {}", err);
        }
    }
}

fn apply(element: &HtmlElement, style: &OverlayStyle) -> Result<()> {
    let css = element.style();
    for (property, value) in style.properties() {
        css.set_property(property, value)?;
    }
    Ok(())
}
