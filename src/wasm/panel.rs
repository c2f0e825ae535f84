use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement};

use super::listener::EventListener;
use super::overlay::Overlay;
use crate::color;
use crate::error::{Result, VizError};
use crate::params::{ColorField, ParameterStore, TextParametersPatch, WaveField};

/// Increment applied by the `-`/`+` buttons.
const STEP: f64 = 0.1;

struct ColorInputs {
    field: ColorField,
    picker: HtmlInputElement,
    hex: HtmlInputElement,
}

/// Inputs that mirror the store.
struct Inputs {
    numbers: Vec<(WaveField, HtmlInputElement)>,
    colors: Vec<ColorInputs>,
    shadow: HtmlInputElement,
    blur: HtmlInputElement,
}

impl Inputs {
    fn sync(&self, store: &ParameterStore) {
        for (field, input) in &self.numbers {
            set_if_changed(input, &field.get(store.wave()).to_string());
        }
        self.sync_colors(store);
        set_if_changed(&self.shadow, &store.text().shadow_intensity.to_string());
        set_if_changed(&self.blur, &store.text().text_blur.to_string());
    }

    fn sync_colors(&self, store: &ParameterStore) {
        for color in &self.colors {
            let hex = color.field.get(store.wave());
            set_if_changed(&color.hex, hex);
            // A color input only holds #rrggbb; anything else would be replaced by black.
            if color::is_well_formed(hex) {
                set_if_changed(&color.picker, &hex.to_ascii_lowercase());
            }
        }
    }
}

fn set_if_changed(input: &HtmlInputElement, value: &str) {
    if input.value() != value {
        input.set_value(value);
    }
}

/// The parameter form. Removed from the page when dropped.
pub struct ControlPanel {
    root: Element,
    _listeners: Vec<EventListener>,
}

impl ControlPanel {
    pub fn mount(
        document: &Document,
        container: &Element,
        store: Rc<RefCell<ParameterStore>>,
        overlay: Overlay,
    ) -> Result<Self> {
        let root = create::<Element>(document, "div")?;
        root.set_class_name("controls");
        let toggle = button(document, &root, "-")?;
        toggle.set_class_name("minimize-btn");
        let title = create::<Element>(document, "div")?;
        title.set_class_name("control-title");
        title.set_text_content(Some("Control Panel"));
        root.append_child(&title)?;

        let body = create::<Element>(document, "div")?;
        body.set_class_name("control-panel");
        root.append_child(&body)?;
        let heading = create::<Element>(document, "h2")?;
        heading.set_text_content(Some("Wave Parameters"));
        body.append_child(&heading)?;

        let mut numbers = Vec::new();
        let mut steppers = Vec::new();
        for field in WaveField::ALL {
            let group = row(document, &body, "input-group", field.key())?;
            let decrement = button(document, &group, "-")?;
            decrement.set_class_name("decrement");
            let input = input(document, &group, "number", field.key())?;
            input.set_step("0.1");
            let increment = button(document, &group, "+")?;
            increment.set_class_name("increment");
            numbers.push((field, input));
            steppers.push((field, decrement, increment));
        }

        let mut colors = Vec::new();
        for field in ColorField::ALL {
            let group = row(document, &body, "color-input-group", field.key())?;
            let picker = input(document, &group, "color", field.key())?;
            let hex = input(document, &group, "text", &format!("{}Hex", field.key()))?;
            colors.push(ColorInputs { field, picker, hex });
        }

        let shadow = slider(document, &body, "shadowIntensity", "20", "1")?;
        let blur = slider(document, &body, "textBlur", "10", "0.1")?;
        let reset = button(document, &body, "Reset to Default")?;

        let inputs = Rc::new(Inputs {
            numbers,
            colors,
            shadow,
            blur,
        });
        inputs.sync(&store.borrow());
        overlay.refresh(&store.borrow());

        let mut listeners = Vec::new();

        {
            let root = root.clone();
            let label = toggle.clone();
            listeners.push(EventListener::new(&toggle, "click", move |_| {
                match root.class_list().toggle("minimized") {
                    Ok(minimized) => {
                        label.set_text_content(Some(if minimized { "+" } else { "-" }))
                    }
                    Err(err) => log::warn!("failed to toggle panel: {:?}", err),
                }
            })?);
        }

        for (field, input) in &inputs.numbers {
            let store = store.clone();
            let field = *field;
            let source = input.clone();
            listeners.push(EventListener::new(input, "input", move |_| {
                // Unparsable text becomes NaN, same as parseFloat.
                let value = source.value().trim().parse::<f64>().unwrap_or(f64::NAN);
                let mut store = store.borrow_mut();
                let mut next = store.wave().clone();
                field.set(&mut next, value);
                store.replace_wave(next);
            })?);
        }

        for (field, decrement, increment) in steppers {
            for (target, delta) in [(decrement, -STEP), (increment, STEP)] {
                let store = store.clone();
                let inputs = inputs.clone();
                listeners.push(EventListener::new(&target, "click", move |_| {
                    store.borrow_mut().nudge(field, delta);
                    inputs.sync(&store.borrow());
                })?);
            }
        }

        for color in &inputs.colors {
            for source in [&color.picker, &color.hex] {
                let store = store.clone();
                let inputs = inputs.clone();
                let overlay = overlay.clone();
                let field = color.field;
                let source_input = source.clone();
                listeners.push(EventListener::new(source, "input", move |_| {
                    {
                        let mut store = store.borrow_mut();
                        let mut next = store.wave().clone();
                        field.set(&mut next, source_input.value());
                        store.replace_wave(next);
                    }
                    let store = store.borrow();
                    inputs.sync_colors(&store);
                    overlay.refresh(&store);
                })?);
            }
        }

        let text_sliders = [
            (inputs.shadow.clone(), TextField::ShadowIntensity),
            (inputs.blur.clone(), TextField::TextBlur),
        ];
        for (slider, field) in text_sliders {
            let store = store.clone();
            let overlay = overlay.clone();
            let source = slider.clone();
            listeners.push(EventListener::new(&slider, "input", move |_| {
                let value = source.value().parse::<f64>().unwrap_or(f64::NAN);
                store.borrow_mut().update_text(field.patch(value));
                overlay.refresh(&store.borrow());
            })?);
        }

        {
            let store = store.clone();
            let inputs = inputs.clone();
            let overlay = overlay.clone();
            listeners.push(EventListener::new(&reset, "click", move |_| {
                store.borrow_mut().reset();
                let store = store.borrow();
                inputs.sync(&store);
                overlay.refresh(&store);
            })?);
        }

        container.append_child(&root)?;
        log::debug!("control panel mounted with {} listeners", listeners.len());
        Ok(Self {
            root,
            _listeners: listeners,
        })
    }
}

impl Drop for ControlPanel {
    fn drop(&mut self) {
        self.root.remove();
    }
}

#[derive(Clone, Copy)]
enum TextField {
    ShadowIntensity,
    TextBlur,
}

impl TextField {
    fn patch(self, value: f64) -> TextParametersPatch {
        match self {
            TextField::ShadowIntensity => TextParametersPatch {
                shadow_intensity: Some(value),
                ..Default::default()
            },
            TextField::TextBlur => TextParametersPatch {
                text_blur: Some(value),
                ..Default::default()
            },
        }
    }
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| VizError::Dom(format!("<{}> has an unexpected element type", tag)))
}

/// `"freq1"` -> `"Freq1:"`
fn label_text(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("{}{}:", first.to_ascii_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

fn row(document: &Document, parent: &Element, class: &str, key: &str) -> Result<Element> {
    let group = create::<Element>(document, "div")?;
    group.set_class_name(class);
    let label = create::<Element>(document, "label")?;
    label.set_attribute("for", key)?;
    label.set_text_content(Some(&label_text(key)));
    group.append_child(&label)?;
    parent.append_child(&group)?;
    Ok(group)
}

fn input(document: &Document, parent: &Element, kind: &str, id: &str) -> Result<HtmlInputElement> {
    let input = create::<HtmlInputElement>(document, "input")?;
    input.set_type(kind);
    input.set_id(id);
    parent.append_child(&input)?;
    Ok(input)
}

fn button(document: &Document, parent: &Element, text: &str) -> Result<HtmlButtonElement> {
    let button = create::<HtmlButtonElement>(document, "button")?;
    button.set_type("button");
    button.set_text_content(Some(text));
    parent.append_child(&button)?;
    Ok(button)
}

fn slider(
    document: &Document,
    parent: &Element,
    key: &str,
    max: &str,
    step: &str,
) -> Result<HtmlInputElement> {
    let group = row(document, parent, "input-group", key)?;
    let slider = input(document, &group, "range", key)?;
    slider.set_min("0");
    slider.set_max(max);
    slider.set_step(step);
    Ok(slider)
}
