use std::cell::RefCell;
use std::rc::Rc;

use interference_viz::error::ShaderStage;
use interference_viz::params::{ParameterStore, WaveField, WaveParametersPatch};
use interference_viz::shader::Uniform;
use interference_viz::{FrameOutcome, GpuSurface, Result, VizError, Viewport, WaveRenderer};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Compile,
    Resize(Viewport),
    Clear,
    Float(Uniform, f32),
    Vec2(Uniform, [f32; 2]),
    Vec3(Uniform, [f32; 3]),
    Draw,
    Release,
}

/// Headless surface that records every GPU call.
#[derive(Default)]
struct RecordingSurface {
    calls: Rc<RefCell<Vec<Call>>>,
    fail_fragment: bool,
}

impl RecordingSurface {
    fn new() -> (Self, Rc<RefCell<Vec<Call>>>) {
        let surface = Self::default();
        let calls = surface.calls.clone();
        (surface, calls)
    }
}

struct FakeProgram;

impl GpuSurface for RecordingSurface {
    type Program = FakeProgram;

    fn create_program(&mut self, vertex: &str, fragment: &str) -> Result<FakeProgram> {
        assert!(vertex.contains("a_position"));
        assert!(fragment.contains("u_bgColor"));
        if self.fail_fragment {
            return Err(VizError::ShaderCompile {
                stage: ShaderStage::Fragment,
                log: "0:1: syntax error".into(),
            });
        }
        self.calls.borrow_mut().push(Call::Compile);
        Ok(FakeProgram)
    }

    fn resize(&mut self, viewport: Viewport) {
        self.calls.borrow_mut().push(Call::Resize(viewport));
    }

    fn clear(&mut self) {
        self.calls.borrow_mut().push(Call::Clear);
    }

    fn set_float(&mut self, _: &FakeProgram, uniform: Uniform, value: f32) {
        self.calls.borrow_mut().push(Call::Float(uniform, value));
    }

    fn set_vec2(&mut self, _: &FakeProgram, uniform: Uniform, value: [f32; 2]) {
        self.calls.borrow_mut().push(Call::Vec2(uniform, value));
    }

    fn set_vec3(&mut self, _: &FakeProgram, uniform: Uniform, value: [f32; 3]) {
        self.calls.borrow_mut().push(Call::Vec3(uniform, value));
    }

    fn draw_quad(&mut self, _: &FakeProgram) {
        self.calls.borrow_mut().push(Call::Draw);
    }

    fn release(&mut self, _: FakeProgram) {
        self.calls.borrow_mut().push(Call::Release);
    }
}

fn count(calls: &[Call], wanted: &Call) -> usize {
    calls.iter().filter(|call| *call == wanted).count()
}

fn uniforms_set(calls: &[Call]) -> Vec<Uniform> {
    calls
        .iter()
        .filter_map(|call| match call {
            Call::Float(u, _) | Call::Vec2(u, _) | Call::Vec3(u, _) => Some(*u),
            _ => None,
        })
        .collect()
}

#[test]
fn initialize_compiles_once_and_applies_viewport() {
    let (surface, calls) = RecordingSurface::new();
    let renderer = WaveRenderer::initialize(surface, Viewport::new(640, 480)).expect("renderer");
    assert!(renderer.is_live());
    assert_eq!(
        *calls.borrow(),
        vec![Call::Compile, Call::Resize(Viewport::new(640, 480))]
    );
}

#[test]
fn compile_failure_yields_no_renderer() {
    let surface = RecordingSurface {
        fail_fragment: true,
        ..Default::default()
    };
    let calls = surface.calls.clone();
    match WaveRenderer::initialize(surface, Viewport::new(1, 1)) {
        Err(VizError::ShaderCompile { stage, .. }) => assert_eq!(stage, ShaderStage::Fragment),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("renderer should not start"),
    }
    assert!(calls.borrow().is_empty());
}

#[test]
fn frame_clears_pushes_every_uniform_then_draws() {
    let (surface, calls) = RecordingSurface::new();
    let store = ParameterStore::default();
    let mut renderer = WaveRenderer::initialize(surface, Viewport::new(800, 600)).expect("renderer");
    calls.borrow_mut().clear();

    assert_eq!(renderer.render_frame(1500.0, store.wave()), FrameOutcome::Continue);

    let calls = calls.borrow();
    assert_eq!(calls.first(), Some(&Call::Clear));
    assert_eq!(calls.last(), Some(&Call::Draw));
    let mut pushed = uniforms_set(&calls);
    pushed.sort_by_key(|u| u.index());
    assert_eq!(pushed, Uniform::ALL.to_vec());
    assert!(calls.contains(&Call::Vec2(Uniform::Resolution, [800.0, 600.0])));
    assert!(calls.contains(&Call::Float(Uniform::Time, 1.5)));
    assert!(calls.contains(&Call::Float(Uniform::Freq1, 2222.0)));
    assert!(calls.contains(&Call::Float(Uniform::Speed1, 55.0)));
    assert!(calls.contains(&Call::Vec3(Uniform::BgColor, [0.0, 0.0, 0.0])));
}

#[test]
fn resize_is_visible_on_the_next_frame() {
    let (surface, calls) = RecordingSurface::new();
    let store = ParameterStore::default();
    let mut renderer = WaveRenderer::initialize(surface, Viewport::new(800, 600)).expect("renderer");
    renderer.render_frame(16.0, store.wave());

    renderer.resize(Viewport::new(1024, 768));
    assert!(calls.borrow().contains(&Call::Resize(Viewport::new(1024, 768))));
    calls.borrow_mut().clear();

    renderer.render_frame(32.0, store.wave());
    assert!(calls
        .borrow()
        .contains(&Call::Vec2(Uniform::Resolution, [1024.0, 768.0])));
    assert_eq!(renderer.last_uniforms().map(|u| u.resolution), Some([1024.0, 768.0]));
    assert_eq!(renderer.viewport(), Viewport::new(1024, 768));
}

#[test]
fn loop_keeps_going_until_teardown() {
    let (surface, calls) = RecordingSurface::new();
    let store = ParameterStore::default();
    let mut renderer = WaveRenderer::initialize(surface, Viewport::new(2, 2)).expect("renderer");

    for frame in 0..120 {
        let outcome = renderer.render_frame(frame as f64 * 16.6, store.wave());
        assert_eq!(outcome, FrameOutcome::Continue);
    }
    assert_eq!(renderer.frames(), 120);
    assert_eq!(count(&calls.borrow(), &Call::Draw), 120);

    renderer.teardown();
    renderer.teardown();
    assert_eq!(count(&calls.borrow(), &Call::Release), 1);

    calls.borrow_mut().clear();
    assert_eq!(renderer.render_frame(5000.0, store.wave()), FrameOutcome::Stopped);
    renderer.push_parameters(store.wave());
    assert!(calls.borrow().is_empty());
    assert!(!renderer.is_live());
}

#[test]
fn frames_read_the_latest_store_values() {
    let (surface, _calls) = RecordingSurface::new();
    let mut store = ParameterStore::default();
    let mut renderer = WaveRenderer::initialize(surface, Viewport::new(2, 2)).expect("renderer");

    store.update_wave(WaveParametersPatch {
        wave_color: Some("#FFFFFF".into()),
        ..Default::default()
    });
    store.nudge(WaveField::Freq2, 0.1);
    renderer.render_frame(0.0, store.wave());

    let uniforms = renderer.last_uniforms().expect("uniforms");
    assert_eq!(uniforms.color, [1.0, 1.0, 1.0]);
    assert_eq!(uniforms.freq2, 11.1);
}

#[test]
fn store_changes_push_parameter_uniforms_immediately() {
    let (surface, calls) = RecordingSurface::new();
    let renderer = Rc::new(RefCell::new(
        WaveRenderer::initialize(surface, Viewport::new(2, 2)).expect("renderer"),
    ));
    let mut store = ParameterStore::default();
    {
        let renderer = renderer.clone();
        store.on_wave_change(move |wave| renderer.borrow_mut().push_parameters(wave));
    }
    calls.borrow_mut().clear();

    store.update_wave(WaveField::Speed2.patch(4.0));

    let calls = calls.borrow();
    assert!(calls.contains(&Call::Float(Uniform::Speed2, 4.0)));
    let pushed = uniforms_set(&calls);
    assert!(!pushed.contains(&Uniform::Resolution));
    assert!(!pushed.contains(&Uniform::Time));
    assert_eq!(pushed.len(), 6);
    assert_eq!(count(&calls, &Call::Draw), 0);
}
