use js_sys::Float32Array;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

use crate::error::{Result, ShaderStage, VizError};
use crate::render::GpuSurface;
use crate::shader::{Uniform, POSITION_ATTRIBUTE, QUAD_VERTEX_COUNT, QUAD_VERTICES};
use crate::viewport::Viewport;

/// Linked program, quad buffer and the locations resolved at link time.
pub struct GlProgram {
    program: WebGlProgram,
    quad: WebGlBuffer,
    locations: [Option<WebGlUniformLocation>; Uniform::COUNT],
}

impl GlProgram {
    fn location(&self, uniform: Uniform) -> Option<&WebGlUniformLocation> {
        self.locations[uniform.index()].as_ref()
    }
}

/// WebGL2 context bound to one canvas.
pub struct WebGlSurface {
    canvas: HtmlCanvasElement,
    gl: GL,
}

impl WebGlSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or(VizError::ContextUnavailable)?
            .dyn_into()
            .map_err(|_| VizError::ContextUnavailable)?;
        Ok(Self { canvas, gl })
    }

    fn compile(&self, stage: ShaderStage, source: &str) -> Result<WebGlShader> {
        let kind = match stage {
            ShaderStage::Vertex => GL::VERTEX_SHADER,
            ShaderStage::Fragment => GL::FRAGMENT_SHADER,
        };
        let shader = self
            .gl
            .create_shader(kind)
            .ok_or(VizError::ResourceAllocation("shader"))?;
        self.gl.shader_source(&shader, source);
        self.gl.compile_shader(&shader);

        let compiled = self
            .gl
            .get_shader_parameter(&shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if compiled {
            return Ok(shader);
        }
        let log = self
            .gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader error".to_string());
        self.gl.delete_shader(Some(&shader));
        Err(VizError::ShaderCompile { stage, log })
    }

    fn link(&self, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram> {
        let program = self
            .gl
            .create_program()
            .ok_or(VizError::ResourceAllocation("program"))?;
        self.gl.attach_shader(&program, vertex);
        self.gl.attach_shader(&program, fragment);
        self.gl.link_program(&program);

        let linked = self
            .gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if linked {
            return Ok(program);
        }
        let log = self
            .gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program error".to_string());
        self.gl.delete_program(Some(&program));
        Err(VizError::ProgramLink(log))
    }

    /// Uploads the quad and points `a_position` at it.
    fn bind_quad(&self, program: &WebGlProgram) -> Result<WebGlBuffer> {
        let position = self.gl.get_attrib_location(program, POSITION_ATTRIBUTE);
        if position < 0 {
            return Err(VizError::ResourceAllocation("position attribute"));
        }
        let buffer = self
            .gl
            .create_buffer()
            .ok_or(VizError::ResourceAllocation("quad buffer"))?;
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let vertices = Float32Array::from(&QUAD_VERTICES[..]);
        self.gl
            .buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);
        self.gl.enable_vertex_attrib_array(position as u32);
        self.gl
            .vertex_attrib_pointer_with_i32(position as u32, 2, GL::FLOAT, false, 0, 0);
        Ok(buffer)
    }
}

impl GpuSurface for WebGlSurface {
    type Program = GlProgram;

    fn create_program(&mut self, vertex: &str, fragment: &str) -> Result<GlProgram> {
        let vertex_shader = self.compile(ShaderStage::Vertex, vertex)?;
        let fragment_shader = match self.compile(ShaderStage::Fragment, fragment) {
            Ok(shader) => shader,
            Err(err) => {
                self.gl.delete_shader(Some(&vertex_shader));
                return Err(err);
            }
        };
        let linked = self.link(&vertex_shader, &fragment_shader);
        // The program keeps its own reference once linked.
        self.gl.delete_shader(Some(&vertex_shader));
        self.gl.delete_shader(Some(&fragment_shader));
        let program = linked?;

        self.gl.use_program(Some(&program));
        let quad = match self.bind_quad(&program) {
            Ok(quad) => quad,
            Err(err) => {
                self.gl.delete_program(Some(&program));
                return Err(err);
            }
        };

        let locations = Uniform::ALL.map(|uniform| {
            let location = self.gl.get_uniform_location(&program, uniform.name());
            if location.is_none() {
                log::warn!("uniform {} is not active", uniform.name());
            }
            location
        });

        Ok(GlProgram {
            program,
            quad,
            locations,
        })
    }

    fn resize(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width);
        self.canvas.set_height(viewport.height);
        self.gl
            .viewport(0, 0, viewport.width as i32, viewport.height as i32);
    }

    fn clear(&mut self) {
        self.gl.clear(GL::COLOR_BUFFER_BIT);
    }

    fn set_float(&mut self, program: &GlProgram, uniform: Uniform, value: f32) {
        self.gl.uniform1f(program.location(uniform), value);
    }

    fn set_vec2(&mut self, program: &GlProgram, uniform: Uniform, value: [f32; 2]) {
        self.gl.uniform2f(program.location(uniform), value[0], value[1]);
    }

    fn set_vec3(&mut self, program: &GlProgram, uniform: Uniform, value: [f32; 3]) {
        self.gl
            .uniform3f(program.location(uniform), value[0], value[1], value[2]);
    }

    fn draw_quad(&mut self, _program: &GlProgram) {
        self.gl.draw_arrays(GL::TRIANGLE_STRIP, 0, QUAD_VERTEX_COUNT);
    }

    fn release(&mut self, program: GlProgram) {
        self.gl.use_program(None);
        self.gl.delete_buffer(Some(&program.quad));
        self.gl.delete_program(Some(&program.program));
    }
}
