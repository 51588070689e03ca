/// WebGL2 implementation of the renderer backend
use nalgebra::Matrix4;
use spin3d_core::{Error, Mesh, RendererBackend, Result};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

const VERTEX_SHADER: &str = r#"#version 300 es
in vec4 a_position;
in vec4 a_color;

uniform mat4 u_matrix;

out vec4 v_color;

void main() {
    gl_Position = u_matrix * a_position;
    v_color = a_color;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec4 v_color;

out vec4 outColor;

void main() {
    outColor = v_color;
}
"#;

/// Owns the canvas, the linked program and the static letter buffers
pub struct WebGlBackend {
    canvas: HtmlCanvasElement,
    gl: Gl,
    program: WebGlProgram,
    position_buffer: WebGlBuffer,
    color_buffer: WebGlBuffer,
    position_location: u32,
    color_location: u32,
    matrix_location: WebGlUniformLocation,
    vertex_count: i32,
}

impl WebGlBackend {
    /// Find the canvas, compile the shaders and upload the mesh
    pub fn initialize(canvas_id: &str, mesh: &Mesh) -> Result<Self> {
        let canvas = find_canvas(canvas_id)?;
        let gl = canvas
            .get_context("webgl2")
            .map_err(|e| init_error(format!("getContext failed: {:?}", e)))?
            .ok_or_else(|| init_error("WebGL2 is not available"))?
            .dyn_into::<Gl>()
            .map_err(|_| init_error("context is not a WebGL2RenderingContext"))?;

        let vertex = compile_shader(&gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
        let fragment = compile_shader(&gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vertex, &fragment)?;

        let position_location = attrib_location(&gl, &program, "a_position")?;
        let color_location = attrib_location(&gl, &program, "a_color")?;
        let matrix_location = gl
            .get_uniform_location(&program, "u_matrix")
            .ok_or_else(|| init_error("uniform u_matrix not found"))?;

        let positions = mesh.positions();
        let position_buffer = upload(&gl, bytemuck::cast_slice(positions.as_slice()))?;
        let color_buffer = upload(&gl, &mesh.colors())?;

        let vertex_count = i32::try_from(mesh.vertex_count())
            .map_err(|_| init_error("mesh has too many vertices"))?;

        log::info!("WebGL2 backend ready, {} vertices", vertex_count);

        Ok(Self {
            canvas,
            gl,
            program,
            position_buffer,
            color_buffer,
            position_location,
            color_location,
            matrix_location,
            vertex_count,
        })
    }

    fn check_context(&self) -> Result<()> {
        if self.gl.is_context_lost() {
            return Err(Error::ContextLost("WebGL2 context lost".to_string()));
        }
        Ok(())
    }

    fn bind_attribute(&self, buffer: &WebGlBuffer, location: u32, kind: u32, normalize: bool) {
        self.gl.enable_vertex_attrib_array(location);
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        // 3 components per vertex, tightly packed from the start of the buffer
        self.gl
            .vertex_attrib_pointer_with_i32(location, 3, kind, normalize, 0, 0);
    }
}

impl RendererBackend for WebGlBackend {
    /// Match the canvas drawing buffer to its CSS size
    fn resize(&mut self) -> Result<(u32, u32)> {
        self.check_context()?;

        let width = self.canvas.client_width().max(0) as u32;
        let height = self.canvas.client_height().max(0) as u32;
        if self.canvas.width() != width || self.canvas.height() != height {
            log::debug!("canvas resized to {}x{}", width, height);
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }

        self.gl.viewport(0, 0, width as i32, height as i32);
        Ok((width, height))
    }

    fn clear(&mut self) -> Result<()> {
        self.check_context()?;
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        Ok(())
    }

    fn draw(&mut self, matrix: &Matrix4<f32>) -> Result<()> {
        self.check_context()?;

        self.gl.enable(Gl::CULL_FACE);
        self.gl.enable(Gl::DEPTH_TEST);
        self.gl.use_program(Some(&self.program));

        self.bind_attribute(&self.position_buffer, self.position_location, Gl::FLOAT, false);
        // Bytes 0-255 normalized to 0-1
        self.bind_attribute(&self.color_buffer, self.color_location, Gl::UNSIGNED_BYTE, true);

        // Column-major storage, so no transpose
        self.gl
            .uniform_matrix4fv_with_f32_array(Some(&self.matrix_location), false, matrix.as_slice());
        self.gl.draw_arrays(Gl::TRIANGLES, 0, self.vertex_count);

        match self.gl.get_error() {
            Gl::NO_ERROR => Ok(()),
            Gl::CONTEXT_LOST_WEBGL => Err(Error::ContextLost("lost during draw".to_string())),
            code => Err(Error::Frame(format!("GL error 0x{:04x}", code))),
        }
    }
}

fn init_error(message: impl Into<String>) -> Error {
    Error::Initialization(message.into())
}

fn find_canvas(canvas_id: &str) -> Result<HtmlCanvasElement> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| init_error("no browser document"))?
        .get_element_by_id(canvas_id)
        .ok_or_else(|| init_error(format!("no element with id '{}'", canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| init_error(format!("element '{}' is not a canvas", canvas_id)))
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| init_error("unable to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(init_error(format!("shader compile failed: {}", log)))
    }
}

fn link_program(gl: &Gl, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or_else(|| init_error("unable to create program"))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if linked {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(init_error(format!("program link failed: {}", log)))
    }
}

fn attrib_location(gl: &Gl, program: &WebGlProgram, name: &str) -> Result<u32> {
    let location = gl.get_attrib_location(program, name);
    u32::try_from(location).map_err(|_| init_error(format!("attribute {} not found", name)))
}

fn upload(gl: &Gl, bytes: &[u8]) -> Result<WebGlBuffer> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| init_error("unable to create buffer"))?;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
    gl.buffer_data_with_u8_array(Gl::ARRAY_BUFFER, bytes, Gl::STATIC_DRAW);
    Ok(buffer)
}
