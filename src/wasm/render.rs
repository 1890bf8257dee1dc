//! WebGL2 implementation of [`GraphicsBackend`].

use std::collections::HashMap;

use glam::Mat4;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::camera::{PerspectiveCamera, Viewport};
use crate::error::SceneError;
use crate::geometry::{MeshData, Topology};
use crate::resources::{DrawItem, GeometryHandle, GraphicsBackend, Material, MaterialHandle};
use crate::shader;

// Attribute locations fixed by `layout(location = N)` in every vertex shader.
const ATTR_POSITION: u32 = 0;
const ATTR_NORMAL: u32 = 1;
const ATTR_UV: u32 = 2;
const ATTR_COLOR: u32 = 3;

const COMMON_UNIFORMS: [&str; 3] = ["u_projection", "u_view", "u_model"];

pub(crate) fn js_err(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

struct Program {
    program: WebGlProgram,
    uniforms: HashMap<&'static str, WebGlUniformLocation>,
}

impl Program {
    fn link(gl: &GL, vertex: &str, fragment: &str, uniforms: &[&'static str]) -> Result<Self, SceneError> {
        let vs = compile(gl, GL::VERTEX_SHADER, vertex)?;
        let fs = compile(gl, GL::FRAGMENT_SHADER, fragment).inspect_err(|_| gl.delete_shader(Some(&vs)))?;
        let Some(program) = gl.create_program() else {
            gl.delete_shader(Some(&vs));
            gl.delete_shader(Some(&fs));
            return Err(SceneError::Allocation("program".to_owned()));
        };
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.link_program(&program);
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));

        let linked = gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !linked {
            let info = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            return Err(SceneError::Shader(format!("link failed: {info}")));
        }

        // Uniforms the compiler optimized away have no location; skip them.
        let uniforms = COMMON_UNIFORMS
            .iter()
            .chain(uniforms)
            .filter_map(|&name| gl.get_uniform_location(&program, name).map(|loc| (name, loc)))
            .collect();
        Ok(Self { program, uniforms })
    }

    fn loc(&self, name: &str) -> Option<&WebGlUniformLocation> {
        self.uniforms.get(name)
    }
}

fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, SceneError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| SceneError::Allocation("shader".to_owned()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(SceneError::Shader(format!("compile failed: {info}")))
    }
}

struct GpuGeometry {
    vao: WebGlVertexArrayObject,
    buffers: Vec<WebGlBuffer>,
    mode: u32,
    count: i32,
    indexed: bool,
}

enum GpuMaterial {
    Points,
    Basic,
    /// Shader materials compile their own program.
    Holographic(Program),
}

pub struct WebGlBackend {
    gl: GL,
    canvas: HtmlCanvasElement,
    points: Option<Program>,
    basic: Option<Program>,
    geometries: Vec<Option<GpuGeometry>>,
    materials: Vec<Option<GpuMaterial>>,
    viewport: Viewport,
}

impl WebGlBackend {
    /// Acquire a transparent, antialiased WebGL2 context on `canvas` and
    /// build the shared programs.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SceneError> {
        let options = js_sys::Object::new();
        for key in ["alpha", "antialias"] {
            js_sys::Reflect::set(&options, &JsValue::from_str(key), &JsValue::TRUE)
                .map_err(|e| SceneError::Host(js_err(e)))?;
        }
        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &options)
            .map_err(|e| SceneError::ContextUnavailable(js_err(e)))?
            .ok_or_else(|| SceneError::ContextUnavailable("WebGL2 not supported".to_owned()))?
            .dyn_into()
            .map_err(|_| SceneError::ContextUnavailable("context is not WebGL2".to_owned()))?;

        let points = Program::link(
            &gl,
            shader::POINTS_VERTEX,
            shader::POINTS_FRAGMENT,
            &["u_size", "u_half_height", "u_opacity"],
        )?;
        let basic = match Program::link(&gl, shader::BASIC_VERTEX, shader::BASIC_FRAGMENT, &["u_color", "u_opacity"]) {
            Ok(p) => p,
            Err(err) => {
                gl.delete_program(Some(&points.program));
                return Err(err);
            }
        };

        Ok(Self {
            gl,
            canvas,
            points: Some(points),
            basic: Some(basic),
            geometries: Vec::new(),
            materials: Vec::new(),
            viewport: Viewport::new(1, 1),
        })
    }

    fn upload_attribute(&self, location: u32, components: i32, bytes: &[u8]) -> Result<WebGlBuffer, SceneError> {
        let gl = &self.gl;
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| SceneError::Allocation("vertex buffer".to_owned()))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data_with_u8_array(GL::ARRAY_BUFFER, bytes, GL::STATIC_DRAW);
        gl.enable_vertex_attrib_array(location);
        gl.vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, false, 0, 0);
        Ok(buffer)
    }

    fn upload(&self, mesh: &MeshData, vao: &WebGlVertexArrayObject, buffers: &mut Vec<WebGlBuffer>) -> Result<(), SceneError> {
        let gl = &self.gl;
        gl.bind_vertex_array(Some(vao));
        buffers.push(self.upload_attribute(ATTR_POSITION, 3, bytemuck::cast_slice(&mesh.positions))?);
        if !mesh.normals.is_empty() {
            buffers.push(self.upload_attribute(ATTR_NORMAL, 3, bytemuck::cast_slice(&mesh.normals))?);
        }
        if !mesh.uvs.is_empty() {
            buffers.push(self.upload_attribute(ATTR_UV, 2, bytemuck::cast_slice(&mesh.uvs))?);
        }
        if !mesh.colors.is_empty() {
            buffers.push(self.upload_attribute(ATTR_COLOR, 3, bytemuck::cast_slice(&mesh.colors))?);
        }
        if !mesh.indices.is_empty() {
            let index_buffer = gl
                .create_buffer()
                .ok_or_else(|| SceneError::Allocation("index buffer".to_owned()))?;
            gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
            gl.buffer_data_with_u8_array(
                GL::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.indices),
                GL::STATIC_DRAW,
            );
            buffers.push(index_buffer);
        }
        gl.bind_vertex_array(None);
        gl.bind_buffer(GL::ARRAY_BUFFER, None);
        Ok(())
    }

    fn draw_item(&self, item: &DrawItem, projection: &Mat4, view: &Mat4) {
        let gl = &self.gl;
        let Some(Some(geometry)) = self.geometries.get(item.geometry.0 as usize) else {
            return;
        };
        let Some(Some(material)) = self.materials.get(item.material.0 as usize) else {
            return;
        };
        let program = match material {
            GpuMaterial::Points => self.points.as_ref(),
            GpuMaterial::Basic => self.basic.as_ref(),
            GpuMaterial::Holographic(program) => Some(program),
        };
        let Some(program) = program else {
            return;
        };

        gl.use_program(Some(&program.program));
        gl.uniform_matrix4fv_with_f32_array(program.loc("u_projection"), false, &projection.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(program.loc("u_view"), false, &view.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(program.loc("u_model"), false, &item.model.to_cols_array());

        match item.params {
            Material::Points { size, opacity } => {
                gl.uniform1f(program.loc("u_size"), size);
                gl.uniform1f(program.loc("u_half_height"), self.viewport.height as f32 * 0.5);
                gl.uniform1f(program.loc("u_opacity"), opacity);
            }
            Material::Basic { color, opacity } => {
                gl.uniform3f(program.loc("u_color"), color.x, color.y, color.z);
                gl.uniform1f(program.loc("u_opacity"), opacity);
            }
            Material::Holographic(u) => {
                gl.uniform_matrix3fv_with_f32_array(
                    program.loc("u_normal_matrix"),
                    false,
                    &item.normal_matrix(*view).to_cols_array(),
                );
                gl.uniform1f(program.loc("time"), u.time);
                gl.uniform3f(program.loc("color"), u.color.x, u.color.y, u.color.z);
                gl.uniform1f(program.loc("opacity"), u.opacity);
                gl.uniform2f(program.loc("resolution"), u.resolution.x, u.resolution.y);
            }
        }

        gl.bind_vertex_array(Some(&geometry.vao));
        if geometry.indexed {
            gl.draw_elements_with_i32(geometry.mode, geometry.count, GL::UNSIGNED_SHORT, 0);
        } else {
            gl.draw_arrays(geometry.mode, 0, geometry.count);
        }
    }
}

impl GraphicsBackend for WebGlBackend {
    fn create_geometry(&mut self, mesh: &MeshData) -> Result<GeometryHandle, SceneError> {
        let vao = self
            .gl
            .create_vertex_array()
            .ok_or_else(|| SceneError::Allocation("vertex array".to_owned()))?;
        let mut buffers = Vec::new();
        if let Err(err) = self.upload(mesh, &vao, &mut buffers) {
            for buffer in &buffers {
                self.gl.delete_buffer(Some(buffer));
            }
            self.gl.delete_vertex_array(Some(&vao));
            return Err(err);
        }

        let mode = match mesh.topology {
            Topology::Points => GL::POINTS,
            Topology::Triangles => GL::TRIANGLES,
            Topology::Lines => GL::LINES,
        };
        self.geometries.push(Some(GpuGeometry {
            vao,
            buffers,
            mode,
            count: mesh.element_count() as i32,
            indexed: !mesh.indices.is_empty(),
        }));
        Ok(GeometryHandle(self.geometries.len() as u32 - 1))
    }

    fn create_material(&mut self, material: &Material) -> Result<MaterialHandle, SceneError> {
        let gpu = match material {
            Material::Points { .. } => GpuMaterial::Points,
            Material::Basic { .. } => GpuMaterial::Basic,
            Material::Holographic(_) => GpuMaterial::Holographic(Program::link(
                &self.gl,
                shader::HOLO_VERTEX,
                shader::HOLO_FRAGMENT,
                &["u_normal_matrix", "time", "color", "opacity", "resolution"],
            )?),
        };
        self.materials.push(Some(gpu));
        Ok(MaterialHandle(self.materials.len() as u32 - 1))
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        let Some(geometry) = self.geometries.get_mut(handle.0 as usize).and_then(Option::take) else {
            return;
        };
        for buffer in &geometry.buffers {
            self.gl.delete_buffer(Some(buffer));
        }
        self.gl.delete_vertex_array(Some(&geometry.vao));
    }

    fn release_material(&mut self, handle: MaterialHandle) {
        if let Some(GpuMaterial::Holographic(program)) =
            self.materials.get_mut(handle.0 as usize).and_then(Option::take)
        {
            self.gl.delete_program(Some(&program.program));
        }
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.canvas.set_width(viewport.width);
        self.canvas.set_height(viewport.height);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.width));
        let _ = style.set_property("height", &format!("{}px", viewport.height));
    }

    fn render(&mut self, camera: &PerspectiveCamera, items: &[DrawItem]) -> Result<(), SceneError> {
        if self.points.is_none() {
            return Err(SceneError::Backend("renderer already released".to_owned()));
        }
        let gl = &self.gl;
        gl.viewport(0, 0, self.viewport.width as i32, self.viewport.height as i32);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        // Additive transparency, visible from both sides.
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE);
        gl.enable(GL::DEPTH_TEST);
        gl.depth_mask(false);
        gl.disable(GL::CULL_FACE);

        let projection = camera.projection();
        let view = camera.view();
        for item in items {
            self.draw_item(item, &projection, &view);
        }
        gl.bind_vertex_array(None);
        Ok(())
    }

    fn release_renderer(&mut self) {
        for program in [self.points.take(), self.basic.take()].into_iter().flatten() {
            self.gl.delete_program(Some(&program.program));
        }
        self.gl.use_program(None);
    }
}
