//! GPU rendering of a [`MengerSponge`] and its checkerboard floor.
//!
//! [`SpongePass`] is the consumer side of the sponge's dirty flag. Once per
//! frame the app calls [`SpongePass::sync`], which re-uploads the flat
//! buffers only when the sponge reports a change, then [`SpongePass::render`]
//! draws whatever was last uploaded.
//!
//! # Vertex Layout
//!
//! Positions and normals come straight from
//! [`MengerSponge::positions_flat`] and [`MengerSponge::normals_flat`], each
//! in its own vertex buffer:
//!
//! | Buffer | Attribute | Format    | Shader Location |
//! |--------|-----------|-----------|-----------------|
//! | 0      | position  | Float32x4 | 0               |
//! | 1      | normal    | Float32x4 | 1               |
//!
//! # Pipeline Configuration
//!
//! - Back-face culling with counter-clockwise front faces
//! - 32-bit float depth buffer, Less-than comparison

use glam::Vec4;
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::sponge::MengerSponge;

/// Height of the floor plane below the sponge.
pub const FLOOR_HEIGHT: f32 = -2.0;
const FLOOR_EXTENT: f32 = 1000.0;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame scene uniforms shared by the sponge and floor shaders.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Point light position in world space (w = 1).
    pub light_position: [f32; 4],
}

const POSITION_ATTRIBUTE: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<[f32; 4]>() as u64,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x4,
    }],
};

const NORMAL_ATTRIBUTE: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<[f32; 4]>() as u64,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x4,
    }],
};

/// Sponge geometry as last uploaded to the GPU.
struct GpuSponge {
    positions: wgpu::Buffer,
    normals: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
    level: u32,
}

/// Renders the sponge and floor with depth testing.
pub struct SpongePass {
    sponge_pipeline: wgpu::RenderPipeline,
    floor_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    floor_vertices: wgpu::Buffer,
    floor_indices: wgpu::Buffer,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    geometry: Option<GpuSponge>,
    /// Point light position in world space.
    pub light_position: Vec4,
}

impl SpongePass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let sponge_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sponge Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sponge.wgsl").into()),
        });
        let floor_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Floor Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/floor.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let sponge_pipeline = Self::create_pipeline(
            gpu,
            &pipeline_layout,
            &sponge_shader,
            "Sponge Pipeline",
            &[POSITION_ATTRIBUTE, NORMAL_ATTRIBUTE],
            Some(wgpu::Face::Back),
        );
        // The floor is visible from both sides.
        let floor_pipeline = Self::create_pipeline(
            gpu,
            &pipeline_layout,
            &floor_shader,
            "Floor Pipeline",
            &[POSITION_ATTRIBUTE],
            None,
        );

        #[rustfmt::skip]
        let floor: [[f32; 4]; 4] = [
            [-FLOOR_EXTENT, FLOOR_HEIGHT, -FLOOR_EXTENT, 1.0],
            [ FLOOR_EXTENT, FLOOR_HEIGHT, -FLOOR_EXTENT, 1.0],
            [ FLOOR_EXTENT, FLOOR_HEIGHT,  FLOOR_EXTENT, 1.0],
            [-FLOOR_EXTENT, FLOOR_HEIGHT,  FLOOR_EXTENT, 1.0],
        ];
        let floor_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Floor Vertex Buffer"),
            contents: bytemuck::cast_slice(&floor),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let floor_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Floor Index Buffer"),
            contents: bytemuck::cast_slice(&[0u32, 2, 1, 2, 0, 3]),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            sponge_pipeline,
            floor_pipeline,
            uniform_buffer,
            uniform_bind_group,
            floor_vertices,
            floor_indices,
            depth_view: Self::create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
            geometry: None,
            light_position: Vec4::new(-10.0, 10.0, -10.0, 1.0),
        }
    }

    fn create_pipeline(
        gpu: &GpuContext,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        label: &str,
        buffers: &[wgpu::VertexBufferLayout],
        cull_mode: Option<wgpu::Face>,
    ) -> wgpu::RenderPipeline {
        gpu.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs"),
                    buffers,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode,
                    front_face: wgpu::FrontFace::Ccw,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Uploads the sponge buffers if they changed, then marks the sponge clean.
    ///
    /// Returns `true` when an upload happened.
    pub fn sync(&mut self, gpu: &GpuContext, sponge: &mut MengerSponge) -> bool {
        if !sponge.is_dirty() {
            return false;
        }

        let positions = sponge.positions_flat();
        let normals = sponge.normals_flat();
        let indices = sponge.indices_flat();

        log::debug!(
            "uploading sponge level {}: {} B positions, {} B normals, {} B indices",
            sponge.level(),
            std::mem::size_of_val(positions),
            std::mem::size_of_val(normals),
            std::mem::size_of_val(indices)
        );

        let buffer = |label: &str, contents: &[u8], usage: wgpu::BufferUsages| {
            gpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents,
                    usage,
                })
        };

        self.geometry = Some(GpuSponge {
            positions: buffer(
                "Sponge Position Buffer",
                bytemuck::cast_slice(positions),
                wgpu::BufferUsages::VERTEX,
            ),
            normals: buffer(
                "Sponge Normal Buffer",
                bytemuck::cast_slice(normals),
                wgpu::BufferUsages::VERTEX,
            ),
            indices: buffer(
                "Sponge Index Buffer",
                bytemuck::cast_slice(indices),
                wgpu::BufferUsages::INDEX,
            ),
            index_count: indices.len() as u32,
            level: sponge.level(),
        });

        sponge.set_clean();
        true
    }

    /// Level of the geometry currently on the GPU.
    pub fn uploaded_level(&self) -> Option<u32> {
        self.geometry.as_ref().map(|g| g.level)
    }

    /// Depth attachment for a render pass drawing through this pass.
    pub fn depth_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }
    }

    /// Draws the floor and the last uploaded sponge.
    ///
    /// `render_pass` must use [`depth_attachment`](Self::depth_attachment).
    pub fn render(
        &self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        camera: &Camera,
    ) {
        let view_proj = camera.projection_matrix(gpu.aspect()) * camera.view_matrix();
        let uniforms = SceneUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            light_position: self.light_position.to_array(),
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

        render_pass.set_pipeline(&self.floor_pipeline);
        render_pass.set_vertex_buffer(0, self.floor_vertices.slice(..));
        render_pass.set_index_buffer(self.floor_indices.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..6, 0, 0..1);

        if let Some(geometry) = &self.geometry {
            render_pass.set_pipeline(&self.sponge_pipeline);
            render_pass.set_vertex_buffer(0, geometry.positions.slice(..));
            render_pass.set_vertex_buffer(1, geometry.normals.slice(..));
            render_pass.set_index_buffer(geometry.indices.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..geometry.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniforms_are_uniform_aligned() {
        // Uniform buffers need 16-byte multiples.
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 80);
    }

    #[test]
    fn vertex_layouts_match_flat_buffers() {
        // One flat vertex is four floats.
        assert_eq!(POSITION_ATTRIBUTE.array_stride, 16);
        assert_eq!(NORMAL_ATTRIBUTE.array_stride, 16);
        assert_eq!(NORMAL_ATTRIBUTE.attributes[0].shader_location, 1);
    }
}
