//! Scene renderer: one shader pair, one constant buffer, one indexed draw
//! call per submitted object.

use anyhow::Result;

use super::camera::Camera;
use super::ctx::{RenderCtx, RenderTarget};
use super::draw::{DrawList, RasterMode};
use super::lighting::Lighting;
use super::mesh::Vertex;
use super::uniforms::ObjectUniforms;

/// Draws a [`DrawList`] in submission order.
///
/// Per-object constants live in a single uniform buffer with one aligned
/// slot per item, addressed via dynamic offsets. Every slot is written
/// before the pass is recorded, so the per-object uploads of a frame cannot
/// clobber each other.
pub struct SceneRenderer {
    pipeline_solid: wgpu::RenderPipeline,
    pipeline_wireframe: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    object_ubo: wgpu::Buffer,
    slot_stride: u32,
    slot_capacity: usize,
    lighting: Lighting,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        lighting: Lighting,
    ) -> Result<Self> {
        anyhow::ensure!(
            device.features().contains(wgpu::Features::POLYGON_MODE_LINE),
            "device lacks line rasterization (POLYGON_MODE_LINE), required for wireframe objects"
        );

        let shader_src = include_str!("shaders/scene.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery scene shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("orrery object bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: Some(ObjectUniforms::min_binding_size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orrery scene pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline_solid = create_pipeline(
            device,
            &shader,
            &pipeline_layout,
            surface_format,
            depth_format,
            RasterMode::Solid,
        );
        let pipeline_wireframe = create_pipeline(
            device,
            &shader,
            &pipeline_layout,
            surface_format,
            depth_format,
            RasterMode::Wireframe,
        );

        let slot_stride = align_to(
            std::mem::size_of::<ObjectUniforms>() as u32,
            device.limits().min_uniform_buffer_offset_alignment,
        );
        let slot_capacity = 8;
        let (object_ubo, bind_group) =
            create_object_ubo(device, &bind_group_layout, slot_stride, slot_capacity);

        Ok(Self {
            pipeline_solid,
            pipeline_wireframe,
            bind_group_layout,
            bind_group,
            object_ubo,
            slot_stride,
            slot_capacity,
            lighting,
        })
    }

    /// Draws every item in `list`, in list order, one indexed draw call each.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &Camera,
        list: &DrawList<'_>,
    ) {
        if list.is_empty() {
            return;
        }

        self.ensure_slot_capacity(ctx.device, list.len());

        // Upload every constant block before the pass records any draw; the
        // blocks land at distinct offsets of the shared buffer.
        for (i, item) in list.iter().enumerate() {
            let block = ObjectUniforms::new(item.world, camera, &self.lighting);
            let offset = i as u64 * self.slot_stride as u64;
            ctx.queue
                .write_buffer(&self.object_ubo, offset, bytemuck::bytes_of(&block));
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("orrery scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for (i, item) in list.iter().enumerate() {
            let pipeline = match item.raster {
                RasterMode::Solid => &self.pipeline_solid,
                RasterMode::Wireframe => &self.pipeline_wireframe,
            };

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[i as u32 * self.slot_stride]);
            rpass.set_vertex_buffer(0, item.mesh.vertex_buffer.slice(..));
            rpass.set_index_buffer(item.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..item.mesh.index_count, 0, 0..1);
        }
    }

    fn ensure_slot_capacity(&mut self, device: &wgpu::Device, required: usize) {
        if required <= self.slot_capacity {
            return;
        }

        let new_cap = required.next_power_of_two().max(8);
        let (object_ubo, bind_group) =
            create_object_ubo(device, &self.bind_group_layout, self.slot_stride, new_cap);

        self.object_ubo = object_ubo;
        self.bind_group = bind_group;
        self.slot_capacity = new_cap;
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    raster: RasterMode,
) -> wgpu::RenderPipeline {
    let (label, polygon_mode, cull_mode) = match raster {
        RasterMode::Solid => ("orrery scene solid pipeline", wgpu::PolygonMode::Fill, Some(wgpu::Face::Back)),
        RasterMode::Wireframe => ("orrery scene wireframe pipeline", wgpu::PolygonMode::Line, None),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            // Mesh data is left-handed with clockwise front faces.
            front_face: wgpu::FrontFace::Cw,
            cull_mode,
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}

fn create_object_ubo(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    slot_stride: u32,
    slots: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("orrery object ubo"),
        size: slot_stride as u64 * slots as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("orrery object bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: Some(ObjectUniforms::min_binding_size()),
            }),
        }],
    });

    (buffer, bind_group)
}

/// Rounds `size` up to `alignment` (a power of two per WebGPU limits).
fn align_to(size: u32, alignment: u32) -> u32 {
    size.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_stride_rounds_up_to_alignment() {
        assert_eq!(align_to(320, 256), 512);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(1, 64), 64);
    }

    #[test]
    fn block_fits_one_default_aligned_slot_pair() {
        // The 320-byte block needs two 256-byte alignment units.
        let stride = align_to(std::mem::size_of::<ObjectUniforms>() as u32, 256);
        assert_eq!(stride, 512);
        assert!(stride as usize >= std::mem::size_of::<ObjectUniforms>());
    }
}
