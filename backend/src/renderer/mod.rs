use crate::{
    data::prelude::*,
    window::State,
};

use wgpu::util::DeviceExt;

pub trait Renderer {
    fn update_view(&self, size: ScreenSize, state: &State) {
        self.update_view_matrix(&ProjMatrix::pixel_to_viewport(size), state)
    }

    fn update_view_matrix(&self, view_mat: &ProjMatrix, state: &State);

    /// Draws on top of whatever `view` already holds.
    fn draw(&mut self, state: &State, view: &wgpu::TextureView, graph: &GraphType);
}

use lyon::tessellation::{
    VertexBuffers,
    FillTessellator,
    FillOptions,
    FillVertex,
    BuffersBuilder,
    TessellationError,
};

type DefaultVertexBuffers = VertexBuffers<[f32; 2], u16>;

pub struct DefaultRenderer {
    render_pipeline: wgpu::RenderPipeline,

    proj_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    fill_tessellator: FillTessellator,
}

impl Renderer for DefaultRenderer {
    fn update_view_matrix(&self, view_mat: &ProjMatrix, state: &State) {
        state.queue.write_buffer(
            &self.proj_buffer,
            0,
            bytemuck::cast_slice(&[view_mat.to_array()]),
        );
    }

    fn draw(&mut self, state: &State, view: &wgpu::TextureView, graph: &GraphType) {
        let output = match self.tessellate(graph) {
            Ok(output) => output,
            Err(e) => {
                log::error!("Failed tessellation graph {:?}: {:?}", graph, e);
                return;
            },
        };
        if output.indices.is_empty() {
            return;
        }

        let vertex_buffer = state.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&output.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }
        );
        let index_buffer = state.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&output.indices),
                usage: wgpu::BufferUsages::INDEX,
            }
        );
        state.queue.write_buffer(&self.color_buffer, 0, bytemuck::cast_slice(&graph.color().to_normalized()));

        let mut encoder = state.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Graph Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Graph Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..output.indices.len() as u32, 0, 0..1);
        }

        state.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl DefaultRenderer {
    fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        static ATTRIBS: [wgpu::VertexAttribute; 1]  = wgpu::vertex_attr_array![0 => Float32x2];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBS,
        }
    }

    fn tessellate(&mut self, graph: &GraphType) -> Result<DefaultVertexBuffers, TessellationError> {
        let mut output = DefaultVertexBuffers::new();

        match *graph {
            GraphType::Circle { center, radius, .. } => {
                let mut builder = BuffersBuilder::new(
                    &mut output, |vertex: FillVertex| vertex.position().to_array()
                );
                self.fill_tessellator.tessellate_circle(
                    center.cast_unit(),
                    radius,
                    &FillOptions::default(),
                    &mut builder
                )?;
            },
        }

        Ok(output)
    }

    pub fn new(state: &State) -> Self {
        let proj_buffer = state.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Projection buffer"),
            size: std::mem::size_of::<[f32; 16]>() as u64,
            mapped_at_creation: false,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let color_buffer = state.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Color buffer"),
            size: std::mem::size_of::<[f32; 4]>() as u64,
            mapped_at_creation: false,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = state.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }
            ],
            label: Some("bind_group_layout"),
        });
        let bind_group = state.device.create_bind_group(&wgpu::BindGroupDescriptor{
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: color_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: proj_buffer.as_entire_binding(),
                },
            ],
            label: Some("bind_group"),
        });

        let render_pipeline_layout = state.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[
                &bind_group_layout,
            ],
            push_constant_ranges: &[],
        });
        let shader = state.device.create_shader_module(wgpu::include_wgsl!("shader.wgsl"));
        let render_pipeline = state.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[DefaultRenderer::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: state.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })]
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        Self {
            render_pipeline,

            color_buffer,
            proj_buffer,
            bind_group,

            fill_tessellator: FillTessellator::new(),
        }
    }
}
