use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Context;
use winit::{
    dpi::{ LogicalSize, PhysicalSize },
    event::*,
    event_loop::{ ControlFlow, EventLoop },
    platform::run_return::EventLoopExtRunReturn,
    window::{ Window, WindowBuilder },
};

use crate::{
    clock::Clock,
    data::prelude::*,
    renderer::{ DefaultRenderer, Renderer },
};

pub trait Canvas {
    fn draw(&mut self, graph: &GraphType);
}

/// The window side of a frame: input events in, pixels out.
pub trait WindowBackend: Canvas {
    type Event;

    fn create(title: &str, width: u32, height: u32) -> anyhow::Result<Self>
    where
        Self: Sized;

    fn logical_size(&self) -> (u32, u32);

    /// Next pending event, never blocks. `None` once this frame's batch is drained.
    fn poll_event(&mut self) -> Option<Self::Event>;

    fn is_close_request(event: &Self::Event) -> bool;

    /// `0` disables pacing.
    fn set_frame_rate_limit(&mut self, limit: u32);

    fn clear(&mut self) -> anyhow::Result<()>;

    /// Presents the frame and waits out the rest of the frame budget.
    fn display(&mut self);
}

pub struct State {
    pub window: Window,
    pub surface: wgpu::Surface,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    configured: bool,
}

impl State {
    pub fn new(window: Window) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::Backends::all());
        let surface = unsafe { instance.create_surface(&window) };
        let adapter = pollster::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            }
        )).context("Couldn't create the adapter!")?;
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
                label: None,
            },
            None,
        )).context("Couldn't create the device!")?;

        let format = *surface.get_supported_formats(&adapter)
            .first()
            .context("The surface is incompatible with the adapter!")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
        };

        let mut state = Self {
            window,
            surface,
            device,
            queue,
            config,
            configured: false,
        };
        state.on_resize(size);

        Ok(state)
    }

    pub fn on_resize(&mut self, new_size: PhysicalSize<u32>) {
        if has_area(new_size) {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.configured = true;
        }
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn logical_size(&self) -> ScreenSize {
        let size = self.size().to_logical::<f32>(self.window.scale_factor());
        ScreenSize::new(size.width, size.height)
    }

    /// Acquires the next surface texture and clears it. `Ok(None)` skips the frame.
    pub fn clean_screen(&mut self, color: Rgba8) -> anyhow::Result<Option<Frame>> {
        if !self.configured {
            return Ok(None);
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.on_resize(self.size());
                return Ok(None);
            },
            Err(wgpu::SurfaceError::OutOfMemory) => anyhow::bail!("The surface ran out of memory!"),
            Err(e) => {
                log::warn!("Skipped a frame: {:?}", e);
                return Ok(None);
            },
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Clear Encoder"),
        });

        {
            let _render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color.to_wgpu()),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        Ok(Some(Frame { output, view }))
    }
}

pub struct Frame {
    pub output: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

pub struct WinitWindow {
    state: State,
    event_loop: EventLoop<()>,
    renderer: DefaultRenderer,
    pending: VecDeque<WindowEvent<'static>>,
    pumped: bool,
    frame: Option<Frame>,
    frame_budget: Option<Duration>,
    pace_clock: Clock,
}

impl WinitWindow {
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn event_loop(&self) -> &EventLoop<()> {
        &self.event_loop
    }

    /// Target of the frame between `clear` and `display`, if one was acquired.
    pub fn frame_view(&self) -> Option<&wgpu::TextureView> {
        self.frame.as_ref().map(|frame| &frame.view)
    }

    // Runs the event loop until it has no more events queued, without waiting for new ones.
    fn pump_events(&mut self) {
        let Self { state, event_loop, renderer, pending, .. } = self;
        let window_id = state.window.id();

        event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            match event {
                Event::WindowEvent { window_id: id, event } if id == window_id => {
                    match &event {
                        WindowEvent::Resized(physical_size) => {
                            state.on_resize(*physical_size);
                            renderer.update_view(state.logical_size(), state);
                        },
                        WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                            state.on_resize(**new_inner_size);
                            renderer.update_view(state.logical_size(), state);
                        },
                        _ => {}
                    }

                    if let Some(event) = event.to_static() {
                        pending.push_back(event);
                    }
                },
                Event::MainEventsCleared => *control_flow = ControlFlow::Exit,
                _ => {}
            }
        });
    }
}

impl Canvas for WinitWindow {
    fn draw(&mut self, graph: &GraphType) {
        if let Some(frame) = &self.frame {
            self.renderer.draw(&self.state, &frame.view, graph);
        }
    }
}

impl WindowBackend for WinitWindow {
    type Event = WindowEvent<'static>;

    fn create(title: &str, width: u32, height: u32) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(LogicalSize::new(width, height))
            .build(&event_loop)
            .context("Couldn't create the window!")?;

        let state = State::new(window)?;
        let renderer = DefaultRenderer::new(&state);
        renderer.update_view(state.logical_size(), &state);

        log::debug!("Window created: {:?} ({:?})", state.size(), state.config.format);

        Ok(Self {
            state,
            event_loop,
            renderer,
            pending: VecDeque::new(),
            pumped: false,
            frame: None,
            frame_budget: None,
            pace_clock: Clock::start(),
        })
    }

    fn logical_size(&self) -> (u32, u32) {
        let size = self.state.window.inner_size().to_logical::<f64>(self.state.window.scale_factor());
        (size.width.round() as u32, size.height.round() as u32)
    }

    fn poll_event(&mut self) -> Option<Self::Event> {
        if self.pending.is_empty() && !self.pumped {
            self.pumped = true;
            self.pump_events();
        }

        self.pending.pop_front()
    }

    fn is_close_request(event: &Self::Event) -> bool {
        matches!(event, WindowEvent::CloseRequested)
    }

    fn set_frame_rate_limit(&mut self, limit: u32) {
        self.frame_budget = match limit {
            0 => None,
            limit => Some(Duration::from_secs(1) / limit),
        };
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.frame = self.state.clean_screen(Rgba8::BLACK)?;
        Ok(())
    }

    fn display(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.output.present();
        }
        self.pumped = false;

        if let Some(budget) = self.frame_budget {
            let spent = self.pace_clock.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            }
        }
        self.pace_clock.restart();
    }
}

/// Whether the surface can be configured at `size`. Zero on either side is not.
fn has_area(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}
