use std::time::Duration;

use egui_wgpu::renderer::{
    RenderPass,
    ScreenDescriptor,
};

use crate::window::{ WindowBackend, WinitWindow };

pub trait Widgets {
    /// Shows `checked` and writes back a user toggle before returning.
    /// Returns whether the value changed during this call.
    fn checkbox(&mut self, checked: &mut bool, label: &str) -> bool;
}

impl Widgets for egui::Ui {
    fn checkbox(&mut self, checked: &mut bool, label: &str) -> bool {
        egui::Ui::checkbox(self, checked, label).changed()
    }
}

pub trait Panels {
    /// Opens the panel `title`, lets `add_contents` declare its widgets and closes it again.
    fn panel(&mut self, title: &str, add_contents: &mut dyn FnMut(&mut dyn Widgets));
}

/// Immediate-mode UI attached to a window of type `W`.
pub trait UiBackend<W: WindowBackend>: Panels {
    fn init(window: &W) -> anyhow::Result<Self>
    where
        Self: Sized;

    fn process_event(&mut self, event: &W::Event);

    /// Starts a UI frame `elapsed` after the previous one.
    fn update(&mut self, window: &W, elapsed: Duration);

    /// Paints everything declared since `update` over the window's current frame.
    fn render(&mut self, window: &mut W) -> anyhow::Result<()>;

    fn shutdown(self);

    fn scale_all_sizes(&mut self, factor: f32);

    fn set_font_global_scale(&mut self, scale: f32);
}

pub struct EguiBackend {
    state: egui_winit::State,
    ctx: egui::Context,
    rpass: RenderPass,
    time: f64,
}

impl Panels for EguiBackend {
    fn panel(&mut self, title: &str, add_contents: &mut dyn FnMut(&mut dyn Widgets)) {
        egui::Window::new(title).show(&self.ctx, |ui| add_contents(ui));
    }
}

impl UiBackend<WinitWindow> for EguiBackend {
    fn init(window: &WinitWindow) -> anyhow::Result<Self> {
        let state = window.state();

        Ok(Self {
            state: egui_winit::State::new(window.event_loop()),
            ctx: egui::Context::default(),
            rpass: RenderPass::new(
                &state.device,
                state.config.format,
                1
            ),
            time: 0.0,
        })
    }

    fn process_event(&mut self, event: &winit::event::WindowEvent<'static>) {
        self.state.on_event(&self.ctx, event);
    }

    fn update(&mut self, window: &WinitWindow, elapsed: Duration) {
        let mut raw_input = self.state.take_egui_input(&window.state().window);
        self.time += elapsed.as_secs_f64();
        raw_input.time = Some(self.time);
        raw_input.predicted_dt = elapsed.as_secs_f32();

        self.ctx.begin_frame(raw_input);
    }

    fn render(&mut self, window: &mut WinitWindow) -> anyhow::Result<()> {
        let full_output = self.ctx.end_frame();
        let state = window.state();
        self.state.handle_platform_output(&state.window, &self.ctx, full_output.platform_output);

        let paint_jobs = self.ctx.tessellate(full_output.shapes);
        let textures_delta = full_output.textures_delta;

        // Texture uploads must not be lost with a skipped frame, the font atlas arrives only once.
        for (id, ref image_delta) in textures_delta.set {
            self.rpass.update_texture(&state.device, &state.queue, id, image_delta);
        }

        if let Some(view) = window.frame_view() {
            let mut encoder = state.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

            let screen_descriptor = ScreenDescriptor {
                size_in_pixels: [state.config.width, state.config.height],
                pixels_per_point: self.state.pixels_per_point(),
            };
            self.rpass.update_buffers(&state.device, &state.queue, &paint_jobs, &screen_descriptor);

            self.rpass.execute(
                &mut encoder,
                view,
                &paint_jobs,
                &screen_descriptor,
                None,
            );
            state.queue.submit(std::iter::once(encoder.finish()));
        }

        for id in &textures_delta.free {
            self.rpass.free_texture(id);
        }

        Ok(())
    }

    fn shutdown(self) {
        log::debug!("UI backend shut down after {:.2}s", self.time);
    }

    fn scale_all_sizes(&mut self, factor: f32) {
        let mut style = (*self.ctx.style()).clone();
        scale_style(&mut style, factor);
        self.ctx.set_style(style);
    }

    fn set_font_global_scale(&mut self, scale: f32) {
        let mut style = (*self.ctx.style()).clone();
        scale_fonts(&mut style, scale);
        self.ctx.set_style(style);
    }
}

/// Multiplies the current spacing metrics and roundings by `factor`.
pub fn scale_style(style: &mut egui::Style, factor: f32) {
    let spacing = &mut style.spacing;
    spacing.item_spacing *= factor;
    spacing.button_padding *= factor;
    spacing.interact_size *= factor;
    spacing.indent *= factor;
    spacing.slider_width *= factor;
    spacing.text_edit_width *= factor;
    spacing.combo_width *= factor;
    spacing.tooltip_width *= factor;
    spacing.scroll_bar_width *= factor;
    spacing.icon_width *= factor;
    spacing.icon_width_inner *= factor;
    spacing.icon_spacing *= factor;
    spacing.window_margin.left *= factor;
    spacing.window_margin.right *= factor;
    spacing.window_margin.top *= factor;
    spacing.window_margin.bottom *= factor;

    let visuals = &mut style.visuals;
    visuals.window_rounding = scale_rounding(visuals.window_rounding, factor);
    [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ].into_iter().for_each(|widget| {
        widget.rounding = scale_rounding(widget.rounding, factor);
        widget.expansion *= factor;
    });
}

/// Sets every text style to its default size times `scale`, whatever it was before.
pub fn scale_fonts(style: &mut egui::Style, scale: f32) {
    let defaults = egui::Style::default().text_styles;

    style.text_styles.iter_mut().for_each(|(text_style, font_id)| {
        if let Some(default) = defaults.get(text_style) {
            font_id.size = default.size * scale;
        }
    });
}

fn scale_rounding(rounding: egui::Rounding, factor: f32) -> egui::Rounding {
    egui::Rounding {
        nw: rounding.nw * factor,
        ne: rounding.ne * factor,
        sw: rounding.sw * factor,
        se: rounding.se * factor,
    }
}
