use std::time::Duration;

use crate::{
    clock::Clock,
    ui::{ Panels, UiBackend },
    window::{ Canvas, WindowBackend },
};

pub const FRAME_RATE_LIMIT: u32 = 60;

pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[allow(unused)]
pub trait System {
    /// Declares the whole UI. Called unconditionally once per frame.
    fn declare(&mut self, ui: &mut dyn Panels) {}
    /// Draws the scene under the UI.
    fn draw(&mut self, canvas: &mut dyn Canvas) {}
    fn finish(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

#[derive(Debug, Default)]
pub struct FrameContext {
    pub elapsed: Duration,
    pub close_requested: bool,
}

pub struct App<W, U> {
    window: W,
    ui: U,
    clock: Clock,
    frames: u64,
}

impl<W, U> App<W, U>
where
    W: WindowBackend,
    U: UiBackend<W>,
{
    pub fn new(mut window: W, ui: U) -> Self {
        window.set_frame_rate_limit(FRAME_RATE_LIMIT);

        Self {
            window,
            ui,
            clock: Clock::start(),
            frames: 0,
        }
    }

    /// Creates the window and attaches the UI backend to it.
    pub fn open(title: &str, width: u32, height: u32) -> anyhow::Result<Self> {
        let window = W::create(title, width, height)?;
        let ui = U::init(&window)?;
        Ok(Self::new(window, ui))
    }

    /// Scales the UI style and fonts. Meant to be called once, before `run`.
    pub fn scale_ui(&mut self, factor: f32) {
        self.ui.scale_all_sizes(factor);
        self.ui.set_font_global_scale(factor);
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs a single iteration of the frame loop.
    pub fn frame<S: System>(&mut self, system: &mut S) -> anyhow::Result<LoopState> {
        let mut frame = FrameContext::default();

        // A close request does not cut the batch short, the UI still sees every event.
        while let Some(event) = self.window.poll_event() {
            self.ui.process_event(&event);
            if W::is_close_request(&event) {
                if !frame.close_requested {
                    log::debug!("Close requested in frame {}", self.frames + 1);
                }
                frame.close_requested = true;
            }
        }

        frame.elapsed = self.clock.restart();
        self.ui.update(&self.window, frame.elapsed);

        system.declare(&mut self.ui);

        self.window.clear()?;
        system.draw(&mut self.window);
        self.ui.render(&mut self.window)?;
        self.window.display();
        self.frames += 1;

        Ok(match frame.close_requested {
            true => LoopState::Terminated,
            false => LoopState::Running,
        })
    }

    /// Runs frames until the window asks to close, then shuts the UI backend down.
    pub fn run<S: System>(mut self, mut system: S) -> anyhow::Result<()> {
        self.clock.restart();

        while self.frame(&mut system)? == LoopState::Running {}

        log::info!("Frame loop terminated after {} frames", self.frames);
        system.finish();
        self.ui.shutdown();

        Ok(())
    }
}

#[cfg(test)]
mod test_app {
    use super::*;
    use crate::{
        data::prelude::*,
        testing::{ Call, MockEvent, MockUi, MockWindow },
        ui::Widgets,
    };

    const SHAPE: GraphType = GraphType::Circle {
        center: ScreenPoint::new(100.0, 100.0),
        radius: 100.0,
        fill: Rgba8::GREEN,
    };

    #[derive(Default)]
    struct Toggle {
        on: bool,
    }

    impl System for Toggle {
        fn declare(&mut self, ui: &mut dyn Panels) {
            let on = &mut self.on;
            ui.panel("Toggle", &mut |widgets: &mut dyn Widgets| {
                widgets.checkbox(on, "on");
            });
        }

        fn draw(&mut self, canvas: &mut dyn Canvas) {
            canvas.draw(&SHAPE);
        }
    }

    fn open(width: u32, height: u32) -> App<MockWindow, MockUi> {
        App::open("test", width, height).unwrap()
    }

    #[test]
    fn test_frame_order() {
        let mut app = open(320, 240);
        app.window_mut().script(1, MockEvent::Other);
        let journal = app.window().journal();

        assert_eq!(app.frame(&mut Toggle::default()).unwrap(), LoopState::Running);

        let calls: Vec<_> = journal.calls().into_iter()
            .filter(|call| !matches!(call, Call::Update(_)))
            .collect();
        assert_eq!(calls, vec![
            Call::SetFrameRateLimit(FRAME_RATE_LIMIT),
            Call::ProcessEvent(MockEvent::Other),
            Call::BeginPanel("Toggle".to_string()),
            Call::Checkbox("on".to_string(), false),
            Call::EndPanel,
            Call::Clear,
            Call::Draw(SHAPE),
            Call::Render,
            Call::Display,
        ]);
        assert_eq!(journal.count(|call| matches!(call, Call::Update(_))), 1);
    }

    #[test]
    fn test_close_terminates_after_render() {
        let mut app = open(320, 240);
        app.window_mut().script(3, MockEvent::Close);
        let journal = app.window().journal();

        app.run(Toggle::default()).unwrap();

        assert_eq!(journal.count(|call| *call == Call::Display), 3);
        assert_eq!(journal.count(|call| *call == Call::Render), 3);
        assert_eq!(journal.count(|call| *call == Call::Shutdown), 1);
        assert_eq!(journal.calls().last(), Some(&Call::Shutdown));
    }

    #[test]
    fn test_close_does_not_abort_draining() {
        let mut app = open(320, 240);
        app.window_mut().script(1, MockEvent::Close);
        app.window_mut().script(1, MockEvent::Other);
        let journal = app.window().journal();

        assert_eq!(app.frame(&mut Toggle::default()).unwrap(), LoopState::Terminated);
        assert_eq!(journal.count(|call| matches!(call, Call::ProcessEvent(_))), 2);
        assert_eq!(journal.count(|call| *call == Call::Display), 1);
    }

    #[test]
    fn test_redeclare_every_frame() {
        let mut app = open(320, 240);
        app.window_mut().script(4, MockEvent::Close);
        let journal = app.window().journal();

        app.run(Toggle::default()).unwrap();

        assert_eq!(journal.count(|call| matches!(call, Call::BeginPanel(_))), 4);
        assert_eq!(journal.count(|call| matches!(call, Call::Checkbox(..))), 4);
        assert_eq!(journal.count(|call| *call == Call::EndPanel), 4);
    }

    #[test]
    fn test_click_reaches_widget() {
        let mut app = open(320, 240);
        app.window_mut().script(2, MockEvent::Click("on".to_string()));
        let mut system = Toggle::default();

        app.frame(&mut system).unwrap();
        assert!(!system.on);
        app.frame(&mut system).unwrap();
        assert!(system.on);
        app.frame(&mut system).unwrap();
        assert!(system.on);
        assert_eq!(app.frames(), 3);
    }

    #[test]
    fn test_scale_ui() {
        let mut app = open(320, 240);
        let journal = app.window().journal();
        app.scale_ui(3.0);

        assert_eq!(journal.calls(), vec![
            Call::SetFrameRateLimit(FRAME_RATE_LIMIT),
            Call::ScaleAllSizes(3.0),
            Call::SetFontGlobalScale(3.0),
        ]);
    }

    #[test]
    fn test_elapsed_is_per_frame() {
        let mut app = open(320, 240);
        let journal = app.window().journal();
        let mut system = Toggle::default();

        app.frame(&mut system).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        app.frame(&mut system).unwrap();
        app.frame(&mut system).unwrap();

        let elapsed: Vec<_> = journal.calls().into_iter()
            .filter_map(|call| match call {
                Call::Update(elapsed) => Some(elapsed),
                _ => None,
            })
            .collect();
        assert_eq!(elapsed.len(), 3);
        assert!(elapsed[1] >= Duration::from_millis(20));
        assert!(elapsed[2] < elapsed[1]);
    }
}
