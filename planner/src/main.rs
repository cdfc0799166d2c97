use std::process::ExitCode;

use backend::{
    app::App,
    ui::{ EguiBackend, UiBackend },
    window::{ WindowBackend, WinitWindow },
};

mod config;
mod plan_system;

use config::{ ConfigError, LaunchConfig };
use plan_system::PlanSystem;

const WINDOW_TITLE: &str = "The Plan";

fn main() -> ExitCode {
    backend::app::init();

    let config = match LaunchConfig::parse_from(std::env::args_os()) {
        Ok(config) => config,
        Err(ConfigError::Args(err)) => err.exit(),
        Err(err) => {
            log::error!("{}", err);
            for (name, value) in err.parameters() {
                log::info!("Parameter set: {}: {}", name, value);
            }
            return ExitCode::FAILURE;
        },
    };

    log::info!("Hello, {}!", "World");

    match open::<WinitWindow, EguiBackend>(&config).and_then(|app| app.run(PlanSystem::new())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:?}", err);
            ExitCode::FAILURE
        },
    }
}

/// Opens the window sized by `config` and scales the UI once, ready to `run`.
fn open<W, U>(config: &LaunchConfig) -> anyhow::Result<App<W, U>>
where
    W: WindowBackend,
    U: UiBackend<W>,
{
    for (name, value) in config.parameters() {
        log::debug!("Parameter set: {}: {}", name, value);
    }

    let mut app = App::open(WINDOW_TITLE, config.width, config.height)?;
    app.scale_ui(config.scale());

    log::info!("Opened {}x{} window, UI scale {}", config.width, config.height, config.scale_factor);

    Ok(app)
}

#[cfg(test)]
mod test_main {
    use super::*;
    use backend::testing::{ Call, MockEvent, MockUi, MockWindow };

    #[test]
    fn test_close_on_fifth_frame() {
        let config = LaunchConfig::parse_from(["planner", "--width", "800", "--height", "600", "--scale", "3"]).unwrap();
        let mut app = open::<MockWindow, MockUi>(&config).unwrap();
        assert_eq!(app.window().logical_size(), (800, 600));
        assert_eq!(app.window().title(), WINDOW_TITLE);

        app.window_mut().script(5, MockEvent::Close);
        let journal = app.window().journal();

        app.run(PlanSystem::new()).unwrap();

        let calls = journal.calls();
        let first_update = calls.iter().position(|call| matches!(call, Call::Update(_))).unwrap();
        assert_eq!(&calls[..first_update], &[
            Call::SetFrameRateLimit(60),
            Call::ScaleAllSizes(3.0),
            Call::SetFontGlobalScale(3.0),
        ]);
        assert_eq!(journal.count(|call| matches!(call, Call::ScaleAllSizes(_))), 1);
        assert_eq!(journal.count(|call| matches!(call, Call::SetFontGlobalScale(_))), 1);

        assert_eq!(journal.count(|call| *call == Call::Display), 5);
        assert_eq!(journal.count(|call| *call == Call::Render), 5);
        assert_eq!(journal.count(|call| matches!(call, Call::Draw(_))), 5);
        assert_eq!(journal.count(|call| matches!(call, Call::Checkbox(..))), 5 * plan_system::PLAN_STEPS.len());

        // The frame that saw the close request is still rendered in full before shutdown.
        assert_eq!(&calls[calls.len() - 3..], &[
            Call::Render,
            Call::Display,
            Call::Shutdown,
        ][..]);
    }

    #[test]
    fn test_checks_survive_frames() {
        let config = LaunchConfig::parse_from(["planner"]).unwrap();
        let mut app = open::<MockWindow, MockUi>(&config).unwrap();
        let label = plan_system::Checklist::label(4, plan_system::PLAN_STEPS[4]);
        app.window_mut().script(2, MockEvent::Click(label.clone()));
        let journal = app.window().journal();

        let mut system = PlanSystem::new();
        for _ in 0..4 {
            app.frame(&mut system).unwrap();
        }

        assert_eq!(system.checklist().checked().iter().filter(|checked| **checked).count(), 1);
        assert!(system.checklist().checked()[4]);
        assert_eq!(journal.count(|call| *call == Call::Checkbox(label.clone(), true)), 3);
    }
}
