use backend::{
    app::System,
    data::prelude::*,
    ui::{ Panels, Widgets },
    window::Canvas,
};

pub const PANEL_TITLE: &str = "The Plan";

pub const STEP_COUNT: usize = 12;

pub static PLAN_STEPS: [&str; STEP_COUNT] = [
    "The Plan",
    "Getting Started",
    "Finding Errors As Soon As Possible",
    "Handling Command Line Parameters",
    "Reading SFML Input States",
    "Managing Game State",
    "Making the Game Testable",
    "Making Game State Allocator Aware",
    "Add Logging to Game Engine",
    "Draw A Game Map",
    "Dialog Trees",
    "Porting from SFML to SDL",
];

const CIRCLE_RADIUS: f32 = 100.0;

/// Per-run check marks, one cell per entry of [`PLAN_STEPS`].
pub struct Checklist {
    checked: [bool; STEP_COUNT],
}

impl Checklist {
    pub fn new() -> Self {
        Self { checked: [false; STEP_COUNT] }
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn label(index: usize, step: &str) -> String {
        format!("{} : {}", index, step)
    }

    pub fn checked(&self) -> &[bool] {
        &self.checked
    }

    pub fn done(&self) -> usize {
        self.checked().iter().filter(|checked| **checked).count()
    }

    pub fn ui(&mut self, widgets: &mut dyn Widgets) {
        for (index, (step, checked)) in PLAN_STEPS.iter().zip(self.checked.iter_mut()).enumerate() {
            if widgets.checkbox(checked, &Self::label(index, step)) {
                log::debug!("Step {} ({}) checked: {}", index, step, checked);
            }
        }
    }
}

impl Default for Checklist {
    fn default() -> Self {
        Self::new()
    }
}

pub struct PlanSystem {
    checklist: Checklist,
    shape: GraphType,
}

impl PlanSystem {
    pub fn new() -> Self {
        Self {
            checklist: Checklist::new(),
            // Bounding box at the window origin.
            shape: GraphType::Circle {
                center: ScreenPoint::new(CIRCLE_RADIUS, CIRCLE_RADIUS),
                radius: CIRCLE_RADIUS,
                fill: Rgba8::GREEN,
            },
        }
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }
}

impl System for PlanSystem {
    fn declare(&mut self, ui: &mut dyn Panels) {
        let checklist = &mut self.checklist;
        ui.panel(PANEL_TITLE, &mut |widgets: &mut dyn Widgets| checklist.ui(widgets));
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        canvas.draw(&self.shape);
    }

    fn finish(&mut self) {
        let checklist = self.checklist();
        log::info!("{} of {} steps checked", checklist.done(), checklist.len());
    }
}

#[cfg(test)]
mod test_plan_system {
    use super::*;
    use backend::testing::{ Call, Journal, MockUi, MockWindow };

    #[test]
    fn test_labels() {
        let checklist = Checklist::new();

        assert_eq!(checklist.len(), PLAN_STEPS.len());
        assert_eq!(checklist.len(), 12);
        assert_eq!(Checklist::label(0, PLAN_STEPS[0]), "0 : The Plan");
        assert_eq!(Checklist::label(11, PLAN_STEPS[11]), "11 : Porting from SFML to SDL");
        assert!(checklist.checked().iter().all(|checked| !checked));
        assert_eq!(checklist.done(), 0);
    }

    #[test]
    fn test_declares_every_step_in_order() {
        let journal = Journal::default();
        let mut ui = MockUi::new(journal.clone());

        PlanSystem::new().declare(&mut ui);

        let mut expected = vec![Call::BeginPanel(PANEL_TITLE.to_string())];
        expected.extend((0..PLAN_STEPS.len()).map(|i| Call::Checkbox(Checklist::label(i, PLAN_STEPS[i]), false)));
        expected.push(Call::EndPanel);
        assert_eq!(journal.calls(), expected);
    }

    #[test]
    fn test_toggle_is_isolated() {
        let mut ui = MockUi::new(Journal::default());
        let mut system = PlanSystem::new();

        ui.click(&Checklist::label(3, PLAN_STEPS[3]));
        system.declare(&mut ui);

        let checklist = system.checklist();
        assert_eq!(checklist.len(), PLAN_STEPS.len());
        for (index, checked) in checklist.checked().iter().enumerate() {
            assert_eq!(*checked, index == 3);
        }

        ui.click(&Checklist::label(3, PLAN_STEPS[3]));
        ui.click(&Checklist::label(7, PLAN_STEPS[7]));
        system.declare(&mut ui);

        let checklist = system.checklist();
        for (index, checked) in checklist.checked().iter().enumerate() {
            assert_eq!(*checked, index == 7);
        }
        assert_eq!(checklist.done(), 1);
    }

    #[test]
    fn test_redeclare_without_input() {
        let mut ui = MockUi::new(Journal::default());
        let mut system = PlanSystem::new();

        ui.click(&Checklist::label(0, PLAN_STEPS[0]));
        ui.click(&Checklist::label(5, PLAN_STEPS[5]));
        system.declare(&mut ui);
        let before = system.checklist().checked().to_vec();

        system.declare(&mut ui);
        system.declare(&mut ui);
        assert_eq!(system.checklist().checked(), &before[..]);
    }

    #[test]
    fn test_draws_green_circle() {
        let mut window = MockWindow::new("test", 800, 600);
        let journal = window.journal();

        PlanSystem::new().draw(&mut window);

        assert_eq!(journal.calls(), vec![Call::Draw(GraphType::Circle {
            center: ScreenPoint::new(100.0, 100.0),
            radius: 100.0,
            fill: Rgba8::GREEN,
        })]);
    }
}
