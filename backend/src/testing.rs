//! Scripted window and UI doubles for driving an [`App`](crate::app::App) without a display.
//!
//! Both doubles append to a shared [`Journal`], so a test can check the exact order in
//! which the frame loop talks to its collaborators.

use std::cell::RefCell;
use std::collections::{ BTreeMap, VecDeque };
use std::rc::Rc;
use std::time::Duration;

use crate::{
    data::prelude::*,
    ui::{ Panels, UiBackend, Widgets },
    window::{ Canvas, WindowBackend },
};

#[derive(Debug, Clone, PartialEq)]
pub enum MockEvent {
    Close,
    /// Toggles the checkbox with this label the next time it is declared.
    Click(String),
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetFrameRateLimit(u32),
    Clear,
    Draw(GraphType),
    Display,
    ProcessEvent(MockEvent),
    Update(Duration),
    BeginPanel(String),
    Checkbox(String, bool),
    EndPanel,
    Render,
    Shutdown,
    ScaleAllSizes(f32),
    SetFontGlobalScale(f32),
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn record(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn count(&self, filter: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|call| filter(call)).count()
    }
}

pub struct MockWindow {
    journal: Journal,
    title: String,
    size: (u32, u32),
    // 1-based frame number -> events delivered during that frame's drain
    script: BTreeMap<usize, VecDeque<MockEvent>>,
    batch: Option<VecDeque<MockEvent>>,
    frame: usize,
}

impl MockWindow {
    pub fn new(title: &str, width: u32, height: u32) -> Self {
        Self {
            journal: Journal::default(),
            title: title.to_string(),
            size: (width, height),
            script: BTreeMap::new(),
            batch: None,
            frame: 1,
        }
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Queues `event` for the drain of frame `frame`, counting from 1.
    pub fn script(&mut self, frame: usize, event: MockEvent) {
        self.script.entry(frame).or_default().push_back(event);
    }
}

impl Canvas for MockWindow {
    fn draw(&mut self, graph: &GraphType) {
        self.journal.record(Call::Draw(*graph));
    }
}

impl WindowBackend for MockWindow {
    type Event = MockEvent;

    fn create(title: &str, width: u32, height: u32) -> anyhow::Result<Self> {
        Ok(Self::new(title, width, height))
    }

    fn logical_size(&self) -> (u32, u32) {
        self.size
    }

    fn poll_event(&mut self) -> Option<MockEvent> {
        let frame = self.frame;
        let script = &mut self.script;
        self.batch
            .get_or_insert_with(|| script.remove(&frame).unwrap_or_default())
            .pop_front()
    }

    fn is_close_request(event: &MockEvent) -> bool {
        *event == MockEvent::Close
    }

    fn set_frame_rate_limit(&mut self, limit: u32) {
        self.journal.record(Call::SetFrameRateLimit(limit));
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.journal.record(Call::Clear);
        Ok(())
    }

    fn display(&mut self) {
        self.journal.record(Call::Display);
        self.batch = None;
        self.frame += 1;
    }
}

pub struct MockUi {
    journal: Journal,
    clicks: Vec<String>,
}

impl MockUi {
    pub fn new(journal: Journal) -> Self {
        Self { journal, clicks: Vec::new() }
    }

    /// Clicks the checkbox `label` the next time it is declared.
    pub fn click(&mut self, label: &str) {
        self.clicks.push(label.to_string());
    }
}

impl Widgets for MockUi {
    fn checkbox(&mut self, checked: &mut bool, label: &str) -> bool {
        let clicked = match self.clicks.iter().position(|click| click == label) {
            Some(index) => {
                self.clicks.remove(index);
                *checked = !*checked;
                true
            },
            None => false,
        };

        self.journal.record(Call::Checkbox(label.to_string(), *checked));
        clicked
    }
}

impl Panels for MockUi {
    fn panel(&mut self, title: &str, add_contents: &mut dyn FnMut(&mut dyn Widgets)) {
        self.journal.record(Call::BeginPanel(title.to_string()));
        add_contents(self);
        self.journal.record(Call::EndPanel);
    }
}

impl UiBackend<MockWindow> for MockUi {
    fn init(window: &MockWindow) -> anyhow::Result<Self> {
        Ok(Self::new(window.journal()))
    }

    fn process_event(&mut self, event: &MockEvent) {
        self.journal.record(Call::ProcessEvent(event.clone()));
        if let MockEvent::Click(label) = event {
            self.click(label);
        }
    }

    fn update(&mut self, _window: &MockWindow, elapsed: Duration) {
        self.journal.record(Call::Update(elapsed));
    }

    fn render(&mut self, _window: &mut MockWindow) -> anyhow::Result<()> {
        self.journal.record(Call::Render);
        Ok(())
    }

    fn shutdown(self) {
        self.journal.record(Call::Shutdown);
    }

    fn scale_all_sizes(&mut self, factor: f32) {
        self.journal.record(Call::ScaleAllSizes(factor));
    }

    fn set_font_global_scale(&mut self, scale: f32) {
        self.journal.record(Call::SetFontGlobalScale(scale));
    }
}
