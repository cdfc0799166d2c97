pub mod app;
pub mod clock;
pub mod data;
pub mod renderer;
pub mod ui;
pub mod window;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
