use super::prelude::*;

pub trait ProjectPixelToViewport {
    /// Maps window pixels (origin top-left, y down) onto the [-1, 1] viewport.
    fn pixel_to_viewport(size: ScreenSize) -> Self;
}

impl ProjectPixelToViewport for ProjMatrix {
    fn pixel_to_viewport(size: ScreenSize) -> Self {
        let c0r0 = 2.0 / size.width.max(1.0);
        let c1r1 = -2.0 / size.height.max(1.0);

        Self::new(
            c0r0, 0.0, 0.0, 0.0,
            0.0, c1r1, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            -1.0, 1.0, 0.0, 1.0,
        )
    }
}
