#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8(u32);

impl Rgba8 {
    pub const BLACK: Self = Self(0x000000ff);
    pub const WHITE: Self = Self(0xffffffff);
    pub const GREEN: Self = Self(0x00ff00ff);

    pub fn r(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn g(&self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn b(&self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn a(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn to_array(&self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }

    /// Channels in `0.0..=1.0`, the layout the fill shader expects.
    pub fn to_normalized(&self) -> [f32; 4] {
        self.to_array().map(|c| c as f32 / 255.0)
    }

    pub fn to_wgpu(&self) -> wgpu::Color {
        let [r, g, b, a] = self.to_normalized();
        wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: a as f64 }
    }
}
