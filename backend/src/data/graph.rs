use super::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphType {
    Circle { center: ScreenPoint, radius: f32, fill: Rgba8 },
}

impl GraphType {
    pub fn color(&self) -> Rgba8 {
        match *self {
            GraphType::Circle { fill, .. } => fill,
        }
    }
}

#[cfg(test)]
mod test_graph {
    use super::*;

    #[test]
    fn test_color() {
        let circle = GraphType::Circle { center: ScreenPoint::new(1.0, 2.0), radius: 3.0, fill: Rgba8::GREEN };
        assert_eq!(circle.color(), Rgba8::GREEN);
        assert_eq!(circle.color().to_normalized(), [0.0, 1.0, 0.0, 1.0]);
    }
}
