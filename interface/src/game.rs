use std::borrow::Cow;
use std::f32::consts::TAU;
use std::vec::Drain;

pub type Color = [f32;4];

/// Parse a hex string of 6 or 8 bytes into a color.
/// Format is rrggbbaa, where the aa is optional.
///
/// Meant for constants, so invalid strings panic.
#[track_caller]
pub fn hex(color: &str) -> Color {
    let channel = |range: std::ops::Range<usize>| -> f32 {
        let byte = u8::from_str_radix(&color[range], 16)
            .expect("color string must only contain hex digits");
        byte as f32 / 255.0
    };
    let alpha = match color.len() {
        8 => channel(6..8),
        6 => 1.0,
        _ => panic!("color string must be 6 or 8 characters")
    };
    [channel(0..2), channel(2..4), channel(4..6), alpha]
}

/// Horizontal or vertical alignment of text relative to its position.
/// For the vertical axis Left means top and Right means bottom.
#[derive(Debug, Clone,Copy, PartialEq,Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Everything is in fractions of the square play area,
/// so that [0.0, 0.0] is the top left corner and [1.0, 1.0] the bottom right.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// area is [x1, y1, x2, y2], width is half the thickness.
    Line {color: Color,  width: f32,  area: [f32;4]},
    /// area is [x, y, width, height]
    Rectangle {color: Color,  area: [f32;4]},
    Circle {color: Color,  center: [f32;2],  radius: f32},
    Text {
        color: Color,
        size: f32,
        position: [f32;2],
        align: [Align;2],
        text: Cow<'static, str>,
    },
}

/// Shapes to draw this frame, in drawing order.
#[derive(Debug, Default)]
pub struct Graphics {
    shapes: Vec<Shape>,
}

impl Graphics {
    pub fn line(&mut self,  color: Color,  width: f32,  area: [f32;4]) {
        self.shapes.push(Shape::Line { color, width, area });
    }
    pub fn rectangle(&mut self,  color: Color,  area: [f32;4]) {
        self.shapes.push(Shape::Rectangle { color, area });
    }
    pub fn circle(&mut self,  color: Color,  center: [f32;2],  radius: f32) {
        self.shapes.push(Shape::Circle { color, center, radius });
    }
    pub fn text(&mut self,
            color: Color,
            position: [f32;2],
            align: [Align;2],
            size: f32,
            text: impl Into<Cow<'static, str>>,
    ) {
        let text = text.into();
        self.shapes.push(Shape::Text { color, size, position, align, text });
    }

    /// Outline of a circle made of dashes roughly `dash` long
    /// with gaps of the same length between them.
    ///
    /// Each dash is drawn as a few straight chords.
    pub fn dashed_circle(&mut self,
            color: Color,
            center: [f32;2],
            radius: f32,
            width: f32,
            dash: f32,
    ) {
        const CHORDS_PER_DASH: u32 = 3;
        let circumference = TAU * radius;
        let dashes = ((circumference / (2.0*dash)).round() as u32).max(1);
        let period = TAU / dashes as f32;
        let step = period / 2.0 / CHORDS_PER_DASH as f32;
        let on_circle = |angle: f32| [
            center[0] + radius*angle.cos(),
            center[1] + radius*angle.sin(),
        ];
        for d in 0..dashes {
            let start = period * d as f32;
            for c in 0..CHORDS_PER_DASH {
                let [x1, y1] = on_circle(start + step*c as f32);
                let [x2, y2] = on_circle(start + step*(c+1) as f32);
                self.line(color, width, [x1, y1, x2, y2]);
            }
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Removes all shapes, keeping the allocation for the next frame.
    pub fn drain(&mut self) -> Drain<'_, Shape> {
        self.shapes.drain(..)
    }
}

#[derive(Debug, Clone,Copy, PartialEq,Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Positions are fractions of the play area, see `Shape`.
/// They can be outside [0, 1] when the cursor is in the letterbox border.
pub trait Game {
    fn render(&self,  gfx: &mut Graphics);
    /// `dt` is seconds since the previous call.
    fn update(&mut self,  dt: f32);
    fn mouse_move(&mut self,  pos: [f32; 2]);
    fn mouse_press(&mut self,  button: MouseButton);
    fn mouse_release(&mut self,  button: MouseButton);
}
