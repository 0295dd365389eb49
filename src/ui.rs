use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world units, anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const SKY_BLUE: Color = Color::rgba(0.529, 0.808, 0.922, 1.0);
    pub const PIPE_GREEN: Color = Color::rgba(0.325, 0.627, 0.204, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Which point of a text block sits at its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    TopCenter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    pub content: String,
    /// World position, y-up.
    pub position: [f32; 2],
    pub color: Color,
    pub size: f32,
    pub anchor: Anchor,
}

/// One item of a frame's draw list. Drawn in list order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect { rect: Rect, color: Color },
    Sprite { texture: String, rect: Rect },
    Text(TextCommand),
}

impl DrawCommand {
    pub fn rect(rect: Rect, color: Color) -> Self {
        DrawCommand::Rect { rect, color }
    }

    pub fn sprite(texture: impl Into<String>, rect: Rect) -> Self {
        DrawCommand::Sprite {
            texture: texture.into(),
            rect,
        }
    }

    pub fn text(
        content: impl Into<String>,
        position: [f32; 2],
        color: Color,
        size: f32,
        anchor: Anchor,
    ) -> Self {
        DrawCommand::Text(TextCommand {
            content: content.into(),
            position,
            color,
            size,
            anchor,
        })
    }
}
