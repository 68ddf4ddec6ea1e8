use serde::{Deserialize, Serialize};

/// RGB color for shape fills and strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_f32_array(&self, opacity: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            opacity,
        ]
    }
}

/// Interaction state of a shape, driving its fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillState {
    Idle,
    Hovered,
    Clicked,
}

/// Fill colors keyed by interaction state, plus the outline style shared
/// by all states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillPalette {
    pub idle: Color,
    pub hover: Color,
    pub click: Color,
    pub stroke: Color,
    pub stroke_width: f64,
}

impl FillPalette {
    pub fn color_for(&self, state: FillState) -> Color {
        match state {
            FillState::Idle => self.idle,
            FillState::Hovered => self.hover,
            FillState::Clicked => self.click,
        }
    }
}

impl Default for FillPalette {
    fn default() -> Self {
        Self {
            idle: Color::rgb(0xd3, 0xd3, 0xd3),
            hover: Color::rgb(0x37, 0x50, 0xb7),
            click: Color::rgb(0xaa, 0x07, 0x07),
            stroke: Color::rgb(0x22, 0x22, 0x22),
            stroke_width: 0.02,
        }
    }
}
