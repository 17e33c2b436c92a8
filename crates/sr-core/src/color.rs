//! 8-bit RGBA color.

use serde::{Deserialize, Serialize};

/// Color with 8-bit channels, as consumed by backend state binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque black, used to disable ambient contribution.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Creates a color from all four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Returns the same color with alpha forced to 255.
    pub const fn opaque(self) -> Self {
        Self::rgb(self.r, self.g, self.b)
    }

    /// Returns the color as normalized floats.
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_forces_alpha() {
        let c = Color::rgba(10, 20, 30, 0).opaque();
        assert_eq!(c, Color::rgba(10, 20, 30, 255));
    }

    #[test]
    fn test_to_f32_array() {
        assert_eq!(Color::WHITE.to_f32_array(), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(Color::BLACK.to_f32_array(), [0.0, 0.0, 0.0, 1.0]);
    }
}
