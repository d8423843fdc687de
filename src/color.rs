//! Colors and Color Space Conversion
//!
//! Turtle colors are the Tk named colors (`black`, `gray`) as 8-bit sRGB.
//!
//! Color workflow:
//! - `Color` values are 8-bit sRGB, exactly as the turtle program names them
//! - The CPU canvas stores linear RGBA so fills and lines composite correctly
//! - The window surface uses an sRGB format, wgpu handles the linear → sRGB conversion

/// RGBA color with 8-bit sRGB components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create an opaque color (alpha = 255).
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Tk's `gray` is the X11 gray, not the CSS one.
    pub const GRAY: Color = Color::rgb(190, 190, 190);

    /// Convert to linear RGBA (0.0-1.0) for the canvas.
    pub fn to_linear_rgba(self) -> [f32; 4] {
        srgb_u8_to_linear_f32(self.r, self.g, self.b, self.a as f32 / 255.0)
    }
}

/// Convert a single sRGB color component to linear space
///
/// sRGB uses a gamma curve with a linear segment near black for efficiency.
/// Formula from: https://en.wikipedia.org/wiki/SRGB#From_sRGB_to_CIE_XYZ
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert sRGB color (0.0-1.0) to linear RGB
///
/// # Arguments
/// * `srgb` - Color in sRGB space [r, g, b, a] where RGB are gamma-encoded and alpha is linear
///
/// # Returns
/// Color in linear space [r, g, b, a] where all components are linear
#[inline]
pub fn srgb_to_linear_rgba(srgb: [f32; 4]) -> [f32; 4] {
    [
        srgb_to_linear(srgb[0]),
        srgb_to_linear(srgb[1]),
        srgb_to_linear(srgb[2]),
        srgb[3], // Alpha is already linear
    ]
}

/// Convert RGB color from 0-255 sRGB to linear 0.0-1.0
#[inline]
pub fn srgb_u8_to_linear_f32(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
    srgb_to_linear_rgba([
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_to_linear() {
        // Test black
        assert_eq!(srgb_to_linear(0.0), 0.0);

        // Test white
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 0.001);

        // Test middle gray (sRGB 0.5 ≈ linear 0.214)
        let linear = srgb_to_linear(0.5);
        assert!((linear - 0.214).abs() < 0.01);
    }

    #[test]
    fn test_tk_gray_to_linear() {
        // Tk gray: #BEBEBE (190, 190, 190)
        let linear = Color::GRAY.to_linear_rgba();

        assert!(linear[0] > 0.5 && linear[0] < 0.52);
        assert_eq!(linear[0], linear[1]);
        assert_eq!(linear[1], linear[2]);
        assert_eq!(linear[3], 1.0);
    }
}
