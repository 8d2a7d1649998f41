//! The color fed to the `u_Color` uniform.

/// Bounces the red channel of a fixed color between 0 and 1.
///
/// The direction flips once the value has left `[0, 1]`, so the value overshoots the range
/// by at most one increment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorPulse {
    red: f32,
    increment: f32,
}

impl ColorPulse {
    /// Green, blue and alpha of the color.
    pub const GBA: [f32; 3] = [0.4, 0.6, 1.0];

    /// Starts at red 0, going up by 0.01 per frame.
    #[inline]
    pub fn new() -> ColorPulse {
        ColorPulse::with_increment(0.01)
    }

    /// Starts at red 0, going up by `increment` per frame.
    #[inline]
    pub fn with_increment(increment: f32) -> ColorPulse {
        ColorPulse { red: 0.0, increment }
    }

    /// Returns the current color.
    #[inline]
    pub fn color(&self) -> [f32; 4] {
        let [g, b, a] = ColorPulse::GBA;
        [self.red, g, b, a]
    }

    /// Returns the current color, then advances by one frame.
    pub fn step(&mut self) -> [f32; 4] {
        let color = self.color();

        if self.red > 1.0 || self.red < 0.0 {
            self.increment = -self.increment;
        }
        self.red += self.increment;

        color
    }
}

impl Default for ColorPulse {
    #[inline]
    fn default() -> ColorPulse {
        ColorPulse::new()
    }
}
