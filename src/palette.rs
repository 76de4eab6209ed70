//! Background colors that carry structure.
//!
//! Ordinary rows are painted white or in the blue accents of the sheet theme.
//! Anything else that fills a whole row (the muted magenta of chapter rows in
//! the source sheets) marks a section divider.

use crate::cell::Rgb;

pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

/// Colors used by ordinary session rows.
pub const ORDINARY: &[Rgb] = &[
    WHITE,
    // light cornflower blue 3 (#c9daf8)
    Rgb::new(0.788, 0.855, 0.973),
    // light blue 3 (#cfe2f3)
    Rgb::new(0.812, 0.886, 0.953),
    // light cornflower blue 2 (#a4c2f4)
    Rgb::new(0.643, 0.761, 0.957),
    // light blue 2 (#9fc5e8)
    Rgb::new(0.624, 0.773, 0.910),
    // light gray 3 (#f3f3f3)
    Rgb::new(0.953, 0.953, 0.953),
];

/// Max per-channel drift still considered the same color.
pub const DEFAULT_TOLERANCE: f32 = 0.04;

#[derive(Debug, Clone)]
pub struct Palette {
    ordinary: Vec<Rgb>,
    tolerance: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::with_tolerance(DEFAULT_TOLERANCE)
    }
}

impl Palette {
    pub fn with_tolerance(tolerance: f32) -> Self {
        Palette {
            ordinary: ORDINARY.to_vec(),
            tolerance,
        }
    }

    /// Add an extra ordinary color, e.g. from a sheet theme that drifts.
    pub fn with_ordinary(mut self, color: Rgb) -> Self {
        self.ordinary.push(color);
        self
    }

    pub fn is_ordinary(&self, color: &Rgb) -> bool {
        self.ordinary
            .iter()
            .any(|c| c.approx_eq(color, self.tolerance))
    }

    /// A fill outside the ordinary palette.
    pub fn is_structural(&self, color: &Rgb) -> bool {
        !self.is_ordinary(color)
    }

    pub fn same_color(&self, a: &Rgb, b: &Rgb) -> bool {
        a.approx_eq(b, self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magenta_is_structural() {
        let palette = Palette::default();
        let light_magenta = Rgb::from_hex("#ead1dc").unwrap();
        let magenta_2 = Rgb::from_hex("#d5a6bd").unwrap();
        assert!(palette.is_structural(&light_magenta));
        assert!(palette.is_structural(&magenta_2));
    }

    #[test]
    fn theme_colors_are_ordinary() {
        let palette = Palette::default();
        assert!(palette.is_ordinary(&WHITE));
        assert!(palette.is_ordinary(&Rgb::from_hex("#c9daf8").unwrap()));
        // small export drift
        assert!(palette.is_ordinary(&Rgb::new(0.99, 1.0, 0.98)));
    }

    #[test]
    fn extra_ordinary_color() {
        let sand = Rgb::from_hex("#fce5cd").unwrap();
        assert!(Palette::default().is_structural(&sand));
        assert!(Palette::default().with_ordinary(sand).is_ordinary(&sand));
    }
}
