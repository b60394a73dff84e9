//! Per-vehicle display colours.

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An RGBA colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Colour {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Opacity.
    pub a: f64,
}

impl Colour {
    /// Neutral grey used when no palette entry exists.
    pub const GREY: Self = Self {
        r: 0.4,
        g: 0.4,
        b: 0.4,
        a: 0.5,
    };
}

/// One colour per vehicle.
///
/// # Examples
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use fleetroute_core::Palette;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let palette = Palette::random(3, &mut rng);
/// assert_eq!(palette.len(), 3);
/// // Vehicles beyond the palette wrap around.
/// assert_eq!(palette.colour(4), palette.colour(1));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Palette {
    colours: Vec<Colour>,
}

impl Palette {
    /// Draw `vehicles` half-transparent colours with channels below `0.8`,
    /// so that no route is drawn in near-white.
    #[must_use]
    pub fn random<R: Rng>(vehicles: usize, rng: &mut R) -> Self {
        let colours = (0..vehicles)
            .map(|_| Colour {
                r: rng.r#gen::<f64>() * 0.8,
                g: rng.r#gen::<f64>() * 0.8,
                b: rng.r#gen::<f64>() * 0.8,
                a: 0.5,
            })
            .collect();
        Self { colours }
    }

    /// Wrap explicit colours.
    #[must_use]
    pub const fn new(colours: Vec<Colour>) -> Self {
        Self { colours }
    }

    /// Number of colours.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Whether the palette is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Colour for `vehicle`, wrapping around the palette.
    #[must_use]
    pub fn colour(&self, vehicle: usize) -> Colour {
        vehicle
            .checked_rem(self.colours.len())
            .and_then(|slot| self.colours.get(slot))
            .copied()
            .unwrap_or(Colour::GREY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    #[rstest]
    fn same_seed_same_palette() {
        let first = Palette::random(4, &mut ChaCha8Rng::seed_from_u64(11));
        let second = Palette::random(4, &mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(first, second);
    }

    #[rstest]
    fn channels_stay_in_range() {
        let palette = Palette::random(32, &mut ChaCha8Rng::seed_from_u64(3));
        for vehicle in 0..32 {
            let colour = palette.colour(vehicle);
            for channel in [colour.r, colour.g, colour.b] {
                assert!((0.0..0.8).contains(&channel));
            }
            assert!((colour.a - 0.5).abs() < f64::EPSILON);
        }
    }

    #[rstest]
    fn empty_palette_falls_back_to_grey() {
        assert_eq!(Palette::default().colour(2), Colour::GREY);
    }
}
