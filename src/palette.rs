use std::fmt;

/// Exact-match color value. The remote surface only accepts the palette's
/// component triples verbatim, so there is no distance metric anywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

pub struct Palette;

impl Palette {
    /// The surface's fixed swatch order. Index positions are stable for the
    /// session lifetime and double as the addressable selected-color state.
    pub const COLORS: [Rgb; 30] = [
        Rgb::new(255, 255, 255),
        Rgb::new(228, 228, 228),
        Rgb::new(196, 196, 196),
        Rgb::new(136, 136, 136),
        Rgb::new(78, 78, 78),
        Rgb::new(0, 0, 0),
        Rgb::new(244, 179, 174),
        Rgb::new(255, 167, 209),
        Rgb::new(255, 84, 178),
        Rgb::new(255, 101, 101),
        Rgb::new(229, 0, 0),
        Rgb::new(154, 0, 0),
        Rgb::new(254, 164, 96),
        Rgb::new(229, 149, 0),
        Rgb::new(160, 106, 66),
        Rgb::new(96, 64, 40),
        Rgb::new(245, 223, 176),
        Rgb::new(255, 248, 137),
        Rgb::new(229, 217, 0),
        Rgb::new(148, 224, 68),
        Rgb::new(2, 190, 1),
        Rgb::new(104, 131, 56),
        Rgb::new(0, 101, 19),
        Rgb::new(202, 227, 255),
        Rgb::new(0, 211, 221),
        Rgb::new(0, 131, 199),
        Rgb::new(0, 0, 234),
        Rgb::new(25, 25, 115),
        Rgb::new(207, 110, 228),
        Rgb::new(130, 0, 128),
    ];

    /// Slot index of an exactly-matching palette entry, `None` otherwise.
    /// A miss is a skippable condition for the caller, never a failure.
    pub fn resolve(rgb: Rgb) -> Option<usize> {
        Self::COLORS.iter().position(|c| *c == rgb)
    }

    pub fn color(slot: usize) -> Option<Rgb> {
        Self::COLORS.get(slot).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn resolves_exact_entries() {
        assert_eq!(Palette::resolve(Rgb::new(255, 255, 255)), Some(0));
        assert_eq!(Palette::resolve(Rgb::new(0, 0, 0)), Some(5));
        assert_eq!(Palette::resolve(Rgb::new(130, 0, 128)), Some(29));
    }

    #[test]
    fn near_misses_do_not_resolve() {
        assert_eq!(Palette::resolve(Rgb::new(255, 255, 254)), None);
        assert_eq!(Palette::resolve(Rgb::new(1, 0, 0)), None);
    }

    #[test]
    fn entries_are_distinct() {
        let unique: HashSet<Rgb> = Palette::COLORS.iter().copied().collect();
        assert_eq!(unique.len(), Palette::COLORS.len());
    }

    #[test]
    fn slot_round_trips() {
        for (i, c) in Palette::COLORS.iter().enumerate() {
            assert_eq!(Palette::color(i), Some(*c));
            assert_eq!(Palette::resolve(*c), Some(i));
        }
        assert_eq!(Palette::color(30), None);
    }
}
