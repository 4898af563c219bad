//! 256-color terminal palette and nearest-color quantization
//!
//! Layout of the table:
//! - 0..=6: 3-bit RGB mask at intensity 128
//! - 7: light gray, 8: dark gray
//! - 9..=15: 3-bit RGB mask at intensity 255
//! - 16..=231: 6x6x6 color cube
//! - 232..=255: 24-step grayscale ramp

use lazy_static::lazy_static;

/// Steps of the 6x6x6 color cube
const CUBE_STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Number of entries in the terminal palette
pub const PALETTE_SIZE: usize = 256;

lazy_static! {
    /// Process-wide palette, built once on first use and never written again
    pub static ref PALETTE: Palette = Palette::xterm256();
}

/// Opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Bit 0 selects red, bit 1 green, bit 2 blue
    fn from_mask(mask: u8, intensity: u8) -> Self {
        let channel = |bit: u8| if mask & bit == bit { intensity } else { 0 };
        Self::new(channel(1), channel(2), channel(4))
    }

    /// Drop alpha by compositing onto black
    #[inline]
    pub fn from_rgba_premultiplied(px: [u8; 4]) -> Self {
        let a = u16::from(px[3]);
        let mul = |c: u8| ((u16::from(c) * a + 127) / 255) as u8;
        Self::new(mul(px[0]), mul(px[1]), mul(px[2]))
    }

    /// Squared euclidean distance over the three channels
    #[inline]
    pub fn distance_sq(&self, other: &Rgb) -> u32 {
        let d = |a: u8, b: u8| {
            let v = i32::from(a) - i32::from(b);
            (v * v) as u32
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

/// Fixed 256-entry terminal color table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb; PALETTE_SIZE],
}

impl Palette {
    /// Build the conventional 8-bit terminal palette
    pub fn xterm256() -> Self {
        let mut colors = [Rgb::default(); PALETTE_SIZE];

        for (i, slot) in colors.iter_mut().enumerate().take(7) {
            *slot = Rgb::from_mask(i as u8, 128);
        }
        colors[7] = Rgb::gray(192);
        colors[8] = Rgb::gray(128);
        for i in 9..16 {
            colors[i] = Rgb::from_mask((i - 8) as u8, 255);
        }

        let mut i = 16;
        for r in CUBE_STEPS {
            for g in CUBE_STEPS {
                for b in CUBE_STEPS {
                    colors[i] = Rgb::new(r, g, b);
                    i += 1;
                }
            }
        }

        for (step, slot) in colors[232..].iter_mut().enumerate() {
            *slot = Rgb::gray(step as u8 * 10 + 8);
        }

        Self { colors }
    }

    #[inline]
    pub fn get(&self, index: u8) -> Rgb {
        self.colors[index as usize]
    }

    pub fn colors(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.colors
    }

    /// Index of the closest entry; ties resolve to the lowest index
    pub fn nearest(&self, color: Rgb) -> u8 {
        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, candidate) in self.colors.iter().enumerate() {
            let dist = candidate.distance_sq(&color);
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }
        best as u8
    }

    /// Escape text showing every entry as a three-cell swatch, 32 per line
    pub fn swatch(&self) -> String {
        let mut out = String::new();
        for i in 0..PALETTE_SIZE {
            out.push_str(&format!("\x1b[48;5;{i}m   \x1b[0m"));
            if i % 32 == 31 {
                out.push('\n');
            }
        }
        out
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::xterm256()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_sixteen() {
        let p = Palette::xterm256();
        assert_eq!(p.get(0), Rgb::new(0, 0, 0));
        assert_eq!(p.get(1), Rgb::new(128, 0, 0));
        assert_eq!(p.get(2), Rgb::new(0, 128, 0));
        assert_eq!(p.get(4), Rgb::new(0, 0, 128));
        assert_eq!(p.get(6), Rgb::new(0, 128, 128));
        assert_eq!(p.get(7), Rgb::gray(192));
        assert_eq!(p.get(8), Rgb::gray(128));
        assert_eq!(p.get(9), Rgb::new(255, 0, 0));
        assert_eq!(p.get(12), Rgb::new(0, 0, 255));
        assert_eq!(p.get(15), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_color_cube() {
        let p = Palette::xterm256();
        for r in 0..6 {
            for g in 0..6 {
                for b in 0..6 {
                    let idx = 16 + 36 * r + 6 * g + b;
                    assert_eq!(
                        p.get(idx as u8),
                        Rgb::new(CUBE_STEPS[r], CUBE_STEPS[g], CUBE_STEPS[b])
                    );
                }
            }
        }
    }

    #[test]
    fn test_gray_ramp() {
        let p = Palette::xterm256();
        for i in 232..=255u8 {
            assert_eq!(p.get(i), Rgb::gray((i - 232) * 10 + 8));
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        assert_eq!(Palette::xterm256(), Palette::xterm256());
        assert_eq!(*PALETTE, Palette::xterm256());
    }

    #[test]
    fn test_nearest_exact_and_ties() {
        let p = Palette::xterm256();
        // Pure red exists at 9 and 196; lowest index wins
        assert_eq!(p.nearest(Rgb::new(255, 0, 0)), 9);
        assert_eq!(p.nearest(Rgb::new(0, 0, 0)), 0);
        assert_eq!(p.nearest(Rgb::new(255, 255, 255)), 15);
        assert_eq!(p.nearest(Rgb::new(95, 135, 175)), 16 + 36 + 12 + 3);
        assert_eq!(p.nearest(Rgb::gray(238)), 255);
    }

    #[test]
    fn test_nearest_is_minimal() {
        let p = Palette::xterm256();
        let samples = [
            Rgb::new(12, 200, 77),
            Rgb::new(250, 3, 128),
            Rgb::new(100, 100, 101),
            Rgb::new(1, 2, 3),
            Rgb::new(180, 60, 240),
        ];
        for color in samples {
            let idx = p.nearest(color);
            let best = p.get(idx).distance_sq(&color);
            for (i, other) in p.colors().iter().enumerate() {
                let d = other.distance_sq(&color);
                assert!(best <= d, "{color:?}: index {idx} beaten by {i}");
                if d == best {
                    assert!(idx as usize <= i);
                }
            }
        }
    }

    #[test]
    fn test_premultiplied_alpha() {
        assert_eq!(Rgb::from_rgba_premultiplied([255, 255, 255, 0]), Rgb::gray(0));
        assert_eq!(Rgb::from_rgba_premultiplied([255, 0, 0, 255]), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_rgba_premultiplied([200, 100, 0, 128]), Rgb::new(100, 50, 0));
    }

    #[test]
    fn test_swatch_has_eight_lines() {
        let swatch = Palette::xterm256().swatch();
        assert_eq!(swatch.lines().count(), 8);
        assert!(swatch.starts_with("\x1b[48;5;0m   \x1b[0m"));
    }
}
