//! Ordered color palettes: HSL-derived generators, fixed presets, and the
//! three ways engines choose a color from them.
//!
//! Generators take a base color, read its hue, saturation and lightness, and
//! spread `n` colors around it. Every generated color is fully opaque.

use std::fmt;
use std::str::FromStr;

use crate::color::{hsl_to_rgb, rgb_to_hsl, Rgba};
use crate::error::EngineError;
use crate::field::remap01;
use crate::prng::Xorshift64;

/// One twelfth of the hue circle (30 degrees).
const HUE_STEP: f64 = 1.0 / 12.0;

/// A non-empty ordered list of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

/// Generator families selectable from a run config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKind {
    Mono,
    Analogous,
    SplitComplementary,
}

impl PaletteKind {
    /// Canonical names, in listing order.
    pub const NAMES: [&'static str; 3] = ["mono", "analogous", "split"];

    pub fn name(self) -> &'static str {
        match self {
            PaletteKind::Mono => "mono",
            PaletteKind::Analogous => "analogous",
            PaletteKind::SplitComplementary => "split",
        }
    }
}

impl FromStr for PaletteKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mono" | "monochrome" => Ok(PaletteKind::Mono),
            "analogous" => Ok(PaletteKind::Analogous),
            "split" | "splitcomplementary" | "split-complementary" => {
                Ok(PaletteKind::SplitComplementary)
            }
            other => Err(EngineError::UnknownPalette(other.to_string())),
        }
    }
}

impl fmt::Display for PaletteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Palette {
    /// Creates a palette from explicit colors. Requires at least one color.
    pub fn new(colors: Vec<Rgba>) -> Result<Self, EngineError> {
        if colors.is_empty() {
            return Err(EngineError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    // -- Selection --

    /// A uniformly random color. Consumes one PRNG draw.
    pub fn pick(&self, rng: &mut Xorshift64) -> Rgba {
        self.colors[rng.next_usize(self.colors.len())]
    }

    /// The color at `i`, wrapping around the end.
    pub fn by_index(&self, i: usize) -> Rgba {
        self.colors[i % self.colors.len()]
    }

    /// Maps a noise value in [-1, 1] onto the palette, first to last.
    ///
    /// Out-of-range values clamp to the ends.
    pub fn from_noise(&self, v: f64) -> Rgba {
        let last = self.colors.len() - 1;
        let t = remap01(v);
        let idx = if t.is_nan() || t <= 0.0 {
            0
        } else {
            ((t * last as f64) as usize).min(last)
        };
        self.colors[idx]
    }

    // -- Palette generators --

    /// Dispatches to the generator for `kind`.
    pub fn generate(kind: PaletteKind, base: Rgba, n: usize) -> Self {
        match kind {
            PaletteKind::Mono => Self::monochrome(base, n),
            PaletteKind::Analogous => Self::analogous(base, n),
            PaletteKind::SplitComplementary => Self::split_complementary(base, n),
        }
    }

    /// Fixed hue and saturation, lightness stepping from dark to light.
    ///
    /// `n` is raised to at least 2.
    pub fn monochrome(base: Rgba, n: usize) -> Self {
        let n = n.max(2);
        let (h, s, l) = rgb_to_hsl(base.r, base.g, base.b);
        let colors = (0..n)
            .map(|i| {
                let f = fraction(i, n);
                opaque_hsl(h, s, clamp01(l * 0.3 + f * 0.7))
            })
            .collect();
        Self { colors }
    }

    /// Cycles the base hue and its two 30-degree neighbours while lightness
    /// and saturation ramp up.
    ///
    /// `n` is raised to at least 3.
    pub fn analogous(base: Rgba, n: usize) -> Self {
        let n = n.max(3);
        let (h, s, l) = rgb_to_hsl(base.r, base.g, base.b);
        let hues = [
            (h - HUE_STEP).rem_euclid(1.0),
            h,
            (h + HUE_STEP).rem_euclid(1.0),
        ];
        let colors = (0..n)
            .map(|i| {
                let f = fraction(i, n);
                opaque_hsl(
                    hues[i % 3],
                    clamp01(s * 0.5 + f * 0.5),
                    clamp01(l * 0.3 + f * 0.7),
                )
            })
            .collect();
        Self { colors }
    }

    /// Cycles the base hue and the two hues flanking its complement, kept
    /// vivid (saturation at least 0.6) around mid lightness.
    ///
    /// `n` is raised to at least 3.
    pub fn split_complementary(base: Rgba, n: usize) -> Self {
        let n = n.max(3);
        let (h, s, _) = rgb_to_hsl(base.r, base.g, base.b);
        let hues = [
            h,
            (h + 0.5 - HUE_STEP).rem_euclid(1.0),
            (h + 0.5 + HUE_STEP).rem_euclid(1.0),
        ];
        let colors = (0..n)
            .map(|i| {
                let f = fraction(i, n);
                opaque_hsl(
                    hues[i % 3],
                    (s * 0.9 + f * 0.1).clamp(0.6, 1.0),
                    clamp01(0.4 + f * 0.3),
                )
            })
            .collect();
        Self { colors }
    }

    // -- Presets --

    /// Single black.
    pub fn mono() -> Self {
        Self {
            colors: vec![Rgba::BLACK],
        }
    }

    pub fn warm() -> Self {
        Self {
            colors: vec![
                Rgba::rgb(0.9, 0.4, 0.2),
                Rgba::rgb(0.95, 0.7, 0.2),
                Rgba::rgb(0.7, 0.2, 0.2),
            ],
        }
    }

    pub fn cool() -> Self {
        Self {
            colors: vec![
                Rgba::rgb(0.2, 0.5, 0.9),
                Rgba::rgb(0.3, 0.8, 0.7),
                Rgba::rgb(0.1, 0.2, 0.6),
            ],
        }
    }

    /// Red through violet.
    pub fn rainbow() -> Self {
        Self {
            colors: vec![
                Rgba::rgb(1.0, 0.0, 0.0),
                Rgba::rgb(1.0, 0.5, 0.0),
                Rgba::rgb(1.0, 1.0, 0.0),
                Rgba::rgb(0.0, 1.0, 0.0),
                Rgba::rgb(0.0, 0.0, 1.0),
                Rgba::rgb(0.29, 0.0, 0.51),
                Rgba::rgb(0.56, 0.0, 1.0),
            ],
        }
    }

    /// Preset by numeric id: 1 warm, 2 cool, 3 rainbow, anything else mono.
    pub fn preset(id: i64) -> Self {
        match id {
            1 => Self::warm(),
            2 => Self::cool(),
            3 => Self::rainbow(),
            _ => Self::mono(),
        }
    }
}

fn fraction(i: usize, n: usize) -> f64 {
    i as f64 / (n - 1) as f64
}

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

fn opaque_hsl(h: f64, s: f64, l: f64) -> Rgba {
    let (r, g, b) = hsl_to_rgb(h, s, l);
    Rgba::rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn base() -> Rgba {
        Rgba::rgb(0.2, 0.4, 0.8)
    }

    fn in_unit(c: Rgba) -> bool {
        [c.r, c.g, c.b].iter().all(|v| (-EPSILON..=1.0 + EPSILON).contains(v))
    }

    // -- Construction --

    #[test]
    fn new_rejects_empty() {
        assert!(matches!(
            Palette::new(Vec::new()),
            Err(EngineError::InvalidPalette(_))
        ));
    }

    #[test]
    fn new_keeps_colors_in_order() {
        let p = Palette::new(vec![Rgba::BLACK, Rgba::WHITE]).unwrap();
        assert_eq!(p.colors(), &[Rgba::BLACK, Rgba::WHITE]);
    }

    // -- Kind parsing --

    #[test]
    fn kind_parses_aliases() {
        assert_eq!("mono".parse::<PaletteKind>().unwrap(), PaletteKind::Mono);
        assert_eq!("monochrome".parse::<PaletteKind>().unwrap(), PaletteKind::Mono);
        assert_eq!("analogous".parse::<PaletteKind>().unwrap(), PaletteKind::Analogous);
        for alias in ["split", "splitcomplementary", "split-complementary"] {
            assert_eq!(
                alias.parse::<PaletteKind>().unwrap(),
                PaletteKind::SplitComplementary
            );
        }
    }

    #[test]
    fn kind_rejects_unknown_name() {
        let err = "triadic".parse::<PaletteKind>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownPalette(ref n) if n == "triadic"));
    }

    #[test]
    fn kind_names_parse_back() {
        for name in PaletteKind::NAMES {
            let kind: PaletteKind = name.parse().unwrap();
            assert_eq!(kind.name(), name);
        }
    }

    // -- Generators --

    #[test]
    fn monochrome_keeps_hue_and_ramps_lightness() {
        let p = Palette::monochrome(base(), 5);
        assert_eq!(p.len(), 5);
        let (h0, _, _) = rgb_to_hsl(base().r, base().g, base().b);
        let mut prev_l = -1.0;
        for c in p.colors() {
            let (h, _, l) = rgb_to_hsl(c.r, c.g, c.b);
            assert!((h - h0).abs() < 1e-6 || l >= 1.0 - 1e-6, "hue drifted to {h}");
            assert!(l >= prev_l - EPSILON, "lightness not ascending");
            prev_l = l;
        }
    }

    #[test]
    fn monochrome_raises_small_n_to_two() {
        assert_eq!(Palette::monochrome(base(), 0).len(), 2);
        assert_eq!(Palette::monochrome(base(), 1).len(), 2);
    }

    #[test]
    fn analogous_and_split_raise_small_n_to_three() {
        assert_eq!(Palette::analogous(base(), 1).len(), 3);
        assert_eq!(Palette::split_complementary(base(), 2).len(), 3);
    }

    #[test]
    fn split_complementary_is_vivid() {
        let p = Palette::split_complementary(Rgba::rgb(0.5, 0.5, 0.5), 6);
        for c in p.colors() {
            let (_, s, _) = rgb_to_hsl(c.r, c.g, c.b);
            assert!(s >= 0.6 - 1e-6, "saturation {s} below 0.6");
        }
    }

    #[test]
    fn analogous_hue_wraps_below_zero() {
        // Pure red has hue 0; its lower neighbour must wrap to 11/12.
        let p = Palette::analogous(Rgba::rgb(1.0, 0.0, 0.0), 3);
        let c = p.colors()[0];
        let (h, _, _) = rgb_to_hsl(c.r, c.g, c.b);
        assert!((h - 11.0 / 12.0).abs() < 1e-6, "hue = {h}");
    }

    #[test]
    fn generate_dispatches_by_kind() {
        assert_eq!(
            Palette::generate(PaletteKind::Analogous, base(), 4),
            Palette::analogous(base(), 4)
        );
    }

    // -- Presets --

    #[test]
    fn preset_ids_select_palettes() {
        assert_eq!(Palette::preset(1), Palette::warm());
        assert_eq!(Palette::preset(2), Palette::cool());
        assert_eq!(Palette::preset(3), Palette::rainbow());
        assert_eq!(Palette::preset(0), Palette::mono());
        assert_eq!(Palette::preset(-7), Palette::mono());
        assert_eq!(Palette::rainbow().len(), 7);
    }

    // -- Selection --

    #[test]
    fn by_index_wraps() {
        let p = Palette::warm();
        assert_eq!(p.by_index(0), p.by_index(3));
        assert_eq!(p.by_index(4), p.colors()[1]);
    }

    #[test]
    fn from_noise_maps_ends_and_clamps() {
        let p = Palette::rainbow();
        assert_eq!(p.from_noise(-1.0), p.colors()[0]);
        assert_eq!(p.from_noise(1.0), p.colors()[6]);
        assert_eq!(p.from_noise(-5.0), p.colors()[0]);
        assert_eq!(p.from_noise(5.0), p.colors()[6]);
        assert_eq!(p.from_noise(f64::NAN), p.colors()[0]);
    }

    #[test]
    fn pick_is_deterministic_per_seed() {
        let p = Palette::rainbow();
        let mut a = Xorshift64::new(9);
        let mut b = Xorshift64::new(9);
        for _ in 0..50 {
            assert_eq!(p.pick(&mut a), p.pick(&mut b));
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_kind() -> impl Strategy<Value = PaletteKind> {
            prop_oneof![
                Just(PaletteKind::Mono),
                Just(PaletteKind::Analogous),
                Just(PaletteKind::SplitComplementary),
            ]
        }

        proptest! {
            #[test]
            fn generators_return_n_opaque_colors_in_range(
                kind in any_kind(),
                r in 0.0_f64..=1.0,
                g in 0.0_f64..=1.0,
                b in 0.0_f64..=1.0,
                n in 3_usize..40,
            ) {
                let p = Palette::generate(kind, Rgba::rgb(r, g, b), n);
                prop_assert_eq!(p.len(), n);
                for c in p.colors() {
                    prop_assert_eq!(c.a, 1.0);
                    prop_assert!(in_unit(*c), "color {:?} out of range", c);
                }
            }

            #[test]
            fn pick_stays_inside_palette(seed: u64) {
                let p = Palette::cool();
                let mut rng = Xorshift64::new(seed);
                for _ in 0..20 {
                    let c = p.pick(&mut rng);
                    prop_assert!(p.colors().contains(&c));
                }
            }
        }
    }
}
