//! Property-based tests for library theme matching.
//!
//! 1. The exact and showcase tiers are symmetric.
//! 2. Probing is symmetric at every tier.
//! 3. The exact and showcase tiers are reflexive.
//! 4. No tier matches across base color schemes or contrast modes.

use std::any::TypeId;
use std::sync::Arc;

use proptest::prelude::*;
use tincture_core::Color;
use tincture_theme::{keys, LibraryTheme, MatchTier, ProviderKey, ResourceDictionary};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Meta {
    base: &'static str,
    scheme: &'static str,
    alternative: &'static str,
    showcase: u32,
    high_contrast: bool,
}

const SCHEMES: [&str; 4] = ["Blue", "Purple", "Mauve", "Green"];
const SHOWCASES: [u32; 3] = [0x1E66F5, 0x8839EF, 0x40A02B];

fn meta_strategy() -> impl Strategy<Value = Meta> {
    (
        prop::sample::select(vec!["Light", "Dark"]),
        prop::sample::select(SCHEMES.to_vec()),
        prop::sample::select(SCHEMES.to_vec()),
        prop::sample::select(SHOWCASES.to_vec()),
        any::<bool>(),
    )
        .prop_map(|(base, scheme, alternative, showcase, high_contrast)| Meta {
            base,
            scheme,
            alternative,
            showcase,
            high_contrast,
        })
}

fn library_theme(meta: &Meta, provider: &str) -> Arc<LibraryTheme> {
    let dictionary = ResourceDictionary::new()
        .with_source(format!("{provider}/themes/{}.{}.toml", meta.base, meta.scheme))
        .with_entry(keys::THEME_NAME, format!("{}.{}", meta.base, meta.scheme))
        .with_entry(keys::THEME_BASE_COLOR_SCHEME, meta.base)
        .with_entry(keys::THEME_COLOR_SCHEME, meta.scheme)
        .with_entry(keys::THEME_ALTERNATIVE_COLOR_SCHEME, meta.alternative)
        .with_entry(keys::THEME_PRIMARY_ACCENT_COLOR, Color::from_hex(0x7F7F7F))
        .with_entry(keys::THEME_SHOWCASE_COLOR, Color::from_hex(meta.showcase))
        .with_entry(keys::THEME_IS_HIGH_CONTRAST, meta.high_contrast);
    LibraryTheme::from_dictionary(dictionary, ProviderKey::new(provider, TypeId::of::<Meta>()), false)
        .expect("complete metadata")
}

fn pair_strategy() -> impl Strategy<Value = (Arc<LibraryTheme>, Arc<LibraryTheme>)> {
    (meta_strategy(), meta_strategy())
        .prop_map(|(a, b)| (library_theme(&a, "left"), library_theme(&b, "right")))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Symmetric tiers
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn exact_and_showcase_tiers_are_symmetric((a, b) in pair_strategy()) {
        for tier in [MatchTier::Exact, MatchTier::Showcase] {
            prop_assert_eq!(tier.check(&a, &b), tier.check(&b, &a), "{:?}", tier);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Probing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn probing_is_symmetric((a, b) in pair_strategy()) {
        for tier in MatchTier::ALL {
            prop_assert_eq!(tier.probe(&a, &b), tier.probe(&b, &a), "{:?}", tier);
            prop_assert!(!tier.check(&a, &b) || tier.probe(&a, &b));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Reflexive tiers
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn a_theme_matches_itself(meta in meta_strategy()) {
        let a = library_theme(&meta, "left");
        let b = library_theme(&meta, "right");
        prop_assert!(MatchTier::Exact.check(&a, &b));
        prop_assert!(MatchTier::Showcase.check(&a, &b));
        prop_assert_eq!(
            MatchTier::Alternative.check(&a, &b),
            meta.scheme == meta.alternative
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Base color scheme and contrast mode
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_match_across_base_or_contrast((a, b) in pair_strategy()) {
        let compatible = a.base_color_scheme() == b.base_color_scheme()
            && a.is_high_contrast() == b.is_high_contrast();
        if !compatible {
            for tier in MatchTier::ALL {
                prop_assert!(!tier.probe(&a, &b), "{:?} matched {} and {}", tier, a, b);
            }
        }
    }
}
