//! Tincture Core
//!
//! Color primitives shared by the tincture crates:
//!
//! - **Color**: RGBA color with `#AARRGGBB` parsing and formatting
//! - **HSL math**: RGB <-> HSL conversion and lightness tinting
//! - **Observers**: subscription lists for change notifications
//!
//! # Example
//!
//! ```rust
//! use tincture_core::{Color, HslColor};
//!
//! let accent: Color = "#FF0078D7".parse().unwrap();
//! let hsl = HslColor::from_color(accent);
//!
//! // Darken by 30%
//! let pressed = hsl.tinted(-0.3);
//! assert!(HslColor::from_color(pressed).l < hsl.l);
//! ```

pub mod color;
pub mod events;
pub mod hsl;

pub use color::{Color, ColorParseError};
pub use events::{Handler, Observers, SubscriptionId};
pub use hsl::{HslColor, HSL_TOLERANCE};
