//! Per-tile custom data mini-language
//!
//! Tilesets carry a free-text blob per tile id. Each line is a `key: value`
//! pair split on the first `:`, with whitespace trimmed on both sides.
//! Lines without a `:` are reported and skipped; the rest of the blob is
//! still processed.
//!
//! Two keys are interpreted by the tileset catalog:
//!
//! ```text
//! collider: FULL                     whole tile
//! collider: RECT 4 4 8 8             x y width height
//! collider: CIRCLE 8 8 4             x y radius
//! collider: POLY 0 8 16 8 8 16       x1 y1 x2 y2 ... (winding and convexity are not checked)
//! anim: torch                        animation name
//! ```

use crate::ColliderSpec;
use bevy::log::{debug, warn};

/// Key declaring the tile's collider geometry
pub const COLLIDER_KEY: &str = "collider";
/// Key naming the animation that replaces the tile's static sprite
pub const ANIMATION_KEY: &str = "anim";

/// A recognized custom-data key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKey {
    Collider,
    Animation,
}

impl BuiltinKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            COLLIDER_KEY => Some(BuiltinKey::Collider),
            ANIMATION_KEY => Some(BuiltinKey::Animation),
            _ => None,
        }
    }
}

/// One line of a custom data blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Zero-length line, skipped silently
    Empty,
    /// Trimmed key and value
    Pair(&'a str, &'a str),
    /// Non-empty line without a `:`
    Malformed(&'a str),
}

impl<'a> Line<'a> {
    pub fn parse(line: &'a str) -> Self {
        if line.is_empty() {
            return Line::Empty;
        }
        match line.split_once(':') {
            Some((key, value)) => Line::Pair(key.trim(), value.trim()),
            None => Line::Malformed(line),
        }
    }
}

/// Split a custom data blob into trimmed `(key, value)` pairs.
///
/// `tile_id` is only used for diagnostics.
pub fn parse_lines(tile_id: u32, blob: &str) -> impl Iterator<Item = (&str, &str)> {
    blob.lines().filter_map(move |line| match Line::parse(line) {
        Line::Empty => None,
        Line::Pair(key, value) => Some((key, value)),
        Line::Malformed(line) => {
            warn!(
                "Failed to load custom data '{}' for tile {}, missing identifier",
                line, tile_id
            );
            None
        }
    })
}

/// Parse a collider declaration.
///
/// Returns `None` for an unknown keyword, a wrong argument count, or any
/// non-numeric argument. A failed parse never yields partial geometry.
pub fn parse_collider(value: &str, tile_size: f32) -> Option<ColliderSpec> {
    let mut tokens = value.split_whitespace();
    let keyword = tokens.next()?;
    let args: Vec<&str> = tokens.collect();

    let shape = match keyword {
        "FULL" => Some(ColliderSpec::full(tile_size)),
        "RECT" => match parse_numbers(&args)?.as_slice() {
            &[x, y, w, h] => Some(ColliderSpec::rectangle(x, y, w, h)),
            _ => None,
        },
        "CIRCLE" => match parse_numbers(&args)?.as_slice() {
            &[x, y, r] => Some(ColliderSpec::circle(x, y, r)),
            _ => None,
        },
        "POLY" => {
            if args.len() % 2 != 0 {
                None
            } else {
                let numbers = parse_numbers(&args)?;
                let vertices = numbers.chunks_exact(2).map(|p| [p[0], p[1]]).collect();
                Some(ColliderSpec::polygon(vertices))
            }
        }
        _ => return None,
    };

    if shape.is_none() {
        debug!("Collider '{}' has malformed arguments, ignoring", value);
    }
    shape
}

/// Parse every token as `f32`, failing as a whole on the first bad token
fn parse_numbers(tokens: &[&str]) -> Option<Vec<f32>> {
    tokens.iter().map(|t| t.parse::<f32>().ok()).collect()
}
