//! Default-returning getters for editor field instances
//!
//! Levels and entities carry a list of `FieldInstance`s. `Fields` wraps such a
//! list and resolves identifiers to typed values. A missing identifier logs a
//! warning and yields the default for the requested type; it never fails.

use crate::FieldValue;
use bevy::log::warn;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single named field value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FieldInstance {
    #[serde(rename = "__identifier")]
    pub identifier: String,
    #[serde(rename = "__value", default)]
    pub value: FieldValue,
}

impl FieldInstance {
    pub fn new(identifier: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            identifier: identifier.into(),
            value: value.into(),
        }
    }
}

/// Grid-space point (`cx`, `cy`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridPoint {
    pub cx: i64,
    pub cy: i64,
}

/// Displayable region of a tileset texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileRef {
    pub tileset_uid: i64,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

/// Reference to an entity and its containers, loaded or not
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityRef {
    pub level_iid: String,
    pub layer_iid: String,
    pub entity_iid: String,
}

impl From<&FieldValue> for GridPoint {
    fn from(value: &FieldValue) -> Self {
        Self {
            cx: value.get("cx").int(),
            cy: value.get("cy").int(),
        }
    }
}

impl From<&FieldValue> for TileRef {
    fn from(value: &FieldValue) -> Self {
        Self {
            tileset_uid: value.get("tilesetUid").int(),
            x: value.get("x").int(),
            y: value.get("y").int(),
            w: value.get("w").int(),
            h: value.get("h").int(),
        }
    }
}

impl From<&FieldValue> for EntityRef {
    fn from(value: &FieldValue) -> Self {
        Self {
            level_iid: value.get("levelIid").str().to_string(),
            layer_iid: value.get("layerIid").str().to_string(),
            entity_iid: value.get("entityIid").str().to_string(),
        }
    }
}

/// Parse a `#RRGGBB` (or `RRGGBB`) color. Anything else is black.
fn parse_hex_rgb(hex: &str) -> [u8; 3] {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return [0, 0, 0];
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    [channel(0), channel(2), channel(4)]
}

/// Typed view over a list of field instances
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    fields: &'a [FieldInstance],
}

impl<'a> Fields<'a> {
    pub fn new(fields: &'a [FieldInstance]) -> Self {
        Self { fields }
    }

    /// Raw value for an identifier. Missing or null fields are `Undefined`.
    pub fn value(&self, id: &str) -> &'a FieldValue {
        static UNDEFINED: FieldValue = FieldValue::Undefined;

        match self
            .fields
            .iter()
            .find(|f| f.identifier == id && !f.value.is_undefined())
        {
            Some(field) => &field.value,
            None => {
                warn!("Field '{}' not found", id);
                &UNDEFINED
            }
        }
    }

    pub fn int(&self, id: &str) -> i64 {
        self.value(id).int()
    }

    pub fn float(&self, id: &str) -> f64 {
        self.value(id).float()
    }

    pub fn bool(&self, id: &str) -> bool {
        self.value(id).bool()
    }

    pub fn string(&self, id: &str) -> &'a str {
        self.value(id).str()
    }

    /// Parse a string field into an enum (or any `FromStr` type)
    pub fn enum_value<T: FromStr + Default>(&self, id: &str) -> T {
        self.string(id).parse().unwrap_or_default()
    }

    /// Color field as `[r, g, b]`
    pub fn color(&self, id: &str) -> [u8; 3] {
        parse_hex_rgb(self.string(id))
    }

    pub fn point(&self, id: &str) -> GridPoint {
        self.value(id).into()
    }

    pub fn tile(&self, id: &str) -> TileRef {
        self.value(id).into()
    }

    pub fn entity(&self, id: &str) -> EntityRef {
        self.value(id).into()
    }

    pub fn int_list(&self, id: &str) -> Vec<i64> {
        self.list(id, FieldValue::int)
    }

    pub fn float_list(&self, id: &str) -> Vec<f64> {
        self.list(id, FieldValue::float)
    }

    pub fn bool_list(&self, id: &str) -> Vec<bool> {
        self.list(id, FieldValue::bool)
    }

    pub fn string_list(&self, id: &str) -> Vec<String> {
        self.list(id, |v| v.str().to_string())
    }

    pub fn enum_list<T: FromStr + Default>(&self, id: &str) -> Vec<T> {
        self.list(id, |v| v.str().parse().unwrap_or_default())
    }

    pub fn color_list(&self, id: &str) -> Vec<[u8; 3]> {
        self.list(id, |v| parse_hex_rgb(v.str()))
    }

    pub fn point_list(&self, id: &str) -> Vec<GridPoint> {
        self.list(id, GridPoint::from)
    }

    pub fn tile_list(&self, id: &str) -> Vec<TileRef> {
        self.list(id, TileRef::from)
    }

    pub fn entity_list(&self, id: &str) -> Vec<EntityRef> {
        self.list(id, EntityRef::from)
    }

    fn list<T>(&self, id: &str, convert: impl Fn(&'a FieldValue) -> T) -> Vec<T> {
        self.value(id).array().iter().map(convert).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    enum Biome {
        #[default]
        Plains,
        Desert,
    }

    impl FromStr for Biome {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "Plains" => Ok(Biome::Plains),
                "Desert" => Ok(Biome::Desert),
                _ => Err(()),
            }
        }
    }

    fn sample() -> Vec<FieldInstance> {
        let raw = serde_json::json!([
            { "__identifier": "health", "__value": 12 },
            { "__identifier": "speed", "__value": 1.5 },
            { "__identifier": "boss", "__value": true },
            { "__identifier": "name", "__value": "Guard" },
            { "__identifier": "biome", "__value": "Desert" },
            { "__identifier": "tint", "__value": "#FF8000" },
            { "__identifier": "spawn", "__value": { "cx": 3, "cy": 9 } },
            { "__identifier": "icon", "__value": { "tilesetUid": 2, "x": 16, "y": 32, "w": 16, "h": 16 } },
            { "__identifier": "target", "__value": { "levelIid": "L", "layerIid": "Y", "entityIid": "E" } },
            { "__identifier": "path", "__value": [{ "cx": 0, "cy": 0 }, { "cx": 1, "cy": 2 }] },
            { "__identifier": "empty", "__value": null }
        ]);
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_scalar_getters() {
        let data = sample();
        let fields = Fields::new(&data);

        assert_eq!(fields.int("health"), 12);
        assert_eq!(fields.float("speed"), 1.5);
        assert!(fields.bool("boss"));
        assert_eq!(fields.string("name"), "Guard");
        assert_eq!(fields.enum_value::<Biome>("biome"), Biome::Desert);
        assert_eq!(fields.color("tint"), [255, 128, 0]);
    }

    #[test]
    fn test_reference_getters() {
        let data = sample();
        let fields = Fields::new(&data);

        assert_eq!(fields.point("spawn"), GridPoint { cx: 3, cy: 9 });
        assert_eq!(
            fields.tile("icon"),
            TileRef {
                tileset_uid: 2,
                x: 16,
                y: 32,
                w: 16,
                h: 16
            }
        );
        assert_eq!(fields.entity("target").entity_iid, "E");
        assert_eq!(fields.point_list("path")[1], GridPoint { cx: 1, cy: 2 });
    }

    #[test]
    fn test_missing_fields_return_defaults() {
        let data = sample();
        let fields = Fields::new(&data);

        assert_eq!(fields.int("nope"), 0);
        assert_eq!(fields.string("empty"), "");
        assert_eq!(fields.enum_value::<Biome>("name"), Biome::Plains);
        assert_eq!(fields.color("name"), [0, 0, 0]);
        assert!(fields.int_list("nope").is_empty());
        assert_eq!(fields.point("nope"), GridPoint::default());
    }
}
