//! Tileset catalog: one immutable definition per tile id

use crate::custom_data::{self, BuiltinKey};
use crate::{CustomDataSource, EnumTagSource, TileCollider, TilesetSource};
use bevy::log::{info, warn};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Pixel rectangle inside the tileset texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Provides sprite handles for tile definitions.
///
/// Implemented by whatever owns the tileset texture and animation assets.
pub trait SpriteSource {
    /// Handle type stored in definitions and painted by the renderer
    type Sprite: Clone;

    /// Static sprite for a region of the tileset texture
    fn atlas_region(&self, region: PixelRect) -> Self::Sprite;

    /// Animated sprite registered under `name`, if any
    fn animation(&self, name: &str) -> Option<Self::Sprite>;
}

/// Grid shape of a tileset
///
/// `padding` is the margin around the whole texture and `spacing` the gap
/// between neighbouring tiles, both in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TilesetLayout {
    pub tile_count_x: u32,
    pub tile_count_y: u32,
    /// Width and height of one tile in pixels
    pub tile_size: u32,
    pub padding: u32,
    pub spacing: u32,
}

impl TilesetLayout {
    pub fn new(tile_count_x: u32, tile_count_y: u32, tile_size: u32) -> Self {
        Self {
            tile_count_x,
            tile_count_y,
            tile_size,
            padding: 0,
            spacing: 0,
        }
    }

    pub fn with_spacing(mut self, padding: u32, spacing: u32) -> Self {
        self.padding = padding;
        self.spacing = spacing;
        self
    }

    /// Whether every id and every tile region fits in `u32`
    pub fn is_valid(&self) -> bool {
        if self.tile_count_x.checked_mul(self.tile_count_y).is_none() {
            return false;
        }
        let last = [
            self.tile_count_x.saturating_sub(1),
            self.tile_count_y.saturating_sub(1),
        ];
        self.region(last[0], last[1])
            .is_some_and(|r| r.x.checked_add(r.w).is_some() && r.y.checked_add(r.h).is_some())
    }

    /// Total number of tiles, `0` for a layout that does not fit
    pub fn tile_count(&self) -> u32 {
        if self.is_valid() {
            self.tile_count_x * self.tile_count_y
        } else {
            0
        }
    }

    /// Convert an id to a value in `[0, tile_count)`, if it is one
    pub fn checked_id(&self, id: i64) -> Option<u32> {
        u32::try_from(id).ok().filter(|id| *id < self.tile_count())
    }

    /// Row-major id of a grid coordinate
    pub fn id_at(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.tile_count_x || y >= self.tile_count_y {
            return None;
        }
        y.checked_mul(self.tile_count_x)?
            .checked_add(x)
            .filter(|id| *id < self.tile_count())
    }

    /// Grid coordinate of an id
    pub fn coord_of(&self, id: u32) -> Option<[u32; 2]> {
        (id < self.tile_count()).then(|| [id % self.tile_count_x, id / self.tile_count_x])
    }

    /// Texture region of the tile at a grid coordinate, `None` if its
    /// position overflows
    pub fn region(&self, x: u32, y: u32) -> Option<PixelRect> {
        let stride = self.tile_size.checked_add(self.spacing)?;
        let offset = |i: u32| i.checked_mul(stride)?.checked_add(self.padding);
        Some(PixelRect::new(
            offset(x)?,
            offset(y)?,
            self.tile_size,
            self.tile_size,
        ))
    }

    /// Grid coordinate under a pixel position in the texture
    pub fn coord_at_px(&self, px: f32, py: f32) -> Option<[u32; 2]> {
        if !px.is_finite() || !py.is_finite() {
            return None;
        }
        let stride = self.tile_size as f64 + self.spacing as f64;
        let [x, y] = [px as f64 - self.padding as f64, py as f64 - self.padding as f64];
        if stride <= 0.0 || x < 0.0 || y < 0.0 {
            return None;
        }
        let [cx, cy] = [(x / stride).floor(), (y / stride).floor()];
        if cx >= self.tile_count_x as f64 || cy >= self.tile_count_y as f64 {
            return None;
        }
        Some([cx as u32, cy as u32])
    }
}

/// Immutable description of one tile, shared by every stack that uses it
#[derive(Debug, Clone)]
pub struct TileDefinition<S> {
    pub id: u32,
    /// Grid coordinate in the tileset
    pub coord: [u32; 2],
    pub sprite: S,
    /// Name of the animation that replaced the static sprite
    pub animation: Option<String>,
    /// Enum tags applied to this tile
    pub tags: BTreeSet<String>,
    pub collider: Option<TileCollider>,
    /// Every `key: value` line of the tile's custom data
    pub attributes: HashMap<String, String>,
}

impl<S> TileDefinition<S> {
    /// Custom data value for `key`, or `""` if absent
    pub fn attribute(&self, key: &str) -> &str {
        self.attributes.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }
}

/// All tile definitions of one tileset, indexed by id and by grid coordinate
#[derive(Debug, Clone)]
pub struct TilesetCatalog<S> {
    identifier: String,
    layout: TilesetLayout,
    definitions: Vec<Arc<TileDefinition<S>>>,
}

impl<S: Clone> TilesetCatalog<S> {
    /// Build a definition for every tile of the layout.
    ///
    /// Custom data entries are applied in order; entries naming an id outside
    /// the tileset are logged and skipped. `classify` maps enum tags to
    /// collision classifications for tiles that declare a collider.
    pub fn build<P, C>(
        identifier: impl Into<String>,
        layout: TilesetLayout,
        enum_tags: &[EnumTagSource],
        custom_data: &[CustomDataSource],
        sprites: &P,
        classify: C,
    ) -> Self
    where
        P: SpriteSource<Sprite = S>,
        C: Fn(&str) -> Option<i32>,
    {
        let identifier = identifier.into();

        if !layout.is_valid() {
            warn!(
                "Tileset '{}': {}x{} tiles of {}px do not fit a texture, registering no tiles",
                identifier, layout.tile_count_x, layout.tile_count_y, layout.tile_size
            );
        }

        let mut tags_by_id: HashMap<u32, BTreeSet<String>> = HashMap::new();
        for tag in enum_tags {
            for id in tag.tile_ids.iter().filter_map(|id| layout.checked_id(*id)) {
                tags_by_id.entry(id).or_default().insert(tag.value.clone());
            }
        }

        let mut definitions: Vec<TileDefinition<S>> = (0..layout.tile_count())
            .map(|id| {
                let [x, y] = [id % layout.tile_count_x, id / layout.tile_count_x];
                TileDefinition {
                    id,
                    coord: [x, y],
                    sprite: sprites.atlas_region(layout.region(x, y).unwrap_or_default()),
                    animation: None,
                    tags: tags_by_id.remove(&id).unwrap_or_default(),
                    collider: None,
                    attributes: HashMap::new(),
                }
            })
            .collect();

        for entry in custom_data {
            let Some(definition) = layout
                .checked_id(entry.tile_id)
                .and_then(|id| definitions.get_mut(id as usize))
            else {
                warn!(
                    "Tileset '{}': custom data for tile {} is outside the tileset, ignoring",
                    identifier, entry.tile_id
                );
                continue;
            };
            apply_custom_data(definition, &entry.data, layout.tile_size, sprites, &classify);
        }

        info!(
            "Tileset '{}' registered with {} tiles",
            identifier,
            definitions.len()
        );

        Self {
            identifier,
            layout,
            definitions: definitions.into_iter().map(Arc::new).collect(),
        }
    }

    /// Build from a deserialized tileset definition
    pub fn from_source<P, C>(source: &TilesetSource, sprites: &P, classify: C) -> Self
    where
        P: SpriteSource<Sprite = S>,
        C: Fn(&str) -> Option<i32>,
    {
        Self::build(
            source.identifier.clone(),
            TilesetLayout::new(source.tile_count_x, source.tile_count_y, source.tile_size)
                .with_spacing(source.padding, source.spacing),
            &source.enum_tags,
            &source.custom_data,
            sprites,
            classify,
        )
    }
}

impl<S> TilesetCatalog<S> {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn layout(&self) -> TilesetLayout {
        self.layout
    }

    pub fn tile_size(&self) -> u32 {
        self.layout.tile_size
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definition by tile id
    pub fn get(&self, id: u32) -> Option<&Arc<TileDefinition<S>>> {
        self.definitions.get(id as usize)
    }

    /// Definition by grid coordinate in the tileset
    pub fn get_at(&self, x: u32, y: u32) -> Option<&Arc<TileDefinition<S>>> {
        self.get(self.layout.id_at(x, y)?)
    }

    /// Definition under a pixel position in the tileset texture
    pub fn get_local(&self, px: f32, py: f32) -> Option<&Arc<TileDefinition<S>>> {
        let [x, y] = self.tile_coord_local(px, py)?;
        self.get_at(x, y)
    }

    /// Grid coordinate under a pixel position in the tileset texture
    pub fn tile_coord_local(&self, px: f32, py: f32) -> Option<[u32; 2]> {
        self.layout.coord_at_px(px, py)
    }

    /// Grid coordinate of a tile id
    pub fn tile_coord(&self, id: u32) -> Option<[u32; 2]> {
        self.layout.coord_of(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TileDefinition<S>>> {
        self.definitions.iter()
    }
}

fn apply_custom_data<S, P, C>(
    definition: &mut TileDefinition<S>,
    blob: &str,
    tile_size: u32,
    sprites: &P,
    classify: &C,
) where
    P: SpriteSource<Sprite = S>,
    C: Fn(&str) -> Option<i32>,
{
    for (key, value) in custom_data::parse_lines(definition.id, blob) {
        definition
            .attributes
            .insert(key.to_string(), value.to_string());

        match BuiltinKey::from_key(key) {
            Some(BuiltinKey::Collider) => {
                definition.collider = custom_data::parse_collider(value, tile_size as f32)
                    .map(|shape| {
                        let tags = definition.tags.iter();
                        TileCollider::new(shape).with_tags(tags.filter_map(|t| classify(t.as_str())))
                    });
            }
            Some(BuiltinKey::Animation) => {
                if value.is_empty() {
                    continue;
                }
                match sprites.animation(value) {
                    Some(sprite) => {
                        definition.sprite = sprite;
                        definition.animation = Some(value.to_string());
                    }
                    None => warn!(
                        "Tile {}: animation '{}' not found, keeping static sprite",
                        definition.id, value
                    ),
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColliderSpec;

    /// Sprites are plain descriptions so tests can compare them
    #[derive(Debug, Clone, PartialEq)]
    enum TestSprite {
        Region(PixelRect),
        Anim(String),
    }

    struct TestSprites;

    impl SpriteSource for TestSprites {
        type Sprite = TestSprite;

        fn atlas_region(&self, region: PixelRect) -> TestSprite {
            TestSprite::Region(region)
        }

        fn animation(&self, name: &str) -> Option<TestSprite> {
            (name != "missing").then(|| TestSprite::Anim(name.to_string()))
        }
    }

    fn classify(tag: &str) -> Option<i32> {
        match tag {
            "Solid" => Some(1),
            "Hazard" => Some(2),
            _ => None,
        }
    }

    fn custom(tile_id: i64, data: &str) -> CustomDataSource {
        CustomDataSource {
            tile_id,
            data: data.to_string(),
        }
    }

    fn build(custom_data: &[CustomDataSource]) -> TilesetCatalog<TestSprite> {
        let tags = vec![
            EnumTagSource {
                value: "Solid".to_string(),
                tile_ids: vec![0, 5],
            },
            EnumTagSource {
                value: "Decor".to_string(),
                tile_ids: vec![5, 99],
            },
        ];
        TilesetCatalog::build(
            "Test",
            TilesetLayout::new(4, 3, 16),
            &tags,
            custom_data,
            &TestSprites,
            classify,
        )
    }

    #[test]
    fn test_ids_are_row_major_with_matching_regions() {
        let catalog = build(&[]);
        assert_eq!(catalog.len(), 12);

        for i in 0..12u32 {
            let def = catalog.get(i).unwrap();
            assert_eq!(def.id, i);
            assert_eq!(
                def.sprite,
                TestSprite::Region(PixelRect::new((i % 4) * 16, (i / 4) * 16, 16, 16))
            );
        }
        assert_eq!(catalog.get_at(1, 2).unwrap().id, 9);
        assert!(catalog.get(12).is_none());
        assert!(catalog.get_at(4, 0).is_none());
    }

    #[test]
    fn test_tags_join_on_id() {
        let catalog = build(&[]);
        let tile = catalog.get(5).unwrap();
        assert!(tile.has_tag("Solid"));
        assert!(tile.has_tag("Decor"));
        assert_eq!(catalog.get(0).unwrap().tags.len(), 1);
        assert!(catalog.get(1).unwrap().tags.is_empty());
    }

    #[test]
    fn test_collider_gets_classifications() {
        let catalog = build(&[custom(5, "collider: FULL"), custom(1, "collider: CIRCLE 4 4 2")]);

        let solid = catalog.get(5).unwrap().collider.as_ref().unwrap();
        assert_eq!(solid.shape, ColliderSpec::rectangle(0.0, 0.0, 16.0, 16.0));
        assert_eq!(solid.tags.iter().copied().collect::<Vec<_>>(), vec![1]);

        let untagged = catalog.get(1).unwrap().collider.as_ref().unwrap();
        assert_eq!(untagged.shape, ColliderSpec::circle(4.0, 4.0, 2.0));
        assert!(untagged.tags.is_empty());
    }

    #[test]
    fn test_malformed_line_does_not_abort_blob() {
        let catalog = build(&[custom(2, "foobar\ncollider: FULL")]);
        let tile = catalog.get(2).unwrap();
        assert!(tile.collider.is_some());
        assert_eq!(tile.attributes.len(), 1);
    }

    #[test]
    fn test_bad_geometry_leaves_no_collider_but_keeps_attribute() {
        let catalog = build(&[custom(3, "collider: RECT 1 2 3\nfriction: 0.5")]);
        let tile = catalog.get(3).unwrap();
        assert!(tile.collider.is_none());
        assert_eq!(tile.attribute("collider"), "RECT 1 2 3");
        assert_eq!(tile.attribute("friction"), "0.5");
        assert_eq!(tile.attribute("missing"), "");
    }

    #[test]
    fn test_animation_replaces_sprite() {
        let catalog = build(&[
            custom(4, "anim: torch"),
            custom(6, "anim:"),
            custom(7, "anim: missing"),
        ]);

        let torch = catalog.get(4).unwrap();
        assert_eq!(torch.sprite, TestSprite::Anim("torch".to_string()));
        assert!(torch.is_animated());

        let empty = catalog.get(6).unwrap();
        assert!(matches!(empty.sprite, TestSprite::Region(_)));
        assert_eq!(empty.attribute("anim"), "");

        let missing = catalog.get(7).unwrap();
        assert!(matches!(missing.sprite, TestSprite::Region(_)));
        assert!(!missing.is_animated());
    }

    #[test]
    fn test_out_of_range_custom_data_is_ignored() {
        let catalog = build(&[custom(12, "collider: FULL"), custom(-1, "collider: FULL")]);
        assert!(catalog.iter().all(|def| def.collider.is_none()));
    }

    #[test]
    fn test_local_lookup() {
        let catalog = build(&[]);
        assert_eq!(catalog.get_local(17.0, 33.0).unwrap().id, 9);
        assert!(catalog.get_local(-1.0, 0.0).is_none());
        assert!(catalog.get_local(64.0, 0.0).is_none());
        assert_eq!(catalog.tile_coord(11), Some([3, 2]));
    }

    #[test]
    fn test_non_finite_positions_miss() {
        let catalog = build(&[]);
        assert!(catalog.get_local(f32::NAN, f32::NAN).is_none());
        assert!(catalog.get_local(0.0, f32::INFINITY).is_none());
    }

    #[test]
    fn test_padded_layout_regions() {
        let layout = TilesetLayout::new(3, 2, 16).with_spacing(2, 1);
        assert_eq!(layout.region(0, 0), Some(PixelRect::new(2, 2, 16, 16)));
        assert_eq!(layout.region(2, 1), Some(PixelRect::new(36, 19, 16, 16)));

        assert_eq!(layout.coord_at_px(36.0, 19.0), Some([2, 1]));
        assert_eq!(layout.coord_at_px(1.0, 5.0), None);
        assert_eq!(layout.coord_at_px(60.0, 5.0), None);
    }

    #[test]
    fn test_oversized_layouts_hold_no_tiles() {
        let huge = TilesetLayout::new(70000, 70000, 16);
        assert!(!huge.is_valid());
        assert_eq!(huge.tile_count(), 0);
        assert_eq!(huge.checked_id(5), None);
        assert_eq!(huge.id_at(1, 1), None);

        let wide = TilesetLayout::new(3, 1, 3_000_000_000);
        assert!(!wide.is_valid());
        assert_eq!(wide.region(2, 0), None);

        let catalog = TilesetCatalog::build("Huge", wide, &[], &[], &TestSprites, classify);
        assert!(catalog.is_empty());
        assert!(catalog.get_at(0, 0).is_none());
    }
}
