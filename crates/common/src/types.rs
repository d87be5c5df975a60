use std::fmt;
use std::str::FromStr;

use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Material of a block. `Air` marks logical absence and is never drawn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Grass,
    Dirt,
    Stone,
    Wood,
    Leaves,
    Air,
}

impl BlockKind {
    pub const ALL: [BlockKind; 6] = [
        BlockKind::Grass,
        BlockKind::Dirt,
        BlockKind::Stone,
        BlockKind::Wood,
        BlockKind::Leaves,
        BlockKind::Air,
    ];

    pub const fn is_air(self) -> bool {
        matches!(self, BlockKind::Air)
    }

    /// Base palette color. `None` for air.
    pub const fn color(self) -> Option<Rgb> {
        match self {
            BlockKind::Grass => Some(Rgb::new(0x7C, 0xBD, 0x4F)),
            BlockKind::Dirt => Some(Rgb::new(0x8B, 0x45, 0x13)),
            BlockKind::Stone => Some(Rgb::new(0x7F, 0x7F, 0x7F)),
            BlockKind::Wood => Some(Rgb::new(0x8B, 0x5A, 0x2B)),
            BlockKind::Leaves => Some(Rgb::new(0x22, 0x8B, 0x22)),
            BlockKind::Air => None,
        }
    }

    /// Lowercase identifier, also accepted by `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            BlockKind::Grass => "grass",
            BlockKind::Dirt => "dirt",
            BlockKind::Stone => "stone",
            BlockKind::Wood => "wood",
            BlockKind::Leaves => "leaves",
            BlockKind::Air => "air",
        }
    }

    /// Human-facing label for HUD output.
    pub const fn display_name(self) -> &'static str {
        match self {
            BlockKind::Grass => "Grass",
            BlockKind::Dirt => "Dirt",
            BlockKind::Stone => "Stone",
            BlockKind::Wood => "Wood",
            BlockKind::Leaves => "Leaves",
            BlockKind::Air => "Air",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when text does not name a block kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block kind: {0:?}")]
pub struct ParseBlockKindError(pub String);

impl FromStr for BlockKind {
    type Err = ParseBlockKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        BlockKind::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| ParseBlockKindError(s.to_string()))
    }
}

/// A unit-cube voxel on the integer grid.
///
/// Blocks are plain values; once placed in a store they are never edited in
/// place, only removed and re-placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub pos: IVec3,
    pub kind: BlockKind,
}

impl Block {
    pub const fn new(x: i32, y: i32, z: i32, kind: BlockKind) -> Self {
        Self {
            pos: IVec3::new(x, y, z),
            kind,
        }
    }

    pub fn at(pos: IVec3, kind: BlockKind) -> Self {
        Self { pos, kind }
    }
}

/// 8-bit RGB color with clamped channel arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const SKY: Rgb = Rgb::new(0x87, 0xCE, 0xEB);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel by `factor`, saturating at 0 and 255.
    pub fn scale(self, factor: f32) -> Self {
        let ch = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Composite `over` on top of `self` with the given opacity in `[0, 1]`.
    pub fn blend(self, over: Rgb, alpha: f32) -> Self {
        let a = alpha.clamp(0.0, 1.0);
        let ch = |base: u8, top: u8| {
            (base as f32 + (top as f32 - base as f32) * a)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self::new(ch(self.r, over.r), ch(self.g, over.g), ch(self.b, over.b))
    }

    /// `#RRGGBB` encoding for string-based sinks.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_has_no_color() {
        assert!(BlockKind::Air.color().is_none());
        for kind in BlockKind::ALL.into_iter().filter(|k| !k.is_air()) {
            assert!(kind.color().is_some(), "{kind} should have a color");
        }
    }

    #[test]
    fn parse_block_kind() {
        assert_eq!("stone".parse::<BlockKind>(), Ok(BlockKind::Stone));
        assert_eq!(" Leaves ".parse::<BlockKind>(), Ok(BlockKind::Leaves));
        assert!("bedrock".parse::<BlockKind>().is_err());
    }

    #[test]
    fn hex_matches_palette() {
        assert_eq!(BlockKind::Grass.color().unwrap().to_hex(), "#7CBD4F");
        assert_eq!(BlockKind::Leaves.color().unwrap().to_hex(), "#228B22");
    }

    #[test]
    fn scale_clamps_channels() {
        let c = Rgb::new(200, 100, 0);
        assert_eq!(c.scale(2.0), Rgb::new(255, 200, 0));
        assert_eq!(c.scale(-1.0), Rgb::BLACK);
        assert_eq!(c.scale(0.5), Rgb::new(100, 50, 0));
    }

    #[test]
    fn blend_toward_black() {
        let c = Rgb::new(100, 200, 50);
        assert_eq!(c.blend(Rgb::BLACK, 0.1), Rgb::new(90, 180, 45));
        assert_eq!(c.blend(Rgb::WHITE, 0.0), c);
        assert_eq!(c.blend(Rgb::WHITE, 5.0), Rgb::WHITE);
    }

    #[test]
    fn block_serde_uses_lowercase_kind() {
        let kind: BlockKind = serde::Deserialize::deserialize(
            serde::de::value::StrDeserializer::<serde::de::value::Error>::new("wood"),
        )
        .unwrap();
        assert_eq!(kind, BlockKind::Wood);
    }
}
