// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Screen data: the 8 bytes describing one screen, and the bit fields packed
//! into them.

use core::fmt;
use deku::prelude::*;
use serde::{Deserialize, Serialize};

use crate::objects::{
    EnemyKind, ObjectSlot, byte_from_position, enemy_byte, enemy_type_from_byte,
    position_from_byte,
};
use crate::tables::{
    ALT_RIGHTSIDE_BIT, BYTE_CENTER_LOW, BYTE_CENTER_MID, BYTE_ENEMY_LOW, BYTE_ENEMY_MID,
    BYTE_LANTERN, BYTE_LATERAL_LOW, BYTE_LATERAL_MID, BYTE_WALL, ENEMY_TYPE_MASK, MAGMA_BIT,
    POSITION_MASK, RIGHT_TO_LEFT_BIT, SCREEN_DATA_LEN, WALL_MAX_POS, WALL_MIN_POS,
};
use crate::terrain::TerrainRow;

/// Enemy byte layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "big")]
pub struct EnemyDescriptor {
    #[deku(bits = "6")]
    pub position: u8,
    #[deku(bits = "2")]
    pub kind: u8,
}

/// Lantern byte layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "big")]
pub struct LanternDescriptor {
    #[deku(bits = "6")]
    pub position: u8,
    #[deku(bits = "1")]
    pub reserved: u8,
    #[deku(bits = "1")]
    pub right_to_left: bool,
}

/// Wall byte layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "big")]
pub struct WallDescriptor {
    #[deku(bits = "6")]
    pub position: u8,
    #[deku(bits = "1")]
    pub magma: bool,
    #[deku(bits = "1")]
    pub alt_rightside: bool,
}

macro_rules! descriptor_codec {
    ($ty:ident, $name:literal) => {
        impl $ty {
            /// Parses the descriptor from its byte.
            pub fn from_byte(byte: u8) -> Result<Self, String> {
                let data = [byte];
                Self::from_bytes((data.as_slice(), 0))
                    .map_err(|e| format!("Failed to parse {} byte: {}", $name, e))
                    .map(|(_, descriptor)| descriptor)
            }

            /// Packs the descriptor back into its byte.
            pub fn to_byte(&self) -> Result<u8, String> {
                let bytes = self
                    .to_bytes()
                    .map_err(|e| format!("Failed to write {} byte: {}", $name, e))?;
                bytes
                    .first()
                    .copied()
                    .ok_or_else(|| format!("Empty {} byte", $name))
            }
        }
    };
}

descriptor_codec!(EnemyDescriptor, "enemy");
descriptor_codec!(LanternDescriptor, "lantern");
descriptor_codec!(WallDescriptor, "wall");

/// Where the wall of a screen opens, derived from the wall byte.
///
/// In screens with water (level screen 11 and above) `None` means a gap at
/// both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SideGap {
    None = 0,
    AltRight = 1,
    Right = 2,
    Left = 3,
}

impl SideGap {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SideGap::None),
            1 => Some(SideGap::AltRight),
            2 => Some(SideGap::Right),
            3 => Some(SideGap::Left),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Next value when cycling through the gaps: none, right, left, none.
    /// Alt right moves on to right.
    pub fn cycle(&self) -> Self {
        match self {
            SideGap::None | SideGap::AltRight => SideGap::Right,
            SideGap::Right => SideGap::Left,
            SideGap::Left => SideGap::None,
        }
    }

    pub fn try_from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(SideGap::None),
            "alt-right" => Some(SideGap::AltRight),
            "right" => Some(SideGap::Right),
            "left" => Some(SideGap::Left),
            _ => None,
        }
    }
}

impl fmt::Display for SideGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideGap::None => write!(f, "none"),
            SideGap::AltRight => write!(f, "alt-right"),
            SideGap::Right => write!(f, "right"),
            SideGap::Left => write!(f, "left"),
        }
    }
}

/// A terrain area stored in the screen data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainBand {
    Middle,
    Lower,
}

impl TerrainBand {
    /// Indexes of the (lateral, center) bytes.
    pub fn byte_indexes(&self) -> (usize, usize) {
        match self {
            TerrainBand::Middle => (BYTE_LATERAL_MID, BYTE_CENTER_MID),
            TerrainBand::Lower => (BYTE_LATERAL_LOW, BYTE_CENTER_LOW),
        }
    }
}

/// The 8 bytes describing a screen, one from each screen table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScreenData(pub [u8; SCREEN_DATA_LEN]);

impl From<[u8; SCREEN_DATA_LEN]> for ScreenData {
    fn from(bytes: [u8; SCREEN_DATA_LEN]) -> Self {
        Self(bytes)
    }
}

impl ScreenData {
    pub fn bytes(&self) -> [u8; SCREEN_DATA_LEN] {
        self.0
    }

    pub fn byte(&self, index: usize) -> u8 {
        self.0[index]
    }

    pub fn object_position(&self, slot: ObjectSlot) -> u8 {
        position_from_byte(self.0[slot.byte_index()])
    }

    /// Sets an object position, keeping the low 2 bits of its byte.
    pub fn set_object_position(&mut self, slot: ObjectSlot, position: u8) {
        let index = slot.byte_index();
        self.0[index] = (self.0[index] & !POSITION_MASK) | byte_from_position(position);
    }

    /// Moves an object by `delta` following the placement rules of
    /// [`ObjectSlot::step`].
    pub fn step_object(&mut self, slot: ObjectSlot, delta: i8) {
        let position = slot.step(self.object_position(slot), delta);
        self.set_object_position(slot, position);
    }

    /// Enemy type of an enemy slot.  `None` for the lantern and wall.
    pub fn enemy_kind(&self, slot: ObjectSlot) -> Option<EnemyKind> {
        slot.is_enemy()
            .then(|| EnemyKind::from_bits(enemy_type_from_byte(self.0[slot.byte_index()])))
    }

    /// Sets the type of an enemy slot.  Ignored for the lantern and wall.
    pub fn set_enemy_kind(&mut self, slot: ObjectSlot, kind: EnemyKind) {
        if slot.is_enemy() {
            let index = slot.byte_index();
            self.0[index] = enemy_byte(position_from_byte(self.0[index]), kind.bits());
        }
    }

    /// Moves an enemy on to the next enemy type, keeping its position.
    pub fn cycle_enemy_kind(&mut self, slot: ObjectSlot) {
        if let Some(kind) = self.enemy_kind(slot) {
            self.set_enemy_kind(slot, kind.next());
        }
    }

    pub fn magma(&self) -> bool {
        self.0[BYTE_WALL] & MAGMA_BIT != 0
    }

    pub fn set_magma(&mut self, magma: bool) {
        set_flag(&mut self.0[BYTE_WALL], MAGMA_BIT, magma);
    }

    pub fn alt_rightside(&self) -> bool {
        self.0[BYTE_WALL] & ALT_RIGHTSIDE_BIT != 0
    }

    pub fn right_to_left(&self) -> bool {
        self.0[BYTE_LANTERN] & RIGHT_TO_LEFT_BIT != 0
    }

    pub fn set_right_to_left(&mut self, right_to_left: bool) {
        set_flag(&mut self.0[BYTE_LANTERN], RIGHT_TO_LEFT_BIT, right_to_left);
    }

    pub fn side_gap(&self) -> SideGap {
        match position_from_byte(self.0[BYTE_WALL]) {
            1..4 => SideGap::Right,
            36..64 => SideGap::Left,
            _ if self.alt_rightside() => SideGap::AltRight,
            _ => SideGap::None,
        }
    }

    /// Sets the side gap.  The wall position is reset to 1 for a right gap
    /// and 36 for a left gap, and is otherwise clamped into the wall range.
    /// The magma flag is kept.
    pub fn set_side_gap(&mut self, side_gap: SideGap) {
        let magma = self.0[BYTE_WALL] & MAGMA_BIT;
        let wall_pos = position_from_byte(self.0[BYTE_WALL]).clamp(WALL_MIN_POS, WALL_MAX_POS);
        let (position, alt) = match side_gap {
            SideGap::None => (wall_pos, 0),
            SideGap::AltRight => (wall_pos, ALT_RIGHTSIDE_BIT),
            SideGap::Right => (1, 0),
            SideGap::Left => (36, 0),
        };
        self.0[BYTE_WALL] = byte_from_position(position) | magma | alt;
    }

    /// Moves the side gap on to the next value, see [`SideGap::cycle`].
    pub fn cycle_side_gap(&mut self) {
        self.set_side_gap(self.side_gap().cycle());
    }

    /// Switches between the alt right side and no side gap.
    pub fn toggle_alt_rightside(&mut self) {
        let side_gap = match self.side_gap() {
            SideGap::AltRight => SideGap::None,
            _ => SideGap::AltRight,
        };
        self.set_side_gap(side_gap);
    }

    /// Decodes a terrain band.  The alt right side mode only applies to the
    /// middle band.
    pub fn terrain_row(&self, band: TerrainBand) -> TerrainRow {
        let (lateral, center) = band.byte_indexes();
        let alt = band == TerrainBand::Middle && self.alt_rightside();
        TerrainRow::from_bytes(self.0[lateral], self.0[center], alt)
    }

    /// Inverts a logical terrain bit (0-31) of a band, with its partner.
    pub fn toggle_terrain(&mut self, band: TerrainBand, bit: usize) {
        let mut row = self.terrain_row(band);
        row.toggle(bit);
        let (lateral, center) = band.byte_indexes();
        (self.0[lateral], self.0[center]) = row.to_bytes();
    }

    /// Decodes every field of the screen.
    pub fn decode(&self) -> Result<DecodedScreen, String> {
        Ok(DecodedScreen {
            enemy_low: EnemyDescriptor::from_byte(self.0[BYTE_ENEMY_LOW])?,
            enemy_mid: EnemyDescriptor::from_byte(self.0[BYTE_ENEMY_MID])?,
            lantern: LanternDescriptor::from_byte(self.0[BYTE_LANTERN])?,
            lateral_mid: self.0[BYTE_LATERAL_MID],
            lateral_low: self.0[BYTE_LATERAL_LOW],
            center_mid: self.0[BYTE_CENTER_MID],
            center_low: self.0[BYTE_CENTER_LOW],
            wall: WallDescriptor::from_byte(self.0[BYTE_WALL])?,
        })
    }

    /// Packs decoded fields back into screen data.
    pub fn encode(decoded: &DecodedScreen) -> Result<Self, String> {
        let mut bytes = [0; SCREEN_DATA_LEN];
        bytes[BYTE_ENEMY_LOW] = decoded.enemy_low.to_byte()?;
        bytes[BYTE_ENEMY_MID] = decoded.enemy_mid.to_byte()?;
        bytes[BYTE_LANTERN] = decoded.lantern.to_byte()?;
        bytes[BYTE_LATERAL_MID] = decoded.lateral_mid;
        bytes[BYTE_LATERAL_LOW] = decoded.lateral_low;
        bytes[BYTE_CENTER_MID] = decoded.center_mid;
        bytes[BYTE_CENTER_LOW] = decoded.center_low;
        bytes[BYTE_WALL] = decoded.wall.to_byte()?;
        Ok(Self(bytes))
    }
}

fn set_flag(byte: &mut u8, mask: u8, value: bool) {
    if value {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}

impl fmt::Display for ScreenData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ii, byte) in self.0.iter().enumerate() {
            if ii > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Every field of a screen, decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedScreen {
    pub enemy_low: EnemyDescriptor,
    pub enemy_mid: EnemyDescriptor,
    pub lantern: LanternDescriptor,
    pub lateral_mid: u8,
    pub lateral_low: u8,
    pub center_mid: u8,
    pub center_low: u8,
    pub wall: WallDescriptor,
}

impl DecodedScreen {
    pub fn enemy_low_kind(&self) -> EnemyKind {
        EnemyKind::from_bits(self.enemy_low.kind & ENEMY_TYPE_MASK)
    }

    pub fn enemy_mid_kind(&self) -> EnemyKind {
        EnemyKind::from_bits(self.enemy_mid.kind & ENEMY_TYPE_MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [[u8; SCREEN_DATA_LEN]; 4] = [
        [0x00; SCREEN_DATA_LEN],
        [0xFF; SCREEN_DATA_LEN],
        [0x93, 0x11, 0x91, 0xC0, 0x3C, 0x81, 0x7E, 0x3F],
        [0x4A, 0x9C, 0x2E, 0x00, 0xFF, 0x55, 0xAA, 0x06],
    ];

    #[test]
    fn test_descriptor_layouts() {
        let enemy = EnemyDescriptor::from_byte(0x93).unwrap();
        assert_eq!(enemy, EnemyDescriptor { position: 36, kind: 3 });

        let lantern = LanternDescriptor::from_byte(0x41).unwrap();
        assert_eq!(lantern.position, 16);
        assert_eq!(lantern.reserved, 0);
        assert!(lantern.right_to_left);

        let wall = WallDescriptor::from_byte(0x3E).unwrap();
        assert_eq!(wall.position, 15);
        assert!(wall.magma);
        assert!(!wall.alt_rightside);
        assert_eq!(wall.to_byte().unwrap(), 0x3E);
    }

    #[test]
    fn test_decode_encode_identity() {
        for sample in SAMPLES {
            let screen = ScreenData(sample);
            let decoded = screen.decode().unwrap();
            assert_eq!(ScreenData::encode(&decoded).unwrap(), screen);
            assert_eq!(decoded.enemy_low.position, screen.object_position(ObjectSlot::EnemyLow));
            assert_eq!(Some(decoded.enemy_mid_kind()), screen.enemy_kind(ObjectSlot::EnemyMid));
            assert_eq!(decoded.wall.magma, screen.magma());
            assert_eq!(decoded.wall.alt_rightside, screen.alt_rightside());
            assert_eq!(decoded.lantern.right_to_left, screen.right_to_left());
        }
    }

    #[test]
    fn test_decode_encode_every_byte_value() {
        for value in 0..=u8::MAX {
            let screen = ScreenData([
                value,
                value.rotate_left(1),
                value.rotate_left(2),
                value.rotate_left(3),
                value.rotate_left(4),
                value.rotate_left(5),
                value.rotate_left(6),
                value.rotate_left(7),
            ]);
            let decoded = screen.decode().unwrap();
            assert_eq!(ScreenData::encode(&decoded).unwrap(), screen, "value {:02X}", value);
        }
    }

    #[test]
    fn test_side_gap_get() {
        let gap = |wall: u8| ScreenData([0, 0, 0, 0, 0, 0, 0, wall]).side_gap();
        assert_eq!(gap(byte_from_position(0)), SideGap::None);
        assert_eq!(gap(byte_from_position(1)), SideGap::Right);
        assert_eq!(gap(byte_from_position(3) | ALT_RIGHTSIDE_BIT), SideGap::Right);
        assert_eq!(gap(byte_from_position(36)), SideGap::Left);
        assert_eq!(gap(byte_from_position(63)), SideGap::Left);
        assert_eq!(gap(byte_from_position(20) | ALT_RIGHTSIDE_BIT), SideGap::AltRight);
        assert_eq!(gap(byte_from_position(20) | MAGMA_BIT), SideGap::None);
    }

    #[test]
    fn test_side_gap_set_get() {
        for position in WALL_MIN_POS..=WALL_MAX_POS {
            for magma in [false, true] {
                for code in 0..4 {
                    let side_gap = SideGap::from_code(code).unwrap();
                    let mut screen = ScreenData::default();
                    screen.set_object_position(ObjectSlot::Wall, position);
                    screen.set_magma(magma);
                    screen.set_side_gap(side_gap);
                    assert_eq!(screen.side_gap(), side_gap);
                    assert_eq!(screen.magma(), magma);
                }
            }
        }
    }

    #[test]
    fn test_side_gap_set_positions() {
        let mut screen = ScreenData::default();
        screen.set_object_position(ObjectSlot::Wall, 20);
        screen.set_side_gap(SideGap::Right);
        assert_eq!(screen.object_position(ObjectSlot::Wall), 1);
        screen.set_side_gap(SideGap::Left);
        assert_eq!(screen.object_position(ObjectSlot::Wall), 36);
        screen.set_side_gap(SideGap::None);
        assert_eq!(screen.object_position(ObjectSlot::Wall), WALL_MAX_POS);
        screen.set_side_gap(SideGap::Right);
        screen.set_side_gap(SideGap::AltRight);
        assert_eq!(screen.object_position(ObjectSlot::Wall), WALL_MIN_POS);
        assert!(screen.alt_rightside());
    }

    #[test]
    fn test_side_gap_cycle() {
        let mut screen = ScreenData::default();
        screen.set_object_position(ObjectSlot::Wall, 10);
        screen.cycle_side_gap();
        assert_eq!(screen.side_gap(), SideGap::Right);
        screen.cycle_side_gap();
        assert_eq!(screen.side_gap(), SideGap::Left);
        screen.cycle_side_gap();
        assert_eq!(screen.side_gap(), SideGap::None);

        screen.toggle_alt_rightside();
        assert_eq!(screen.side_gap(), SideGap::AltRight);
        screen.toggle_alt_rightside();
        assert_eq!(screen.side_gap(), SideGap::None);

        screen.toggle_alt_rightside();
        screen.cycle_side_gap();
        assert_eq!(screen.side_gap(), SideGap::Right);
        assert!(!screen.alt_rightside());
    }

    #[test]
    fn test_flags() {
        let mut screen = ScreenData([0x90, 0, 0x90, 0, 0, 0, 0, 0x3C]);
        screen.set_magma(true);
        assert_eq!(screen.byte(BYTE_WALL), 0x3E);
        screen.set_magma(false);
        assert_eq!(screen.byte(BYTE_WALL), 0x3C);
        screen.set_right_to_left(true);
        assert_eq!(screen.byte(BYTE_LANTERN), 0x91);
        assert!(screen.right_to_left());
        screen.set_right_to_left(false);
        assert_eq!(screen.byte(BYTE_LANTERN), 0x90);
    }

    #[test]
    fn test_objects() {
        let mut screen = ScreenData([0x93, 0x10, 0x91, 0, 0, 0, 0, 0]);
        assert_eq!(screen.enemy_kind(ObjectSlot::EnemyLow), Some(EnemyKind::Snake));
        assert_eq!(screen.enemy_kind(ObjectSlot::Lantern), None);

        screen.cycle_enemy_kind(ObjectSlot::EnemyLow);
        assert_eq!(screen.byte(BYTE_ENEMY_LOW), 0x90);

        // Lantern keeps its right to left flag when moved
        screen.step_object(ObjectSlot::Lantern, 1);
        assert_eq!(screen.object_position(ObjectSlot::Lantern), 4);
        assert!(screen.right_to_left());

        screen.set_enemy_kind(ObjectSlot::EnemyMid, EnemyKind::Moth);
        assert_eq!(screen.byte(BYTE_ENEMY_MID), 0x12);
    }

    #[test]
    fn test_toggle_terrain() {
        let mut screen = ScreenData::default();
        screen.toggle_terrain(TerrainBand::Lower, 0);
        assert_eq!(screen.byte(BYTE_LATERAL_LOW), 0x80);
        assert_eq!(screen.byte(BYTE_LATERAL_MID), 0x00);

        // Alt right side applies to the middle band only
        screen.set_side_gap(SideGap::AltRight);
        let before = screen;
        screen.toggle_terrain(TerrainBand::Middle, 17);
        assert_eq!(screen, before);
        screen.toggle_terrain(TerrainBand::Lower, 17);
        assert_ne!(screen, before);
    }

    #[test]
    fn test_display() {
        let screen = ScreenData([0x93, 0x11, 0x91, 0xC0, 0x3C, 0x81, 0x7E, 0x3F]);
        assert_eq!(screen.to_string(), "93 11 91 C0 3C 81 7E 3F");
    }
}
