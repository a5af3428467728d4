// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Fixed locations and bit layouts of the H.E.R.O. data inside the MSX ROM.

use static_assertions::const_assert;

/// Number of screens in the game.  Each screen is addressed by an absolute
/// index 0-255.
pub const SCREEN_COUNT: usize = 256;

/// Number of bytes describing one screen, one from each screen table.
pub const SCREEN_DATA_LEN: usize = 8;

/// Number of levels in the game.
pub const LEVEL_COUNT: usize = 20;

/// ROM offsets of the 8 screen tables.  Each table is 256 bytes long, holding
/// one byte for every screen, so a screen is defined by one byte from each
/// table.
pub const SCREEN_TABLE_OFFSETS: [u64; SCREEN_DATA_LEN] = [
    0x37F6, 0x38F6, 0x39F6, 0x3AF6, 0x3BF6, 0x3CF6, 0x3DF6, 0x3EF6,
];

/// ROM offsets of the 4 messages cycled on the title screen.
pub const TITLE_MESSAGE_OFFSETS: [u64; TITLE_MESSAGE_COUNT] = [
    0x2309, // H.E.R.O.TM
    0x2329, // DESIGNED BY JOHN VAN RYZIN
    0x2349, // ADAPTED BY THE SOFTWORKS
    0x2369, // COPYRIGHT 1984 ACTIVISION
];

/// Number of title screen message slots.
pub const TITLE_MESSAGE_COUNT: usize = 4;

/// Length of each title screen message, in characters.
pub const TITLE_MESSAGE_LEN: usize = 32;

/// ROM offset of the 20 byte table holding each level's initial (absolute)
/// screen.
pub const LEVEL_INITIAL_SCREEN_OFFSET: u64 = 0x37CE;

/// ROM offset of the 20 byte table holding each level's screen count.  The
/// count is stored minus one, i.e. level 2 has 4 screens and a stored value
/// of 3.
pub const LEVEL_SCREEN_COUNT_OFFSET: u64 = 0x37E2;

/// Smallest file which contains every table this editor touches.
pub const MIN_ROM_SIZE: u64 = SCREEN_TABLE_OFFSETS[SCREEN_DATA_LEN - 1] + SCREEN_COUNT as u64;

const_assert!(LEVEL_INITIAL_SCREEN_OFFSET + LEVEL_COUNT as u64 == LEVEL_SCREEN_COUNT_OFFSET);
const_assert!(LEVEL_SCREEN_COUNT_OFFSET + LEVEL_COUNT as u64 == SCREEN_TABLE_OFFSETS[0]);
const_assert!(
    TITLE_MESSAGE_OFFSETS[TITLE_MESSAGE_COUNT - 1] + (TITLE_MESSAGE_LEN as u64)
        <= LEVEL_INITIAL_SCREEN_OFFSET
);

// Index of each byte within the 8 bytes of screen data
pub const BYTE_ENEMY_LOW: usize = 0; // pos.: xxxxxx__  type: ______xx
pub const BYTE_ENEMY_MID: usize = 1; // pos.: xxxxxx__  type: ______xx
pub const BYTE_LANTERN: usize = 2; // pos.: xxxxxx__  ?: ______x_  r_to_l: _______x
pub const BYTE_LATERAL_MID: usize = 3; // terrain: xxxxxxxx
pub const BYTE_LATERAL_LOW: usize = 4; // terrain: xxxxxxxx
pub const BYTE_CENTER_MID: usize = 5; // terrain: xxxxxxxx
pub const BYTE_CENTER_LOW: usize = 6; // terrain: xxxxxxxx
pub const BYTE_WALL: usize = 7; // wall/gaps: xxxxxx__  magma: ______x_  alt_r: _______x

/// Human readable names of the 8 screen bytes, in byte order.
pub const SCREEN_BYTE_NAMES: [&str; SCREEN_DATA_LEN] = [
    "ENEMY LOWER",
    "ENEMY MIDDLE",
    "LANTERN",
    "MIDDLE LATERAL TERRAIN",
    "LOWER LATERAL TERRAIN",
    "MIDDLE CENTER TERRAIN",
    "LOWER CENTER TERRAIN",
    "WALL & MISC",
];

/// Mask of the position field in enemy, lantern and wall bytes.
pub const POSITION_MASK: u8 = 0b1111_1100;

/// Mask of the enemy type field in enemy bytes.
pub const ENEMY_TYPE_MASK: u8 = 0b0000_0011;

/// Magma flag, in the wall byte.
pub const MAGMA_BIT: u8 = 0b0000_0010;

/// Alternative right side flag, in the wall byte.
pub const ALT_RIGHTSIDE_BIT: u8 = 0b0000_0001;

/// Right to left flag, in the lantern byte.
pub const RIGHT_TO_LEFT_BIT: u8 = 0b0000_0001;

/// Object position used to hide the lantern or an enemy.
pub const OBJECT_HIDDEN_POS: u8 = 36;

/// Highest object position used by the game.
pub const OBJECT_MAX_POS: u8 = 39;

/// Range of positions in which a wall (or a visible object) is placed.
pub const WALL_MIN_POS: u8 = 4;
pub const WALL_MAX_POS: u8 = 35;

/// Wall position the game uses for the wall of every initial screen.
pub const INITIAL_SCREEN_WALL_POS: u8 = 15;
