// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Objects of a screen: the two enemies, the lantern and the wall.
//!
//! An object byte holds the object position (0-39) in its 6 most significant
//! bits.  Enemy bytes hold the enemy type in the 2 least significant bits.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::tables::{
    BYTE_ENEMY_LOW, BYTE_ENEMY_MID, BYTE_LANTERN, BYTE_WALL, ENEMY_TYPE_MASK,
    OBJECT_HIDDEN_POS, WALL_MAX_POS, WALL_MIN_POS,
};

/// Returns the object position held in an object byte.
pub fn position_from_byte(byte: u8) -> u8 {
    byte >> 2
}

/// Returns the object byte for a position.  Only the low 6 bits of the
/// position are kept.
pub fn byte_from_position(position: u8) -> u8 {
    position << 2
}

/// Returns the enemy type held in an enemy byte.
pub fn enemy_type_from_byte(byte: u8) -> u8 {
    byte & ENEMY_TYPE_MASK
}

/// Returns the enemy type bits for an enemy type.
pub fn enemy_type_to_byte(enemy_type: u8) -> u8 {
    enemy_type & ENEMY_TYPE_MASK
}

/// Builds an enemy byte from its position and type.
pub fn enemy_byte(position: u8, enemy_type: u8) -> u8 {
    byte_from_position(position) | enemy_type_to_byte(enemy_type)
}

/// Column of the terminal preview (64 columns wide, 2 columns per MSX tile)
/// at which an object at `position` is drawn.
pub fn position_to_screen_pos(position: u8) -> usize {
    position as usize * 3 / 2 + 2
}

/// Type of enemy, as held in the 2 low bits of an enemy byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Spider = 0,
    Bat = 1,
    Moth = 2,
    Snake = 3,
}

impl EnemyKind {
    pub fn from_bits(bits: u8) -> Self {
        match bits & ENEMY_TYPE_MASK {
            0 => EnemyKind::Spider,
            1 => EnemyKind::Bat,
            2 => EnemyKind::Moth,
            _ => EnemyKind::Snake,
        }
    }

    pub fn bits(&self) -> u8 {
        *self as u8
    }

    /// The enemy type following this one, wrapping from snake to spider.
    pub fn next(&self) -> Self {
        EnemyKind::from_bits(self.bits().wrapping_add(1))
    }

    pub fn try_from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spider" | "0" => Some(EnemyKind::Spider),
            "bat" | "1" => Some(EnemyKind::Bat),
            "moth" | "2" => Some(EnemyKind::Moth),
            "snake" | "3" => Some(EnemyKind::Snake),
            _ => None,
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnemyKind::Spider => write!(f, "spider"),
            EnemyKind::Bat => write!(f, "bat"),
            EnemyKind::Moth => write!(f, "moth"),
            EnemyKind::Snake => write!(f, "snake"),
        }
    }
}

/// One of the four positioned objects of a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectSlot {
    Lantern,
    Wall,
    EnemyMid,
    EnemyLow,
}

impl ObjectSlot {
    /// Index of the byte holding this object within the screen data.
    pub fn byte_index(&self) -> usize {
        match self {
            ObjectSlot::Lantern => BYTE_LANTERN,
            ObjectSlot::Wall => BYTE_WALL,
            ObjectSlot::EnemyMid => BYTE_ENEMY_MID,
            ObjectSlot::EnemyLow => BYTE_ENEMY_LOW,
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, ObjectSlot::EnemyMid | ObjectSlot::EnemyLow)
    }

    /// Moves an object position by `delta`, following the game's placement
    /// rules.
    ///
    /// A wall lives in 4-35, with 0 meaning no wall: stepping left from 4
    /// lands on 0, stepping left again wraps to 35, and stepping right from 0
    /// lands on 4.
    ///
    /// Other objects live in 4-35, with 36 meaning hidden: stepping right from
    /// 36 lands on 4 and stepping off either end hides the object.
    pub fn step(&self, position: u8, delta: i8) -> u8 {
        let moved = position as i16 + delta as i16;
        let in_range = (WALL_MIN_POS as i16..=WALL_MAX_POS as i16).contains(&moved);
        match self {
            ObjectSlot::Wall => match moved {
                1 => WALL_MIN_POS,
                -1 => WALL_MAX_POS,
                _ if in_range => moved as u8,
                _ => 0,
            },
            _ => match moved {
                37 => WALL_MIN_POS,
                _ if in_range => moved as u8,
                _ => OBJECT_HIDDEN_POS,
            },
        }
    }
}

impl fmt::Display for ObjectSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectSlot::Lantern => write!(f, "Lantern"),
            ObjectSlot::Wall => write!(f, "Wall"),
            ObjectSlot::EnemyMid => write!(f, "Middle enemy"),
            ObjectSlot::EnemyLow => write!(f, "Lower enemy"),
        }
    }
}
