// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

use std::path::PathBuf;

use hero_common::objects::{EnemyKind, ObjectSlot};
use hero_common::screen::{ScreenData, SideGap, TerrainBand};
use hero_common::tables::{OBJECT_MAX_POS, TITLE_MESSAGE_COUNT, TITLE_MESSAGE_LEN};
use hero_common::terrain::DATA_BITS;
use hero_rom::session::MOD_NAME_MAX_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rom: PathBuf,
    pub verbose: u8,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Info,
    Levels,
    Screen { screen: u8, json: bool },
    Edit { screen: u8, edits: Vec<ScreenEdit> },
    Message { slot: usize, set: Option<String> },
    ModName { set: Option<String> },
    Level { screen: u8, anchor: LevelAnchor },
    LayoutExport { file: PathBuf },
    LayoutImport { file: PathBuf },
    Analyze,
}

impl Command {
    /// Whether the command changes the ROM.
    pub fn writes(&self) -> bool {
        match self {
            Command::Edit { .. } | Command::Level { .. } | Command::LayoutImport { .. } => true,
            Command::Message { set, .. } | Command::ModName { set } => set.is_some(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelAnchor {
    Start,
    End,
}

/// A single change to a screen, applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEdit {
    Position { slot: ObjectSlot, position: u8 },
    EnemyKind { slot: ObjectSlot, kind: EnemyKind },
    Magma(bool),
    RightToLeft(bool),
    SideGap(SideGap),
    ToggleTerrain { band: TerrainBand, bit: usize },
}

impl ScreenEdit {
    pub fn apply(&self, data: &mut ScreenData) {
        match *self {
            ScreenEdit::Position { slot, position } => data.set_object_position(slot, position),
            ScreenEdit::EnemyKind { slot, kind } => data.set_enemy_kind(slot, kind),
            ScreenEdit::Magma(magma) => data.set_magma(magma),
            ScreenEdit::RightToLeft(right_to_left) => data.set_right_to_left(right_to_left),
            ScreenEdit::SideGap(side_gap) => data.set_side_gap(side_gap),
            ScreenEdit::ToggleTerrain { band, bit } => data.toggle_terrain(band, bit),
        }
    }
}

impl Config {
    pub fn validate(&mut self) -> Result<(), String> {
        if !self.rom.is_file() {
            return Err(format!("ROM file not found: {}", self.rom.display()));
        }

        match &mut self.command {
            Command::Edit { edits, .. } => {
                if edits.is_empty() {
                    return Err("No edits specified".to_string());
                }
                for edit in edits.iter() {
                    match *edit {
                        ScreenEdit::Position { slot, position } if position > OBJECT_MAX_POS => {
                            return Err(format!(
                                "{} position must be 0-{}, got {}",
                                slot, OBJECT_MAX_POS, position
                            ));
                        }
                        ScreenEdit::EnemyKind { slot, .. } if !slot.is_enemy() => {
                            return Err(format!("{} has no enemy type", slot));
                        }
                        ScreenEdit::ToggleTerrain { bit, .. } if bit >= DATA_BITS => {
                            return Err(format!(
                                "Terrain bit must be 0-{}, got {}",
                                DATA_BITS - 1,
                                bit
                            ));
                        }
                        _ => {}
                    }
                }
            }
            Command::Message { slot, set } => {
                if *slot >= TITLE_MESSAGE_COUNT {
                    return Err(format!(
                        "Message slot must be 0-{}, got {}",
                        TITLE_MESSAGE_COUNT - 1,
                        slot
                    ));
                }
                if let Some(text) = set {
                    let len = text.chars().count();
                    if len > TITLE_MESSAGE_LEN {
                        return Err(format!(
                            "Message must be at most {} characters, got {}",
                            TITLE_MESSAGE_LEN, len
                        ));
                    }
                    *text = format!("{:<width$}", text, width = TITLE_MESSAGE_LEN);
                }
            }
            Command::ModName { set: Some(name) } => {
                let len = name.chars().count();
                if len > MOD_NAME_MAX_LEN {
                    return Err(format!(
                        "Mod name must be at most {} characters, got {}",
                        MOD_NAME_MAX_LEN, len
                    ));
                }
            }
            Command::LayoutImport { file } => {
                if !file.is_file() {
                    return Err(format!("Layout file not found: {}", file.display()));
                }
            }
            _ => {}
        }

        Ok(())
    }
}
