// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! JSON import and export of the level layout.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use hero_common::tables::LEVEL_COUNT;
use hero_common::topology::LevelLayout;
use hero_rom::store::MAX_LEVEL_SCREEN_COUNT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutFile {
    pub levels: Vec<LevelEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEntry {
    /// Level, 1-20
    pub level: u8,
    pub initial_screen: u8,
    pub screen_count: u16,
}

impl LayoutFile {
    pub fn from_layout(layout: &LevelLayout) -> Self {
        let levels = layout
            .initial_screens
            .iter()
            .zip(layout.screen_count.iter())
            .enumerate()
            .map(|(index, (&initial_screen, &screen_count))| LevelEntry {
                level: index as u8 + 1,
                initial_screen,
                screen_count,
            })
            .collect();
        Self { levels }
    }

    /// Converts back to a layout.  Requires exactly one entry for each of
    /// the 20 levels, in any order, each with 1-256 screens.  Overlapping
    /// levels are allowed.
    pub fn to_layout(&self) -> Result<LevelLayout, String> {
        if self.levels.len() != LEVEL_COUNT {
            return Err(format!(
                "Expected {} levels, found {}",
                LEVEL_COUNT,
                self.levels.len()
            ));
        }

        let mut seen = [false; LEVEL_COUNT];
        let mut layout = LevelLayout::original();
        for entry in &self.levels {
            let index = match entry.level as usize {
                level @ 1..=LEVEL_COUNT => level - 1,
                level => {
                    return Err(format!(
                        "Invalid level {}, must be 1-{}",
                        level, LEVEL_COUNT
                    ));
                }
            };
            if seen[index] {
                return Err(format!("Level {} listed more than once", entry.level));
            }
            seen[index] = true;

            if entry.screen_count == 0 || entry.screen_count > MAX_LEVEL_SCREEN_COUNT {
                return Err(format!(
                    "Level {} has {} screens, must be 1-{}",
                    entry.level, entry.screen_count, MAX_LEVEL_SCREEN_COUNT
                ));
            }
            layout.initial_screens[index] = entry.initial_screen;
            layout.screen_count[index] = entry.screen_count;
        }

        Ok(layout)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse layout file {}", path.display()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize layout")?;
        fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write layout file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.json");

        let mut layout = LevelLayout::original();
        layout.initial_screens[19] = 200;
        layout.screen_count[19] = 56;
        LayoutFile::from_layout(&layout).save(&path).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"initial_screen\": 200"));

        let loaded = LayoutFile::load(&path).unwrap().to_layout().unwrap();
        assert_eq!(loaded, layout);
    }

    #[test]
    fn test_wrong_level_count() {
        let mut file = LayoutFile::from_layout(&LevelLayout::original());
        file.levels.pop();
        assert_eq!(
            file.to_layout(),
            Err("Expected 20 levels, found 19".to_string())
        );
    }

    #[test]
    fn test_invalid_entries() {
        let mut file = LayoutFile::from_layout(&LevelLayout::original());
        file.levels[3].screen_count = 0;
        assert!(file.to_layout().unwrap_err().contains("Level 4 has 0 screens"));

        let mut file = LayoutFile::from_layout(&LevelLayout::original());
        file.levels[3].screen_count = 257;
        assert!(file.to_layout().is_err());

        let mut file = LayoutFile::from_layout(&LevelLayout::original());
        file.levels[3].level = 1;
        assert!(file.to_layout().unwrap_err().contains("more than once"));

        let mut file = LayoutFile::from_layout(&LevelLayout::original());
        file.levels[3].level = 21;
        assert!(file.to_layout().is_err());
    }

    #[test]
    fn test_overlap_and_order_allowed() {
        let mut file = LayoutFile::from_layout(&LevelLayout::original());
        file.levels.reverse();
        file.levels[0].initial_screen = 0;
        file.levels[0].screen_count = 256;
        let layout = file.to_layout().unwrap();
        assert_eq!(layout.initial_screens[19], 0);
        assert_eq!(layout.screen_count[19], 256);
        assert_eq!(layout.initial_screens[0], 0);
    }

    #[test]
    fn test_load_bad_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ \"levels\": 3 }").unwrap();
        let err = LayoutFile::load(&path).unwrap_err();
        assert!(format!("{}", err).contains("Failed to parse layout file"));
    }
}
