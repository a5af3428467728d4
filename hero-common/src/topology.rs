// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Level topology: how the 256 screens are grouped into the 20 levels.
//!
//! Each level is a run of consecutive screens, given by its initial
//! (absolute) screen and its screen count.  Nothing stops two levels from
//! overlapping, or a screen from belonging to no level at all, so every
//! lookup here may fail to locate a screen.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::tables::{LEVEL_COUNT, SCREEN_COUNT};

/// Initial screen of each level in the shipped game.
pub const ORIGINAL_LEVEL_INITIAL_SCREENS: [u8; LEVEL_COUNT] = [
    0, 2, 6, 12, 20, 28, 38, 50, 64, 80, 96, 112, 128, 144, 160, 176, 192, 208, 224, 240,
];

/// Screen count of each level in the shipped game.
pub const ORIGINAL_LEVEL_SCREEN_COUNT: [u16; LEVEL_COUNT] = [
    2, 4, 6, 8, 8, 10, 12, 14, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16,
];

/// Screens left through their left side, by level.
pub const LEFTWARDS_SCREENS: &[u8] = &[
    21, // level 5
    60, 61, 62, // level 8
    90, 91, 92, 93, 94, // level 10
    122, 123, 124, 125, 126, // level 12
    137, 138, 139, 140, 141, 142, // level 13
    146, // level 14
    171, 172, 173, 174, 175, // level 15
    199, 202, 203, 204, 205, 206, // level 17
    234, 235, 236, 237, 238, // level 19
];

/// Screens left through their right side, by level.
pub const RIGHTWARDS_SCREENS: &[u8] = &[
    48, // level 7
    74, 75, 76, 77, 78, // level 9
    106, 107, 108, 109, 110, // level 11
    114, 119, // level 12
    134, // level 13
    147, 151, 154, 155, 156, 157, 158, // level 14
    177, 186, 187, 188, 189, 190, // level 16
    209, 218, 219, 220, 221, 222, // level 18
    250, 251, 252, 253, 254, // level 20
];

/// Level screen from which a screen has water at the bottom.
pub const WATER_LEVEL_SCREEN: u16 = 11;

/// A screen's place within the game, as the player sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelScreen {
    /// Level, 1-20
    pub level: u8,
    /// Screen within the level, from 1
    pub screen: u16,
}

impl fmt::Display for LevelScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {} screen {}", self.level, self.screen)
    }
}

/// Locates an absolute screen within the levels.  The first level whose
/// range holds the screen wins.  Returns `None` when no level holds it.
pub fn level_and_screen_of(
    abs_screen: usize,
    initial: &[u8],
    count: &[u16],
) -> Option<LevelScreen> {
    initial
        .iter()
        .zip(count.iter())
        .enumerate()
        .find_map(|(level, (&initial, &count))| {
            let start = initial as usize;
            (start..start + count as usize)
                .contains(&abs_screen)
                .then(|| LevelScreen {
                    level: level as u8 + 1,
                    screen: (abs_screen - start + 1) as u16,
                })
        })
}

/// Final (absolute) screen of each level.  A count of 0 gives a final screen
/// before the initial one.
pub fn final_screens(initial: &[u8], count: &[u16]) -> Vec<i32> {
    initial
        .iter()
        .zip(count.iter())
        .map(|(&initial, &count)| initial as i32 + count as i32 - 1)
        .collect()
}

/// Display colour of a level's terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelColor {
    Yellow,
    Green,
    Blue,
    Grey,
    Unknown,
}

impl LevelColor {
    /// Colour of a 1-based level.  Anything outside 1-20 is unknown.
    pub fn of_level(level: Option<u8>) -> Self {
        match level {
            Some(level) if (1..=LEVEL_COUNT as u8).contains(&level) => match (level - 1) % 4 {
                0 => LevelColor::Yellow,
                1 => LevelColor::Green,
                2 => LevelColor::Blue,
                _ => LevelColor::Grey,
            },
            _ => LevelColor::Unknown,
        }
    }
}

impl fmt::Display for LevelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelColor::Yellow => write!(f, "yellow"),
            LevelColor::Green => write!(f, "green"),
            LevelColor::Blue => write!(f, "blue"),
            LevelColor::Grey => write!(f, "grey"),
            LevelColor::Unknown => write!(f, "unknown"),
        }
    }
}

/// How a screen is left by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenClass {
    Initial,
    Final,
    Leftward,
    Rightward,
    Downward,
}

impl ScreenClass {
    pub const ALL: [ScreenClass; 5] = [
        ScreenClass::Initial,
        ScreenClass::Final,
        ScreenClass::Downward,
        ScreenClass::Leftward,
        ScreenClass::Rightward,
    ];
}

impl fmt::Display for ScreenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenClass::Initial => write!(f, "initial"),
            ScreenClass::Final => write!(f, "final"),
            ScreenClass::Leftward => write!(f, "leftwards"),
            ScreenClass::Rightward => write!(f, "rightwards"),
            ScreenClass::Downward => write!(f, "downwards"),
        }
    }
}

pub fn is_leftwards_screen(abs_screen: usize) -> bool {
    LEFTWARDS_SCREENS.iter().any(|&s| s as usize == abs_screen)
}

pub fn is_rightwards_screen(abs_screen: usize) -> bool {
    RIGHTWARDS_SCREENS.iter().any(|&s| s as usize == abs_screen)
}

pub fn is_horizontal_screen(abs_screen: usize) -> bool {
    is_leftwards_screen(abs_screen) || is_rightwards_screen(abs_screen)
}

/// Initial screen and screen count of every level.
///
/// Counts are held as the real number of screens (1-256), not the count - 1
/// stored in the ROM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub initial_screens: [u8; LEVEL_COUNT],
    pub screen_count: [u16; LEVEL_COUNT],
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::original()
    }
}

impl LevelLayout {
    /// The layout of the shipped game.
    pub fn original() -> Self {
        Self {
            initial_screens: ORIGINAL_LEVEL_INITIAL_SCREENS,
            screen_count: ORIGINAL_LEVEL_SCREEN_COUNT,
        }
    }

    pub fn level_and_screen_of(&self, abs_screen: usize) -> Option<LevelScreen> {
        level_and_screen_of(abs_screen, &self.initial_screens, &self.screen_count)
    }

    pub fn final_screens(&self) -> Vec<i32> {
        final_screens(&self.initial_screens, &self.screen_count)
    }

    /// Final screen of one level, by 0-based index.
    pub fn final_screen(&self, level_index: usize) -> i32 {
        self.initial_screens[level_index] as i32 + self.screen_count[level_index] as i32 - 1
    }

    pub fn is_initial_screen(&self, abs_screen: usize) -> bool {
        self.initial_screens.iter().any(|&s| s as usize == abs_screen)
    }

    pub fn is_final_screen(&self, abs_screen: usize) -> bool {
        self.final_screens().iter().any(|&s| s == abs_screen as i32)
    }

    /// Classifies a screen.  Initial wins over final, which wins over the
    /// hand picked horizontal screens.
    pub fn classify(&self, abs_screen: usize) -> ScreenClass {
        if self.is_initial_screen(abs_screen) {
            ScreenClass::Initial
        } else if self.is_final_screen(abs_screen) {
            ScreenClass::Final
        } else if is_leftwards_screen(abs_screen) {
            ScreenClass::Leftward
        } else if is_rightwards_screen(abs_screen) {
            ScreenClass::Rightward
        } else {
            ScreenClass::Downward
        }
    }

    /// Screens of a class.  Leftward and rightward screens are the hand
    /// picked lists in full, even where a layout edit made them initial or
    /// final.
    pub fn screens_of_class(&self, class: ScreenClass) -> Vec<usize> {
        match class {
            ScreenClass::Leftward => LEFTWARDS_SCREENS.iter().map(|&s| s as usize).collect(),
            ScreenClass::Rightward => RIGHTWARDS_SCREENS.iter().map(|&s| s as usize).collect(),
            _ => (0..SCREEN_COUNT)
                .filter(|&s| self.classify(s) == class)
                .collect(),
        }
    }

    pub fn level_color(&self, abs_screen: usize) -> LevelColor {
        LevelColor::of_level(self.level_and_screen_of(abs_screen).map(|ls| ls.level))
    }

    /// Finds the level owning `abs_screen`, or the first screen after it
    /// that is owned by a level.  Returns the 0-based level index.
    pub fn owning_level_forward(&self, abs_screen: usize) -> Option<usize> {
        (abs_screen..SCREEN_COUNT)
            .find_map(|s| self.level_and_screen_of(s))
            .map(|ls| ls.level as usize - 1)
    }

    /// Finds the level owning `abs_screen`, or the last screen before it
    /// that is owned by a level.  Returns the 0-based level index.
    pub fn owning_level_backward(&self, abs_screen: usize) -> Option<usize> {
        (0..=abs_screen.min(SCREEN_COUNT - 1))
            .rev()
            .find_map(|s| self.level_and_screen_of(s))
            .map(|ls| ls.level as usize - 1)
    }

    /// Whether level `level_index` differs from the shipped game.
    pub fn differs_from_original(&self, level_index: usize) -> bool {
        self.initial_screens[level_index] != ORIGINAL_LEVEL_INITIAL_SCREENS[level_index]
            || self.screen_count[level_index] != ORIGINAL_LEVEL_SCREEN_COUNT[level_index]
    }
}
