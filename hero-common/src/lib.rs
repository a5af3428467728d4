// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! hero-common
//!
//! Knowledge of how the MSX version of H.E.R.O. (Activision, 1984) stores its
//! screens, levels and title screen messages:
//! - [`tables`] - fixed ROM offsets and bit masks
//! - [`charset`] - the title message character set
//! - [`screen`], [`terrain`] and [`objects`] - the 8 bytes of screen data and
//!   the fields packed into them
//! - [`topology`] - how screens are grouped into levels
//!
//! Everything here is pure.  Reading and writing a ROM file lives in
//! `hero-rom`.

pub mod charset;
pub mod objects;
pub mod screen;
pub mod tables;
pub mod terrain;
pub mod topology;

pub use objects::{EnemyKind, ObjectSlot};
pub use screen::{DecodedScreen, ScreenData, SideGap, TerrainBand};
pub use terrain::TerrainRow;
pub use topology::{LevelColor, LevelLayout, LevelScreen, ScreenClass};
