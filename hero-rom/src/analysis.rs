// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Summarises which byte values each class of screen uses, to help work out
//! what the bits of the screen data mean.

use std::collections::BTreeSet;
use std::io::{Read, Seek, Write};

use hero_common::tables::SCREEN_DATA_LEN;
use hero_common::topology::ScreenClass;

use crate::error::Result;
use crate::session::Session;

/// Distinct values of each of the 8 screen bytes over a class of screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAnalysis {
    pub class: ScreenClass,
    pub screens: Vec<usize>,
    pub values: [BTreeSet<u8>; SCREEN_DATA_LEN],
}

/// Analyses every class of screen, using the session's working layout and
/// pending edits.
pub fn analyze_screens<F: Read + Write + Seek>(
    session: &mut Session<F>,
) -> Result<Vec<ClassAnalysis>> {
    let layout = session.level_layout();
    ScreenClass::ALL
        .iter()
        .map(|&class| {
            let screens = layout.screens_of_class(class);
            let mut values: [BTreeSet<u8>; SCREEN_DATA_LEN] = Default::default();
            for &screen in &screens {
                let data = session.get_screen(screen as u8)?;
                for (set, byte) in values.iter_mut().zip(data.bytes()) {
                    set.insert(byte);
                }
            }
            Ok(ClassAnalysis {
                class,
                screens,
                values,
            })
        })
        .collect()
}
