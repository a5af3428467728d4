// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Reads and writes the H.E.R.O. tables at their fixed offsets within a ROM
//! image.
//!
//! The store does no caching and no retries.  Any I/O error is returned to
//! the caller as is.

use log::{debug, trace};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use hero_common::charset::{decode_message, encode_message};
use hero_common::screen::ScreenData;
use hero_common::tables::{
    LEVEL_COUNT, LEVEL_INITIAL_SCREEN_OFFSET, LEVEL_SCREEN_COUNT_OFFSET, MIN_ROM_SIZE,
    SCREEN_COUNT, SCREEN_DATA_LEN, SCREEN_TABLE_OFFSETS, TITLE_MESSAGE_COUNT,
    TITLE_MESSAGE_LEN, TITLE_MESSAGE_OFFSETS,
};
use hero_common::topology::LevelLayout;

use crate::error::{Result, RomError};

/// Largest number of screens a level can have.  The ROM stores the count
/// minus one in a byte.
pub const MAX_LEVEL_SCREEN_COUNT: u16 = SCREEN_COUNT as u16;

/// Access to the H.E.R.O. data within a ROM image
#[derive(Debug)]
pub struct RomStore<F> {
    inner: F,
}

impl RomStore<File> {
    /// Opens a ROM file for reading and writing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening ROM {}", path.display());
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::new(file)
    }

    /// Opens a ROM file for reading only.  Any write fails with an I/O
    /// error.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening ROM {} read only", path.display());
        Self::new(File::open(path)?)
    }
}

impl<F: Read + Write + Seek> RomStore<F> {
    /// Wraps a ROM image.  Fails if the image is too small to hold every
    /// table.
    pub fn new(mut inner: F) -> Result<Self> {
        let size = inner.seek(SeekFrom::End(0))?;
        if size < MIN_ROM_SIZE {
            return Err(RomError::RomTooSmall {
                size,
                required: MIN_ROM_SIZE,
            });
        }
        Ok(Self { inner })
    }

    pub fn into_inner(self) -> F {
        self.inner
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        trace!("Read {} byte(s) at 0x{:04X}", buf.len(), offset);
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(buf)?;
        Ok(())
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<()> {
        trace!("Write {} byte(s) at 0x{:04X}", buf.len(), offset);
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.write_all(buf)?;
        Ok(())
    }

    /// Reads the 8 bytes of a screen, one from each screen table.
    pub fn read_screen_bytes(&mut self, abs_screen: u8) -> Result<ScreenData> {
        let mut bytes = [0u8; SCREEN_DATA_LEN];
        for (byte, table) in bytes.iter_mut().zip(SCREEN_TABLE_OFFSETS) {
            let mut buf = [0u8; 1];
            self.read_at(table + abs_screen as u64, &mut buf)?;
            *byte = buf[0];
        }
        Ok(ScreenData(bytes))
    }

    /// Writes the 8 bytes of a screen, one to each screen table.
    pub fn write_screen_bytes(&mut self, abs_screen: u8, data: &ScreenData) -> Result<()> {
        debug!("Writing screen {}: {}", abs_screen, data);
        for (byte, table) in data.bytes().iter().zip(SCREEN_TABLE_OFFSETS) {
            self.write_at(table + abs_screen as u64, &[*byte])?;
        }
        Ok(())
    }

    fn check_slot(slot: usize) -> Result<u64> {
        if slot >= TITLE_MESSAGE_COUNT {
            return Err(RomError::InvalidMessageSlot(slot));
        }
        Ok(TITLE_MESSAGE_OFFSETS[slot])
    }

    /// Reads and decodes title message `slot` (0-3).
    pub fn read_title_message(&mut self, slot: usize) -> Result<String> {
        let offset = Self::check_slot(slot)?;
        let mut raw = [0u8; TITLE_MESSAGE_LEN];
        self.read_at(offset, &mut raw)?;
        Ok(decode_message(&raw))
    }

    /// Encodes and writes title message `slot` (0-3).  The text must be
    /// exactly 32 characters.  Characters without a glyph are written as
    /// spaces.
    pub fn write_title_message(&mut self, slot: usize, text: &str) -> Result<()> {
        let offset = Self::check_slot(slot)?;
        let len = text.chars().count();
        if len != TITLE_MESSAGE_LEN {
            return Err(RomError::InvalidMessageLength(len));
        }
        debug!("Writing title message {}: \"{}\"", slot, text);
        self.write_at(offset, &encode_message(text))
    }

    /// Reads the initial screen and screen count of every level.
    pub fn read_level_layout(&mut self) -> Result<LevelLayout> {
        let mut initial_screens = [0u8; LEVEL_COUNT];
        let mut stored_counts = [0u8; LEVEL_COUNT];
        self.read_at(LEVEL_INITIAL_SCREEN_OFFSET, &mut initial_screens)?;
        self.read_at(LEVEL_SCREEN_COUNT_OFFSET, &mut stored_counts)?;
        Ok(LevelLayout {
            initial_screens,
            screen_count: stored_counts.map(|count| count as u16 + 1),
        })
    }

    /// Writes the initial screen and screen count of every level.  Every
    /// count must be 1-256, and nothing is written if one is not.
    pub fn write_level_layout(&mut self, layout: &LevelLayout) -> Result<()> {
        let mut stored_counts = [0u8; LEVEL_COUNT];
        for (level, (&count, stored)) in layout
            .screen_count
            .iter()
            .zip(stored_counts.iter_mut())
            .enumerate()
        {
            if count == 0 || count > MAX_LEVEL_SCREEN_COUNT {
                return Err(RomError::InvalidScreenCount {
                    level: level + 1,
                    count,
                });
            }
            *stored = (count - 1) as u8;
        }
        debug!("Writing level layout");
        self.write_at(LEVEL_INITIAL_SCREEN_OFFSET, &layout.initial_screens)?;
        self.write_at(LEVEL_SCREEN_COUNT_OFFSET, &stored_counts)
    }

    /// Flushes pending writes to the underlying file.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}
