// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

use thiserror::Error;

use hero_common::tables::{TITLE_MESSAGE_COUNT, TITLE_MESSAGE_LEN};

/// Errors reading or writing a H.E.R.O. ROM
#[derive(Debug, Error)]
pub enum RomError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ROM file too small: {size} bytes, at least {required} bytes required")]
    RomTooSmall { size: u64, required: u64 },

    #[error("Invalid title message slot {0}, must be 0-{max}", max = TITLE_MESSAGE_COUNT - 1)]
    InvalidMessageSlot(usize),

    #[error("Invalid title message length {0}, must be exactly {len} characters", len = TITLE_MESSAGE_LEN)]
    InvalidMessageLength(usize),

    #[error("Invalid screen count {count} for level {level}, must be 1-256")]
    InvalidScreenCount { level: usize, count: u16 },

    #[error("Invalid mod name length {0}, must be at most {max} characters", max = crate::session::MOD_NAME_MAX_LEN)]
    InvalidModNameLength(usize),

    #[error("No screen selected")]
    NoScreenSelected,

    #[error("Failed to decode screen data: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, RomError>;
