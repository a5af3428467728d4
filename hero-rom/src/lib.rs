// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! hero-rom
//!
//! Reads and edits the screens, levels and title messages of an MSX
//! H.E.R.O. ROM image in place.
//!
//! Typically used like this:
//!
//! ```rust ignore
//! use hero_rom::{RomStore, Session};
//! let store = RomStore::open("hero.rom")?;
//! let mut session = Session::new(store)?;
//! session.select_screen(5)?;
//! session.edit_screen(|data| data.set_magma(true))?;
//! session.save_all()?;
//! ```

pub mod analysis;
pub mod error;
pub mod session;
pub mod store;

pub use error::{Result, RomError};
pub use session::{SaveSummary, Session, SessionEvent};
pub use store::RomStore;
