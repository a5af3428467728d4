// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! The screen editing session.
//!
//! A session tracks one selected screen at a time.  Its live buffer can be
//! edited freely.  Whenever the live buffer differs from the last clean copy
//! it is moved into the set of modified screens, which is the only thing
//! written back on save.  The level layout is held as a working copy and
//! written back separately.
//!
//! Screen data always crosses the session boundary by value, so nothing
//! outside the session can alter its clean copy.

use log::{debug, info};
use std::collections::BTreeMap;
use std::io::{Read, Seek, Write};

use hero_common::charset::{TITLE_MESSAGE_0, sanitize};
use hero_common::screen::{DecodedScreen, ScreenData};
use hero_common::tables::{LEVEL_COUNT, SCREEN_COUNT, TITLE_MESSAGE_LEN};
use hero_common::topology::LevelLayout;

use crate::error::{Result, RomError};
use crate::store::RomStore;

/// Name reported for a ROM whose first title message is the stock one.
pub const DEFAULT_MOD_NAME: &str = "MY FIRST MOD";

/// Longest mod name that fits in the first title message.
pub const MOD_NAME_MAX_LEN: usize = 15;

const MOD_NAME_PREFIX: &str = "H.E.R.O.tm";
const MOD_NAME_SUFFIX: &str = "=HEROED";

/// Highest absolute screen index.
pub const MAX_SCREEN: u8 = (SCREEN_COUNT - 1) as u8;

/// Notification sent to session subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new screen was selected, or the selected screen was reloaded.
    SelectionChanged {
        screen: u8,
        data: ScreenData,
        /// `None` for initial screens
        prior: Option<ScreenData>,
    },

    /// The working level layout changed.
    LayoutChanged { layout: LevelLayout },
}

type Subscriber = Box<dyn FnMut(&SessionEvent)>;

/// What a call to [`Session::save_all`] wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub screens: usize,
    pub layout: bool,
}

impl SaveSummary {
    pub fn anything_saved(&self) -> bool {
        self.screens > 0 || self.layout
    }
}

/// Screen editing session over a ROM image
pub struct Session<F> {
    store: RomStore<F>,
    selected: Option<u8>,
    screen_data: ScreenData,
    clean_data: ScreenData,
    prior_data: Option<ScreenData>,
    modified_screens: BTreeMap<u8, ScreenData>,
    layout: LevelLayout,
    layout_modified: bool,
    subscribers: Vec<Subscriber>,
}

impl<F: Read + Write + Seek> Session<F> {
    /// Starts a session, reading the level layout.  No screen is selected.
    pub fn new(mut store: RomStore<F>) -> Result<Self> {
        let layout = store.read_level_layout()?;
        debug!("Read level layout: {:?}", layout);
        Ok(Self {
            store,
            selected: None,
            screen_data: ScreenData::default(),
            clean_data: ScreenData::default(),
            prior_data: None,
            modified_screens: BTreeMap::new(),
            layout,
            layout_modified: false,
            subscribers: Vec::new(),
        })
    }

    pub fn store(&mut self) -> &mut RomStore<F> {
        &mut self.store
    }

    pub fn into_store(self) -> RomStore<F> {
        self.store
    }

    /// Registers a callback run on every [`SessionEvent`].
    pub fn subscribe<S>(&mut self, subscriber: S)
    where
        S: FnMut(&SessionEvent) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    fn emit(&mut self, event: SessionEvent) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }

    fn emit_selection(&mut self) {
        if let Some(screen) = self.selected {
            self.emit(SessionEvent::SelectionChanged {
                screen,
                data: self.screen_data,
                prior: self.prior_data,
            });
        }
    }

    pub fn selected_screen(&self) -> Option<u8> {
        self.selected
    }

    /// Selects a screen.  The index is clamped to 0-255.  Selecting the
    /// screen already selected does nothing.
    pub fn select_screen(&mut self, screen: i32) -> Result<()> {
        let screen = screen.clamp(0, MAX_SCREEN as i32) as u8;
        if self.selected == Some(screen) {
            return Ok(());
        }

        if self.selected.is_some() {
            self.store_selected_screen();
        }

        let data = self.get_screen(screen)?;
        let prior = self.get_prior_screen(screen)?;
        self.selected = Some(screen);
        self.screen_data = data;
        self.prior_data = prior;
        self.clean_data = data;
        debug!("Selected screen {}: {}", screen, data);

        self.emit_selection();
        Ok(())
    }

    /// Returns the data of any screen, pending edits included, without
    /// changing the selection.
    pub fn get_screen(&mut self, screen: u8) -> Result<ScreenData> {
        if Some(screen) == self.selected {
            return Ok(self.screen_data);
        }
        match self.modified_screens.get(&screen) {
            Some(data) => Ok(*data),
            None => self.store.read_screen_bytes(screen),
        }
    }

    // The screen above is only used to draw the top of this one, and initial
    // screens have a fixed top.
    fn get_prior_screen(&mut self, screen: u8) -> Result<Option<ScreenData>> {
        if self.layout.is_initial_screen(screen as usize) || screen == 0 {
            return Ok(None);
        }
        self.get_screen(screen - 1).map(Some)
    }

    // Moves the live buffer into the modified screens if it differs from the
    // clean copy.
    fn store_selected_screen(&mut self) {
        let Some(screen) = self.selected else {
            return;
        };
        if self.screen_data != self.clean_data {
            debug!("Screen {} modified: {}", screen, self.screen_data);
            self.modified_screens.insert(screen, self.screen_data);
            self.clean_data = self.screen_data;
        }
    }

    /// Live data of the selected screen.
    pub fn screen_data(&self) -> Result<ScreenData> {
        self.selected
            .map(|_| self.screen_data)
            .ok_or(RomError::NoScreenSelected)
    }

    /// Decodes every field of the selected screen's live data.
    pub fn decoded_screen(&self) -> Result<DecodedScreen> {
        self.screen_data()?.decode().map_err(RomError::Decode)
    }

    /// Replaces the live data of the selected screen.
    pub fn set_screen_data(&mut self, data: ScreenData) -> Result<()> {
        if self.selected.is_none() {
            return Err(RomError::NoScreenSelected);
        }
        self.screen_data = data;
        self.store_selected_screen();
        Ok(())
    }

    /// Applies an edit to the live data of the selected screen.
    pub fn edit_screen<E>(&mut self, edit: E) -> Result<()>
    where
        E: FnOnce(&mut ScreenData),
    {
        let mut data = self.screen_data()?;
        edit(&mut data);
        self.set_screen_data(data)
    }

    /// Data of the screen above the selected one, `None` for initial
    /// screens.
    pub fn prior_screen_data(&self) -> Option<ScreenData> {
        self.prior_data
    }

    /// Discards pending edits to the selected screen, reloading it from the
    /// ROM.
    pub fn revert_screen(&mut self) -> Result<()> {
        let screen = self.selected.ok_or(RomError::NoScreenSelected)?;
        // Edits stay pending if the ROM can't be read
        let data = self.store.read_screen_bytes(screen)?;
        self.modified_screens.remove(&screen);
        self.screen_data = data;
        self.clean_data = data;
        debug!("Reverted screen {}: {}", screen, data);
        self.emit_selection();
        Ok(())
    }

    pub fn are_there_modified_screens(&self) -> bool {
        !self.modified_screens.is_empty()
    }

    pub fn modified_screens(&self) -> Vec<u8> {
        self.modified_screens.keys().copied().collect()
    }

    pub fn is_layout_modified(&self) -> bool {
        self.layout_modified
    }

    pub fn are_there_modifications(&self) -> bool {
        self.are_there_modified_screens() || self.is_layout_modified()
    }

    /// Writes every modified screen to the ROM.  Returns whether anything was
    /// written.
    ///
    /// A screen leaves the modified set only once written, so on error the
    /// screens not yet written stay pending.
    pub fn save_modified_screens(&mut self) -> Result<bool> {
        if !self.are_there_modified_screens() {
            return Ok(false);
        }
        while let Some((screen, data)) = self
            .modified_screens
            .first_key_value()
            .map(|(&screen, &data)| (screen, data))
        {
            self.store.write_screen_bytes(screen, &data)?;
            self.modified_screens.remove(&screen);
        }
        info!("Saved modified screens");
        Ok(true)
    }

    /// Writes the level layout to the ROM if it was changed.  Returns whether
    /// it was written.
    pub fn save_level_layout(&mut self) -> Result<bool> {
        if !self.layout_modified {
            return Ok(false);
        }
        self.store.write_level_layout(&self.layout)?;
        self.layout_modified = false;
        info!("Saved level layout");
        Ok(true)
    }

    /// Saves modified screens and the level layout, then flushes the ROM
    /// file.
    pub fn save_all(&mut self) -> Result<SaveSummary> {
        let screens = self.modified_screens.len();
        self.save_modified_screens()?;
        let layout = self.save_level_layout()?;
        self.store.flush()?;
        Ok(SaveSummary { screens, layout })
    }

    pub fn level_layout(&self) -> LevelLayout {
        self.layout
    }

    pub fn level_initial_screens(&self) -> [u8; LEVEL_COUNT] {
        self.layout.initial_screens
    }

    pub fn level_screen_count(&self) -> [u16; LEVEL_COUNT] {
        self.layout.screen_count
    }

    /// Replaces the initial screen of every level.  Ranges are not checked
    /// for overlap.
    pub fn set_level_initial_screens(&mut self, initial_screens: [u8; LEVEL_COUNT]) {
        if self.layout.initial_screens == initial_screens {
            return;
        }
        self.layout.initial_screens = initial_screens;
        self.layout_changed();
    }

    /// Replaces the screen count of every level.  Ranges are not checked for
    /// overlap, and counts are only checked when saved.
    pub fn set_level_screen_count(&mut self, screen_count: [u16; LEVEL_COUNT]) {
        if self.layout.screen_count == screen_count {
            return;
        }
        self.layout.screen_count = screen_count;
        self.layout_changed();
    }

    /// Replaces the whole level layout.
    pub fn set_level_layout(&mut self, layout: LevelLayout) {
        self.set_level_initial_screens(layout.initial_screens);
        self.set_level_screen_count(layout.screen_count);
    }

    fn layout_changed(&mut self) {
        debug!("Level layout changed");
        self.layout_modified = true;
        let layout = self.layout;
        self.emit(SessionEvent::LayoutChanged { layout });
    }

    /// Makes the selected screen the first screen of its level, keeping the
    /// level's final screen.
    ///
    /// Fails if the selected screen is the final screen of any level.  If no
    /// level holds the selected screen, the level of the next located screen
    /// is used.  Returns whether the layout was changed.
    pub fn define_current_screen_as_level_start(&mut self) -> bool {
        let Some(screen) = self.selected else {
            return false;
        };
        if self.layout.is_final_screen(screen as usize) {
            debug!("Screen {} is a final screen, can't be initial", screen);
            return false;
        }
        let Some(level) = self.layout.owning_level_forward(screen as usize) else {
            debug!("No level found from screen {}", screen);
            return false;
        };

        let final_screen = self.layout.final_screen(level);
        let count = final_screen - screen as i32 + 1;
        let Ok(count) = u16::try_from(count) else {
            return false;
        };

        let mut initial_screens = self.layout.initial_screens;
        initial_screens[level] = screen;
        self.set_level_initial_screens(initial_screens);

        let mut screen_count = self.layout.screen_count;
        screen_count[level] = count;
        self.set_level_screen_count(screen_count);

        info!("Level {} now starts at screen {}", level + 1, screen);
        true
    }

    /// Makes the selected screen the last screen of its level, keeping the
    /// level's initial screen.
    ///
    /// Fails if the selected screen is the initial screen of any level.  If
    /// no level holds the selected screen, the level of the previous located
    /// screen is used.  Returns whether the layout was changed.
    pub fn define_current_screen_as_level_end(&mut self) -> bool {
        let Some(screen) = self.selected else {
            return false;
        };
        if self.layout.is_initial_screen(screen as usize) {
            debug!("Screen {} is an initial screen, can't be final", screen);
            return false;
        }
        let Some(level) = self.layout.owning_level_backward(screen as usize) else {
            debug!("No level found up to screen {}", screen);
            return false;
        };

        let count = screen as u16 - self.layout.initial_screens[level] as u16 + 1;
        let mut screen_count = self.layout.screen_count;
        screen_count[level] = count;
        self.set_level_screen_count(screen_count);

        info!("Level {} now ends at screen {}", level + 1, screen);
        true
    }

    /// Reads and decodes title message `slot` (0-3).
    pub fn read_title_message(&mut self, slot: usize) -> Result<String> {
        self.store.read_title_message(slot)
    }

    /// Writes title message `slot` (0-3), which must be 32 characters.
    pub fn write_title_message(&mut self, slot: usize, text: &str) -> Result<()> {
        self.store.write_title_message(slot, text)
    }

    /// Name of the mod, held in the first title message.
    pub fn read_mod_name(&mut self) -> Result<String> {
        let message = self.store.read_title_message(0)?;
        if message == TITLE_MESSAGE_0 {
            return Ok(DEFAULT_MOD_NAME.to_string());
        }
        let name: String = message
            .chars()
            .skip(MOD_NAME_PREFIX.len())
            .take(MOD_NAME_MAX_LEN)
            .collect();
        Ok(name.trim_end().to_string())
    }

    /// Writes the mod name into the first title message.  The name is upper
    /// cased and characters without a glyph become spaces.
    pub fn write_mod_name(&mut self, name: &str) -> Result<()> {
        let name = sanitize(&name.to_uppercase());
        let len = name.chars().count();
        if len > MOD_NAME_MAX_LEN {
            return Err(RomError::InvalidModNameLength(len));
        }
        let message = format!(
            "{}{:<width$}{}",
            MOD_NAME_PREFIX,
            name,
            MOD_NAME_SUFFIX,
            width = MOD_NAME_MAX_LEN
        );
        debug_assert_eq!(message.chars().count(), TITLE_MESSAGE_LEN);
        info!("Setting mod name to \"{}\"", name.trim_end());
        self.store.write_title_message(0, &message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::test_rom;
    use hero_common::objects::ObjectSlot;
    use hero_common::tables::{BYTE_ENEMY_LOW, SCREEN_TABLE_OFFSETS};
    use std::cell::{Cell, RefCell};
    use std::io::Cursor;
    use std::rc::Rc;

    fn session() -> Session<Cursor<Vec<u8>>> {
        let store = RomStore::new(Cursor::new(test_rom())).unwrap();
        Session::new(store).unwrap()
    }

    // Always changes the wall byte, whatever the fixture holds
    fn toggle_magma(data: &mut ScreenData) {
        let magma = data.magma();
        data.set_magma(!magma);
    }

    fn rom_of(session: Session<Cursor<Vec<u8>>>) -> Vec<u8> {
        session.into_store().into_inner().into_inner()
    }

    fn recorder(session: &mut Session<Cursor<Vec<u8>>>) -> Rc<RefCell<Vec<SessionEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        session.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_initial_state() {
        let session = session();
        assert_eq!(session.selected_screen(), None);
        assert!(matches!(session.screen_data(), Err(RomError::NoScreenSelected)));
        assert_eq!(session.level_layout(), LevelLayout::original());
        assert!(!session.are_there_modifications());
    }

    #[test]
    fn test_select_loads_screen_and_prior() {
        let mut session = session();
        session.select_screen(5).unwrap();
        assert_eq!(session.selected_screen(), Some(5));
        assert_eq!(session.screen_data().unwrap().byte(0), 5);
        assert_eq!(session.prior_screen_data().unwrap().byte(0), 4);

        // Screen 6 starts level 3
        session.select_screen(6).unwrap();
        assert_eq!(session.prior_screen_data(), None);
    }

    #[test]
    fn test_select_clamps() {
        let mut session = session();
        session.select_screen(300).unwrap();
        assert_eq!(session.selected_screen(), Some(255));
        session.select_screen(-4).unwrap();
        assert_eq!(session.selected_screen(), Some(0));
        assert_eq!(session.prior_screen_data(), None);
    }

    #[test]
    fn test_select_same_screen_is_noop() {
        let mut session = session();
        let events = recorder(&mut session);
        session.select_screen(10).unwrap();
        session.select_screen(10).unwrap();
        assert_eq!(events.borrow().len(), 1);
        assert!(matches!(
            events.borrow()[0],
            SessionEvent::SelectionChanged { screen: 10, .. }
        ));
    }

    #[test]
    fn test_edit_survives_reselection() {
        let mut session = session();
        session.select_screen(5).unwrap();
        let mut data = session.screen_data().unwrap();
        data.set_magma(true);
        data.step_object(ObjectSlot::Lantern, 1);
        session.set_screen_data(data).unwrap();

        session.select_screen(6).unwrap();
        session.select_screen(5).unwrap();
        assert_eq!(session.screen_data().unwrap(), data);
        // The prior screen of 6 comes from the pending edit
        session.select_screen(6).unwrap();
        session.select_screen(7).unwrap();
        assert_eq!(session.modified_screens(), vec![5]);
    }

    #[test]
    fn test_set_screen_data_marks_dirty_immediately() {
        let mut session = session();
        session.select_screen(20).unwrap();
        assert!(!session.are_there_modified_screens());
        session
            .edit_screen(|data| data.set_right_to_left(true))
            .unwrap();
        assert!(session.are_there_modified_screens());
        assert!(session.are_there_modifications());

        // Unchanged data doesn't mark a screen
        let mut session = self::session();
        session.select_screen(20).unwrap();
        let data = session.screen_data().unwrap();
        session.set_screen_data(data).unwrap();
        assert!(!session.are_there_modified_screens());
    }

    #[test]
    fn test_set_screen_data_without_selection() {
        let mut session = session();
        assert!(matches!(
            session.set_screen_data(ScreenData::default()),
            Err(RomError::NoScreenSelected)
        ));
    }

    #[test]
    fn test_prior_screen_sees_pending_edit() {
        let mut session = session();
        session.select_screen(8).unwrap();
        session
            .edit_screen(|data| data.toggle_terrain(hero_common::TerrainBand::Lower, 0))
            .unwrap();
        let edited = session.screen_data().unwrap();
        session.select_screen(9).unwrap();
        assert_eq!(session.prior_screen_data(), Some(edited));
    }

    #[test]
    fn test_save_writes_and_clears() {
        let mut session = session();
        let mut expected = Vec::new();
        for screen in [3, 100, 42] {
            session.select_screen(screen).unwrap();
            session
                .edit_screen(|data| data.set_side_gap(hero_common::SideGap::Left))
                .unwrap();
            expected.push((screen as u8, session.screen_data().unwrap()));
        }

        assert!(session.save_modified_screens().unwrap());
        assert!(!session.are_there_modifications());
        assert!(!session.save_modified_screens().unwrap());

        for (screen, data) in &expected {
            assert_eq!(session.store().read_screen_bytes(*screen).unwrap(), *data);
        }
        let rom = rom_of(session);
        assert_eq!(rom[SCREEN_TABLE_OFFSETS[7] as usize + 100], expected[1].1.byte(7));
    }

    // Image whose writes start failing after a number of calls, and whose
    // reads fail once `reads_fail` is set
    struct FailingRom {
        inner: Cursor<Vec<u8>>,
        writes_left: usize,
        reads_fail: Rc<Cell<bool>>,
    }

    impl FailingRom {
        fn new(writes_left: usize) -> Self {
            Self {
                inner: Cursor::new(test_rom()),
                writes_left,
                reads_fail: Rc::new(Cell::new(false)),
            }
        }
    }

    impl Read for FailingRom {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.reads_fail.get() {
                return Err(std::io::Error::other("read error"));
            }
            self.inner.read(buf)
        }
    }

    impl Seek for FailingRom {
        fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    impl Write for FailingRom {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.writes_left == 0 {
                return Err(std::io::Error::other("disk full"));
            }
            self.writes_left -= 1;
            self.inner.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_save_failure_keeps_pending() {
        // One write per screen table, so only one screen gets through
        let rom = FailingRom::new(SCREEN_TABLE_OFFSETS.len());
        let mut session = Session::new(RomStore::new(rom).unwrap()).unwrap();
        session.select_screen(1).unwrap();
        session.edit_screen(toggle_magma).unwrap();
        let first = session.screen_data().unwrap();
        session.select_screen(2).unwrap();
        session.edit_screen(toggle_magma).unwrap();
        assert_eq!(session.modified_screens(), vec![1, 2]);

        assert!(matches!(
            session.save_modified_screens(),
            Err(RomError::Io(_))
        ));
        assert_eq!(session.modified_screens(), vec![2]);
        assert_eq!(session.store().read_screen_bytes(1).unwrap(), first);
    }

    #[test]
    fn test_revert_screen() {
        let mut session = session();
        session.select_screen(30).unwrap();
        let original = session.screen_data().unwrap();
        session
            .edit_screen(|data| data.cycle_enemy_kind(ObjectSlot::EnemyLow))
            .unwrap();
        assert_ne!(session.screen_data().unwrap().byte(BYTE_ENEMY_LOW), original.byte(BYTE_ENEMY_LOW));

        let events = recorder(&mut session);
        session.revert_screen().unwrap();
        assert_eq!(session.screen_data().unwrap(), original);
        assert!(!session.are_there_modified_screens());
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_failed_revert_keeps_pending() {
        let rom = FailingRom::new(usize::MAX);
        let reads_fail = rom.reads_fail.clone();
        let mut session = Session::new(RomStore::new(rom).unwrap()).unwrap();
        session.select_screen(30).unwrap();
        session.edit_screen(toggle_magma).unwrap();
        let edited = session.screen_data().unwrap();
        assert_eq!(session.modified_screens(), vec![30]);

        reads_fail.set(true);
        assert!(matches!(session.revert_screen(), Err(RomError::Io(_))));
        assert_eq!(session.modified_screens(), vec![30]);
        assert!(session.are_there_modifications());
        assert_eq!(session.screen_data().unwrap(), edited);

        reads_fail.set(false);
        assert!(session.save_modified_screens().unwrap());
        assert_eq!(session.store().read_screen_bytes(30).unwrap(), edited);
    }

    #[test]
    fn test_decoded_screen() {
        let mut session = session();
        assert!(matches!(
            session.decoded_screen(),
            Err(RomError::NoScreenSelected)
        ));
        session.select_screen(30).unwrap();
        let data = session.screen_data().unwrap();
        let decoded = session.decoded_screen().unwrap();
        assert_eq!(decoded.enemy_low.position, data.object_position(ObjectSlot::EnemyLow));
        assert_eq!(decoded.wall.magma, data.magma());
        assert_eq!(ScreenData::encode(&decoded).unwrap(), data);
    }

    #[test]
    fn test_layout_setters() {
        let mut session = session();
        let events = recorder(&mut session);

        session.set_level_initial_screens(session.level_initial_screens());
        assert!(!session.is_layout_modified());
        assert!(events.borrow().is_empty());

        let mut counts = session.level_screen_count();
        counts[0] = 3;
        session.set_level_screen_count(counts);
        assert!(session.is_layout_modified());
        assert_eq!(events.borrow().len(), 1);
        match &events.borrow()[0] {
            SessionEvent::LayoutChanged { layout } => assert_eq!(layout.screen_count[0], 3),
            other => panic!("Unexpected event {:?}", other),
        }

        assert!(session.save_level_layout().unwrap());
        assert!(!session.is_layout_modified());
        assert!(!session.save_level_layout().unwrap());
        assert_eq!(session.store().read_level_layout().unwrap().screen_count[0], 3);
    }

    #[test]
    fn test_define_start() {
        let mut session = session();
        // Level 3 is screens 6-11
        session.select_screen(8).unwrap();
        assert!(session.define_current_screen_as_level_start());
        let layout = session.level_layout();
        assert_eq!(layout.initial_screens[2], 8);
        assert_eq!(layout.screen_count[2], 4);
        assert_eq!(layout.final_screen(2), 11);
        assert!(session.is_layout_modified());

        // Screens 6 and 7 are now orphaned, so the next located level is used
        session.select_screen(7).unwrap();
        assert!(session.define_current_screen_as_level_start());
        assert_eq!(session.level_layout().initial_screens[2], 7);
        assert_eq!(session.level_layout().screen_count[2], 5);
    }

    #[test]
    fn test_define_start_rejects_final_screen() {
        let mut session = session();
        let events = recorder(&mut session);
        session.select_screen(11).unwrap();
        assert!(!session.define_current_screen_as_level_start());
        assert_eq!(session.level_layout(), LevelLayout::original());
        assert!(!session.is_layout_modified());
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_define_end() {
        let mut session = session();
        session.select_screen(9).unwrap();
        assert!(session.define_current_screen_as_level_end());
        let layout = session.level_layout();
        assert_eq!(layout.initial_screens[2], 6);
        assert_eq!(layout.screen_count[2], 4);

        // Screens 10 and 11 are now orphaned, so the previous located level is
        // used
        session.select_screen(11).unwrap();
        assert!(session.define_current_screen_as_level_end());
        assert_eq!(session.level_layout().screen_count[2], 6);

        // Initial screens can't be final
        session.select_screen(12).unwrap();
        assert!(!session.define_current_screen_as_level_end());
    }

    #[test]
    fn test_define_without_level() {
        let mut session = session();
        session.select_screen(250).unwrap();
        let mut counts = session.level_screen_count();
        counts[19] = 4;
        session.set_level_screen_count(counts);
        // Nothing from 250 onwards is located
        assert!(!session.define_current_screen_as_level_start());

        let mut initial = session.level_initial_screens();
        initial[0] = 10;
        session.set_level_initial_screens(initial);
        session.select_screen(1).unwrap();
        assert!(!session.define_current_screen_as_level_end());
    }

    #[test]
    fn test_mod_name() {
        let mut session = session();
        assert_eq!(session.read_mod_name().unwrap(), DEFAULT_MOD_NAME);

        session.write_mod_name("deep caves #2").unwrap();
        assert_eq!(
            session.read_title_message(0).unwrap(),
            "H.E.R.O.tmDEEP CAVES  2  =HEROED"
        );
        assert_eq!(session.read_mod_name().unwrap(), "DEEP CAVES  2");

        assert!(matches!(
            session.write_mod_name("A NAME THAT IS TOO LONG"),
            Err(RomError::InvalidModNameLength(23))
        ));
    }

    #[test]
    fn test_save_all() {
        let mut session = session();
        session.select_screen(50).unwrap();
        session.edit_screen(toggle_magma).unwrap();
        assert_eq!(session.modified_screens(), vec![50]);
        let mut initial = session.level_initial_screens();
        initial[7] = 51;
        session.set_level_initial_screens(initial);

        let summary = session.save_all().unwrap();
        assert_eq!(summary, SaveSummary { screens: 1, layout: true });
        assert!(summary.anything_saved());
        assert!(!session.are_there_modifications());
        assert!(!session.save_all().unwrap().anything_saved());

        let rom = rom_of(session);
        assert_eq!(rom[0x37CE + 7], 51);
    }

    #[test]
    fn test_selection_event_carries_copies() {
        let mut session = session();
        let events = recorder(&mut session);
        session.select_screen(40).unwrap();
        let data = match &events.borrow()[0] {
            SessionEvent::SelectionChanged { data, prior, .. } => {
                assert!(prior.is_some());
                *data
            }
            other => panic!("Unexpected event {:?}", other),
        };
        assert_eq!(data, session.screen_data().unwrap());
    }
}
