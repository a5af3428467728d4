// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Text preview of a game screen.
//!
//! A screen is 32x17 tiles on the MSX, drawn here as 64x17 characters:
//!
//! ```text
//! rows  0-5   upper terrain, continuing the screen above
//! rows  6-10  middle terrain
//! rows 11-16  lower terrain, or water on the last row deep in a level
//! ```

use hero_common::objects::{EnemyKind, ObjectSlot, position_to_screen_pos};
use hero_common::screen::{ScreenData, SideGap, TerrainBand};
use hero_common::tables::{INITIAL_SCREEN_WALL_POS, OBJECT_HIDDEN_POS, WALL_MAX_POS, WALL_MIN_POS};
use hero_common::terrain::{BORDER_WIDTH, SCREEN_ROW_WIDTH, TerrainRow};
use hero_common::topology::{LevelLayout, WATER_LEVEL_SCREEN};

pub const PREVIEW_ROWS: usize = 17;

pub const TERRAIN: char = '▒';
pub const WALL: char = '▓';
pub const WATER: char = '~';
const EMPTY: char = ' ';

const UPPER_ROWS: std::ops::Range<usize> = 0..6;
const MIDDLE_ROWS: std::ops::Range<usize> = 6..11;
const LOWER_ROWS: std::ops::Range<usize> = 11..16;
const LAST_ROW: usize = 16;

const LANTERN_ROW: usize = 1;
const WALL_ROW: usize = 6;
const WALL_HEIGHT: usize = 5;
const ENEMY_MID_ROW: usize = 7;
const ENEMY_LOW_ROW: usize = 12;
const MINER_ROW: usize = 9;
const MINER_LEFT_COL: usize = 13;
const MINER_RIGHT_COL: usize = 49;
// Walls at or left of this leave the miner on the left
const MINER_LEFT_MAX_WALL: u8 = 19;
const ARROW_COL: usize = 14;
const ARROW_ROW: usize = 1;

// Upper terrain of the first screen of each level
const INITIAL_UPPER_BYTES: (u8, u8) = (0xC0, 0xFE);

const ARROW: [&str; 4] = [" || ", "_||_", "\\  /", " \\/ "];

/// Everything needed to draw one screen.
#[derive(Debug, Clone, Copy)]
pub struct ScreenView<'a> {
    pub screen: u8,
    pub data: &'a ScreenData,
    /// Data of the screen above, `None` for the first screen of a level.
    pub prior: Option<&'a ScreenData>,
    pub layout: &'a LevelLayout,
}

struct Canvas {
    rows: [[char; SCREEN_ROW_WIDTH]; PREVIEW_ROWS],
}

impl Canvas {
    fn new() -> Self {
        Self {
            rows: [[EMPTY; SCREEN_ROW_WIDTH]; PREVIEW_ROWS],
        }
    }

    fn fill_row(&mut self, y: usize, cells: &[bool; SCREEN_ROW_WIDTH]) {
        for (c, &solid) in self.rows[y].iter_mut().zip(cells.iter()) {
            *c = if solid { TERRAIN } else { EMPTY };
        }
    }

    // Anything off the right edge is dropped
    fn put_str(&mut self, x: usize, y: usize, s: &str) {
        if y >= PREVIEW_ROWS {
            return;
        }
        for (i, c) in s.chars().enumerate() {
            if let Some(cell) = self.rows[y].get_mut(x + i) {
                *cell = c;
            }
        }
    }

    fn into_lines(self) -> Vec<String> {
        self.rows.iter().map(|row| row.iter().collect()).collect()
    }
}

fn row_cells(lateral: u8, center: u8) -> [bool; SCREEN_ROW_WIDTH] {
    TerrainRow::from_bytes(lateral, center, false).screen_cells()
}

fn clear(cells: &mut [bool; SCREEN_ROW_WIDTH], range: std::ops::Range<usize>) {
    cells[range].fill(false);
}

/// Renders a screen as 17 lines of 64 characters.
pub fn render_screen(view: &ScreenView) -> Vec<String> {
    let screen = view.screen as usize;
    let levelscr = view
        .layout
        .level_and_screen_of(screen)
        .map(|ls| ls.screen);
    let initial = view.layout.is_initial_screen(screen);
    let is_final = view.layout.is_final_screen(screen);
    let water = levelscr.is_some_and(|s| s >= WATER_LEVEL_SCREEN);

    let mut canvas = Canvas::new();

    // Upper band
    let upper = if initial {
        let mut cells = row_cells(INITIAL_UPPER_BYTES.0, INITIAL_UPPER_BYTES.1);
        cells[SCREEN_ROW_WIDTH / 2..].fill(true);
        cells
    } else if levelscr.is_some_and(|s| s > WATER_LEVEL_SCREEN) {
        row_cells(0xFF, 0xFF)
    } else {
        match view.prior {
            Some(prior) => prior.terrain_row(TerrainBand::Lower).screen_cells(),
            None => row_cells(0xFF, 0xFF),
        }
    };
    for y in UPPER_ROWS {
        canvas.fill_row(y, &upper);
    }
    if initial {
        for (i, line) in ARROW.iter().enumerate() {
            canvas.put_str(ARROW_COL, ARROW_ROW + i, line);
        }
    }

    // Middle band
    let data = view.data;
    let side_gap = data.side_gap();
    let (lateral, center) = TerrainBand::Middle.byte_indexes();
    let mut middle = TerrainRow::from_bytes(
        data.byte(lateral),
        data.byte(center),
        side_gap == SideGap::AltRight,
    )
    .screen_cells();
    let ignore_side_gaps = (initial || is_final) && levelscr.is_some_and(|s| s < WATER_LEVEL_SCREEN);
    if !ignore_side_gaps {
        match side_gap {
            SideGap::Right => clear(&mut middle, SCREEN_ROW_WIDTH - BORDER_WIDTH..SCREEN_ROW_WIDTH),
            SideGap::Left => clear(&mut middle, 0..BORDER_WIDTH),
            _ => {}
        }
    }
    if water {
        match side_gap {
            SideGap::None => {
                clear(&mut middle, 0..BORDER_WIDTH);
                clear(&mut middle, SCREEN_ROW_WIDTH - BORDER_WIDTH..SCREEN_ROW_WIDTH);
            }
            SideGap::AltRight => {
                clear(&mut middle, 0..BORDER_WIDTH);
                clear(&mut middle, 32..38);
            }
            _ => {}
        }
    }
    for y in MIDDLE_ROWS {
        canvas.fill_row(y, &middle);
    }

    // Lower band
    let lower = data.terrain_row(TerrainBand::Lower).screen_cells();
    for y in LOWER_ROWS {
        canvas.fill_row(y, &lower);
    }
    if water {
        canvas.put_str(0, LAST_ROW, &WATER.to_string().repeat(SCREEN_ROW_WIDTH));
    } else {
        canvas.fill_row(LAST_ROW, &lower);
    }

    draw_objects(&mut canvas, view, initial, is_final);

    canvas.into_lines()
}

fn draw_objects(canvas: &mut Canvas, view: &ScreenView, initial: bool, is_final: bool) {
    let data = view.data;

    let lantern = data.object_position(ObjectSlot::Lantern);
    if lantern != OBJECT_HIDDEN_POS {
        let x = position_to_screen_pos(lantern) + 1;
        canvas.put_str(x, LANTERN_ROW, "/T");
        canvas.put_str(x, LANTERN_ROW + 1, "\\/");
    }

    let wall = data.object_position(ObjectSlot::Wall);
    let wall_drawn = if initial {
        Some(INITIAL_SCREEN_WALL_POS)
    } else {
        (WALL_MIN_POS..=WALL_MAX_POS).contains(&wall).then_some(wall)
    };
    if let Some(position) = wall_drawn {
        let x = position_to_screen_pos(position);
        let block = WALL.to_string().repeat(3);
        for y in WALL_ROW..WALL_ROW + WALL_HEIGHT {
            canvas.put_str(x, y, &block);
        }
    }

    for (slot, y) in [
        (ObjectSlot::EnemyMid, ENEMY_MID_ROW),
        (ObjectSlot::EnemyLow, ENEMY_LOW_ROW),
    ] {
        let position = data.object_position(slot);
        if position == OBJECT_HIDDEN_POS {
            continue;
        }
        let x = position_to_screen_pos(position);
        if let Some(kind) = data.enemy_kind(slot) {
            for (i, line) in enemy_sprite(kind).iter().enumerate() {
                canvas.put_str(x, y + i, line);
            }
        }
    }

    if is_final {
        if wall <= MINER_LEFT_MAX_WALL {
            canvas.put_str(MINER_LEFT_COL, MINER_ROW, " ◆");
            canvas.put_str(MINER_LEFT_COL, MINER_ROW + 1, " O#");
        } else {
            canvas.put_str(MINER_RIGHT_COL, MINER_ROW, " ◆ ");
            canvas.put_str(MINER_RIGHT_COL, MINER_ROW + 1, "#O ");
        }
    }
}

fn enemy_sprite(kind: EnemyKind) -> &'static [&'static str] {
    match kind {
        EnemyKind::Spider => &[" | ", "|V|"],
        EnemyKind::Bat => &["/V\\", "w^w"],
        EnemyKind::Moth => &["\\~/", "/~\\"],
        EnemyKind::Snake => &["==C"],
    }
}
