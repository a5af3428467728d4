// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Terrain rows.
//!
//! The middle and lower terrain areas of a screen are each stored as 2 bytes,
//! a "lateral" and a "center" byte, but drawn as a 64 column row.  The row is
//! built from a 32 bit logical representation (the "data"), where bit 0 is
//! the MSB of data byte 0:
//!
//! ```text
//! data[0] = lateral
//! data[1] = reverse(center)
//! data[2] = center            (alt right side: lateral)
//! data[3] = reverse(lateral)  (alt right side: reverse(center))
//! ```
//!
//! So in normal mode the right half mirrors the left half, and bit `i` always
//! equals bit `31 - i`.  The alt right side flag only applies to the middle
//! row.
//!
//! On screen each data bit takes 1 or 2 columns, and 8 solid columns are
//! added on each side, giving 64 columns.

/// Width of a rendered terrain row, in columns.
pub const SCREEN_ROW_WIDTH: usize = 64;

/// Number of logical bits in a terrain row.
pub const DATA_BITS: usize = 32;

/// Solid columns drawn to the left and right of the data bits.
pub const BORDER_WIDTH: usize = 8;

// Logical bits which are always solid when the alt right side flag is set.
const ALT_FIXED_BITS: core::ops::Range<usize> = 16..20;

/// Screen column of a data bit.
pub fn data_to_screen_pos(bit: usize) -> usize {
    bit * 3 / 2 + BORDER_WIDTH
}

/// Number of screen columns a data bit occupies, 1 or 2.
pub fn data_to_screen_width(bit: usize) -> usize {
    bit % 2 + 1
}

/// A decoded terrain row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainRow {
    data: [u8; 4],
    alt_rightside: bool,
}

impl TerrainRow {
    /// Decodes a row from its stored lateral and center bytes.
    pub fn from_bytes(lateral: u8, center: u8, alt_rightside: bool) -> Self {
        let data = if alt_rightside {
            [lateral, center.reverse_bits(), lateral, center.reverse_bits()]
        } else {
            [lateral, center.reverse_bits(), center, lateral.reverse_bits()]
        };
        Self {
            data,
            alt_rightside,
        }
    }

    /// Re-encodes the row as (lateral, center).  Only the left half is
    /// stored, so the mode does not matter.
    pub fn to_bytes(&self) -> (u8, u8) {
        (self.data[0], self.data[1].reverse_bits())
    }

    pub fn data(&self) -> [u8; 4] {
        self.data
    }

    pub fn alt_rightside(&self) -> bool {
        self.alt_rightside
    }

    /// Value of logical bit `bit` (0-31).
    pub fn bit(&self, bit: usize) -> bool {
        assert!(bit < DATA_BITS);
        self.data[bit / 8] & (0x80 >> (bit % 8)) != 0
    }

    fn flip(&mut self, bit: usize) {
        self.data[bit / 8] ^= 0x80 >> (bit % 8);
    }

    /// Inverts logical bit `bit` (0-31) together with its partner.
    ///
    /// In normal mode the partner is the mirrored bit `31 - bit`.  In alt
    /// right side mode the bit is folded through `min(bit % 20, 15)` and the
    /// partner is 20 bits to its right, and bits 16-19 cannot be changed.
    pub fn toggle(&mut self, bit: usize) {
        assert!(bit < DATA_BITS);
        if self.alt_rightside {
            if ALT_FIXED_BITS.contains(&bit) {
                return;
            }
            let bit = (bit % 20).min(15);
            let partner = (bit + 20).min(DATA_BITS - 1);
            self.flip(bit);
            self.flip(partner);
        } else {
            self.flip(bit);
            self.flip(DATA_BITS - 1 - bit);
        }
    }

    /// Returns the 64 on screen columns, `true` where there is terrain.
    pub fn screen_cells(&self) -> [bool; SCREEN_ROW_WIDTH] {
        let mut cells = [true; SCREEN_ROW_WIDTH];
        let mut col = BORDER_WIDTH;

        if self.alt_rightside {
            // Each half is expanded on its own, with the width pattern
            // restarting at the right half, and a solid block between them.
            for bit in 0..16 {
                col = self.expand(&mut cells, col, bit, bit);
            }
            col += 6;
            for bit in 16..DATA_BITS {
                col = self.expand(&mut cells, col, bit, bit - 16);
            }
            // The right half ends 2 columns short, so repeat its last 2
            cells[col] = cells[col - 2];
            cells[col + 1] = cells[col - 1];
        } else {
            for bit in 0..DATA_BITS {
                col = self.expand(&mut cells, col, bit, bit);
            }
        }

        cells
    }

    fn expand(
        &self,
        cells: &mut [bool; SCREEN_ROW_WIDTH],
        col: usize,
        bit: usize,
        width_index: usize,
    ) -> usize {
        let width = data_to_screen_width(width_index);
        let value = self.bit(bit);
        for cell in cells.iter_mut().skip(col).take(width) {
            *cell = value;
        }
        col + width
    }

    /// Renders the row as 64 characters of '1' (terrain) and '0' (clear).
    pub fn to_screen_string(&self) -> String {
        self.screen_cells()
            .iter()
            .map(|&solid| if solid { '1' } else { '0' })
            .collect()
    }
}
