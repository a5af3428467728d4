// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! The private character set used by the title screen messages.
//!
//! Layout of the game's message characters:
//! - 0x00-0x1F: empty, empty, 0-9, !, LEVEL, POWER, PRO, LIVES, BOMBS,
//!   power bar, logo 1-3
//! - 0x20-0x3F: logo 4-6, square, A-Z, space, period
//! - 0x40-0x47: TM, 1984, upper square, lower square
//! - 0x48-0x7F: empty
//!
//! Glyphs without an ASCII letter are given a stand-in lower case character,
//! so that the logo, TM and year can be written from plain ASCII.

use crate::tables::TITLE_MESSAGE_LEN;

pub const MSGCHR_0: u8 = 0x02; // digits 0-9 are yellow
pub const MSGCHR_EXCLAM: u8 = 0x0C;
pub const MSGCHR_LOGO_1: u8 = 0x1D; // rainbow, x4 in the logo
pub const MSGCHR_LOGO_2: u8 = 0x1E;
pub const MSGCHR_LOGO_3: u8 = 0x1F;
pub const MSGCHR_LOGO_4: u8 = 0x20;
pub const MSGCHR_LOGO_5: u8 = 0x21;
pub const MSGCHR_LOGO_6: u8 = 0x22;
pub const MSGCHR_SQUARE: u8 = 0x23;
pub const MSGCHR_A: u8 = 0x24;
pub const MSGCHR_SPACE: u8 = 0x3E;
pub const MSGCHR_PERIOD: u8 = 0x3F;
pub const MSGCHR_TM_1: u8 = 0x40;
pub const MSGCHR_TM_2: u8 = 0x41;
pub const MSGCHR_YEAR_1: u8 = 0x42; // year digits are white
pub const MSGCHR_YEAR_9: u8 = 0x43;
pub const MSGCHR_YEAR_8: u8 = 0x44;
pub const MSGCHR_YEAR_4: u8 = 0x45;

/// Size of both conversion tables.
pub const CHARSET_SIZE: usize = 128;

/// Logo as written in ASCII.
pub const MSG_LOGO: &str = "====abcde";

/// Trademark as written in ASCII.
pub const MSG_TM: &str = "tm";

/// Year 1984 in white digits, as written in ASCII.
pub const MSG_1984: &str = "fghi";

/// Message 0 as shipped in the original ROM.
pub const TITLE_MESSAGE_0: &str = "            H.E.R.O.tm          ";

// Every ASCII character which has a glyph, other than letters and digits.
const SPECIALS: [(u8, u8); 16] = [
    (b'!', MSGCHR_EXCLAM),
    (b'=', MSGCHR_LOGO_1),
    (b'a', MSGCHR_LOGO_2),
    (b'b', MSGCHR_LOGO_3),
    (b'c', MSGCHR_LOGO_4),
    (b'd', MSGCHR_LOGO_5),
    (b'e', MSGCHR_LOGO_6),
    (b'_', MSGCHR_SQUARE),
    (b' ', MSGCHR_SPACE),
    (b'.', MSGCHR_PERIOD),
    (b't', MSGCHR_TM_1),
    (b'm', MSGCHR_TM_2),
    (b'f', MSGCHR_YEAR_1),
    (b'g', MSGCHR_YEAR_9),
    (b'h', MSGCHR_YEAR_8),
    (b'i', MSGCHR_YEAR_4),
];

const fn build_ascii_to_hero() -> [u8; CHARSET_SIZE] {
    let mut table = [MSGCHR_SPACE; CHARSET_SIZE];

    let mut ii = 0;
    while ii < 26 {
        table[(b'A' + ii) as usize] = MSGCHR_A + ii;
        ii += 1;
    }

    ii = 0;
    while ii < 10 {
        table[(b'0' + ii) as usize] = MSGCHR_0 + ii;
        ii += 1;
    }

    let mut jj = 0;
    while jj < SPECIALS.len() {
        table[SPECIALS[jj].0 as usize] = SPECIALS[jj].1;
        jj += 1;
    }

    table
}

// Inverts the forward table.  Codes nothing maps to decode as a space.
const fn build_hero_to_ascii(forward: &[u8; CHARSET_SIZE]) -> [u8; CHARSET_SIZE] {
    let mut table = [b' '; CHARSET_SIZE];
    let mut ascii = 0;
    while ascii < CHARSET_SIZE {
        let code = forward[ascii];
        if code != MSGCHR_SPACE {
            table[code as usize] = ascii as u8;
        }
        ascii += 1;
    }
    table
}

/// ASCII code to message character code.  Unsupported characters map to a
/// space.
pub const ASCII_TO_HERO: [u8; CHARSET_SIZE] = build_ascii_to_hero();

/// Message character code to ASCII.  Unmapped codes map to a space.
pub const HERO_TO_ASCII: [u8; CHARSET_SIZE] = build_hero_to_ascii(&ASCII_TO_HERO);

/// Encodes one character.  Anything outside 7-bit ASCII, or without a glyph,
/// becomes a space.
pub fn encode_char(c: char) -> u8 {
    if c.is_ascii() {
        ASCII_TO_HERO[c as usize]
    } else {
        MSGCHR_SPACE
    }
}

/// Decodes one message character.  Only the low 7 bits are significant.
pub fn decode_char(code: u8) -> char {
    HERO_TO_ASCII[(code & 0x7F) as usize] as char
}

/// Whether the character has its own glyph (space included).
pub fn is_supported(c: char) -> bool {
    c == ' ' || encode_char(c) != MSGCHR_SPACE
}

/// Replaces every character without a glyph by a space.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if is_supported(c) { c } else { ' ' })
        .collect()
}

/// Encodes a whole message.  The caller is responsible for the length.
pub fn encode_message(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// Decodes a whole message.
pub fn decode_message(raw: &[u8; TITLE_MESSAGE_LEN]) -> String {
    raw.iter().map(|&code| decode_char(code)).collect()
}
