// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use hero_common::objects::{EnemyKind, ObjectSlot};
use hero_common::screen::{SideGap, TerrainBand};

use crate::config::{Command, Config, LevelAnchor, ScreenEdit};

#[derive(Parser, Debug)]
#[command(name = "heroed")]
#[command(about = "HEROED - MSX H.E.R.O. level editor")]
#[command(version)]
#[command(after_help = "Use 'help <subcommand>' for detailed options (e.g., 'help edit')")]
pub struct Args {
    /// Increase logging (-v info, -vv debug, -vvv trace).  RUST_LOG
    /// overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Outputs the mod name, title messages and a summary of the level
    /// layout
    Info {
        /// ROM file
        rom: PathBuf,
    },
    /// Outputs the initial screen, screen count, final screen and colour of
    /// every level, marking levels changed from the original game
    Levels {
        /// ROM file
        rom: PathBuf,
    },
    /// Previews one screen and outputs its decoded fields
    Screen {
        /// ROM file
        rom: PathBuf,
        /// Absolute screen number (0-255)
        #[arg(short, long, value_parser = parse_screen)]
        screen: u8,
        /// Output the decoded screen as JSON instead
        #[arg(long, default_value = "false")]
        json: bool,
    },
    /// Edits one screen and saves it.  Edits are applied in the order
    /// below, whatever their order on the command line:
    /// enemies, lantern, wall, attributes, side gap, terrain.
    #[command(verbatim_doc_comment)]
    Edit {
        /// ROM file
        rom: PathBuf,
        /// Absolute screen number (0-255)
        #[arg(short, long, value_parser = parse_screen)]
        screen: u8,
        #[command(flatten)]
        edits: EditArgs,
    },
    /// Reads or writes a title screen message
    Message {
        /// ROM file
        rom: PathBuf,
        /// Message slot (0-3)
        #[arg(short = 'n', long, value_parser = parse_slot)]
        slot: usize,
        /// New message, up to 32 characters (padded with spaces)
        #[arg(long)]
        set: Option<String>,
    },
    /// Reads or writes the mod name, held in the first title message
    ModName {
        /// ROM file
        rom: PathBuf,
        /// New mod name, up to 15 characters
        #[arg(long)]
        set: Option<String>,
    },
    /// Makes a screen the first or last screen of its level
    Level {
        /// ROM file
        rom: PathBuf,
        /// Absolute screen number (0-255)
        #[arg(short, long, value_parser = parse_screen)]
        screen: u8,
        /// Make the screen the first screen of its level
        #[arg(long, conflicts_with = "end", required_unless_present = "end")]
        start: bool,
        /// Make the screen the last screen of its level
        #[arg(long)]
        end: bool,
    },
    /// Exports or imports the level layout as JSON
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },
    /// Lists the distinct values of each screen byte, by class of screen
    Analyze {
        /// ROM file
        rom: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum LayoutAction {
    /// Writes the level layout to a JSON file
    Export {
        /// ROM file
        rom: PathBuf,
        /// JSON file to write
        file: PathBuf,
    },
    /// Reads the level layout from a JSON file and saves it to the ROM
    Import {
        /// ROM file
        rom: PathBuf,
        /// JSON file to read
        file: PathBuf,
    },
}

#[derive(ClapArgs, Debug, Default)]
struct EditArgs {
    /// Lower enemy position (0-39, 36 hides it) and optional type
    /// (spider, bat, moth, snake), e.g. 20:bat
    #[arg(long, value_parser = parse_enemy, value_name = "POS[:KIND]")]
    enemy_low: Option<(u8, Option<EnemyKind>)>,
    /// Middle enemy position and optional type, as --enemy-low
    #[arg(long, value_parser = parse_enemy, value_name = "POS[:KIND]")]
    enemy_mid: Option<(u8, Option<EnemyKind>)>,
    /// Lantern position (0-39, 36 hides it)
    #[arg(long, value_parser = parse_position, value_name = "POS")]
    lantern: Option<u8>,
    /// Wall position (4-35, 0 for no wall)
    #[arg(long, value_parser = parse_position, value_name = "POS")]
    wall: Option<u8>,
    /// Magma walls (on or off)
    #[arg(long, value_parser = parse_on_off, value_name = "on|off")]
    magma: Option<bool>,
    /// Right to left screen (on or off)
    #[arg(long, value_parser = parse_on_off, value_name = "on|off")]
    right_to_left: Option<bool>,
    /// Side gap (none, alt-right, right, left)
    #[arg(long, value_parser = parse_side_gap)]
    side_gap: Option<SideGap>,
    /// Toggle a middle terrain bit (0-31), may be repeated
    #[arg(long, value_parser = parse_bit, value_name = "BIT")]
    toggle_mid: Vec<usize>,
    /// Toggle a lower terrain bit (0-31), may be repeated
    #[arg(long, value_parser = parse_bit, value_name = "BIT")]
    toggle_low: Vec<usize>,
}

impl EditArgs {
    fn into_edits(self) -> Vec<ScreenEdit> {
        let mut edits = Vec::new();
        for (slot, enemy) in [
            (ObjectSlot::EnemyLow, self.enemy_low),
            (ObjectSlot::EnemyMid, self.enemy_mid),
        ] {
            if let Some((position, kind)) = enemy {
                edits.push(ScreenEdit::Position { slot, position });
                if let Some(kind) = kind {
                    edits.push(ScreenEdit::EnemyKind { slot, kind });
                }
            }
        }
        if let Some(position) = self.lantern {
            edits.push(ScreenEdit::Position {
                slot: ObjectSlot::Lantern,
                position,
            });
        }
        if let Some(position) = self.wall {
            edits.push(ScreenEdit::Position {
                slot: ObjectSlot::Wall,
                position,
            });
        }
        if let Some(magma) = self.magma {
            edits.push(ScreenEdit::Magma(magma));
        }
        if let Some(right_to_left) = self.right_to_left {
            edits.push(ScreenEdit::RightToLeft(right_to_left));
        }
        if let Some(side_gap) = self.side_gap {
            edits.push(ScreenEdit::SideGap(side_gap));
        }
        for bit in self.toggle_mid {
            edits.push(ScreenEdit::ToggleTerrain {
                band: TerrainBand::Middle,
                bit,
            });
        }
        for bit in self.toggle_low {
            edits.push(ScreenEdit::ToggleTerrain {
                band: TerrainBand::Lower,
                bit,
            });
        }
        edits
    }
}

fn parse_number(s: &str) -> Result<u32, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(hex) = s.strip_prefix('$') {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse::<u32>()
    };
    parsed.map_err(|_| format!("Invalid number: {}", s))
}

fn parse_screen(s: &str) -> Result<u8, String> {
    let screen = parse_number(s)?;
    u8::try_from(screen).map_err(|_| format!("Screen must be 0-255, got {}", screen))
}

fn parse_slot(s: &str) -> Result<usize, String> {
    match parse_number(s)? {
        slot @ 0..=3 => Ok(slot as usize),
        slot => Err(format!("Message slot must be 0-3, got {}", slot)),
    }
}

fn parse_position(s: &str) -> Result<u8, String> {
    match parse_number(s)? {
        position @ 0..=39 => Ok(position as u8),
        position => Err(format!("Position must be 0-39, got {}", position)),
    }
}

fn parse_enemy(s: &str) -> Result<(u8, Option<EnemyKind>), String> {
    match s.split_once(':') {
        Some((position, kind)) => {
            let kind = EnemyKind::try_from_str(kind).ok_or_else(|| {
                format!(
                    "Invalid enemy type: {}. Valid values are: spider, bat, moth, snake",
                    kind
                )
            })?;
            Ok((parse_position(position)?, Some(kind)))
        }
        None => Ok((parse_position(s)?, None)),
    }
}

fn parse_on_off(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "on" | "1" | "true" => Ok(true),
        "off" | "0" | "false" => Ok(false),
        _ => Err(format!("Invalid value: {}. Valid values are: on, off", s)),
    }
}

fn parse_side_gap(s: &str) -> Result<SideGap, String> {
    SideGap::try_from_str(s).ok_or_else(|| {
        format!(
            "Invalid side gap: {}. Valid values are: none, alt-right, right, left",
            s
        )
    })
}

fn parse_bit(s: &str) -> Result<usize, String> {
    match parse_number(s)? {
        bit @ 0..=31 => Ok(bit as usize),
        bit => Err(format!("Terrain bit must be 0-31, got {}", bit)),
    }
}

impl Args {
    /// Builds the configuration from the command line.  The result still
    /// needs validating.
    pub fn gen_config(self) -> Result<Config, String> {
        let (rom, command) = match self.command {
            Commands::Info { rom } => (rom, Command::Info),
            Commands::Levels { rom } => (rom, Command::Levels),
            Commands::Screen { rom, screen, json } => (rom, Command::Screen { screen, json }),
            Commands::Edit { rom, screen, edits } => (
                rom,
                Command::Edit {
                    screen,
                    edits: edits.into_edits(),
                },
            ),
            Commands::Message { rom, slot, set } => (rom, Command::Message { slot, set }),
            Commands::ModName { rom, set } => (rom, Command::ModName { set }),
            Commands::Level {
                rom,
                screen,
                start,
                end,
            } => {
                let anchor = match (start, end) {
                    (true, false) => LevelAnchor::Start,
                    (false, true) => LevelAnchor::End,
                    _ => return Err("Specify exactly one of --start and --end".to_string()),
                };
                (rom, Command::Level { screen, anchor })
            }
            Commands::Layout { action } => match action {
                LayoutAction::Export { rom, file } => (rom, Command::LayoutExport { file }),
                LayoutAction::Import { rom, file } => (rom, Command::LayoutImport { file }),
            },
            Commands::Analyze { rom } => (rom, Command::Analyze),
        };

        Ok(Config {
            rom,
            verbose: self.verbose,
            command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        Args::try_parse_from(args).unwrap().gen_config().unwrap()
    }

    #[test]
    fn test_parsers() {
        assert_eq!(parse_screen("0xFF"), Ok(255));
        assert_eq!(parse_screen("$10"), Ok(16));
        assert!(parse_screen("256").is_err());
        assert_eq!(parse_enemy("20:bat"), Ok((20, Some(EnemyKind::Bat))));
        assert_eq!(parse_enemy("36"), Ok((36, None)));
        assert!(parse_enemy("20:frog").is_err());
        assert!(parse_position("40").is_err());
        assert_eq!(parse_on_off("ON"), Ok(true));
        assert_eq!(parse_side_gap("alt-right"), Ok(SideGap::AltRight));
        assert!(parse_bit("32").is_err());
        assert!(parse_slot("4").is_err());
    }

    #[test]
    fn test_edit_command() {
        let config = config(&[
            "heroed",
            "-v",
            "edit",
            "hero.rom",
            "-s",
            "12",
            "--toggle-low",
            "3",
            "--enemy-mid",
            "10:moth",
            "--magma",
            "on",
            "--toggle-low",
            "4",
        ]);
        assert_eq!(config.verbose, 1);
        assert_eq!(config.rom, PathBuf::from("hero.rom"));
        let Command::Edit { screen, edits } = config.command else {
            panic!("Expected edit command");
        };
        assert_eq!(screen, 12);
        assert_eq!(
            edits,
            vec![
                ScreenEdit::Position {
                    slot: ObjectSlot::EnemyMid,
                    position: 10
                },
                ScreenEdit::EnemyKind {
                    slot: ObjectSlot::EnemyMid,
                    kind: EnemyKind::Moth
                },
                ScreenEdit::Magma(true),
                ScreenEdit::ToggleTerrain {
                    band: TerrainBand::Lower,
                    bit: 3
                },
                ScreenEdit::ToggleTerrain {
                    band: TerrainBand::Lower,
                    bit: 4
                },
            ]
        );
    }

    #[test]
    fn test_level_command() {
        let config = config(&["heroed", "level", "hero.rom", "-s", "8", "--end"]);
        assert_eq!(
            config.command,
            Command::Level {
                screen: 8,
                anchor: LevelAnchor::End
            }
        );
        assert!(Args::try_parse_from(["heroed", "level", "hero.rom", "-s", "8"]).is_err());
        assert!(
            Args::try_parse_from(["heroed", "level", "hero.rom", "-s", "8", "--start", "--end"])
                .is_err()
        );
    }

    #[test]
    fn test_layout_commands() {
        let import = config(&["heroed", "layout", "import", "hero.rom", "layout.json"]);
        assert_eq!(
            import.command,
            Command::LayoutImport {
                file: PathBuf::from("layout.json")
            }
        );
        let analyze = config(&["heroed", "-vv", "analyze", "hero.rom"]);
        assert_eq!(analyze.verbose, 2);
        assert_eq!(analyze.command, Command::Analyze);
    }
}
