/// heroed
///
/// Command line editor for the levels of the MSX game H.E.R.O.
///
/// Each invocation opens a ROM image, performs one command against it and
/// exits.  Commands that change the ROM go through an editing session, which
/// holds edits in memory and writes them back in one save at the end, so a
/// command that fails part way through leaves the ROM untouched.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

mod args;
mod config;
mod layout;
mod preview;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;

use hero_common::objects::EnemyKind;
use hero_common::screen::{ScreenData, SideGap, TerrainBand};
use hero_common::tables::{LEVEL_COUNT, SCREEN_BYTE_NAMES, TITLE_MESSAGE_COUNT};
use hero_common::topology::{LevelColor, LevelScreen, ScreenClass};
use hero_rom::analysis::analyze_screens;
use hero_rom::{RomStore, SaveSummary, Session};

use args::Args;
use config::{Command, Config, LevelAnchor};
use layout::LayoutFile;
use preview::{ScreenView, render_screen};

fn main() -> Result<()> {
    let args = Args::parse();

    // Create configuration
    let mut config = args
        .gen_config()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let filter = match config.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG takes precedence over -v
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    // Validate it
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation error: {}", e))?;
    debug!("Configuration: {:?}", config);

    let mut session = open_session(&config)?;
    run(&config, &mut session)
}

fn open_session(config: &Config) -> Result<Session<File>> {
    let store = if config.command.writes() {
        RomStore::open(&config.rom)
    } else {
        RomStore::open_read_only(&config.rom)
    }
    .with_context(|| format!("Failed to open ROM {}", config.rom.display()))?;

    let mut session = Session::new(store).context("Failed to read level layout")?;
    session.subscribe(|event| debug!("Session event: {:?}", event));
    Ok(session)
}

fn run(config: &Config, session: &mut Session<File>) -> Result<()> {
    match &config.command {
        Command::Info => print_info(session),
        Command::Levels => {
            print_levels(session);
            Ok(())
        }
        Command::Screen { screen, json } => print_screen(session, *screen, *json),
        Command::Edit { screen, edits } => {
            select(session, *screen)?;
            session.edit_screen(|data| {
                for edit in edits {
                    edit.apply(data);
                }
            })?;
            let data = session.screen_data()?;
            save(session)?;
            println!("Screen {}: {}", screen, data);
            Ok(())
        }
        Command::Message { slot, set } => {
            if let Some(text) = set {
                session
                    .write_title_message(*slot, text)
                    .with_context(|| format!("Failed to write title message {}", slot))?;
                save(session)?;
            }
            let message = session
                .read_title_message(*slot)
                .with_context(|| format!("Failed to read title message {}", slot))?;
            println!("\"{}\"", message);
            Ok(())
        }
        Command::ModName { set } => {
            if let Some(name) = set {
                session
                    .write_mod_name(name)
                    .context("Failed to write mod name")?;
                save(session)?;
            }
            let name = session.read_mod_name().context("Failed to read mod name")?;
            println!("{}", name);
            Ok(())
        }
        Command::Level { screen, anchor } => {
            select(session, *screen)?;
            let (changed, what) = match anchor {
                LevelAnchor::Start => (session.define_current_screen_as_level_start(), "first"),
                LevelAnchor::End => (session.define_current_screen_as_level_end(), "last"),
            };
            if !changed {
                anyhow::bail!("Screen {} can't be made the {} screen of a level", screen, what);
            }
            save(session)?;
            print_levels(session);
            Ok(())
        }
        Command::LayoutExport { file } => {
            LayoutFile::from_layout(&session.level_layout()).save(file)?;
            info!("Exported level layout to {}", file.display());
            Ok(())
        }
        Command::LayoutImport { file } => {
            let layout = LayoutFile::load(file)?
                .to_layout()
                .map_err(|e| anyhow::anyhow!("Invalid layout file {}: {}", file.display(), e))?;
            session.set_level_layout(layout);
            save(session)?;
            print_levels(session);
            Ok(())
        }
        Command::Analyze => print_analysis(session),
    }
}

fn select(session: &mut Session<File>, screen: u8) -> Result<()> {
    session
        .select_screen(screen as i32)
        .with_context(|| format!("Failed to read screen {}", screen))
}

fn save(session: &mut Session<File>) -> Result<SaveSummary> {
    let summary = session.save_all().context("Failed to save ROM")?;
    if summary.anything_saved() {
        info!(
            "Saved {} screen(s){}",
            summary.screens,
            if summary.layout { " and the level layout" } else { "" }
        );
    }
    Ok(summary)
}

fn print_info(session: &mut Session<File>) -> Result<()> {
    println!("H.E.R.O. ROM Information");
    println!("========================");
    let name = session.read_mod_name().context("Failed to read mod name")?;
    println!("Mod name: {}", name);
    println!();
    println!("Title Messages");
    println!("--------------");
    for slot in 0..TITLE_MESSAGE_COUNT {
        let message = session
            .read_title_message(slot)
            .with_context(|| format!("Failed to read title message {}", slot))?;
        println!("{}: \"{}\"", slot, message);
    }
    println!();
    println!("Level Layout");
    println!("------------");
    let layout = session.level_layout();
    let changed = (0..LEVEL_COUNT)
        .filter(|&level| layout.differs_from_original(level))
        .count();
    let used = (0..hero_common::tables::SCREEN_COUNT)
        .filter(|&screen| layout.level_and_screen_of(screen).is_some())
        .count();
    println!("Levels changed from the original game: {}", changed);
    println!("Screens used by a level:               {}", used);
    Ok(())
}

fn print_levels(session: &Session<File>) {
    let layout = session.level_layout();
    println!("Level  Initial  Count  Final  Colour");
    println!("-----  -------  -----  -----  ------");
    for level in 0..LEVEL_COUNT {
        println!(
            "{:>5}  {:>7}  {:>5}  {:>5}  {:<6}{}",
            level + 1,
            layout.initial_screens[level],
            layout.screen_count[level],
            layout.final_screen(level),
            LevelColor::of_level(Some(level as u8 + 1)).to_string(),
            if layout.differs_from_original(level) { "  *" } else { "" }
        );
    }
}

#[derive(Debug, Serialize)]
struct EnemyReport {
    position: u8,
    kind: EnemyKind,
}

#[derive(Debug, Serialize)]
struct ScreenReport {
    screen: u8,
    location: Option<LevelScreen>,
    class: ScreenClass,
    color: LevelColor,
    data: ScreenData,
    enemy_low: EnemyReport,
    enemy_mid: EnemyReport,
    lantern: u8,
    right_to_left: bool,
    wall: u8,
    magma: bool,
    side_gap: SideGap,
    middle_terrain: String,
    lower_terrain: String,
}

fn screen_report(session: &Session<File>, screen: u8, data: &ScreenData) -> Result<ScreenReport> {
    let decoded = session
        .decoded_screen()
        .with_context(|| format!("Failed to decode screen {}", screen))?;
    let layout = session.level_layout();
    Ok(ScreenReport {
        screen,
        location: layout.level_and_screen_of(screen as usize),
        class: layout.classify(screen as usize),
        color: layout.level_color(screen as usize),
        data: *data,
        enemy_low: EnemyReport {
            position: decoded.enemy_low.position,
            kind: decoded.enemy_low_kind(),
        },
        enemy_mid: EnemyReport {
            position: decoded.enemy_mid.position,
            kind: decoded.enemy_mid_kind(),
        },
        lantern: decoded.lantern.position,
        right_to_left: decoded.lantern.right_to_left,
        wall: decoded.wall.position,
        magma: decoded.wall.magma,
        side_gap: data.side_gap(),
        middle_terrain: data.terrain_row(TerrainBand::Middle).to_screen_string(),
        lower_terrain: data.terrain_row(TerrainBand::Lower).to_screen_string(),
    })
}

fn print_screen(session: &mut Session<File>, screen: u8, json: bool) -> Result<()> {
    select(session, screen)?;
    let data = session.screen_data()?;
    let report = screen_report(session, screen, &data)?;

    if json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize screen")?;
        println!("{}", json);
        return Ok(());
    }

    let prior = session.prior_screen_data();
    let layout = session.level_layout();
    let lines = render_screen(&ScreenView {
        screen,
        data: &data,
        prior: prior.as_ref(),
        layout: &layout,
    });

    let location = match report.location {
        Some(location) => location.to_string(),
        None => "not in a level".to_string(),
    };
    println!("Screen {} ({}, {}, {})", screen, location, report.class, report.color);
    println!("+{}+", "-".repeat(lines[0].chars().count()));
    for line in &lines {
        println!("|{}|", line);
    }
    println!("+{}+", "-".repeat(lines[0].chars().count()));
    println!("Bytes:         {}", report.data);
    println!(
        "Lower enemy:   {} at {}",
        report.enemy_low.kind, report.enemy_low.position
    );
    println!(
        "Middle enemy:  {} at {}",
        report.enemy_mid.kind, report.enemy_mid.position
    );
    println!("Lantern:       {}", report.lantern);
    println!("Wall:          {}", report.wall);
    println!("Magma:         {}", report.magma);
    println!("Right to left: {}", report.right_to_left);
    println!("Side gap:      {}", report.side_gap);
    Ok(())
}

fn print_analysis(session: &mut Session<File>) -> Result<()> {
    let analysis = analyze_screens(session).context("Failed to analyze screens")?;
    for class in analysis {
        println!();
        println!("{} screens ({})", class.class, class.screens.len());
        println!("{}", "-".repeat(40));
        for (name, values) in SCREEN_BYTE_NAMES.iter().zip(class.values.iter()) {
            let values: Vec<String> = values.iter().map(|v| format!("{:02X}", v)).collect();
            println!("{:<12} {}", name, values.join(" "));
        }
    }
    Ok(())
}
