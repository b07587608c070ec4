use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};

use starwave::audio::AudioService;
use starwave::config::{Bindings, KeyBindings, KEYS_FILE};
use starwave::display::{self, Viewport};
use starwave::entities::Screen;
use starwave::input::KeyTracker;
use starwave::session::Session;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Settings,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  S T A R W A V E  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let options: &[(&str, &str, Color)] = &[
        ("1", "Start", Color::Green),
        ("2", "Settings", Color::Yellow),
        ("Q", "Quit", Color::Red),
    ];

    for (i, (key, label, color)) in options.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(8), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*label))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 3))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Dodge the raiders. Shoot them first."))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind, .. })) => {
                if kind != KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Char('1') | KeyCode::Enter => return Ok(MenuResult::Start),
                    KeyCode::Char('2') => return Ok(MenuResult::Settings),
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(MenuResult::Quit);
                    }
                    _ => {}
                }
            }
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit), // input thread gone
        }
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

fn show_settings<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    audio: &mut AudioService,
    keys: &KeyBindings,
) -> std::io::Result<()> {
    loop {
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        let (width, height) = terminal::size()?;
        let cx = width / 2;
        let cy = height / 2;

        let title = "S E T T I N G S";
        out.queue(cursor::MoveTo(
            cx.saturating_sub(title.chars().count() as u16 / 2),
            cy.saturating_sub(6),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(title))?;

        out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(3)))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(format!("Music volume: {:.1}", audio.volume())))?;
        out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(2)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print("+ / - : adjust"))?;

        let bindings: &[(&str, &str)] = &[
            ("Left", keys.left.as_str()),
            ("Right", keys.right.as_str()),
            ("Up", keys.up.as_str()),
            ("Down", keys.down.as_str()),
            ("Fire", keys.fire.as_str()),
        ];
        for (i, (action, key)) in bindings.iter().enumerate() {
            out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + i as u16))?;
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(format!("{:<6}: ", action)))?;
            out.queue(style::SetForegroundColor(Color::White))?;
            out.queue(Print(*key))?;
        }

        out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 7))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("Edit {} to rebind   ESC : Back", KEYS_FILE)))?;

        out.queue(style::ResetColor)?;
        out.flush()?;

        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind, .. })) => {
                if kind != KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        audio.adjust_volume(0.1);
                    }
                    KeyCode::Char('-') => {
                        audio.adjust_volume(-0.1);
                    }
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    _ => {}
                }
            }
            Ok(_) => {}
            Err(_) => return Ok(()),
        }
    }
}

// ── Play loop ─────────────────────────────────────────────────────────────────

enum PlayOutcome {
    Quit,
    Menu,
    Restart,
}

fn play_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session: &mut Session,
    audio: &mut AudioService,
    bindings: &Bindings,
    view: Viewport,
) -> std::io::Result<PlayOutcome> {
    let mut tracker = KeyTracker::new();
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        tracker.begin_frame();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            if kind == KeyEventKind::Press {
                match code {
                    KeyCode::Esc => return Ok(PlayOutcome::Menu),
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(PlayOutcome::Quit),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(PlayOutcome::Quit);
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') if session.game_over => {
                        return Ok(PlayOutcome::Restart);
                    }
                    _ => {}
                }
            }
            tracker.record(code, kind);
        }

        // Wall-clock seconds since the previous frame; the simulation is
        // directly proportional to frame time, no fixed-step accumulation.
        let delta = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();

        let input = tracker.snapshot(bindings);
        session.update(delta, &input, audio);
        display::render(out, session, view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let key_bindings = KeyBindings::load(Path::new(KEYS_FILE));
    let bindings = key_bindings.resolve();

    // Audio lives for the whole process; a missing device means silence.
    let mut audio = AudioService::new();
    audio.play_music();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &mut audio, &key_bindings, &bindings);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    audio.stop_music();

    result.context("terminal session failed")?;
    Ok(())
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    audio: &mut AudioService,
    key_bindings: &KeyBindings,
    bindings: &Bindings,
) -> std::io::Result<()> {
    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Settings => show_settings(out, rx, audio, key_bindings)?,
            MenuResult::Start => loop {
                let (cols, rows) = terminal::size()?;
                let view = Viewport { cols, rows };
                let mut session = Session::new(Screen::default());

                match play_loop(out, rx, &mut session, audio, bindings, view)? {
                    PlayOutcome::Quit => return Ok(()),
                    PlayOutcome::Menu => break, // session dropped → teardown
                    PlayOutcome::Restart => continue,
                }
            },
        }
    }
    Ok(())
}
