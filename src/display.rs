//! Rendering layer — all terminal drawing for the play session lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session. No game logic is performed; this module only maps virtual
//! pixel coordinates to terminal cells and translates state into terminal
//! commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::entities::{Enemy, Player, Projectile, Screen, ENEMY_HEIGHT, ENEMY_WIDTH, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::session::Session;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Green;
const C_HUD_SHIELD: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_EXPLOSION: Color = Color::Yellow;
const C_PROJECTILE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

// ── Virtual-pixel → cell mapping ─────────────────────────────────────────────

/// Maps virtual playfield coordinates into the bordered terminal area.
/// Row 0 is the HUD, rows 1 and `rows-2` the border, `rows-1` the hint
/// line; the playfield occupies what is left, with the virtual y axis
/// flipped (origin bottom-left → rows grow downward).
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn col(&self, screen: &Screen, x: f32) -> u16 {
        let inner = self.cols.saturating_sub(2).max(1);
        let cell = (x / screen.width * inner as f32) as i32 + 1;
        cell.clamp(1, self.cols.saturating_sub(2).max(1) as i32) as u16
    }

    pub fn row(&self, screen: &Screen, y: f32) -> u16 {
        let top = 2u16;
        let bottom = self.rows.saturating_sub(3).max(top);
        let inner = (bottom - top) as f32;
        let frac = 1.0 - (y / screen.height).clamp(0.0, 1.0);
        let cell = top as i32 + (frac * inner) as i32;
        cell.clamp(top as i32, bottom as i32) as u16
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame. While the session is over only the end
/// screen is drawn.
pub fn render<W: Write>(out: &mut W, session: &Session, view: Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if session.game_over {
        draw_game_over(out, session, view)?;
        out.queue(style::ResetColor)?;
        out.flush()?;
        return Ok(());
    }

    draw_border(out, view)?;
    draw_hud(out, session, view)?;

    for enemy in &session.enemies {
        draw_enemy(out, enemy, &session.screen, view)?;
    }
    for projectile in &session.projectiles {
        draw_projectile(out, projectile, &session.screen, view)?;
    }
    draw_player(out, &session.player, &session.screen, view)?;
    draw_controls_hint(out, view)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &Session, view: Viewport) -> std::io::Result<()> {
    let hearts: String = "♥".repeat(session.lives.max(0) as usize);
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(format!("Lives:{}", hearts)))?;

    let score_str = format!("Score:{:>6}", session.score);
    let sx = (view.cols / 2).saturating_sub(score_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&score_str))?;

    let mut right = format!("Level:{}", session.level);
    if session.invincibility_timer > 0.0 {
        // Integer-truncated remaining seconds, as the source displayed it.
        right = format!("Shield:{}s  {}", session.invincibility_timer as i32, right);
    }
    let rx = view.cols.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    if session.invincibility_timer > 0.0 {
        out.queue(style::SetForegroundColor(C_HUD_SHIELD))?;
    } else {
        out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    }
    out.queue(Print(&right))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(
    out: &mut W,
    player: &Player,
    screen: &Screen,
    view: Viewport,
) -> std::io::Result<()> {
    // Anchor on the sprite's top-centre:
    //   ▲       ← tip
    //  /█\      ← fuselage + wings
    let col = view.col(screen, player.x + PLAYER_WIDTH / 2.0);
    let row = view.row(screen, player.y + PLAYER_HEIGHT);

    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print("▲"))?;

    let wing_row = row + 1;
    if wing_row < view.rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), wing_row))?;
        out.queue(Print("/█\\"))?;
    }

    Ok(())
}

fn draw_enemy<W: Write>(
    out: &mut W,
    enemy: &Enemy,
    screen: &Screen,
    view: Viewport,
) -> std::io::Result<()> {
    let col = view.col(screen, enemy.x + ENEMY_WIDTH / 2.0);
    let row = view.row(screen, enemy.y + ENEMY_HEIGHT);
    let lx = col.saturating_sub(1).max(1);

    if enemy.destroyed {
        out.queue(style::SetForegroundColor(C_EXPLOSION))?;
        out.queue(cursor::MoveTo(lx, row))?;
        out.queue(Print("✶✹✶"))?;
        return Ok(());
    }

    //   «▼»    ← swept-back wings
    //   ╚═╝    ← engine block
    out.queue(style::SetForegroundColor(C_ENEMY))?;
    out.queue(cursor::MoveTo(lx, row))?;
    out.queue(Print("«▼»"))?;
    if row + 1 < view.rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(lx, row + 1))?;
        out.queue(Print("╚═╝"))?;
    }

    Ok(())
}

fn draw_projectile<W: Write>(
    out: &mut W,
    projectile: &Projectile,
    screen: &Screen,
    view: Viewport,
) -> std::io::Result<()> {
    if !projectile.active {
        return Ok(());
    }
    let col = view.col(screen, projectile.x);
    let row = view.row(screen, projectile.y);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_PROJECTILE))?;
    out.queue(Print("║"))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Arrows : Move   SPACE : Shoot   ESC : Menu   Q : Quit"))?;
    Ok(())
}

// ── Game-over screen ──────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, session: &Session, view: Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", session.score);
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║     GAME  OVER     ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];

    let cx = view.cols / 2;
    let total_rows = lines.len() as u16 + 2; // box + score + hint
    let start_row = (view.rows / 2).saturating_sub(total_rows / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let hint = "R - Play Again   ESC - Menu   Q - Quit";
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row + 1))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
