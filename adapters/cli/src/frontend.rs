//! Frame loop, keyboard mapping, and text rendering.
//!
//! Owns the host side of the engine contract: one intent polled per tick,
//! one read-only view drawn per frame, and the single live world state
//! replaced atomically between frames.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use delve_core::{GridPos, Intent, WorldView};
use delve_system_turns::TurnEngine;
use delve_world::{query, WorldState};
use rand_chacha::ChaCha8Rng;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

const WALL_GLYPH: char = '#';
const FLOOR_GLYPH: char = '.';
const PLAYER_GLYPH: char = '@';
const ENEMY_GLYPH: char = 'e';
const ITEM_GLYPH: char = '!';

/// Everything the keyboard can ask of the frame loop.
enum HostInput {
    Intent(Intent),
    Quit,
}

/// Runs the frame loop until the player quits.
pub(crate) fn run(engine: &TurnEngine, world: WorldState, rng: ChaCha8Rng) -> Result<()> {
    let mut session = TerminalSession::enter()?;
    let mut world = world;
    let mut rng = rng;

    loop {
        session.draw(&query::world_view(&world))?;

        let Some(input) = poll_input(POLL_INTERVAL)? else {
            continue;
        };
        match input {
            HostInput::Quit => break,
            HostInput::Intent(intent) => {
                let mut events = Vec::new();
                world = engine.advance(&world, intent, &mut rng, &mut events)?;
                for event in &events {
                    tracing::debug!(?event, "turn resolved");
                }
            }
        }
    }

    Ok(())
}

fn poll_input(timeout: Duration) -> Result<Option<HostInput>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let TermEvent::Key(key) = event::read()? else {
        return Ok(None);
    };
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }
    Ok(map_key(key))
}

fn map_key(key: KeyEvent) -> Option<HostInput> {
    let intent = match key.code {
        KeyCode::Up | KeyCode::Char('w') => Intent::Move { dx: 0, dy: -1 },
        KeyCode::Down | KeyCode::Char('s') => Intent::Move { dx: 0, dy: 1 },
        KeyCode::Left | KeyCode::Char('a') => Intent::Move { dx: -1, dy: 0 },
        KeyCode::Right | KeyCode::Char('d') => Intent::Move { dx: 1, dy: 0 },
        KeyCode::Char(' ') => Intent::Acknowledge,
        KeyCode::Char('r') => Intent::Restart,
        KeyCode::Char('q') | KeyCode::Esc => return Some(HostInput::Quit),
        _ => return None,
    };
    Some(HostInput::Intent(intent))
}

/// Raw-mode alternate-screen session, restored on drop.
struct TerminalSession {
    stdout: Stdout,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self { stdout })
    }

    fn draw(&mut self, view: &WorldView<'_>) -> Result<()> {
        let (columns, rows) = view.tiles.dimensions();
        let mut glyphs = vec![vec![FLOOR_GLYPH; columns as usize]; rows as usize];
        for y in 0..rows {
            for x in 0..columns {
                if !view.tiles.is_floor(GridPos::new(x, y)) {
                    glyphs[y as usize][x as usize] = WALL_GLYPH;
                }
            }
        }
        for item in view.items.iter() {
            put(&mut glyphs, item.pos, ITEM_GLYPH);
        }
        for enemy in view.enemies.iter() {
            put(&mut glyphs, enemy.pos, ENEMY_GLYPH);
        }
        put(&mut glyphs, view.player.pos, PLAYER_GLYPH);

        queue!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        let hud = format!(
            "HP: {} LV: {} EXP: {}",
            view.player.hp.get(),
            view.level,
            view.player.exp
        );
        queue!(self.stdout, Print(hud))?;
        for (row, line) in glyphs.iter().enumerate() {
            let text: String = line.iter().collect();
            queue!(self.stdout, MoveTo(0, row as u16 + 1), Print(text))?;
        }

        let status_row = rows as u16 + 2;
        if !view.message.is_empty() {
            let hint = if view.awaiting_ack { "  [SPACE]" } else { "" };
            queue!(
                self.stdout,
                MoveTo(0, status_row),
                Print(format!("{}{hint}", view.message))
            )?;
        }
        if view.game_over {
            queue!(
                self.stdout,
                MoveTo(0, status_row + 1),
                Print("GAME OVER - PRESS R TO RESTART")
            )?;
        }

        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn put(glyphs: &mut [Vec<char>], pos: GridPos, glyph: char) {
    let row = pos.y() as usize;
    let column = pos.x() as usize;
    if let Some(cell) = glyphs.get_mut(row).and_then(|line| line.get_mut(column)) {
        *cell = glyph;
    }
}
