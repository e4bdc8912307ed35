mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use hero_kokaton::compute::{init_state, tick};
use hero_kokaton::config::{GameConfig, LoggingConfig};
use hero_kokaton::entities::{GameState, GameStatus};
use hero_kokaton::error::GameError;
use hero_kokaton::input::{FrameInput, HeldKeys};

/// How long the defeat screen stays up before the game exits.
const DEFEAT_PAUSE: Duration = Duration::from_secs(2);

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// at 50 FPS a window of 6 frames (120 ms) outlasts the OS key-repeat gap.
const HOLD_WINDOW: u64 = 6;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn held_keys(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> HeldKeys {
    HeldKeys {
        up: any_held(
            key_frame,
            &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
            frame,
        ),
        down: any_held(
            key_frame,
            &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
            frame,
        ),
        left: any_held(
            key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        ),
        right: any_held(
            key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        ),
    }
}

fn is_quit(code: &KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is busy with the game, so log lines go to a file.
fn init_logging(config: &LoggingConfig) -> Result<(), GameError> {
    let file = File::create(&config.file).map_err(|source| GameError::LogFile {
        path: config.file.clone(),
        source,
    })?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.filter.as_str()),
    )
    .target(env_logger::Target::Pipe(Box::new(file)))
    .try_init()?;
    Ok(())
}

// ── Title screen ──────────────────────────────────────────────────────────────

/// Returns `true` to start playing, `false` to quit.
fn title_screen<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<bool> {
    display::render_title(out)?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            })) => {
                if code == KeyCode::Enter {
                    return Ok(true);
                }
                if is_quit(&code, modifiers) {
                    return Ok(false);
                }
            }
            Ok(Event::Resize(..)) => display::render_title(out)?,
            Ok(_) => {}
            // Input thread gone: nothing more will ever arrive.
            Err(_) => return Ok(false),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits or is defeated.
///
/// Input model: a `key_frame` map records the frame of the last press/repeat
/// event for every key, so arrow keys combine into diagonals and Space can be
/// held while moving.  Fire, sword and shield are one-shot: they trigger on a
/// fresh press only.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let frame_time = Duration::from_secs(1) / state.rules.screen.tick_rate;

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut input = FrameInput::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    if is_quit(&code, modifiers) {
                        info!("quit requested at tick {}", state.tick);
                        return Ok(());
                    }
                    input.press(&code);
                    key_frame.insert(code, frame);
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        input.held = held_keys(&key_frame, frame);
        *state = tick(state, &input, &mut rng);
        display::render(out, state)?;

        if state.status == GameStatus::GameOver {
            thread::sleep(DEFEAT_PAUSE);
            return Ok(());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let (config, source) = GameConfig::discover()?;
    init_logging(&config.logging)?;
    match &source {
        Some(path) => info!("config loaded from {}", path.display()),
        None => info!("no config file, using defaults"),
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events need the kitty keyboard protocol; without it held
    // keys are tracked through the hold window alone.
    let keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    if !keyboard_enhanced {
        warn!("terminal has no key-release events; falling back to hold window");
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("game aborted: {e}");
    }
    result.map_err(GameError::from)
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<()> {
    if !title_screen(out, rx)? {
        info!("quit from title screen");
        return Ok(());
    }

    let mut state = init_state(config.rules);
    info!("game started");
    game_loop(out, &mut state, rx)?;
    info!(
        "game ended at tick {}: score {}, kills {}, difficulty {}",
        state.tick, state.hud.score, state.hud.kills, state.hud.difficulty
    );
    Ok(())
}
