//! Terminal virtual board: a ratatui display and crossterm keyboard input.

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use pixtick_input::{InputError, RawInput};
use pixtick_render::{Bitmap, DisplayError, Surface};
use pixtick_runtime::{Config, Devices, Hardware, RuntimeError};
use pixtick_types::{Color, KeySet, LogicalKey, Size, KEY_COUNT};
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color as TermColor, Style};
use ratatui::widgets::{Block, Paragraph, Widget};
use ratatui::Terminal;
use tracing::debug;

use crate::bindings::{self, Action};

/// How long a key counts as held after its last press or repeat when the
/// terminal cannot report releases.
const DEFAULT_HOLD_WINDOW: Duration = Duration::from_millis(400);

/// Set when the user asks to quit.
#[derive(Debug, Clone, Default)]
pub struct QuitSignal(Arc<AtomicBool>);

impl QuitSignal {
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The terminal as a pixtick board.
pub struct TerminalBoard {
    quit: QuitSignal,
    hold_window: Duration,
}

impl TerminalBoard {
    pub fn new() -> Self {
        Self {
            quit: QuitSignal::default(),
            hold_window: DEFAULT_HOLD_WINDOW,
        }
    }

    pub fn quit_signal(&self) -> QuitSignal {
        self.quit.clone()
    }
}

impl Default for TerminalBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Hardware for TerminalBoard {
    fn name(&self) -> &str {
        "terminal"
    }

    fn init(&mut self, config: &Config) -> Result<Devices, RuntimeError> {
        let session = TerminalSession::enter()
            .map_err(|e| RuntimeError::HardwareInit(format!("terminal setup failed: {e}")))?;
        let keys = TerminalKeys::new(self.quit.clone(), session.reports_releases, self.hold_window);
        let display = TerminalDisplay::new(session, config.display_size());
        Ok(Devices::new(keys, display))
    }
}

/// Raw mode and the alternate screen, restored on drop.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    reports_releases: bool,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        match Self::setup() {
            Ok(session) => Ok(session),
            Err(e) => {
                let _ = io::stdout().execute(LeaveAlternateScreen);
                let _ = disable_raw_mode();
                Err(e)
            }
        }
    }

    fn setup() -> io::Result<Self> {
        io::stdout().execute(EnterAlternateScreen)?;
        let reports_releases = matches!(supports_keyboard_enhancement(), Ok(true));
        if reports_releases {
            io::stdout().execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        debug!(reports_releases, "terminal session started");
        Ok(Self {
            terminal,
            reports_releases,
        })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.reports_releases {
            let _ = io::stdout().execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.terminal.show_cursor();
        let _ = io::stdout().execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Frame buffer rendered with half-block characters, two pixels per cell.
pub struct TerminalDisplay {
    session: TerminalSession,
    frame: Bitmap,
    frames: u64,
}

impl TerminalDisplay {
    fn new(session: TerminalSession, size: Size) -> Self {
        Self {
            session,
            frame: Bitmap::new(size),
            frames: 0,
        }
    }
}

impl Surface for TerminalDisplay {
    fn size(&self) -> Size {
        self.frame.size()
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.frame.set(x, y, color.is_on());
    }

    fn clear(&mut self) {
        self.frame.fill(false);
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.frames += 1;
        let frame = &self.frame;
        let title = format!(" pixtick {} ", frame.size());
        let footer = format!("frame {}   quit: {}", self.frames, bindings::QUIT_KEYS);
        self.session.terminal.draw(|f| {
            let rows = u16::try_from(frame.height().div_ceil(2)).unwrap_or(u16::MAX);
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(rows.saturating_add(2)), // panel
                    Constraint::Length(1),                      // footer
                    Constraint::Min(0),
                ])
                .split(f.area());
            let block = Block::bordered().title(title.as_str());
            let inner = block.inner(chunks[0]);
            f.render_widget(block, chunks[0]);
            f.render_widget(HalfBlocks(frame), inner);
            f.render_widget(
                Paragraph::new(footer.as_str()).style(Style::default().fg(TermColor::DarkGray)),
                chunks[1],
            );
        })?;
        Ok(())
    }
}

/// Renders a bitmap using `▀`, `▄` and `█`.
struct HalfBlocks<'a>(&'a Bitmap);

impl Widget for HalfBlocks<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bitmap = self.0;
        for row in 0..area.height {
            for col in 0..area.width {
                let x = i32::from(col);
                let top = bitmap.get(x, i32::from(row) * 2);
                let bottom = bitmap.get(x, i32::from(row) * 2 + 1);
                let ch = match (top, bottom) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(ch);
                }
            }
        }
    }
}

/// Keyboard input mapped through [`bindings::action`].
pub struct TerminalKeys {
    quit: QuitSignal,
    reports_releases: bool,
    hold_window: Duration,
    last_seen: [Option<Instant>; KEY_COUNT],
    held: KeySet,
}

impl TerminalKeys {
    fn new(quit: QuitSignal, reports_releases: bool, hold_window: Duration) -> Self {
        Self {
            quit,
            reports_releases,
            hold_window,
            last_seen: [None; KEY_COUNT],
            held: KeySet::empty(),
        }
    }

    fn handle(&mut self, kind: KeyEventKind, key: LogicalKey, now: Instant) {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen[key.index()] = Some(now);
                self.held.insert(key);
            }
            KeyEventKind::Release => {
                self.last_seen[key.index()] = None;
                self.held.remove(key);
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        if self.reports_releases {
            return;
        }
        for key in LogicalKey::ALL {
            let stale = self.last_seen[key.index()]
                .is_some_and(|seen| now.duration_since(seen) > self.hold_window);
            if stale {
                self.last_seen[key.index()] = None;
                self.held.remove(key);
            }
        }
    }
}

impl RawInput for TerminalKeys {
    fn begin_tick(&mut self) -> Result<(), InputError> {
        let now = Instant::now();
        while event::poll(Duration::ZERO).map_err(|e| InputError::Poll(e.to_string()))? {
            let Event::Key(key) = event::read().map_err(|e| InputError::Poll(e.to_string()))?
            else {
                continue;
            };
            match bindings::action(&key) {
                Some(Action::Quit) => self.quit.request(),
                Some(Action::Key(logical)) => self.handle(key.kind, logical, now),
                None => {}
            }
        }
        self.expire(now);
        Ok(())
    }

    fn sample_line(&mut self, key: LogicalKey) -> bool {
        self.held.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presses_expire_without_release_reports() {
        let mut keys = TerminalKeys::new(QuitSignal::default(), false, Duration::from_millis(100));
        let start = Instant::now();
        keys.handle(KeyEventKind::Press, LogicalKey::Up, start);
        keys.expire(start + Duration::from_millis(50));
        assert!(keys.sample_line(LogicalKey::Up));

        keys.handle(KeyEventKind::Repeat, LogicalKey::Up, start + Duration::from_millis(90));
        keys.expire(start + Duration::from_millis(150));
        assert!(keys.sample_line(LogicalKey::Up));

        keys.expire(start + Duration::from_millis(300));
        assert!(!keys.sample_line(LogicalKey::Up));
    }

    #[test]
    fn releases_are_exact_when_reported() {
        let mut keys = TerminalKeys::new(QuitSignal::default(), true, Duration::from_millis(1));
        let start = Instant::now();
        keys.handle(KeyEventKind::Press, LogicalKey::Key0, start);
        keys.expire(start + Duration::from_secs(5));
        assert!(keys.sample_line(LogicalKey::Key0));
        keys.handle(KeyEventKind::Release, LogicalKey::Key0, start + Duration::from_secs(5));
        assert!(!keys.sample_line(LogicalKey::Key0));
    }

    #[test]
    fn half_blocks_pack_two_rows_per_cell() {
        let bitmap = Bitmap::from_rows(&["#.#", "..#", "#.."]);
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        HalfBlocks(&bitmap).render(area, &mut buf);
        let row0: String = (0..3).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        let row1: String = (0..3).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert_eq!(row0, "▀ █");
        assert_eq!(row1, "▀  ");
    }

    #[test]
    fn quit_signal_is_shared() {
        let signal = QuitSignal::default();
        let other = signal.clone();
        other.request();
        assert!(signal.is_requested());
    }
}
