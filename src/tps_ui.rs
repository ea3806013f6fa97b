use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use log::{debug, info};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

use crate::tps_board::{BOARD_H, BOARD_W};
use crate::tps_color::{Support, Swatch, difficulty_swatch};
use crate::tps_config::{Config, save_config};
use crate::tps_game::{Difficulty, Game, Phase};
use crate::tps_lang::Lang;
use crate::tps_layout::{
    BOARD_EDGE, Hit, Point, TIMER_ORIGIN, VIEW_H, VIEW_W, difficulty_area, highlight_area, hit_test,
    new_game_area, tile_area,
};
use crate::tps_tile::{Pos, TileView};

// Each tile is drawn two cells wide: a spacer and the glyph
const TILE_COLS: u16 = 2;
const BOARD_BLOCK_W: u16 = BOARD_W as u16 * TILE_COLS + 3;
const BOARD_BLOCK_H: u16 = BOARD_H as u16 + 2;
const PANEL_W: u16 = 34;
const MIN_W: u16 = BOARD_BLOCK_W + PANEL_W;
const MIN_H: u16 = BOARD_BLOCK_H;

const FRAME_RATE: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Terminal rects of the last drawn frame, used to turn clicks into logical points
#[derive(Debug, Default)]
struct Viewport {
    board: Option<Rect>, // Inner board area, TILE_COLS cells per tile
    buttons: [Option<Rect>; 3],
    new_game: Option<Rect>,
}

impl Viewport {
    /// Map a terminal cell to the logical point of whatever is drawn there
    fn to_logical(&self, col: u16, row: u16) -> Option<Point> {
        if let Some(b) = self.board.filter(|r| contains(r, col, row)) {
            let x = ((col - b.x) / TILE_COLS) as usize;
            let y = (row - b.y) as usize;
            if x < BOARD_W && y < BOARD_H {
                return Some(tile_area((x, y)).center());
            }
        }
        for (d, rect) in Difficulty::ALL.into_iter().zip(self.buttons) {
            if rect.is_some_and(|r| contains(&r, col, row)) {
                return Some(difficulty_area(d).center());
            }
        }
        if self.new_game.is_some_and(|r| contains(&r, col, row)) {
            return Some(new_game_area().center());
        }
        None
    }
}

fn contains(r: &Rect, col: u16, row: u16) -> bool {
    col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}

/// Runtime UI variables that are not part of the game itself
struct UiState {
    cursor: Pos,
    show_cursor: bool, // Keyboard cursor is visible until the mouse is used
    viewport: Viewport,
    support: Support,
}

impl UiState {
    fn new() -> Self {
        UiState {
            cursor: (BOARD_W / 2, BOARD_H / 2),
            show_cursor: false,
            viewport: Viewport::default(),
            support: Support::detect(),
        }
    }

    fn step_cursor(&mut self, dx: isize, dy: isize) {
        let nx = (self.cursor.0 as isize + dx).clamp(0, BOARD_W as isize - 1) as usize;
        let ny = (self.cursor.1 as isize + dy).clamp(0, BOARD_H as isize - 1) as usize;
        self.cursor = (nx, ny);
        self.show_cursor = true;
    }

    fn color(&self, swatch: Swatch) -> Color {
        swatch.color(&self.support)
    }
}

struct Glyphs {
    unopened: &'static str,
    flag: &'static str,
    question: &'static str,
    mine: &'static str,
}

impl Glyphs {
    fn new(ascii: bool) -> Self {
        Glyphs {
            unopened: if ascii { "#" } else { "■" },
            flag: if ascii { "F" } else { "⚑" },
            question: "?",
            mine: if ascii { "*" } else { "☼" },
        }
    }
}

pub fn run(cfg: &mut Config, lang: &mut Lang) -> Result<(), Box<dyn Error>> {
    let mut game = Game::new(cfg.difficulty)?;
    info!("starting on {}", cfg.difficulty.name());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut game, cfg, lang);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Remember the selected difficulty for the next launch
    cfg.difficulty = game.difficulty();
    save_config(cfg);
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    game: &mut Game,
    cfg: &mut Config,
    lang: &mut Lang,
) -> Result<(), Box<dyn Error>> {
    let mut ui = UiState::new();
    let mut last_frame = Instant::now();

    loop {
        // one simulation step per frame, then at most one input event
        let now = Instant::now();
        game.simulate(now - last_frame);
        last_frame = now;

        let glyphs = Glyphs::new(cfg.ascii_icons);
        terminal.draw(|f| draw(f, &*game, &*lang, &glyphs, &mut ui))?;

        let timeout = FRAME_RATE
            .checked_sub(last_frame.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            let flow = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(key, game, cfg, lang, &mut ui)?
                }
                Event::Mouse(mouse) => handle_mouse(mouse, game, &mut ui)?,
                _ => Flow::Continue,
            };
            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }
}

fn handle_key(
    key: KeyEvent,
    game: &mut Game,
    cfg: &mut Config,
    lang: &mut Lang,
    ui: &mut UiState,
) -> Result<Flow, Box<dyn Error>> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Ok(Flow::Exit),
        KeyCode::Left => ui.step_cursor(-1, 0),
        KeyCode::Right => ui.step_cursor(1, 0),
        KeyCode::Up => ui.step_cursor(0, -1),
        KeyCode::Down => ui.step_cursor(0, 1),
        KeyCode::Char(' ') | KeyCode::Enter => {
            ui.show_cursor = true;
            game.pointer_up(Hit::Tile(ui.cursor))?;
        }
        KeyCode::Char(c @ '1'..='3') => {
            if let Some(d) = c.to_digit(10).and_then(|n| Difficulty::from_level(n as u8)) {
                game.pointer_up(Hit::Difficulty(d))?;
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::F(2) => {
            game.pointer_up(Hit::NewGame)?;
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            lang.toggle();
            cfg.language = lang.current_lang.clone();
        }
        _ => {}
    }
    Ok(Flow::Continue)
}

fn handle_mouse(mouse: MouseEvent, game: &mut Game, ui: &mut UiState) -> Result<Flow, Box<dyn Error>> {
    match mouse.kind {
        MouseEventKind::Up(MouseButton::Left) => {
            ui.show_cursor = false;
            let Some(point) = ui.viewport.to_logical(mouse.column, mouse.row) else {
                return Ok(Flow::Continue);
            };
            let hit = hit_test(point);
            debug!("pointer up at {:?} -> {:?}", point, hit);
            if let Hit::Tile(pos) = hit {
                ui.cursor = pos;
            }
            game.pointer_up(hit)?;
        }
        MouseEventKind::Moved => ui.show_cursor = false,
        _ => {}
    }
    Ok(Flow::Continue)
}

fn draw<B: Backend>(f: &mut Frame<B>, game: &Game, lang: &Lang, glyphs: &Glyphs, ui: &mut UiState) {
    let size = f.size();
    ui.viewport = Viewport::default();

    // If terminal too small, render a centered warning and skip normal UI
    if size.width < MIN_W || size.height < MIN_H {
        let warn_lines = vec![
            Spans::from(Span::raw(lang.assets.tsmsg_line1)),
            Spans::from(Span::raw(
                lang.assets
                    .tsmsg_line2
                    .replacen("{}", &MIN_W.to_string(), 1)
                    .replacen("{}", &MIN_H.to_string(), 1),
            )),
        ];
        let warn = Paragraph::new(Text::from(warn_lines))
            .block(Block::default().borders(Borders::ALL).title(lang.assets.tsmsg_title))
            .alignment(Alignment::Center);
        f.render_widget(Clear, size);
        let w = 40u16.min(size.width.saturating_sub(2));
        let h = 5u16.min(size.height.saturating_sub(2));
        f.render_widget(warn, center_rect(w, h, size));
        return;
    }

    let area = center_rect(MIN_W, MIN_H, size);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(BOARD_BLOCK_W), Constraint::Length(PANEL_W)].as_ref())
        .split(area);

    draw_board(f, chunks[0], game, lang, glyphs, ui);
    draw_panel(f, chunks[1], game, lang, ui);
}

fn tile_span(view: TileView, glyphs: &Glyphs, ui: &UiState) -> Span<'static> {
    let closed = Style::default().fg(ui.color(Swatch::Chrome)).bg(ui.color(Swatch::DarkGrey));
    let opened = Style::default().fg(ui.color(Swatch::Ink)).bg(ui.color(Swatch::Grey));
    let primed_bg = ui.color(Swatch::Primed);
    let (text, style) = match view {
        TileView::Unopened { primed } => (glyphs.unopened.to_string(), prime(closed, primed, primed_bg)),
        TileView::Flagged { primed } => (
            glyphs.flag.to_string(),
            prime(closed.fg(ui.color(Swatch::Red)), primed, primed_bg),
        ),
        TileView::Questioned { primed } => (
            glyphs.question.to_string(),
            prime(closed.fg(ui.color(Swatch::Yellow)), primed, primed_bg),
        ),
        TileView::Number(0) => (" ".to_string(), opened),
        TileView::Number(n) => (n.to_string(), opened.add_modifier(Modifier::BOLD)),
        TileView::Mine => (glyphs.mine.to_string(), opened.fg(ui.color(Swatch::Red))),
    };
    Span::styled(format!(" {}", text), style)
}

fn prime(style: Style, primed: bool, bg: Color) -> Style {
    if primed { style.bg(bg) } else { style }
}

fn draw_board<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    game: &Game,
    lang: &Lang,
    glyphs: &Glyphs,
    ui: &mut UiState,
) {
    let board = game.board();
    let pad = Style::default().bg(ui.color(Swatch::DarkGrey));
    let mut lines = Vec::with_capacity(board.height());
    let mut row: Vec<Span> = Vec::with_capacity(board.width() + 1);
    for tile in board.tiles() {
        let mut span = tile_span(tile.view(), glyphs, ui);
        if ui.show_cursor && tile.pos() == ui.cursor {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
        row.push(span);
        if tile.pos().0 + 1 == board.width() {
            // trailing padding column so the right edge keeps the board background
            row.push(Span::styled(" ", pad));
            lines.push(Spans::from(std::mem::take(&mut row)));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(lang.assets.title)
                .title_alignment(Alignment::Center),
        )
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);

    ui.viewport.board = Some(Rect::new(
        area.x + 1,
        area.y + 1,
        BOARD_W as u16 * TILE_COLS,
        BOARD_H as u16,
    ));
}

/// Project a logical point on the control side onto a cell of the panel
fn panel_cell(inner: Rect, p: Point) -> (u16, u16) {
    let span = VIEW_W - BOARD_EDGE;
    let x = (p.x - BOARD_EDGE).clamp(0, span - 1) * inner.width as i32 / span;
    let y = p.y.clamp(0, VIEW_H - 1) * inner.height as i32 / VIEW_H;
    (inner.x + x as u16, inner.y + y as u16)
}

/// Level button cells, three wide around the projected button centre
fn button_rect(inner: Rect, d: Difficulty) -> Rect {
    let (col, row) = panel_cell(inner, difficulty_area(d).center());
    Rect::new(col.saturating_sub(1).max(inner.x), row, 3, 1)
}

fn put_line<B: Backend>(f: &mut Frame<B>, inner: Rect, (col, row): (u16, u16), line: Spans) {
    if col >= inner.right() || row >= inner.bottom() {
        return;
    }
    f.render_widget(Paragraph::new(line), Rect::new(col, row, inner.right() - col, 1));
}

fn draw_panel<B: Backend>(f: &mut Frame<B>, area: Rect, game: &Game, lang: &Lang, ui: &mut UiState) {
    let a = &lang.assets;
    f.render_widget(Block::default().borders(Borders::ALL), area);
    let inner = Rect::new(area.x + 1, area.y + 1, area.width.saturating_sub(2), area.height.saturating_sub(2));
    let chrome = Style::default().fg(ui.color(Swatch::Chrome));
    let left = inner.x + 1;

    // level buttons, with the label above and the mine count below
    let highlight = highlight_area(game.difficulty());
    let button_row = button_rect(inner, Difficulty::Easy).y;
    put_line(f, inner, (left, button_row.saturating_sub(1)), Spans::from(Span::styled(a.difficulty_label, chrome)));
    for (i, d) in Difficulty::ALL.into_iter().enumerate() {
        let rect = button_rect(inner, d);
        let mut style = Style::default()
            .fg(ui.color(Swatch::Ink))
            .bg(ui.color(difficulty_swatch(d.level())));
        let label = if highlight.contains(difficulty_area(d).center()) {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            format!("[{}]", d.level())
        } else {
            format!(" {} ", d.level())
        };
        ui.viewport.buttons[i] = Some(rect);
        put_line(f, inner, (rect.x, rect.y), Spans::from(Span::styled(label, style)));
    }
    put_line(f, inner, (left, button_row + 1), Spans::from(Span::raw(lang.mines_text(game.difficulty()))));

    let origin = new_game_area();
    let (col, row) = panel_cell(inner, Point::new(origin.x, origin.y));
    let new_game = format!("[ {} ]", a.new_game);
    let width = (new_game.as_str().width() as u16).min(inner.right().saturating_sub(col));
    ui.viewport.new_game = Some(Rect::new(col, row, width, 1));
    put_line(f, inner, (col, row), Spans::from(Span::styled(new_game, chrome.add_modifier(Modifier::BOLD))));

    // elapsed time at its anchor, phase banner right below
    let (col, row) = panel_cell(inner, TIMER_ORIGIN);
    put_line(f, inner, (col, row), Spans::from(vec![
        Span::styled(format!("{}: ", a.time_label), chrome),
        Span::styled(game.timer().text(), chrome.add_modifier(Modifier::BOLD)),
    ]));
    let banner = match game.phase() {
        Phase::Won => chrome.fg(ui.color(Swatch::Green)).add_modifier(Modifier::BOLD),
        Phase::Lost => chrome.fg(ui.color(Swatch::Red)).add_modifier(Modifier::BOLD),
        _ => chrome,
    };
    put_line(f, inner, (col, row + 1), Spans::from(Span::styled(lang.phase_text(game.phase()), banner)));

    let hints = [a.hint_touch, a.hint_mark, a.hint_keys];
    let first = inner.bottom().saturating_sub(hints.len() as u16);
    for (i, hint) in hints.into_iter().enumerate() {
        let style = Style::default().fg(ui.color(Swatch::Grey));
        put_line(f, inner, (left, first + i as u16), Spans::from(Span::styled(hint, style)));
    }
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
