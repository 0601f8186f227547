use std::io;
use std::mem;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::{debug, error, info};

use crate::catalog::{FetchEvent, Fetcher};
use crate::config::Config;
use crate::models::{CatalogPagination, Record, RecordBatch};
use crate::pager::PageController;

use super::columns::{headers, row_contents, CellContent, ColumnKind, COLUMNS};
use super::forms::JumpForm;
use super::grid::GridState;
use super::helpers::centered_rect;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const HEADER_HEIGHT: u16 = 3;

/// Callback used to hand a URL to the desktop browser.
pub type LinkOpener = Box<dyn FnMut(&str) -> io::Result<()>>;

/// Fine-grained input modes layered over the table.
enum Mode {
    Normal,
    Searching(SearchState),
    Jumping(JumpForm),
}

/// State for the title filter input.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// The artworks view: remote page counter, current batch, and the grid
/// state layered over it.
pub struct App {
    fetcher: Fetcher,
    pager: PageController,
    records: Vec<Record>,
    loaded_page: Option<u32>,
    pagination: Option<CatalogPagination>,
    grid: GridState,
    iiif_base_url: String,
    mode: Mode,
    status: Option<StatusMessage>,
    open_link: LinkOpener,
}

impl App {
    /// Mount the view on page 1 and dispatch its fetch.
    pub fn new(fetcher: Fetcher, config: &Config) -> Self {
        let mut app = Self {
            fetcher,
            pager: PageController::new(),
            records: Vec::new(),
            loaded_page: None,
            pagination: None,
            grid: GridState::new(config.rows_per_page),
            iiif_base_url: config.iiif_base_url.clone(),
            mode: Mode::Normal,
            status: None,
            open_link: Box::new(|url: &str| open::that(url)),
        };
        app.request_current_page();
        app
    }

    /// Replace the browser launcher, e.g. to record URLs instead of opening them.
    pub fn with_link_opener<F>(mut self, opener: F) -> Self
    where
        F: FnMut(&str) -> io::Result<()> + 'static,
    {
        self.open_link = Box::new(opener);
        self
    }

    pub fn page(&self) -> u32 {
        self.pager.current()
    }

    pub fn page_label(&self) -> String {
        format!("Page {}", self.pager.current())
    }

    /// Whether "Previous" is enabled.
    pub fn can_go_back(&self) -> bool {
        self.pager.can_retreat()
    }

    /// Page whose records are currently bound, if any load succeeded yet.
    pub fn loaded_page(&self) -> Option<u32> {
        self.loaded_page
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records on the current grid page after filtering.
    pub fn visible_records(&self) -> Vec<&Record> {
        self.grid
            .visible()
            .iter()
            .map(|&position| &self.records[position])
            .collect()
    }

    /// Checked records in batch order.
    pub fn selected_records(&self) -> Vec<&Record> {
        self.grid
            .selection()
            .filter_map(|position| self.records.get(position))
            .collect()
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Apply any fetch that finished since the last tick.
    pub fn on_tick(&mut self) {
        if let Some(event) = self.fetcher.poll() {
            self.apply_fetch(event);
        }
    }

    /// Block until the newest request lands or `timeout` passes. Returns
    /// whether an outcome was applied.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        match self.fetcher.wait(timeout) {
            Some(event) => {
                self.apply_fetch(event);
                true
            }
            None => false,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
            Mode::Jumping(form) => self.handle_jump(code, form)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                if self.grid.filter().is_some() {
                    self.grid.set_filter(None, &self.records);
                    self.set_status("Title filter cleared.", StatusKind::Info);
                } else {
                    *exit = true;
                }
            }
            KeyCode::Up => self.grid.move_cursor(-1),
            KeyCode::Down => self.grid.move_cursor(1),
            KeyCode::Home => self.grid.select_first(),
            KeyCode::End => self.grid.select_last(),
            KeyCode::Left | KeyCode::PageUp => {
                self.grid.prev_page();
            }
            KeyCode::Right | KeyCode::PageDown => {
                self.grid.next_page();
            }
            KeyCode::Char(' ') => {
                if let Some(checked) = self.grid.toggle_current() {
                    debug!(checked, selected = self.grid.selection_len(), "row selection toggled");
                }
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                let selected = self.grid.toggle_all();
                debug!(selected, "select-all toggled");
            }
            KeyCode::Char('n') | KeyCode::Char(']') => self.next_page(),
            KeyCode::Char('p') | KeyCode::Char('[') => self.previous_page(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.clear_status();
                self.request_current_page();
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                self.clear_status();
                return Ok(Mode::Jumping(JumpForm::default()));
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                let query = self.grid.filter().unwrap_or_default().to_string();
                return Ok(Mode::Searching(SearchState { query }));
            }
            KeyCode::Char('z') | KeyCode::Char('Z') => {
                let rows = self.grid.cycle_rows_per_page();
                self.set_status(format!("Showing {rows} rows per page."), StatusKind::Info);
            }
            KeyCode::Enter | KeyCode::Char('o') | KeyCode::Char('O') => self.open_title_link(),
            KeyCode::Char('i') | KeyCode::Char('I') => self.open_image(),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.grid.set_filter(None, &self.records);
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => return Ok(Mode::Normal),
            KeyCode::Up => {
                self.grid.move_cursor(-1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Down => {
                self.grid.move_cursor(1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => return Ok(Mode::Searching(state)),
        }

        if state.query.trim().is_empty() {
            self.grid.set_filter(None, &self.records);
        } else {
            self.grid.set_filter(Some(state.query.clone()), &self.records);
        }

        Ok(Mode::Searching(state))
    }

    fn handle_jump(&mut self, code: KeyCode, mut form: JumpForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Jump cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Backspace => {
                form.backspace();
                form.error = None;
                Ok(Mode::Jumping(form))
            }
            KeyCode::Enter => match form.parse() {
                Ok(page) => {
                    self.jump_to(page);
                    Ok(Mode::Normal)
                }
                Err(err) => {
                    form.error = Some(err.to_string());
                    Ok(Mode::Jumping(form))
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Ok(Mode::Jumping(form))
            }
            _ => Ok(Mode::Jumping(form)),
        }
    }

    pub fn next_page(&mut self) {
        self.pager.advance();
        self.clear_status();
        self.request_current_page();
    }

    /// No-op on page 1: the button is disabled there, so nothing is fetched.
    pub fn previous_page(&mut self) {
        if self.pager.retreat() {
            self.clear_status();
            self.request_current_page();
        } else {
            debug!("previous ignored on first page");
        }
    }

    pub fn jump_to(&mut self, page: u32) {
        if self.pager.jump(page) {
            self.clear_status();
            self.request_current_page();
        } else if page == self.pager.current() {
            self.set_status(format!("Already on page {page}."), StatusKind::Info);
        }
    }

    fn request_current_page(&mut self) {
        self.fetcher.request(self.pager.current());
    }

    fn apply_fetch(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Loaded(batch) => self.bind_batch(batch),
            FetchEvent::Failed(err) => {
                error!(page = err.page(), error = %err, "keeping previous batch after failed fetch");
                let shown = match self.loaded_page {
                    Some(page) => format!("Still showing page {page}."),
                    None => "Press r to retry.".to_string(),
                };
                self.set_status(format!("{err}. {shown}"), StatusKind::Error);
            }
        }
    }

    fn bind_batch(&mut self, batch: RecordBatch) {
        let RecordBatch {
            page,
            records,
            pagination,
        } = batch;
        self.records = records;
        self.loaded_page = Some(page);
        if pagination.is_some() {
            self.pagination = pagination;
        }
        self.grid.rebind(&self.records);

        if self.records.is_empty() {
            self.set_status(format!("Page {page} has no artworks."), StatusKind::Info);
        }
    }

    fn current_record(&self) -> Option<&Record> {
        self.grid
            .current()
            .and_then(|position| self.records.get(position))
    }

    fn open_title_link(&mut self) {
        let Some(record) = self.current_record() else {
            self.set_status("No artwork selected.", StatusKind::Error);
            return;
        };
        let label = record.to_string();
        match record.api_link() {
            Some(link) => self.open_url(&link, &label),
            None => self.set_status("This artwork does not have a link.", StatusKind::Error),
        }
    }

    fn open_image(&mut self) {
        let Some(record) = self.current_record() else {
            self.set_status("No artwork selected.", StatusKind::Error);
            return;
        };
        let CellContent::Image { url, alt } =
            CellContent::build(ColumnKind::Image, record, false, &self.iiif_base_url)
        else {
            return;
        };
        let label = if alt.is_empty() {
            format!("image of {record}")
        } else {
            format!("image \"{alt}\"")
        };
        self.open_url(&url, &label);
    }

    fn open_url(&mut self, url: &str, label: &str) {
        match (self.open_link)(url) {
            Ok(()) => {
                info!(%url, "opened link in browser");
                self.set_status(format!("Opened {label}."), StatusKind::Info);
            }
            Err(err) => {
                error!(%url, error = %err, "failed to open link");
                self.set_status(format!("Failed to open link: {err}"), StatusKind::Error);
            }
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_grid_paginator(frame, chunks[2]);
        self.draw_page_controls(frame, chunks[3]);
        self.draw_footer(frame, chunks[4]);

        match &self.mode {
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Jumping(form) => self.draw_jump_form(frame, area, form),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if let Some(page) = self.fetcher.pending_page() {
            spans.push(Span::styled(
                format!("Loading page {page}..."),
                Style::default().fg(Color::Yellow),
            ));
        } else if let Some(page) = self.loaded_page {
            spans.push(Span::raw(format!(
                "{} artworks on page {page}",
                self.records.len()
            )));
        }
        if let Some(total) = self.pagination.as_ref().and_then(|p| p.total) {
            if !spans.is_empty() {
                spans.push(Span::raw("  |  "));
            }
            spans.push(Span::styled(
                format!("{total} in catalog"),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default().borders(Borders::ALL).title(Span::styled(
                "Artworks Table",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        );
        frame.render_widget(header, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);

        let empty_message = if self.records.is_empty() {
            Some(match self.loaded_page {
                None if self.is_loading() => format!("Loading page {}...", self.pager.current()),
                None => "Nothing loaded yet. Press r to retry.".to_string(),
                Some(page) => format!("No artworks on page {page}."),
            })
        } else if self.grid.filtered_len() == 0 {
            Some(format!(
                "No artworks match \"{}\".",
                self.grid.filter().unwrap_or_default()
            ))
        } else {
            None
        };

        if let Some(message) = empty_message {
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let widths: Vec<Constraint> = COLUMNS.iter().map(|column| column.width).collect();
        let column_areas = Layout::horizontal(widths.clone())
            .spacing(1)
            .split(block.inner(area));

        let header_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let header_cells = headers().enumerate().map(|(index, title)| {
            if index == 0 {
                Cell::from(self.select_all_marker())
            } else {
                Cell::from(title)
            }
        });
        let header = Row::new(header_cells).style(header_style);

        let rows = self.grid.visible().iter().map(|&position| {
            let contents = row_contents(
                &self.records[position],
                self.grid.is_selected(position),
                &self.iiif_base_url,
            );
            let mut height = 1usize;
            let cells: Vec<Cell<'static>> = contents
                .iter()
                .zip(column_areas.iter())
                .map(|(content, column)| {
                    height = height.max(content.lines(column.width).len());
                    content.to_cell(column.width)
                })
                .collect();
            Row::new(cells).height(height as u16)
        });

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(Style::default().bg(Color::DarkGray));
        let mut state = TableState::default().with_selected(Some(self.grid.cursor()));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn select_all_marker(&self) -> &'static str {
        let filtered = self.grid.filtered_len();
        let selected = self.grid.selection_len();
        if selected == 0 {
            "[ ]"
        } else if selected >= filtered && filtered > 0 {
            "[x]"
        } else {
            "[-]"
        }
    }

    fn draw_grid_paginator(&self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let range = match self.grid.visible_range() {
            Some((first, last)) => format!("Rows {first}-{last} of {}", self.grid.filtered_len()),
            None => "Rows 0 of 0".to_string(),
        };
        let mut spans = vec![
            Span::raw(range),
            Span::raw(format!(
                "   Grid page {}/{}   Rows per page:",
                self.grid.page() + 1,
                self.grid.page_count()
            )),
        ];
        for size in crate::config::ROWS_PER_PAGE_OPTIONS {
            if size == self.grid.rows_per_page() {
                spans.push(Span::styled(format!(" [{size}]"), key_style));
            } else {
                spans.push(Span::raw(format!(" {size}")));
            }
        }
        let selected = self.grid.selection_len();
        if selected > 0 {
            spans.push(Span::styled(
                format!("   {selected} selected"),
                Style::default().fg(Color::Yellow),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            area,
        );
    }

    fn draw_page_controls(&self, frame: &mut Frame, area: Rect) {
        let button = Style::default().fg(Color::White).bg(Color::Blue);
        let previous_style = if self.can_go_back() {
            button
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM)
        };
        let line = Line::from(vec![
            Span::styled(" Previous ", previous_style),
            Span::raw("   "),
            Span::raw(self.page_label()),
            Span::raw("   "),
            Span::styled(" Next ", button),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Searching(_) => Line::from(vec![
                Span::styled("[type]", key_style),
                Span::raw(" Filter titles   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Move   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Keep   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Clear"),
            ]),
            Mode::Jumping(_) => Line::from(vec![
                Span::styled("[0-9]", key_style),
                Span::raw(" Page   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Go   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[p/n]", key_style),
                Span::raw(" Prev/Next   "),
                Span::styled("[g]", key_style),
                Span::raw(" Go to   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Move   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Rows   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Select   "),
                Span::styled("[a]", key_style),
                Span::raw(" All   "),
                Span::styled("[f]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Open   "),
                Span::styled("[i]", key_style),
                Span::raw(" Image   "),
                Span::styled("[z]", key_style),
                Span::raw(" Size   "),
                Span::styled("[r]", key_style),
                Span::raw(" Reload   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Title filter");
        let content = if state.query.is_empty() {
            Span::styled("Search", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(state.query.clone())
        };
        let paragraph = Paragraph::new(Line::from(content))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_jump_form(&self, frame: &mut Frame, area: Rect, form: &JumpForm) {
        let popup_area = centered_rect(40, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Go to Page").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.build_line("Page"), Line::from("")];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to go, Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        let prefix = "Page: ".len() as u16;
        frame.set_cursor_position((inner.x + prefix + form.value_len() as u16, inner.y));
    }
}
