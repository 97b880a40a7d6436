use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color as TermColor, Modifier, Style as TermStyle},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use site_composer_config::Config;
use site_composer_engine::{
    Color, Document, EditorEvent, EditorSession, ExportOptions, FileStorage, Outcome, Section,
    SectionId, SectionKind, StyleDelta, write_export,
};
use std::{
    env,
    fs::{self, File, OpenOptions},
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

const PALETTE: [&str; 6] = [
    "#000000", "#c0392b", "#2980b9", "#27ae60", "#8e44ad", "#d35400",
];

enum Mode {
    Normal,
    EditContent { id: SectionId, buffer: String },
    EditTitle { buffer: String },
    /// Typing a hex color for the selected text section
    EditColor { buffer: String },
    /// Saved content was found at start-up and the user has not answered yet
    ConfirmRestore(Document),
}

struct App {
    session: EditorSession<FileStorage>,
    export_path: PathBuf,
    list_state: ListState,
    mode: Mode,
    status: String,
}

impl App {
    fn new(config: Config) -> Self {
        let export_options = ExportOptions {
            lang: config.lang,
            ..ExportOptions::default()
        };
        let session = EditorSession::new(FileStorage::new(config.storage_path))
            .with_export_options(export_options);

        let mut app = Self {
            session,
            export_path: config.export_path,
            list_state: ListState::default(),
            mode: Mode::Normal,
            status: String::new(),
        };

        match app.session.stored_document() {
            Ok(Some(document)) => {
                app.mode = Mode::ConfirmRestore(document);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("Ignoring unreadable saved content: {e}");
                app.status = format!("Saved content could not be read, starting fresh: {e}");
            }
        }

        app.select_index(Some(0));
        app
    }

    fn document(&self) -> &Document {
        self.session.document()
    }

    fn selected_index(&self) -> Option<usize> {
        self.session
            .selected()
            .and_then(|id| self.document().position(id))
    }

    fn selected_section(&self) -> Option<&Section> {
        self.session
            .selected()
            .and_then(|id| self.document().section(id))
    }

    /// Send an event to the session, reporting failures in the status line
    fn dispatch(&mut self, event: EditorEvent) -> Option<Outcome> {
        match self.session.handle(event) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::warn!("Editor event failed: {e}");
                self.status = format!("Error: {e}");
                None
            }
        }
    }

    fn select_index(&mut self, index: Option<usize>) {
        let id = index
            .and_then(|i| self.document().sections.get(i))
            .map(|section| section.id.clone());
        self.dispatch(EditorEvent::Select(id));
    }

    fn next_section(&mut self) {
        let len = self.document().len();
        if len == 0 {
            return;
        }
        let i = match self.selected_index() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.select_index(Some(i));
    }

    fn previous_section(&mut self) {
        let len = self.document().len();
        if len == 0 {
            return;
        }
        let i = match self.selected_index() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.select_index(Some(i));
    }

    fn add_section(&mut self, kind: SectionKind) {
        if self.dispatch(EditorEvent::AddSection(kind)).is_some() {
            self.select_index(self.document().len().checked_sub(1));
            self.status = "Section added".to_string();
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.session.selected().cloned() else {
            self.status = "Select a section first".to_string();
            return;
        };
        if self.dispatch(EditorEvent::DeleteSection(id)).is_some() {
            self.status = "Section deleted".to_string();
        }
    }

    /// Move the selected section one place up or down
    fn move_selected(&mut self, down: bool) {
        let Some(source) = self.selected_index() else {
            return;
        };
        let destination = if down {
            source + 1
        } else {
            match source.checked_sub(1) {
                Some(i) => i,
                None => return,
            }
        };
        if destination >= self.document().len() {
            return;
        }
        self.dispatch(EditorEvent::ReorderSections {
            source,
            destination,
        });
    }

    /// Apply a style change built from the selected text section's current style
    fn restyle_selected(&mut self, build: impl FnOnce(&Section) -> StyleDelta) {
        let Some(section) = self.selected_section() else {
            self.status = "Select a section first".to_string();
            return;
        };
        if !section.is_text() {
            self.status = "Images have no text style".to_string();
            return;
        }
        let event = EditorEvent::UpdateSection {
            id: section.id.clone(),
            content: section.content.clone(),
            style: Some(build(section)),
        };
        self.dispatch(event);
    }

    fn start_editing_content(&mut self) {
        if let Some(section) = self.selected_section() {
            self.mode = Mode::EditContent {
                id: section.id.clone(),
                buffer: section.content.clone(),
            };
        }
    }

    fn save(&mut self) {
        if self.dispatch(EditorEvent::Save).is_some() {
            self.status = "Saved!".to_string();
        }
    }

    fn load(&mut self) {
        match self.dispatch(EditorEvent::Load) {
            Some(Outcome::Loaded) => {
                self.select_index(Some(0));
                self.status = "Loaded the last saved content".to_string();
            }
            Some(Outcome::NothingStored) => {
                self.status = "Nothing has been saved yet".to_string();
            }
            _ => {}
        }
    }

    fn export(&mut self) {
        let Some(Outcome::Exported(file)) = self.dispatch(EditorEvent::Export) else {
            return;
        };
        match write_export(&self.export_path, &file) {
            Ok(path) => {
                log::info!("Exported {} ({})", path.display(), file.mime_type);
                self.status = format!("Exported to {}", path.display());
            }
            Err(e) => {
                log::warn!("Export failed: {e}");
                self.status = format!("Export failed: {e}");
            }
        }
    }

    fn start_editing_color(&mut self) {
        match self.selected_section() {
            Some(section) if section.is_text() => {
                self.mode = Mode::EditColor {
                    buffer: section.style.color.to_string(),
                };
            }
            Some(_) => self.status = "Images have no text style".to_string(),
            None => self.status = "Select a section first".to_string(),
        }
    }

    fn apply_typed_color(&mut self, typed: &str) {
        match Color::parse(typed.trim()) {
            Ok(color) => self.restyle_selected(|_| StyleDelta::default().color(color)),
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    /// Handle a key press; returns false when the app should quit
    fn on_key(&mut self, key: KeyEvent) -> bool {
        let code = key.code;
        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => return self.on_normal_key(code),
            Mode::ConfirmRestore(document) => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.session.restore(document);
                    self.select_index(Some(0));
                    self.status = "Loaded the last saved content".to_string();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.status = "Starting with a new document".to_string();
                }
                _ => self.mode = Mode::ConfirmRestore(document),
            },
            Mode::EditContent { id, mut buffer } => match code {
                _ if is_newline_key(&key) => {
                    buffer.push('\n');
                    self.mode = Mode::EditContent { id, buffer };
                }
                KeyCode::Enter => {
                    self.dispatch(EditorEvent::UpdateSection {
                        id,
                        content: buffer,
                        style: None,
                    });
                }
                KeyCode::Esc => {}
                other => {
                    edit_buffer(&mut buffer, other);
                    self.mode = Mode::EditContent { id, buffer };
                }
            },
            Mode::EditTitle { mut buffer } => match code {
                KeyCode::Enter => {
                    self.dispatch(EditorEvent::SetTitle(buffer));
                }
                KeyCode::Esc => {}
                other => {
                    edit_buffer(&mut buffer, other);
                    self.mode = Mode::EditTitle { buffer };
                }
            },
            Mode::EditColor { mut buffer } => match code {
                KeyCode::Enter => self.apply_typed_color(&buffer),
                KeyCode::Esc => {}
                other => {
                    edit_buffer(&mut buffer, other);
                    self.mode = Mode::EditColor { buffer };
                }
            },
        }
        true
    }

    fn on_normal_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return false,
            KeyCode::Down | KeyCode::Char('j') => self.next_section(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_section(),
            KeyCode::Char('t') => self.add_section(SectionKind::Text),
            KeyCode::Char('p') => self.add_section(SectionKind::Image),
            KeyCode::Enter | KeyCode::Char('e') => self.start_editing_content(),
            KeyCode::Char('T') => {
                self.mode = Mode::EditTitle {
                    buffer: self.document().title.clone(),
                };
            }
            KeyCode::Char('b') => {
                self.restyle_selected(|s| StyleDelta::default().bold(!s.style.bold));
            }
            KeyCode::Char('i') => {
                self.restyle_selected(|s| StyleDelta::default().italic(!s.style.italic));
            }
            KeyCode::Char('f') => {
                self.restyle_selected(|s| {
                    StyleDelta::default().font_size(s.style.font_size.next())
                });
            }
            KeyCode::Char('c') => {
                self.restyle_selected(|s| StyleDelta {
                    color: next_palette_color(&s.style.color),
                    ..StyleDelta::default()
                });
            }
            KeyCode::Char('C') => self.start_editing_color(),
            KeyCode::Char('J') => self.move_selected(true),
            KeyCode::Char('K') => self.move_selected(false),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('w') => self.save(),
            KeyCode::Char('l') => self.load(),
            KeyCode::Char('x') => self.export(),
            _ => {}
        }
        true
    }
}

/// Alt+Enter or Ctrl+J breaks the line while editing content
fn is_newline_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => key.modifiers.contains(KeyModifiers::ALT),
        KeyCode::Char('j') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn edit_buffer(buffer: &mut String, code: KeyCode) {
    match code {
        KeyCode::Char(c) => buffer.push(c),
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }
}

fn next_palette_color(current: &Color) -> Option<Color> {
    let position = PALETTE
        .iter()
        .position(|hex| hex.eq_ignore_ascii_case(current.as_str()));
    let next = match position {
        Some(i) => PALETTE[(i + 1) % PALETTE.len()],
        None => PALETTE[0],
    };
    Color::parse(next).ok()
}

const LOG_FILE_NAME: &str = "site-composer.log";

fn open_log_file(dir: &Path) -> std::io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
}

/// Log to a file next to the saved document; stderr output would draw over the TUI
fn init_logging(dir: &Path) -> std::io::Result<()> {
    let file = open_log_file(dir)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    // Determine storage path from CLI args or config file
    let args: Vec<String> = env::args().collect();

    let mut config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} [storage-folder-path]", args[0]);
            process::exit(1);
        }
    };

    if args.len() == 2 {
        config.storage_path = PathBuf::from(&args[1]);
    } else if args.len() > 2 {
        eprintln!("Usage: {} [storage-folder-path]", args[0]);
        process::exit(1);
    }
    if let Err(e) = init_logging(&config.storage_path) {
        eprintln!("Warning: logging disabled, could not open log file: {e}");
    }
    log::info!("Using storage path {}", config.storage_path.display());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.on_key(key)
        {
            return Ok(());
        }
    }
}

fn section_summary(index: usize, section: &Section) -> String {
    let first_line = section.content.lines().next().unwrap_or("");
    match section.kind {
        SectionKind::Text => {
            let style = &section.style;
            let mut flags = vec![style.font_size.label().to_string()];
            if style.bold {
                flags.push("bold".to_string());
            }
            if style.italic {
                flags.push("italic".to_string());
            }
            flags.push(style.color.to_string());
            format!("{}. {} ({})", index + 1, first_line, flags.join(", "))
        }
        SectionKind::Image => format!("{}. [image] {}", index + 1, first_line),
    }
}

fn preview_lines(document: &Document) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(Span::styled(
            document.title.as_str(),
            TermStyle::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        Line::from(""),
    ];

    for section in &document.sections {
        match section.kind {
            SectionKind::Text => {
                let style = &section.style;
                let (r, g, b) = style.color.rgb();
                let mut term_style = TermStyle::default().fg(TermColor::Rgb(r, g, b));
                if style.bold {
                    term_style = term_style.add_modifier(Modifier::BOLD);
                }
                if style.italic {
                    term_style = term_style.add_modifier(Modifier::ITALIC);
                }
                lines.extend(
                    section
                        .content
                        .lines()
                        .map(|line| Line::from(Span::styled(line, term_style))),
                );
            }
            SectionKind::Image => {
                lines.push(Line::from(Span::styled(
                    format!("🖼  {}", section.content),
                    TermStyle::default().fg(TermColor::Cyan),
                )));
            }
        }
        lines.push(Line::from(""));
    }

    lines
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(rows[0]);

    // Section list panel
    let section_items: Vec<ListItem> = app
        .document()
        .sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            ListItem::new(vec![Line::from(vec![Span::raw(section_summary(
                index, section,
            ))])])
        })
        .collect();

    let sections_list = List::new(section_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Sections: {}", app.document().title)),
        )
        .highlight_style(TermStyle::default().bg(TermColor::Yellow).fg(TermColor::Black));

    app.list_state.select(app.selected_index());
    f.render_stateful_widget(sections_list, chunks[0], &mut app.list_state);

    // Preview panel
    let preview = Paragraph::new(preview_lines(app.session.document()))
        .block(Block::default().borders(Borders::ALL).title("Preview"))
        .wrap(Wrap { trim: false });

    f.render_widget(preview, chunks[1]);

    // Prompt, status and key help
    let prompt = match &app.mode {
        Mode::Normal => Line::from(app.status.as_str()),
        Mode::EditContent { buffer, .. } => Line::from(vec![
            Span::styled("Content: ", TermStyle::default().fg(TermColor::Yellow)),
            Span::raw(format!("{}_", buffer.replace('\n', "⏎"))),
        ]),
        Mode::EditTitle { buffer } => Line::from(vec![
            Span::styled("Title: ", TermStyle::default().fg(TermColor::Yellow)),
            Span::raw(format!("{buffer}_")),
        ]),
        Mode::EditColor { buffer } => Line::from(vec![
            Span::styled("Color (#rgb or #rrggbb): ", TermStyle::default().fg(TermColor::Yellow)),
            Span::raw(format!("{buffer}_")),
        ]),
        Mode::ConfirmRestore(_) => Line::from(Span::styled(
            "Found saved content. Load it? (y/n)",
            TermStyle::default().fg(TermColor::Yellow),
        )),
    };

    let help_text = match &app.mode {
        Mode::Normal => vec![
            Line::from(
                "q: Quit | ↑/k ↓/j: Select | t: Add text | p: Add image | Enter/e: Edit | T: Title",
            ),
            Line::from(
                "b: Bold | i: Italic | f: Size | c/C: Color | J/K: Move | d: Delete | w: Save | l: Load | x: Export",
            ),
        ],
        Mode::EditContent { .. } => vec![Line::from(
            "Enter: Apply | Alt+Enter/Ctrl+J: New line | Esc: Cancel | Backspace: Delete character",
        )],
        Mode::EditTitle { .. } | Mode::EditColor { .. } => {
            vec![Line::from("Enter: Apply | Esc: Cancel | Backspace: Delete character")]
        }
        Mode::ConfirmRestore(_) => vec![Line::from("y: Load saved content | n: Start fresh")],
    };

    let mut bottom = vec![prompt];
    bottom.extend(help_text);
    let help = Paragraph::new(bottom).block(Block::default());

    f.render_widget(help, rows[1]);
}
