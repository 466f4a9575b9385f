//! Interactive TUI wizard for configuring a conversion
//!
//! The wizard walks through a fixed, linear sequence of steps. Each step
//! records one value into `Flags`; the final `Confirm` step shows a summary
//! and hands the collected input path and flags back to the caller.
//!
//! # Architecture
//!
//! - `Step`: the ordered step enumeration. `Step::ALL` drives both navigation
//!   and the progress display.
//! - `WizardState`: the state machine. `apply` is the only way to change the
//!   current step; key handling translates input into `WizardAction`s.
//! - `WizardResult`: what the caller gets back (run or quit).
//! - `FileBrowser`: opened on `Welcome` to pick the input; it lives inside
//!   the state and draws in the same step box.
//!
//! # Navigation
//!
//! - Select: records the value and moves to the next step
//! - Back: previous step, stays on `Welcome` at the start
//! - Cancel: returns to `Welcome` and keeps everything entered so far
//! - Run: only accepted on `Confirm`

use std::io::{stdout, Stdout};
use std::path::PathBuf;

use anyhow::{bail, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Terminal,
};

use super::args::Cli;
use super::browser::{FileBrowser, PAGE};
use crate::pipeline::{Alignment as TextAlignment, DocumentType, Flags};

// ============================================================================
// Core Result Types
// ============================================================================

/// Result of running the wizard
#[derive(Debug, Clone, PartialEq)]
pub enum WizardResult {
    /// User confirmed; convert `input` with `flags`
    Run { input: PathBuf, flags: Flags },
    /// User quit without converting
    Quit,
}

// ============================================================================
// Step Definitions
// ============================================================================

/// One screen of the wizard. Declaration order is the navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Welcome,
    PickType,
    Toc,
    Rtl,
    Align,
    Style,
    Output,
    Watch,
    Verbose,
    Open,
    Confirm,
    Run,
}

/// How a step collects its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Pick a markdown file
    FilePick,
    /// Pick one entry from a fixed list
    Choice,
    /// Free text; empty clears the value
    FreeText,
    /// Review screen
    Summary,
    /// Terminal state, accepts nothing
    Done,
}

impl Step {
    pub const ALL: [Step; 12] = [
        Step::Welcome,
        Step::PickType,
        Step::Toc,
        Step::Rtl,
        Step::Align,
        Step::Style,
        Step::Output,
        Step::Watch,
        Step::Verbose,
        Step::Open,
        Step::Confirm,
        Step::Run,
    ];

    /// Position in `Step::ALL`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Following step; `Run` is its own successor
    pub fn next(self) -> Step {
        Step::ALL[(self.index() + 1).min(Step::ALL.len() - 1)]
    }

    /// Preceding step; `Welcome` is its own predecessor
    pub fn prev(self) -> Step {
        Step::ALL[self.index().saturating_sub(1)]
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Welcome => "Welcome",
            Step::PickType => "Document Type",
            Step::Toc => "Table of Contents",
            Step::Rtl => "Text Direction",
            Step::Align => "Alignment",
            Step::Style => "Style File",
            Step::Output => "Output",
            Step::Watch => "Watch Mode",
            Step::Verbose => "Verbose Output",
            Step::Open => "Open When Done",
            Step::Confirm => "Confirm",
            Step::Run => "Run",
        }
    }

    pub fn kind(self) -> StepKind {
        match self {
            Step::Welcome => StepKind::FilePick,
            Step::PickType
            | Step::Toc
            | Step::Rtl
            | Step::Align
            | Step::Watch
            | Step::Verbose
            | Step::Open => StepKind::Choice,
            Step::Style | Step::Output => StepKind::FreeText,
            Step::Confirm => StepKind::Summary,
            Step::Run => StepKind::Done,
        }
    }

    /// Labels offered by a `Choice` step, in cursor order
    pub fn choices(self) -> &'static [&'static str] {
        match self {
            Step::PickType => &["Document", "Report"],
            Step::Toc | Step::Rtl | Step::Watch | Step::Verbose | Step::Open => &["Yes", "No"],
            Step::Align => &["Default", "Left", "Right", "Center", "Justified"],
            _ => &[],
        }
    }

    /// Value behind the choice at `cursor`
    pub fn choice_value(self, cursor: usize) -> Option<StepValue> {
        match self {
            Step::PickType => DocumentType::ALL
                .get(cursor)
                .map(|t| StepValue::DocumentType(*t)),
            Step::Toc | Step::Rtl | Step::Watch | Step::Verbose | Step::Open => match cursor {
                0 => Some(StepValue::Toggle(true)),
                1 => Some(StepValue::Toggle(false)),
                _ => None,
            },
            Step::Align => match cursor {
                0 => Some(StepValue::Align(None)),
                n => TextAlignment::ALL
                    .get(n - 1)
                    .map(|a| StepValue::Align(Some(*a))),
            },
            _ => None,
        }
    }

    /// Question shown above the step's input
    fn prompt(self) -> &'static str {
        match self {
            Step::Welcome => "Choose the markdown file to convert",
            Step::PickType => "What kind of document should be produced?",
            Step::Toc => "Insert a table of contents at the top?",
            Step::Rtl => "Use right-to-left text direction?",
            Step::Align => "How should paragraphs be aligned?",
            Step::Style => "Path to a JSON style file (leave empty for none)",
            Step::Output => "Output file or directory (leave empty for default)",
            Step::Watch => "Reconvert whenever the input changes?",
            Step::Verbose => "Print diagnostics while converting?",
            Step::Open => "Open the document when finished?",
            Step::Confirm => "Review your choices",
            Step::Run => "",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

// ============================================================================
// Action Types
// ============================================================================

/// A value submitted on a step
#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    Input(PathBuf),
    DocumentType(DocumentType),
    Toggle(bool),
    Align(Option<TextAlignment>),
    Text(String),
}

/// User intent, independent of how it was entered
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    Select(StepValue),
    Back,
    Cancel,
    Run,
}

/// Outcome of applying an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: Step, to: Step },
    Stayed,
    Finished,
}

// ============================================================================
// Wizard State Machine
// ============================================================================

/// Wizard position and everything collected so far
#[derive(Debug, Clone)]
pub struct WizardState {
    pub step: Step,
    pub input_path: Option<PathBuf>,
    pub flags: Flags,
    /// Highlighted entry on choice steps
    pub cursor: usize,
    /// Edit buffer on free-text steps
    pub text: String,
    pub show_quit_confirm: bool,
    /// Open while picking the input on `Welcome`
    pub browser: Option<FileBrowser>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            step: Step::Welcome,
            input_path: None,
            flags: Flags::default(),
            cursor: 0,
            text: String::new(),
            show_quit_confirm: false,
            browser: None,
        }
    }

    /// Start on `Welcome` with whatever the command line already provided
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            input_path: cli.input.clone(),
            flags: cli.flags(),
            ..Self::new()
        }
    }

    /// Apply one action. This is the only place `step` changes.
    pub fn apply(&mut self, action: WizardAction) -> Transition {
        let from = self.step;
        if from == Step::Run {
            return Transition::Stayed;
        }

        let to = match action {
            WizardAction::Select(value) => {
                if !self.record(value) {
                    return Transition::Stayed;
                }
                from.next()
            }
            WizardAction::Back => from.prev(),
            WizardAction::Cancel => Step::Welcome,
            WizardAction::Run if from == Step::Confirm => Step::Run,
            WizardAction::Run => return Transition::Stayed,
        };

        self.step = to;
        self.sync_cursor();

        if to == Step::Run {
            Transition::Finished
        } else if to == from {
            Transition::Stayed
        } else {
            Transition::Moved { from, to }
        }
    }

    /// Store `value` for the current step. Returns false when the value does
    /// not belong to this step.
    fn record(&mut self, value: StepValue) -> bool {
        match (self.step, value) {
            (Step::Welcome, StepValue::Input(path)) => {
                self.input_path = Some(path);
                self.browser = None;
            }
            (Step::PickType, StepValue::DocumentType(t)) => self.flags.document_type = Some(t),
            (Step::Toc, StepValue::Toggle(b)) => self.flags.toc = Some(b),
            (Step::Rtl, StepValue::Toggle(b)) => self.flags.rtl = Some(b),
            (Step::Align, StepValue::Align(a)) => self.flags.align = a,
            (Step::Style, StepValue::Text(s)) => self.flags.style = non_empty_path(&s),
            (Step::Output, StepValue::Text(s)) => self.flags.output = non_empty_path(&s),
            (Step::Watch, StepValue::Toggle(b)) => self.flags.watch = Some(b),
            (Step::Verbose, StepValue::Toggle(b)) => self.flags.verbose = Some(b),
            (Step::Open, StepValue::Toggle(b)) => self.flags.open = Some(b),
            _ => return false,
        }
        true
    }

    /// Point the cursor and edit buffer at the value already recorded for
    /// the current step
    fn sync_cursor(&mut self) {
        self.text.clear();
        self.cursor = match self.step {
            Step::PickType => {
                let current = self.flags.document_type.unwrap_or_default();
                DocumentType::ALL
                    .iter()
                    .position(|t| *t == current)
                    .unwrap_or(0)
            }
            Step::Toc => yes_no_cursor(self.flags.toc),
            Step::Rtl => yes_no_cursor(self.flags.rtl),
            Step::Watch => yes_no_cursor(self.flags.watch),
            Step::Verbose => yes_no_cursor(self.flags.verbose),
            Step::Open => yes_no_cursor(self.flags.open),
            Step::Align => self
                .flags
                .align
                .and_then(|a| TextAlignment::ALL.iter().position(|x| *x == a))
                .map(|i| i + 1)
                .unwrap_or(0),
            Step::Style => {
                self.text = path_text(self.flags.style.as_ref());
                0
            }
            Step::Output => {
                self.text = path_text(self.flags.output.as_ref());
                0
            }
            _ => 0,
        };
    }

    /// Start browsing next to the current input, else in the working
    /// directory
    pub fn open_browser(&mut self) {
        let start = self
            .input_path
            .as_ref()
            .and_then(|p| p.parent())
            .filter(|p| p.is_dir())
            .map(|p| p.to_path_buf())
            .or_else(|| std::env::current_dir().ok())
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        self.browser = Some(FileBrowser::open(start));
    }

    /// One-based position for the progress title; `Run` is not counted
    pub fn progress(&self) -> (usize, usize) {
        let total = Step::ALL.len() - 1;
        ((self.step.index() + 1).min(total), total)
    }

    /// Collected input and flags, once an input has been chosen
    pub fn result(&self) -> Option<WizardResult> {
        self.input_path.as_ref().map(|input| WizardResult::Run {
            input: input.clone(),
            flags: self.flags.clone(),
        })
    }
}

fn yes_no_cursor(value: Option<bool>) -> usize {
    if value.unwrap_or(false) {
        0
    } else {
        1
    }
}

fn non_empty_path(text: &str) -> Option<PathBuf> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

fn path_text(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

// ============================================================================
// Key Handling
// ============================================================================

/// What a key press asks the event loop to do
#[derive(Debug, Clone, PartialEq)]
pub enum KeyResponse {
    Action(WizardAction),
    Stay,
}

/// Translate a key into a wizard action. Cursor and text edits are applied
/// directly; anything that changes the step comes back as an action.
pub fn handle_key(wizard: &mut WizardState, key: KeyEvent) -> KeyResponse {
    if let Some(browser) = wizard.browser.as_mut() {
        return match browse_key(browser, key) {
            Browse::Picked(path) => {
                KeyResponse::Action(WizardAction::Select(StepValue::Input(path)))
            }
            Browse::Close => {
                wizard.browser = None;
                KeyResponse::Stay
            }
            Browse::Continue => KeyResponse::Stay,
        };
    }

    if key.code == KeyCode::Home {
        return KeyResponse::Action(WizardAction::Cancel);
    }

    match wizard.step.kind() {
        StepKind::FilePick => match key.code {
            KeyCode::Enter => match &wizard.input_path {
                Some(path) => KeyResponse::Action(WizardAction::Select(StepValue::Input(
                    path.clone(),
                ))),
                None => {
                    wizard.open_browser();
                    KeyResponse::Stay
                }
            },
            KeyCode::Char('b') | KeyCode::Char('B') => {
                wizard.open_browser();
                KeyResponse::Stay
            }
            _ => KeyResponse::Stay,
        },
        StepKind::Choice => {
            let count = wizard.step.choices().len();
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    wizard.cursor = wizard.cursor.saturating_sub(1);
                    KeyResponse::Stay
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if wizard.cursor + 1 < count {
                        wizard.cursor += 1;
                    }
                    KeyResponse::Stay
                }
                KeyCode::Char('y') | KeyCode::Char('Y') if is_yes_no(wizard.step) => {
                    KeyResponse::Action(WizardAction::Select(StepValue::Toggle(true)))
                }
                KeyCode::Char('n') | KeyCode::Char('N') if is_yes_no(wizard.step) => {
                    KeyResponse::Action(WizardAction::Select(StepValue::Toggle(false)))
                }
                KeyCode::Enter => match wizard.step.choice_value(wizard.cursor) {
                    Some(value) => KeyResponse::Action(WizardAction::Select(value)),
                    None => KeyResponse::Stay,
                },
                KeyCode::Backspace | KeyCode::Left => KeyResponse::Action(WizardAction::Back),
                _ => KeyResponse::Stay,
            }
        }
        StepKind::FreeText => match key.code {
            KeyCode::Enter => {
                KeyResponse::Action(WizardAction::Select(StepValue::Text(wizard.text.clone())))
            }
            KeyCode::Backspace => {
                if wizard.text.pop().is_none() {
                    KeyResponse::Action(WizardAction::Back)
                } else {
                    KeyResponse::Stay
                }
            }
            KeyCode::Char(c) if !is_ctrl(&key) => {
                wizard.text.push(c);
                KeyResponse::Stay
            }
            _ => KeyResponse::Stay,
        },
        StepKind::Summary => match key.code {
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => {
                KeyResponse::Action(WizardAction::Run)
            }
            KeyCode::Backspace | KeyCode::Left => KeyResponse::Action(WizardAction::Back),
            _ => KeyResponse::Stay,
        },
        StepKind::Done => KeyResponse::Stay,
    }
}

enum Browse {
    Picked(PathBuf),
    Close,
    Continue,
}

/// Keys while the file browser is open. Esc clears the filter first and
/// closes the browser once the filter is empty.
fn browse_key(browser: &mut FileBrowser, key: KeyEvent) -> Browse {
    match key.code {
        KeyCode::Enter => {
            if let Some(path) = browser.activate() {
                return Browse::Picked(path);
            }
        }
        KeyCode::Esc => {
            if !browser.clear_query() {
                return Browse::Close;
            }
        }
        KeyCode::Up => browser.move_cursor(-1),
        KeyCode::Down => browser.move_cursor(1),
        KeyCode::PageUp => browser.move_cursor(-(PAGE as isize)),
        KeyCode::PageDown => browser.move_cursor(PAGE as isize),
        KeyCode::Home => browser.move_cursor(isize::MIN),
        KeyCode::End => browser.jump_to_end(),
        KeyCode::Backspace => browser.backspace(),
        KeyCode::Char(c) if !is_ctrl(&key) => browser.push_query(c),
        _ => {}
    }
    Browse::Continue
}

fn is_ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

fn is_yes_no(step: Step) -> bool {
    matches!(
        step,
        Step::Toc | Step::Rtl | Step::Watch | Step::Verbose | Step::Open
    )
}

/// Whether a key opens the quit dialog rather than reaching the step.
/// Ctrl+C always does; `q` is typed wherever text is being entered and Esc
/// belongs to the browser while it is open.
fn is_quit_key(wizard: &WizardState, key: &KeyEvent) -> bool {
    let typing = wizard.step.kind() == StepKind::FreeText || wizard.browser.is_some();
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') if is_ctrl(key) => true,
        KeyCode::Esc => wizard.browser.is_none(),
        KeyCode::Char('q') | KeyCode::Char('Q') => !typing,
        _ => false,
    }
}

// ============================================================================
// Terminal Setup/Teardown
// ============================================================================

/// Setup terminal for TUI rendering with panic-safe cleanup
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        teardown_terminal();
        original_hook(panic_info);
    }));

    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn teardown_terminal() {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
}

// ============================================================================
// Entry Point
// ============================================================================

/// Run the wizard, pre-filled from the command line
pub fn run_wizard(cli: &Cli) -> Result<WizardResult> {
    let mut wizard = WizardState::from_cli(cli);

    let mut terminal = setup_terminal()?;
    let result = run_wizard_loop(&mut terminal, &mut wizard);
    teardown_terminal();

    result
}

// ============================================================================
// Event Loop
// ============================================================================

fn run_wizard_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    wizard: &mut WizardState,
) -> Result<WizardResult> {
    loop {
        terminal.draw(|f| render_wizard(f, wizard))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if wizard.show_quit_confirm {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(WizardResult::Quit),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    wizard.show_quit_confirm = false;
                }
                _ => {}
            }
            continue;
        }

        if is_quit_key(wizard, &key) {
            wizard.show_quit_confirm = true;
            continue;
        }

        let KeyResponse::Action(action) = handle_key(wizard, key) else {
            continue;
        };

        if wizard.apply(action) == Transition::Finished {
            return match wizard.result() {
                Some(result) => Ok(result),
                None => bail!("no input file was selected"),
            };
        }
    }
}

// ============================================================================
// Rendering Helpers
// ============================================================================

fn centered_fixed_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn step_color(step: Step) -> Color {
    match step {
        Step::Welcome | Step::PickType => Color::Cyan,
        Step::Toc | Step::Rtl | Step::Align | Step::Style => Color::Magenta,
        Step::Output | Step::Watch | Step::Verbose | Step::Open => Color::Yellow,
        Step::Confirm | Step::Run => Color::Green,
    }
}

/// Wizard header art
fn logo_lines() -> Vec<Line<'static>> {
    let art = [
        "███╗   ███╗██████╗  ██████╗  ██████╗██╗  ██╗",
        "████╗ ████║██╔══██╗██╔═══██╗██╔════╝╚██╗██╔╝",
        "██╔████╔██║██║  ██║██║   ██║██║      ╚███╔╝ ",
        "██║╚██╔╝██║██║  ██║██║   ██║██║      ██╔██╗ ",
        "██║ ╚═╝ ██║██████╔╝╚██████╔╝╚██████╗██╔╝ ██╗",
        "╚═╝     ╚═╝╚═════╝  ╚═════╝  ╚═════╝╚═╝  ╚═╝",
    ];

    let mut lines: Vec<Line<'static>> = art
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(Color::Cyan).bold())))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("¶ ", Style::default().fg(Color::Magenta).bold()),
        Span::styled(
            "Markdown to Word, one step at a time",
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines
}

// ============================================================================
// Main Rendering Functions
// ============================================================================

/// Render the complete wizard UI with persistent shell layout
fn render_wizard(f: &mut Frame, wizard: &WizardState) {
    let area = f.area();

    let logo_height = 9u16;
    let hint_height = 1u16;
    let box_width = 66u16;
    let ideal_box_height = 18u16;
    let box_height =
        ideal_box_height.min(area.height.saturating_sub(logo_height + hint_height + 2));

    let total_height = logo_height + box_height + hint_height;
    let x = area.width.saturating_sub(box_width) / 2;
    let y = area.height.saturating_sub(total_height) / 2;

    let logo_area = Rect::new(x, y, box_width.min(area.width), logo_height);
    f.render_widget(
        Paragraph::new(logo_lines()).alignment(Alignment::Center),
        logo_area,
    );

    let box_y = y + logo_height;
    let box_area = Rect::new(x, box_y, box_width.min(area.width), box_height.max(10));
    f.render_widget(Clear, box_area);

    let color = step_color(wizard.step);
    let (current, total) = wizard.progress();
    let title_text = format!(
        " Step {}/{} \u{00b7} {} ",
        current,
        total,
        wizard.step.title()
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title_text)
        .title_style(Style::default().fg(color).bold())
        .title_alignment(Alignment::Center);

    let inner = block.inner(box_area);
    f.render_widget(block, box_area);

    match wizard.step.kind() {
        StepKind::FilePick => render_welcome(f, inner, wizard),
        StepKind::Choice => render_choice(f, inner, wizard, color),
        StepKind::FreeText => render_text_input(f, inner, wizard, color),
        StepKind::Summary | StepKind::Done => render_summary(f, inner, wizard),
    }

    let hint_y = box_area.y + box_area.height;
    let hint_area = Rect::new(x, hint_y, box_width.min(area.width), 1);
    render_help_bar(f, hint_area, wizard);

    if wizard.show_quit_confirm {
        render_quit_confirm_overlay(f);
    }
}

fn render_help_bar(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
    let hint = |h: &'static str| Span::styled(h, Style::default().fg(Color::DarkGray));

    let mut spans = vec![];

    match wizard.step.kind() {
        StepKind::FilePick if wizard.browser.is_some() => {
            spans.push(key("  ↑↓"));
            spans.push(hint(" move  "));
            spans.push(key("Enter"));
            spans.push(hint(" open  "));
            spans.push(key("Bksp"));
            spans.push(hint(" up  "));
            spans.push(key("Esc"));
            spans.push(hint(" close  "));
        }
        StepKind::FilePick => {
            spans.push(key("  Enter"));
            if wizard.input_path.is_some() {
                spans.push(hint(" continue  "));
                spans.push(key("B"));
                spans.push(hint(" browse  "));
            } else {
                spans.push(hint(" browse  "));
            }
        }
        StepKind::Choice => {
            spans.push(key("  ↑↓"));
            spans.push(hint(" move  "));
            spans.push(key("Enter"));
            spans.push(hint(" select  "));
            spans.push(key("Bksp"));
            spans.push(hint(" back  "));
        }
        StepKind::FreeText => {
            spans.push(key("  Enter"));
            spans.push(hint(" next  "));
            spans.push(key("Bksp"));
            spans.push(hint(" delete/back  "));
        }
        StepKind::Summary | StepKind::Done => {
            spans.push(key("  Enter"));
            spans.push(hint(" convert  "));
            spans.push(key("Bksp"));
            spans.push(hint(" back  "));
        }
    }

    if wizard.step != Step::Welcome {
        spans.push(key("Home"));
        spans.push(hint(" restart  "));
    }

    spans.push(key(if wizard.browser.is_some() { "Ctrl+C" } else { "Esc" }));
    spans.push(hint(" quit"));

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_quit_confirm_overlay(f: &mut Frame) {
    let popup = centered_fixed_rect(40, 8, f.area());
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Quit Wizard? ")
        .title_style(Style::default().fg(Color::Red).bold())
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Quit without converting?",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("      ", Style::default()),
            Span::styled("Y", Style::default().fg(Color::Cyan)),
            Span::styled(" yes  ", Style::default().fg(Color::DarkGray)),
            Span::styled("N", Style::default().fg(Color::Cyan)),
            Span::styled(" no", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    f.render_widget(Paragraph::new(content), inner);
}

// ============================================================================
// Step Renderers
// ============================================================================

fn prompt_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area)
}

fn render_prompt(f: &mut Frame, area: Rect, step: Step) {
    let title = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", step.prompt()),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    f.render_widget(title, area);
}

fn render_welcome(f: &mut Frame, area: Rect, wizard: &WizardState) {
    if let Some(browser) = &wizard.browser {
        render_browser(f, area, browser);
        return;
    }

    let chunks = prompt_layout(area);
    render_prompt(f, chunks[0], wizard.step);

    let body = match &wizard.input_path {
        Some(path) => vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Input:  ", Style::default().fg(Color::DarkGray)),
                Span::styled(path.display().to_string(), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  Press Enter to keep this file or B to pick another.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Press Enter to browse for a .md file.",
                Style::default().fg(Color::White),
            )),
        ],
    };
    f.render_widget(Paragraph::new(body), chunks[1]);
}

fn render_browser(f: &mut Frame, area: Rect, browser: &FileBrowser) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    let visible = browser.visible();
    let dir_text = browser.dir().display().to_string();
    let width = (chunks[0].width as usize).saturating_sub(14);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("  In: ", Style::default().fg(Color::DarkGray)),
            Span::styled(tail_chars(&dir_text, width), Style::default().fg(Color::White)),
            Span::styled(
                format!("  {}", visible.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ])),
        chunks[0],
    );

    let query_line = if browser.query().is_empty() {
        Span::styled("type to filter", Style::default().fg(Color::DarkGray).italic())
    } else {
        Span::styled(browser.query().to_string(), Style::default().fg(Color::White))
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("  / ", Style::default().fg(Color::Cyan).bold()),
            query_line,
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ])),
        chunks[1],
    );

    if visible.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "  No markdown files here",
                Style::default().fg(Color::DarkGray).italic(),
            )),
            chunks[2],
        );
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|entry| {
            let style = if entry.is_dir() {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("  {}", entry.label())).style(style)
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold());
    let mut list_state = ListState::default();
    list_state.select(Some(browser.cursor()));
    f.render_stateful_widget(list, chunks[2], &mut list_state);
}

/// Keep the end of a long path, which names the directory
fn tail_chars(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max || max < 2 {
        return text.to_string();
    }
    let tail: String = text.chars().skip(count - (max - 1)).collect();
    format!("…{}", tail)
}

fn render_choice(f: &mut Frame, area: Rect, wizard: &WizardState, color: Color) {
    let chunks = prompt_layout(area);
    render_prompt(f, chunks[0], wizard.step);

    let items: Vec<ListItem> = wizard
        .step
        .choices()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let style = if i == wizard.cursor {
                Style::default().fg(Color::Black).bg(color).bold()
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("  {}", opt)).style(style)
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(wizard.cursor));
    f.render_stateful_widget(List::new(items), chunks[1], &mut list_state);
}

fn render_text_input(f: &mut Frame, area: Rect, wizard: &WizardState, color: Color) {
    let chunks = prompt_layout(area);
    render_prompt(f, chunks[0], wizard.step);

    let body = vec![
        Line::from(vec![
            Span::styled("  > ", Style::default().fg(color).bold()),
            Span::styled(wizard.text.clone(), Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(color)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Paths are relative to the current directory.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(body), chunks[1]);
}

fn render_summary(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let color = Color::Green;
    let flags = &wizard.flags;
    let yes_no = |b: bool| (if b { "Yes" } else { "No" }).to_string();
    let or_default = |p: &Option<PathBuf>, fallback: &str| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| fallback.to_string())
    };

    let rows = [
        ("Input:    ", or_default(&wizard.input_path, "None")),
        (
            "Type:     ",
            flags.document_type.unwrap_or_default().to_string(),
        ),
        ("TOC:      ", yes_no(flags.toc())),
        ("RTL:      ", yes_no(flags.rtl())),
        (
            "Align:    ",
            flags
                .align
                .map(|a| a.to_string())
                .unwrap_or_else(|| "Default".to_string()),
        ),
        ("Style:    ", or_default(&flags.style, "None")),
        ("Output:   ", or_default(&flags.output, "Next to input")),
        ("Watch:    ", yes_no(flags.watch())),
        ("Verbose:  ", yes_no(flags.verbose())),
        ("Open:     ", yes_no(flags.open())),
    ];

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Configuration Summary",
            Style::default().fg(Color::DarkGray).bold(),
        )),
        Line::from(""),
    ];
    content.extend(rows.into_iter().map(|(label, value)| {
        Line::from(vec![
            Span::styled(format!("  {}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(color)),
        ])
    }));

    f.render_widget(Paragraph::new(content), area);
}
