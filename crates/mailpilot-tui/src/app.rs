//! Screen engine for the review client.
//!
//! [`App`] owns the current [`Screen`] and the [`Session`]. Key, resize and
//! tick events go through [`App::update`]; gateway outcomes go through
//! [`App::handle_completion`]. Both return a [`Command`] for the runtime to
//! dispatch. Nothing in here blocks or performs I/O.

use chrono::Utc;
use mailpilot_core::samples::or_generated;
use mailpilot_core::{Action, Email, JsonObject, SubmissionResult};
use mailpilot_tui_adapter::input::{scroll_action, InputEvent, Key, KeyEvent};
use mailpilot_tui_adapter::render::{FrameSize, Rect, RenderFrame, TextRole};
use mailpilot_tui_adapter::style::{ThemeKind, ThemeSpec};
use mailpilot_tui_adapter::widgets::BorderStyle;

use crate::content;
use crate::editor::PayloadEditor;
use crate::spinner::Spinner;
use crate::viewport::Viewport;

pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_HEIGHT: usize = 24;
const MIN_VIEWPORT_HEIGHT: usize = 5;
/// Status row plus footer row.
const CHROME_ROWS: usize = 2;

pub const SUBMITTING_EMAIL: &str = "Submitting email to the agents...";
pub const NO_ACTIONS: &str = "No actions to review.";
pub const ACTION_UPDATED: &str = "Action updated successfully.";
pub const ALL_REVIEWED: &str = "All actions reviewed.";
pub const EDIT_CANCELLED: &str = "Modification cancelled.";
pub const PREFERENCE_QUESTION: &str = "Apply extracted preferences to general profile? (y/N)";
const EDITOR_HINT: &str = "Press Ctrl+S to submit changes, Esc to cancel.";

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// Mutually exclusive display modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Submit-email call in flight.
    Loading { message: String },
    PreviewEmail,
    Summary,
    Review,
    EditingPayload,
    PromptGeneral,
    /// Approve/reject/modify call in flight.
    SubmittingAction { message: String },
    Done,
    Error,
}

impl Screen {
    /// Screens whose content is shown through the scrollable viewport.
    #[must_use]
    pub fn uses_viewport(&self) -> bool {
        matches!(
            self,
            Self::PreviewEmail
                | Self::Summary
                | Self::Review
                | Self::PromptGeneral
                | Self::Done
                | Self::Error
        )
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Loading { .. } | Self::SubmittingAction { .. })
    }

    /// Content already shows the status text, so the status row stays empty.
    fn embeds_status(&self) -> bool {
        matches!(self, Self::PromptGeneral | Self::Done)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading { .. } => "loading",
            Self::PreviewEmail => "preview",
            Self::Summary => "summary",
            Self::Review => "review",
            Self::EditingPayload => "edit",
            Self::PromptGeneral => "preferences",
            Self::SubmittingAction { .. } => "submitting",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// Commands and completions
// ---------------------------------------------------------------------------

/// Side effect requested by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    None,
    Quit,
    SubmitEmail {
        email: Email,
    },
    ApproveAction {
        index: usize,
        action_id: String,
    },
    RejectAction {
        index: usize,
        action_id: String,
    },
    ModifyAction {
        index: usize,
        action_id: String,
        payload: JsonObject,
        apply_to_general: bool,
    },
}

impl Command {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Which action endpoint a completion answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCall {
    Approve,
    Reject,
    Modify,
}

impl ActionCall {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Modify => "modify",
        }
    }

    fn busy_message(self) -> &'static str {
        match self {
            Self::Approve => "Approving action...",
            Self::Reject => "Rejecting action...",
            Self::Modify => "Submitting modified action...",
        }
    }
}

/// Outcome of one dispatched gateway call plus its correlation key.
///
/// Errors are carried as the display text shown on the error screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    EmailSubmitted {
        mail_id: String,
        outcome: Result<SubmissionResult, String>,
    },
    ActionUpdated {
        call: ActionCall,
        index: usize,
        outcome: Result<Action, String>,
    },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Everything under review for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    emails: Vec<Email>,
    email_index: usize,
    email: Email,
    result: Option<SubmissionResult>,
    action_index: usize,
    pending_edit: Option<JsonObject>,
    last_error: Option<String>,
}

impl Session {
    /// Falls back to a generated email when `emails` is empty.
    #[must_use]
    pub fn new(emails: Vec<Email>) -> Self {
        let emails = or_generated(emails, Utc::now());
        let email = emails[0].clone();
        Self {
            emails,
            email_index: 0,
            email,
            result: None,
            action_index: 0,
            pending_edit: None,
            last_error: None,
        }
    }

    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub fn email_index(&self) -> usize {
        self.email_index
    }

    #[must_use]
    pub fn email_count(&self) -> usize {
        self.emails.len()
    }

    #[must_use]
    pub fn has_more_emails(&self) -> bool {
        self.email_index + 1 < self.emails.len()
    }

    #[must_use]
    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn action_index(&self) -> usize {
        self.action_index
    }

    #[must_use]
    pub fn current_action(&self) -> Option<&Action> {
        self.result.as_ref()?.action(self.action_index)
    }

    #[must_use]
    pub fn pending_edit(&self) -> Option<&JsonObject> {
        self.pending_edit.as_ref()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn actions(&self) -> &[Action] {
        self.result
            .as_ref()
            .map_or(&[], |result| result.proposed_actions.as_slice())
    }

    /// Make email `index` active and drop everything derived from the previous one.
    fn prepare_email(&mut self, index: usize) -> bool {
        let Some(email) = self.emails.get(index) else {
            return false;
        };
        self.email_index = index;
        self.email = email.clone();
        self.result = None;
        self.action_index = 0;
        self.pending_edit = None;
        self.last_error = None;
        true
    }

    fn install_result(&mut self, result: SubmissionResult) {
        self.result = Some(result);
        self.action_index = 0;
    }

    fn replace_action(&mut self, index: usize, action: Action) {
        if let Some(slot) = self.result.as_mut().and_then(|result| result.action_mut(index)) {
            *slot = action;
        }
    }

    fn has_action(&self, index: usize) -> bool {
        index < self.actions().len()
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    screen: Screen,
    session: Session,
    status: String,
    status_role: TextRole,
    viewport: Viewport,
    editor: PayloadEditor,
    spinner: Spinner,
    theme: ThemeSpec,
    width: usize,
    height: usize,
    quitting: bool,
}

impl App {
    #[must_use]
    pub fn new(emails: Vec<Email>, theme: ThemeSpec) -> Self {
        let viewport_height = viewport_height(DEFAULT_HEIGHT);
        let mut app = Self {
            screen: Screen::PreviewEmail,
            session: Session::new(emails),
            status: String::new(),
            status_role: TextRole::Muted,
            viewport: Viewport::new(DEFAULT_WIDTH, viewport_height),
            editor: PayloadEditor::new(
                DEFAULT_WIDTH.saturating_sub(4),
                viewport_height.saturating_sub(2),
            ),
            spinner: Spinner::default(),
            theme,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            quitting: false,
        };
        app.refresh_viewport();
        app
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn editor(&self) -> &PayloadEditor {
        &self.editor
    }

    #[must_use]
    pub fn quitting(&self) -> bool {
        self.quitting
    }

    /// Process one terminal or timer event.
    pub fn update(&mut self, event: InputEvent) -> Command {
        match event {
            InputEvent::Resize(size) => {
                self.resize(size.width, size.height);
                Command::None
            }
            InputEvent::Tick => {
                if self.screen.is_busy() {
                    self.spinner.advance();
                }
                Command::None
            }
            InputEvent::Mouse(_) => {
                if let (true, Some(scroll)) = (self.screen.uses_viewport(), scroll_action(&event)) {
                    self.viewport.scroll(scroll);
                }
                Command::None
            }
            InputEvent::Key(key) => self.handle_key(key),
        }
    }

    /// Apply the outcome of a dispatched gateway call.
    pub fn handle_completion(&mut self, completion: Completion) -> Command {
        match completion {
            Completion::EmailSubmitted { mail_id, outcome } => {
                if !matches!(self.screen, Screen::Loading { .. })
                    || mail_id != self.session.email.mail_id
                {
                    tracing::warn!(%mail_id, screen = self.screen.label(), "dropping stale submit completion");
                    return Command::None;
                }
                match outcome {
                    Err(message) => self.fail(message),
                    Ok(result) => {
                        tracing::info!(
                            %mail_id,
                            actions = result.action_count(),
                            "email submitted"
                        );
                        let has_actions = result.has_actions();
                        self.session.install_result(result);
                        if has_actions {
                            self.enter(Screen::Summary, "", TextRole::Muted);
                        } else {
                            self.enter(Screen::Done, NO_ACTIONS, TextRole::Muted);
                        }
                    }
                }
            }
            Completion::ActionUpdated {
                call,
                index,
                outcome,
            } => {
                if index != self.session.action_index {
                    tracing::warn!(
                        call = call.label(),
                        index,
                        current = self.session.action_index,
                        "completion for an action that is not displayed"
                    );
                }
                match outcome {
                    Err(message) => self.fail(message),
                    Ok(action) => {
                        tracing::info!(
                            call = call.label(),
                            index,
                            action_id = %action.action_id,
                            status = %action.status,
                            "action updated"
                        );
                        self.session.replace_action(index, action);
                        if self.session.has_action(index + 1) {
                            self.session.action_index = index + 1;
                            self.enter(Screen::Review, ACTION_UPDATED, TextRole::Success);
                        } else {
                            self.enter(Screen::Done, ALL_REVIEWED, TextRole::Success);
                        }
                    }
                }
            }
        }
        Command::None
    }

    /// Recompute viewport and editor geometry. Never changes screen or session data.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        let viewport_height = viewport_height(height);
        self.viewport.resize(width, viewport_height);
        self.editor
            .set_size(width.saturating_sub(4), viewport_height.saturating_sub(2));
        self.refresh_viewport();
    }

    // -- key handling --------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) -> Command {
        if key.is_ctrl('c') {
            return self.quit();
        }
        if self.screen.uses_viewport() {
            if let Some(scroll) = scroll_action(&InputEvent::Key(key)) {
                self.viewport.scroll(scroll);
                return Command::None;
            }
        }

        match self.screen {
            Screen::Loading { .. } | Screen::SubmittingAction { .. } => Command::None,
            Screen::PreviewEmail => match (key.key, key.letter()) {
                (Key::Enter, _) => self.begin_submission(),
                (_, Some('q')) => self.quit(),
                _ => Command::None,
            },
            Screen::Summary => {
                if key.key == Key::Enter {
                    self.session.action_index = 0;
                    self.enter(Screen::Review, "", TextRole::Muted);
                }
                Command::None
            }
            Screen::Review => self.handle_review_key(key),
            Screen::EditingPayload => self.handle_editor_key(key),
            Screen::PromptGeneral => match (key.key, key.letter()) {
                (_, Some('y')) => self.submit_modified(true),
                (Key::Enter, _) | (_, Some('n')) => self.submit_modified(false),
                _ => Command::None,
            },
            Screen::Done => match (key.key, key.letter()) {
                (Key::Enter, _) if self.session.has_more_emails() => {
                    self.prepare_next_email();
                    Command::None
                }
                (Key::Enter, _) | (_, Some('q')) => self.quit(),
                _ => Command::None,
            },
            Screen::Error => match (key.key, key.letter()) {
                (Key::Enter, _) | (_, Some('q')) => self.quit(),
                _ => Command::None,
            },
        }
    }

    fn handle_review_key(&mut self, key: KeyEvent) -> Command {
        if self.session.current_action().is_none() {
            return Command::None;
        }
        match key.letter() {
            Some('a') => self.dispatch_action(ActionCall::Approve, |index, action_id| {
                Command::ApproveAction { index, action_id }
            }),
            Some('r') => self.dispatch_action(ActionCall::Reject, |index, action_id| {
                Command::RejectAction { index, action_id }
            }),
            Some('m') => {
                self.open_editor();
                Command::None
            }
            Some('q') => self.quit(),
            _ => Command::None,
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Command {
        if key.is_ctrl('s') {
            self.save_edit();
            return Command::None;
        }
        if key.key == Key::Escape {
            self.session.pending_edit = None;
            self.enter(Screen::Review, EDIT_CANCELLED, TextRole::Muted);
            return Command::None;
        }
        self.editor.handle_key(key);
        Command::None
    }

    // -- transitions ---------------------------------------------------------

    fn enter(&mut self, screen: Screen, status: &str, role: TextRole) {
        tracing::debug!(from = self.screen.label(), to = screen.label(), "screen change");
        self.screen = screen;
        self.status = status.to_owned();
        self.status_role = role;
        if self.screen.is_busy() {
            self.spinner.reset();
        }
        self.refresh_viewport();
    }

    fn fail(&mut self, message: String) {
        tracing::warn!(error = %message, screen = self.screen.label(), "gateway call failed");
        self.session.last_error = Some(message);
        self.enter(Screen::Error, "", TextRole::Danger);
    }

    fn quit(&mut self) -> Command {
        tracing::info!(screen = self.screen.label(), "quit requested");
        self.quitting = true;
        Command::Quit
    }

    fn begin_submission(&mut self) -> Command {
        let email = self.session.email.clone();
        tracing::info!(mail_id = %email.mail_id, "submitting email");
        self.enter(
            Screen::Loading {
                message: SUBMITTING_EMAIL.to_owned(),
            },
            "",
            TextRole::Muted,
        );
        Command::SubmitEmail { email }
    }

    /// Enter `SubmittingAction` for the displayed action and build its command.
    fn dispatch_action(
        &mut self,
        call: ActionCall,
        build: impl FnOnce(usize, String) -> Command,
    ) -> Command {
        let index = self.session.action_index;
        let Some(action_id) = self
            .session
            .current_action()
            .map(|action| action.action_id.clone())
        else {
            return Command::None;
        };
        tracing::info!(call = call.label(), index, %action_id, "dispatching action call");
        self.enter(
            Screen::SubmittingAction {
                message: call.busy_message().to_owned(),
            },
            "",
            TextRole::Muted,
        );
        build(index, action_id)
    }

    fn open_editor(&mut self) {
        let Some(payload) = self
            .session
            .current_action()
            .map(|action| content::pretty_json(&action.payload))
        else {
            return;
        };
        match payload {
            Ok(text) => {
                self.editor.seed(&text);
                self.enter(Screen::EditingPayload, "", TextRole::Muted);
            }
            Err(err) => self.fail(format!("format payload: {err}")),
        }
    }

    fn save_edit(&mut self) {
        match self.editor.validate() {
            Ok(payload) => {
                self.editor.clear_error();
                self.session.pending_edit = Some(payload);
                self.enter(Screen::PromptGeneral, PREFERENCE_QUESTION, TextRole::Warning);
            }
            Err(message) => {
                tracing::debug!(error = %message, "payload rejected by editor validation");
                self.editor.set_error(message);
            }
        }
    }

    fn submit_modified(&mut self, apply_to_general: bool) -> Command {
        let Some(payload) = self.session.pending_edit.take() else {
            return Command::None;
        };
        self.dispatch_action(ActionCall::Modify, move |index, action_id| {
            Command::ModifyAction {
                index,
                action_id,
                payload,
                apply_to_general,
            }
        })
    }

    fn prepare_next_email(&mut self) {
        let next = self.session.email_index + 1;
        if self.session.prepare_email(next) {
            self.editor.clear_error();
            self.enter(Screen::PreviewEmail, "", TextRole::Muted);
        }
    }

    // -- rendering -----------------------------------------------------------

    fn refresh_viewport(&mut self) {
        if !self.screen.uses_viewport() {
            return;
        }
        let lines = self.screen_content();
        self.viewport.set_content(lines);
    }

    fn screen_content(&self) -> Vec<mailpilot_tui_adapter::text::Line> {
        let session = &self.session;
        match self.screen {
            Screen::PreviewEmail => content::email_preview(&session.email),
            Screen::Summary => session
                .result
                .as_ref()
                .map(|result| content::summary(&session.email, result))
                .unwrap_or_default(),
            Screen::Review => session
                .current_action()
                .map(|action| {
                    content::action(action, session.action_index, session.actions().len())
                })
                .unwrap_or_default(),
            Screen::PromptGeneral => content::preference_prompt(&self.status),
            Screen::Done => {
                content::completion(session.actions(), &self.status, session.has_more_emails())
            }
            Screen::Error => content::error(session.last_error.as_deref().unwrap_or_default()),
            Screen::Loading { .. } | Screen::SubmittingAction { .. } | Screen::EditingPayload => {
                Vec::new()
            }
        }
    }

    /// Render the full frame: main area, status row, footer.
    #[must_use]
    pub fn render(&self) -> RenderFrame {
        let width = self.width.max(1);
        let height = self.height.max(1);
        let mut frame = RenderFrame::new(FrameSize { width, height }, self.theme);
        if self.quitting {
            return frame;
        }

        let (main, _chrome) = Rect {
            x: 0,
            y: 0,
            width,
            height,
        }
        .split_vertical(height.saturating_sub(CHROME_ROWS));

        match &self.screen {
            Screen::Loading { message } | Screen::SubmittingAction { message } => {
                frame.draw_text(1, 0, &self.spinner.glyph().to_string(), TextRole::Accent);
                frame.draw_text(3, 0, message, TextRole::Primary);
            }
            Screen::EditingPayload => {
                let panel = Rect {
                    x: 1,
                    y: 0,
                    width: self.editor.width() + 2,
                    height: self.editor.height() + 2,
                };
                let border = match self.theme.kind {
                    ThemeKind::HighContrast => BorderStyle::Plain,
                    ThemeKind::Dark | ThemeKind::Light => BorderStyle::Rounded,
                };
                let inner = frame.draw_panel(panel, "Modify Payload", border, TextRole::Focus);
                self.editor.draw(&mut frame, inner);
            }
            _ => self.viewport.draw(&mut frame, main),
        }

        if height >= CHROME_ROWS {
            self.render_status(&mut frame, height - 2);
            self.render_footer(&mut frame, height - 1);
        }
        frame
    }

    fn render_status(&self, frame: &mut RenderFrame, y: usize) {
        if self.screen.embeds_status() {
            return;
        }
        if self.screen == Screen::EditingPayload {
            if let Some(error) = self.editor.error() {
                frame.draw_text(1, y, error, TextRole::Danger);
                return;
            }
        }
        frame.draw_text(1, y, &self.status, self.status_role);
    }

    fn render_footer(&self, frame: &mut RenderFrame, y: usize) {
        let left = format!(
            "mailpilot · mail {}/{} · {}",
            self.session.email_index + 1,
            self.session.email_count(),
            self.screen.label()
        );
        frame.draw_text(1, y, &left, TextRole::Muted);

        let right = if self.screen == Screen::EditingPayload {
            EDITOR_HINT.to_owned()
        } else if self.screen.uses_viewport() && self.viewport.row_count() > self.viewport.height() {
            format!("{:>3}%", self.viewport.scroll_percent())
        } else {
            String::new()
        };
        let right_width = right.chars().count();
        let left_end = 1 + left.chars().count() + 2;
        if right_width > 0 && left_end + right_width < self.width {
            frame.draw_text(self.width - right_width - 1, y, &right, TextRole::Muted);
        }
    }
}

fn viewport_height(height: usize) -> usize {
    height.saturating_sub(CHROME_ROWS).max(MIN_VIEWPORT_HEIGHT)
}
