// App state and main event loop.
// Routes key input, debounced search, background requests, and rendering.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::cache::QueryKey;
use crate::config::Config;
use crate::error::Result;
use crate::notehub::{FetchNotesParams, FetchNotesResponse, NewNote, Note, NotesApi};
use crate::query::{MutationState, QueryClient, QueryView};
use crate::state::{FormFocus, NoteFormState, NoteListState, SearchState, Toast};
use crate::ui;

/// Longest wait for terminal input before the loop runs again.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Completion of a background request.
#[derive(Debug)]
pub enum AppEvent {
    NotesLoaded {
        key: QueryKey,
        result: Result<FetchNotesResponse>,
    },
    NoteCreated(Result<Note>),
    NoteDeleted {
        id: String,
        result: Result<Note>,
    },
}

/// Main application state.
pub struct App<A: NotesApi> {
    api: A,
    /// List query and its cache.
    pub queries: QueryClient,
    /// Selection in the note list.
    pub list: NoteListState,
    /// Search box input.
    pub search: SearchState,
    /// Create form, present while the modal is open.
    pub form: Option<NoteFormState>,
    pub create: MutationState,
    pub delete: MutationState,
    /// Note currently being deleted.
    pub deleting_id: Option<String>,
    /// Latest status notice.
    pub toast: Option<Toast>,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl<A: NotesApi> App<A> {
    pub fn new(api: A, config: &Config) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            queries: QueryClient::new(config.stale_time),
            list: NoteListState::new(),
            search: SearchState::new(config.search_debounce),
            form: None,
            create: MutationState::default(),
            delete: MutationState::default(),
            deleting_id: None,
            toast: None,
            show_help: false,
            should_quit: false,
            events_tx,
            events_rx,
        }
    }

    /// Issue the initial list request.
    pub fn start(&mut self) {
        let params = self.queries.params().clone();
        self.apply_params(params);
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.start();
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.drain_events();
            self.tick(Instant::now());
            self.handle_input()?;
        }
        Ok(())
    }

    /// Apply every completed background request.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    /// Time-driven updates: settled search input and toast expiry.
    pub fn tick(&mut self, now: Instant) {
        if let Some(term) = self.search.poll(now) {
            self.apply_search(term);
        }
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    /// Wait for one key event, waking early when the search debounce expires.
    #[allow(clippy::collapsible_if)]
    fn handle_input(&mut self) -> io::Result<()> {
        let timeout = self
            .search
            .time_until_ready(Instant::now())
            .map_or(INPUT_POLL, |left| left.min(INPUT_POLL));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Notes currently on screen, own or placeholder.
    pub fn displayed_notes(&self) -> &[Note] {
        match self.queries.view() {
            QueryView::Ready { notes, .. } => notes,
            _ => &[],
        }
    }

    fn apply_params(&mut self, params: FetchNotesParams) {
        if let Some(key) = self.queries.set_params(params) {
            self.spawn_fetch(key);
        }
        let len = self.displayed_notes().len();
        self.list.reset(len);
    }

    /// A settled search term always lands on page 1.
    fn apply_search(&mut self, term: String) {
        let params = self.queries.params().with_search(term);
        if params != *self.queries.params() {
            self.apply_params(params);
        }
    }

    fn change_page(&mut self, page: u32) {
        let total = self.queries.total_pages();
        if total <= 1 {
            return;
        }
        let page = page.clamp(1, total);
        if page != self.queries.params().page {
            let params = self.queries.params().with_page(page);
            self.apply_params(params);
        }
    }

    fn spawn_fetch(&self, key: QueryKey) {
        debug!("fetching {}", key);
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.list_notes(&key.params()).await;
            let _ = tx.send(AppEvent::NotesLoaded { key, result });
        });
    }

    fn spawn_create(&self, note: NewNote) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.create_note(&note).await;
            let _ = tx.send(AppEvent::NoteCreated(result));
        });
    }

    fn spawn_delete(&self, id: String) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.delete_note(&id).await;
            let _ = tx.send(AppEvent::NoteDeleted { id, result });
        });
    }

    /// Apply the outcome of a background request.
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::NotesLoaded { key, result } => {
                let is_active = key == *self.queries.active_key();
                match &result {
                    Err(e) if is_active && self.queries.has_own_data() => {
                        self.toast = Some(Toast::error(format!("Could not refresh notes: {}", e)));
                    }
                    _ => {}
                }
                if let Some(next) = self.queries.settle(&key, result) {
                    self.spawn_fetch(next);
                }
                if is_active {
                    let len = self.displayed_notes().len();
                    self.list.clamp(len);
                }
            }
            AppEvent::NoteCreated(result) => {
                let refetch = self.create.settle("create note", &result, &mut self.queries);
                match &result {
                    Ok(note) => {
                        info!("created note {}", note.id);
                        self.form = None;
                        self.toast = Some(Toast::info(format!("Created \"{}\"", note.title)));
                    }
                    Err(e) => {
                        self.toast = Some(Toast::error(format!("Could not create note: {}", e)));
                    }
                }
                if let Some(key) = refetch {
                    self.spawn_fetch(key);
                }
            }
            AppEvent::NoteDeleted { id, result } => {
                self.deleting_id = None;
                let refetch = self.delete.settle("delete note", &result, &mut self.queries);
                match &result {
                    Ok(note) => {
                        info!("deleted note {}", id);
                        self.toast = Some(Toast::info(format!("Deleted \"{}\"", note.title)));
                    }
                    Err(e) if e.is_not_found() => {
                        self.toast = Some(Toast::error("Note was already deleted"));
                    }
                    Err(e) => {
                        self.toast = Some(Toast::error(format!("Could not delete note: {}", e)));
                    }
                }
                if let Some(key) = refetch {
                    self.spawn_fetch(key);
                }
            }
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if self.form.is_some() {
            self.handle_form_key(key);
        } else if self.search.focused {
            self.handle_search_key(key);
        } else {
            self.handle_list_key(key);
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let page = self.queries.params().page;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('/') => self.search.focused = true,
            KeyCode::Char('n') => self.open_form(),
            KeyCode::Char('s') => {
                let params = self.queries.params();
                let params = params.with_sort(params.sort_by.toggle());
                self.apply_params(params);
            }
            KeyCode::Char('r') => {
                if let Some(key) = self.queries.refresh() {
                    self.spawn_fetch(key);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.displayed_notes().len();
                self.list.select_next(len);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let len = self.displayed_notes().len();
                self.list.select_prev(len);
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
                self.change_page(page.saturating_add(1))
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
                self.change_page(page.saturating_sub(1))
            }
            KeyCode::Home => self.change_page(1),
            KeyCode::End => self.change_page(self.queries.total_pages()),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.search.focused = false,
            KeyCode::Enter => {
                self.search.focused = false;
                if let Some(term) = self.search.flush() {
                    self.apply_search(term);
                }
            }
            KeyCode::Backspace => self.search.backspace(now),
            KeyCode::Char('u') if ctrl => self.search.clear(now),
            KeyCode::Char(c) if !ctrl => self.search.push_char(c, now),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.close_form(),
            KeyCode::Char('s') if ctrl => self.submit_form(),
            KeyCode::Tab => form.focus_next(),
            KeyCode::BackTab => form.focus_prev(),
            KeyCode::Left if form.focus == FormFocus::Tag => form.cycle_tag(false),
            KeyCode::Right if form.focus == FormFocus::Tag => form.cycle_tag(true),
            KeyCode::Enter => match form.focus {
                FormFocus::Submit => self.submit_form(),
                FormFocus::Cancel => self.close_form(),
                FormFocus::Content => form.insert_char('\n'),
                FormFocus::Title | FormFocus::Tag => form.focus_next(),
            },
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) if !ctrl => form.insert_char(c),
            _ => {}
        }
    }

    /// A pending create owns the form until it settles.
    fn open_form(&mut self) {
        if self.create.is_pending() {
            self.toast = Some(Toast::info("Still saving the previous note"));
            return;
        }
        self.create.reset();
        self.form = Some(NoteFormState::new());
    }

    fn close_form(&mut self) {
        self.form = None;
    }

    /// Validate the form and send it. Invalid input never reaches the API.
    fn submit_form(&mut self) {
        if self.create.is_pending() {
            return;
        }
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let Some(note) = form.validate() else {
            debug!("create form has {} errors", form.errors.len());
            return;
        };
        self.create.start();
        self.spawn_create(note);
    }

    /// Delete the selected note. Refused while another delete is pending.
    fn delete_selected(&mut self) {
        if self.delete.is_pending() {
            return;
        }
        let Some(id) = self
            .list
            .selected()
            .and_then(|i| self.displayed_notes().get(i))
            .map(|note| note.id.clone())
        else {
            return;
        };
        self.delete.start();
        self.deleting_id = Some(id.clone());
        self.spawn_delete(id);
    }

    /// Wait for the next background completion.
    #[cfg(test)]
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoteHubError;
    use crate::notehub::SortBy;
    use crate::notehub::fake::FakeNotes;
    use crate::state::ToastLevel;
    use crate::validation::Field;

    fn press(app: &mut App<FakeNotes>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App<FakeNotes>, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App<FakeNotes>, text: &str) {
        text.chars().for_each(|c| press(app, KeyCode::Char(c)));
    }

    async fn settle_one(app: &mut App<FakeNotes>) {
        let event = app.next_event().await.expect("event channel closed");
        app.handle_app_event(event);
    }

    async fn started(api: &FakeNotes) -> App<FakeNotes> {
        let mut app = App::new(api.clone(), &Config::new("token"));
        app.start();
        settle_one(&mut app).await;
        app
    }

    #[tokio::test]
    async fn test_start_loads_first_page() {
        let api = FakeNotes::with_notes(30);
        let app = started(&api).await;
        assert_eq!(app.displayed_notes().len(), 12);
        assert_eq!(app.list.selected(), Some(0));
        assert_eq!(app.queries.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_page_keys_change_only_page() {
        let api = FakeNotes::with_notes(30);
        let mut app = started(&api).await;

        press(&mut app, KeyCode::Right);
        settle_one(&mut app).await;
        assert_eq!(app.queries.params().page, 2);
        assert_eq!(app.queries.params().search, "");
        assert_eq!(app.queries.params().sort_by, SortBy::Created);

        press(&mut app, KeyCode::End);
        settle_one(&mut app).await;
        assert_eq!(app.queries.params().page, 3);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.queries.params().page, 3);

        // Page 1 is still fresh, so going back costs no request.
        press(&mut app, KeyCode::Home);
        assert_eq!(app.queries.params().page, 1);
        assert_eq!(api.list_calls(), 3);
        assert_eq!(app.displayed_notes()[0].id, "30");
    }

    #[tokio::test]
    async fn test_single_page_ignores_paging() {
        let api = FakeNotes::with_notes(5);
        let mut app = started(&api).await;
        press(&mut app, KeyCode::Right);
        assert_eq!(app.queries.params().page, 1);
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_search_is_debounced_and_resets_page() {
        let api = FakeNotes::with_notes(30);
        let mut app = started(&api).await;
        press(&mut app, KeyCode::Right);
        settle_one(&mut app).await;

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "even");
        assert_eq!(app.search.input, "even");
        // Nothing reaches the query until the quiet period ends.
        app.tick(Instant::now());
        assert_eq!(app.queries.params().search, "");

        app.tick(Instant::now() + Duration::from_millis(400));
        assert_eq!(app.queries.params().search, "even");
        assert_eq!(app.queries.params().page, 1);
        settle_one(&mut app).await;
        assert_eq!(app.displayed_notes().len(), 12);
        assert!(app.displayed_notes().iter().all(|n| n.content == "even"));
        assert_eq!(api.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_enter_flushes_search() {
        let api = FakeNotes::with_notes(3);
        let mut app = started(&api).await;
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "zzz");
        press(&mut app, KeyCode::Enter);
        assert!(!app.search.focused);
        assert_eq!(app.queries.params().search, "zzz");
        settle_one(&mut app).await;
        assert_eq!(app.queries.view(), QueryView::Empty { searching: true });
    }

    #[tokio::test]
    async fn test_sort_toggle() {
        let api = FakeNotes::with_notes(3);
        let mut app = started(&api).await;
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.queries.params().sort_by, SortBy::Updated);
        settle_one(&mut app).await;
        assert_eq!(api.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_delete_disabled_while_pending() {
        let api = FakeNotes::with_notes(30);
        let mut app = started(&api).await;

        press(&mut app, KeyCode::Down);
        let target = app.displayed_notes()[1].id.clone();
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.deleting_id.as_deref(), Some(target.as_str()));
        press(&mut app, KeyCode::Char('d'));
        assert!(app.delete.is_pending());

        settle_one(&mut app).await; // delete
        assert_eq!(api.total(), 29);
        assert_eq!(app.deleting_id, None);
        assert_eq!(app.delete, MutationState::Success);

        settle_one(&mut app).await; // re-fetch
        assert!(app.displayed_notes().iter().all(|n| n.id != target));
    }

    #[tokio::test]
    async fn test_invalid_form_shows_errors_without_request() {
        let api = FakeNotes::with_notes(1);
        let mut app = started(&api).await;

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Hi");
        ctrl(&mut app, 's');

        let form = app.form.as_ref().unwrap();
        assert_eq!(
            form.error(Field::Title),
            Some("Title must be at least 3 characters long.")
        );
        assert_eq!(app.create, MutationState::Idle);
        assert_eq!(api.total(), 1);
    }

    #[tokio::test]
    async fn test_successful_create_closes_form_and_refetches() {
        let api = FakeNotes::with_notes(1);
        let mut app = started(&api).await;

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Hello");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "world");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.as_ref().unwrap().focus, FormFocus::Submit);
        press(&mut app, KeyCode::Enter);
        assert!(app.create.is_pending());

        settle_one(&mut app).await; // create
        assert!(app.form.is_none());
        assert_eq!(api.total(), 2);

        settle_one(&mut app).await; // re-fetch
        let titles: Vec<&str> = app.displayed_notes().iter().map(|n| n.title.as_str()).collect();
        assert!(titles.contains(&"Hello"));
    }

    #[tokio::test]
    async fn test_failed_create_keeps_form_open() {
        let api = FakeNotes::with_notes(1);
        let mut app = started(&api).await;
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Hello");
        ctrl(&mut app, 's');
        // Drop the real completion and deliver a failure instead.
        let _ = app.next_event().await;

        app.handle_app_event(AppEvent::NoteCreated(Err(NoteHubError::Timeout)));
        assert!(app.form.is_some());
        assert!(matches!(app.create, MutationState::Error(_)));
        assert!(app.toast.as_ref().unwrap().message.contains("timed out"));
    }

    #[tokio::test]
    async fn test_search_edit_back_to_same_term_resets_page() {
        let api = FakeNotes::with_notes(30);
        let mut app = started(&api).await;
        press(&mut app, KeyCode::Right);
        settle_one(&mut app).await;
        assert_eq!(app.queries.params().page, 2);

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Backspace);
        app.tick(Instant::now() + Duration::from_millis(400));

        assert_eq!(app.queries.params().search, "");
        assert_eq!(app.queries.params().page, 1);
        // Page 1 is cached, so the reset costs no request.
        assert_eq!(api.list_calls(), 2);
        assert_eq!(app.displayed_notes()[0].id, "30");
    }

    #[tokio::test]
    async fn test_form_stays_closed_while_create_pending() {
        let api = FakeNotes::with_notes(1);
        let mut app = started(&api).await;

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Hello");
        ctrl(&mut app, 's');
        press(&mut app, KeyCode::Esc);
        assert!(app.form.is_none());

        press(&mut app, KeyCode::Char('n'));
        assert!(app.form.is_none());
        assert!(app.create.is_pending());

        settle_one(&mut app).await; // create
        assert_eq!(api.total(), 2);
        assert_eq!(app.create, MutationState::Success);
        settle_one(&mut app).await; // re-fetch

        press(&mut app, KeyCode::Char('n'));
        assert!(app.form.is_some());
        assert_eq!(app.create, MutationState::Idle);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_list_and_toasts() {
        let api = FakeNotes::with_notes(3);
        let mut app = started(&api).await;

        api.set_fail_lists(true);
        press(&mut app, KeyCode::Char('r'));
        settle_one(&mut app).await;

        assert_eq!(app.displayed_notes().len(), 3);
        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert!(toast.message.starts_with("Could not refresh notes"));
    }

    #[tokio::test]
    async fn test_help_overlay_swallows_keys() {
        let api = FakeNotes::with_notes(1);
        let mut app = started(&api).await;
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('n'));
        assert!(app.form.is_none());
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
