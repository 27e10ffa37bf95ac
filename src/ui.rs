use crate::filter::Filter;
use crate::storage::KeyValueStore;
use crate::todo_list::TodoList;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
    Editing,
}

pub struct App<S: KeyValueStore> {
    pub todos: TodoList<S>,
    pub filter: Filter,
    pub list_state: ListState,
    pub mode: InputMode,
    pub new_task: String,
    pub should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(todos: TodoList<S>) -> Self {
        let mut app = Self {
            todos,
            filter: Filter::All,
            list_state: ListState::default(),
            mode: InputMode::Normal,
            new_task: String::new(),
            should_quit: false,
        };
        app.clamp_selection();
        app
    }

    pub fn selected_id(&self) -> Option<u64> {
        let i = self.list_state.selected()?;
        self.todos.visible(self.filter).get(i).map(|t| t.id)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.mode {
            InputMode::Normal => self.handle_normal_key(key.code),
            InputMode::Adding => self.handle_adding_key(key.code),
            InputMode::Editing => self.handle_editing_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') | KeyCode::Char('i') => self.mode = InputMode::Adding,
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    if self.todos.start_edit(id) {
                        self.mode = InputMode::Editing;
                    }
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.todos.toggle(id);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.todos.delete(id);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('C') => {
                if !self.todos.is_empty() {
                    self.todos.clear_all();
                    self.clamp_selection();
                }
            }
            KeyCode::Tab => self.set_filter(self.filter.next()),
            KeyCode::Char('1') => self.set_filter(Filter::All),
            KeyCode::Char('2') => self.set_filter(Filter::Active),
            KeyCode::Char('3') => self.set_filter(Filter::Completed),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            _ => {}
        }
    }

    fn handle_adding_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Enter => {
                if self.todos.add(&self.new_task).is_some() {
                    self.new_task.clear();
                    let shown = self.todos.visible(self.filter).len();
                    if shown > 0 && self.filter != Filter::Completed {
                        self.list_state.select(Some(shown - 1));
                    }
                }
            }
            KeyCode::Backspace => {
                self.new_task.pop();
            }
            KeyCode::Char(c) => self.new_task.push(c),
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.todos.cancel_edit();
                self.mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.todos.commit_edit();
                self.mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                if let Some(mut draft) = self.todos.editing().map(|e| e.draft.clone()) {
                    draft.pop();
                    self.todos.set_draft(draft);
                }
            }
            KeyCode::Char(c) => {
                if let Some(mut draft) = self.todos.editing().map(|e| e.draft.clone()) {
                    draft.push(c);
                    self.todos.set_draft(draft);
                }
            }
            _ => {}
        }
    }

    fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.list_state.select(Some(0));
        self.clamp_selection();
    }

    fn move_selection(&mut self, step: isize) {
        let shown = self.todos.visible(self.filter).len();
        if shown == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + step).clamp(0, shown as isize - 1) as usize;
        self.list_state.select(Some(next));
    }

    fn clamp_selection(&mut self) {
        let shown = self.todos.visible(self.filter).len();
        if shown == 0 {
            self.list_state.select(None);
        } else {
            let i = self.list_state.selected().unwrap_or(0).min(shown - 1);
            self.list_state.select(Some(i));
        }
    }
}

pub fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    run_app_with(terminal, app, event::read)
}

/// Same loop as `run_app`, pulling events from `next_event`. The first read
/// error ends the loop and is returned.
pub fn run_app_with<B, S, F>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    mut next_event: F,
) -> io::Result<()>
where
    B: Backend,
    S: KeyValueStore,
    F: FnMut() -> io::Result<Event>,
{
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = next_event()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let input_style = if app.mode == InputMode::Adding {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let input_text = if app.new_task.is_empty() && app.mode != InputMode::Adding {
        Span::styled("Add new task", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.new_task.as_str())
    };
    let input = Paragraph::new(Line::from(input_text)).block(
        Block::default()
            .title("Daily To Do List")
            .borders(Borders::ALL)
            .border_style(input_style),
    );
    f.render_widget(input, chunks[0]);

    let selected_tab = Filter::MODES
        .iter()
        .position(|&filter| filter == app.filter)
        .unwrap_or(0);
    let tabs = Tabs::new(Filter::MODES.iter().map(|filter| filter.label()).collect::<Vec<_>>())
        .block(Block::default().borders(Borders::ALL))
        .select(selected_tab)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[1]);

    let editing = app.todos.editing();
    let items: Vec<ListItem> = app
        .todos
        .visible(app.filter)
        .into_iter()
        .map(|t| {
            let mark = if t.completed { "[x] " } else { "[ ] " };
            match editing {
                Some(edit) if edit.id == t.id => ListItem::new(Line::from(vec![
                    Span::raw(mark),
                    Span::styled(
                        format!("{}▏", edit.draft),
                        Style::default().fg(Color::Yellow),
                    ),
                ])),
                _ => {
                    let style = if t.completed {
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::CROSSED_OUT)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    ListItem::new(Line::from(vec![
                        Span::raw(mark),
                        Span::styled(t.text.as_str(), style),
                    ]))
                }
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[2], &mut app.list_state);

    let footer = Paragraph::new(Line::from(vec![
        Span::raw(format!("{} items", app.todos.len())),
        Span::raw("    "),
        Span::styled(
            "C: Clear All",
            if app.todos.is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            },
        ),
    ]))
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, chunks[3]);

    let help = match app.mode {
        InputMode::Normal => {
            "a add  e edit  space toggle  d delete  tab filter  q quit"
        }
        InputMode::Adding => "enter add  esc done",
        InputMode::Editing => "enter save  esc cancel",
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[4],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use ratatui::backend::TestBackend;

    fn app() -> App<MemoryStore> {
        App::new(TodoList::open(MemoryStore::new()))
    }

    fn press(app: &mut App<MemoryStore>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App<MemoryStore>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &mut App<MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn typing_adds_tasks_and_stays_in_add_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "  Buy milk ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.todos.len(), 1);
        assert_eq!(app.todos.tasks()[0].text, "Buy milk");
        assert!(app.new_task.is_empty());
        assert_eq!(app.mode, InputMode::Adding);

        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.todos.len(), 1);
        assert_eq!(app.new_task, " ");
    }

    #[test]
    fn toggle_edit_and_delete_selected() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "one");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.todos.tasks()[0].completed);

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, InputMode::Editing);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "ly");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.todos.tasks()[0].text, "only");
        assert_eq!(app.mode, InputMode::Normal);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.todos.is_empty());
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn escape_cancels_edit() {
        let mut app = app();
        app.todos.add("keep");
        app.list_state.select(Some(0));
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, " me not");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.todos.tasks()[0].text, "keep");
        assert_eq!(app.todos.editing(), None);
    }

    #[test]
    fn filter_keys_narrow_the_selection() {
        let mut app = app();
        let a = app.todos.add("a").unwrap();
        app.todos.add("b");
        app.todos.toggle(a);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.filter, Filter::Completed);
        assert_eq!(app.selected_id(), Some(a));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.filter, Filter::All);
    }

    #[test]
    fn clear_all_empties_list() {
        let mut app = app();
        app.todos.add("a");
        app.todos.add("b");
        press(&mut app, KeyCode::Char('C'));
        assert!(app.todos.is_empty());
    }

    #[test]
    fn renders_items_and_count() {
        let mut app = app();
        app.todos.add("Buy milk");
        app.todos.add("Walk dog");
        let screen = screen(&mut app);
        assert!(screen.contains("Daily To Do List"));
        assert!(screen.contains("Buy milk"));
        assert!(screen.contains("Walk dog"));
        assert!(screen.contains("2 items"));
    }

    #[test]
    fn event_errors_end_the_loop_with_the_error() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        let mut events = vec![
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "input closed")),
            Ok(Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE))),
        ];
        let err = run_app_with(&mut terminal, &mut app, || {
            events.pop().unwrap_or_else(|| Ok(Event::FocusGained))
        })
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(app.mode, InputMode::Adding);
        assert!(!app.should_quit);
    }

    #[test]
    fn quit_key_ends_the_loop_cleanly() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        let mut events = vec![Ok(Event::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
        )))];
        run_app_with(&mut terminal, &mut app, || {
            events
                .pop()
                .unwrap_or_else(|| Err(io::Error::new(io::ErrorKind::Other, "no more input")))
        })
        .unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
