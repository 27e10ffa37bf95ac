use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use todolist::{
    cli::{Cli, Commands},
    config::Config,
    logging::init_logging,
    ui::{run_app, App},
    FileStore, Filter, Task, TodoList,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    let _logger = init_logging(&config.log_level, &config.log_dir())?;
    info!("using data dir {}", config.data_dir.display());

    let mut todos = TodoList::open(FileStore::new(&config.data_dir));

    match cli.command {
        Some(Commands::Add { text }) => match todos.add(&text.join(" ")) {
            Some(id) => println!("Added #{id}"),
            None => println!("Nothing to add: task text is empty."),
        },
        Some(Commands::List { filter }) => print_tasks(&todos, filter),
        Some(Commands::Toggle { id }) => {
            todos.toggle(id);
            match todos.get(id) {
                Some(task) => print_task(task),
                None => println!("No task #{id}"),
            }
        }
        Some(Commands::Edit { id, text }) => {
            if !todos.edit(id, text) {
                println!("No task #{id}");
            }
        }
        Some(Commands::Delete { id }) => {
            if !todos.delete(id) {
                println!("No task #{id}");
            }
        }
        Some(Commands::Clear) => {
            todos.clear_all();
            println!("Cleared all tasks.");
        }
        Some(Commands::Tui) | None => run_tui(todos)?,
    }
    Ok(())
}

fn print_tasks(todos: &TodoList<FileStore>, filter: Filter) {
    for task in todos.visible(filter) {
        print_task(task);
    }
    println!("{} items", todos.len());
}

fn print_task(task: &Task) {
    let mark = if task.completed { "x" } else { " " };
    println!("[{mark}] #{} {}", task.id, task.text);
}

fn run_tui(todos: TodoList<FileStore>) -> Result<()> {
    enable_raw_mode()?;
    let result = run_in_alternate_screen(todos);
    // Raw mode goes off whether or not the UI came up.
    disable_raw_mode()?;
    if let Err(err) = &result {
        error!("terminal UI failed: {err:#}");
    }
    result
}

fn run_in_alternate_screen(todos: TodoList<FileStore>) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            return Err(err.into());
        }
    };

    let mut app = App::new(todos);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.context("terminal UI failed")
}
