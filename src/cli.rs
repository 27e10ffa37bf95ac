use crate::filter::Filter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily to-do list", long_about = None)]
pub struct Cli {
    /// Directory holding todos.json and the log files
    #[arg(long, global = true, env = "TODOLIST_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// trace, debug, info, warn or error
    #[arg(long, global = true, env = "TODOLIST_LOG", value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        #[arg(value_name = "TEXT", required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List tasks
    List {
        #[arg(short, long, default_value_t = Filter::All)]
        filter: Filter,
    },
    /// Flip a task between active and completed
    Toggle {
        #[arg(value_name = "ID")]
        id: u64,
    },
    /// Replace the text of a task
    Edit {
        #[arg(value_name = "ID")]
        id: u64,
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Delete a task
    Delete {
        #[arg(value_name = "ID")]
        id: u64,
    },
    /// Delete every task
    Clear,
    /// Launch TUI interface
    Tui,
}
