use crate::filter::{self, Filter};
use crate::storage::{self, KeyValueStore};
use crate::task::{IdGenerator, Task};
use log::debug;

/// The task currently being edited and its uncommitted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: u64,
    pub draft: String,
}

/// Ordered task list mirrored into `S` after every mutation.
#[derive(Debug)]
pub struct TodoList<S: KeyValueStore> {
    tasks: Vec<Task>,
    editing: Option<EditDraft>,
    ids: IdGenerator,
    store: S,
}

impl<S: KeyValueStore> TodoList<S> {
    pub fn open(store: S) -> Self {
        let tasks = storage::load(&store);
        Self {
            ids: IdGenerator::after(&tasks),
            tasks,
            editing: None,
            store,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn visible(&self, filter: Filter) -> Vec<&Task> {
        filter::visible(&self.tasks, filter)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends a task with the trimmed text. Text that trims to nothing is
    /// ignored and nothing is saved.
    pub fn add(&mut self, raw_text: &str) -> Option<u64> {
        let text = raw_text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.ids.next_id(&self.tasks);
        self.tasks.push(Task::new(id, text.to_string()));
        debug!("added task {id}");
        self.persist();
        Some(id)
    }

    pub fn toggle(&mut self, id: u64) -> bool {
        let found = match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                debug!("toggled task {id} to completed={}", task.completed);
                true
            }
            None => false,
        };
        self.persist();
        found
    }

    /// Opens the edit slot on `id` with its current text as the draft. Any
    /// pending draft is dropped.
    pub fn start_edit(&mut self, id: u64) -> bool {
        let Some(task) = self.get(id) else {
            return false;
        };
        let draft = task.text.clone();
        self.editing = Some(EditDraft { id, draft });
        true
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Some(editing) = self.editing.as_mut() {
            editing.draft = text.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Writes the draft into its task as-is. Unlike `add`, the draft is not
    /// trimmed and may be empty.
    pub fn commit_edit(&mut self) -> bool {
        let Some(EditDraft { id, draft }) = self.editing.take() else {
            return false;
        };
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.text = draft;
            debug!("edited task {id}");
        }
        self.persist();
        true
    }

    pub fn edit(&mut self, id: u64, new_text: impl Into<String>) -> bool {
        if !self.start_edit(id) {
            return false;
        }
        self.set_draft(new_text);
        self.commit_edit()
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            debug!("deleted task {id}");
        }
        self.persist();
        removed
    }

    pub fn clear_all(&mut self) {
        debug!("cleared {} tasks", self.tasks.len());
        self.tasks.clear();
        self.persist();
    }

    fn persist(&mut self) {
        storage::save(&mut self.store, &self.tasks);
    }
}
