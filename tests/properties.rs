use proptest::prelude::*;
use todolist::storage::{self, MemoryStore};
use todolist::{visible, Filter, Task, TodoList};

fn task() -> impl Strategy<Value = Task> {
    (any::<u64>(), any::<String>(), any::<bool>()).prop_map(|(id, text, completed)| Task {
        id,
        text,
        completed,
    })
}

fn unicode_blank() -> impl Strategy<Value = String> {
    let whitespace: Vec<char> = (0..=0x10FFFF_u32)
        .filter_map(char::from_u32)
        .filter(|c| c.is_whitespace())
        .collect();
    prop::collection::vec(prop::sample::select(whitespace), 0..16)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn active_and_completed_rebuild_the_list(tasks in prop::collection::vec(task(), 0..32)) {
        let active = visible(&tasks, Filter::Active);
        let completed = visible(&tasks, Filter::Completed);
        prop_assert_eq!(active.len() + completed.len(), tasks.len());

        let (mut a, mut c) = (active.into_iter(), completed.into_iter());
        for task in &tasks {
            let next = if task.completed { c.next() } else { a.next() };
            prop_assert_eq!(next, Some(task));
        }
        prop_assert_eq!(visible(&tasks, Filter::All).len(), tasks.len());
    }

    #[test]
    fn save_then_load_returns_the_same_list(tasks in prop::collection::vec(task(), 0..32)) {
        let mut store = MemoryStore::new();
        storage::load(&store);
        storage::save(&mut store, &tasks);
        prop_assert_eq!(storage::load(&store), tasks);
    }

    #[test]
    fn blank_text_is_never_added(
        existing in prop::collection::vec("[a-z]{1,8}", 0..4),
        blank in unicode_blank(),
    ) {
        let mut todos = TodoList::open(MemoryStore::new());
        for text in &existing {
            todos.add(text);
        }
        let before = todos.tasks().to_vec();
        prop_assert_eq!(todos.add(&blank), None);
        prop_assert_eq!(todos.tasks(), before.as_slice());
    }
}
