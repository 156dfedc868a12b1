use taskline_core::db::open_db_in_memory;
use taskline_core::{Filter, SqliteKvRepository, TaskStore, Theme};

#[test]
fn filters_partition_the_list() {
    let conn = open_db_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvRepository::new(&conn)).unwrap();

    let a = store.add_task("A").unwrap().unwrap();
    let b = store.add_task("B").unwrap().unwrap();
    store.toggle_task(a).unwrap();

    store.set_filter(Filter::Completed);
    let completed: Vec<_> = store.visible_tasks().iter().map(|task| task.id).collect();
    assert_eq!(completed, vec![a]);

    store.set_filter(Filter::Pending);
    let pending: Vec<_> = store.visible_tasks().iter().map(|task| task.id).collect();
    assert_eq!(pending, vec![b]);

    store.set_filter(Filter::All);
    assert_eq!(store.visible_tasks().len(), store.counts().total);
}

#[test]
fn pending_view_never_shows_completed_tasks() {
    let conn = open_db_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvRepository::new(&conn)).unwrap();

    for n in 0..6 {
        let id = store.add_task(&format!("task {n}")).unwrap().unwrap();
        if n % 2 == 0 {
            store.toggle_task(id).unwrap();
        }
    }

    store.set_filter(Filter::Pending);
    assert!(store.visible_tasks().iter().all(|task| !task.completed));

    store.set_filter(Filter::Completed);
    assert!(store.visible_tasks().iter().all(|task| task.completed));
}

#[test]
fn visible_tasks_keep_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvRepository::new(&conn)).unwrap();

    let mut ids = Vec::new();
    for n in 0..4 {
        ids.push(store.add_task(&format!("task {n}")).unwrap().unwrap());
    }
    store.toggle_task(ids[0]).unwrap();
    store.toggle_task(ids[2]).unwrap();

    store.set_filter(Filter::Completed);
    let visible: Vec<_> = store.visible_tasks().iter().map(|task| task.id).collect();
    assert_eq!(visible, vec![ids[0], ids[2]]);
}

#[test]
fn progress_ratio_is_defined_for_an_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let store = TaskStore::load(SqliteKvRepository::new(&conn)).unwrap();
    assert_eq!(store.progress_ratio(), 0.0);
}

#[test]
fn progress_ratio_tracks_completion() {
    let conn = open_db_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvRepository::new(&conn)).unwrap();

    let a = store.add_task("A").unwrap().unwrap();
    store.add_task("B").unwrap();
    assert_eq!(store.progress_ratio(), 0.0);

    store.toggle_task(a).unwrap();
    assert!((store.progress_ratio() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn snapshot_reflects_filter_theme_and_edit_state() {
    let conn = open_db_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvRepository::new(&conn)).unwrap();

    let a = store.add_task("A").unwrap().unwrap();
    store.add_task("B").unwrap();
    store.toggle_task(a).unwrap();
    store.set_filter(Filter::Completed);
    store.set_theme(Theme::Dark).unwrap();
    store.begin_edit(a);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.filter, Filter::Completed);
    assert_eq!(snapshot.theme, Theme::Dark);
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].id, a);
    assert_eq!(snapshot.counts.completed, 1);
    assert_eq!(snapshot.counts.total, 2);
    assert!((snapshot.progress - 0.5).abs() < f64::EPSILON);
    assert_eq!(snapshot.editing.unwrap().task_id, a);
}

#[test]
fn counts_ignore_the_active_filter() {
    let conn = open_db_in_memory().unwrap();
    let mut store = TaskStore::load(SqliteKvRepository::new(&conn)).unwrap();

    let a = store.add_task("A").unwrap().unwrap();
    store.add_task("B").unwrap();
    store.toggle_task(a).unwrap();
    store.set_filter(Filter::Pending);

    let counts = store.counts();
    assert_eq!(counts.completed, 1);
    assert_eq!(counts.total, 2);
}
