use datakit_core::{MemoryRepository, RepoError, Repository};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Message {
    author: String,
    body: String,
}

fn message(body: &str) -> Message {
    Message {
        author: "ada".to_string(),
        body: body.to_string(),
    }
}

#[test]
fn create_then_get_returns_created_entity() {
    let repo: MemoryRepository<Message> = MemoryRepository::new();
    let id = repo.create(message("hello")).unwrap();

    assert_eq!(repo.get(id).unwrap(), message("hello"));
}

#[test]
fn update_then_get_returns_new_value() {
    let repo: MemoryRepository<Message> = MemoryRepository::new();
    let id = repo.create(message("draft")).unwrap();

    repo.update(id, message("final")).unwrap();

    assert_eq!(repo.get(id).unwrap(), message("final"));
}

#[test]
fn missing_ids_report_not_found() {
    let repo: MemoryRepository<Message> = MemoryRepository::new();

    assert!(matches!(repo.get(42), Err(RepoError::NotFound(42))));
    assert!(matches!(
        repo.update(42, message("x")),
        Err(RepoError::NotFound(42))
    ));
    assert!(matches!(repo.delete(42), Err(RepoError::NotFound(42))));
}

#[test]
fn delete_then_get_reports_not_found() {
    let repo: MemoryRepository<Message> = MemoryRepository::new();
    let id = repo.create(message("bye")).unwrap();

    repo.delete(id).unwrap();

    assert!(repo.get(id).unwrap_err().is_not_found());
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn ten_entities_update_and_delete_cycle() {
    let repo: MemoryRepository<Message> = MemoryRepository::new();
    let mut ids = Vec::new();
    for index in 0..10 {
        ids.push(repo.create(message(&format!("message {index}"))).unwrap());
    }

    for id in &ids {
        let mut current = repo.get(*id).unwrap();
        current.body.push_str(" updated");
        repo.update(*id, current).unwrap();
    }

    let all = repo.get_all().unwrap();
    assert_eq!(all.len(), 10);
    assert!(all.iter().all(|entry| entry.body.contains("updated")));

    for id in &ids {
        repo.delete(*id).unwrap();
    }
    assert_eq!(repo.get_all().unwrap().len(), 0);
}

#[test]
fn get_all_counts_only_live_entities_in_id_order() {
    let repo: MemoryRepository<Message> = MemoryRepository::new();
    let first = repo.create(message("a")).unwrap();
    let second = repo.create(message("b")).unwrap();
    repo.create(message("c")).unwrap();
    repo.delete(second).unwrap();

    let all = repo.get_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.lookup(0).body, "a");
    assert_eq!(all.lookup(1).body, "c");
    assert!(first < second);
}

#[test]
fn concurrent_creates_get_distinct_ids() {
    let repo = Arc::new(MemoryRepository::<String>::new());
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                (0..50)
                    .map(|index| repo.create(format!("{worker}-{index}")).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "duplicate id {id}");
        }
    }

    assert_eq!(ids.len(), 400);
    assert_eq!(repo.get_all().unwrap().len(), 400);
}
