//! Tests for the home directory: bulk loading, item creation and name lists.

use jobcore::bootstrap::{Runtime, bootstrap};
use jobcore::error::{ErrorCode, HomeError};
use jobcore::home::Home;
use jobcore::item::{Item, from_name_list, to_name_list};
use jobcore::jobs::{CorePlugin, ExternalJob, FreeStyleProject, MatrixProject};
use jobcore::store::{CONFIG_FILE_NAME, Persistent};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn setup() -> (TempDir, Runtime, Home) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let runtime = bootstrap(&[&CorePlugin]).expect("Core plugin registers cleanly");
    let home = Home::new(temp.path(), "jobs");
    (temp, runtime, home)
}

fn write_config(home: &Home, name: &str, text: &str) {
    let dir = home.jobs_root().join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(CONFIG_FILE_NAME), text).unwrap();
}

#[test]
fn load_all_isolates_broken_items() {
    let (_temp, runtime, home) = setup();
    write_config(&home, "alpha", "!project\ncommands: [make]\n");
    write_config(&home, "beta", "!unknown-type {}\n");
    write_config(&home, "gamma", "!matrix-project\naxes: []\n");
    std::fs::create_dir_all(home.jobs_root().join("delta")).unwrap();

    let report = home.load_all(&runtime.config_store());

    assert_eq!(report.loaded, vec!["alpha", "gamma"]);
    let codes: Vec<ErrorCode> = report.failed.iter().map(|(_, e)| e.code()).collect();
    assert_eq!(codes, vec![ErrorCode::UnknownTag, ErrorCode::ConfigNotFound]);
    assert!(home.get("alpha").unwrap().is::<FreeStyleProject>());
    assert!(home.get("beta").is_none());

    let summary = report.summary();
    assert_eq!(summary.failed.len(), 2);
    assert!(summary.failed[0].dir.ends_with("beta"));
}

#[test]
fn load_all_without_jobs_dir_is_empty() {
    let (_temp, runtime, home) = setup();
    let report = home.load_all(&runtime.config_store());
    assert!(report.loaded.is_empty());
    assert!(report.failed.is_empty());
    assert!(home.items().is_empty());
}

#[test]
fn create_item_saves_and_registers() {
    let (_temp, runtime, home) = setup();
    let store = runtime.config_store();

    let item = home
        .create_item(&runtime.types, &store, MatrixProject::TYPE.as_str(), "grid")
        .unwrap();
    assert_eq!(item.full_name(), "grid");
    assert_eq!(item.root_dir(), home.jobs_root().join("grid"));
    assert!(item.root_dir().join(CONFIG_FILE_NAME).is_file());

    let reloaded = Home::new(home.root(), "jobs");
    let report = reloaded.load_all(&store);
    assert_eq!(report.loaded, vec!["grid"]);
    assert!(reloaded.get("grid").unwrap().is::<MatrixProject>());
}

#[test]
fn create_item_rejects_bad_requests() {
    let (_temp, runtime, home) = setup();
    let store = runtime.config_store();
    let key = FreeStyleProject::TYPE.as_str();

    home.create_item(&runtime.types, &store, key, "app").unwrap();

    let err = home
        .create_item(&runtime.types, &store, key, "app")
        .unwrap_err();
    assert!(matches!(err, HomeError::AlreadyExists(ref name) if name == "app"));

    let err = home
        .create_item(&runtime.types, &store, "jobcore.jobs.Pipeline", "pipe")
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownItemType);

    for name in ["", "a/b", "..", "a,b", " app2 ", "app2\n"] {
        let err = home.create_item(&runtime.types, &store, key, name).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidItemName, "name {:?}", name);
    }
    assert!(!home.jobs_root().join("pipe").exists());
}

#[test]
fn downstream_projects_resolve_through_home() {
    let (_temp, runtime, home) = setup();
    let store = runtime.config_store();
    let types = &runtime.types;
    for name in ["build", "test", "deploy"] {
        home.create_item(types, &store, FreeStyleProject::TYPE.as_str(), name)
            .unwrap();
    }
    home.create_item(types, &store, ExternalJob::TYPE.as_str(), "audit")
        .unwrap();

    let mut build = FreeStyleProject::new("build");
    build.child_projects = "test, retired, audit, deploy".to_string();

    let downstream: Vec<Arc<FreeStyleProject>> = build.downstream_projects(&home);
    assert_eq!(to_name_list(downstream.iter().cloned()), "test, deploy");

    let external: Vec<Arc<ExternalJob>> = build.downstream_projects(&home);
    assert_eq!(to_name_list(external), "audit");
}

#[test]
fn create_item_keeps_config_that_failed_to_load() {
    let (_temp, runtime, home) = setup();
    let store = runtime.config_store();
    let original = "!plugin-job\nprecious: operator data\n";
    write_config(&home, "beta", original);

    let report = home.load_all(&store);
    assert_eq!(report.failed.len(), 1);

    let err = home
        .create_item(&runtime.types, &store, FreeStyleProject::TYPE.as_str(), "beta")
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);
    let on_disk = std::fs::read_to_string(home.jobs_root().join("beta").join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(on_disk, original);
    assert!(home.get("beta").is_none());
}

#[test]
fn create_item_refuses_existing_directory() {
    let (_temp, runtime, home) = setup();
    let store = runtime.config_store();
    std::fs::create_dir_all(home.jobs_root().join("scratch")).unwrap();

    let err = home
        .create_item(&runtime.types, &store, FreeStyleProject::TYPE.as_str(), "scratch")
        .unwrap_err();
    assert!(matches!(err, HomeError::AlreadyExists(ref name) if name == "scratch"));
    assert!(!home.jobs_root().join("scratch").join(CONFIG_FILE_NAME).exists());
}

#[test]
fn concurrent_creates_of_one_name_have_one_winner() {
    let (_temp, runtime, home) = setup();
    let store = runtime.config_store();
    let barrier = Barrier::new(8);

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let (home, store, runtime, barrier) = (&home, &store, &runtime, &barrier);
                let key = if i % 2 == 0 {
                    FreeStyleProject::TYPE
                } else {
                    MatrixProject::TYPE
                };
                scope.spawn(move || {
                    barrier.wait();
                    home.create_item(&runtime.types, store, key.as_str(), "shared")
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.code(), ErrorCode::AlreadyExists);
    }

    let live = home.get("shared").unwrap();
    assert_eq!(live.type_key(), winners[0].type_key());
    let reloaded = store.load(&home, &home.jobs_root().join("shared")).unwrap();
    assert_eq!(reloaded.type_key(), live.type_key());
}

#[test]
fn created_names_round_trip_through_name_lists() {
    let (_temp, runtime, home) = setup();
    let store = runtime.config_store();
    for name in ["app", "my app"] {
        home.create_item(&runtime.types, &store, FreeStyleProject::TYPE.as_str(), name)
            .unwrap();
    }

    let items: Vec<Arc<FreeStyleProject>> = from_name_list(&home, "app, my app");
    assert_eq!(items.len(), 2);
    assert_eq!(to_name_list(items), "app, my app");
}
