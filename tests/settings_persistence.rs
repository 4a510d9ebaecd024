use std::fs;

use tempfile::TempDir;

use mathdrill::config::{OperandRange, Settings};
use mathdrill::engine::problem::{Operation, Problem};
use mathdrill::generator::RandomProblemGenerator;
use mathdrill::practice::Practice;
use mathdrill::store::file_store::FileRepository;
use mathdrill::store::{SettingsRepository, SettingsStore};

fn repo_in(dir: &TempDir) -> FileRepository {
    FileRepository::with_paths(
        dir.path().join("config").join("settings.toml"),
        dir.path().join("data"),
    )
    .unwrap()
}

fn write_settings(dir: &TempDir, content: &str) {
    let path = dir.path().join("config").join("settings.toml");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn legacy_document_is_migrated_and_rewritten() {
    let dir = TempDir::new().unwrap();
    write_settings(
        &dir,
        r#"
additionMinNumber1 = 5
additionMaxNumber1 = 50
additionMinNumber2 = 40
additionMaxNumber2 = 4
multiplicationMinNumber1 = 3
multiplicationMaxNumber1 = 9
operationTypes = ["subtraction", "division"]
timerDuration = 30
automaticCorrect = true
"#,
    );

    let mut store = SettingsStore::load(repo_in(&dir));
    let settings = store.settings().clone();
    assert_eq!(settings.subtraction, settings.addition);
    assert_eq!(settings.addition.second, OperandRange::new(4, 40));
    assert_eq!(settings.division.first, OperandRange::new(3, 9));
    assert_eq!(settings.division.second, OperandRange::new(2, 12));
    assert_eq!(settings.timer_duration, 30);
    assert!(settings.automatic_correct);
    assert!(!settings.is_enabled(Operation::Addition));

    store.persist().unwrap();
    let content = fs::read_to_string(dir.path().join("config").join("settings.toml")).unwrap();
    assert!(content.contains("schema_version = 2"));
    assert!(!content.contains("additionMinNumber1"));

    let reloaded = SettingsStore::load(repo_in(&dir));
    assert_eq!(reloaded.settings(), &settings);
}

#[test]
fn unreadable_settings_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    write_settings(&dir, "this is = = not toml");
    let store = SettingsStore::load(repo_in(&dir));
    assert_eq!(store.settings(), &Settings::default());
}

#[test]
fn hand_edited_empty_operations_are_healed() {
    let dir = TempDir::new().unwrap();
    write_settings(&dir, "schema_version = 2\noperations = []\n");
    let store = SettingsStore::load(repo_in(&dir));
    assert_eq!(store.settings().operations.len(), 1);
    assert!(store.settings().is_enabled(Operation::Addition));
}

#[test]
fn problem_survives_restart_when_preserving() {
    let dir = TempDir::new().unwrap();
    let shown = {
        let practice = Practice::new(
            SettingsStore::load(repo_in(&dir)),
            RandomProblemGenerator::seeded(21),
        );
        *practice.problem()
    };

    let practice = Practice::new(
        SettingsStore::load(repo_in(&dir)),
        RandomProblemGenerator::seeded(99),
    );
    assert_eq!(practice.problem(), &shown);
}

#[test]
fn turning_preserve_off_removes_snapshot() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("data").join("last_problem.json");

    let mut practice = Practice::new(
        SettingsStore::load(repo_in(&dir)),
        RandomProblemGenerator::seeded(4),
    );
    assert!(snapshot.exists());

    practice.edit_settings(|s| s.preserve_problems = false);
    assert!(!snapshot.exists());
    practice.new_problem();
    assert!(!snapshot.exists());

    let saved = repo_in(&dir).load_settings().unwrap().unwrap();
    assert!(!saved.preserve_problems);
}

#[test]
fn corrupt_snapshot_yields_fresh_problem() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("last_problem.json"),
        r#"{"schema_version":1,"first_operand":5,"second_operand":0,"operator":"÷"}"#,
    )
    .unwrap();

    let repo = repo_in(&dir);
    assert_eq!(repo.load_last_problem(), None);

    let practice = Practice::new(SettingsStore::load(repo), RandomProblemGenerator::seeded(8));
    assert_ne!(practice.problem(), &Problem::new(5, 0, Operation::Division));
    assert!(practice.problem().is_well_formed());
}

#[test]
fn out_of_limit_bounds_are_healed_on_load() {
    let dir = TempDir::new().unwrap();
    write_settings(
        &dir,
        r#"
schema_version = 2
operations = ["addition", "division"]
preserve_problems = false

[addition]
first = { min = -50, max = -40 }
second = { min = 0, max = 5 }

[division]
first = { min = 4000000000, max = 4000000001 }
second = { min = -9, max = 2000 }
"#,
    );

    let store = SettingsStore::load(repo_in(&dir));
    assert_eq!(store.settings().addition.first, OperandRange::new(1, 1));
    assert_eq!(store.settings().division.first, OperandRange::new(999, 999));
    assert_eq!(store.settings().division.second, OperandRange::new(1, 999));

    let mut practice = Practice::new(store, RandomProblemGenerator::seeded(17));
    for _ in 0..200 {
        let problem = *practice.problem();
        assert!(problem.is_well_formed(), "{problem}");
        assert!(problem.second_operand >= 1);
        assert!(problem.correct_answer() >= 1);
        practice.new_problem();
    }
}

#[test]
fn unanswerable_snapshot_yields_fresh_problem() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("last_problem.json"),
        r#"{"schema_version":1,"first_operand":3,"second_operand":9,"operator":"-"}"#,
    )
    .unwrap();

    let repo = repo_in(&dir);
    assert_eq!(repo.load_last_problem(), None);

    let practice = Practice::new(SettingsStore::load(repo), RandomProblemGenerator::seeded(8));
    assert_ne!(practice.problem(), &Problem::new(3, 9, Operation::Subtraction));
    assert!(practice.problem().correct_answer() >= 0);
}
