//! Copying and analysing solutions inside the play save

use super::common::*;
use schem::core::services::{CopyOutcome, SolutionService, UserService};

fn fixture_with_solution() -> TournamentFixture {
    let fixture = TournamentFixture::new();
    UserService::add_users(&fixture.core, &[PLAY_SAVE]).unwrap();
    fixture.add_solution(PLAY_SAVE, "custom-1", "Alpha", &reactor_solution(), (50, 1, 2));
    fixture
}

/// Components of the level that is not `custom-1`.
fn copied_layers(fixture: &TournamentFixture) -> Vec<i64> {
    let save = fixture.open_save(PLAY_SAVE);
    let attempts = save.levels.attempts().unwrap();
    assert_eq!(attempts.len(), 2);
    let copy = attempts.iter().find(|a| a.id != "custom-1").unwrap();
    let built = save.solutions.read_solution(&copy.id, false).unwrap();
    built.components[1]
        .members
        .iter()
        .map(|m| m.layer.raw())
        .collect()
}

#[test]
fn test_copy_single_match() {
    let fixture = fixture_with_solution();
    let outcome = SolutionService::copy(&fixture.core, "Alpha", "*-*-*", false).unwrap();
    assert_eq!(outcome, CopyOutcome::Copied);
    assert_eq!(copied_layers(&fixture), vec![32, 32, 128, 64]);
}

#[test]
fn test_copy_swapped_exchanges_waldos() {
    let fixture = fixture_with_solution();
    let outcome = SolutionService::copy(&fixture.core, "Alpha", "*-*-*", true).unwrap();
    assert_eq!(outcome, CopyOutcome::Copied);
    assert_eq!(copied_layers(&fixture), vec![128, 128, 32, 16]);
}

#[test]
fn test_copy_needs_exactly_one_match() {
    let fixture = fixture_with_solution();
    fixture.add_solution(PLAY_SAVE, "custom-2", "Alpha", &reactor_solution(), (70, 1, 2));

    let outcome = SolutionService::copy(&fixture.core, "Alpha", "*-*-*", false).unwrap();
    assert_eq!(outcome, CopyOutcome::NotCopied(2));
    let outcome = SolutionService::copy(&fixture.core, "Alpha", "99-*-*", false).unwrap();
    assert_eq!(outcome, CopyOutcome::NotCopied(0));

    let save = fixture.open_save(PLAY_SAVE);
    assert_eq!(save.levels.count().unwrap(), 2);

    // A tighter filter picks one of them.
    let outcome = SolutionService::copy(&fixture.core, "Alpha", "70-1-2", false).unwrap();
    assert_eq!(outcome, CopyOutcome::Copied);
}

#[test]
fn test_stats_reads_without_writing() {
    let fixture = fixture_with_solution();
    let records = SolutionService::stats(&fixture.core, "Alpha", "*-*-*").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].header.solver, "Stats");
    assert_eq!(records[0].header.stats, "50-1-2");

    let save = fixture.open_save(PLAY_SAVE);
    assert_eq!(save.levels.count().unwrap(), 1);
}

#[test]
fn test_unknown_puzzle() {
    let fixture = fixture_with_solution();
    assert!(SolutionService::copy(&fixture.core, "Gamma", "*-*-*", false).is_err());
}
