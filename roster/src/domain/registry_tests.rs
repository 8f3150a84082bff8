//! Tests for the selection registry.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockall::Sequence;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockWorksheet;
use crate::domain::records::SELECTION_HEADERS;
use crate::domain::{CharacterName, ClassSpec, GameClass, MemberProfile, Specialization};
use crate::test_support::{FixedClock, InMemoryWorksheet};

fn header() -> Vec<String> {
    SELECTION_HEADERS.iter().map(|cell| (*cell).to_owned()).collect()
}

fn member(id: &str) -> MemberProfile {
    MemberProfile::new(
        MemberId::new(id).expect("valid id"),
        format!("user{id}"),
        format!("User {id}"),
    )
}

fn submission(id: &str, class: GameClass, spec: Specialization) -> SelectionSubmission {
    SelectionSubmission::new(
        member(id),
        CharacterName::new(format!("Char{id}")).expect("valid name"),
        ClassSpec::new(class, spec).expect("valid pair"),
    )
}

#[fixture]
fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
            .single()
            .expect("valid timestamp"),
    ))
}

fn registry_over(
    sheet: &Arc<InMemoryWorksheet>,
    clock: Arc<FixedClock>,
) -> SelectionRegistry<InMemoryWorksheet> {
    SelectionRegistry::new(Arc::clone(sheet), clock)
}

#[rstest]
#[tokio::test]
async fn first_upsert_creates_one_row(clock: Arc<FixedClock>) {
    let sheet = Arc::new(InMemoryWorksheet::selections());
    let registry = registry_over(&sheet, clock);

    let outcome = registry
        .upsert(&submission("100", GameClass::Paladin, Specialization::Protection))
        .await;

    assert_eq!(outcome, SaveOutcome::Created);
    let rows = sheet.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], "100");
    assert_eq!(rows[1][6], "2024-05-01 12:30:00 UTC");
    assert_eq!(rows[1][7], "1");
    assert_eq!(rows[1][8], "Initial selection");
}

#[rstest]
#[tokio::test]
async fn second_upsert_overwrites_in_place(clock: Arc<FixedClock>) {
    let sheet = Arc::new(InMemoryWorksheet::selections());
    let registry = registry_over(&sheet, clock);
    registry
        .upsert(&submission("100", GameClass::Paladin, Specialization::Protection))
        .await;
    registry
        .upsert(&submission("200", GameClass::Priest, Specialization::Shadow))
        .await;

    let outcome = registry
        .upsert(&submission("100", GameClass::Paladin, Specialization::Holy))
        .await;

    assert_eq!(outcome, SaveOutcome::Updated { update_count: 2 });
    let rows = sheet.rows();
    assert_eq!(rows.len(), 3, "row count must not change on update");
    assert_eq!(rows[1][5], "Holy");
    assert_eq!(rows[1][7], "2");
    assert_eq!(rows[1][8], "Updated selection");
    assert_eq!(rows[2][0], "200");
}

#[rstest]
#[tokio::test]
async fn non_numeric_counter_restarts_at_one(clock: Arc<FixedClock>) {
    let stale = vec!["100", "a", "A", "Old", "Mage", "Fire", "then", "n/a", ""]
        .into_iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    let sheet = Arc::new(InMemoryWorksheet::new(vec![header(), stale]));
    let registry = registry_over(&sheet, clock);

    let outcome = registry
        .upsert(&submission("100", GameClass::Mage, Specialization::Arcane))
        .await;

    assert_eq!(outcome, SaveOutcome::Updated { update_count: 1 });
}

#[rstest]
#[tokio::test]
async fn find_matches_identity_in_any_column(clock: Arc<FixedClock>) {
    let drifted = vec!["", "", "300", "Drift", "Rogue", "Outlaw", "", "4", ""]
        .into_iter()
        .map(str::to_owned)
        .collect();
    let sheet = Arc::new(InMemoryWorksheet::new(vec![header(), drifted]));
    let registry = registry_over(&sheet, clock);

    let found = registry
        .find(&MemberId::new("300").expect("id"))
        .await
        .expect("read succeeds")
        .expect("row located");

    assert_eq!(found.position, RowPosition::from_data_index(0));
    assert_eq!(found.class, "Rogue");
    assert_eq!(found.update_count, "4");
}

#[rstest]
#[tokio::test]
async fn find_reports_absence_as_none(clock: Arc<FixedClock>) {
    let sheet = Arc::new(InMemoryWorksheet::selections());
    let registry = registry_over(&sheet, clock);

    let found = registry
        .find(&MemberId::new("404").expect("id"))
        .await
        .expect("read succeeds");

    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
async fn in_place_failure_appends_fallback_row(clock: Arc<FixedClock>) {
    let mut sheet = MockWorksheet::new();
    let mut seq = Sequence::new();
    let existing = vec![header(), vec!["100".to_owned(); 9]];
    sheet
        .expect_read_values()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move || Ok(existing));
    sheet
        .expect_write_row()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_, _| Err(RowStoreError::transport("connection reset")));
    sheet
        .expect_append_rows()
        .withf(|rows| rows.len() == 1 && rows[0][7] == "1" && rows[0][8] == "Selection (fallback)")
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(()));
    let registry = SelectionRegistry::new(Arc::new(sheet), clock);

    let outcome = registry
        .upsert(&submission("100", GameClass::Druid, Specialization::Feral))
        .await;

    assert_eq!(outcome, SaveOutcome::Fallback);
    assert!(outcome.is_saved());
}

#[rstest]
#[tokio::test]
async fn double_failure_reports_failed(clock: Arc<FixedClock>) {
    let mut sheet = MockWorksheet::new();
    sheet
        .expect_read_values()
        .times(1)
        .returning(|| Err(RowStoreError::timeout("deadline exceeded")));
    sheet
        .expect_append_rows()
        .times(1)
        .returning(|_| Err(RowStoreError::timeout("deadline exceeded")));
    sheet.expect_write_row().never();
    let registry = SelectionRegistry::new(Arc::new(sheet), clock);

    let outcome = registry
        .upsert(&submission("100", GameClass::Druid, Specialization::Feral))
        .await;

    assert_eq!(outcome, SaveOutcome::Failed);
    assert!(!outcome.is_saved());
}

#[rstest]
#[tokio::test]
async fn delete_missing_identity_leaves_store_unchanged(clock: Arc<FixedClock>) {
    let sheet = Arc::new(InMemoryWorksheet::selections());
    let registry = registry_over(&sheet, clock);
    registry
        .upsert(&submission("100", GameClass::Monk, Specialization::Brewmaster))
        .await;
    let before = sheet.rows();

    let outcome = registry.delete(&MemberId::new("999").expect("id")).await;

    assert_eq!(outcome, DeleteOutcome::NotFound);
    assert_eq!(sheet.rows(), before);
}

#[rstest]
#[tokio::test]
async fn delete_removes_exactly_one_row(clock: Arc<FixedClock>) {
    let sheet = Arc::new(InMemoryWorksheet::selections());
    let registry = registry_over(&sheet, clock);
    for (id, spec) in [("100", Specialization::Arms), ("200", Specialization::Fury)] {
        registry.upsert(&submission(id, GameClass::Warrior, spec)).await;
    }
    let target = MemberId::new("100").expect("id");

    let outcome = registry.delete(&target).await;

    let (position, selection) = match outcome {
        DeleteOutcome::Deleted {
            position,
            selection,
        } => (position, selection),
        other => panic!("expected a deletion, got {other:?}"),
    };
    assert_eq!(position.get(), 2);
    assert_eq!(selection.spec, "Arms");
    assert_eq!(sheet.rows().len(), 2);
    assert!(registry.find(&target).await.expect("read").is_none());
}

#[rstest]
#[tokio::test]
async fn delete_only_removes_first_duplicate(clock: Arc<FixedClock>) {
    let duplicate = |spec: &str| {
        vec!["100", "u", "U", "C", "Hunter", spec, "", "1", ""]
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };
    let sheet = Arc::new(InMemoryWorksheet::new(vec![
        header(),
        duplicate("Survival"),
        duplicate("Marksmanship"),
    ]));
    let registry = registry_over(&sheet, clock);
    let target = MemberId::new("100").expect("id");

    registry.delete(&target).await;

    let survivor = registry
        .find(&target)
        .await
        .expect("read")
        .expect("second row remains");
    assert_eq!(survivor.spec, "Marksmanship");
}

#[rstest]
#[tokio::test]
async fn delete_reports_store_failures(clock: Arc<FixedClock>) {
    let mut sheet = MockWorksheet::new();
    sheet
        .expect_read_values()
        .times(1)
        .return_once(|| Err(RowStoreError::unauthorized("token expired")));
    let registry = SelectionRegistry::new(Arc::new(sheet), clock);

    let outcome = registry.delete(&MemberId::new("100").expect("id")).await;

    assert_eq!(outcome, DeleteOutcome::Failed);
}

#[rstest]
#[tokio::test]
async fn concurrent_creates_for_different_members_both_persist(clock: Arc<FixedClock>) {
    let sheet = Arc::new(InMemoryWorksheet::selections().yielding());
    let registry = registry_over(&sheet, clock);
    let first = submission("100", GameClass::Mage, Specialization::Frost);
    let second = submission("200", GameClass::Rogue, Specialization::Subtlety);

    let (a, b) = tokio::join!(registry.upsert(&first), registry.upsert(&second));

    assert_eq!((a, b), (SaveOutcome::Created, SaveOutcome::Created));
    assert_eq!(sheet.rows().len(), 3);
    for id in ["100", "200"] {
        let found = registry
            .find(&MemberId::new(id).expect("id"))
            .await
            .expect("read succeeds");
        assert!(found.is_some(), "member {id} lost its row");
    }
}

#[rstest]
#[tokio::test]
async fn concurrent_delete_and_update_act_on_current_positions(clock: Arc<FixedClock>) {
    let sheet = Arc::new(InMemoryWorksheet::selections().yielding());
    let registry = registry_over(&sheet, clock);
    registry
        .upsert(&submission("100", GameClass::Warrior, Specialization::Arms))
        .await;
    registry
        .upsert(&submission("200", GameClass::Priest, Specialization::Holy))
        .await;
    let leaving = MemberId::new("100").expect("id");
    let reselection = submission("200", GameClass::Priest, Specialization::Discipline);

    let (deleted, updated) = tokio::join!(registry.delete(&leaving), registry.upsert(&reselection));

    assert!(matches!(deleted, DeleteOutcome::Deleted { .. }));
    assert_eq!(updated, SaveOutcome::Updated { update_count: 2 });
    let rows = sheet.rows();
    assert_eq!(rows.len(), 2, "no stale or duplicate rows remain");
    assert_eq!(rows[1][0], "200");
    assert_eq!(rows[1][5], "Discipline");
}
