//! Behavioural tests for the selection registry and role summary over an
//! in-memory worksheet.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use roster::domain::ports::{DeleteOutcome, MemberSelections, RoleStatistics, SaveOutcome};
use roster::domain::{
    CharacterName, ClassSpec, GameClass, MemberId, MemberProfile, Role, RoleStatisticsService,
    SelectionRegistry, SelectionSubmission, Specialization,
};
use roster::test_support::{InMemoryWorksheet, MutableClock};
use rstest::{fixture, rstest};

struct World {
    selections: Arc<InMemoryWorksheet>,
    registry: SelectionRegistry<InMemoryWorksheet>,
    statistics: RoleStatisticsService<InMemoryWorksheet, InMemoryWorksheet>,
    clock: Arc<MutableClock>,
}

#[fixture]
fn world() -> World {
    let clock = Arc::new(MutableClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0)
            .single()
            .expect("valid instant"),
    ));
    let selections = Arc::new(InMemoryWorksheet::selections());
    let summary = Arc::new(InMemoryWorksheet::summary());
    World {
        registry: SelectionRegistry::new(selections.clone(), clock.clone()),
        statistics: RoleStatisticsService::new(selections.clone(), summary, clock.clone()),
        selections,
        clock,
    }
}

fn submission(id: &str, name: &str, class: GameClass, spec: Specialization) -> SelectionSubmission {
    SelectionSubmission::new(
        MemberProfile::new(
            MemberId::new(id).expect("member id"),
            format!("user{id}"),
            format!("User {id}"),
        ),
        CharacterName::new(name).expect("character name"),
        ClassSpec::new(class, spec).expect("class offers spec"),
    )
}

#[rstest]
#[tokio::test]
async fn reselection_overwrites_the_row_and_counts_updates(world: World) {
    let first = submission("111", "Jaina", GameClass::Mage, Specialization::Frost);
    let second = submission("111", "Jaina", GameClass::Mage, Specialization::Fire);

    assert_eq!(world.registry.upsert(&first).await, SaveOutcome::Created);
    world.clock.advance_seconds(60);
    assert_eq!(
        world.registry.upsert(&second).await,
        SaveOutcome::Updated { update_count: 2 }
    );

    let rows = world.selections.rows();
    assert_eq!(rows.len(), 2, "header plus a single member row");
    assert_eq!(rows[1][5], "Fire");
    assert_eq!(rows[1][7], "2");
    assert_eq!(rows[1][8], "Updated selection");

    let stored = world
        .registry
        .find(&MemberId::new("111").expect("member id"))
        .await
        .expect("lookup")
        .expect("selection present");
    assert_eq!(stored.spec, "Fire");
    assert_eq!(stored.update_count, "2");
}

#[rstest]
#[tokio::test]
async fn summary_tracks_selections_and_deletions(world: World) {
    for pick in [
        submission("1", "Anduin", GameClass::Priest, Specialization::Holy),
        submission("2", "Varian", GameClass::Warrior, Specialization::Protection),
        submission("3", "Thrall", GameClass::Shaman, Specialization::Elemental),
        submission("4", "Sylvanas", GameClass::Hunter, Specialization::Marksmanship),
    ] {
        assert!(world.registry.upsert(&pick).await.is_saved());
    }

    let table = world.statistics.refresh().await.expect("refresh");
    assert_eq!(table.total, 4);
    let ranged = table
        .rows
        .iter()
        .find(|row| row.role == Role::RangedDps)
        .expect("ranged row");
    assert_eq!(ranged.count, 2);
    assert_eq!(ranged.percentage, "50.0%");
    assert_eq!(ranged.most_popular_class, "Shaman");

    let outcome = world
        .registry
        .delete(&MemberId::new("3").expect("member id"))
        .await;
    assert!(matches!(outcome, DeleteOutcome::Deleted { .. }));
    world.statistics.refresh().await.expect("refresh");

    let snapshot = world.statistics.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.total, "3");
    let ranged = snapshot
        .entries
        .iter()
        .find(|entry| entry.role == Role::RangedDps)
        .expect("ranged entry");
    assert_eq!(ranged.count, "1");
    assert_eq!(ranged.popular_spec, "Hunter Marksmanship");
}

#[rstest]
#[tokio::test]
async fn deleting_an_unknown_member_leaves_the_store_untouched(world: World) {
    world
        .registry
        .upsert(&submission("1", "Tyrande", GameClass::Druid, Specialization::Balance))
        .await;
    let before = world.selections.rows();

    let outcome = world
        .registry
        .delete(&MemberId::new("999").expect("member id"))
        .await;

    assert_eq!(outcome, DeleteOutcome::NotFound);
    assert_eq!(world.selections.rows(), before);
}

#[rstest]
#[tokio::test]
async fn empty_store_snapshot_reports_no_data(world: World) {
    let snapshot = world.statistics.snapshot().await.expect("snapshot");
    assert!(snapshot.is_empty());

    let table = world.statistics.refresh().await.expect("refresh");
    assert_eq!(table.total, 0);
    let snapshot = world.statistics.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.total, "0");
    assert_eq!(snapshot.entries.len(), Role::NAMED.len());
}

#[tokio::test]
async fn simultaneous_members_and_refreshes_keep_one_row_each_and_one_table() {
    let clock = Arc::new(MutableClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0)
            .single()
            .expect("valid instant"),
    ));
    let selections = Arc::new(InMemoryWorksheet::selections().yielding());
    let summary = Arc::new(InMemoryWorksheet::summary().yielding());
    let registry = SelectionRegistry::new(selections.clone(), clock.clone());
    let statistics = RoleStatisticsService::new(selections.clone(), summary.clone(), clock);
    let tank = submission("1", "Bolvar", GameClass::DeathKnight, Specialization::Blood);
    let healer = submission("2", "Velen", GameClass::Priest, Specialization::Holy);
    let ranged = submission("3", "Rexxar", GameClass::Hunter, Specialization::BeastMastery);

    let saved = tokio::join!(
        registry.upsert(&tank),
        registry.upsert(&healer),
        registry.upsert(&ranged),
    );
    assert_eq!(
        saved,
        (SaveOutcome::Created, SaveOutcome::Created, SaveOutcome::Created)
    );
    assert_eq!(selections.rows().len(), 4);

    let (first, second) = tokio::join!(statistics.refresh(), statistics.refresh());
    first.expect("refresh");
    second.expect("refresh");

    assert_eq!(summary.rows().len(), 6, "header, four roles and total");
    let snapshot = statistics.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.total, "3");
    assert_eq!(snapshot.entries.len(), Role::NAMED.len());
}
