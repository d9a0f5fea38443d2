//! Behaviour-driven tests for the dedup pass and catalog projection.
//!
//! Scenarios drive the public `bedrock_db` surface from stored identifier
//! strings through to the ordered catalog, using the rstest-bdd mutable
//! world pattern.

use bedrock_db::architecture::Architecture;
use bedrock_db::catalog::Catalog;
use bedrock_db::channel::Channel;
use bedrock_db::database::{Database, UpdateOutcome};
use bedrock_db::error::CatalogError;
use bedrock_db::record::ChannelBatch;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Default)]
struct CatalogWorld {
    database: Database,
    catalog: Option<Catalog>,
    error: Option<CatalogError>,
    outcome: Option<UpdateOutcome>,
}

#[fixture]
fn world() -> CatalogWorld {
    CatalogWorld::default()
}

fn channel_named(name: &str) -> Channel {
    Channel::ALL
        .into_iter()
        .find(|channel| channel.as_str() == name)
        .expect("known channel name")
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("the stored {channel} identifier \"{raw}\"")]
fn given_stored_identifier(world: &mut CatalogWorld, channel: String, raw: String) {
    world.database.append(channel_named(&channel), &[raw]);
}

#[when("the catalog is projected")]
fn when_catalog_projected(world: &mut CatalogWorld) {
    match Catalog::from_database(&world.database) {
        Ok(catalog) => world.catalog = Some(catalog),
        Err(err) => world.error = Some(err),
    }
}

#[when("the {channel} identifier \"{raw}\" arrives")]
fn when_identifier_arrives(world: &mut CatalogWorld, channel: String, raw: String) {
    let mut batch = ChannelBatch::default();
    match channel_named(&channel) {
        Channel::Release => batch.release.push(raw),
        Channel::Beta => batch.beta.push(raw),
        Channel::Preview => batch.preview.push(raw),
    }
    world.outcome = Some(world.database.update(&batch).expect("update succeeds"));
}

#[then("the catalog has {count} entries")]
fn then_catalog_has_entries(world: &mut CatalogWorld, count: String) {
    let catalog = world.catalog.as_ref().expect("catalog projected");
    let expected: usize = count.parse().expect("numeric count");
    assert_eq!(catalog.entries().len(), expected);
}

#[then("entry \"{name}\" of type \"{channel}\" lists \"{ids}\" for \"{arch}\"")]
fn then_entry_lists_ids(
    world: &mut CatalogWorld,
    name: String,
    channel: String,
    ids: String,
    arch: String,
) {
    let catalog = world.catalog.as_ref().expect("catalog projected");
    let channel = channel_named(&channel);
    let architecture = Architecture::from_moniker(&arch).expect("known architecture");
    let entry = catalog
        .entries()
        .iter()
        .find(|entry| entry.name == name && entry.channel == channel)
        .expect("entry present");
    let expected: Vec<String> = if ids == "none" {
        Vec::new()
    } else {
        ids.split(',').map(str::to_owned).collect()
    };
    assert_eq!(entry.guids.get(architecture), expected.as_slice());
}

#[then("the catalog order is \"{names}\"")]
fn then_catalog_order(world: &mut CatalogWorld, names: String) {
    let catalog = world.catalog.as_ref().expect("catalog projected");
    let actual: Vec<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
    let expected: Vec<&str> = names.split(',').collect();
    assert_eq!(actual, expected);
}

#[then("the projection fails with an invalid identifier")]
fn then_projection_fails(world: &mut CatalogWorld) {
    assert!(world.catalog.is_none(), "expected no catalog");
    assert!(matches!(
        world.error.as_ref().expect("projection error recorded"),
        CatalogError::InvalidIdentifier { .. }
    ));
}

#[then("the update reports a change with message \"{message}\"")]
fn then_update_changed(world: &mut CatalogWorld, message: String) {
    let outcome = world.outcome.as_ref().expect("update applied");
    assert!(outcome.did_update());
    assert_eq!(outcome.commit_message(), message);
}

#[then("the update reports no change")]
fn then_update_unchanged(world: &mut CatalogWorld) {
    let outcome = world.outcome.as_ref().expect("update applied");
    assert!(!outcome.did_update());
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/catalog.feature",
    name = "Two architectures of one release merge into one entry"
)]
fn scenario_merge_architectures(world: CatalogWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/catalog.feature",
    name = "Version names sort naturally"
)]
fn scenario_natural_sort(world: CatalogWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/catalog.feature",
    name = "Secondary files and the corrupt legacy build are excluded"
)]
fn scenario_exclusions(world: CatalogWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/catalog.feature",
    name = "Unknown vendor prefix fails the projection"
)]
fn scenario_unknown_prefix(world: CatalogWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/catalog.feature",
    name = "Re-applying the same update reports no change"
)]
fn scenario_idempotent_update(world: CatalogWorld) {
    let _ = world;
}
