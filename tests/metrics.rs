// tests/metrics.rs
#![cfg(feature = "strict-metrics")]
mod common;

use common::{comment, post, settings, state_paths, FakeApi};
use history_harvester::harvest::{HarvestState, Harvester};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::fs;

#[tokio::test]
async fn harvest_counters_are_exposed() {
    // Install a local recorder for the test
    let handle = PrometheusBuilder::new().install_recorder().expect("recorder");

    let dir = tempfile::tempdir().unwrap();
    let paths = state_paths(dir.path());
    fs::write(&paths.excluded_categories, "spam\n").unwrap();

    let api = FakeApi::new()
        .user("alice")
        .posts("alice", vec![Ok(post(20, "hungary")), Ok(post(10, "spam"))])
        .comments("alice", vec![Ok(comment(5, "hungary", "szia"))]);
    let mut state = HarvestState::open(&paths).unwrap();
    let harvester = Harvester::new(&api, settings(&dir.path().join("out")), None);
    harvester
        .run_batch(&["alice".to_string(), "ghost".to_string()], &mut state)
        .await;

    let out = handle.render();
    assert!(out.contains("harvest_items_kept_total"));
    assert!(out.contains("harvest_items_skipped_total"));
    assert!(out.contains("reason=\"excluded_category\""));
    assert!(out.contains("harvest_identities_total"));
    assert!(out.contains("outcome=\"completed\""));
    assert!(out.contains("outcome=\"skipped\""));
}
