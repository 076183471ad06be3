// Plan a single load from a JSON snapshot and print the plan plus conflicts.
//
// Usage:
//   cargo run --bin plan_load -- <snapshot.json> [config.json]
//
// Environment overrides (DZ_*) are applied on top of the config file.

use anyhow::{bail, Context};
use dz_load_planner::api::plan_snapshot;
use dz_load_planner::config::{ConfigManager, EngineConfigReader};
use dz_load_planner::engine::{apply_to_load, AssignmentPlanner, ConflictDetector};
use dz_load_planner::logging;
use dz_load_planner::repository::PlanningSnapshot;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(snapshot_path) = args.next() else {
        bail!("usage: plan_load <snapshot.json> [config.json]");
    };

    let manager = match args.next() {
        Some(path) => ConfigManager::load_from_path(&path)
            .with_context(|| format!("failed to load config {}", path))?,
        None => ConfigManager::new(),
    }
    .with_env_overrides()
    .context("invalid DZ_* environment override")?;

    let raw = std::fs::read_to_string(&snapshot_path)
        .with_context(|| format!("failed to read snapshot {}", snapshot_path))?;
    let snapshot: PlanningSnapshot =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse snapshot {}", snapshot_path))?;

    let planner = AssignmentPlanner::from_reader(&manager);
    let plan = plan_snapshot(&planner, &snapshot)?;

    // Audit the target load as it would look with the plan applied.
    let mut loads = snapshot.loads.clone();
    let Some(target) = loads.iter_mut().find(|l| l.id == snapshot.target_load_id) else {
        bail!("target load {} not found in snapshot", snapshot.target_load_id);
    };
    apply_to_load(&plan.assignments, target);
    let planned = target.clone();

    let detector = ConflictDetector::new(manager.scheduling(), manager.conflicts());
    let conflicts = detector.detect(&planned, &loads, &snapshot.instructors);

    let output = json!({
        "load_id": snapshot.target_load_id,
        "plan": plan,
        "conflicts": conflicts,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
