//! evac_town: a small evacuation morning for the emergency messaging model.
//!
//! Two residential zones north and south of a creek receive escalating
//! warnings between 09:30 and 12:00.  Residents leave for the oval once a
//! message reaches their personal trigger level.  One northern household
//! cannot get out, so its drives fail and the plan gives up after three tries.

mod scenario;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ees_behavior::{keys, Beliefs};
use ees_core::{AgentId, SimTime, TimestepUnit};
use ees_messaging::{
    BroadcastScheduler, MessagingConfig, OPT_GLOBAL_START, OPT_MESSAGE_FILE, OPT_ZONES_FILE,
    OPT_ZONE_ID_PROPERTY,
};
use ees_output::{CsvJournal, AGENT_EVENTS_FILE, BROADCASTS_FILE};
use ees_sim::{EvacSimBuilder, SimConfig, TeleportMobility};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:      &str    = "output/evac_town";
const DRIVE_SPEED_MPS: f64     = 12.0;
const START_SECS:      f64     = 9.0 * 3_600.0;  // 09:00
const END_SECS:        f64     = 14.0 * 3_600.0; // 14:00
const STEP_SECS:       f64     = 60.0;
const STRANDED:        AgentId = AgentId(2);

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== evac_town: emergency messaging demo ===");
    println!();

    // 1. Write the scenario's zone and message files.
    let out = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(out)?;
    let zones_path = out.join("zones.geojson");
    let messages_path = out.join("messages.json");
    std::fs::write(&zones_path, serde_json::to_string_pretty(&scenario::zones_geojson())?)?;
    std::fs::write(&messages_path, serde_json::to_string_pretty(&scenario::messages_json())?)?;

    // 2. Configure messaging from an option map, as a host simulator would.
    let mut opts = BTreeMap::new();
    opts.insert(OPT_MESSAGE_FILE.to_string(), messages_path.display().to_string());
    opts.insert(OPT_ZONES_FILE.to_string(), zones_path.display().to_string());
    opts.insert(OPT_ZONE_ID_PROPERTY.to_string(), scenario::ZONE_ID_PROPERTY.to_string());
    opts.insert(OPT_GLOBAL_START.to_string(), "09:00".to_string());
    let messaging = MessagingConfig::from_options(&opts)?;

    // 3. Build the sim.
    let config = SimConfig {
        unit:  TimestepUnit::Seconds,
        start: SimTime(START_SECS),
        end:   SimTime(END_SECS),
        step:  STEP_SECS,
    };
    let scheduler = BroadcastScheduler::new(messaging, config.unit);
    let agents = scenario::residents();
    let agent_count = agents.len();

    let mut sim = EvacSimBuilder::new(config, scheduler, TeleportMobility::new(DRIVE_SPEED_MPS, TimestepUnit::Seconds)?)
        .agents(agents)
        .build()?;
    sim.mobility.set_unreachable(STRANDED, true);
    info!(
        agents = agent_count,
        zones = sim.scheduler.zones().len(),
        messages = sim.scheduler.store().len(),
        "scenario loaded"
    );

    // 4. Run with a CSV journal.
    let mut journal = CsvJournal::create(out)?;
    let t0 = Instant::now();
    sim.run(&mut journal)?;
    let elapsed = t0.elapsed();

    if let Some(e) = journal.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  {OUTPUT_DIR}/{BROADCASTS_FILE}");
    println!("  {OUTPUT_DIR}/{AGENT_EVENTS_FILE}");
    println!();

    println!("{:<8} {:<18} {:<18} {:<8}", "Agent", "Trigger", "Last message", "Status");
    println!("{}", "-".repeat(60));
    for agent in sim.agents() {
        println!(
            "{:<8} {:<18} {:<18} {:<8}",
            agent.id.0,
            agent.trigger.as_str(),
            agent.beliefs.get(keys::LAST_MESSAGE).unwrap_or("-"),
            agent.status().unwrap_or("-"),
        );
    }

    Ok(())
}
