//! Unit tests for ees-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::{AgentEventRow, BroadcastRow, CsvWriter, OutputWriter, AGENT_EVENTS_FILE, BROADCASTS_FILE};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn broadcast_row() -> BroadcastRow {
        BroadcastRow {
            time:       34_200.0,
            minutes:    570.0,
            kind:       "ADVICE".into(),
            zones:      "Z1;Z2".into(),
            recipients: 12,
            content:    "Stay informed, monitor conditions".into(),
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join(BROADCASTS_FILE).exists());
        assert!(dir.path().join(AGENT_EVENTS_FILE).exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let broadcasts = std::fs::read_to_string(dir.path().join(BROADCASTS_FILE)).unwrap();
        assert_eq!(broadcasts.lines().next(), Some("time,minutes,type,zones,recipients,content"));
        let events = std::fs::read_to_string(dir.path().join(AGENT_EVENTS_FILE)).unwrap();
        assert_eq!(events.lines().next(), Some("time,agent_id,event,detail"));
    }

    #[test]
    fn csv_broadcast_row_quoted() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_broadcast(&broadcast_row()).unwrap();
        w.finish().unwrap();

        let text = std::fs::read_to_string(dir.path().join(BROADCASTS_FILE)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "34200,570,ADVICE,Z1;Z2,12,\"Stay informed, monitor conditions\"");
    }

    #[test]
    fn csv_agent_event_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_agent_event(&AgentEventRow {
            time:     36_000.0,
            agent_id: 4,
            event:    "notified",
            detail:   "EVACUATE_NOW:evacuating".into(),
        })
        .unwrap();
        w.finish().unwrap();

        let text = std::fs::read_to_string(dir.path().join(AGENT_EVENTS_FILE)).unwrap();
        assert_eq!(text.lines().nth(1), Some("36000,4,notified,EVACUATE_NOW:evacuating"));
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_missing_dir_is_an_error() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("no/such/dir")).is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use std::io::Cursor;

    use ees_core::{AgentId, Location, SimTime, TimestepUnit};
    use ees_messaging::{load_messages_reader, BroadcastScheduler, CollisionPolicy, ZoneRegistry};
    use ees_sim::{EvacAgent, EvacSimBuilder, SimConfig, SimObserver, TeleportMobility};

    use crate::{AgentEventRow, BroadcastRow, CsvJournal, JournalObserver, OutputError, OutputResult, OutputWriter, AGENT_EVENTS_FILE, BROADCASTS_FILE};

    const ZONES: &str = r#"{"type": "FeatureCollection", "features": [
      {"properties": {"SA1_MAIN11": "Z1"},
       "geometry": {"type": "Polygon", "coordinates": [[[144.0, -38.0], [145.0, -38.0], [145.0, -37.0], [144.0, -37.0]]]}}
    ]}"#;

    const MESSAGES: &str = r#"{"messages": [
      {"type": "EVACUATE_NOW", "content": "Leave now", "broadcastHHMM": "0010", "broadcastZones": {"Z1": null}}
    ]}"#;

    /// Writer whose every call fails.
    struct FailingWriter {
        calls: usize,
    }

    impl FailingWriter {
        fn fail(&mut self) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(std::io::Error::other(format!("write {} failed", self.calls))))
        }
    }

    impl OutputWriter for FailingWriter {
        fn write_broadcast(&mut self, _row: &BroadcastRow) -> OutputResult<()> {
            self.fail()
        }

        fn write_agent_event(&mut self, _row: &AgentEventRow) -> OutputResult<()> {
            self.fail()
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.fail()
        }
    }

    #[test]
    fn journal_of_a_short_evacuation() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let zones = ZoneRegistry::from_reader(Cursor::new(ZONES), None).unwrap();
        let store = load_messages_reader(Cursor::new(MESSAGES), &zones, CollisionPolicy::Overwrite).unwrap();
        let scheduler = BroadcastScheduler::with_store(zones, store, TimestepUnit::Seconds);

        let config = SimConfig { end: SimTime(3_600.0), ..SimConfig::default() };
        let agents = vec![EvacAgent::new(
            AgentId(0),
            Location::new("home", 144.5, -37.5),
            Location::new("shelter", 144.5, -37.49),
        )];
        let mut sim = EvacSimBuilder::new(config, scheduler, TeleportMobility::new(10.0, TimestepUnit::Seconds).unwrap())
            .agents(agents)
            .build()
            .unwrap();

        let mut journal = CsvJournal::create(dir.path()).unwrap();
        sim.run(&mut journal).unwrap();
        assert!(journal.take_error().is_none());

        let broadcasts = std::fs::read_to_string(dir.path().join(BROADCASTS_FILE)).unwrap();
        assert_eq!(broadcasts.lines().nth(1), Some("600,10,EVACUATE_NOW,Z1,1,Leave now"));

        // ~1112 m at 10 m/s: the drive started at 600 s lands on the 720 s tick.
        let events = std::fs::read_to_string(dir.path().join(AGENT_EVENTS_FILE)).unwrap();
        let lines: Vec<&str> = events.lines().skip(1).collect();
        assert_eq!(
            lines,
            vec![
                "600,0,notified,EVACUATE_NOW:evacuating",
                "720,0,goal_finished,arrived:EvacPlace;attempts=1",
            ]
        );
    }

    #[test]
    fn keeps_first_error_only() {
        let mut obs = JournalObserver::new(FailingWriter { calls: 0 });
        obs.on_sim_end(SimTime::ZERO);
        obs.on_sim_end(SimTime::ZERO);

        let err = obs.take_error().unwrap();
        assert_eq!(err.to_string(), "I/O error: write 1 failed");
        assert!(obs.take_error().is_none());
        assert_eq!(obs.into_writer().calls, 2);
    }
}
