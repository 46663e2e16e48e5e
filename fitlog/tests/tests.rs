use fitcore::*;
use fitlog::*;

fn get_crate_root() -> Result<PathBuf, std::env::VarError> {
    Ok(PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?))
}

fn read_from_path(p: &str) -> Result<Vec<Process>, Box<dyn std::error::Error>> {
    let mut file_path = get_crate_root()?;
    file_path.push(p);
    let parser = TextParser::new(file_path);
    let processes = parser.read_processes()?;
    assert!(processes.len() > 0);

    Ok(init(processes)?)
}

/// Runs `p` to completion on a memory of 100 units and hands back
/// whatever the sink gathered.
fn run_file<S: TickSink>(p: &str, fit: Fit, sink: S) -> S {
    let set = read_from_path(p).unwrap();
    let timeline = Timeline::new(fit, 100, sink);
    let mut sim = Simulation::new(timeline, set.into_iter().collect::<Schedule>());
    let outcome = sim.run().unwrap();
    assert!(outcome.finished);
    let (timeline, _) = sim.into_parts();

    timeline.into_sink()
}

fn hole(start: ByteSteps, size: ByteSteps) -> Extent {
    Extent { start, size, occupant: None }
}

fn resident(start: ByteSteps, name: &str, size: ByteSteps) -> Extent {
    Extent {
        start,
        size,
        occupant: Some(Occupant { name: name.to_string(), remaining: 1 }),
    }
}

struct Broken;

impl Write for Broken {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

//---START TEXT LOG

#[test]
fn text_log_has_one_line_per_tick() {
    let log = run_file("tests/data/scenario.txt", Fit::Best, TextLog::new(vec![]));
    let text = String::from_utf8(log.into_inner()).unwrap();
    assert_eq!(text.lines().collect::<Vec<_>>(), vec![
        "1 [0 A 30] [30 B 50] [80 free 20]",
        "2 [0 A 30] [30 free 70]",
        "3 [0 C 80] [80 free 20]",
    ]);
}

#[test]
fn text_line_marks_holes() {
    let report = TickReport {
        time:       4,
        events:     vec![],
        layout:     vec![hole(0, 40), resident(40, "B", 40), hole(80, 20)],
        buffered:   1,
    };
    assert_eq!(text_line(&report), "4 [0 free 40] [40 B 40] [80 free 20]");
}

#[test]
fn failing_log_surfaces_from_the_tick() {
    let mut tl = Timeline::new(Fit::Best, 100, TextLog::new(Broken));
    let res = tl.advance_tick(vec![Process::new("A", 1, 10, 2)]);
    assert!(res.is_err());
    // The tick happened all the same.
    assert_eq!(tl.time(), 2);
    assert_eq!(tl.fragments()[0].occupant().map(|p| p.name.as_str()), Some("A"));
}

//---END TEXT LOG

//---START JSON LOG

#[test]
fn json_log_reads_back_into_the_same_reports() {
    let Tee(reports, log) = run_file(
        "tests/data/waiting.txt",
        Fit::Worst,
        Tee(Vec::<TickReport>::new(), JsonLog::new(vec![])),
    );
    let bytes = log.into_inner();
    let records = read_records(bytes.as_slice()).unwrap();
    assert_eq!(records.len(), reports.len());
    let replayed: Vec<TickReport> = records.into_iter()
        .map(TickReport::from)
        .collect();
    assert_eq!(replayed, reports);
}

#[test]
fn json_records_are_tagged() {
    let log = run_file("tests/data/scenario.txt", Fit::Best, JsonLog::new(vec![]));
    let text = String::from_utf8(log.into_inner()).unwrap();
    let first = text.lines().next().unwrap();
    assert!(first.contains(r#""kind":"placed""#));
    // Holes carry no process.
    assert!(first.contains(r#"{"start":80,"size":20}"#));
}

#[test]
fn garbage_is_not_a_log() {
    let res = read_records("{\"time\": 1}\nnot json\n".as_bytes());
    assert!(res.is_err());
    assert!(read_records("\n\n".as_bytes()).unwrap().is_empty());
}

//---END JSON LOG

//---START LEDGER

#[test]
fn ledger_follows_every_process() {
    let ledger = run_file("tests/data/scenario.txt", Fit::Best, Ledger::new());
    let names = ledger.processes.keys().map(|n| n.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["A", "B", "C"]);

    let a = ledger.get("A").unwrap();
    assert_eq!((a.first_seen, a.admitted, a.start, a.departed), (1, Some(1), Some(0), Some(2)));
    let b = ledger.get("B").unwrap();
    assert_eq!((b.admitted, b.start, b.departed), (Some(1), Some(30), Some(1)));
    let c = ledger.get("C").unwrap();
    assert_eq!((c.first_seen, c.admitted, c.departed), (2, Some(3), Some(3)));
    assert_eq!(c.times_buffered, 1);
    assert_eq!(c.waited(), Some(1));
    assert_eq!(ledger.longest_wait(), Some(("C", 1)));
    assert_eq!(ledger.ticks.len(), 3);
    // Ticks 1 and 3 both use 80.
    assert_eq!(ledger.peak_usage().map(|s| (s.time, s.used)), Some((1, 80)));
}

#[test]
fn ledger_knows_who_waited_and_who_was_dropped() {
    let ledger = run_file("tests/data/waiting.txt", Fit::Best, Ledger::new());
    let c = ledger.get("C").unwrap();
    // Holes of 40 and 20 until B leaves during tick 5.
    assert_eq!((c.first_seen, c.admitted, c.waited()), (2, Some(6), Some(4)));
    let huge = ledger.get("HUGE").unwrap();
    assert!(huge.dropped);
    assert!(!huge.is_waiting());
    assert_eq!(huge.waited(), None);
    assert_eq!(ledger.dropped().collect::<Vec<_>>(), vec!["HUGE"]);
    assert_eq!(ledger.still_waiting().count(), 0);

    let worst = ledger.worst_fragmentation().unwrap();
    assert_eq!((worst.time, worst.holes, worst.free, worst.largest_hole), (4, 2, 60, 40));
}

#[test]
fn ledger_replays_a_json_log() {
    let Tee(live, log) = run_file(
        "tests/data/waiting.txt",
        Fit::Best,
        Tee(Ledger::new(), JsonLog::new(vec![])),
    );
    let mut replayed = Ledger::new();
    for r in read_records(log.into_inner().as_slice()).unwrap() {
        replayed.record(&TickReport::from(r));
    }
    assert_eq!(replayed.processes, live.processes);
    assert_eq!(replayed.ticks, live.ticks);
}

#[test]
fn ledger_prints_a_summary() {
    let ledger = run_file("tests/data/waiting.txt", Fit::Best, Ledger::new());
    let table = ledger.to_string();
    assert!(table.lines().next().unwrap().starts_with("process"));
    assert!(table.contains("dropped"));
    assert!(table.contains("Longest wait:\t4 ticks (C)"));
    assert!(table.contains("Dropped:\tHUGE"));

    let summary = ledger.summary().to_string();
    assert!(summary.starts_with("Ticks:\t\t6"));
    assert!(!summary.contains("process"));
}

#[test]
fn unfinished_runs_leave_processes_waiting() {
    let set = read_from_path("tests/data/waiting.txt").unwrap();
    let timeline = Timeline::new(Fit::Best, 100, Ledger::new());
    let mut sim = Simulation::new(timeline, set.into_iter().collect::<Schedule>())
        .with_max_ticks(3);
    let outcome = sim.run().unwrap();
    assert!(!outcome.finished);
    let (timeline, _) = sim.into_parts();
    let ledger = timeline.into_sink();
    assert_eq!(ledger.still_waiting().collect::<Vec<_>>(), vec!["C"]);
}

//---END LEDGER

//---START FRAGMENTATION

#[test]
fn external_fragmentation() {
    let stats = FragStats::from_layout(7, &[hole(0, 20), resident(20, "A", 10), hole(30, 60)]);
    assert_eq!((stats.used, stats.free, stats.holes, stats.largest_hole), (10, 80, 2, 60));
    assert_eq!(stats.external(), 0.25);

    let single = FragStats::from_layout(1, &[resident(0, "A", 10), hole(10, 90)]);
    assert_eq!(single.external(), 0.0);
    let full = FragStats::from_layout(1, &[resident(0, "A", 100)]);
    assert_eq!((full.external(), full.occupancy()), (0.0, 1.0));
}

//---END FRAGMENTATION
