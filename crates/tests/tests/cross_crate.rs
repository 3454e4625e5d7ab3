//! Cross-crate integration and E2E tests
//!
//! These tests drive the generator through the shell the way the CLI does:
//! text in, trace out, playback, rendering and export.

use std::time::Duration;

use peakscope_shell::{
    Command, DriverEvent, EXAMPLE_CASES, PlaybackDriver, PlaybackState, TraceRecord, TraceWriter,
    WriterConfig, parse_sequence, random_rotation, render_log, render_step, run_examples,
};
use peakscope_trace::{StepKind, generate};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// E2E Test: parsed text produces the expected peak for every example.
#[test]
fn test_e2e_examples_from_text() {
    for case in EXAMPLE_CASES {
        let text = case
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let values = parse_sequence(&text).unwrap();
        let trace = generate(&values);
        assert_eq!(
            trace.peak_index(),
            Some(case.expected_index),
            "case {}",
            case.name
        );
    }

    assert!(run_examples().iter().all(|r| r.passed));
}

/// E2E Test: random rotations always resolve to the maximum.
#[test]
fn test_e2e_random_rotations() {
    let mut rng = StdRng::seed_from_u64(42);
    for size in 1..=40 {
        let values = random_rotation(size, &mut rng);
        let trace = generate(&values);
        let peak = trace.peak_index().unwrap();
        assert_eq!(values[peak], size as i64 - 1, "input {values:?}");
    }
}

/// E2E Test: autoplay walks the whole trace, rendering each step.
///
/// 1. Text is parsed and a trace generated
/// 2. The driver plays it on a timer
/// 3. Every step is rendered once and the timer is released at the end
#[tokio::test(start_paused = true)]
async fn test_e2e_autoplay_renders_every_step() {
    let values = parse_sequence("1,2,3,4,5,6,7").unwrap();
    let trace = generate(&values);
    let total = trace.len();

    let mut driver = PlaybackDriver::new(trace, Duration::from_millis(800));
    let mut frames = vec![render_step(driver.player().trace(), 0)];
    driver
        .play_to_end(|p| frames.push(render_step(p.trace(), p.cursor())))
        .await;

    assert_eq!(frames.len(), total);
    assert!(frames[0].contains("Step 1 / 4"));
    assert!(frames[total - 1].contains("No rotation detected by loop"));
    assert!(frames[total - 1].contains("Peak found at index 6 with value 7"));
    assert!(!driver.is_ticking());
    assert_eq!(driver.player().state(), PlaybackState::Paused);
}

/// E2E Test: interactive commands interleaved with ticks.
#[tokio::test(start_paused = true)]
async fn test_e2e_interactive_session() {
    let trace = generate(&[8, 9, 0, 1, 2, 3, 4, 5, 6, 7]);
    let mut driver = PlaybackDriver::new(trace, Duration::from_millis(400));

    assert_eq!(
        driver.apply("play".parse::<Command>().unwrap()),
        DriverEvent::Updated
    );
    let tick = driver.next_tick().await.unwrap();
    assert_eq!(driver.on_tick(tick), DriverEvent::Updated);
    assert_eq!(driver.player().cursor(), 1);

    // Going back by hand stops the timer.
    driver.apply("p".parse::<Command>().unwrap());
    assert!(!driver.is_ticking());
    assert_eq!(driver.player().cursor(), 0);

    driver.apply("seek 2".parse::<Command>().unwrap());
    let log = render_log(driver.player().trace(), driver.player().cursor());
    assert!(log.contains("> Step 2 (found)"));

    driver.apply("r".parse::<Command>().unwrap());
    assert_eq!(driver.player().state(), PlaybackState::Idle);
    assert_eq!(driver.apply("q".parse::<Command>().unwrap()), DriverEvent::Quit);
}

/// E2E Test: exported records read back to the same traces.
#[test]
fn test_e2e_export_roundtrip() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join(".peakscope").join("traces.jsonl");
    let writer = TraceWriter::new(WriterConfig::new(&path)).unwrap();

    for case in EXAMPLE_CASES {
        let record = TraceRecord::new(format!("case:{}", case.name), generate(case.values));
        writer.write(&record).unwrap();
    }

    let records = TraceWriter::read_records(&path).unwrap();
    assert_eq!(records.len(), EXAMPLE_CASES.len());
    for (record, case) in records.iter().zip(EXAMPLE_CASES) {
        assert_eq!(record.input, case.values);
        assert_eq!(record.peak_index, Some(case.expected_index));
        assert_eq!(record.trace, generate(case.values));
    }

    let sorted = &records[2];
    assert!(sorted.used_fallback);
    assert_eq!(sorted.trace.last().unwrap().kind, StepKind::Fallback);

    // Raw JSON keeps the sentinel bounds of the fallback step.
    let line = std::fs::read_to_string(&path).unwrap();
    let third: serde_json::Value = serde_json::from_str(line.lines().nth(2).unwrap()).unwrap();
    let steps = third["trace"].as_array().unwrap();
    assert_eq!(steps.last().unwrap()["mid"], -1);
}

/// Traces can be generated concurrently on different inputs.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generation() {
    let handles: Vec<_> = (1..=16usize)
        .map(|n| {
            tokio::task::spawn_blocking(move || {
                let values: Vec<i64> = (0..n as i64).map(|i| (i + 3) % n as i64).collect();
                (values.clone(), generate(&values))
            })
        })
        .collect();

    for handle in handles {
        let (values, trace) = handle.await.unwrap();
        let peak = trace.peak_index().unwrap();
        assert_eq!(values[peak], *values.iter().max().unwrap());
    }
}
