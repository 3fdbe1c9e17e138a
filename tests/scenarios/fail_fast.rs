//! Fail-fast pipeline behavior across every failure position

use crate::helpers::*;
use deploybot::core::{CommandLine, Step};
use deploybot::{FailFastPipeline, ReportSink};
use std::sync::Arc;

fn steps(count: usize) -> Vec<Step> {
    (0..count)
        .map(|i| {
            Step::new(format!("step{}", i), CommandLine::new("run", [format!("{}", i)]))
                .with_preamble(format!("preamble {}", i))
        })
        .collect()
}

#[tokio::test]
async fn test_nothing_after_failing_step_runs_or_reports() {
    const COUNT: usize = 5;

    for failing in 0..COUNT {
        let mut runner = ScriptedRunner::new();
        for i in 0..COUNT {
            runner = runner.ok(&format!("run {}", i), &format!("output {}", i));
        }
        let runner = Arc::new(runner.fail(&format!("run {}", failing), "boom"));
        let transport = Arc::new(RecordingTransport::new());
        let pipeline = FailFastPipeline::new(runner.clone(), ReportSink::new(transport.clone(), 2000));

        let report = pipeline.run(&home(), &steps(COUNT)).await;

        let failure = report.failure.as_ref().expect("pipeline should fail");
        assert_eq!(failure.index, failing);
        assert_eq!(report.executed_steps, failing + 1);
        assert_eq!(report.skipped_steps(), COUNT - failing - 1);
        assert_eq!(runner.calls().len(), failing + 1);

        // Preamble and output for each executed step, nothing for skipped ones
        let sent = transport.messages_to(&home());
        assert_eq!(sent.len(), 2 * (failing + 1));
        assert_eq!(sent.last().unwrap(), "boom");
        for skipped in failing + 1..COUNT {
            assert!(!sent.contains(&format!("preamble {}", skipped)));
        }
    }
}

#[tokio::test]
async fn test_each_preamble_precedes_its_output() {
    let mut runner = ScriptedRunner::new();
    for i in 0..3 {
        runner = runner.ok(&format!("run {}", i), &format!("output {}", i));
    }
    let transport = Arc::new(RecordingTransport::new());
    let pipeline = FailFastPipeline::new(Arc::new(runner), ReportSink::new(transport.clone(), 2000));

    let report = pipeline.run(&home(), &steps(3)).await;

    assert!(report.succeeded());
    assert_eq!(
        transport.messages_to(&home()),
        vec![
            "preamble 0", "output 0", "preamble 1", "output 1", "preamble 2", "output 2",
        ]
    );
}

#[tokio::test]
async fn test_long_step_output_arrives_as_ordered_frames() {
    let output: String = "0123456789".repeat(5);
    let runner = ScriptedRunner::new().ok("run 0", &output);
    let transport = Arc::new(RecordingTransport::new());
    let pipeline = FailFastPipeline::new(Arc::new(runner), ReportSink::new(transport.clone(), 20));
    let step = Step::new("long", CommandLine::new("run", ["0"]));

    pipeline.run(&home(), &[step]).await;

    let frames = transport.messages_to(&home());
    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|f| f.chars().count() <= 20));
    assert_eq!(frames.concat(), output);
}
