//! Frame splitting across budgets and character widths

use crate::helpers::*;
use deploybot::report::split_frames;
use deploybot::ReportSink;
use std::sync::Arc;

fn sample_texts() -> Vec<String> {
    vec![
        "x".to_string(),
        "a".repeat(2000),
        "a".repeat(2001),
        "line\n".repeat(997),
        "文字数カウンター".repeat(300),
        "🚀 deployed ".repeat(250),
    ]
}

#[test]
fn test_frames_cover_text_within_budget() {
    for text in sample_texts() {
        for budget in [1, 7, 100, 2000] {
            let frames = split_frames(&text, budget);
            let length = text.chars().count();

            assert_eq!(frames.len(), length.div_ceil(budget), "budget {}", budget);
            assert!(frames.iter().all(|f| f.chars().count() <= budget));
            assert!(frames.iter().all(|f| !f.is_empty()));
            assert_eq!(frames.concat(), text);
        }
    }
}

#[test]
fn test_only_last_frame_may_be_short() {
    let text = "é".repeat(4500);
    let frames = split_frames(&text, 2000);

    let lengths: Vec<usize> = frames.iter().map(|f| f.chars().count()).collect();
    assert_eq!(lengths, vec![2000, 2000, 500]);
}

#[tokio::test]
async fn test_sink_sends_one_message_per_frame() {
    let transport = Arc::new(RecordingTransport::new());
    let sink = ReportSink::new(transport.clone(), 2000);
    let text = "b".repeat(4001);

    let delivered = sink.deliver(&home(), &text).await;

    assert_eq!(delivered, 3);
    let sent = transport.messages_to(&home());
    assert_eq!(sent.concat(), text);
    assert_eq!(sent.last().unwrap(), "b");
}
