//! End-to-end: transcript replay feeding the sentiment monitor

use convo_common::poll::{Deriver, StepOutcome};
use convo_producer::{replay, ReplayConfig};
use convo_sentiment::{LexiconScorer, SentimentMonitor};
use std::io::Write;

#[tokio::test]
async fn replayed_transcript_drives_sentiment_transitions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let stream = dir.path().join("output.txt");
    let artifact = dir.path().join("sentiment.txt");

    std::fs::write(&input, "00:00:00 Hello\n").unwrap();
    replay(&ReplayConfig {
        input: input.clone(),
        stream: stream.clone(),
        scale_factor: 0.0,
    })
    .await
    .unwrap();

    let mut monitor = SentimentMonitor::new(stream.clone(), artifact.clone(), LexiconScorer::new());

    // "Hello" is neutral: zero polarity labels as POSITIVE
    assert_eq!(monitor.step().await.unwrap(), StepOutcome::Updated);
    assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "POSITIVE");

    // Stream grows with a negative line (appended as the producer would)
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&stream)
        .unwrap();
    file.write_all(b"00:00:05 I am unhappy with fees\n").unwrap();

    assert_eq!(monitor.step().await.unwrap(), StepOutcome::Updated);
    assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "NEGATIVE");

    // No growth: nothing derived, artifact untouched
    assert_eq!(monitor.step().await.unwrap(), StepOutcome::Skipped);

    file.write_all(b"00:00:09 Great, thank you so much for the help!\n")
        .unwrap();
    assert_eq!(monitor.step().await.unwrap(), StepOutcome::Updated);
    assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "POSITIVE");
}
