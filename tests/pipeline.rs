//! End-to-end pipeline tests over the mock provider.

use qaforge_core::format::OutputFormat;
use qaforge_core::pipeline::{DatasetGenerator, GeneratorConfig};
use qaforge_llm::any::AnyProvider;
use qaforge_llm::mock::MockProvider;

fn well_formed(n: usize) -> String {
    (1..=n)
        .map(|i| format!("CONVERSATION {i}:\nQUESTION: question {i}?\nANSWER: answer {i}.\n"))
        .collect()
}

fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}

#[tokio::test(start_paused = true)]
async fn document_to_jsonl_dataset() {
    let provider = AnyProvider::Mock(MockProvider::with_responses(vec![
        well_formed(2),
        well_formed(2),
    ]));
    let config = GeneratorConfig {
        words_per_chunk: 100,
        questions_per_chunk: 2,
        format: OutputFormat::Messages,
        ..GeneratorConfig::default()
    };

    let run = DatasetGenerator::new(provider, config).run(&words(150)).await;
    assert_eq!(run.chunks_total, 2);
    assert_eq!(run.chunks_succeeded, 2);
    assert_eq!(run.examples.len(), 4);

    // Every line is standalone JSON with the messages schema.
    for line in &run.examples {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        let messages = value["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[1]["role"], "assistant");
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.jsonl");
    std::fs::write(&path, run.examples.join("\n")).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), 4);
}

#[tokio::test(start_paused = true)]
async fn malformed_chunks_are_dropped_not_fatal() {
    let provider = AnyProvider::Mock(MockProvider::with_responses(vec![
        "no delimiters here at all".into(),
        well_formed(3),
    ]));
    let config = GeneratorConfig {
        words_per_chunk: 100,
        questions_per_chunk: 3,
        ..GeneratorConfig::default()
    };

    let run = DatasetGenerator::new(provider, config).run(&words(150)).await;
    assert_eq!(run.chunks_total, 2);
    // Both chunks got completions; only one yielded conversations.
    assert_eq!(run.chunks_succeeded, 2);
    assert_eq!(run.examples.len(), 3);
    // Yield counts examples against the 6 requested, not chunk completions.
    assert!((run.success_rate() - 0.5).abs() < f64::EPSILON);
    assert!((run.chunk_success_rate() - 1.0).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn provider_outage_produces_empty_report() {
    let provider = AnyProvider::Mock(MockProvider::failing());
    let config = GeneratorConfig {
        words_per_chunk: 50,
        questions_per_chunk: 5,
        ..GeneratorConfig::default()
    };

    let run = DatasetGenerator::new(provider, config).run(&words(120)).await;
    assert_eq!(run.chunks_total, 3);
    assert_eq!(run.chunks_succeeded, 0);
    assert!(run.examples.is_empty());
    assert!(run.success_rate() < f64::EPSILON);
    assert!(run.chunk_success_rate() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn two_exchange_conversations_serialize_to_alpaca() {
    let reply = "CONVERSATION 1:\n\
                 QUESTION: what is a cache?\n\
                 ANSWER: Fast storage.\n\
                 FOLLOW-UP: why fast?\n\
                 FOLLOW-UP ANSWER: Close to the CPU.\n";
    let provider = AnyProvider::Mock(MockProvider::with_responses(vec![reply.into()]));
    let config = GeneratorConfig {
        words_per_chunk: 100,
        questions_per_chunk: 1,
        num_exchanges: 2,
        format: OutputFormat::Alpaca,
        ..GeneratorConfig::default()
    };

    let run = DatasetGenerator::new(provider, config).run("some source text").await;
    assert_eq!(run.examples.len(), 1);
    let value: serde_json::Value = serde_json::from_str(&run.examples[0]).unwrap();
    assert_eq!(value["instruction"], "what is a cache?");
    assert_eq!(value["input"], "");
    assert_eq!(value["output"], "Fast storage.");
    assert_eq!(value["follow_up_instruction"], "why fast?");
    assert_eq!(value["follow_up_output"], "Close to the CPU.");
}
