mod common;

use common::{FakeModel, FakeSource, RecordingTransport, article, test_config};
use newsroom::errors::DigestError;
use newsroom::worker::{DigestPipeline, DigestSummarizer, PipelineOutcome};
use std::sync::Arc;

fn pipeline(
    source: FakeSource,
    reply: &str,
    transport: Arc<RecordingTransport>,
) -> DigestPipeline<FakeSource, FakeModel, Arc<RecordingTransport>> {
    let config = test_config();
    let summarizer = DigestSummarizer::from_config(FakeModel::replying(reply), &config);
    DigestPipeline::new(&config, source, summarizer, transport).unwrap()
}

#[tokio::test]
async fn test_unmatched_message_is_ignored() {
    let transport = Arc::new(RecordingTransport::default());
    let pipeline = pipeline(
        FakeSource::with(vec![article("AP", "Story", None)]),
        "unused",
        Arc::clone(&transport),
    );

    let outcome = pipeline.handle_mention("hello @NewsBot").await.unwrap();

    assert_eq!(outcome, PipelineOutcome::Ignored);
    assert!(transport.chunks().is_empty());
}

#[tokio::test]
async fn test_no_articles_is_fetch_failure() {
    let transport = Arc::new(RecordingTransport::default());
    let pipeline = pipeline(FakeSource::default(), "unused", Arc::clone(&transport));

    let result = pipeline.handle_mention("@NewsBot rust").await;

    match result {
        Err(DigestError::FetchFailure(topic)) => assert_eq!(topic, "rust"),
        other => panic!("Unexpected result: {other:?}"),
    }
    assert!(transport.chunks().is_empty());
}

#[tokio::test]
async fn test_mention_is_summarized_and_delivered() {
    let reply = "1. Key takeaway #1 policy: carbon tax passed | from AP.";
    let transport = Arc::new(RecordingTransport::default());
    let pipeline = pipeline(
        FakeSource::with(vec![article("AP", "Carbon tax", Some("https://example.com/tax"))]),
        reply,
        Arc::clone(&transport),
    );

    let outcome = pipeline
        .handle_mention("@NewsBot climate policy")
        .await
        .unwrap();

    match outcome {
        PipelineOutcome::Delivered { topic, report } => {
            assert_eq!(topic, "climate policy");
            assert_eq!(report.total, 1);
            assert!(report.is_complete());
        }
        PipelineOutcome::Ignored => panic!("Mention should not be ignored"),
    }
    assert_eq!(transport.chunks(), vec![reply.to_string()]);
    assert_eq!(transport.sent.lock().unwrap()[0].0, "@newsroom");
}
