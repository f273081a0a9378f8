use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet, try_join};

use crate::{
    error::{RecapError, Result},
    ollama::Generate,
};

pub const DEFAULT_BATCH_SIZE: usize = 3;
pub const DEFAULT_WORKERS: usize = 3;

/// Backend output for one batch of chunks, tagged with the batch index it was
/// submitted as. Collection order is completion order, not submission order.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub batch: usize,
    pub text: String,
}

/// The two fixed-size digests derived from the merged summary.
#[derive(Debug, Clone)]
pub struct Digests {
    pub quick: String,
    pub extended: String,
}

fn batch_groups(chunks: &[String], batch_size: usize) -> Vec<Vec<String>> {
    chunks.chunks(batch_size).map(|g| g.to_vec()).collect()
}

fn batch_prompt(group: &[String]) -> String {
    format!(
        "For EACH transcript section below, extract ONLY unique, actionable insights. \
         Ignore filler, personal remarks, religious content, or thanks. \
         Do NOT narrate events or repeat ideas. \
         Each bullet must be under 12 words. \
         Exclude references to paid tiers, subscriptions, or pricing.\n\n{}",
        group.join("\n\n---\n\n")
    )
}

fn merge_prompt(summaries: &[BatchSummary]) -> String {
    let joined = summaries
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Here are partial insights from a video:\n\n{joined}\n\n---\n\n\
         TASK: Merge into concise, non-redundant bullet points. \
         Output ONLY a flat bullet list. \
         Remove duplicates, overlapping ideas, filler, irrelevant details, \
         and any mention of paid tiers or subscriptions. \
         Each bullet under 15 words."
    )
}

fn quick_prompt(merged: &str) -> String {
    format!(
        "From the following insights, select the 5 MOST IMPORTANT lessons. \
         Keep them concise, actionable, and non-redundant. \
         Each bullet under 15 words. \
         Do not repeat ideas. Exclude personal, religious, or subscription-related remarks. \
         Output ONLY a flat bullet list:\n\n{merged}"
    )
}

fn extended_prompt(merged: &str) -> String {
    format!(
        "From the following insights, produce EXACTLY 12 concise, actionable lessons. \
         Each bullet under 15 words. \
         Do not repeat ideas. Exclude personal, religious, or subscription-related remarks. \
         Output ONLY a flat bullet list:\n\n{merged}"
    )
}

/// Summarize chunks in consecutive groups of up to `batch_size`, running at
/// most `workers` backend calls at a time. `on_progress(done, total)` fires
/// after each batch completes. The first failed call aborts the remaining
/// batches and surfaces its error.
pub async fn summarize_batches(
    client: Arc<dyn Generate>,
    chunks: &[String],
    batch_size: usize,
    workers: usize,
    on_progress: impl Fn(usize, usize) + Send + Sync,
) -> Result<Vec<BatchSummary>> {
    assert!(batch_size > 0, "batch size must be positive");
    assert!(workers > 0, "worker count must be positive");

    let groups = batch_groups(chunks, batch_size);
    let total = groups.len();
    let pool = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();

    for (batch, group) in groups.into_iter().enumerate() {
        let client = client.clone();
        let pool = pool.clone();
        tasks.spawn(async move {
            let _permit = pool.acquire_owned().await.map_err(|e| RecapError::TaskFailed {
                reason: e.to_string(),
            })?;
            let text = client.generate(&batch_prompt(&group)).await?;
            Ok::<_, RecapError>(BatchSummary { batch, text })
        });
    }

    let mut summaries = Vec::with_capacity(total);
    let mut done = 0;
    while let Some(joined) = tasks.join_next().await {
        let summary = joined.map_err(|e| RecapError::TaskFailed {
            reason: e.to_string(),
        })??;
        done += 1;
        on_progress(done, total);
        summaries.push(summary);
    }
    Ok(summaries)
}

/// Collapse all batch summaries into one deduplicated bullet list.
pub async fn merge_summaries(client: &dyn Generate, summaries: &[BatchSummary]) -> Result<String> {
    client.generate(&merge_prompt(summaries)).await
}

/// Derive the quick (5 bullets) and extended (12 bullets) digests from the
/// merged summary. The counts are instructions to the backend, not validated
/// locally. The two calls run concurrently.
pub async fn finalize(client: &dyn Generate, merged: &str) -> Result<Digests> {
    let quick_prompt = quick_prompt(merged);
    let extended_prompt = extended_prompt(merged);
    let (quick, extended) = try_join!(
        client.generate(&quick_prompt),
        client.generate(&extended_prompt),
    )?;
    Ok(Digests { quick, extended })
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeSet,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use async_trait::async_trait;

    use super::*;

    fn chunks(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    /// Echoes a fixed reply after a per-call delay so completion order differs
    /// from submission order.
    struct MockClient {
        calls: AtomicUsize,
        delays_ms: Vec<u64>,
        fail_from_call: Option<usize>,
    }

    impl MockClient {
        fn new(delays_ms: Vec<u64>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delays_ms,
                fail_from_call: None,
            }
        }

        fn failing_from(call: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delays_ms: Vec::new(),
                fail_from_call: Some(call),
            }
        }
    }

    #[async_trait]
    impl Generate for MockClient {
        async fn generate(&self, prompt: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays_ms.get(call) {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
            }
            if self.fail_from_call.is_some_and(|n| call >= n) {
                return Err(RecapError::BackendError { status: 500 });
            }
            Ok(format!("- summary of: {}", prompt.lines().last().unwrap_or("")))
        }
    }

    #[test]
    fn test_batches_cover_every_chunk_once_in_order() {
        let input = chunks(&["a", "b", "c", "d", "e", "f", "g"]);
        let groups = batch_groups(&input, 3);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[2], vec!["g"]);
        let flattened: Vec<String> = groups.into_iter().flatten().collect();
        assert_eq!(flattened, input);
    }

    #[test]
    fn test_batch_prompt_separates_sections() {
        let prompt = batch_prompt(&chunks(&["one", "two"]));
        assert!(prompt.contains("one\n\n---\n\ntwo"));
        assert!(prompt.contains("under 12 words"));
    }

    #[tokio::test]
    async fn test_one_summary_per_batch_regardless_of_completion_order() {
        // First batch finishes last.
        let client = Arc::new(MockClient::new(vec![50, 5, 5]));
        let input = chunks(&["a", "b", "c", "d", "e", "f", "g"]);
        let summaries = summarize_batches(client, &input, 3, 3, |_, _| {})
            .await
            .unwrap();
        let batches: BTreeSet<usize> = summaries.iter().map(|s| s.batch).collect();
        assert_eq!(batches, BTreeSet::from([0, 1, 2]));
    }

    #[tokio::test]
    async fn test_progress_reaches_total() {
        let client = Arc::new(MockClient::new(vec![]));
        let input = chunks(&["a", "b", "c", "d"]);
        let seen = Mutex::new(Vec::new());
        summarize_batches(client, &input, 1, 2, |done, total| {
            seen.lock().unwrap().push((done, total));
        })
        .await
        .unwrap();
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen.last(), Some(&(4, 4)));
    }

    #[tokio::test]
    async fn test_single_failure_aborts_summarization() {
        let client = Arc::new(MockClient::failing_from(1));
        let input = chunks(&["a", "b", "c", "d", "e", "f"]);
        let result = summarize_batches(client, &input, 2, 3, |_, _| {}).await;
        assert!(matches!(
            result,
            Err(RecapError::BackendError { status: 500 })
        ));
    }

    #[tokio::test]
    async fn test_empty_chunks_make_no_backend_calls() {
        let client = Arc::new(MockClient::new(vec![]));
        let summaries = summarize_batches(client.clone(), &[], 3, 3, |_, _| {})
            .await
            .unwrap();
        assert!(summaries.is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_merge_embeds_all_batch_texts() {
        let client = MockClient::new(vec![]);
        let summaries = vec![
            BatchSummary {
                batch: 1,
                text: "- late batch".into(),
            },
            BatchSummary {
                batch: 0,
                text: "- early batch".into(),
            },
        ];
        let prompt = merge_prompt(&summaries);
        assert!(prompt.contains("- late batch\n- early batch"));
        let merged = merge_summaries(&client, &summaries).await.unwrap();
        assert!(merged.starts_with("- summary of:"));
    }

    #[tokio::test]
    async fn test_finalize_issues_two_calls() {
        let client = MockClient::new(vec![]);
        let digests = finalize(&client, "- merged insight").await.unwrap();
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
        assert!(!digests.quick.is_empty());
        assert!(!digests.extended.is_empty());
    }
}
