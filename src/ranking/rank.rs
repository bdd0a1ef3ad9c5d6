// Aggregated similarity ranking.
//
// Every topic's combined text and every question's text are embedded once
// (two batched calls), then each question's cosine similarity against each
// topic is added into a running total keyed by heading string. Two blocks
// that produce the same heading string merge into one entry whose total is
// the sum of both blocks' contributions.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::error::Error;
use crate::preprocess::NormalizedBlock;

use super::embeddings::cosine_similarity;
use super::traits::TextEmbedder;

/// One aggregated ranking entry: a topic heading and the sum of its cosine
/// similarities against every question in the batch.
#[derive(Debug, Clone, Serialize)]
pub struct TopicScore {
    pub heading: String,
    pub score: f64,
}

/// The text a topic is embedded as: heading tokens then content tokens,
/// space-joined. The heading appears both here and as the aggregation key.
fn combined_text(block: &NormalizedBlock) -> String {
    format!("{} {}", block.heading.join(" "), block.content.join(" "))
}

/// Rank topics by aggregated similarity to the question set, descending.
///
/// Ties keep the first-seen order of their headings (stable sort over
/// insertion order). Empty blocks or empty questions yield an empty
/// ranking — there is nothing meaningful to score.
pub async fn rank_topics(
    blocks: &[NormalizedBlock],
    questions: &[Vec<String>],
    embedder: &dyn TextEmbedder,
) -> Result<Vec<TopicScore>, Error> {
    if blocks.is_empty() || questions.is_empty() {
        return Ok(Vec::new());
    }

    let topic_texts: Vec<String> = blocks.iter().map(combined_text).collect();
    let headings: Vec<String> = blocks.iter().map(|b| b.heading.join(" ")).collect();
    let question_texts: Vec<String> = questions.iter().map(|q| q.join(" ")).collect();

    // Two batched embedding calls — O(blocks + questions), never per pair.
    let topic_embeddings = embedder
        .embed_batch(&topic_texts)
        .await
        .map_err(Error::EmbeddingUnavailable)?;
    let question_embeddings = embedder
        .embed_batch(&question_texts)
        .await
        .map_err(Error::EmbeddingUnavailable)?;

    // Accumulator keyed by heading string, insertion order retained
    // separately for the tie-break.
    let mut first_seen: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();
    for heading in &headings {
        if !totals.contains_key(heading) {
            first_seen.push(heading.clone());
            totals.insert(heading.clone(), 0.0);
        }
    }

    for question in &question_embeddings {
        for (heading, topic) in headings.iter().zip(&topic_embeddings) {
            if let Some(total) = totals.get_mut(heading) {
                *total += cosine_similarity(question, topic);
            }
        }
    }

    let mut ranking: Vec<TopicScore> = first_seen
        .into_iter()
        .map(|heading| {
            let score = totals.get(&heading).copied().unwrap_or(0.0);
            TopicScore { heading, score }
        })
        .collect();

    // Stable: equal scores stay in first-seen heading order.
    ranking.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    debug!(
        topics = ranking.len(),
        questions = question_embeddings.len(),
        "ranked topics"
    );

    Ok(ranking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    /// Deterministic embedder for tests: maps each known text to a fixed
    /// vector, everything else to zero.
    struct FixtureEmbedder {
        vectors: Vec<(String, Vec<f64>)>,
    }

    #[async_trait]
    impl TextEmbedder for FixtureEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
            Ok(texts
                .iter()
                .map(|text| {
                    self.vectors
                        .iter()
                        .find(|(key, _)| key == text)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_else(|| vec![0.0, 0.0, 0.0])
                })
                .collect())
        }
    }

    fn block(heading: &[&str], content: &[&str]) -> NormalizedBlock {
        NormalizedBlock {
            heading: heading.iter().map(|s| s.to_string()).collect(),
            content: content.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn matching_topic_outranks_orthogonal_topic() {
        let blocks = vec![block(&["sorting"], &["quicksort"]), block(&["hashing"], &["bucket"])];
        let questions = vec![vec!["quicksort".to_string()]];

        let embedder = FixtureEmbedder {
            vectors: vec![
                ("sorting quicksort".to_string(), vec![1.0, 0.0, 0.0]),
                ("hashing bucket".to_string(), vec![0.0, 1.0, 0.0]),
                ("quicksort".to_string(), vec![1.0, 0.0, 0.0]),
            ],
        };

        let ranking = rank_topics(&blocks, &questions, &embedder).await.unwrap();
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].heading, "sorting");
        assert!((ranking[0].score - 1.0).abs() < 1e-10);
        assert_eq!(ranking[1].heading, "hashing");
        assert!(ranking[1].score.abs() < 1e-10);
    }

    #[tokio::test]
    async fn scores_aggregate_across_all_questions() {
        let blocks = vec![block(&["sorting"], &[])];
        let questions = vec![vec!["q1".to_string()], vec!["q2".to_string()]];

        // Topic identical to q1, orthogonal to q2: total should be 1.0.
        let embedder = FixtureEmbedder {
            vectors: vec![
                ("sorting ".to_string(), vec![1.0, 0.0, 0.0]),
                ("q1".to_string(), vec![1.0, 0.0, 0.0]),
                ("q2".to_string(), vec![0.0, 1.0, 0.0]),
            ],
        };

        let ranking = rank_topics(&blocks, &questions, &embedder).await.unwrap();
        assert_eq!(ranking.len(), 1);
        assert!((ranking[0].score - 1.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn duplicate_headings_merge_and_sum() {
        // Same heading from two documents, different content. Both blocks
        // are embedded; both contribute to the one shared entry.
        let blocks = vec![
            block(&["sorting"], &["quicksort"]),
            block(&["sorting"], &["heapsort"]),
        ];
        let questions = vec![vec!["sort".to_string()]];

        let embedder = FixtureEmbedder {
            vectors: vec![
                ("sorting quicksort".to_string(), vec![1.0, 0.0, 0.0]),
                ("sorting heapsort".to_string(), vec![0.0, 1.0, 0.0]),
                ("sort".to_string(), vec![1.0, 1.0, 0.0]),
            ],
        };

        let ranking = rank_topics(&blocks, &questions, &embedder).await.unwrap();
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].heading, "sorting");
        // cos with each block is 1/sqrt(2); the entry gets both.
        let expected = 2.0 / 2.0_f64.sqrt();
        assert!((ranking[0].score - expected).abs() < 1e-10);
    }

    #[tokio::test]
    async fn empty_blocks_or_questions_yield_empty_ranking() {
        let embedder = FixtureEmbedder { vectors: vec![] };

        let no_blocks = rank_topics(&[], &[vec!["q".to_string()]], &embedder)
            .await
            .unwrap();
        assert!(no_blocks.is_empty());

        let no_questions = rank_topics(&[block(&["a"], &[])], &[], &embedder)
            .await
            .unwrap();
        assert!(no_questions.is_empty());
    }

    #[tokio::test]
    async fn ties_keep_first_seen_order() {
        // Both topics are orthogonal to the question: scores are both 0.0
        // and the original heading order must survive the sort.
        let blocks = vec![block(&["zeta"], &[]), block(&["alpha"], &[])];
        let questions = vec![vec!["q".to_string()]];

        let embedder = FixtureEmbedder {
            vectors: vec![
                ("zeta ".to_string(), vec![1.0, 0.0, 0.0]),
                ("alpha ".to_string(), vec![0.0, 1.0, 0.0]),
                ("q".to_string(), vec![0.0, 0.0, 1.0]),
            ],
        };

        let ranking = rank_topics(&blocks, &questions, &embedder).await.unwrap();
        assert_eq!(ranking[0].heading, "zeta");
        assert_eq!(ranking[1].heading, "alpha");
    }

    #[test]
    fn combined_text_duplicates_heading_tokens() {
        let b = block(&["sorting", "algorithm"], &["quicksort"]);
        assert_eq!(combined_text(&b), "sorting algorithm quicksort");
    }

    #[test]
    fn combined_text_with_empty_content_keeps_separator() {
        let b = block(&["sorting"], &[]);
        assert_eq!(combined_text(&b), "sorting ");
    }
}
