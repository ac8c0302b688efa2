use anyhow::Result;
use futures::stream::LocalBoxStream;

use super::cache::FeatureCache;
use super::document::ScoreDocument;
use crate::input::RevId;

pub type ScoredRevision = (RevId, ScoreDocument);

/// Lazily parsed revision ids. Parse failures arrive as `Err` items.
pub type RevIds<'a> = Box<dyn Iterator<Item = Result<RevId>> + 'a>;

/// Scores in the same order as the ids they were requested for.
pub type ScoreStream<'a> = LocalBoxStream<'a, Result<ScoredRevision>>;

/// Anything that can turn revision ids into score documents.
///
/// Implementations must yield exactly one document per id, in input order.
/// An `Err` from `rev_ids` is forwarded into the stream once every id before
/// it has been scored, and ends the stream.
pub trait ScoreProcessor {
    fn score<'a>(&'a self, rev_ids: RevIds<'a>, cache: &'a FeatureCache) -> ScoreStream<'a>;
}

/// A run of consecutive ids, optionally cut short by an input error.
#[derive(Debug)]
pub struct Batch {
    pub rev_ids: Vec<RevId>,
    pub error: Option<anyhow::Error>,
}

/// Group `rev_ids` into batches of at most `size` ids, pulling lazily.
///
/// An input error closes the current batch; no batches follow it.
pub fn batches<'a>(rev_ids: RevIds<'a>, size: usize) -> impl Iterator<Item = Batch> + 'a {
    let size = size.max(1);
    let mut rev_ids = rev_ids;
    let mut done = false;

    std::iter::from_fn(move || {
        if done {
            return None;
        }

        let mut batch = Batch {
            rev_ids: Vec::with_capacity(size),
            error: None,
        };

        while batch.rev_ids.len() < size {
            match rev_ids.next() {
                Some(Ok(id)) => batch.rev_ids.push(id),
                Some(Err(e)) => {
                    batch.error = Some(e);
                    done = true;
                    break;
                }
                None => {
                    done = true;
                    break;
                }
            }
        }

        if batch.rev_ids.is_empty() && batch.error.is_none() {
            None
        } else {
            Some(batch)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn ids(values: &[u64]) -> RevIds<'static> {
        let ids: Vec<Result<RevId>> = values
            .iter()
            .map(|v| Ok(RevId::new(*v).unwrap()))
            .collect();
        Box::new(ids.into_iter())
    }

    fn raw(batch: &Batch) -> Vec<u64> {
        batch.rev_ids.iter().map(|id| id.get()).collect()
    }

    #[test]
    fn test_batches_split_by_size() {
        let all: Vec<Batch> = batches(ids(&[1, 2, 3, 4, 5]), 2).collect();
        assert_eq!(all.len(), 3);
        assert_eq!(raw(&all[0]), vec![1, 2]);
        assert_eq!(raw(&all[1]), vec![3, 4]);
        assert_eq!(raw(&all[2]), vec![5]);
        assert!(all.iter().all(|b| b.error.is_none()));
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        let all: Vec<Batch> = batches(ids(&[1, 2, 3, 4]), 2).collect();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_no_ids_no_batches() {
        assert_eq!(batches(ids(&[]), 10).count(), 0);
    }

    #[test]
    fn test_zero_size_treated_as_one() {
        assert_eq!(batches(ids(&[1, 2, 3]), 0).count(), 3);
    }

    #[test]
    fn test_error_closes_batch_and_stream() {
        let input: Vec<Result<RevId>> = vec![
            Ok(RevId::new(1).unwrap()),
            Err(anyhow!("bad id")),
            Ok(RevId::new(3).unwrap()),
        ];
        let all: Vec<Batch> = batches(Box::new(input.into_iter()), 10).collect();
        assert_eq!(all.len(), 1);
        assert_eq!(raw(&all[0]), vec![1]);
        assert_eq!(all[0].error.as_ref().unwrap().to_string(), "bad id");
    }

    #[test]
    fn test_leading_error_yields_empty_batch_with_error() {
        let input: Vec<Result<RevId>> = vec![Err(anyhow!("bad id"))];
        let all: Vec<Batch> = batches(Box::new(input.into_iter()), 10).collect();
        assert_eq!(all.len(), 1);
        assert!(all[0].rev_ids.is_empty());
        assert!(all[0].error.is_some());
    }
}
