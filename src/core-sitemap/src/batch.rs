//! Bounded concurrent processing that keeps input order.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;

/// Runs `processor` over `items` with at most `concurrency` futures in flight.
///
/// Each item may produce any number of results. Results come back in input order,
/// flattened. The first error wins and the remaining work is dropped.
pub async fn process_in_order<T, F, Fut, R, E>(items: Vec<T>, processor: F, concurrency: usize) -> Result<Vec<R>, E>
where
    F: Fn(T, usize) -> Fut,
    Fut: Future<Output = Result<Vec<R>, E>>,
{
    let batches: Vec<Vec<R>> = stream::iter(items.into_iter().enumerate())
        .map(|(index, item)| processor(item, index))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;
    Ok(batches.into_iter().flatten().collect())
}
