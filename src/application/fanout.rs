//! Per-exchange fan-out
//!
//! Runs one call per exchange, concurrently or one at a time, and always returns
//! results in the order the exchanges were given. Completion order never leaks
//! into results.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::domain::ExchangeId;
use crate::ports::exchange::ExchangePort;

/// Result of one exchange call. `None` when the task panicked.
pub(crate) type FanoutResult<T> = (ExchangeId, Option<T>);

pub(crate) async fn for_each_exchange<T, F, Fut>(
    exchanges: &[Arc<dyn ExchangePort>],
    concurrent: bool,
    call: F,
) -> Vec<FanoutResult<T>>
where
    F: Fn(Arc<dyn ExchangePort>) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let ids: Vec<ExchangeId> = exchanges.iter().map(|e| e.id()).collect();
    let mut slots: Vec<Option<T>> = exchanges.iter().map(|_| None).collect();

    if concurrent {
        let mut tasks = JoinSet::new();
        for (index, exchange) in exchanges.iter().enumerate() {
            let fut = call(exchange.clone());
            tasks.spawn(async move { (index, fut.await) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, value)) => slots[index] = Some(value),
                Err(e) => tracing::debug!("Exchange task join error: {}", e),
            }
        }

        for (id, slot) in ids.iter().zip(&slots) {
            if slot.is_none() {
                tracing::error!("{}: exchange task failed", id);
            }
        }
    } else {
        for (index, exchange) in exchanges.iter().enumerate() {
            slots[index] = Some(call(exchange.clone()).await);
        }
    }

    ids.into_iter().zip(slots).collect()
}
