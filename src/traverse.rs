//! Async combinators over sequences of resolved items
//!
//! Every combinator takes its sequence as something awaitable (a pending
//! resolution such as [`Resolver::items`](crate::Resolver::items), or a ready
//! future) and awaits it first.
//!
//! `reduce`, `filter` and `pipeline` run strictly in sequence: one item or
//! stage finishes before the next starts. `map`, `some` and `every` start
//! every item at once and wait for all of them; `some` and `every` never
//! stop early.

use futures_util::future::{BoxFuture, join_all};
use std::future::{Future, IntoFuture};

use crate::error::{ResolveError, Result};

/// One stage of a [`pipeline`]
pub type Stage<'a, T> = Box<dyn FnOnce(T) -> BoxFuture<'a, Result<T>> + Send + 'a>;

/// Apply `f` to every item concurrently, keeping input order
///
/// All items run to completion; the first error in input order is returned.
pub async fn map<D, S, F, Fut, U>(f: F, doc: D) -> Result<Vec<U>>
where
    D: IntoFuture<Output = Result<S>>,
    S: IntoIterator,
    F: FnMut(S::Item) -> Fut,
    Fut: Future<Output = Result<U>>,
{
    let items = doc.await?;
    join_all(items.into_iter().map(f))
        .await
        .into_iter()
        .collect()
}

/// Left fold, awaiting each step before starting the next
pub async fn reduce<D, S, F, Fut, A>(mut f: F, acc: A, doc: D) -> Result<A>
where
    D: IntoFuture<Output = Result<S>>,
    S: IntoIterator,
    F: FnMut(A, S::Item) -> Fut,
    Fut: Future<Output = Result<A>>,
{
    let mut acc = acc;
    for item in doc.await? {
        acc = f(acc, item).await?;
    }
    Ok(acc)
}

/// Keep the items whose predicate holds, evaluating predicates one at a time
///
/// The predicate only borrows each item; kept items are moved into the
/// result.
pub async fn filter<D, S, F, Fut>(f: F, doc: D) -> Result<Vec<S::Item>>
where
    D: IntoFuture<Output = Result<S>>,
    S: IntoIterator,
    F: Fn(&S::Item) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let f = &f;
    reduce(
        move |mut kept: Vec<S::Item>, item: S::Item| async move {
            if f(&item).await? {
                kept.push(item);
            }
            Ok::<_, ResolveError>(kept)
        },
        Vec::new(),
        doc,
    )
    .await
}

/// True if any predicate holds; every predicate is evaluated
pub async fn some<D, S, F, Fut>(f: F, doc: D) -> Result<bool>
where
    D: IntoFuture<Output = Result<S>>,
    S: IntoIterator,
    F: FnMut(S::Item) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let results = map(f, doc).await?;
    Ok(results.into_iter().any(|matched| matched))
}

/// True if all predicates hold; every predicate is evaluated
pub async fn every<D, S, F, Fut>(f: F, doc: D) -> Result<bool>
where
    D: IntoFuture<Output = Result<S>>,
    S: IntoIterator,
    F: FnMut(S::Item) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let results = map(f, doc).await?;
    Ok(results.into_iter().all(|matched| matched))
}

/// Box a unary async function as a [`Stage`]
pub fn stage<'a, T, F, Fut>(f: F) -> Stage<'a, T>
where
    F: FnOnce(T) -> Fut + Send + 'a,
    Fut: Future<Output = Result<T>> + Send + 'a,
{
    Box::new(move |input: T| -> BoxFuture<'a, Result<T>> { Box::pin(f(input)) })
}

/// Feed `doc` through `stages` in order, awaiting each stage's output
pub async fn pipeline<'a, T, D>(stages: Vec<Stage<'a, T>>, doc: D) -> Result<T>
where
    D: IntoFuture<Output = Result<T>>,
{
    let mut acc = doc.await?;
    for stage in stages {
        acc = stage(acc).await?;
    }
    Ok(acc)
}
