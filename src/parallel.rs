//! Fan-out helpers on the rayon pool.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::{debug, trace};

/// Applies `f` to every item on the rayon pool and folds the results with
/// `merge`. Results are merged in no particular order, so `merge` must be
/// associative and commutative. `None` if there are no items.
///
/// # Panics
///
/// A panic in `f` or `merge` is resumed on the calling thread.
pub fn map_merge<I, A, F, M>(items: I, f: F, merge: M) -> Option<A>
where
    I: IntoIterator,
    I::IntoIter: Send,
    I::Item: Send,
    A: Send,
    F: Fn(I::Item) -> A + Send + Sync,
    M: Fn(A, A) -> A + Send + Sync,
{
    debug!(workers = rayon::current_num_threads(), "map_merge");
    items.into_iter().par_bridge().map(f).reduce_with(merge)
}

/// Values emitted for one key, in the order each mapper produced them.
pub struct Values<V>(mpsc::IntoIter<V>);

impl<V> Iterator for Values<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.0.next()
    }
}

/// Reducer results, one per distinct key, in completion order. Dropping it
/// stops feeding the mappers.
///
/// A panic in a mapper or a reducer is resumed by [`Iterator::next`].
pub struct Reduced<K, R> {
    rx: Receiver<thread::Result<(K, R)>>,
    stop: Arc<AtomicBool>,
}

impl<K, R> Iterator for Reduced<K, R> {
    type Item = (K, R);

    fn next(&mut self) -> Option<(K, R)> {
        match self.rx.recv().ok()? {
            Ok(pair) => Some(pair),
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

impl<K, R> Drop for Reduced<K, R> {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// MapReduce: mappers run on the rayon pool, a shuffle stage routes each
/// pair to a dedicated reducer thread per distinct key.
///
/// `mapper` turns an item into key/value pairs. `reducer` receives a key and
/// all of its values once the mappers are done with that key.
pub fn map_reduce<I, K, V, R, P, Mf, Rf>(items: I, mapper: Mf, reducer: Rf) -> Reduced<K, R>
where
    I: IntoIterator + Send + 'static,
    I::IntoIter: Send,
    I::Item: Send + 'static,
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
    R: Send + 'static,
    P: IntoIterator<Item = (K, V)>,
    Mf: Fn(I::Item) -> P + Send + Sync + 'static,
    Rf: Fn(&K, Values<V>) -> R + Send + Sync + 'static,
{
    let n = rayon::current_num_threads();
    let stop = Arc::new(AtomicBool::new(false));
    let (pair_tx, pair_rx) = mpsc::sync_channel::<(K, V)>(2 * n);
    let (out_tx, out_rx) = mpsc::channel();
    debug!(workers = n, "map_reduce");

    let reducer = Arc::new(reducer);
    let shuffle_out = out_tx.clone();
    thread::spawn(move || shuffle(pair_rx, reducer, shuffle_out));

    let feed_stop = Arc::clone(&stop);
    thread::spawn(move || {
        let mapped = panic::catch_unwind(AssertUnwindSafe(|| {
            items
                .into_iter()
                .take_while(|_| !feed_stop.load(Ordering::Relaxed))
                .par_bridge()
                .for_each_with(pair_tx, |tx, item| {
                    for pair in mapper(item) {
                        if tx.send(pair).is_err() {
                            return;
                        }
                    }
                });
        }));
        if let Err(payload) = mapped {
            let _ = out_tx.send(Err(payload));
        }
    });

    Reduced { rx: out_rx, stop }
}

fn shuffle<K, V, R, Rf>(
    pairs: Receiver<(K, V)>,
    reducer: Arc<Rf>,
    out: Sender<thread::Result<(K, R)>>,
) where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
    R: Send + 'static,
    Rf: Fn(&K, Values<V>) -> R + Send + Sync + 'static,
{
    let mut inputs: FxHashMap<K, Sender<V>> = FxHashMap::default();
    for (k, v) in pairs {
        let tx = inputs.entry(k.clone()).or_insert_with(|| {
            trace!("new reducer");
            let (tx, rx) = mpsc::channel();
            let (reducer, out) = (Arc::clone(&reducer), out.clone());
            thread::spawn(move || {
                let reduced = panic::catch_unwind(AssertUnwindSafe(|| reducer(&k, Values(rx.into_iter()))));
                let _ = out.send(reduced.map(|r| (k, r)));
            });
            tx
        });
        // A reducer may stop reading before its input ends.
        let _ = tx.send(v);
    }
    debug!(keys = inputs.len(), "shuffle finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_sums() {
        let total = map_merge(1..=1000u64, |x| x * x, |a, b| a + b);
        assert_eq!(total, Some(333_833_500));
        assert_eq!(map_merge(Vec::<u64>::new(), |x| x, |a, b| a + b), None);
    }

    #[test]
    fn merge_borrows_from_the_caller() {
        let words = ["alpha", "be", "gamma"];
        let longest = map_merge(words.iter(), |w| w.len(), usize::max);
        assert_eq!(longest, Some(5));
    }

    #[test]
    #[should_panic(expected = "worker failed")]
    fn merge_resumes_a_worker_panic() {
        map_merge(0..100_000u64, |_| -> u64 { panic!("worker failed") }, |a, b| a + b);
    }

    #[test]
    fn word_count() {
        let text = vec!["a b a", "c a", "b"];
        let mut counts: Vec<(String, usize)> = map_reduce(
            text,
            |line: &str| line.split(' ').map(|w| (w.to_owned(), 1usize)).collect::<Vec<_>>(),
            |_, values| values.sum::<usize>(),
        )
        .collect();
        counts.sort();
        assert_eq!(
            counts,
            vec![("a".to_owned(), 3), ("b".to_owned(), 2), ("c".to_owned(), 1)]
        );
    }

    #[test]
    fn reducer_sees_each_mappers_values_in_order() {
        let mut results: Vec<(u8, bool)> = map_reduce(
            0..200u32,
            |i| (0..10u32).map(move |j| ((i % 2) as u8, (i, j))).collect::<Vec<_>>(),
            |_, values| {
                let mut last: FxHashMap<u32, u32> = FxHashMap::default();
                let mut ordered = true;
                let mut count = 0;
                for (i, j) in values {
                    if let Some(prev) = last.insert(i, j) {
                        ordered &= prev + 1 == j;
                    }
                    count += 1;
                }
                ordered && count == 1000
            },
        )
        .collect();
        results.sort_unstable();
        assert_eq!(results, vec![(0, true), (1, true)]);
    }

    #[test]
    #[should_panic(expected = "bad item")]
    fn mapper_panic_reaches_the_consumer() {
        let results = map_reduce(
            0..100u64,
            |i| {
                if i == 7 {
                    panic!("bad item");
                }
                [(0u8, 1u64)]
            },
            |_, values| values.sum::<u64>(),
        );
        let _ = results.collect::<Vec<_>>();
    }

    #[test]
    #[should_panic(expected = "bad key")]
    fn reducer_panic_reaches_the_consumer() {
        let results = map_reduce(
            0..10u64,
            |i| [(i % 2, i)],
            |&k, values| {
                if k == 1 {
                    panic!("bad key");
                }
                values.count()
            },
        );
        let _ = results.collect::<Vec<_>>();
    }

    #[test]
    fn dropping_the_results_stops_an_endless_input() {
        let mut results = map_reduce(0..u64::MAX, |i| [(i % 3, i)], |_, values| values.take(5).count());
        let first = results.next();
        drop(results);
        let (key, seen) = first.unwrap();
        assert!(key < 3);
        assert_eq!(seen, 5);
    }
}
