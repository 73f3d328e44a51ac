//! Chunked execution of independent writes
//!
//! Work is split into fixed-size chunks. Within a chunk, every item is
//! prepared (validated and encoded) concurrently on a scoped worker thread;
//! once the chunk joins, its prepared writes are handed to the writer in
//! input order. Chunks run strictly one after another, so at most
//! `chunk_size` workers exist at any time.
//!
//! The writer is called on the caller's thread, which is where the storage
//! transaction lives.

use serde::{Deserialize, Serialize};

/// Default number of items per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 5;

/// Configuration for [`ChunkedExecutor`]
///
/// # Example
///
/// ```
/// use locus_core::ExecutorConfig;
///
/// let config = ExecutorConfig::default();
/// assert_eq!(config.chunk_size(), 5);
///
/// // Zero is clamped to one item per chunk
/// assert_eq!(ExecutorConfig::with_chunk_size(0).chunk_size(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Items per chunk, and therefore the peak number of concurrent workers
    chunk_size: usize,
}

impl ExecutorConfig {
    /// Create a configuration with the given chunk size (at least 1)
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Items per chunk
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Applies a list of independent writes chunk by chunk
#[derive(Debug, Clone, Default)]
pub struct ChunkedExecutor {
    config: ExecutorConfig,
}

impl ChunkedExecutor {
    /// Create an executor
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Items per chunk
    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size()
    }

    /// Prepare and write every item, returning how many were written
    ///
    /// `prepare` is for CPU-bound per-row work such as validation and
    /// encoding; it never touches storage. `write` is the only step that
    /// does, and it runs serially.
    ///
    /// The first error from either `prepare` or `write` stops the run; items
    /// after it are neither prepared nor written. A panicking worker is
    /// re-raised on the calling thread.
    pub fn run<T, O, E, P, W>(&self, items: Vec<T>, prepare: P, mut write: W) -> Result<usize, E>
    where
        T: Send,
        O: Send,
        E: Send,
        P: Fn(T) -> Result<O, E> + Sync,
        W: FnMut(O) -> Result<(), E>,
    {
        let chunk_size = self.chunk_size();
        let mut written = 0;
        let mut items = items.into_iter();

        loop {
            let chunk: Vec<T> = items.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }

            for prepared in prepare_chunk(chunk, &prepare) {
                write(prepared?)?;
                written += 1;
            }
        }

        Ok(written)
    }
}

fn prepare_chunk<T, O, E, P>(chunk: Vec<T>, prepare: &P) -> Vec<Result<O, E>>
where
    T: Send,
    O: Send,
    E: Send,
    P: Fn(T) -> Result<O, E> + Sync,
{
    // A lone item gains nothing from a worker thread.
    if chunk.len() == 1 {
        return chunk.into_iter().map(prepare).collect();
    }

    std::thread::scope(|s| {
        let workers: Vec<_> = chunk
            .into_iter()
            .map(|item| s.spawn(move || prepare(item)))
            .collect();

        workers
            .into_iter()
            .map(|worker| {
                worker
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_writes_in_input_order() {
        let executor = ChunkedExecutor::default();
        let mut written = Vec::new();
        let count = executor
            .run(
                (0..12).collect(),
                |n: u32| Ok::<_, String>(n * 10),
                |v| {
                    written.push(v);
                    Ok(())
                },
            )
            .unwrap();
        assert_eq!(count, 12);
        assert_eq!(written, (0..12).map(|n| n * 10).collect::<Vec<_>>());
    }

    #[test]
    fn test_concurrency_bounded_by_chunk_size() {
        let executor = ChunkedExecutor::new(ExecutorConfig::with_chunk_size(3));
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        executor
            .run(
                (0..10).collect::<Vec<u32>>(),
                |n| {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(std::time::Duration::from_millis(5));
                    active.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, String>(n)
                },
                |_| Ok(()),
            )
            .unwrap();

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_prepare_failure_stops_later_chunks() {
        let executor = ChunkedExecutor::new(ExecutorConfig::with_chunk_size(2));
        let prepared = Mutex::new(Vec::new());
        let mut written = Vec::new();

        let err = executor
            .run(
                (0..6).collect::<Vec<u32>>(),
                |n| {
                    prepared.lock().unwrap().push(n);
                    if n == 3 {
                        Err(format!("bad item {}", n))
                    } else {
                        Ok(n)
                    }
                },
                |n| {
                    written.push(n);
                    Ok(())
                },
            )
            .unwrap_err();

        assert_eq!(err, "bad item 3");
        // Chunk [2, 3] fails; 2 is written before the error is reached, chunk [4, 5] never runs.
        assert_eq!(written, vec![0, 1, 2]);
        let mut prepared = prepared.into_inner().unwrap();
        prepared.sort();
        assert_eq!(prepared, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_write_failure_aborts() {
        let executor = ChunkedExecutor::default();
        let result = executor.run(
            vec![1, 2, 3],
            |n: u32| Ok::<_, String>(n),
            |n| if n == 2 { Err("write failed".to_string()) } else { Ok(()) },
        );
        assert_eq!(result.unwrap_err(), "write failed");
    }

    #[test]
    fn test_empty_input() {
        let executor = ChunkedExecutor::default();
        let count = executor
            .run(Vec::<u32>::new(), |n| Ok::<_, String>(n), |_| Ok(()))
            .unwrap();
        assert_eq!(count, 0);
    }
}
