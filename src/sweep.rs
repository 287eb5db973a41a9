//! Concurrent height sweeps
//!
//! Each height is an independent solve on a blocking worker, with at most
//! `max_parallel` running at once. Results come back in input order and a
//! failed height does not affect the others.

use crate::errors::{Result, TetrationError};
use crate::solver::{Tetration, Tetrator};
use indicatif::ProgressBar;
use rug::Complex;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// One height and what solving it produced
#[derive(Debug)]
pub struct SweepEntry {
    pub height: Complex,
    pub outcome: Result<Tetration>,
}

/// Semaphore-bounded batch solver
pub struct Sweeper {
    solver: Arc<Tetrator>,
    semaphore: Arc<Semaphore>,
    max_parallel: usize,
}

impl Sweeper {
    /// `max_parallel` of 0 means one worker per CPU
    pub fn new(solver: Tetrator, max_parallel: usize) -> Self {
        let max_parallel = if max_parallel == 0 {
            num_cpus::get()
        } else {
            max_parallel
        };
        Self {
            solver: Arc::new(solver),
            semaphore: Arc::new(Semaphore::new(max_parallel)),
            max_parallel,
        }
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// Solve T_base(h) for every height at `bits`
    pub async fn run(
        &self,
        base: &Complex,
        heights: Vec<Complex>,
        bits: u32,
        progress: Option<ProgressBar>,
    ) -> Vec<SweepEntry> {
        debug!(
            count = heights.len(),
            max_parallel = self.max_parallel,
            "starting sweep"
        );

        let mut pending = Vec::with_capacity(heights.len());
        for height in heights {
            let permit = match self.semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    pending.push((height, None, Some(e.to_string())));
                    continue;
                }
            };

            let solver = Arc::clone(&self.solver);
            let base = base.clone();
            let worker_height = height.clone();
            let progress = progress.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let outcome = solver.solve(&base, &worker_height, bits);
                if let Some(bar) = progress {
                    bar.inc(1);
                }
                outcome
            });
            pending.push((height, Some(handle), None));
        }

        let mut entries = Vec::with_capacity(pending.len());
        for (height, handle, failure) in pending {
            let outcome = match (handle, failure) {
                (Some(handle), _) => match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => Err(TetrationError::Generic(format!("sweep worker failed: {}", e))),
                },
                (None, reason) => Err(TetrationError::Generic(format!(
                    "sweep could not schedule height: {}",
                    reason.unwrap_or_default()
                ))),
            };
            entries.push(SweepEntry { height, outcome });
        }
        entries
    }
}

/// `steps + 1` evenly spaced heights from `from` to `to` inclusive
pub fn heights_between(from: &Complex, to: &Complex, steps: usize, bits: u32) -> Vec<Complex> {
    if steps == 0 {
        return vec![Complex::with_val(bits, from)];
    }
    let span = Complex::with_val(bits, to - from);
    (0..=steps)
        .map(|i| {
            let fraction = rug::Float::with_val(bits, i as u64) / steps as u64;
            Complex::with_val(bits, from + Complex::with_val(bits, &span * &fraction))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{is_close, parse_complex};
    use crate::solver::Method;

    #[test]
    fn test_heights_between_endpoints() {
        let from = parse_complex("0", 128).unwrap();
        let to = parse_complex("2+1i", 128).unwrap();
        let heights = heights_between(&from, &to, 4, 128);
        assert_eq!(heights.len(), 5);
        assert!(is_close(&heights[0], &from, 30));
        assert!(is_close(&heights[2], &parse_complex("1+0.5i", 128).unwrap(), 30));
        assert!(is_close(&heights[4], &to, 30));
    }

    #[test]
    fn test_heights_between_zero_steps() {
        let from = parse_complex("1.5", 64).unwrap();
        let heights = heights_between(&from, &parse_complex("3", 64).unwrap(), 0, 64);
        assert_eq!(heights, vec![from]);
    }

    #[test]
    fn test_zero_parallelism_uses_cpu_count() {
        let sweeper = Sweeper::new(Tetrator::default(), 0);
        assert_eq!(sweeper.max_parallel(), num_cpus::get());
    }

    #[tokio::test]
    async fn test_sweep_preserves_order() {
        let bits = 128;
        let sweeper = Sweeper::new(Tetrator::default(), 2);
        let base = parse_complex("0.5", bits).unwrap();
        let heights = heights_between(
            &parse_complex("0", bits).unwrap(),
            &parse_complex("2", bits).unwrap(),
            4,
            bits,
        );
        let entries = sweeper.run(&base, heights.clone(), bits, None).await;

        assert_eq!(entries.len(), 5);
        for (entry, height) in entries.iter().zip(&heights) {
            assert_eq!(&entry.height, height);
            assert!(entry.outcome.is_ok());
        }
        let first = entries[0].outcome.as_ref().unwrap();
        assert!(is_close(&first.value, &crate::numeric::one(bits), 12));
        let middle = entries[2].outcome.as_ref().unwrap();
        assert!(is_close(&middle.value, &base, 12));
    }

    #[tokio::test]
    async fn test_sweep_reports_failures_per_entry() {
        let bits = 128;
        let sweeper = Sweeper::new(Tetrator::default(), 4);
        let base = parse_complex("2", bits).unwrap();
        let heights = vec![
            parse_complex("1", bits).unwrap(),
            parse_complex("1.5", bits).unwrap(),
            parse_complex("2", bits).unwrap(),
        ];
        let entries = sweeper.run(&base, heights, bits, None).await;

        assert_eq!(
            entries[0].outcome.as_ref().unwrap().method,
            Method::IntegerTower
        );
        assert!(matches!(
            entries[1].outcome,
            Err(TetrationError::NonAttractingRegime)
        ));
        let four = entries[2].outcome.as_ref().unwrap();
        assert!(is_close(&four.value, &parse_complex("4", bits).unwrap(), 30));
    }

    #[tokio::test]
    async fn test_sweep_advances_progress_bar() {
        let bits = 64;
        let sweeper = Sweeper::new(Tetrator::default(), 2);
        let base = parse_complex("1", bits).unwrap();
        let heights = vec![crate::numeric::zero(bits); 3];
        let bar = ProgressBar::hidden();
        sweeper.run(&base, heights, bits, Some(bar.clone())).await;
        assert_eq!(bar.position(), 3);
    }
}
