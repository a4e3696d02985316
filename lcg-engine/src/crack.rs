use std::{
    fmt,
    ops::Range,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use log::*;
use thiserror::Error;

use super::lcg::{Constants, Lcg, HIGH_BITS, LOW_BITS};

/// Largest bound whose outputs still fit in an `i32`.
pub const MAX_BOUND: u64 = 1 << 31;

const HIGH_END: u64 = 1 << HIGH_BITS;
const LOW_END: u64 = 1 << LOW_BITS;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoverError {
    #[error("Invalid bound ({0}), must be a positive power of 2 no larger than 2^31")]
    InvalidBound(u64),
    #[error("Need at least 2 samples, got {0}")]
    NotEnoughSamples(usize),
}

/// Shared stop signal. Every stage of a search checks it before producing
/// another item.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// State right after the first sample was generated.
    pub state: u64,
    pub high_bits: u32,
    pub low_bits: u32,
    pub predictions: Vec<i32>,
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({}<<{} + {})",
            self.state, self.high_bits, LOW_BITS, self.low_bits
        )
    }
}

/// A brute force search for every state that reproduces `samples`.
///
/// The first sample only depends on the top 31 bits of the state, so those
/// are narrowed down first. Each surviving prefix is then completed with all
/// 2^17 low bit patterns, and a candidate is confirmed once stepping it
/// reproduces every remaining sample.
///
/// Matches come out in ascending `(high_bits, low_bits)` order.
pub struct Search {
    constants: Constants,
    bound: u64,
    samples: Vec<i32>,
    high_range: Range<u32>,
    cancel: CancelToken,
}

impl Search {
    pub fn new(
        constants: Constants,
        bound: u64,
        samples: &[i32],
    ) -> Result<Search, RecoverError> {
        if !bound.is_power_of_two() || bound > MAX_BOUND {
            return Err(RecoverError::InvalidBound(bound));
        }
        if samples.len() < 2 {
            return Err(RecoverError::NotEnoughSamples(samples.len()));
        }

        Ok(Search {
            constants,
            bound,
            samples: samples.to_vec(),
            high_range: 0..HIGH_END as u32,
            cancel: CancelToken::new(),
        })
    }

    /// Restricts the outer phase to a shard of the high bits.
    pub fn high_range(mut self, range: Range<u32>) -> Self {
        let end = range.end.min(HIGH_END as u32);
        self.high_range = range.start.min(end)..end;
        self
    }

    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// High bit prefixes consistent with the first sample, ascending.
    pub fn high_candidates(&self) -> impl Iterator<Item = u32> + '_ {
        let range = survivors(self.samples[0], self.bound);
        let start = range.start.max(self.high_range.start as u64);
        let end = range.end.min(self.high_range.end as u64).max(start);
        debug!(
            "{} high bit candidates for first sample {} ({}..{})",
            end - start,
            self.samples[0],
            start,
            end
        );

        let cancel = self.cancel.clone();
        (start..end)
            .take_while(move |_| !cancel.is_cancelled())
            .map(|high| high as u32)
    }

    /// Confirmed matches, each with `prediction_count` further outputs.
    pub fn matches(&self, prediction_count: usize) -> impl Iterator<Item = Match> + '_ {
        self.high_candidates()
            .flat_map(move |high| self.complete(high, prediction_count))
    }

    fn complete(&self, high: u32, prediction_count: usize) -> impl Iterator<Item = Match> + '_ {
        trace!("Searching low bits under {}", high);

        let cancel = self.cancel.clone();
        let mut lcg = Lcg::new(self.constants, 0);
        (0..LOW_END as u32)
            .take_while(move |_| !cancel.is_cancelled())
            .filter_map(move |low| {
                let state = (high as u64) << LOW_BITS | low as u64;
                lcg.set_state(state);
                if !self.verify(&mut lcg) {
                    return None;
                }

                let found = Match {
                    state,
                    high_bits: high,
                    low_bits: low,
                    predictions: lcg.outputs(self.bound).take(prediction_count).collect(),
                };
                info!("Found state {}", found);
                Some(found)
            })
    }

    fn verify(&self, lcg: &mut Lcg) -> bool {
        let bound = self.bound;
        self.samples[1..]
            .iter()
            .all(|&expected| lcg.next_bounded(bound) == expected)
    }
}

/// Every high prefix whose bounded output is `sample`. The output grows
/// monotonically with the prefix, so these form a single run.
fn survivors(sample: i32, bound: u64) -> Range<u64> {
    if sample < 0 {
        return 0..0;
    }
    let sample = sample as u64;
    let start = ceil_div(sample << HIGH_BITS, bound).min(HIGH_END);
    let end = ceil_div((sample + 1) << HIGH_BITS, bound).min(HIGH_END);
    start..end
}

fn ceil_div(n: u64, d: u64) -> u64 {
    (n + d - 1) / d
}

/// Runs a full search and collects its matches. Unless `find_all` is set the
/// search is cancelled as soon as the first match is confirmed.
pub fn recover(
    constants: Constants,
    bound: u64,
    samples: &[i32],
    prediction_count: usize,
    find_all: bool,
) -> Result<Vec<Match>, RecoverError> {
    let cancel = CancelToken::new();
    let search = Search::new(constants, bound, samples)?.cancel_token(cancel.clone());

    let matches: Vec<_> = search
        .matches(prediction_count)
        .inspect(|_| {
            if !find_all {
                cancel.cancel();
            }
        })
        .collect();
    Ok(matches)
}
