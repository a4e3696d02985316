use std::iter;

pub const MASK: u64 = (1 << 48) - 1;

/// State bits that never reach a bounded output.
pub const LOW_BITS: u32 = 17;
/// State bits that feed a bounded output.
pub const HIGH_BITS: u32 = 48 - LOW_BITS;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Constants {
    pub multiplier: u64,
    pub addend: u64,
    pub mask: u64,
}

impl Constants {
    /// The constants of `java.util.Random` and its many clones.
    pub const JAVA: Constants = Constants::new(0x5DEECE66D, 0xB);

    pub const fn new(multiplier: u64, addend: u64) -> Constants {
        Constants {
            multiplier,
            addend,
            mask: MASK,
        }
    }

    pub fn step(&self, state: u64) -> u64 {
        // Wrapping in 64 bits is still exact modulo 2^48.
        state
            .wrapping_mul(self.multiplier)
            .wrapping_add(self.addend)
            & self.mask
    }

    /// Steps `state` and extracts a bounded output from the result.
    pub fn next_bounded(&self, state: u64, bound: u64) -> (u64, i32) {
        let state = self.step(state);
        (state, extract(state, bound))
    }
}

/// Bounded output for a state whose top bits are `high`.
pub fn extract_high(high: u64, bound: u64) -> i32 {
    (bound.wrapping_mul(high) >> HIGH_BITS) as i32
}

/// Bounded output of `state`. Only meaningful for power of two bounds.
pub fn extract(state: u64, bound: u64) -> i32 {
    extract_high(state >> LOW_BITS, bound)
}

#[derive(Debug, Clone)]
pub struct Lcg {
    constants: Constants,
    state: u64,
}

impl Lcg {
    pub fn new(constants: Constants, state: u64) -> Lcg {
        Lcg {
            state: state & constants.mask,
            constants,
        }
    }

    /// Seeds the way the runtime's public constructor does, xoring the seed
    /// with the multiplier first.
    pub fn scrambled(constants: Constants, seed: u64) -> Lcg {
        Lcg::new(constants, seed ^ constants.multiplier)
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn set_state(&mut self, state: u64) {
        self.state = state & self.constants.mask;
    }

    pub fn step(&mut self) -> u64 {
        self.state = self.constants.step(self.state);
        self.state
    }

    /// Steps, then extracts from the new state.
    pub fn next_bounded(&mut self, bound: u64) -> i32 {
        let (state, output) = self.constants.next_bounded(self.state, bound);
        self.state = state;
        output
    }

    pub fn outputs(&mut self, bound: u64) -> impl Iterator<Item = i32> + '_ {
        iter::repeat_with(move || self.next_bounded(bound))
    }

    pub fn discard(&mut self, num: usize) {
        (0..num).for_each(|_| {
            self.step();
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_step() {
        assert_eq!(Constants::JAVA.step(0), 0xB);
        assert_eq!(Constants::JAVA.step(12345), 29803012144720);
        assert_eq!(Constants::JAVA.step(MASK) & !MASK, 0);
    }

    #[test]
    fn test_next_bounded() {
        let (state, output) = Constants::JAVA.next_bounded(12345, 16);
        assert_eq!(state, 29803012144720);
        assert_eq!(output, 1);
    }

    #[test]
    fn test_new_masks() {
        let lcg = Lcg::new(Constants::JAVA, u64::max_value());
        assert_eq!(lcg.state(), MASK);
    }

    #[test]
    fn test_extract_full_width() {
        // With a bound of 2^31 the output is exactly the high bits
        let state = 227378937 << LOW_BITS | 114256;
        assert_eq!(extract(state, 1 << 31), 227378937);
        assert_eq!(extract(state, 1), 0);
    }

    #[test]
    fn test_outputs() {
        let mut lcg = Lcg::new(Constants::JAVA, 12345);
        let outputs: Vec<_> = lcg.outputs(16).take(8).collect();
        assert_eq!(outputs, vec![1, 12, 0, 10, 0, 15, 13, 3]);

        let mut lcg = Lcg::new(Constants::JAVA, 12345);
        let outputs: Vec<_> = lcg.outputs(1 << 30).take(3).collect();
        assert_eq!(outputs, vec![113689468, 857124832, 17243173]);
    }

    #[test]
    fn test_scrambled() {
        // new Random(42).nextInt() == -1170105035
        let mut lcg = Lcg::scrambled(Constants::JAVA, 42);
        lcg.step();
        assert_eq!((lcg.state() >> 16) as u32 as i32, -1170105035);

        let mut lcg = Lcg::scrambled(Constants::JAVA, 42);
        let outputs: Vec<_> = lcg.outputs(16).take(5).collect();
        assert_eq!(outputs, vec![11, 0, 10, 0, 4]);
    }

    #[test]
    fn test_discard() {
        let mut lcg = Lcg::new(Constants::JAVA, 12345);
        lcg.discard(5);
        assert_eq!(lcg.next_bounded(16), 15);
    }
}
