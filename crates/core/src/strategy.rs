//! Ordered fallback chains.
//!
//! Tag counting and highlight extraction each try several independent
//! heuristics, most precise first. A strategy returns `None` when it found
//! nothing usable, which moves the chain on to the next one.

use tracing::debug;

/// A named heuristic over some input
pub struct Strategy<I, T> {
    pub name: &'static str,
    pub run: fn(&I) -> Option<T>,
}

impl<I, T> Strategy<I, T> {
    pub const fn new(name: &'static str, run: fn(&I) -> Option<T>) -> Self {
        Self { name, run }
    }
}

/// Run strategies in order and return the first result with its strategy name.
pub fn first_success<I, T>(strategies: &[Strategy<I, T>], input: &I) -> Option<(&'static str, T)> {
    for strategy in strategies {
        match (strategy.run)(input) {
            Some(value) => {
                debug!(strategy = strategy.name, "strategy succeeded");
                return Some((strategy.name, value));
            }
            None => debug!(strategy = strategy.name, "strategy found nothing"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &u32) -> Option<u32> {
        None
    }

    fn double_if_even(n: &u32) -> Option<u32> {
        (n % 2 == 0).then_some(n * 2)
    }

    fn identity(n: &u32) -> Option<u32> {
        Some(*n)
    }

    #[test]
    fn test_first_success_skips_failures() {
        let chain = [
            Strategy::new("never", never),
            Strategy::new("double", double_if_even),
            Strategy::new("identity", identity),
        ];

        assert_eq!(first_success(&chain, &4), Some(("double", 8)));
        assert_eq!(first_success(&chain, &3), Some(("identity", 3)));
    }

    #[test]
    fn test_first_success_all_fail() {
        let chain = [Strategy::new("never", never)];
        assert_eq!(first_success(&chain, &1), None);
    }
}
