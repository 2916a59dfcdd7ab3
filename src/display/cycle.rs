//! Refresh-rate cycling policy.

use tracing::{debug, info};

use super::mode::{DisplayError, DisplayModes};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Fewer than two candidates; nothing was applied.
    Unchanged(u32),
    Switched { from: u32, to: u32 },
}

/// Picks the rate after `current` in the ascending `candidates`, wrapping at
/// the end. A `current` that is not a candidate counts as index -1, so the
/// smallest candidate comes next. With fewer than two candidates `current` is
/// returned unchanged.
pub fn next_refresh_rate(current: u32, candidates: &[u32]) -> u32 {
    if candidates.len() <= 1 {
        return current;
    }
    let next_index = match candidates.iter().position(|&r| r == current) {
        Some(index) => (index + 1) % candidates.len(),
        None => 0,
    };
    candidates[next_index]
}

/// The candidate set for cycling: the user's included rates that are
/// actually available, or every available rate when that leaves nothing.
pub fn candidate_rates(available: &[u32], included: &[u32]) -> Vec<u32> {
    let chosen: Vec<u32> = available
        .iter()
        .copied()
        .filter(|r| included.contains(r))
        .collect();
    if chosen.is_empty() {
        available.to_vec()
    } else {
        chosen
    }
}

/// Advances the display to the next candidate rate at the current
/// resolution.
pub fn cycle_refresh_rate<D>(display: &mut D, included: &[u32]) -> Result<CycleOutcome, DisplayError>
where
    D: DisplayModes + ?Sized,
{
    let current = display.current_mode()?;
    let available = display.available_refresh_rates(current.width, current.height);
    let candidates = candidate_rates(&available, included);

    let next = next_refresh_rate(current.refresh_rate, &candidates);
    if candidates.len() <= 1 {
        debug!(rate = current.refresh_rate, "nothing to cycle");
        return Ok(CycleOutcome::Unchanged(next));
    }

    display.apply(current.width, current.height, next)?;
    info!(from = current.refresh_rate, to = next, "refresh rate cycled");
    Ok(CycleOutcome::Switched {
        from: current.refresh_rate,
        to: next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDisplay;
    use proptest::prelude::*;

    #[test]
    fn advances_to_the_next_rate() {
        assert_eq!(next_refresh_rate(60, &[60, 75, 120, 144]), 75);
        assert_eq!(next_refresh_rate(144, &[60, 75, 120, 144]), 60);
    }

    #[test]
    fn single_or_empty_set_is_a_noop() {
        assert_eq!(next_refresh_rate(144, &[144]), 144);
        assert_eq!(next_refresh_rate(60, &[144]), 60);
        assert_eq!(next_refresh_rate(60, &[]), 60);
    }

    #[test]
    fn unknown_current_wraps_to_first() {
        assert_eq!(next_refresh_rate(100, &[60, 75, 120]), 60);
    }

    #[test]
    fn empty_selection_includes_everything() {
        assert_eq!(candidate_rates(&[60, 120, 144], &[]), vec![60, 120, 144]);
        assert_eq!(candidate_rates(&[60, 120, 144], &[144, 60]), vec![60, 144]);
        assert_eq!(candidate_rates(&[60, 120], &[75]), vec![60, 120]);
    }

    #[test]
    fn cycle_applies_at_current_resolution() {
        let mut display = FakeDisplay::new(
            (1920, 1080, 60),
            &[(1920, 1080, 60), (1920, 1080, 144), (1280, 720, 75)],
        );
        let outcome = cycle_refresh_rate(&mut display, &[]).unwrap();
        assert_eq!(outcome, CycleOutcome::Switched { from: 60, to: 144 });
        assert_eq!(display.applied(), vec![(1920, 1080, 144)]);
    }

    #[test]
    fn cycle_with_one_candidate_applies_nothing() {
        let mut display = FakeDisplay::new((1920, 1080, 60), &[(1920, 1080, 60), (1920, 1080, 144)]);
        let outcome = cycle_refresh_rate(&mut display, &[60]).unwrap();
        assert_eq!(outcome, CycleOutcome::Unchanged(60));
        assert!(display.applied().is_empty());
    }

    #[test]
    fn apply_failure_is_reported() {
        let mut display = FakeDisplay::new((1920, 1080, 60), &[(1920, 1080, 60), (1920, 1080, 144)]);
        display.reject_rate(144);
        assert!(matches!(
            cycle_refresh_rate(&mut display, &[]),
            Err(DisplayError::ModeRejected { rate: 144, .. })
        ));
        assert_eq!(display.current_mode().unwrap().refresh_rate, 60);
    }

    fn rate_set() -> impl Strategy<Value = Vec<u32>> {
        prop::collection::btree_set(1u32..500, 1..8).prop_map(|s| s.into_iter().collect())
    }

    proptest! {
        #[test]
        fn result_is_a_member_of_the_set(current in 1u32..500, rates in rate_set()) {
            let next = next_refresh_rate(current, &rates);
            if rates.len() == 1 {
                prop_assert_eq!(next, current);
            } else {
                prop_assert!(rates.contains(&next));
            }
        }

        #[test]
        fn result_follows_index_formula(current in 1u32..500, rates in rate_set()) {
            prop_assume!(rates.len() > 1);
            let index = rates.iter().position(|&r| r == current).map(|i| i as i64).unwrap_or(-1);
            let expected = rates[((index + 1) as usize) % rates.len()];
            prop_assert_eq!(next_refresh_rate(current, &rates), expected);
        }

        #[test]
        fn singleton_returns_current(current in 1u32..500, only in 1u32..500) {
            prop_assert_eq!(next_refresh_rate(current, &[only]), current);
        }
    }
}
