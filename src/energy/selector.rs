//! Loudest-window selection over an energy profile

use super::sample::Energy;
use crate::error::ExtractError;

/// Start offset and energy of the loudest window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<E> {
    /// Window start offset (samples or frames)
    pub offset: usize,

    /// Energy of the window at `offset`
    pub peak: E,
}

/// Find the maximum of an energy profile
///
/// Ties resolve to the earliest offset.
///
/// # Errors
///
/// Returns `ExtractError::EmptyProfile` if `profile` is empty
pub fn find_peak<E: Energy>(profile: &[E]) -> Result<Selection<E>, ExtractError> {
    let (&first, rest) = profile.split_first().ok_or(ExtractError::EmptyProfile)?;

    let mut best = Selection {
        offset: 0,
        peak: first,
    };
    for (i, &energy) in rest.iter().enumerate() {
        if energy > best.peak {
            best = Selection {
                offset: i + 1,
                peak: energy,
            };
        }
    }

    Ok(best)
}

/// Select the loudest window, gated by a minimum volume
///
/// # Arguments
///
/// * `profile` - Energy profile from [`super::profile::compute_energy_profile`]
/// * `min_volume` - Minimum peak energy, in the same units as the profile
///
/// # Returns
///
/// `Some(selection)` when the peak is at least `min_volume`, `None` when it is
/// strictly below it. A quiet recording is a normal outcome, not an error.
///
/// # Errors
///
/// Returns `ExtractError::EmptyProfile` if `profile` is empty
///
/// # Example
///
/// ```
/// use loudest_section::energy::selector::select_loudest_window;
///
/// let profile = [25i64, 50, 75, 50, 25];
/// let selection = select_loudest_window(&profile, 50)?.expect("loud enough");
/// assert_eq!(selection.offset, 2);
/// assert_eq!(selection.peak, 75);
///
/// assert!(select_loudest_window(&profile, 100)?.is_none());
/// # Ok::<(), loudest_section::ExtractError>(())
/// ```
pub fn select_loudest_window<E: Energy>(
    profile: &[E],
    min_volume: E,
) -> Result<Option<Selection<E>>, ExtractError> {
    let best = find_peak(profile)?;

    if best.peak < min_volume {
        log::debug!(
            "Peak energy {:?} at offset {} below minimum {:?}",
            best.peak,
            best.offset,
            min_volume
        );
        return Ok(None);
    }

    Ok(Some(best))
}
