//! Signed start/length intervals used to normalise drag gestures.

/// A one-dimensional interval that may have a negative length while a drag is
/// heading backwards. [`StartLength::normalised`] turns it into the canonical
/// non-negative form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartLength {
    pub start: isize,
    pub length: isize,
}

fn to_signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

impl StartLength {
    pub const fn new(start: isize, length: isize) -> Self {
        Self { start, length }
    }

    /// Build an exclusive interval covering `first..=last` inclusive cells.
    ///
    /// When `last < first` the start sits one past `first` and the length is
    /// negative, so the covered cells are still `last..=first`.
    pub fn create_exclusive_from_first_last(first: usize, last: usize) -> Self {
        let first = to_signed(first);
        let last = to_signed(last);
        if last >= first {
            Self {
                start: first,
                length: last - first + 1,
            }
        } else {
            Self {
                start: first + 1,
                length: last - first - 1,
            }
        }
    }

    /// Canonical form with a non-negative length covering the same cells.
    pub fn normalised(self) -> Self {
        if self.length < 0 {
            Self {
                start: self.start + self.length,
                length: -self.length,
            }
        } else {
            self
        }
    }

    /// True when the interval runs backwards.
    pub fn is_reversed(self) -> bool {
        self.length < 0
    }

    /// Normalised start and length as unsigned values, clamping anything
    /// before zero away.
    pub fn to_unsigned(self) -> (usize, usize) {
        let n = self.normalised();
        let start = n.start.max(0);
        let end = (n.start + n.length).max(0);
        let start_u = usize::try_from(start).unwrap_or(0);
        let end_u = usize::try_from(end).unwrap_or(0);
        (start_u, end_u.saturating_sub(start_u))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn forward_interval_is_inclusive() {
        let sl = StartLength::create_exclusive_from_first_last(2, 5);
        assert_eq!(sl, StartLength::new(2, 4));
        assert!(!sl.is_reversed());
    }

    #[test]
    fn backward_interval_is_exclusive_of_start() {
        let sl = StartLength::create_exclusive_from_first_last(5, 2);
        assert_eq!(sl, StartLength::new(6, -4));
        assert_eq!(sl.normalised(), StartLength::new(2, 4));
    }

    #[test]
    fn single_cell_interval() {
        let sl = StartLength::create_exclusive_from_first_last(3, 3);
        assert_eq!(sl.to_unsigned(), (3, 1));
    }

    #[test]
    fn backward_from_zero_clamps() {
        let sl = StartLength::new(0, -2);
        assert_eq!(sl.to_unsigned(), (0, 0));
    }
}
