//! Rank/degree type and the rank rules shared by the forest-based heaps.
//!
//! # Why u8?
//!
//! Rank and degree are bounded by `log_φ(n)` for every heap in this crate,
//! which stays below 100 even for 2⁶⁴ elements. `u8` covers that with room to
//! spare and keeps node structs small; [`checked_increment`] panics if the
//! bound is ever exceeded, which would indicate a bug.
//!
//! # Missing children
//!
//! Rank-pairing heaps treat a missing child as having rank −1. Instead of
//! storing signed ranks, the rules below take `Option<Rank>` with `None`
//! standing for the missing child.

/// Type alias for node rank/degree.
pub type Rank = u8;

/// Maximum valid rank value.
pub const MAX_RANK: Rank = u8::MAX;

/// Safely increment a rank value, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == MAX_RANK`. This cannot happen with valid heap
/// operations since ranks are logarithmic in the element count.
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1).expect(
        "rank overflow: ranks are logarithmic in the heap size and cannot reach u8::MAX",
    )
}

/// Rank of a half-tree root whose left child has rank `left`.
///
/// A root's rank is one more than its left child's, so a root without a left
/// child has rank 0.
#[inline]
pub fn root_rank(left: Option<Rank>) -> Rank {
    left.map_or(0, checked_increment)
}

/// Which rank rule a rank-pairing heap applies to non-root nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankRule {
    /// Type-1: `max(r1, r2)` if the children's ranks differ, `r1 + 1` if equal.
    /// Simpler, with larger constant factors.
    #[default]
    One,
    /// Type-2: `max(r1, r2) + 1` if the children's ranks differ by at most
    /// one, `max(r1, r2)` otherwise. Allows more rank slack.
    Two,
}

impl RankRule {
    /// Rank of a non-root node whose children have ranks `left` and `right`.
    pub fn apply(self, left: Option<Rank>, right: Option<Rank>) -> Rank {
        let r1 = signed(left);
        let r2 = signed(right);
        let rank = match self {
            RankRule::One => {
                if r1 == r2 {
                    r1 + 1
                } else {
                    r1.max(r2)
                }
            }
            RankRule::Two => {
                if (r1 - r2).abs() <= 1 {
                    r1.max(r2) + 1
                } else {
                    r1.max(r2)
                }
            }
        };
        // Both children missing is the only way to land on -1 + 1 = 0, and a
        // single missing child always yields at least the other child's rank.
        rank.max(0) as Rank
    }
}

#[inline]
fn signed(rank: Option<Rank>) -> i16 {
    rank.map_or(-1, i16::from)
}
