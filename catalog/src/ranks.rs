//! The rank ladder.
//!
//! A small, immutable ladder of reputation tiers. Rank is a pure function
//! of the current karma total: no hysteresis, no history dependence.

use crate::types::{CatalogError, Rank};

/// Immutable ladder of ranks ordered ascending by karma threshold.
#[derive(Debug, Clone)]
pub struct RankLadder {
    /// Ranks sorted ascending by `min_karma`, floor at 0
    ranks: Vec<Rank>,
}

impl RankLadder {
    /// Build a ladder from rank definitions.
    ///
    /// The definitions must be sorted ascending, start at 0 karma, and use
    /// strictly increasing thresholds.
    pub fn new(ranks: Vec<Rank>) -> Result<Self, CatalogError> {
        let first = ranks.first().ok_or(CatalogError::EmptyLadder)?;
        if first.min_karma != 0 {
            return Err(CatalogError::MissingFloor(first.min_karma));
        }
        for pair in ranks.windows(2) {
            if pair[1].min_karma <= pair[0].min_karma {
                return Err(CatalogError::UnorderedLadder(
                    pair[0].min_karma,
                    pair[1].min_karma,
                ));
            }
        }
        Ok(Self { ranks })
    }

    /// The standard six-tier ladder.
    pub fn standard() -> Self {
        // Construction cannot fail: thresholds below are fixed and ordered.
        Self::new(vec![
            Rank::new("Newcomer", 0, &["Create posts", "Comment", "Join groups"]),
            Rank::new(
                "Active Member",
                100,
                &["Custom profile flair", "Create polls"],
            ),
            Rank::new("Contributor", 500, &["Create groups", "Pin own comments"]),
            Rank::new(
                "Veteran",
                1500,
                &["Moderate own groups", "Highlighted replies"],
            ),
            Rank::new("Expert", 5000, &["Beta features", "Expert badge on posts"]),
            Rank::new(
                "Legend",
                10000,
                &["Legend badge", "Name in community hall of fame"],
            ),
        ])
        .unwrap_or_else(|_| unreachable!("standard ladder is well-formed"))
    }

    /// Current rank for a karma total.
    ///
    /// Scans descending and returns the first rank whose threshold is met;
    /// total because the floor rank starts at 0.
    pub fn current_rank(&self, karma: i64) -> &Rank {
        self.ranks
            .iter()
            .rev()
            .find(|r| r.min_karma <= karma.max(0))
            .unwrap_or(&self.ranks[0])
    }

    /// Next attainable rank, or `None` at the top of the ladder.
    pub fn next_rank(&self, karma: i64) -> Option<&Rank> {
        self.ranks.iter().find(|r| r.min_karma > karma)
    }

    /// Fraction of progress from the current rank floor to the next
    /// threshold, or `None` at the top rank.
    pub fn progress_to_next(&self, karma: i64) -> Option<f32> {
        let current = self.current_rank(karma);
        let next = self.next_rank(karma)?;
        let span = (next.min_karma - current.min_karma) as f32;
        let gained = (karma.max(0) - current.min_karma) as f32;
        Some((gained / span).clamp(0.0, 1.0))
    }

    /// All ranks, ascending by threshold.
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }
}

impl Default for RankLadder {
    fn default() -> Self {
        Self::standard()
    }
}
