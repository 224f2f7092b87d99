use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub u64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named rank unlocked once a customer holds at least `min_points`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyTier {
    pub name: String,
    pub min_points: u64,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl LoyaltyTier {
    pub fn new(name: impl Into<String>, min_points: u64) -> Self {
        Self {
            name: name.into(),
            min_points,
            benefits: Vec::new(),
        }
    }
}

/// The set of tiers ordered by threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoyaltyTiers(Vec<LoyaltyTier>);

impl LoyaltyTiers {
    pub fn new(mut tiers: Vec<LoyaltyTier>) -> Self {
        tiers.sort_by_key(|t| t.min_points);
        Self(tiers)
    }

    /// Returns the highest tier whose threshold is at or below `points`.
    pub fn highest_at_or_below(&self, points: u64) -> Option<&LoyaltyTier> {
        self.0.iter().rev().find(|t| t.min_points <= points)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoyaltyTier> {
        self.0.iter()
    }
}

/// A registered customer and their loyalty standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub points: u64,
    pub tier: Option<LoyaltyTier>,
}

impl Customer {
    pub fn new(id: CustomerId) -> Self {
        Self {
            id,
            points: 0,
            tier: None,
        }
    }

    /// Adds points and moves to `candidate` if it ranks above the current tier.
    ///
    /// Returns `true` when the tier changed. Tiers never go down here.
    pub fn accrue(&mut self, points: u64, candidate: Option<LoyaltyTier>) -> bool {
        self.points = self.points.saturating_add(points);

        let Some(candidate) = candidate else {
            return false;
        };
        let promote = match &self.tier {
            None => true,
            Some(current) => {
                current.name != candidate.name && candidate.min_points > current.min_points
            }
        };
        if promote {
            self.tier = Some(candidate);
        }
        promote
    }
}
