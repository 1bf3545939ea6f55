//! The closed feature set and its weight vector.
//!
//! Every candidate move is scored as a weighted sum over these features.
//! The schema is fixed and small, so weights live in a flat array indexed
//! by the [`Feature`] enum rather than a runtime map; the JSON shape is
//! still a name-to-value map for the self-describing weights file.
//!
//! Each feature carries a reference weight (the hand-tuned baseline the
//! trainer measures against) and a clamp interval that bounds every value
//! the genetic operators can produce. Bounded weights keep scores well
//! inside `i32` range, so scoring needs no overflow handling.

use std::{
    collections::BTreeMap,
    ops::{Index, IndexMut, RangeInclusive},
};

use serde::{Deserialize, Serialize};

/// A scoring feature of a candidate move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Destination is a foundation.
    ToFoundation,
    /// Foundation play of an Ace.
    PlaysAce,
    /// Foundation play of a Two.
    PlaysTwo,
    /// Attack on the opponent's reserve.
    AttackReserve,
    /// Attack on the opponent's waste.
    AttackWaste,
    /// Destination is one of the player's own tableau piles.
    ToOwnTableau,
    /// Destination is an opponent tableau pile.
    ToOpponentTableau,
    /// Source is the player's own reserve.
    FromReserve,
    /// The move removes the reserve's last card.
    EmptiesReserve,
    /// Source is the drawn slot (the card came off the waste).
    FromWaste,
    /// Source is any tableau pile.
    FromTableau,
    /// A lone tableau card moved to an empty tableau (negative).
    PointlessTableauShuffle,
    /// A lone tableau card moved onto a non-empty tableau, freeing a slot.
    CreatesUsefulEmpty,
    /// The last card of a tableau leaves for a foundation or an attack.
    CreatesEmptyTableau,
    /// A multi-card tableau move that exposes a card with no foundation or
    /// attack play (negative).
    TableauMoveNoBenefit,
    /// Per-step increase of the tallest own tableau pile.
    StackHeightBonus,
    /// Per-pile change in the number of occupied own tableau piles
    /// (negative weight; consolidation scores positively).
    SpreadPenalty,
}

impl Feature {
    pub const COUNT: usize = 17;

    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::ToFoundation,
        Feature::PlaysAce,
        Feature::PlaysTwo,
        Feature::AttackReserve,
        Feature::AttackWaste,
        Feature::ToOwnTableau,
        Feature::ToOpponentTableau,
        Feature::FromReserve,
        Feature::EmptiesReserve,
        Feature::FromWaste,
        Feature::FromTableau,
        Feature::PointlessTableauShuffle,
        Feature::CreatesUsefulEmpty,
        Feature::CreatesEmptyTableau,
        Feature::TableauMoveNoBenefit,
        Feature::StackHeightBonus,
        Feature::SpreadPenalty,
    ];

    /// Position in [`Feature::ALL`]; declaration order matches.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical name used in the weights file.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Feature::ToFoundation => "toFoundation",
            Feature::PlaysAce => "playsAce",
            Feature::PlaysTwo => "playsTwo",
            Feature::AttackReserve => "attackReserve",
            Feature::AttackWaste => "attackWaste",
            Feature::ToOwnTableau => "toOwnTableau",
            Feature::ToOpponentTableau => "toOpponentTableau",
            Feature::FromReserve => "fromReserve",
            Feature::EmptiesReserve => "emptiesReserve",
            Feature::FromWaste => "fromWaste",
            Feature::FromTableau => "fromTableau",
            Feature::PointlessTableauShuffle => "pointlessTableauShuffle",
            Feature::CreatesUsefulEmpty => "createsUsefulEmpty",
            Feature::CreatesEmptyTableau => "createsEmptyTableau",
            Feature::TableauMoveNoBenefit => "tableauMoveNoBenefit",
            Feature::StackHeightBonus => "stackHeightBonus",
            Feature::SpreadPenalty => "spreadPenalty",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Feature::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Hand-tuned baseline value every training run measures against.
    #[must_use]
    pub fn reference_weight(self) -> i32 {
        match self {
            Feature::ToFoundation => 100,
            Feature::PlaysAce => 40,
            Feature::PlaysTwo => 20,
            Feature::AttackReserve => 60,
            Feature::AttackWaste => 45,
            Feature::ToOwnTableau => 10,
            Feature::ToOpponentTableau => 5,
            Feature::FromReserve => 30,
            Feature::EmptiesReserve => 70,
            Feature::FromWaste => 15,
            Feature::FromTableau => 5,
            Feature::PointlessTableauShuffle => -40,
            Feature::CreatesUsefulEmpty => 18,
            Feature::CreatesEmptyTableau => 25,
            Feature::TableauMoveNoBenefit => -12,
            Feature::StackHeightBonus => 4,
            Feature::SpreadPenalty => -6,
        }
    }

    /// Interval every weight is clamped to by initialization and mutation.
    #[must_use]
    pub fn clamp_range(self) -> RangeInclusive<i32> {
        match self {
            Feature::ToFoundation => 50..=200,
            Feature::PlaysAce => 0..=100,
            Feature::PlaysTwo => 0..=80,
            Feature::AttackReserve => 0..=150,
            Feature::AttackWaste => 0..=120,
            Feature::ToOwnTableau => 0..=40,
            Feature::ToOpponentTableau => 0..=40,
            Feature::FromReserve => 0..=100,
            Feature::EmptiesReserve => 0..=150,
            Feature::FromWaste => 0..=60,
            Feature::FromTableau => 0..=30,
            Feature::PointlessTableauShuffle => -100..=0,
            Feature::CreatesUsefulEmpty => 0..=60,
            Feature::CreatesEmptyTableau => 0..=80,
            Feature::TableauMoveNoBenefit => -60..=0,
            Feature::StackHeightBonus => 0..=20,
            Feature::SpreadPenalty => -30..=0,
        }
    }

    /// Width of the clamp interval, used to scale mutation steps.
    #[must_use]
    pub fn range_width(self) -> i32 {
        let range = self.clamp_range();
        range.end() - range.start()
    }

    /// Clamps `value` to this feature's interval.
    #[must_use]
    pub fn clamp(self, value: i32) -> i32 {
        let range = self.clamp_range();
        value.clamp(*range.start(), *range.end())
    }
}

/// A complete weight vector, one value per [`Feature`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, i32>",
    into = "BTreeMap<String, i32>"
)]
pub struct Weights([i32; Feature::COUNT]);

impl Weights {
    /// The baseline vector holding every feature's reference weight.
    #[must_use]
    pub fn reference() -> Self {
        let mut weights = [0; Feature::COUNT];
        for feature in Feature::ALL {
            weights[feature.index()] = feature.reference_weight();
        }
        Self(weights)
    }

    #[must_use]
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Feature) -> i32,
    {
        let mut weights = [0; Feature::COUNT];
        for feature in Feature::ALL {
            weights[feature.index()] = f(feature);
        }
        Self(weights)
    }

    /// Features whose values differ from `other`, as a name-to-value map
    /// of this vector's side.
    #[must_use]
    pub fn diff(&self, other: &Weights) -> BTreeMap<String, i32> {
        Feature::ALL
            .into_iter()
            .filter(|&f| self[f] != other[f])
            .map(|f| (f.name().to_owned(), self[f]))
            .collect()
    }
}

impl Index<Feature> for Weights {
    type Output = i32;

    fn index(&self, feature: Feature) -> &i32 {
        &self.0[feature.index()]
    }
}

impl IndexMut<Feature> for Weights {
    fn index_mut(&mut self, feature: Feature) -> &mut i32 {
        &mut self.0[feature.index()]
    }
}

impl From<Weights> for BTreeMap<String, i32> {
    fn from(weights: Weights) -> Self {
        Feature::ALL
            .into_iter()
            .map(|f| (f.name().to_owned(), weights[f]))
            .collect()
    }
}

impl TryFrom<BTreeMap<String, i32>> for Weights {
    type Error = UnknownFeatureError;

    fn try_from(map: BTreeMap<String, i32>) -> Result<Self, Self::Error> {
        let mut weights = Weights::reference();
        for (name, value) in map {
            let feature = Feature::from_name(&name).ok_or(UnknownFeatureError { name })?;
            weights[feature] = value;
        }
        Ok(weights)
    }
}

/// A weights map mentioned a feature name outside the closed schema.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown feature name `{name}`")]
pub struct UnknownFeatureError {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_lists_every_feature_once() {
        assert_eq!(Feature::ALL.len(), Feature::COUNT);
        for (i, feature) in Feature::ALL.into_iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_names_are_unique_and_roundtrip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_name(feature.name()), Some(feature));
        }
    }

    #[test]
    fn test_reference_weights_are_within_clamp_ranges() {
        for feature in Feature::ALL {
            let reference = feature.reference_weight();
            assert_eq!(feature.clamp(reference), reference, "{feature:?}");
        }
    }

    #[test]
    fn test_penalty_features_have_nonpositive_ranges() {
        for feature in [
            Feature::PointlessTableauShuffle,
            Feature::TableauMoveNoBenefit,
            Feature::SpreadPenalty,
        ] {
            assert!(*feature.clamp_range().end() <= 0);
            assert!(feature.reference_weight() < 0);
        }
    }

    #[test]
    fn test_json_shape_is_a_named_map() {
        let weights = Weights::reference();
        let json = serde_json::to_value(&weights).unwrap();
        assert_eq!(json["toFoundation"], 100);
        assert_eq!(json["spreadPenalty"], -6);
        assert_eq!(json.as_object().unwrap().len(), Feature::COUNT);

        let back: Weights = serde_json::from_value(json).unwrap();
        assert_eq!(back, weights);
    }

    #[test]
    fn test_unknown_feature_name_is_rejected() {
        let json = r#"{"toFoundation": 100, "notAFeature": 1}"#;
        let result: Result<Weights, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_diff_reports_changed_features_only() {
        let reference = Weights::reference();
        let mut other = reference.clone();
        other[Feature::PlaysAce] = 55;
        other[Feature::SpreadPenalty] = -9;

        let diff = other.diff(&reference);
        assert_eq!(diff.len(), 2);
        assert_eq!(diff["playsAce"], 55);
        assert_eq!(diff["spreadPenalty"], -9);
        assert!(reference.diff(&reference).is_empty());
    }
}
