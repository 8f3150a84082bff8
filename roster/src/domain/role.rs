//! Coarse gameplay roles and the static classifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::vocabulary::{GameClass, Specialization};

/// Gameplay function bucket derived from a class and specialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Damage absorber.
    Tank,
    /// Restores health.
    Healer,
    /// Close-range damage.
    #[serde(rename = "Melee DPS")]
    MeleeDps,
    /// Long-range damage.
    #[serde(rename = "Ranged DPS")]
    RangedDps,
    /// Pair not present in any bucket.
    Unknown,
}

impl Role {
    /// Named roles in presentation order; excludes [`Role::Unknown`].
    pub const NAMED: [Self; 4] = [Self::Tank, Self::Healer, Self::MeleeDps, Self::RangedDps];

    /// Row-store label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tank => "Tank",
            Self::Healer => "Healer",
            Self::MeleeDps => "Melee DPS",
            Self::RangedDps => "Ranged DPS",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing a role label from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid role label")]
pub struct ParseRoleError;

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::NAMED
            .into_iter()
            .chain([Self::Unknown])
            .find(|role| role.label() == value)
            .ok_or(ParseRoleError)
    }
}

use GameClass as C;
use Specialization as S;

const TANKS: &[(GameClass, Specialization)] = &[
    (C::DeathKnight, S::Blood),
    (C::DemonHunter, S::Vengeance),
    (C::Druid, S::Guardian),
    (C::Monk, S::Brewmaster),
    (C::Paladin, S::Protection),
    (C::Warrior, S::Protection),
];

const HEALERS: &[(GameClass, Specialization)] = &[
    (C::Druid, S::Restoration),
    (C::Evoker, S::Preservation),
    (C::Monk, S::Mistweaver),
    (C::Paladin, S::Holy),
    (C::Priest, S::Holy),
    (C::Priest, S::Discipline),
    (C::Shaman, S::Restoration),
];

const MELEE: &[(GameClass, Specialization)] = &[
    (C::DeathKnight, S::Frost),
    (C::DeathKnight, S::Unholy),
    (C::DemonHunter, S::Havoc),
    (C::Druid, S::Feral),
    (C::Hunter, S::Survival),
    (C::Monk, S::Windwalker),
    (C::Paladin, S::Retribution),
    (C::Rogue, S::Outlaw),
    (C::Rogue, S::Subtlety),
    (C::Rogue, S::Assassination),
    (C::Shaman, S::Enhancement),
    (C::Warrior, S::Arms),
    (C::Warrior, S::Fury),
];

const RANGED: &[(GameClass, Specialization)] = &[
    (C::Druid, S::Balance),
    (C::Evoker, S::Devastation),
    (C::Evoker, S::Augmentation),
    (C::Hunter, S::BeastMastery),
    (C::Hunter, S::Marksmanship),
    (C::Mage, S::Fire),
    (C::Mage, S::Frost),
    (C::Mage, S::Arcane),
    (C::Priest, S::Shadow),
    (C::Shaman, S::Elemental),
    (C::Warlock, S::Affliction),
    (C::Warlock, S::Demonology),
    (C::Warlock, S::Destruction),
];

/// Role buckets in lookup order.
pub const ROLE_BUCKETS: [(Role, &[(GameClass, Specialization)]); 4] = [
    (Role::Tank, TANKS),
    (Role::Healer, HEALERS),
    (Role::MeleeDps, MELEE),
    (Role::RangedDps, RANGED),
];

/// Classify a class/specialisation pair.
///
/// Pairs outside every bucket fold into [`Role::Unknown`].
///
/// # Examples
/// ```
/// use roster::domain::{GameClass, Role, Specialization, classify};
///
/// assert_eq!(classify(GameClass::Priest, Specialization::Shadow), Role::RangedDps);
/// assert_eq!(classify(GameClass::Mage, Specialization::Holy), Role::Unknown);
/// ```
pub fn classify(class: GameClass, spec: Specialization) -> Role {
    ROLE_BUCKETS
        .iter()
        .find(|(_, pairs)| pairs.contains(&(class, spec)))
        .map_or(Role::Unknown, |(role, _)| *role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::ClassSpec;
    use rstest::rstest;

    #[test]
    fn buckets_partition_every_valid_pair() {
        for pair in ClassSpec::all() {
            let hits = ROLE_BUCKETS
                .iter()
                .filter(|(_, pairs)| pairs.contains(&(pair.class(), pair.spec())))
                .count();
            assert_eq!(hits, 1, "{pair} appears in {hits} buckets");
            assert_ne!(classify(pair.class(), pair.spec()), Role::Unknown);
        }
    }

    #[test]
    fn buckets_contain_only_valid_pairs() {
        let bucket_size: usize = ROLE_BUCKETS.iter().map(|(_, pairs)| pairs.len()).sum();
        assert_eq!(bucket_size, ClassSpec::all().count());
        for (_, pairs) in ROLE_BUCKETS {
            for &(class, spec) in pairs {
                assert!(class.offers(spec), "{class} does not offer {spec}");
            }
        }
    }

    #[rstest]
    #[case(GameClass::Paladin, Specialization::Protection, Role::Tank)]
    #[case(GameClass::Paladin, Specialization::Holy, Role::Healer)]
    #[case(GameClass::Priest, Specialization::Shadow, Role::RangedDps)]
    #[case(GameClass::Hunter, Specialization::Survival, Role::MeleeDps)]
    #[case(GameClass::Warrior, Specialization::Holy, Role::Unknown)]
    fn classifies_pairs(
        #[case] class: GameClass,
        #[case] spec: Specialization,
        #[case] expected: Role,
    ) {
        assert_eq!(classify(class, spec), expected);
    }

    #[test]
    fn role_labels_round_trip() {
        for role in Role::NAMED {
            assert_eq!(role.label().parse::<Role>(), Ok(role));
        }
        assert!("Support".parse::<Role>().is_err());
    }
}
