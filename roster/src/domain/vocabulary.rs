//! Closed class and specialisation vocabulary.
//!
//! Every class owns a fixed list of two to four specialisations. Several
//! specialisation names are shared between classes (`Frost`, `Holy`,
//! `Protection`, `Restoration`), so a specialisation is only meaningful when
//! paired with its class; [`ClassSpec`] carries that validated pairing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors raised when text does not belong to the closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VocabularyError {
    /// The text is not one of the known class names.
    #[error("unknown class: {value}")]
    UnknownClass {
        /// Rejected input.
        value: String,
    },
    /// The text is not one of the known specialisation names.
    #[error("unknown specialization: {value}")]
    UnknownSpecialization {
        /// Rejected input.
        value: String,
    },
    /// The specialisation exists but belongs to a different class.
    #[error("{spec} is not a {class} specialization")]
    MismatchedSpecialization {
        /// Selected class.
        class: GameClass,
        /// Selected specialisation.
        spec: Specialization,
    },
}

macro_rules! labelled_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $( $variant:ident => $label:literal ),* $(,)?
        }
        unknown => $unknown:ident
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = $label]
                #[serde(rename = $label)]
                $variant,
            )*
        }

        impl $name {
            /// Every member of the vocabulary in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Display label as stored in the row-store.
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = VocabularyError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.label() == value)
                    .ok_or_else(|| VocabularyError::$unknown {
                        value: value.to_owned(),
                    })
            }
        }
    };
}

labelled_enum! {
    /// Playable class.
    pub enum GameClass {
        DeathKnight => "Death Knight",
        DemonHunter => "Demon Hunter",
        Druid => "Druid",
        Evoker => "Evoker",
        Hunter => "Hunter",
        Mage => "Mage",
        Monk => "Monk",
        Paladin => "Paladin",
        Priest => "Priest",
        Rogue => "Rogue",
        Shaman => "Shaman",
        Warlock => "Warlock",
        Warrior => "Warrior",
    }
    unknown => UnknownClass
}

labelled_enum! {
    /// Specialisation name, independent of class.
    pub enum Specialization {
        Blood => "Blood",
        Frost => "Frost",
        Unholy => "Unholy",
        Vengeance => "Vengeance",
        Havoc => "Havoc",
        Guardian => "Guardian",
        Restoration => "Restoration",
        Balance => "Balance",
        Feral => "Feral",
        Devastation => "Devastation",
        Preservation => "Preservation",
        Augmentation => "Augmentation",
        BeastMastery => "Beast Mastery",
        Marksmanship => "Marksmanship",
        Survival => "Survival",
        Fire => "Fire",
        Arcane => "Arcane",
        Brewmaster => "Brewmaster",
        Windwalker => "Windwalker",
        Mistweaver => "Mistweaver",
        Holy => "Holy",
        Retribution => "Retribution",
        Protection => "Protection",
        Discipline => "Discipline",
        Shadow => "Shadow",
        Outlaw => "Outlaw",
        Subtlety => "Subtlety",
        Assassination => "Assassination",
        Elemental => "Elemental",
        Enhancement => "Enhancement",
        Affliction => "Affliction",
        Demonology => "Demonology",
        Destruction => "Destruction",
        Arms => "Arms",
        Fury => "Fury",
    }
    unknown => UnknownSpecialization
}

impl GameClass {
    /// Specialisations available to this class, in menu order.
    pub const fn specializations(self) -> &'static [Specialization] {
        use Specialization as S;
        match self {
            Self::DeathKnight => &[S::Blood, S::Frost, S::Unholy],
            Self::DemonHunter => &[S::Vengeance, S::Havoc],
            Self::Druid => &[S::Guardian, S::Restoration, S::Balance, S::Feral],
            Self::Evoker => &[S::Devastation, S::Preservation, S::Augmentation],
            Self::Hunter => &[S::BeastMastery, S::Marksmanship, S::Survival],
            Self::Mage => &[S::Fire, S::Frost, S::Arcane],
            Self::Monk => &[S::Brewmaster, S::Windwalker, S::Mistweaver],
            Self::Paladin => &[S::Holy, S::Retribution, S::Protection],
            Self::Priest => &[S::Holy, S::Discipline, S::Shadow],
            Self::Rogue => &[S::Outlaw, S::Subtlety, S::Assassination],
            Self::Shaman => &[S::Elemental, S::Enhancement, S::Restoration],
            Self::Warlock => &[S::Affliction, S::Demonology, S::Destruction],
            Self::Warrior => &[S::Arms, S::Fury, S::Protection],
        }
    }

    /// Whether `spec` belongs to this class.
    pub fn offers(self, spec: Specialization) -> bool {
        self.specializations().contains(&spec)
    }

    /// Classes sorted by label, as presented in the class menu.
    pub fn sorted_by_label() -> Vec<Self> {
        let mut classes = Self::ALL.to_vec();
        classes.sort_by_key(|class| class.label());
        classes
    }

    /// Resolve a specialisation label within this class.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError`] when the label is unknown or belongs to a
    /// different class.
    pub fn specialization_named(self, label: &str) -> Result<Specialization, VocabularyError> {
        let spec = label.parse::<Specialization>()?;
        if self.offers(spec) {
            Ok(spec)
        } else {
            Err(VocabularyError::MismatchedSpecialization { class: self, spec })
        }
    }
}

/// A class together with one of its own specialisations.
///
/// ## Invariants
/// - `spec` is always a member of `class.specializations()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ClassSpecDto", into = "ClassSpecDto")]
pub struct ClassSpec {
    class: GameClass,
    spec: Specialization,
}

impl ClassSpec {
    /// Pair a class with a specialisation, rejecting foreign specialisations.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::MismatchedSpecialization`] when `spec` is
    /// not offered by `class`.
    ///
    /// # Examples
    /// ```
    /// use roster::domain::{ClassSpec, GameClass, Specialization};
    ///
    /// let pair = ClassSpec::new(GameClass::Paladin, Specialization::Holy).unwrap();
    /// assert_eq!(pair.to_string(), "Paladin Holy");
    /// assert!(ClassSpec::new(GameClass::Mage, Specialization::Holy).is_err());
    /// ```
    pub fn new(class: GameClass, spec: Specialization) -> Result<Self, VocabularyError> {
        if class.offers(spec) {
            Ok(Self { class, spec })
        } else {
            Err(VocabularyError::MismatchedSpecialization { class, spec })
        }
    }

    /// Parse both labels and validate the pairing.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError`] when either label is unknown or the pair is
    /// mismatched.
    pub fn parse(class: &str, spec: &str) -> Result<Self, VocabularyError> {
        let class = class.parse::<GameClass>()?;
        let spec = class.specialization_named(spec)?;
        Ok(Self { class, spec })
    }

    /// Selected class.
    pub fn class(self) -> GameClass {
        self.class
    }

    /// Selected specialisation.
    pub fn spec(self) -> Specialization {
        self.spec
    }

    /// Every valid pair in the vocabulary.
    pub fn all() -> impl Iterator<Item = Self> {
        GameClass::ALL.iter().copied().flat_map(|class| {
            class
                .specializations()
                .iter()
                .map(move |&spec| Self { class, spec })
        })
    }
}

impl fmt::Display for ClassSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.class, self.spec)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ClassSpecDto {
    class: GameClass,
    spec: Specialization,
}

impl From<ClassSpec> for ClassSpecDto {
    fn from(value: ClassSpec) -> Self {
        Self {
            class: value.class,
            spec: value.spec,
        }
    }
}

impl TryFrom<ClassSpecDto> for ClassSpec {
    type Error = VocabularyError;

    fn try_from(value: ClassSpecDto) -> Result<Self, Self::Error> {
        Self::new(value.class, value.spec)
    }
}
