//! API components an authorization can be granted for
//!
//! Each component decides which scopes are offered (through the prefix
//! table) and which extra fields the authorization form shows.

use crate::error::WidgetError;
use adminkit_choices::{Choice, PrefixTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known API components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// Autorisaties API
    Ac,
    /// Notificaties API
    Nrc,
    /// Zaken API
    Zrc,
    /// Catalogi API
    Ztc,
    /// Documenten API
    Drc,
    /// Besluiten API
    Brc,
}

impl Component {
    /// Every component, in the order the picker lists them
    pub const ALL: [Self; 6] = [Self::Ac, Self::Nrc, Self::Zrc, Self::Ztc, Self::Drc, Self::Brc];

    /// Submitted value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ac => "ac",
            Self::Nrc => "nrc",
            Self::Zrc => "zrc",
            Self::Ztc => "ztc",
            Self::Drc => "drc",
            Self::Brc => "brc",
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ac => "Autorisaties API",
            Self::Nrc => "Notificaties API",
            Self::Zrc => "Zaken API",
            Self::Ztc => "Catalogi API",
            Self::Drc => "Documenten API",
            Self::Brc => "Besluiten API",
        }
    }

    /// Extra fields the authorization form shows for this component
    #[must_use]
    pub fn extra_fields(self) -> ExtraFields {
        EXTRA_FIELDS
            .iter()
            .find(|(component, _)| *component == self)
            .map_or(ExtraFields::NONE, |(_, fields)| *fields)
    }

    /// Scope prefixes granted by this component
    #[must_use]
    pub fn scope_prefixes(self) -> &'static [&'static str] {
        match self {
            Self::Ac => &["notificaties", "autorisaties"],
            Self::Nrc => &["notificaties"],
            Self::Zrc => &["audittrails", "notificaties", "zaken"],
            Self::Ztc => &["notificaties", "catalogi"],
            Self::Drc => &["audittrails", "notificaties", "documenten"],
            Self::Brc => &["audittrails", "notificaties", "besluiten"],
        }
    }

    /// Component picker choices
    #[must_use]
    pub fn choices() -> Vec<Choice> {
        Self::ALL
            .iter()
            .map(|c| Choice::new(c.as_str(), c.label()))
            .collect()
    }

    /// Parse a submitted value; empty means nothing picked
    ///
    /// # Errors
    /// - `WidgetError::UnknownComponent` if the value is not a known component
    pub fn parse_optional(value: &str) -> Result<Option<Self>, WidgetError> {
        if value.is_empty() {
            Ok(None)
        } else {
            value.parse().map(Some)
        }
    }
}

impl FromStr for Component {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| WidgetError::UnknownComponent(s.to_string()))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field holding explicitly selected types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypesField {
    /// Zaaktypen
    Zaaktypen,
    /// Informatieobjecttypen
    Informatieobjecttypen,
    /// Besluittypen
    Besluittypen,
}

impl TypesField {
    /// Field name, also the key of the type list on a catalogus
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zaaktypen => "zaaktypen",
            Self::Informatieobjecttypen => "informatieobjecttypen",
            Self::Besluittypen => "besluittypen",
        }
    }
}

/// Related type selection for a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSelection {
    /// Substituted for `{verbose_name_plural}` in method labels
    pub verbose_name_plural: &'static str,
    /// Field holding the selected types
    pub field: TypesField,
}

/// Extra fields shown after the scopes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraFields {
    /// Related type selection, if any
    pub types: Option<TypeSelection>,
    /// Whether `vertrouwelijkheidaanduiding` is asked
    pub confidentiality: bool,
}

impl ExtraFields {
    /// No extra fields
    pub const NONE: Self = Self {
        types: None,
        confidentiality: false,
    };

    /// Check if there is nothing extra to ask
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_none() && !self.confidentiality
    }
}

const EXTRA_FIELDS: [(Component, ExtraFields); 3] = [
    (
        Component::Zrc,
        ExtraFields {
            types: Some(TypeSelection {
                verbose_name_plural: "ZAAKTYPEN",
                field: TypesField::Zaaktypen,
            }),
            confidentiality: true,
        },
    ),
    (
        Component::Drc,
        ExtraFields {
            types: Some(TypeSelection {
                verbose_name_plural: "INFORMATIEOBJECTTYPEN",
                field: TypesField::Informatieobjecttypen,
            }),
            confidentiality: true,
        },
    ),
    (
        Component::Brc,
        ExtraFields {
            types: Some(TypeSelection {
                verbose_name_plural: "BESLUITTYPEN",
                field: TypesField::Besluittypen,
            }),
            confidentiality: false,
        },
    ),
];

/// Scope prefix table for every known component
#[must_use]
pub fn default_prefix_table() -> PrefixTable {
    Component::ALL
        .iter()
        .map(|c| (c.as_str(), c.scope_prefixes().iter().copied()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_round_trip() {
        for component in Component::ALL {
            assert_eq!(component.as_str().parse::<Component>().unwrap(), component);
        }
        assert!(matches!(
            "xyz".parse::<Component>(),
            Err(WidgetError::UnknownComponent(_))
        ));
        assert_eq!(Component::parse_optional("").unwrap(), None);
    }

    #[test]
    fn extra_fields_lookup() {
        let zrc = Component::Zrc.extra_fields();
        assert_eq!(zrc.types.unwrap().field, TypesField::Zaaktypen);
        assert!(zrc.confidentiality);

        let brc = Component::Brc.extra_fields();
        assert_eq!(brc.types.unwrap().verbose_name_plural, "BESLUITTYPEN");
        assert!(!brc.confidentiality);

        assert!(Component::Nrc.extra_fields().is_empty());
        assert!(Component::Ztc.extra_fields().is_empty());
        assert!(Component::Ac.extra_fields().is_empty());
    }

    #[test]
    fn default_prefixes() {
        let table = default_prefix_table();
        assert_eq!(table.len(), 6);
        assert_eq!(table.prefixes("ztc"), ["notificaties", "catalogi"]);
    }
}
