/// Species and type attributes shared by every monster of a group.
///
/// The engine treats the descriptor as opaque data: it is copied into target
/// descriptors and handed to the creature factory unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesDescriptor {
    /// Up to three species, primary first.
    pub species: Vec<String>,
    /// Up to five elemental types, primary first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub types: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attribute: Option<String>,
}

impl SpeciesDescriptor {
    pub const MAX_SPECIES: usize = 3;
    pub const MAX_TYPES: usize = 5;

    pub fn new<S, T>(species: S, types: T) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            species: species
                .into_iter()
                .map(Into::into)
                .take(Self::MAX_SPECIES)
                .collect(),
            types: types.into_iter().map(Into::into).take(Self::MAX_TYPES).collect(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Primary species, or `"Unknown"` for an empty descriptor.
    pub fn primary_species(&self) -> &str {
        self.species.first().map(String::as_str).unwrap_or("Unknown")
    }

    /// Primary type, or `"Normal"` for an untyped descriptor.
    pub fn primary_type(&self) -> &str {
        self.types.first().map(String::as_str).unwrap_or("Normal")
    }

    /// `"Species1/Species2"` followed by the attribute in parentheses.
    pub fn display_name(&self) -> String {
        let species = if self.species.is_empty() {
            self.primary_species().to_string()
        } else {
            self.species.join("/")
        };
        match &self.attribute {
            Some(attribute) => format!("{species} ({attribute})"),
            None => species,
        }
    }
}
