//! Persons are the providers and recipients of expenses.
//!
//! A person with a [Relation] to the user is *associated* and may be used as
//! the recipient of an expense. Persons without a relation are provider-only
//! contacts such as shops or utility companies.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// API identifier for a person.
pub type PersonId = i64;

/// The kind of entity a person is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PersonType {
    /// A natural person.
    #[default]
    Individual,
    /// A business.
    Company,
    /// A public body, e.g. the tax office.
    Government,
}

impl Display for PersonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            PersonType::Individual => "Individual",
            PersonType::Company => "Company",
            PersonType::Government => "Government",
        };

        write!(f, "{text}")
    }
}

impl FromStr for PersonType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "individual" => Ok(PersonType::Individual),
            "company" => Ok(PersonType::Company),
            "government" => Ok(PersonType::Government),
            _ => Err(Error::InvalidPersonType(s.to_owned())),
        }
    }
}

/// How a person relates to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// The user themselves.
    #[serde(rename = "Self")]
    Myself,
    /// The user's spouse or partner.
    Spouse,
    /// A child of the user.
    Child,
    /// A parent of the user.
    Parent,
    /// A brother or sister of the user.
    Sibling,
    /// Anyone else the user spends money on.
    Other,
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Relation::Myself => "Self",
            Relation::Spouse => "Spouse",
            Relation::Child => "Child",
            Relation::Parent => "Parent",
            Relation::Sibling => "Sibling",
            Relation::Other => "Other",
        };

        write!(f, "{text}")
    }
}

impl FromStr for Relation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "self" => Ok(Relation::Myself),
            "spouse" => Ok(Relation::Spouse),
            "child" => Ok(Relation::Child),
            "parent" => Ok(Relation::Parent),
            "sibling" => Ok(Relation::Sibling),
            "other" => Ok(Relation::Other),
            _ => Err(Error::InvalidRelation(s.to_owned())),
        }
    }
}

/// A provider or recipient of expenses, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// The API ID.
    pub id: PersonId,
    /// The full name or business name.
    pub name: String,
    /// Whether this is an individual, company or government body.
    #[serde(rename = "type")]
    pub kind: PersonType,
    /// The tax identifier.
    pub rut: String,
    /// How the person relates to the user, if at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
}

impl Person {
    /// Whether the person may be used as the recipient of an expense.
    pub fn is_associated(&self) -> bool {
        self.relation.is_some()
    }
}

/// The persons that can be recipients, in their original order.
pub fn associated_persons(persons: &[Person]) -> Vec<&Person> {
    persons.iter().filter(|person| person.is_associated()).collect()
}

/// Form data for person creation and editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDraft {
    /// The full name or business name.
    pub name: String,
    /// Whether this is an individual, company or government body.
    #[serde(rename = "type")]
    pub kind: PersonType,
    /// The tax identifier.
    pub rut: String,
    /// How the person relates to the user, if at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
}

impl PersonDraft {
    /// Trim the text fields and check the draft can be sent to the API.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyPersonName] or [Error::InvalidRut].
    pub fn validate(mut self) -> Result<Self, Error> {
        self.name = validate_person_name(&self.name)?;
        self.rut = validate_rut(&self.rut)?;

        Ok(self)
    }
}

impl From<&Person> for PersonDraft {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            kind: person.kind,
            rut: person.rut.clone(),
            relation: person.relation,
        }
    }
}

pub(crate) fn validate_person_name(name: &str) -> Result<String, Error> {
    let name = name.trim();

    if name.is_empty() {
        Err(Error::EmptyPersonName)
    } else {
        Ok(name.to_owned())
    }
}

/// Check that `rut` looks like a Chilean RUT, e.g. `12.345.678-9` or
/// `12345678-K`, and return it trimmed.
///
/// Only the shape is checked, not the check digit.
///
/// # Errors
///
/// Returns [Error::InvalidRut] if the shape does not match.
pub fn validate_rut(rut: &str) -> Result<String, Error> {
    let trimmed = rut.trim();
    let invalid = || Error::InvalidRut(rut.to_owned());

    let (body, check_digit) = trimmed.split_once('-').ok_or_else(invalid)?;

    let mut check_digit = check_digit.chars();
    match (check_digit.next(), check_digit.next()) {
        (Some(c), None) if c.is_ascii_digit() || c == 'k' || c == 'K' => {}
        _ => return Err(invalid()),
    }

    let groups: Vec<&str> = body.split('.').collect();
    let groups_are_digits = groups
        .iter()
        .all(|group| !group.is_empty() && group.chars().all(|c| c.is_ascii_digit()));

    if !groups_are_digits {
        return Err(invalid());
    }

    let valid_shape = match groups.as_slice() {
        [digits] => (7..=8).contains(&digits.len()),
        [millions, thousands, units] => {
            (1..=2).contains(&millions.len()) && thousands.len() == 3 && units.len() == 3
        }
        _ => false,
    };

    if valid_shape {
        Ok(trimmed.to_owned())
    } else {
        Err(invalid())
    }
}

/// Reduce a RUT to its digits and upper case check digit so that
/// `12.345.678-k` and `12345678-K` compare equal.
pub fn normalize_rut(rut: &str) -> String {
    rut.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Find the person whose RUT matches `rut`, ignoring formatting.
pub fn find_by_rut<'a>(persons: &'a [Person], rut: &str) -> Option<&'a Person> {
    let wanted = normalize_rut(rut);

    if wanted.is_empty() {
        return None;
    }

    persons
        .iter()
        .find(|person| normalize_rut(&person.rut) == wanted)
}
