//! Expenses and the form data used to create and edit them.

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::{
    Error,
    person::{Person, PersonId, find_by_rut},
    receipt::ScanResult,
};

/// API identifier for an expense.
pub type ExpenseId = i64;

/// The smallest amount the expense form accepts.
pub const MINIMUM_AMOUNT: f64 = 0.01;

/// A single recorded outlay, as returned by the API.
///
/// Expenses are read-only copies of the API's records; edits go through an
/// [ExpenseDraft] and a re-fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The API ID.
    pub id: ExpenseId,
    /// A short description, e.g. "Groceries".
    pub title: String,
    /// The amount spent.
    pub amount: f64,
    /// The name of the category the expense belongs to. Empty when the API
    /// sent no category.
    #[serde(default, deserialize_with = "empty_if_null")]
    pub category: String,
    /// The day the money was spent.
    pub date: Date,
    /// Free text notes.
    #[serde(default)]
    pub note: Option<String>,
    /// The ID of the person that was paid.
    #[serde(default)]
    pub provider_id: Option<PersonId>,
    /// The ID of the person the money was spent on.
    #[serde(default)]
    pub recipient_id: Option<PersonId>,
    /// The person that was paid.
    #[serde(default)]
    pub provider: Option<Person>,
    /// The person the money was spent on.
    #[serde(default)]
    pub recipient: Option<Person>,
}

fn empty_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Form data for expense creation and editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    /// A short description, e.g. "Groceries".
    pub title: String,
    /// The amount spent, at least [MINIMUM_AMOUNT].
    pub amount: f64,
    /// The name of the category the expense belongs to.
    pub category: String,
    /// The day the money was spent.
    pub date: Date,
    /// Free text notes. Blank notes are sent as `null`.
    pub note: Option<String>,
    /// The ID of the person that was paid.
    pub provider_id: Option<PersonId>,
    /// The ID of the associated person the money was spent on.
    pub recipient_id: Option<PersonId>,
}

impl ExpenseDraft {
    /// Create a draft without a note, provider or recipient.
    pub fn new(title: &str, amount: f64, category: &str, date: Date) -> Self {
        Self {
            title: title.to_owned(),
            amount,
            category: category.to_owned(),
            date,
            note: None,
            provider_id: None,
            recipient_id: None,
        }
    }

    /// Set the provider and recipient.
    pub fn between(mut self, provider_id: PersonId, recipient_id: PersonId) -> Self {
        self.provider_id = Some(provider_id);
        self.recipient_id = Some(recipient_id);
        self
    }

    /// Set the note.
    pub fn note(mut self, note: &str) -> Self {
        self.note = Some(note.to_owned());
        self
    }

    /// Trim the text fields and check the draft against the user's persons.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - the title or category is blank,
    /// - the amount is less than [MINIMUM_AMOUNT] or not finite,
    /// - the provider or recipient is missing or not in `persons`,
    /// - the recipient has no relation to the user.
    pub fn validate(mut self, persons: &[Person]) -> Result<Self, Error> {
        self.title = self.title.trim().to_owned();
        if self.title.is_empty() {
            return Err(Error::EmptyTitle);
        }

        if !self.amount.is_finite() || self.amount < MINIMUM_AMOUNT {
            return Err(Error::InvalidAmount(self.amount));
        }

        self.category = self.category.trim().to_owned();
        if self.category.is_empty() {
            return Err(Error::EmptyCategoryName);
        }

        self.note = self
            .note
            .map(|note| note.trim().to_owned())
            .filter(|note| !note.is_empty());

        let provider_id = self.provider_id.ok_or(Error::MissingProvider)?;
        if !persons.iter().any(|person| person.id == provider_id) {
            return Err(Error::UnknownPerson(provider_id));
        }

        let recipient_id = self.recipient_id.ok_or(Error::MissingRecipient)?;
        let recipient = persons
            .iter()
            .find(|person| person.id == recipient_id)
            .ok_or(Error::UnknownPerson(recipient_id))?;

        if !recipient.is_associated() {
            return Err(Error::RecipientNotAssociated(recipient_id));
        }

        Ok(self)
    }

    /// Fill in the fields a receipt scan could extract.
    ///
    /// The scanned amount replaces the draft's amount, and the person whose
    /// RUT matches the scanned RUT becomes the provider. Returns the matched
    /// provider, if any.
    pub fn prefill_from_scan<'a>(
        &mut self,
        scan: &ScanResult,
        persons: &'a [Person],
    ) -> Option<&'a Person> {
        if let Some(amount) = scan.amount {
            self.amount = amount;
        }

        let provider = scan.rut.as_deref().and_then(|rut| find_by_rut(persons, rut));

        if let Some(provider) = provider {
            self.provider_id = Some(provider.id);
        }

        provider
    }
}

impl From<&Expense> for ExpenseDraft {
    fn from(expense: &Expense) -> Self {
        Self {
            title: expense.title.clone(),
            amount: expense.amount,
            category: expense.category.clone(),
            date: expense.date,
            note: expense.note.clone(),
            provider_id: expense
                .provider_id
                .or(expense.provider.as_ref().map(|person| person.id)),
            recipient_id: expense
                .recipient_id
                .or(expense.recipient.as_ref().map(|person| person.id)),
        }
    }
}
