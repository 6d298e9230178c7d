//! The client-side snapshot of the signed-in user's expenses, categories and
//! persons.
//!
//! The API is the source of truth: every successful mutation is followed by a
//! fresh fetch of the affected collection, and the dashboard is recomputed
//! from whatever snapshot is current.

use crate::{
    Error,
    category::{Category, CategoryDraft, CategoryId},
    client::ApiClient,
    dashboard::{DashboardSummary, SpendingSummary, spending_summary, summarize},
    expense::{Expense, ExpenseDraft, ExpenseId},
    month::YearMonth,
    person::{Person, PersonDraft, PersonId, associated_persons},
};

/// Reads and writes the three collections a [Ledger] holds.
#[allow(async_fn_in_trait)]
pub trait LedgerSource {
    /// Get all expenses of the signed-in user.
    async fn fetch_expenses(&self) -> Result<Vec<Expense>, Error>;

    /// Create an expense.
    async fn create_expense(&self, draft: &ExpenseDraft) -> Result<Expense, Error>;

    /// Replace an existing expense.
    async fn update_expense(
        &self,
        id: ExpenseId,
        draft: &ExpenseDraft,
    ) -> Result<Expense, Error>;

    /// Delete an expense.
    async fn delete_expense(&self, id: ExpenseId) -> Result<(), Error>;

    /// Get all categories of the signed-in user.
    async fn fetch_categories(&self) -> Result<Vec<Category>, Error>;

    /// Create a category.
    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, Error>;

    /// Replace an existing category.
    async fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, Error>;

    /// Delete a category.
    async fn delete_category(&self, id: CategoryId) -> Result<(), Error>;

    /// Get all persons of the signed-in user.
    async fn fetch_persons(&self) -> Result<Vec<Person>, Error>;

    /// Create a person.
    async fn create_person(&self, draft: &PersonDraft) -> Result<Person, Error>;

    /// Replace an existing person.
    async fn update_person(&self, id: PersonId, draft: &PersonDraft) -> Result<Person, Error>;

    /// Delete a person.
    async fn delete_person(&self, id: PersonId) -> Result<(), Error>;
}

impl LedgerSource for ApiClient {
    async fn fetch_expenses(&self) -> Result<Vec<Expense>, Error> {
        ApiClient::fetch_expenses(self).await
    }

    async fn create_expense(&self, draft: &ExpenseDraft) -> Result<Expense, Error> {
        ApiClient::create_expense(self, draft).await
    }

    async fn update_expense(
        &self,
        id: ExpenseId,
        draft: &ExpenseDraft,
    ) -> Result<Expense, Error> {
        ApiClient::update_expense(self, id, draft).await
    }

    async fn delete_expense(&self, id: ExpenseId) -> Result<(), Error> {
        ApiClient::delete_expense(self, id).await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, Error> {
        ApiClient::fetch_categories(self).await
    }

    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, Error> {
        ApiClient::create_category(self, draft).await
    }

    async fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, Error> {
        ApiClient::update_category(self, id, draft).await
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), Error> {
        ApiClient::delete_category(self, id).await
    }

    async fn fetch_persons(&self) -> Result<Vec<Person>, Error> {
        ApiClient::fetch_persons(self).await
    }

    async fn create_person(&self, draft: &PersonDraft) -> Result<Person, Error> {
        ApiClient::create_person(self, draft).await
    }

    async fn update_person(&self, id: PersonId, draft: &PersonDraft) -> Result<Person, Error> {
        ApiClient::update_person(self, id, draft).await
    }

    async fn delete_person(&self, id: PersonId) -> Result<(), Error> {
        ApiClient::delete_person(self, id).await
    }
}

/// The signed-in user's expenses, categories and persons as last fetched.
#[derive(Debug)]
pub struct Ledger<S> {
    source: S,
    expenses: Vec<Expense>,
    categories: Vec<Category>,
    persons: Vec<Person>,
}

impl<S: LedgerSource> Ledger<S> {
    /// Fetch all three collections from `source`.
    pub async fn load(source: S) -> Result<Self, Error> {
        let expenses = source.fetch_expenses().await?;
        let categories = source.fetch_categories().await?;
        let persons = source.fetch_persons().await?;

        tracing::debug!(
            "Loaded {} expenses, {} categories and {} persons",
            expenses.len(),
            categories.len(),
            persons.len()
        );

        Ok(Self {
            source,
            expenses,
            categories,
            persons,
        })
    }

    /// The data source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The expenses, in the order the API returned them.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// The categories, in the order the API returned them.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The persons, in the order the API returned them.
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    /// The persons that may be chosen as an expense recipient.
    pub fn associated_persons(&self) -> Vec<&Person> {
        associated_persons(&self.persons)
    }

    /// Look up an expense in the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [Error::UnknownExpense] if there is no expense with `id`.
    pub fn expense(&self, id: ExpenseId) -> Result<&Expense, Error> {
        self.expenses
            .iter()
            .find(|expense| expense.id == id)
            .ok_or(Error::UnknownExpense(id))
    }

    /// Look up a category in the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [Error::UnknownCategory] if there is no category with `id`.
    pub fn category(&self, id: CategoryId) -> Result<&Category, Error> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .ok_or(Error::UnknownCategory(id))
    }

    /// Look up a person in the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [Error::UnknownPerson] if there is no person with `id`.
    pub fn person(&self, id: PersonId) -> Result<&Person, Error> {
        self.persons
            .iter()
            .find(|person| person.id == id)
            .ok_or(Error::UnknownPerson(id))
    }

    /// Replace the expenses with a fresh fetch.
    ///
    /// On failure the previous expenses are kept.
    pub async fn refresh_expenses(&mut self) -> Result<(), Error> {
        self.expenses = self.source.fetch_expenses().await?;
        Ok(())
    }

    /// Replace the categories with a fresh fetch.
    ///
    /// On failure the previous categories are kept.
    pub async fn refresh_categories(&mut self) -> Result<(), Error> {
        self.categories = self.source.fetch_categories().await?;
        Ok(())
    }

    /// Replace the persons with a fresh fetch.
    ///
    /// On failure the previous persons are kept.
    pub async fn refresh_persons(&mut self) -> Result<(), Error> {
        self.persons = self.source.fetch_persons().await?;
        Ok(())
    }

    /// Validate `draft` against the current persons, then create it, or update
    /// the expense `editing`, and re-fetch the expenses.
    ///
    /// # Errors
    ///
    /// Returns the validation error or the source's error. Nothing is
    /// re-fetched when the save fails.
    pub async fn save_expense(
        &mut self,
        draft: ExpenseDraft,
        editing: Option<ExpenseId>,
    ) -> Result<(), Error> {
        let draft = draft.validate(&self.persons)?;

        match editing {
            Some(id) => {
                self.source.update_expense(id, &draft).await?;
                tracing::info!("Updated expense {id}");
            }
            None => {
                let expense = self.source.create_expense(&draft).await?;
                tracing::info!("Created expense {}", expense.id);
            }
        }

        self.refresh_expenses().await
    }

    /// Delete the expense `id` and re-fetch the expenses.
    pub async fn delete_expense(&mut self, id: ExpenseId) -> Result<(), Error> {
        self.source.delete_expense(id).await?;
        tracing::info!("Deleted expense {id}");

        self.refresh_expenses().await
    }

    /// Validate `draft`, then create it, or update the category `editing`,
    /// and re-fetch the categories.
    pub async fn save_category(
        &mut self,
        draft: CategoryDraft,
        editing: Option<CategoryId>,
    ) -> Result<(), Error> {
        let draft = draft.validate()?;

        match editing {
            Some(id) => {
                self.source.update_category(id, &draft).await?;
                tracing::info!("Updated category {id}");
            }
            None => {
                let category = self.source.create_category(&draft).await?;
                tracing::info!("Created category {}", category.id);
            }
        }

        self.refresh_categories().await
    }

    /// Delete the category `id` and re-fetch the categories.
    pub async fn delete_category(&mut self, id: CategoryId) -> Result<(), Error> {
        self.source.delete_category(id).await?;
        tracing::info!("Deleted category {id}");

        self.refresh_categories().await
    }

    /// Validate `draft`, then create it, or update the person `editing`, and
    /// re-fetch the persons.
    pub async fn save_person(
        &mut self,
        draft: PersonDraft,
        editing: Option<PersonId>,
    ) -> Result<(), Error> {
        let draft = draft.validate()?;

        match editing {
            Some(id) => {
                self.source.update_person(id, &draft).await?;
                tracing::info!("Updated person {id}");
            }
            None => {
                let person = self.source.create_person(&draft).await?;
                tracing::info!("Created person {}", person.id);
            }
        }

        self.refresh_persons().await
    }

    /// Delete the person `id` and re-fetch the persons.
    pub async fn delete_person(&mut self, id: PersonId) -> Result<(), Error> {
        self.source.delete_person(id).await?;
        tracing::info!("Deleted person {id}");

        self.refresh_persons().await
    }

    /// The dashboard for the current snapshot.
    pub fn dashboard(&self, current_month: YearMonth) -> DashboardSummary {
        summarize(&self.expenses, &self.categories, current_month)
    }

    /// The "Total Spent" panel over the user's categories, in API order.
    pub fn spending_summary(&self) -> SpendingSummary {
        let category_names: Vec<&str> = self
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .collect();

        spending_summary(&self.expenses, &category_names)
    }
}
