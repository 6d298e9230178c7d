//! Expense requests.

use reqwest::Method;

use crate::{
    Error,
    client::ApiClient,
    expense::{Expense, ExpenseDraft, ExpenseId},
};

impl ApiClient {
    /// All expenses of the signed-in user, newest first.
    pub async fn fetch_expenses(&self) -> Result<Vec<Expense>, Error> {
        self.get_json("/expenses").await
    }

    /// Create an expense from a validated draft.
    pub async fn create_expense(&self, draft: &ExpenseDraft) -> Result<Expense, Error> {
        self.send_json(Method::POST, "/expenses", draft).await
    }

    /// Replace the expense `id` with `draft`.
    pub async fn update_expense(
        &self,
        id: ExpenseId,
        draft: &ExpenseDraft,
    ) -> Result<Expense, Error> {
        self.send_json(Method::PUT, &format!("/expenses/{id}"), draft)
            .await
    }

    /// Delete the expense `id`.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<(), Error> {
        self.send_empty(Method::DELETE, &format!("/expenses/{id}"))
            .await
    }
}
