//! Person requests.

use reqwest::Method;

use crate::{
    Error,
    client::ApiClient,
    person::{Person, PersonDraft, PersonId},
};

impl ApiClient {
    /// All persons of the signed-in user.
    pub async fn fetch_persons(&self) -> Result<Vec<Person>, Error> {
        self.get_json("/persons").await
    }

    /// Create a person.
    pub async fn create_person(&self, draft: &PersonDraft) -> Result<Person, Error> {
        self.send_json(Method::POST, "/persons", draft).await
    }

    /// Replace the person `id` with `draft`.
    pub async fn update_person(&self, id: PersonId, draft: &PersonDraft) -> Result<Person, Error> {
        self.send_json(Method::PUT, &format!("/persons/{id}"), draft)
            .await
    }

    /// Delete the person `id`.
    pub async fn delete_person(&self, id: PersonId) -> Result<(), Error> {
        self.send_empty(Method::DELETE, &format!("/persons/{id}"))
            .await
    }
}
