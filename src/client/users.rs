//! User administration and the signed-in user's profile.

use reqwest::Method;

use crate::{
    Error,
    client::ApiClient,
    user::{CurrentUser, ProfileUpdate, User, UserId},
};

impl ApiClient {
    /// All user accounts. Admin only.
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.get_json("/users/").await
    }

    /// Flip whether the user `id` may log in. Admin only.
    pub async fn toggle_active(&self, id: UserId) -> Result<User, Error> {
        self.request_json(Method::PATCH, &format!("/users/{id}/activate"))
            .await
    }

    /// Flip whether the user `id` is an admin. Admin only.
    pub async fn toggle_role(&self, id: UserId) -> Result<User, Error> {
        self.request_json(Method::PATCH, &format!("/users/{id}/role"))
            .await
    }

    /// Delete the user `id` and everything they own. Admin only.
    pub async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        self.send_empty(Method::DELETE, &format!("/users/{id}"))
            .await
    }

    /// The signed-in user with their profile person.
    pub async fn profile(&self) -> Result<CurrentUser, Error> {
        self.get_json("/users/me").await
    }

    /// Create or update the person that represents the signed-in user.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<CurrentUser, Error> {
        self.send_json(Method::PUT, "/users/me/profile", update)
            .await
    }
}
