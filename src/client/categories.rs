//! Category requests.

use reqwest::Method;

use crate::{
    Error,
    category::{Category, CategoryDraft, CategoryId},
    client::ApiClient,
};

impl ApiClient {
    /// All categories of the signed-in user.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, Error> {
        self.get_json("/categories").await
    }

    /// Create a category.
    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, Error> {
        self.send_json(Method::POST, "/categories", draft).await
    }

    /// Rename or recolor the category `id`.
    pub async fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, Error> {
        self.send_json(Method::PUT, &format!("/categories/{id}"), draft)
            .await
    }

    /// Delete the category `id`. Expenses keep the category name.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), Error> {
        self.send_empty(Method::DELETE, &format!("/categories/{id}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        category::CategoryDraft,
        client::ApiClient,
        test_utils::{TEST_TOKEN, spawn_fake_api},
        token::AccessToken,
    };

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(base_url)
            .unwrap()
            .with_token(AccessToken::new(TEST_TOKEN))
    }

    #[tokio::test]
    async fn create_and_list_categories() {
        let api = spawn_fake_api().await;
        let client = client(&api.base_url);

        let created = client
            .create_category(&CategoryDraft::new("Health"))
            .await
            .unwrap();
        let categories = client.fetch_categories().await.unwrap();

        assert_eq!(created.color, "#6366f1");
        assert!(categories.contains(&created));
        assert_eq!(
            api.last_request().content_type.as_deref(),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_with_detail() {
        let api = spawn_fake_api().await;

        let result = client(&api.base_url)
            .create_category(&CategoryDraft::new("Food"))
            .await;

        assert_eq!(
            result,
            Err(Error::ApiError {
                status: 400,
                detail: "Category already exists".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn validation_errors_are_joined() {
        let api = spawn_fake_api().await;

        let result = client(&api.base_url)
            .create_category(&CategoryDraft::new(""))
            .await;

        assert_eq!(
            result,
            Err(Error::ApiError {
                status: 422,
                detail: "String should have at least 1 character".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn update_and_delete_category() {
        let api = spawn_fake_api().await;
        let client = client(&api.base_url);
        let draft = CategoryDraft {
            name: "Groceries".to_owned(),
            color: "#00ff00".to_owned(),
        };

        let updated = client.update_category(1, &draft).await.unwrap();
        client.delete_category(1).await.unwrap();

        assert_eq!(updated.name, "Groceries");
        assert_eq!(api.last_request().path, "/categories/1");
        assert!(
            client
                .fetch_categories()
                .await
                .unwrap()
                .iter()
                .all(|category| category.id != 1)
        );
    }
}
