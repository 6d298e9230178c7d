//! User accounts as seen by the client: the signed-in user, the admin user
//! listing, registration and the profile form.

use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::{
    Error,
    format::date_part,
    person::{Person, PersonType, validate_person_name, validate_rut},
};

/// API identifier for a user.
pub type UserId = i64;

/// A user account, as listed for administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The API ID.
    pub id: UserId,
    /// The name the user logs in with.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// Whether the user can manage other users.
    pub is_admin: bool,
    /// Whether the user may log in.
    pub is_active: bool,
    /// When the account was created, as an ISO 8601 timestamp.
    pub created_at: String,
}

impl User {
    /// The date the account was created.
    pub fn joined_on(&self) -> &str {
        date_part(&self.created_at)
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The API ID.
    pub id: UserId,
    /// The name the user logs in with.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// Whether the user can manage other users.
    pub is_admin: bool,
    /// The ID of the person that represents the user in expenses.
    #[serde(default)]
    pub profile_person_id: Option<i64>,
    /// The person that represents the user in expenses.
    #[serde(default)]
    pub profile_person: Option<Person>,
}

impl CurrentUser {
    /// "Admin" or "User".
    pub fn role(&self) -> &'static str {
        if self.is_admin { "Admin" } else { "User" }
    }
}

/// The details needed to create an account.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// The name to log in with.
    pub username: String,
    /// The email address.
    pub email: String,
    /// The raw password.
    pub password: String,
}

impl Registration {
    /// Check the username, email and password strength.
    ///
    /// # Errors
    ///
    /// This function will return an error if the username is blank
    /// ([Error::EmptyUsername]), the email is invalid ([Error::InvalidEmail]),
    /// or the password is too easy to guess ([Error::TooWeak]).
    pub fn validate(self) -> Result<Self, Error> {
        let username = self.username.trim().to_owned();
        if username.is_empty() {
            return Err(Error::EmptyUsername);
        }

        let email = self.email.trim().to_owned();
        if !email_address::EmailAddress::is_valid(&email) {
            return Err(Error::InvalidEmail(email));
        }

        check_password_strength(&self.password, &[&username, &email])?;

        Ok(Self {
            username,
            email,
            password: self.password,
        })
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// Reject passwords that are easy to guess.
///
/// `user_inputs` are words the password should not be based on, such as the
/// user name.
///
/// # Errors
///
/// Returns [Error::TooWeak] with suggestions for a stronger password.
pub fn check_password_strength(password: &str, user_inputs: &[&str]) -> Result<(), Error> {
    let password_analysis = zxcvbn(password, user_inputs);

    match password_analysis.score() {
        Score::Three | Score::Four => Ok(()),
        _ => Err(Error::TooWeak(
            password_analysis
                .feedback()
                .unwrap_or(&Feedback::default())
                .to_string(),
        )),
    }
}

/// Form data for the user's own person record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// The user's full name.
    pub name: String,
    /// Usually [PersonType::Individual].
    #[serde(rename = "type")]
    pub kind: PersonType,
    /// The user's tax identifier.
    pub rut: String,
}

impl ProfileUpdate {
    /// Trim the text fields and check the name and RUT.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyPersonName] or [Error::InvalidRut].
    pub fn validate(self) -> Result<Self, Error> {
        Ok(Self {
            name: validate_person_name(&self.name)?,
            kind: self.kind,
            rut: validate_rut(&self.rut)?,
        })
    }
}

impl From<&Person> for ProfileUpdate {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            kind: person.kind,
            rut: person.rut.clone(),
        }
    }
}
