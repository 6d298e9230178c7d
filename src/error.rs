//! Defines the app level error type and the conversions from library errors.
use reqwest::StatusCode;

use crate::{category::CategoryId, expense::ExpenseId, person::PersonId};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request could not be sent or the response could not be read.
    ///
    /// Callers should pass in the original error as a string.
    #[error("could not reach the API: {0}")]
    HttpError(String),

    /// The API rejected the bearer token, or the login credentials were wrong.
    #[error("{0}")]
    Unauthorized(String),

    /// The signed-in user may not perform the action, e.g. a non-admin
    /// listing users.
    #[error("{0}")]
    Forbidden(String),

    /// The requested resource was not found.
    ///
    /// The client should check that the ID is correct and that the resource
    /// has not been deleted in the meantime.
    #[error("{0}")]
    NotFound(String),

    /// Any other non-success response from the API.
    ///
    /// `detail` is the message from the API's error body, or the canonical
    /// reason for `status` when the body has no detail.
    #[error("the API responded with {status}: {detail}")]
    ApiError {
        /// The HTTP status code.
        status: u16,
        /// The error message.
        detail: String,
    },

    /// A request that needs a bearer token was made without one.
    #[error("you are not logged in, run `xpends login` first")]
    NotLoggedIn,

    /// The API responded with a body that could not be parsed.
    #[error("could not parse the API response: {0}")]
    InvalidResponse(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// A struct could not be encoded as an urlencoded form.
    #[error("could not encode the form: {0}")]
    FormEncodingError(String),

    /// Reading or writing a local file failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A string could not be parsed as a `YYYY-MM` month.
    #[error("\"{0}\" is not a valid month, expected YYYY-MM")]
    InvalidMonth(String),

    /// A string could not be parsed as a `YYYY-MM-DD` date.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An expense was submitted without a title.
    #[error("Title cannot be empty")]
    EmptyTitle,

    /// An expense amount was below one cent or not a finite number.
    #[error("{0} is not a valid amount, amounts must be at least 0.01")]
    InvalidAmount(f64),

    /// An empty string was used for a category name, either on an expense or
    /// when creating a category.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A category color was not a `#rrggbb` hex string.
    #[error("\"{0}\" is not a valid color, expected #rrggbb")]
    InvalidColor(String),

    /// An empty string was used for a person's name.
    #[error("Name cannot be empty")]
    EmptyPersonName,

    /// A RUT did not have the shape `12.345.678-9`.
    #[error("\"{0}\" is not a valid RUT, expected e.g. 12.345.678-9")]
    InvalidRut(String),

    /// A person type other than Individual, Company or Government.
    #[error("unknown person type \"{0}\", expected Individual, Company or Government")]
    InvalidPersonType(String),

    /// A relation other than the ones the API accepts.
    #[error(
        "unknown relation \"{0}\", expected Self, Spouse, Child, Parent, Sibling or Other"
    )]
    InvalidRelation(String),

    /// An expense was submitted without a provider.
    #[error("an expense needs a provider")]
    MissingProvider,

    /// An expense was submitted without a recipient.
    #[error("an expense needs a recipient")]
    MissingRecipient,

    /// The person ID does not refer to a person of the current user.
    #[error("there is no person with ID {0}")]
    UnknownPerson(PersonId),

    /// The recipient of an expense must have a relation to the user.
    #[error("person {0} is not associated to you and cannot be a recipient")]
    RecipientNotAssociated(PersonId),

    /// Tried to edit an expense that is not in the current snapshot.
    #[error("there is no expense with ID {0}")]
    UnknownExpense(ExpenseId),

    /// Tried to edit a category that is not in the current snapshot.
    #[error("there is no category with ID {0}")]
    UnknownCategory(CategoryId),

    /// The user name used for registration was empty.
    #[error("Username cannot be empty")]
    EmptyUsername,

    /// The email used for registration is not a valid address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The receipt file is not an image or PDF.
    #[error("Unsupported file type '{0}'. Upload an image or PDF.")]
    UnsupportedFileType(String),

    /// The receipt file is larger than the API accepts.
    #[error("File too large ({0} bytes). Maximum is 10 MB.")]
    FileTooLarge(u64),

    /// Admins may not deactivate, demote or delete their own account.
    #[error("you cannot change your own account from the admin commands")]
    SelfModification,
}

impl Error {
    /// Map a non-success HTTP status and the API's error detail to an error.
    pub(crate) fn from_status(status: StatusCode, detail: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Error::Unauthorized(detail),
            StatusCode::FORBIDDEN => Error::Forbidden(detail),
            StatusCode::NOT_FOUND => Error::NotFound(detail),
            status => Error::ApiError {
                status: status.as_u16(),
                detail,
            },
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Error::InvalidResponse(value.to_string())
        } else {
            Error::HttpError(value.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(value: serde_urlencoded::ser::Error) -> Self {
        Error::FormEncodingError(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IoError(value.to_string())
    }
}
