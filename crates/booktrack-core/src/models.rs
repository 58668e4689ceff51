//! Data models for BookTrack
//!
//! `Book` is the synchronized resource. `User`, `Registration` and
//! `Credentials` belong to the account endpoints.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A server-owned entity kept in a local collection
///
/// Two values are the same entity iff their ids match.
pub trait Resource: Clone + Debug + PartialEq + DeserializeOwned + Send + Sync + 'static {
    /// Editable field set, sent as the body of create and update
    type Fields: ResourceFields;

    /// Collection path relative to the API base URL
    const COLLECTION: &'static str;

    /// Server-assigned identifier
    fn id(&self) -> &str;

    /// Current field values (used to populate an edit form)
    fn fields(&self) -> Self::Fields;
}

/// Field set of a resource
pub trait ResourceFields: Clone + Debug + Default + PartialEq + Serialize + Send + Sync {
    /// Name of the first required field that is empty, if any
    fn missing_field(&self) -> Option<&'static str>;
}

/// A book in the user's collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Server-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
}

impl Resource for Book {
    type Fields = BookFields;

    const COLLECTION: &'static str = "books";

    fn id(&self) -> &str {
        &self.id
    }

    fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            description: self.description.clone(),
        }
    }
}

/// Editable fields of a book; all are required
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
}

impl BookFields {
    /// Create a field set
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            description: description.into(),
        }
    }
}

impl ResourceFields for BookFields {
    fn missing_field(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("author", &self.author),
            ("genre", &self.genre),
            ("description", &self.description),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Profile of the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    pub email: String,
}

/// Body of a registration request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Body of a login request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dune() -> Book {
        Book {
            id: "1".to_string(),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            genre: "SciFi".to_string(),
            description: "desert planet".to_string(),
        }
    }

    #[test]
    fn test_book_from_wire() {
        let book: Book = serde_json::from_value(json!({
            "_id": "1",
            "title": "Dune",
            "author": "Herbert",
            "genre": "SciFi",
            "description": "desert planet",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(book, dune());
        assert_eq!(Resource::id(&book), "1");
    }

    #[test]
    fn test_book_serializes_wire_id() {
        let value = serde_json::to_value(dune()).unwrap();
        assert_eq!(value["_id"], "1");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_book_fields() {
        let fields = dune().fields();
        assert_eq!(
            fields,
            BookFields::new("Dune", "Herbert", "SciFi", "desert planet")
        );
        assert_eq!(fields.missing_field(), None);
    }

    #[test]
    fn test_missing_field_reports_first_empty() {
        let fields = BookFields::new("", "Herbert", "", "desert planet");
        assert_eq!(fields.missing_field(), Some("title"));

        let fields = BookFields::new("Dune", "Herbert", "SciFi", "  ");
        assert_eq!(fields.missing_field(), Some("description"));

        assert_eq!(BookFields::default().missing_field(), Some("title"));
    }

    #[test]
    fn test_fields_body_has_no_id() {
        let body = serde_json::to_value(dune().fields()).unwrap();
        assert_eq!(
            body,
            json!({
                "title": "Dune",
                "author": "Herbert",
                "genre": "SciFi",
                "description": "desert planet"
            })
        );
    }

    #[test]
    fn test_user_without_id() {
        let user: User =
            serde_json::from_value(json!({"username": "boss", "email": "boss@example.com"}))
                .unwrap();
        assert!(user.id.is_none());
        assert_eq!(user.username, "boss");
    }
}
