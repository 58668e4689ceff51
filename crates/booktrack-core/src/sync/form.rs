//! Create/edit form state

use crate::models::Resource;

/// Field values being edited, plus the resource targeted for update
///
/// With no draft, submitting the form creates a new resource.
#[derive(Debug, Clone)]
pub struct EditForm<R: Resource> {
    editing: Option<R>,
    /// Current input values
    pub fields: R::Fields,
}

impl<R: Resource> Default for EditForm<R> {
    fn default() -> Self {
        Self {
            editing: None,
            fields: R::Fields::default(),
        }
    }
}

impl<R: Resource> EditForm<R> {
    /// Empty form in create mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Form in create mode with the given values
    pub fn with_fields(fields: R::Fields) -> Self {
        Self {
            editing: None,
            fields,
        }
    }

    /// Target a resource for update and load its values into the form
    pub fn begin_edit(&mut self, resource: &R) {
        self.fields = resource.fields();
        self.editing = Some(resource.clone());
    }

    /// The resource being edited, if any
    pub fn editing(&self) -> Option<&R> {
        self.editing.as_ref()
    }

    /// Id of the resource being edited, if any
    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_ref().map(|r| r.id())
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Drop the draft and clear every field
    pub fn reset(&mut self) {
        self.editing = None;
        self.fields = R::Fields::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, BookFields};

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
    fn test_new_form_creates() {
        let form: EditForm<Book> = EditForm::new();
        assert!(!form.is_editing());
        assert_eq!(form.fields, BookFields::default());
    }

    #[test]
    fn test_begin_edit_populates_fields() {
        let mut form = EditForm::new();
        form.begin_edit(&dune());

        assert_eq!(form.editing_id(), Some("1"));
        assert_eq!(form.fields.title, "Dune");
        assert_eq!(form.fields.description, "desert planet");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = EditForm::new();
        form.begin_edit(&dune());
        form.fields.title = "Dune Messiah".to_string();

        form.reset();
        assert!(form.editing().is_none());
        assert_eq!(form.fields, BookFields::default());
    }
}
