//! Book command handlers

use anyhow::{bail, Result};

use booktrack_core::{Book, BookFields, EditForm, Session};

use super::sync_alert;
use crate::output::Output;
use crate::prompt::{confirm, is_interactive, prompt, prompt_with_default};

/// Field values given on the command line
#[derive(Debug, Clone, Default)]
pub struct FieldInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
}

impl FieldInput {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.genre.is_none()
            && self.description.is_none()
    }

    /// Overwrite the fields that were given
    fn apply(self, fields: &mut BookFields) {
        if let Some(title) = self.title {
            fields.title = title;
        }
        if let Some(author) = self.author {
            fields.author = author;
        }
        if let Some(genre) = self.genre {
            fields.genre = genre;
        }
        if let Some(description) = self.description {
            fields.description = description;
        }
    }
}

/// List all books
pub async fn list(session: &Session, output: &Output) -> Result<()> {
    let mut books = session.books();
    let items = books.list_all().await.map_err(sync_alert)?;
    output.print_books(items);
    Ok(())
}

/// Add a new book
///
/// Missing fields are prompted for when running interactively; otherwise
/// they stay empty and the add is rejected before anything is sent.
pub async fn add(session: &Session, input: FieldInput, output: &Output) -> Result<()> {
    let mut form: EditForm<Book> = EditForm::new();
    input.apply(&mut form.fields);

    if output.should_prompt() && is_interactive() {
        prompt_missing(&mut form.fields)?;
    }

    let mut books = session.books();
    let book = books.submit(&mut form).await.map_err(sync_alert)?;

    output.success("Book added successfully!");
    output.print_book(&book);
    Ok(())
}

/// Edit an existing book
///
/// Without field flags, each field is prompted for with its current value
/// as the default.
pub async fn edit(session: &Session, id: String, input: FieldInput, output: &Output) -> Result<()> {
    let mut books = session.books();
    books.list_all().await.map_err(sync_alert)?;

    let book = find_book(books.items(), &id)?.clone();
    let mut form = EditForm::new();
    form.begin_edit(&book);

    if input.is_empty() {
        if !(output.should_prompt() && is_interactive()) {
            bail!("Nothing to change. Pass --title, --author, --genre or --description.");
        }
        println!("Editing book: {}", book.id);
        println!("Press Enter to keep current value, or type new value.\n");
        prompt_all(&mut form.fields)?;
    } else {
        input.apply(&mut form.fields);
    }

    let saved = books.submit(&mut form).await.map_err(sync_alert)?;

    output.success("Book updated successfully!");
    output.print_book(&saved);
    Ok(())
}

/// Delete a book
pub async fn delete(session: &Session, id: String, output: &Output) -> Result<()> {
    let mut books = session.books();
    books.list_all().await.map_err(sync_alert)?;

    let book = find_book(books.items(), &id)?.clone();

    if output.should_prompt() {
        println!("Delete book: {} - {}", book.id, book.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    books.delete(&book.id).await.map_err(sync_alert)?;

    output.success(&format!("Deleted book: {}", book.id));
    Ok(())
}

/// Find a book by full id or unique id prefix
fn find_book<'a>(books: &'a [Book], id: &str) -> Result<&'a Book> {
    if let Some(book) = books.iter().find(|b| b.id == id) {
        return Ok(book);
    }

    let matches: Vec<_> = books.iter().filter(|b| b.id.starts_with(id)).collect();

    match matches.as_slice() {
        [] => bail!("No book found matching: {}", id),
        [book] => Ok(*book),
        _ => {
            eprintln!("Multiple books match '{}':", id);
            for book in &matches {
                eprintln!("  {} - {}", book.id, book.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Ask for each empty field
fn prompt_missing(fields: &mut BookFields) -> Result<()> {
    for (label, value) in field_slots(fields) {
        if value.trim().is_empty() {
            *value = prompt(label)?;
        }
    }
    Ok(())
}

/// Ask for every field, keeping the current value on empty input
fn prompt_all(fields: &mut BookFields) -> Result<()> {
    for (label, value) in field_slots(fields) {
        if let Some(new_value) = prompt_with_default(label, value)? {
            *value = new_value;
        }
    }
    Ok(())
}

fn field_slots(fields: &mut BookFields) -> [(&'static str, &mut String); 4] {
    [
        ("Book Title", &mut fields.title),
        ("Author", &mut fields.author),
        ("Genre", &mut fields.genre),
        ("Description", &mut fields.description),
    ]
}
