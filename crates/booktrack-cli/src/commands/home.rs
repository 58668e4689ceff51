//! Home command handler

use anyhow::Result;

use booktrack_core::{Screen, Session};

use crate::output::Output;

/// Show the top-level screens and the session state
pub fn show(session: &Session, output: &Output) -> Result<()> {
    let logged_in = session.account().is_logged_in();
    output.print_screens(&Screen::ALL, logged_in, &session.config().api_url);
    Ok(())
}
