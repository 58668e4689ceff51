//! Account command handlers

use anyhow::{bail, Context, Result};

use booktrack_core::{Credentials, Registration, Session};

use super::account_alert;
use crate::output::Output;
use crate::prompt::{is_interactive, prompt};

/// Environment variable consulted for a password not given on the command line
const PASSWORD_ENV: &str = "BOOKTRACK_PASSWORD";

/// Register a new account
pub async fn register(
    session: &Session,
    username: String,
    email: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let registration = Registration {
        username,
        password: resolve_password(password)?,
        email,
    };

    session
        .account()
        .register(&registration)
        .await
        .map_err(account_alert)?;

    output.success("Registration successful!");
    output.message("Log in with: booktrack login --username <name>");
    Ok(())
}

/// Log in and store the session token
pub async fn login(
    session: &Session,
    username: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let credentials = Credentials {
        username,
        password: resolve_password(password)?,
    };

    session
        .account()
        .login(&credentials)
        .await
        .map_err(account_alert)?;

    output.success(&format!("Logged in as {}", credentials.username));
    Ok(())
}

/// Forget the stored session token
pub fn logout(session: &Session, output: &Output) -> Result<()> {
    session
        .account()
        .logout()
        .context("Failed to log out")?;
    output.success("Logged out");
    Ok(())
}

/// Show the signed-in user's profile
pub async fn profile(session: &Session, output: &Output) -> Result<()> {
    let user = session.account().load_profile().await;
    output.print_profile(user.as_ref());
    Ok(())
}

/// Password from the flag, the environment, or an interactive prompt
fn resolve_password(flag: Option<String>) -> Result<String> {
    let from_env = std::env::var(PASSWORD_ENV).ok();
    match flag.or(from_env).filter(|p| !p.is_empty()) {
        Some(password) => Ok(password),
        None if is_interactive() => {
            let password = prompt("Password")?;
            if password.is_empty() {
                bail!("Password is required.");
            }
            Ok(password)
        }
        None => bail!("Password is required. Pass --password or set {}.", PASSWORD_ENV),
    }
}
