//! Interactive account login
//!
//! Polls for an account address, an e-mail and a masked password, registers
//! the client app with the instance, exchanges the credentials for a token,
//! verifies it, and persists the new account as the default.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;
use libtootcast::accounts::{parse_address, Account, AccountStore};
use libtootcast::api::{MastodonApi, TokenRequest};

/// Run the login flow and persist the new account. Returns its address.
pub async fn add_account<A: MastodonApi>(api: &A, store: &mut AccountStore) -> Result<String> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let (username, instance) = poll_for_address(&mut input)?;
    let email = poll_for_email(&mut input)?;
    let password = rpassword::prompt_password("password: ")?;

    let app = api.register_app(&instance).await?;
    let token = api
        .obtain_token(
            &instance,
            &TokenRequest::password_grant(&app, &email, &password),
        )
        .await?;
    let verified = api.verify_credentials(&instance, &token.access_token).await?;
    tracing::debug!("verified credentials for {}", verified.acct);

    let address = format!("@{}@{}", username, instance);
    store.add(
        address.clone(),
        Account {
            instance,
            client_id: app.client_id,
            client_secret: app.client_secret,
            access_token: token.access_token,
        },
    );
    store.save()?;
    Ok(address)
}

/// Poll until the user enters a well-formed `@username@instance` address.
fn poll_for_address<R: BufRead>(input: &mut R) -> Result<(String, String)> {
    loop {
        prompt("account [@username@instance]: ")?;
        let line = read_line(input)?;
        match parse_address(&line) {
            Ok(parts) => return Ok(parts),
            Err(_) => eprintln!("{} Must be in format @username@instance", "error:".red()),
        }
    }
}

/// Poll until the input looks like an e-mail address.
fn poll_for_email<R: BufRead>(input: &mut R) -> Result<String> {
    loop {
        prompt("email: ")?;
        let line = read_line(input)?;
        let candidate = line.trim();
        if is_plausible_email(candidate) {
            return Ok(candidate.to_string());
        }
        eprintln!("{} Must be a valid email", "error:".red());
    }
}

fn is_plausible_email(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text.bold());
    io::stdout().flush()?;
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("end of input during login");
    }
    Ok(line)
}
