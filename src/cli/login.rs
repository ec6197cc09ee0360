use std::sync::Arc;

use anyhow::{Result, bail};

use crate::citycare::LoginRequest;
use crate::core::{AppConfig, Session};
use crate::device::Prompt;

// Read from the terminal so it never ends up in shell history or the
// process list.
async fn read_password(prompt: Arc<dyn Prompt>) -> Result<String> {
    let answer = tokio::task::spawn_blocking(move || prompt.ask("Password: ")).await??;
    match answer {
        Some(password) if !password.is_empty() => Ok(password),
        Some(_) => bail!("Password is required"),
        None => bail!("Login cancelled"),
    }
}

pub async fn run(config: &AppConfig, email: String, prompt: Arc<dyn Prompt>) -> Result<()> {
    let password = read_password(prompt).await?;
    let resp = super::api(config)
        .login(&LoginRequest { email, password })
        .await?;

    if !resp.ok {
        bail!("Login failed: {}", resp.message);
    }

    let login = resp.into_data()?;
    let session = Session {
        user_id: login.id,
        name: login.name,
        access_token: login.access_token,
    };
    session.save(&config.session_path())?;

    println!("Logged in as {}", session.name);
    Ok(())
}
