use std::collections::HashMap;

use anyhow::{bail, Context};
use serde_json::Value;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mailing_client::{MailingState, Recipient, View};

const USAGE: &str = "usage: mailing-client <email> <subject> (<body> | --view <template> [key=value ...])";

/// What to put in the mail body
enum Body {
    Literal(String),
    View(View),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (email, subject, body) = parse_args(&args)?;

    let state = MailingState::from_env().context("Failed to register mailing client")?;
    let recipient = Recipient::new(email);

    match body {
        Body::Literal(text) => {
            state
                .mailer
                .send_to(recipient, &subject, &text, None)
                .await?
        }
        Body::View(view) => {
            state
                .mailer
                .send_view_to(recipient, &subject, view, None)
                .await?
        }
    }

    tracing::info!("Done");
    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<(String, String, Body)> {
    let (email, subject, rest) = match args {
        [email, subject, rest @ ..] if !rest.is_empty() => (email, subject, rest),
        _ => bail!(USAGE),
    };

    let body = match rest {
        [flag, template, params @ ..] if flag == "--view" => {
            let map = params
                .iter()
                .map(|pair| {
                    pair.split_once('=')
                        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                        .with_context(|| format!("Expected key=value, got {pair}"))
                })
                .collect::<anyhow::Result<HashMap<_, _>>>()?;
            Body::View(View::named(template).with_map(Some(map)))
        }
        [text] => Body::Literal(text.clone()),
        _ => bail!(USAGE),
    };

    Ok((email.clone(), subject.clone(), body))
}
