#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Compose an email from templates and send it

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use serde_json::Value;
use templated_mail::{
    domain::communication::{
        email::{EmailConfig, EmailOptions, EmailService},
        email_addresses::{EmailAddress, Mailbox},
        mailer::Mailer,
        templates::{RenderingRequirements, ThemeLocator},
    },
    infrastructure::{
        email::{
            memory::MemoryMailer,
            smtp::{SMTPConfig, SMTPMailer},
        },
        templates::{
            builtin::BuiltinRenderer,
            fallback::FallbackRenderer,
            tera_renderer::{TemplatesConfig, TeraRenderer},
        },
    },
};
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// Recipient, `addr` or `Name <addr>`; may be repeated
    #[clap(long, required = true)]
    pub to: Vec<String>,

    /// Sender; defaults to the administrator address or `no-reply@<host>`
    #[clap(long)]
    pub from: Option<String>,

    /// Carbon-copy recipient; may be repeated
    #[clap(long)]
    pub cc: Vec<String>,

    /// Blind carbon-copy recipient; may be repeated
    #[clap(long)]
    pub bcc: Vec<String>,

    /// Bounce address
    #[clap(long)]
    pub return_path: Option<String>,

    /// Subject line
    #[clap(long)]
    pub subject: Option<String>,

    /// Literal HTML body
    #[clap(long)]
    pub body: Option<String>,

    /// Literal plain text body
    #[clap(long)]
    pub plain_body: Option<String>,

    /// HTML template
    #[clap(long)]
    pub html_template: Option<String>,

    /// Plain text template
    #[clap(long)]
    pub plain_template: Option<String>,

    /// Kind of email, used to find a default HTML template
    #[clap(long)]
    pub kind: Option<String>,

    /// Template data as `name=value`; values are parsed as JSON when possible
    #[clap(long = "data", value_name = "NAME=VALUE")]
    pub data: Vec<String>,

    /// Send the plain text part only
    #[clap(long)]
    pub plain_only: bool,

    /// Print the resolved message instead of sending it
    #[clap(long)]
    pub dry_run: bool,

    /// Host address configuration
    #[clap(flatten)]
    pub email: EmailConfig,

    /// SMTP configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// Template configuration
    #[clap(flatten)]
    pub templates: TemplatesConfig,
}

fn mailboxes(raw: &[String]) -> Result<Vec<Mailbox>> {
    raw.iter().map(|m| Ok(m.parse::<Mailbox>()?)).collect()
}

fn data_field(raw: &str) -> Result<(String, Value)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("invalid data `{raw}`, expected NAME=VALUE"))?;

    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    Ok((name.trim().to_string(), value))
}

async fn run<M: Mailer>(args: Args, mailer: M) -> Result<()> {
    let requirements = RenderingRequirements::global();

    let renderer = FallbackRenderer::new(
        TeraRenderer::new(&args.templates, &args.email.absolute_base_url())?
            .with_requirements(requirements.clone()),
        BuiltinRenderer::new(),
    );

    let service = Arc::new(
        EmailService::new(Arc::new(renderer), Arc::new(mailer), args.email.clone())
            .with_locator(ThemeLocator::new(args.templates.themes.clone()))
            .with_requirements(requirements),
    );

    let mut email = service.email(EmailOptions {
        from: args.from.as_deref().map(str::parse).transpose()?,
        to: mailboxes(&args.to)?,
        subject: args.subject.clone(),
        body: args.body.clone(),
        cc: mailboxes(&args.cc)?,
        bcc: mailboxes(&args.bcc)?,
        return_path: args
            .return_path
            .as_deref()
            .map(EmailAddress::new)
            .transpose()?,
    })?;

    email.set_plain_body(args.plain_body.clone());

    if let Some(kind) = &args.kind {
        email.set_kind(kind.as_str());
    }

    if let Some(template) = &args.html_template {
        email.set_html_template(template);
    }

    if let Some(template) = &args.plain_template {
        email.set_plain_template(template);
    }

    for raw in &args.data {
        let (name, value) = data_field(raw)?;
        email.add_data(name, value);
    }

    if args.plain_only {
        email.send_plain().await?;
    } else {
        email.send().await?;
    }

    info!(subject = %email.message().subject, "email sent");

    Ok(())
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if args.dry_run {
        let outbox = MemoryMailer::new();

        run(args, outbox.clone()).await?;

        for message in outbox.messages() {
            println!("{:#?}", message);
        }

        return Ok(());
    }

    let mailer = SMTPMailer::new(args.smtp.clone());

    run(args, mailer).await
}
