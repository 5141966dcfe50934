use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::email::Mailer;

#[derive(Subcommand)]
pub enum NotifyCommands {
    #[command(about = "Send an anomaly alert email")]
    Alert {
        #[arg(long, help = "Recipient email address")]
        to: String,
        #[arg(long, help = "Property label")]
        property: String,
        #[arg(long, help = "Detected event type")]
        event: String,
    },

    #[command(about = "Send a consent invitation email")]
    Consent {
        #[arg(long, help = "Recipient email address")]
        to: String,
        #[arg(long, help = "Owner email shown in the invitation")]
        owner: String,
        #[arg(long, help = "Property label")]
        property: String,
    },
}

pub async fn handle(
    cmd: NotifyCommands,
    config: AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mailer = Mailer::new(config.smtp);

    let (sent, recipient) = match cmd {
        NotifyCommands::Alert { to, property, event } => {
            (mailer.send_alert_email(&to, &property, &event).await, to)
        }
        NotifyCommands::Consent { to, owner, property } => {
            (mailer.send_consent_invitation_email(&to, &owner, &property).await, to)
        }
    };

    if sent {
        output_success(
            &output_format,
            &format!("Email sent to {}", recipient),
            Some(json!({ "recipient": recipient })),
        )
    } else {
        output_error(&output_format, &format!("Failed to send email to {}", recipient))?;
        anyhow::bail!("email delivery failed")
    }
}
