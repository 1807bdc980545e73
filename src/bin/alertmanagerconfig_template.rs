use clap::{Parser, ValueEnum};
use tracing::{error, info};

use odf_managed_deployer::resources::alertmanagerconfigs::AlertmanagerConfig;
use odf_managed_deployer::telemetry;
use odf_managed_deployer::templates::{
    alertmanager_config_template, apply_receiver_settings, ReceiverSettings,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Output {
    Yaml,
    Json,
}

#[derive(Debug, clap::Parser)]
struct Arguments {
    #[arg(
        long,
        env = "ALERTMANAGER_CONFIG_NAME",
        default_value = "alertmanager-config"
    )]
    name: String,

    #[arg(long, env = "NAMESPACE")]
    namespace: Option<String>,

    #[arg(long, value_enum, default_value_t = Output::Yaml)]
    output: Output,

    #[arg(long, env = "PAGERDUTY_SECRET_NAME")]
    pagerduty_secret_name: Option<String>,

    #[arg(long, env = "PAGERDUTY_SECRET_KEY", default_value = "PAGERDUTY_KEY")]
    pagerduty_secret_key: String,

    #[arg(long, env = "SOP_ENDPOINT")]
    sop_endpoint: Option<String>,

    #[arg(long, env = "DEADMANSSNITCH_URL")]
    deadmanssnitch_url: Option<String>,

    #[arg(long, env = "SMTP_SECRET_NAME")]
    smtp_secret_name: Option<String>,

    #[arg(long, env = "SMTP_HOST", value_name = "HOST:PORT")]
    smtp_host: Option<String>,

    #[arg(long, env = "SMTP_USERNAME")]
    smtp_username: Option<String>,

    #[arg(long, env = "SMTP_PASSWORD_KEY", default_value = "password")]
    smtp_password_key: String,

    #[arg(long, env = "SMTP_FROM")]
    smtp_from: Option<String>,

    #[arg(
        long = "notification-email",
        env = "NOTIFICATION_EMAILS",
        value_delimiter = ','
    )]
    notification_emails: Vec<String>,
}

impl Arguments {
    /// Receiver settings, if every one of them was supplied
    fn receiver_settings(&self) -> Option<ReceiverSettings> {
        if self.notification_emails.is_empty() {
            return None;
        }
        Some(ReceiverSettings {
            pagerduty_secret_name: self.pagerduty_secret_name.clone()?,
            pagerduty_secret_key: self.pagerduty_secret_key.clone(),
            sop_endpoint: self.sop_endpoint.clone()?,
            deadmanssnitch_url: self.deadmanssnitch_url.clone()?,
            smtp_secret_name: self.smtp_secret_name.clone()?,
            smtp_host: self.smtp_host.clone()?,
            smtp_username: self.smtp_username.clone()?,
            smtp_password_key: self.smtp_password_key.clone(),
            smtp_from: self.smtp_from.clone()?,
            notification_emails: self.notification_emails.clone(),
        })
    }
}

fn render(args: &Arguments) -> odf_managed_deployer::Result<AlertmanagerConfig> {
    let mut config = alertmanager_config_template()?;
    config.metadata.name = Some(args.name.clone());
    config.metadata.namespace = args.namespace.clone();

    match args.receiver_settings() {
        Some(settings) => apply_receiver_settings(&mut config, &settings)?,
        None => info!("Receiver settings incomplete, rendering the template placeholders"),
    }

    config.spec.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    telemetry::init();

    let args = Arguments::parse();

    let config = render(&args).inspect_err(|err| {
        error!(
            error = %err,
            kind = err.metric_label(),
            "Failed to render AlertmanagerConfig"
        )
    })?;

    let rendered = match args.output {
        Output::Yaml => serde_yaml::to_string(&config)?,
        Output::Json => serde_json::to_string_pretty(&config)? + "\n",
    };
    print!("{rendered}");
    Ok(())
}
