use k8s_openapi::api::core::v1::SecretKeySelector;
use tracing::debug;

use crate::resources::alertmanagerconfigs::{
    AlertmanagerConfig, AlertmanagerConfigSpec, EmailConfig, KeyValue, MatchType, Matcher,
    PagerDutyConfig, Receiver, Route, WebhookConfig,
};
use crate::{Error, Result};

pub const NULL_RECEIVER: &str = "null";
pub const PAGERDUTY_RECEIVER: &str = "pagerduty";
pub const DEADMANSSNITCH_RECEIVER: &str = "DeadMansSnitch";
pub const SENDGRID_RECEIVER: &str = "SendGrid";

pub const DEADMANSSNITCH_ALERT: &str = "DeadMansSnitch";
pub const SOP_DETAIL_KEY: &str = "SOP";

pub const PAGERDUTY_ALERTS: &[&str] = &["CacheBucketErrorState"];

pub const SMTP_ALERTS: &[&str] = &["DataSourceErrorState", "BucketPolicyErrorState"];

// OSD full alerts are silenced by omission: with a static deployment configuration an OSD
// cannot fill up without the whole cluster filling up, which is alerted on separately.

const NOTIFICATION_SUBJECT: &str = "OpenShift Data Foundation Managed Service notification, \
                                    Action required on your managed OpenShift cluster!";

/// Build a regex that matches any of `names` exactly, e.g. `^A$|^B$`
///
/// Each alternative is anchored on its own so that a name never matches as a prefix of
/// another alert. An empty list yields `^$`, callers must pass at least one name.
pub fn regex_matcher<S: AsRef<str>>(names: &[S]) -> String {
    let alternation = names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("$|^");
    format!("^{alternation}$")
}

fn alertname_matcher(value: String, match_type: MatchType) -> Matcher {
    Matcher {
        name: "alertname".into(),
        value: Some(value),
        match_type: Some(match_type),
    }
}

fn notification_route(receiver: &str, repeat_interval: &str, matcher: Matcher) -> Route {
    Route {
        receiver: Some(receiver.into()),
        group_by: Some(vec!["alertname".into()]),
        group_wait: Some("30s".into()),
        group_interval: Some("5m".into()),
        repeat_interval: Some(repeat_interval.into()),
        matchers: Some(vec![matcher]),
        ..Default::default()
    }
}

fn embed_route(route: &Route) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(route)?)
}

/// The routing tree: everything defaults to the `null` receiver, known alerts are routed to
/// SendGrid, PagerDuty or the DeadMansSnitch heartbeat
pub fn routing_tree() -> Result<Route> {
    let children = [
        notification_route(
            SENDGRID_RECEIVER,
            "12h",
            alertname_matcher(regex_matcher(SMTP_ALERTS), MatchType::Regexp),
        ),
        notification_route(
            PAGERDUTY_RECEIVER,
            "12h",
            alertname_matcher(regex_matcher(PAGERDUTY_ALERTS), MatchType::Regexp),
        ),
        notification_route(
            DEADMANSSNITCH_RECEIVER,
            "5m",
            alertname_matcher(DEADMANSSNITCH_ALERT.into(), MatchType::Equal),
        ),
    ];

    Ok(Route {
        receiver: Some(NULL_RECEIVER.into()),
        routes: Some(children.iter().map(embed_route).collect::<Result<_>>()?),
        ..Default::default()
    })
}

/// Receivers with placeholder settings, filled in by [`apply_receiver_settings`]
pub fn receivers() -> Vec<Receiver> {
    vec![
        Receiver {
            name: NULL_RECEIVER.into(),
            ..Default::default()
        },
        Receiver {
            name: PAGERDUTY_RECEIVER.into(),
            pagerduty_configs: Some(vec![PagerDutyConfig {
                service_key: Some(SecretKeySelector::default()),
                details: Some(vec![KeyValue::default()]),
                ..Default::default()
            }]),
            ..Default::default()
        },
        Receiver {
            name: DEADMANSSNITCH_RECEIVER.into(),
            webhook_configs: Some(vec![WebhookConfig::default()]),
            ..Default::default()
        },
        Receiver {
            name: SENDGRID_RECEIVER.into(),
            email_configs: Some(vec![EmailConfig {
                send_resolved: Some(false),
                smarthost: Some(String::new()),
                from: Some(String::new()),
                to: Some(String::new()),
                auth_username: Some(String::new()),
                auth_password: Some(SecretKeySelector::default()),
                headers: Some(vec![KeyValue {
                    key: "subject".into(),
                    value: NOTIFICATION_SUBJECT.into(),
                }]),
                ..Default::default()
            }]),
            ..Default::default()
        },
    ]
}

/// The AlertmanagerConfig every managed cluster gets, without metadata
pub fn alertmanager_config_template() -> Result<AlertmanagerConfig> {
    let spec = AlertmanagerConfigSpec {
        route: Some(routing_tree()?),
        receivers: receivers(),
    };
    debug!(
        receivers = spec.receivers.len(),
        "Built AlertmanagerConfig template"
    );
    Ok(AlertmanagerConfig {
        metadata: Default::default(),
        spec,
    })
}

/// Settings injected into the template's placeholder receivers
#[derive(Clone, Debug, Default)]
pub struct ReceiverSettings {
    pub pagerduty_secret_name: String,
    pub pagerduty_secret_key: String,
    /// Link to the standard operating procedures, attached to every PagerDuty incident
    pub sop_endpoint: String,
    pub deadmanssnitch_url: String,
    pub smtp_secret_name: String,
    /// `host:port` of the SMTP relay
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password_key: String,
    pub smtp_from: String,
    pub notification_emails: Vec<String>,
}

fn first_config<'a, T>(configs: Option<&'a mut Vec<T>>, receiver: &str) -> Result<&'a mut T> {
    configs.and_then(|c| c.first_mut()).ok_or_else(|| {
        Error::InvalidAlertmanagerConfig(format!(
            "receiver {receiver:?} has no configuration to fill in"
        ))
    })
}

/// Fill the placeholder receivers of a template with secrets and endpoints
pub fn apply_receiver_settings(
    config: &mut AlertmanagerConfig,
    settings: &ReceiverSettings,
) -> Result<()> {
    let spec = &mut config.spec;

    let pagerduty = first_config(
        spec.receiver_mut(PAGERDUTY_RECEIVER)
            .and_then(|r| r.pagerduty_configs.as_mut()),
        PAGERDUTY_RECEIVER,
    )?;
    pagerduty.service_key = Some(SecretKeySelector {
        name: settings.pagerduty_secret_name.clone(),
        key: settings.pagerduty_secret_key.clone(),
        ..Default::default()
    });
    pagerduty.details = Some(vec![KeyValue {
        key: SOP_DETAIL_KEY.into(),
        value: settings.sop_endpoint.clone(),
    }]);

    let webhook = first_config(
        spec.receiver_mut(DEADMANSSNITCH_RECEIVER)
            .and_then(|r| r.webhook_configs.as_mut()),
        DEADMANSSNITCH_RECEIVER,
    )?;
    webhook.url = Some(settings.deadmanssnitch_url.clone());

    let email = first_config(
        spec.receiver_mut(SENDGRID_RECEIVER)
            .and_then(|r| r.email_configs.as_mut()),
        SENDGRID_RECEIVER,
    )?;
    email.smarthost = Some(settings.smtp_host.clone());
    email.from = Some(settings.smtp_from.clone());
    email.to = Some(settings.notification_emails.join(", "));
    email.auth_username = Some(settings.smtp_username.clone());
    email.auth_password = Some(SecretKeySelector {
        name: settings.smtp_secret_name.clone(),
        key: settings.smtp_password_key.clone(),
        ..Default::default()
    });

    debug!(
        recipients = settings.notification_emails.len(),
        "Applied receiver settings to AlertmanagerConfig"
    );
    Ok(())
}
