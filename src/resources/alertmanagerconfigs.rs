use std::collections::HashSet;

use k8s_openapi::api::core::v1::SecretKeySelector;
use kube::CustomResource;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// AlertmanagerConfig configures the routing and receivers of a namespaced Alertmanager tree
/// API: monitoring.coreos.com/v1alpha1
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[kube(
    group = "monitoring.coreos.com",
    version = "v1alpha1",
    kind = "AlertmanagerConfig",
    plural = "alertmanagerconfigs",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct AlertmanagerConfigSpec {
    /// The Alertmanager route definition for alerts matching the resource's namespace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,

    /// List of receivers
    #[serde(default)]
    pub receivers: Vec<Receiver>,
}

/// Route defines a node in the routing tree
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Name of the receiver for this route, must match an entry in the receivers list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,

    /// List of labels to group by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,

    /// How long to wait before sending the initial notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<String>,

    /// How long to wait before sending an updated notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<String>,

    /// How long to wait before repeating the last notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<String>,

    /// List of matchers that the alert's labels should match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matchers: Option<Vec<Matcher>>,

    /// Whether an alert should continue matching subsequent sibling nodes
    #[serde(skip_serializing_if = "Option::is_none", rename = "continue")]
    pub continue_matching: Option<bool>,

    /// Child routes, stored as embedded documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<serde_json::Value>>,
}

impl Route {
    /// Decode the embedded child route documents
    pub fn child_routes(&self) -> Result<Vec<Route>> {
        self.routes
            .iter()
            .flatten()
            .map(|route| Ok(serde_json::from_value(route.clone())?))
            .collect()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
pub enum MatchType {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "=~")]
    Regexp,
    #[serde(rename = "!~")]
    NotRegexp,
}

/// Matcher defines how to match on an alert's labels
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Matcher {
    /// Label to match
    pub name: String,

    /// Label value to match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Match operator, one of `=` (default), `!=`, `=~` and `!~`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
}

impl Matcher {
    fn match_type(&self) -> MatchType {
        self.match_type.unwrap_or(MatchType::Equal)
    }

    // Alertmanager anchors regex matchers on both ends
    fn regex(&self) -> Result<Regex> {
        let value = self.value.as_deref().unwrap_or_default();
        Regex::new(&format!("^(?:{value})$")).map_err(|err| {
            Error::InvalidAlertmanagerConfig(format!(
                "matcher {} has an invalid regex {value:?}: {err}",
                self.name
            ))
        })
    }

    /// Whether a label value satisfies this matcher
    pub fn is_match(&self, label_value: &str) -> Result<bool> {
        let value = self.value.as_deref().unwrap_or_default();
        Ok(match self.match_type() {
            MatchType::Equal => label_value == value,
            MatchType::NotEqual => label_value != value,
            MatchType::Regexp => self.regex()?.is_match(label_value),
            MatchType::NotRegexp => !self.regex()?.is_match(label_value),
        })
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidAlertmanagerConfig(
                "matcher name must not be empty".into(),
            ));
        }
        match self.match_type() {
            MatchType::Regexp | MatchType::NotRegexp => self.regex().map(|_| ()),
            MatchType::Equal | MatchType::NotEqual => Ok(()),
        }
    }
}

/// Receiver defines one or more notification integrations
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Receiver {
    /// Name of the receiver, must be unique across the resource
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagerduty_configs: Option<Vec<PagerDutyConfig>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_configs: Option<Vec<EmailConfig>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_configs: Option<Vec<WebhookConfig>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PagerDutyConfig {
    /// Whether or not to notify about resolved alerts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_resolved: Option<bool>,

    /// The secret's key that contains the PagerDuty integration key (Events API v2)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_key: Option<SecretKeySelector>,

    /// The secret's key that contains the PagerDuty service key (Prometheus integration)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_key: Option<SecretKeySelector>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Arbitrary key/value pairs that provide further detail about the incident
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<KeyValue>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_resolved: Option<bool>,

    /// The email address to send notifications to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// The sender address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// The SMTP host and port through which emails are sent, e.g. `example.com:25`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smarthost: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_username: Option<String>,

    /// The secret's key that contains the password to use for authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_password: Option<SecretKeySelector>,

    /// Further headers email header key/value pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<KeyValue>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_tls: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_resolved: Option<bool>,

    /// The URL to send HTTP POST requests to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// The secret's key that contains the webhook URL, takes precedence over `url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_secret: Option<SecretKeySelector>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_alerts: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl AlertmanagerConfigSpec {
    /// Check that receivers are unique, every route points at a defined receiver and
    /// every regex matcher compiles
    pub fn validate(&self) -> Result<()> {
        let mut receivers = HashSet::with_capacity(self.receivers.len());
        for receiver in &self.receivers {
            if !receivers.insert(receiver.name.as_str()) {
                return Err(Error::InvalidAlertmanagerConfig(format!(
                    "receiver {:?} is defined more than once",
                    receiver.name
                )));
            }
        }

        let Some(route) = &self.route else {
            return Ok(());
        };
        if route.receiver.is_none() {
            return Err(Error::InvalidAlertmanagerConfig(
                "the top-level route must name a receiver".into(),
            ));
        }
        validate_route(route, &receivers)
    }

    pub fn receiver_mut(&mut self, name: &str) -> Option<&mut Receiver> {
        self.receivers.iter_mut().find(|r| r.name == name)
    }
}

fn validate_route(route: &Route, receivers: &HashSet<&str>) -> Result<()> {
    if let Some(receiver) = &route.receiver {
        if !receivers.contains(receiver.as_str()) {
            return Err(Error::InvalidAlertmanagerConfig(format!(
                "route references undefined receiver {receiver:?}"
            )));
        }
    }

    for matcher in route.matchers.iter().flatten() {
        matcher.validate()?;
    }

    for child in route.child_routes()? {
        validate_route(&child, receivers)?;
    }

    Ok(())
}
