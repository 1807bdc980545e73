pub mod alertmanagerconfig;

pub use alertmanagerconfig::{
    alertmanager_config_template, apply_receiver_settings, ReceiverSettings,
};
