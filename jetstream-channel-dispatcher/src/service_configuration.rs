use jetstream_channel_core::channel_spec::ChannelSpec;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;

use crate::{errors::ConfigError, subscription::Subscription};

/// configuration settings loaded from the config file
#[derive(Debug, Deserialize)]
pub struct LoadConfiguration {
    /// Channels served by this dispatcher
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

/// A channel as declared in the config file
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub spec: ChannelSpec,
}

/// A channel with its subscribers resolved to delivery targets
#[derive(Debug, Clone)]
pub struct ChannelEntry {
    pub namespace: String,
    pub name: String,
    pub spec: ChannelSpec,
    pub subscriptions: Vec<Subscription>,
}

/// validated dispatcher configuration
#[derive(Debug)]
pub struct ServiceConfiguration {
    pub channels: Vec<ChannelEntry>,
}

impl ServiceConfiguration {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let load_config: LoadConfiguration = serde_yaml::from_str(content)?;
        load_config.try_into()
    }

    /// Channels in `namespace`, or all channels when no namespace is given.
    pub fn channels_in<'a>(
        &'a self,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ChannelEntry> + 'a {
        self.channels
            .iter()
            .filter(move |channel| namespace.map_or(true, |ns| channel.namespace == ns))
    }
}

impl TryFrom<LoadConfiguration> for ServiceConfiguration {
    type Error = ConfigError;

    fn try_from(config: LoadConfiguration) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut channels = Vec::with_capacity(config.channels.len());

        for channel in config.channels {
            let key = format!("{}/{}", channel.namespace, channel.name);
            if !seen.insert(key.clone()) {
                return Err(ConfigError::DuplicateChannel(key));
            }

            let subscriptions = channel
                .spec
                .subscribers
                .iter()
                .map(|subscriber| Subscription::from_spec(subscriber, channel.spec.delivery.as_ref()))
                .collect::<Result<Vec<_>, _>>()?;

            channels.push(ChannelEntry {
                namespace: channel.namespace,
                name: channel.name,
                spec: channel.spec,
                subscriptions,
            });
        }

        Ok(ServiceConfiguration { channels })
    }
}
