// Copyright ⓒ 2024-2025 Peter Morgan <peter.james.morgan@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Kafkainfo Client
//!
//! A thin layer over rdkafka: broker addresses, cluster metadata snapshots,
//! topic subscriptions and a synchronous producer.

use std::{fmt, result, sync::Arc, time::Duration};

use rdkafka::{ClientConfig, error::KafkaError};
use tokio::task::JoinError;
use url::Url;

mod consumer;
mod metadata;
mod producer;

pub use consumer::{Acknowledge, ConsumedMessage, Subscription, SubscriptionStreams};
pub use metadata::{BrokerInfo, Client, ClusterMetadata, PartitionInfo, TopicInfo};
pub use producer::{Delivery, Producer};

/// client id presented to the brokers
pub const CLIENT_ID: &str = "kafkainfo";

/// port used when a broker URL does not carry one
pub const DEFAULT_PORT: u16 = 9092;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub type Result<T, E = Error> = result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    Join(Arc<JoinError>),
    Kafka(#[from] KafkaError),
    MissingHost(Url),
    NoBrokers,
    NoLeader { topic: String, partition: i32 },
    Topic { topic: String, error: String },
    UnknownBroker(i32),
    UnknownPartition { topic: String, partition: i32 },
    UnknownTopic(String),
}

impl From<JoinError> for Error {
    fn from(value: JoinError) -> Self {
        Self::Join(Arc::new(value))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A non-empty list of bootstrap brokers.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Brokers(Vec<Url>);

impl TryFrom<Vec<Url>> for Brokers {
    type Error = Error;

    fn try_from(value: Vec<Url>) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::NoBrokers);
        }

        if let Some(url) = value.iter().find(|url| url.host_str().is_none()) {
            return Err(Error::MissingHost(url.clone()));
        }

        Ok(Self(value))
    }
}

impl TryFrom<Url> for Brokers {
    type Error = Error;

    fn try_from(value: Url) -> Result<Self, Self::Error> {
        Self::try_from(vec![value])
    }
}

impl Brokers {
    pub fn urls(&self) -> &[Url] {
        &self.0
    }

    /// comma separated `host:port` list as expected by `bootstrap.servers`
    pub fn bootstrap_servers(&self) -> String {
        self.0
            .iter()
            .filter_map(|url| {
                url.host_str()
                    .map(|host| format!("{host}:{}", url.port().unwrap_or(DEFAULT_PORT)))
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    pub(crate) fn client_config(&self, client_id: &str) -> ClientConfig {
        let mut config = ClientConfig::new();
        _ = config
            .set("bootstrap.servers", self.bootstrap_servers())
            .set("client.id", client_id);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bootstrap_servers_with_default_port() -> Result<(), Box<dyn std::error::Error>> {
        let brokers = Brokers::try_from(vec![
            Url::parse("tcp://localhost:9092")?,
            Url::parse("tcp://kafka-2")?,
            Url::parse("tcp://10.0.0.3:19092")?,
        ])?;

        assert_eq!(
            "localhost:9092,kafka-2:9092,10.0.0.3:19092",
            brokers.bootstrap_servers()
        );

        Ok(())
    }

    #[test]
    fn empty_broker_list() {
        assert!(matches!(
            Brokers::try_from(Vec::<Url>::new()),
            Err(Error::NoBrokers)
        ));
    }

    #[test]
    fn broker_without_host() -> Result<(), Box<dyn std::error::Error>> {
        let url = Url::parse("unix:/tmp/kafka.sock")?;

        assert!(matches!(
            Brokers::try_from(url.clone()),
            Err(Error::MissingHost(missing)) if missing == url
        ));

        Ok(())
    }
}
