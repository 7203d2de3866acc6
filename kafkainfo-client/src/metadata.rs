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

use std::{fmt, sync::Arc, time::Duration};

use rdkafka::{
    consumer::{BaseConsumer, Consumer},
    metadata::{Metadata, MetadataBroker, MetadataPartition, MetadataTopic},
};
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::debug;

use crate::{Brokers, CLIENT_ID, DEFAULT_TIMEOUT, Error, Result};

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct BrokerInfo {
    pub id: i32,
    pub host: String,
    pub port: i32,
}

impl BrokerInfo {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<&MetadataBroker> for BrokerInfo {
    fn from(value: &MetadataBroker) -> Self {
        Self {
            id: value.id(),
            host: value.host().into(),
            port: value.port(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PartitionInfo {
    pub id: i32,

    /// broker id of the leader, `-1` when there is none
    pub leader: i32,
    pub replicas: Vec<i32>,
    pub isr: Vec<i32>,
    pub error: Option<String>,
}

impl From<&MetadataPartition> for PartitionInfo {
    fn from(value: &MetadataPartition) -> Self {
        Self {
            id: value.id(),
            leader: value.leader(),
            replicas: value.replicas().to_vec(),
            isr: value.isr().to_vec(),
            error: value.error().map(|error| format!("{error:?}")),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct TopicInfo {
    pub name: String,
    pub partitions: Vec<PartitionInfo>,
    pub error: Option<String>,
}

impl TopicInfo {
    pub fn partition(&self, id: i32) -> Option<&PartitionInfo> {
        self.partitions.iter().find(|partition| partition.id == id)
    }

    pub fn partition_ids(&self) -> Vec<i32> {
        let mut ids = self
            .partitions
            .iter()
            .map(|partition| partition.id)
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }
}

impl From<&MetadataTopic> for TopicInfo {
    fn from(value: &MetadataTopic) -> Self {
        Self {
            name: value.name().into(),
            partitions: value.partitions().iter().map(PartitionInfo::from).collect(),
            error: value.error().map(|error| format!("{error:?}")),
        }
    }
}

/// An owned snapshot of the cluster as seen by one metadata request.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ClusterMetadata {
    pub brokers: Vec<BrokerInfo>,
    pub topics: Vec<TopicInfo>,
}

impl From<&Metadata> for ClusterMetadata {
    fn from(value: &Metadata) -> Self {
        Self {
            brokers: value.brokers().iter().map(BrokerInfo::from).collect(),
            topics: value.topics().iter().map(TopicInfo::from).collect(),
        }
    }
}

impl ClusterMetadata {
    pub fn topic_names(&self) -> Vec<String> {
        let mut names = self
            .topics
            .iter()
            .map(|topic| topic.name.clone())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    pub fn topic(&self, name: &str) -> Result<&TopicInfo> {
        self.topics
            .iter()
            .find(|topic| topic.name == name)
            .ok_or_else(|| Error::UnknownTopic(name.into()))
            .and_then(|topic| {
                if let Some(ref error) = topic.error {
                    Err(Error::Topic {
                        topic: name.into(),
                        error: error.clone(),
                    })
                } else {
                    Ok(topic)
                }
            })
    }

    pub fn broker(&self, id: i32) -> Result<&BrokerInfo> {
        self.brokers
            .iter()
            .find(|broker| broker.id == id)
            .ok_or(Error::UnknownBroker(id))
    }

    pub fn leader(&self, topic: &str, partition: i32) -> Result<&BrokerInfo> {
        let leader = self
            .topic(topic)?
            .partition(partition)
            .ok_or_else(|| Error::UnknownPartition {
                topic: topic.into(),
                partition,
            })?
            .leader;

        if leader < 0 {
            return Err(Error::NoLeader {
                topic: topic.into(),
                partition,
            });
        }

        self.broker(leader)
    }
}

/// Metadata client over a lightweight consumer that never subscribes.
#[derive(Clone)]
pub struct Client {
    consumer: Arc<BaseConsumer>,
    timeout: Duration,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(stringify!(Client))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Client {
    pub fn builder(brokers: Brokers) -> Builder {
        Builder {
            brokers,
            client_id: CLIENT_ID.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// fetch a snapshot of every broker and topic
    pub async fn metadata(&self) -> Result<ClusterMetadata> {
        let consumer = self.consumer.clone();
        let timeout = self.timeout;

        task::spawn_blocking(move || {
            consumer
                .fetch_metadata(None, timeout)
                .map(|metadata| ClusterMetadata::from(&metadata))
        })
        .await?
        .inspect(|metadata| debug!(?metadata))
        .map_err(Into::into)
    }

    pub async fn topics(&self) -> Result<Vec<String>> {
        self.metadata().await.map(|metadata| metadata.topic_names())
    }

    pub async fn partitions(&self, topic: &str) -> Result<Vec<i32>> {
        self.metadata()
            .await
            .and_then(|metadata| metadata.topic(topic).map(TopicInfo::partition_ids))
    }

    pub async fn leader(&self, topic: &str, partition: i32) -> Result<BrokerInfo> {
        self.metadata()
            .await
            .and_then(|metadata| metadata.leader(topic, partition).cloned())
    }

    pub async fn brokers(&self) -> Result<Vec<BrokerInfo>> {
        self.metadata().await.map(|metadata| metadata.brokers)
    }
}

#[derive(Clone, Debug)]
pub struct Builder {
    brokers: Brokers,
    client_id: String,
    timeout: Duration,
}

impl Builder {
    pub fn client_id(self, client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..self
        }
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn build(self) -> Result<Client> {
        debug!(?self);

        self.brokers
            .client_config(&self.client_id)
            .create::<BaseConsumer>()
            .map(|consumer| Client {
                consumer: Arc::new(consumer),
                timeout: self.timeout,
            })
            .map_err(Into::into)
    }
}
