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

use kafkainfo_client::{Brokers, ClusterMetadata};
use serde::Serialize;

use crate::{Cluster, Result, metadata};

#[derive(Clone, Debug, Default)]
pub struct Builder<B, T, P> {
    broker: B,
    topic: T,
    partition: P,
}

impl<B, T, P> Builder<B, T, P> {
    pub fn broker(self, broker: Brokers) -> Builder<Brokers, T, P> {
        Builder {
            broker,
            topic: self.topic,
            partition: self.partition,
        }
    }

    pub fn topic(self, topic: impl Into<String>) -> Builder<B, String, P> {
        Builder {
            broker: self.broker,
            topic: topic.into(),
            partition: self.partition,
        }
    }

    pub fn partition(self, partition: i32) -> Builder<B, T, i32> {
        Builder {
            broker: self.broker,
            topic: self.topic,
            partition,
        }
    }
}

impl Builder<Brokers, String, i32> {
    pub fn build(self) -> Cluster {
        Cluster::Leader(Configuration {
            broker: self.broker,
            topic: self.topic,
            partition: self.partition,
        })
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Configuration {
    broker: Brokers,
    topic: String,
    partition: i32,
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Leader {
    configuration: Configuration,
}

impl From<Configuration> for Leader {
    fn from(configuration: Configuration) -> Self {
        Self { configuration }
    }
}

#[derive(Serialize)]
struct PartitionLeader<'a> {
    topic: &'a str,
    partition: i32,
    id: i32,
    addr: String,
}

impl Leader {
    pub(crate) async fn main(self) -> Result<String> {
        let Configuration {
            broker,
            topic,
            partition,
        } = self.configuration;

        metadata(broker)
            .await
            .and_then(|metadata| render(&metadata, &topic, partition))
    }
}

pub(crate) fn render(metadata: &ClusterMetadata, topic: &str, partition: i32) -> Result<String> {
    metadata
        .leader(topic, partition)
        .map(|broker| PartitionLeader {
            topic,
            partition,
            id: broker.id,
            addr: broker.addr(),
        })
        .map_err(Into::into)
        .and_then(|leader| serde_json::to_string(&leader).map_err(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use kafkainfo_client::{BrokerInfo, PartitionInfo, TopicInfo};
    use pretty_assertions::assert_eq;

    fn metadata() -> ClusterMetadata {
        ClusterMetadata {
            brokers: vec![BrokerInfo {
                id: 111,
                host: "localhost".into(),
                port: 9092,
            }],
            topics: vec![TopicInfo {
                name: "beats".into(),
                partitions: vec![
                    PartitionInfo {
                        id: 0,
                        leader: 111,
                        ..Default::default()
                    },
                    PartitionInfo {
                        id: 1,
                        leader: -1,
                        ..Default::default()
                    },
                ],
                error: None,
            }],
        }
    }

    #[test]
    fn leader_of_partition() -> Result<()> {
        assert_eq!(
            r#"{"topic":"beats","partition":0,"id":111,"addr":"localhost:9092"}"#,
            render(&metadata(), "beats", 0)?
        );
        Ok(())
    }

    #[test]
    fn leaderless_partition() {
        assert!(matches!(
            render(&metadata(), "beats", 1),
            Err(Error::Client(kafkainfo_client::Error::NoLeader { .. }))
        ));
    }

    #[test]
    fn unknown_partition() {
        assert!(matches!(
            render(&metadata(), "beats", 3),
            Err(Error::Client(kafkainfo_client::Error::UnknownPartition { .. }))
        ));
    }
}
