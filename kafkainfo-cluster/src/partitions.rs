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
pub struct Builder<B, T> {
    broker: B,
    topic: T,
}

impl<B, T> Builder<B, T> {
    pub fn broker(self, broker: Brokers) -> Builder<Brokers, T> {
        Builder {
            broker,
            topic: self.topic,
        }
    }

    pub fn topic(self, topic: impl Into<String>) -> Builder<B, String> {
        Builder {
            broker: self.broker,
            topic: topic.into(),
        }
    }
}

impl Builder<Brokers, String> {
    pub fn build(self) -> Cluster {
        Cluster::Partitions(Configuration {
            broker: self.broker,
            topic: self.topic,
        })
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Configuration {
    broker: Brokers,
    topic: String,
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Partitions {
    configuration: Configuration,
}

impl From<Configuration> for Partitions {
    fn from(configuration: Configuration) -> Self {
        Self { configuration }
    }
}

#[derive(Serialize)]
struct TopicPartitions<'a> {
    topic: &'a str,
    partitions: Vec<i32>,
}

impl Partitions {
    pub(crate) async fn main(self) -> Result<String> {
        let Configuration { broker, topic } = self.configuration;

        metadata(broker)
            .await
            .and_then(|metadata| render(&metadata, &topic))
    }
}

pub(crate) fn render(metadata: &ClusterMetadata, topic: &str) -> Result<String> {
    metadata
        .topic(topic)
        .map(|info| TopicPartitions {
            topic,
            partitions: info.partition_ids(),
        })
        .map_err(Into::into)
        .and_then(|partitions| serde_json::to_string(&partitions).map_err(Into::into))
}
