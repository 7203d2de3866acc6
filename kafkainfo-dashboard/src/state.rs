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

use kafkainfo_client::ClusterMetadata;

/// leaders shown per topic, the remaining partitions are elided
pub const LEADER_PREVIEW: usize = 4;

pub const TITLE: &str = "kafkainfo: press any key to quit";

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Title {
    pub bordered: bool,
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BrokerRow {
    pub addr: String,
    pub id: i32,
}

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TopicRow {
    pub name: String,
    pub partitions: usize,

    /// leader address of each previewed partition, empty when leaderless
    pub leaders: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Overview {
    pub brokers: Vec<BrokerRow>,
    pub topics: Vec<TopicRow>,
}

impl From<&ClusterMetadata> for Overview {
    fn from(metadata: &ClusterMetadata) -> Self {
        let mut brokers = metadata
            .brokers
            .iter()
            .map(|broker| BrokerRow {
                addr: broker.addr(),
                id: broker.id,
            })
            .collect::<Vec<_>>();
        brokers.sort_by_key(|broker| broker.id);

        let mut topics = metadata
            .topics
            .iter()
            .map(|topic| TopicRow {
                name: topic.name.clone(),
                partitions: topic.partitions.len(),
                leaders: topic
                    .partition_ids()
                    .into_iter()
                    .take(LEADER_PREVIEW)
                    .map(|partition| {
                        metadata
                            .leader(&topic.name, partition)
                            .map(|broker| broker.addr())
                            .unwrap_or_default()
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();
        topics.sort_by(|a, b| a.name.cmp(&b.name));

        Self { brokers, topics }
    }
}

/// Everything rendered by the dashboard.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Panels {
    pub title: Title,
    pub overview: Overview,

    /// the last refresh failure, cleared by a successful refresh
    pub status: Option<String>,
}
