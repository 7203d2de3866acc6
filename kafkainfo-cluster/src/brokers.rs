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
use serde::Serialize;
use tracing::debug;

use crate::{Cluster, Result, metadata};

#[derive(Clone, Debug, Default)]
pub struct Builder<B> {
    broker: B,
}

impl<B> Builder<B> {
    pub fn broker(self, broker: kafkainfo_client::Brokers) -> Builder<kafkainfo_client::Brokers> {
        Builder { broker }
    }
}

impl Builder<kafkainfo_client::Brokers> {
    pub fn build(self) -> Cluster {
        Cluster::Brokers(Configuration {
            broker: self.broker,
        })
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Configuration {
    broker: kafkainfo_client::Brokers,
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Brokers {
    configuration: Configuration,
}

impl From<Configuration> for Brokers {
    fn from(configuration: Configuration) -> Self {
        Self { configuration }
    }
}

#[derive(Serialize)]
struct Member {
    index: usize,
    id: i32,
    addr: String,
}

impl Brokers {
    pub(crate) async fn main(self) -> Result<String> {
        metadata(self.configuration.broker)
            .await
            .and_then(|metadata| render(&metadata))
    }
}

/// brokers in the order the cluster reported them
pub(crate) fn render(metadata: &ClusterMetadata) -> Result<String> {
    let members = metadata
        .brokers
        .iter()
        .enumerate()
        .map(|(index, broker)| Member {
            index,
            id: broker.id,
            addr: broker.addr(),
        })
        .inspect(|member| debug!(member.index, member.id, %member.addr))
        .collect::<Vec<_>>();

    serde_json::to_string(&members).map_err(Into::into)
}
