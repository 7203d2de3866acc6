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

use crate::{Cluster, Result, metadata};

#[derive(Clone, Debug, Default)]
pub struct Builder<B> {
    broker: B,
}

impl<B> Builder<B> {
    pub fn broker(self, broker: Brokers) -> Builder<Brokers> {
        Builder { broker }
    }
}

impl Builder<Brokers> {
    pub fn build(self) -> Cluster {
        Cluster::Topics(Configuration {
            broker: self.broker,
        })
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Configuration {
    broker: Brokers,
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Topics {
    configuration: Configuration,
}

impl From<Configuration> for Topics {
    fn from(configuration: Configuration) -> Self {
        Self { configuration }
    }
}

impl Topics {
    pub(crate) async fn main(self) -> Result<String> {
        metadata(self.configuration.broker)
            .await
            .and_then(|metadata| render(&metadata))
    }
}

pub(crate) fn render(metadata: &ClusterMetadata) -> Result<String> {
    serde_json::to_string(&metadata.topic_names()).map_err(Into::into)
}
