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

use crate::Result;
use clap::Args;
use kafkainfo_cluster::Cluster;

use super::BrokerArg;

#[derive(Clone, Debug, Args)]
pub(super) struct Partitions {
    #[command(flatten)]
    broker: BrokerArg,

    /// The topic to describe
    #[arg(long)]
    topic: String,
}

impl Partitions {
    pub(super) async fn main(self) -> Result<()> {
        kafkainfo_client::Brokers::try_from(self.broker)
            .map(|broker| Cluster::partitions().broker(broker).topic(self.topic).build())?
            .main()
            .await
            .map_err(Into::into)
    }
}

#[derive(Clone, Debug, Args)]
pub(super) struct Brokers {
    #[command(flatten)]
    broker: BrokerArg,
}

impl Brokers {
    pub(super) async fn main(self) -> Result<()> {
        kafkainfo_client::Brokers::try_from(self.broker)
            .map(|broker| Cluster::brokers().broker(broker).build())?
            .main()
            .await
            .map_err(Into::into)
    }
}
