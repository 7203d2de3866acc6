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
use clap::Subcommand;
use kafkainfo_client::Brokers;
use kafkainfo_cluster::Cluster;

use super::BrokerArg;

#[derive(Clone, Debug, Subcommand)]
pub(super) enum Command {
    /// List every topic in the cluster
    List {
        #[command(flatten)]
        broker: BrokerArg,
    },

    /// The leader broker of a partition
    Leader {
        #[command(flatten)]
        broker: BrokerArg,

        /// The topic containing the partition
        #[arg(long)]
        topic: String,

        /// The partition index
        #[arg(long)]
        partition: i32,
    },
}

impl TryFrom<Command> for Cluster {
    type Error = crate::Error;

    fn try_from(value: Command) -> Result<Self, Self::Error> {
        match value {
            Command::List { broker } => Brokers::try_from(broker)
                .map(|broker| Cluster::topics().broker(broker).build()),

            Command::Leader {
                broker,
                topic,
                partition,
            } => Brokers::try_from(broker).map(|broker| {
                Cluster::leader()
                    .broker(broker)
                    .topic(topic)
                    .partition(partition)
                    .build()
            }),
        }
    }
}

impl Command {
    pub(super) async fn main(self) -> Result<()> {
        Cluster::try_from(self)?.main().await.map_err(Into::into)
    }
}
