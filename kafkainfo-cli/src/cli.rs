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

use std::process;

use crate::{EnvVarExp, Result};
use clap::{Args, Parser, Subcommand};
use kafkainfo_client::Brokers;
use tracing::debug;
use url::Url;

mod cat;
mod cluster;
mod dashboard;
mod topic;

const DEFAULT_BROKER: &str = "tcp://localhost:9092";

#[derive(Clone, Debug, Parser)]
#[command(name = "kafkainfo", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// List topics or find the leader of a partition
    #[command(visible_alias = "topics")]
    Topic {
        #[command(subcommand)]
        command: topic::Command,
    },

    /// List the partitions of a topic
    Partitions(cluster::Partitions),

    /// List the brokers of the cluster
    Brokers(cluster::Brokers),

    /// Produce test messages to a topic
    Produce(cat::Produce),

    /// Consume messages from a topic until a count is reached or interrupted
    Consume(cat::Consume),

    /// Terminal dashboard of brokers and topics
    #[command(visible_alias = "uishow")]
    Dashboard(dashboard::Arg),
}

/// Broker URLs shared by every command
#[derive(Clone, Debug, Args)]
pub(super) struct BrokerArg {
    /// Broker URLs, comma separated
    #[arg(
        long,
        env = "KAFKA_BROKERS",
        default_value = DEFAULT_BROKER,
        value_delimiter = ',',
        visible_alias = "addr"
    )]
    broker: Vec<EnvVarExp<Url>>,
}

impl TryFrom<BrokerArg> for Brokers {
    type Error = crate::Error;

    fn try_from(value: BrokerArg) -> Result<Self, Self::Error> {
        Brokers::try_from(
            value
                .broker
                .into_iter()
                .map(EnvVarExp::into_inner)
                .collect::<Vec<_>>(),
        )
        .map_err(Into::into)
    }
}

impl Cli {
    pub async fn main() -> Result<()> {
        debug!(pid = process::id());

        Cli::parse().command.main().await
    }
}

impl Command {
    async fn main(self) -> Result<()> {
        match self {
            Command::Topic { command } => command.main().await,
            Command::Partitions(arg) => arg.main().await,
            Command::Brokers(arg) => arg.main().await,

            Command::Produce(arg) => arg
                .main()
                .await
                .inspect(|produced| debug!(produced))
                .and(Ok(())),

            Command::Consume(arg) => arg
                .main()
                .await
                .inspect(|consumed| debug!(consumed))
                .and(Ok(())),

            Command::Dashboard(arg) => arg.main().await,
        }
    }
}
