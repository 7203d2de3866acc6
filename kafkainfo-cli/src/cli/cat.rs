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
use kafkainfo_cat::{Cat, Target};
use kafkainfo_client::Brokers;

use super::BrokerArg;

#[derive(Clone, Debug, Args)]
pub(super) struct Produce {
    #[command(flatten)]
    broker: BrokerArg,

    /// The topic to produce to
    #[arg(long)]
    topic: String,

    /// The message value, a default test message when absent
    #[arg(long)]
    message: Option<String>,

    /// The number of messages, values less than one produce a single message
    #[arg(long, default_value = "1", allow_negative_numbers = true)]
    count: i64,
}

impl TryFrom<Produce> for Cat {
    type Error = crate::Error;

    fn try_from(value: Produce) -> Result<Self, Self::Error> {
        Brokers::try_from(value.broker).map(|broker| {
            Cat::produce()
                .broker(broker)
                .topic(value.topic)
                .message(value.message)
                .count(value.count)
                .build()
        })
    }
}

impl Produce {
    pub(super) async fn main(self) -> Result<u64> {
        Cat::try_from(self)?.main().await.map_err(Into::into)
    }
}

#[derive(Clone, Debug, Args)]
pub(super) struct Consume {
    #[command(flatten)]
    broker: BrokerArg,

    /// The topic to consume from
    #[arg(long)]
    topic: String,

    /// Stop after consuming this many messages
    #[arg(long, conflicts_with = "forever")]
    count: Option<u64>,

    /// Consume until interrupted
    #[arg(long)]
    forever: bool,
}

impl TryFrom<Consume> for Cat {
    type Error = crate::Error;

    fn try_from(value: Consume) -> Result<Self, Self::Error> {
        let target = Target::new(value.count, value.forever)?;

        Brokers::try_from(value.broker).map(|broker| {
            Cat::consume()
                .broker(broker)
                .topic(value.topic)
                .target(target)
                .build()
        })
    }
}

impl Consume {
    pub(super) async fn main(self) -> Result<u64> {
        Cat::try_from(self)?.main().await.map_err(Into::into)
    }
}
