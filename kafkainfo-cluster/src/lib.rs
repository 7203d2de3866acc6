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

//! Kafkainfo Cluster
//!
//! Query the cluster: list topics, find the leader of a partition, list the
//! partitions of a topic, or enumerate the brokers. Results are written to
//! stdout as JSON.

use std::{fmt, marker::PhantomData, result};

use brokers::Brokers;
use kafkainfo_client::{Client, ClusterMetadata};
use leader::Leader;
use partitions::Partitions;
use topics::Topics;
use tracing::debug;

mod brokers;
mod leader;
mod partitions;
mod topics;

pub type Result<T, E = Error> = result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    Client(#[from] kafkainfo_client::Error),
    SerdeJson(#[from] serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Cluster {
    Brokers(brokers::Configuration),
    Leader(leader::Configuration),
    Partitions(partitions::Configuration),
    Topics(topics::Configuration),
}

impl Cluster {
    pub fn brokers() -> brokers::Builder<PhantomData<kafkainfo_client::Brokers>> {
        brokers::Builder::default()
    }

    pub fn leader() -> leader::Builder<
        PhantomData<kafkainfo_client::Brokers>,
        PhantomData<String>,
        PhantomData<i32>,
    > {
        leader::Builder::default()
    }

    pub fn partitions()
    -> partitions::Builder<PhantomData<kafkainfo_client::Brokers>, PhantomData<String>> {
        partitions::Builder::default()
    }

    pub fn topics() -> topics::Builder<PhantomData<kafkainfo_client::Brokers>> {
        topics::Builder::default()
    }

    pub async fn main(self) -> Result<()> {
        let rendered = match self {
            Self::Brokers(configuration) => Brokers::from(configuration).main().await,
            Self::Leader(configuration) => Leader::from(configuration).main().await,
            Self::Partitions(configuration) => Partitions::from(configuration).main().await,
            Self::Topics(configuration) => Topics::from(configuration).main().await,
        }?;

        println!("{rendered}");
        Ok(())
    }
}

pub(crate) async fn metadata(broker: kafkainfo_client::Brokers) -> Result<ClusterMetadata> {
    Client::builder(broker)
        .build()
        .inspect(|client| debug!(?client))?
        .metadata()
        .await
        .map_err(Into::into)
}
