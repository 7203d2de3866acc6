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

//! Kafkainfo Dashboard
//!
//! A terminal overview of the cluster: brokers, topics, partition counts and
//! partition leaders, polled on a fixed interval until any key is pressed.
//!
//! - [`state`] what is on screen
//! - [`registry`] the callbacks run on every refresh tick
//! - [`ui`] rendering of [`state::Panels`]

use std::{fmt, io, marker::PhantomData, result, sync::Arc, time::Duration};

use kafkainfo_client::{Brokers, Client};
use tracing::debug;

mod app;
pub mod registry;
pub mod state;
pub mod ui;

pub use registry::{ClusterPoll, MetadataSource, Refresh, RefreshRegistry, TitleBlink};
pub use state::{BrokerRow, Overview, Panels, Title, TopicRow};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

pub type Result<T, E = Error> = result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    Client(#[from] kafkainfo_client::Error),
    Io(Arc<io::Error>),
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Dashboard {
    broker: Brokers,
    interval: Duration,
}

impl Dashboard {
    pub fn builder() -> Builder<PhantomData<Brokers>> {
        Builder::default()
    }

    pub async fn main(self) -> Result<()> {
        let client = Client::builder(self.broker)
            .build()
            .inspect(|client| debug!(?client))?;

        app::run(client, self.interval).await
    }
}

#[derive(Clone, Debug)]
pub struct Builder<B> {
    broker: B,
    interval: Duration,
}

impl Default for Builder<PhantomData<Brokers>> {
    fn default() -> Self {
        Self {
            broker: PhantomData,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl<B> Builder<B> {
    pub fn broker(self, broker: Brokers) -> Builder<Brokers> {
        Builder {
            broker,
            interval: self.interval,
        }
    }

    /// a zero interval falls back to the default
    pub fn interval(self, interval: Duration) -> Self {
        Self {
            interval: if interval.is_zero() {
                DEFAULT_INTERVAL
            } else {
                interval
            },
            ..self
        }
    }
}

impl Builder<Brokers> {
    pub fn build(self) -> Dashboard {
        Dashboard {
            broker: self.broker,
            interval: self.interval,
        }
    }
}
