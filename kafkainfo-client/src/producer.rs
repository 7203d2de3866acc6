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

use std::{fmt, time::Duration};

use rdkafka::producer::{FutureProducer, FutureRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Brokers, CLIENT_ID, DEFAULT_TIMEOUT, Result};

/// Where a produced message landed.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Delivery {
    pub partition: i32,
    pub offset: i64,
}

/// A producer that waits for each delivery before returning.
#[derive(Clone)]
pub struct Producer {
    producer: FutureProducer,
    timeout: Duration,
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(stringify!(Producer))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Producer {
    pub fn builder(brokers: Brokers) -> Builder {
        Builder {
            brokers,
            client_id: CLIENT_ID.into(),
            partitioner: "random".into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub async fn send(&self, topic: &str, key: &[u8], value: &[u8]) -> Result<Delivery> {
        self.producer
            .send(
                FutureRecord::to(topic).key(key).payload(value),
                self.timeout,
            )
            .await
            .map(|(partition, offset)| Delivery { partition, offset })
            .inspect(|delivery| debug!(?delivery))
            .map_err(|(error, message)| {
                debug!(?message);
                error.into()
            })
    }
}

#[derive(Clone, Debug)]
pub struct Builder {
    brokers: Brokers,
    client_id: String,
    partitioner: String,
    timeout: Duration,
}

impl Builder {
    pub fn client_id(self, client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..self
        }
    }

    /// an rdkafka partitioner name, for example `random` or `consistent_random`
    pub fn partitioner(self, partitioner: impl Into<String>) -> Self {
        Self {
            partitioner: partitioner.into(),
            ..self
        }
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn build(self) -> Result<Producer> {
        debug!(?self);

        self.brokers
            .client_config(&self.client_id)
            .set("partitioner", &self.partitioner)
            .set("acks", "all")
            .set("message.timeout.ms", self.timeout.as_millis().to_string())
            .create::<FutureProducer>()
            .map(|producer| Producer {
                producer,
                timeout: self.timeout,
            })
            .map_err(Into::into)
    }
}
