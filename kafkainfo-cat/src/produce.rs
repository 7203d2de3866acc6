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

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use kafkainfo_client::{Brokers, Delivery, Producer};
use tracing::{debug, error, info};

use crate::{Error, Result};

pub(crate) const DEFAULT_MESSAGE: &str = "this is kafkainfo test";

/// Somewhere to synchronously deliver a single message.
#[async_trait]
pub trait Publish {
    async fn publish(&self, topic: &str, key: &[u8], value: &[u8]) -> Result<Delivery>;
}

#[async_trait]
impl Publish for Producer {
    async fn publish(&self, topic: &str, key: &[u8], value: &[u8]) -> Result<Delivery> {
        self.send(topic, key, value).await.map_err(Into::into)
    }
}

/// Publish `count` copies of `value`, each keyed by the current time,
/// stopping at the first failure. Returns the number delivered.
pub async fn produce<P>(publisher: &P, topic: &str, value: &str, count: u64) -> u64
where
    P: Publish + ?Sized + Sync,
{
    let mut produced = 0;

    for _ in 0..count {
        let key = Utc::now().to_rfc3339();

        match publisher
            .publish(topic, key.as_bytes(), value.as_bytes())
            .await
        {
            Ok(Delivery { partition, offset }) => {
                produced += 1;
                info!(topic, partition, offset);
            }

            Err(err) => {
                error!(%err, topic);
                break;
            }
        }
    }

    info!("total produced: {produced}");
    produced
}

#[derive(Clone, Debug, Default)]
pub struct Builder<B, T> {
    broker: B,
    topic: T,
    message: Option<String>,
    count: i64,
}

pub(crate) type PhantomBuilder = Builder<PhantomData<Brokers>, PhantomData<String>>;

impl<B, T> Builder<B, T> {
    pub fn broker(self, broker: Brokers) -> Builder<Brokers, T> {
        Builder {
            broker,
            topic: self.topic,
            message: self.message,
            count: self.count,
        }
    }

    pub fn topic(self, topic: impl Into<String>) -> Builder<B, String> {
        Builder {
            broker: self.broker,
            topic: topic.into(),
            message: self.message,
            count: self.count,
        }
    }

    pub fn message(self, message: Option<String>) -> Self {
        Self { message, ..self }
    }

    pub fn count(self, count: i64) -> Self {
        Self { count, ..self }
    }
}

impl Builder<Brokers, String> {
    pub fn build(self) -> super::Cat {
        super::Cat::Produce(Box::new(Configuration {
            broker: self.broker,
            topic: self.topic,
            message: self
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| DEFAULT_MESSAGE.into()),
            count: u64::try_from(self.count)
                .ok()
                .filter(|count| *count > 0)
                .unwrap_or(1),
        }))
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Configuration {
    broker: Brokers,
    topic: String,
    message: String,
    count: u64,
}

#[derive(Clone, Debug)]
pub(crate) struct Produce {
    configuration: Configuration,
    producer: Producer,
}

impl TryFrom<Configuration> for Produce {
    type Error = Error;

    fn try_from(configuration: Configuration) -> Result<Self, Self::Error> {
        Producer::builder(configuration.broker.clone())
            .build()
            .map(|producer| Self {
                configuration,
                producer,
            })
            .map_err(Into::into)
    }
}

impl Produce {
    pub(crate) async fn main(self) -> Result<u64> {
        debug!(?self);

        Ok(produce(
            &self.producer,
            &self.configuration.topic,
            &self.configuration.message,
            self.configuration.count,
        )
        .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cat;
    use pretty_assertions::assert_eq;
    use url::Url;

    type TestResult<T = ()> = std::result::Result<T, Box<dyn std::error::Error>>;

    fn configuration(message: Option<String>, count: i64) -> TestResult<Configuration> {
        let cat = Cat::produce()
            .broker(Brokers::try_from(Url::parse("tcp://localhost:9092")?)?)
            .topic("beats")
            .message(message)
            .count(count)
            .build();

        match cat {
            Cat::Produce(configuration) => Ok(*configuration),
            Cat::Consume(configuration) => Err(format!("{configuration:?}").into()),
        }
    }

    #[test]
    fn defaults() -> TestResult {
        let configuration = configuration(None, 0)?;

        assert_eq!(DEFAULT_MESSAGE, configuration.message);
        assert_eq!(1, configuration.count);
        Ok(())
    }

    #[test]
    fn empty_message_is_replaced() -> TestResult {
        assert_eq!(DEFAULT_MESSAGE, configuration(Some("".into()), 1)?.message);
        Ok(())
    }

    #[test]
    fn negative_count_produces_one() -> TestResult {
        assert_eq!(1, configuration(Some("hello".into()), -4)?.count);
        Ok(())
    }

    #[test]
    fn message_and_count() -> TestResult {
        let configuration = configuration(Some("hello".into()), 7)?;

        assert_eq!("hello", configuration.message);
        assert_eq!(7, configuration.count);
        Ok(())
    }
}
