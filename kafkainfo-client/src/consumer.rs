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

use std::{fmt, sync::Arc, time::Duration};

use bytes::Bytes;
use futures::{
    SinkExt as _,
    channel::mpsc::{self, Receiver, Sender, UnboundedReceiver, UnboundedSender},
};
use rdkafka::{
    ClientContext, Message,
    consumer::{Consumer, ConsumerContext, StreamConsumer},
    error::KafkaError,
};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{Brokers, CLIENT_ID, Result};

/// messages buffered between the library stream and the consumer loop
const MESSAGE_BUFFER: usize = 64;

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ConsumedMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Bytes>,
    pub value: Option<Bytes>,
}

impl ConsumedMessage {
    pub fn key_lossy(&self) -> String {
        lossy(self.key.as_ref())
    }

    pub fn value_lossy(&self) -> String {
        lossy(self.value.as_ref())
    }
}

fn lossy(bytes: Option<&Bytes>) -> String {
    bytes
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}

impl<M> From<&M> for ConsumedMessage
where
    M: Message,
{
    fn from(value: &M) -> Self {
        Self {
            topic: value.topic().into(),
            partition: value.partition(),
            offset: value.offset(),
            key: value.key().map(Bytes::copy_from_slice),
            value: value.payload().map(Bytes::copy_from_slice),
        }
    }
}

/// Marks a message as processed, so that a later consumer in the same
/// group resumes after it.
pub trait Acknowledge {
    fn acknowledge(&self, message: &ConsumedMessage) -> Result<()>;
}

/// Forwards errors reported by the client library onto the error stream.
struct ForwardErrors {
    errors: UnboundedSender<KafkaError>,
}

impl ClientContext for ForwardErrors {
    fn error(&self, error: KafkaError, reason: &str) {
        debug!(?error, reason);

        if self.errors.unbounded_send(error).is_err() {
            warn!(reason, "error stream closed");
        }
    }
}

impl ConsumerContext for ForwardErrors {}

/// The receiving ends of a subscription.
#[derive(Debug)]
pub struct SubscriptionStreams {
    pub messages: Receiver<ConsumedMessage>,
    pub errors: UnboundedReceiver<KafkaError>,
}

/// A group consumer subscribed to one topic.
///
/// A background task pumps the library stream into [`SubscriptionStreams`].
/// Dropping the subscription stops the pump and closes the consumer, which
/// commits any stored offsets.
pub struct Subscription {
    consumer: Arc<StreamConsumer<ForwardErrors>>,
    pump: JoinHandle<()>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(stringify!(Subscription))
            .field("pump", &self.pump)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

impl Subscription {
    pub fn builder(brokers: Brokers, topic: impl Into<String>) -> Builder {
        Builder {
            brokers,
            topic: topic.into(),
            group_id: CLIENT_ID.into(),
            client_id: CLIENT_ID.into(),
            commit_interval: Duration::from_secs(1),
        }
    }
}

impl Acknowledge for Subscription {
    fn acknowledge(&self, message: &ConsumedMessage) -> Result<()> {
        // the committed offset is the next one to be read
        self.consumer
            .store_offset(&message.topic, message.partition, message.offset + 1)
            .map_err(Into::into)
    }
}

#[derive(Clone, Debug)]
pub struct Builder {
    brokers: Brokers,
    topic: String,
    group_id: String,
    client_id: String,
    commit_interval: Duration,
}

impl Builder {
    pub fn group_id(self, group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            ..self
        }
    }

    pub fn client_id(self, client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..self
        }
    }

    pub fn commit_interval(self, commit_interval: Duration) -> Self {
        Self {
            commit_interval,
            ..self
        }
    }

    /// subscribe to the topic, must be called within a tokio runtime
    pub fn build(self) -> Result<(Subscription, SubscriptionStreams)> {
        debug!(?self);

        let (error_sender, errors) = mpsc::unbounded();
        let (message_sender, messages) = mpsc::channel(MESSAGE_BUFFER);

        let consumer = self
            .brokers
            .client_config(&self.client_id)
            .set("group.id", &self.group_id)
            .set("enable.partition.eof", "false")
            .set("enable.auto.commit", "true")
            .set("enable.auto.offset.store", "false")
            .set(
                "auto.commit.interval.ms",
                self.commit_interval.as_millis().to_string(),
            )
            .set("auto.offset.reset", "earliest")
            .create_with_context::<_, StreamConsumer<ForwardErrors>>(ForwardErrors {
                errors: error_sender.clone(),
            })
            .map(Arc::new)?;

        consumer.subscribe(&[self.topic.as_str()])?;

        let pump = tokio::spawn(pump(consumer.clone(), message_sender, error_sender));

        Ok((
            Subscription { consumer, pump },
            SubscriptionStreams { messages, errors },
        ))
    }
}

async fn pump(
    consumer: Arc<StreamConsumer<ForwardErrors>>,
    mut messages: Sender<ConsumedMessage>,
    errors: UnboundedSender<KafkaError>,
) {
    loop {
        let received = consumer
            .recv()
            .await
            .map(|message| ConsumedMessage::from(&message));

        match received {
            Ok(message) => {
                if messages.send(message).await.is_err() {
                    debug!("message stream closed");
                    break;
                }
            }

            Err(error) => {
                if errors.unbounded_send(error).is_err() {
                    debug!("error stream closed");
                    break;
                }
            }
        }
    }
}
