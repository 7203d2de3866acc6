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

use std::{fmt::Display, marker::PhantomData, num::NonZeroU64};

use futures::{Stream, StreamExt as _};
use kafkainfo_client::{Acknowledge, Brokers, ConsumedMessage, Subscription};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{Error, Result};

/// How many messages to consume before stopping.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Target {
    Bounded(NonZeroU64),
    Unbounded,
}

impl Target {
    /// A positive count is bounded, otherwise forever must be set.
    pub fn new(count: Option<u64>, forever: bool) -> Result<Self> {
        match (count.and_then(NonZeroU64::new), forever) {
            (Some(count), _) => Ok(Self::Bounded(count)),
            (None, true) => Ok(Self::Unbounded),
            (None, false) => Err(Error::Target),
        }
    }

    fn reached(&self, consumed: u64) -> bool {
        match self {
            Self::Bounded(count) => consumed >= count.get(),
            Self::Unbounded => false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Termination {
    TargetReached,
    Interrupted,

    /// the message stream ended
    Exhausted,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Consumed {
    pub count: u64,
    pub termination: Termination,
}

impl Consumed {
    fn report(count: u64, termination: Termination) -> Self {
        info!(?termination, "total consumed: {count}");

        Self { count, termination }
    }
}

/// Consume messages until the target is reached, the message stream ends,
/// or the cancellation token fires.
///
/// Every message is logged and acknowledged before the target is checked.
/// Errors are logged and never count towards the target.
pub async fn consume<M, E, A>(
    target: Target,
    mut messages: M,
    mut errors: E,
    acknowledger: &A,
    cancellation: CancellationToken,
) -> Consumed
where
    M: Stream<Item = ConsumedMessage> + Unpin,
    E: Stream + Unpin,
    E::Item: Display,
    A: Acknowledge + ?Sized,
{
    debug!(?target);

    let mut consumed = 0u64;

    loop {
        tokio::select! {
            biased;

            _ = cancellation.cancelled() => {
                return Consumed::report(consumed, Termination::Interrupted)
            }

            // errors ahead of messages, a backlog must not hide them
            Some(err) = errors.next() => {
                error!(%err);
            }

            message = messages.next() => {
                let Some(message) = message else {
                    return Consumed::report(consumed, Termination::Exhausted)
                };

                consumed += 1;

                info!(
                    topic = %message.topic,
                    partition = message.partition,
                    offset = message.offset,
                    key = %message.key_lossy(),
                    value = %message.value_lossy(),
                );

                if let Err(err) = acknowledger.acknowledge(&message) {
                    warn!(%err, topic = %message.topic, partition = message.partition, offset = message.offset);
                }

                if target.reached(consumed) {
                    return Consumed::report(consumed, Termination::TargetReached)
                }
            }
        }
    }
}

/// A token cancelled on the first interrupt (or terminate on unix).
///
/// Signal handlers are registered before returning, so an interrupt that
/// arrives while the caller is still setting up is not lost.
pub fn interrupt() -> Result<CancellationToken> {
    let token = CancellationToken::new();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut interrupt_signal = signal(SignalKind::interrupt())?;
        debug!(?interrupt_signal);

        let mut terminate_signal = signal(SignalKind::terminate())?;
        debug!(?terminate_signal);

        let token = token.clone();

        _ = tokio::spawn(async move {
            tokio::select! {
                interrupted = interrupt_signal.recv() => debug!(?interrupted),
                terminated = terminate_signal.recv() => debug!(?terminated),
                _ = token.cancelled() => return,
            }

            token.cancel();
        });
    }

    #[cfg(not(unix))]
    {
        let token = token.clone();

        _ = tokio::spawn(async move {
            tokio::select! {
                interrupted = tokio::signal::ctrl_c() => debug!(?interrupted),
                _ = token.cancelled() => return,
            }

            token.cancel();
        });
    }

    Ok(token)
}

#[derive(Clone, Debug, Default)]
pub struct Builder<B, T, G> {
    broker: B,
    topic: T,
    target: G,
}

pub(crate) type PhantomBuilder =
    Builder<PhantomData<Brokers>, PhantomData<String>, PhantomData<Target>>;

impl<B, T, G> Builder<B, T, G> {
    pub fn broker(self, broker: Brokers) -> Builder<Brokers, T, G> {
        Builder {
            broker,
            topic: self.topic,
            target: self.target,
        }
    }

    pub fn topic(self, topic: impl Into<String>) -> Builder<B, String, G> {
        Builder {
            broker: self.broker,
            topic: topic.into(),
            target: self.target,
        }
    }

    pub fn target(self, target: Target) -> Builder<B, T, Target> {
        Builder {
            broker: self.broker,
            topic: self.topic,
            target,
        }
    }
}

impl Builder<Brokers, String, Target> {
    pub fn build(self) -> super::Cat {
        super::Cat::Consume(Box::new(Configuration {
            broker: self.broker,
            topic: self.topic,
            target: self.target,
        }))
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Configuration {
    broker: Brokers,
    topic: String,
    target: Target,
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Consume {
    configuration: Configuration,
}

impl TryFrom<Configuration> for Consume {
    type Error = Error;

    fn try_from(configuration: Configuration) -> Result<Self, Self::Error> {
        Ok(Self { configuration })
    }
}

impl Consume {
    pub(crate) async fn main(self) -> Result<u64> {
        let (subscription, streams) =
            Subscription::builder(self.configuration.broker, self.configuration.topic)
                .build()
                .inspect(|(subscription, _)| debug!(?subscription))?;

        let cancellation = interrupt()?;

        let consumed = consume(
            self.configuration.target,
            streams.messages,
            streams.errors,
            &subscription,
            cancellation.clone(),
        )
        .await;

        // release the signal listener
        cancellation.cancel();

        Ok(consumed.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_count_is_bounded() -> Result<()> {
        assert_eq!(
            Target::Bounded(NonZeroU64::new(3).ok_or(Error::Target)?),
            Target::new(Some(3), false)?
        );
        Ok(())
    }

    #[test]
    fn count_takes_precedence_over_forever() -> Result<()> {
        assert!(matches!(
            Target::new(Some(5), true)?,
            Target::Bounded(count) if count.get() == 5
        ));
        Ok(())
    }

    #[test]
    fn forever_is_unbounded() -> Result<()> {
        assert_eq!(Target::Unbounded, Target::new(None, true)?);
        assert_eq!(Target::Unbounded, Target::new(Some(0), true)?);
        Ok(())
    }

    #[test]
    fn neither_count_nor_forever() {
        assert!(matches!(Target::new(None, false), Err(Error::Target)));
        assert!(matches!(Target::new(Some(0), false), Err(Error::Target)));
    }

    #[test]
    fn bounded_target_reached_exactly() -> Result<()> {
        let target = Target::new(Some(2), false)?;

        assert!(!target.reached(1));
        assert!(target.reached(2));
        Ok(())
    }

    #[test]
    fn unbounded_never_reached() {
        assert!(!Target::Unbounded.reached(u64::MAX));
    }
}
