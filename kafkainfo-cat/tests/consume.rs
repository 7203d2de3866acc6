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

use std::{
    error, fmt,
    sync::{Arc, Mutex},
};

use bytes::Bytes;
use futures::{
    SinkExt as _,
    channel::mpsc::{self, Receiver, Sender, UnboundedReceiver},
    stream,
};
use kafkainfo_cat::{Consumed, Target, Termination, consume};
use kafkainfo_client::{Acknowledge, ConsumedMessage};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;

use crate::common::init_tracing;

mod common;

type TestResult<T = ()> = Result<T, Box<dyn error::Error>>;

#[derive(Debug)]
struct StreamError(&'static str);

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Records acknowledged offsets, optionally failing every acknowledgement.
#[derive(Debug, Default)]
struct Recorder {
    acknowledged: Mutex<Vec<i64>>,
    notify: Option<UnboundedSender<i64>>,
    failing: bool,
}

impl Recorder {
    fn notifying() -> (Self, tokio::sync::mpsc::UnboundedReceiver<i64>) {
        let (sender, receiver) = unbounded_channel();

        (
            Self {
                notify: Some(sender),
                ..Default::default()
            },
            receiver,
        )
    }

    fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    fn acknowledged(&self) -> Vec<i64> {
        self.acknowledged
            .lock()
            .map(|acknowledged| acknowledged.clone())
            .unwrap_or_default()
    }
}

impl Acknowledge for Recorder {
    fn acknowledge(&self, message: &ConsumedMessage) -> kafkainfo_client::Result<()> {
        if let Ok(mut acknowledged) = self.acknowledged.lock() {
            acknowledged.push(message.offset);
        }

        if let Some(ref notify) = self.notify {
            _ = notify.send(message.offset);
        }

        if self.failing {
            Err(kafkainfo_client::Error::UnknownTopic(message.topic.clone()))
        } else {
            Ok(())
        }
    }
}

fn message(partition: i32, offset: i64) -> ConsumedMessage {
    ConsumedMessage {
        topic: "beats".into(),
        partition,
        offset,
        key: Some(Bytes::from(format!("key-{offset}"))),
        value: Some(Bytes::from(format!("value-{offset}"))),
    }
}

fn target(count: u64) -> TestResult<Target> {
    Target::new(Some(count), false).map_err(|err| err.to_string().into())
}

fn no_errors() -> UnboundedReceiver<StreamError> {
    let (_sender, receiver) = mpsc::unbounded();
    receiver
}

fn channel() -> (Sender<ConsumedMessage>, Receiver<ConsumedMessage>) {
    mpsc::channel(16)
}

#[tokio::test]
async fn bounded_stops_at_target() -> TestResult {
    let (_guard, captured) = init_tracing()?;

    let messages = stream::iter([message(0, 10), message(0, 11), message(0, 12)]);
    let recorder = Recorder::default();

    let consumed = consume(
        target(3)?,
        messages,
        no_errors(),
        &recorder,
        CancellationToken::new(),
    )
    .await;

    assert_eq!(
        Consumed {
            count: 3,
            termination: Termination::TargetReached
        },
        consumed
    );
    assert_eq!(vec![10, 11, 12], recorder.acknowledged());

    assert_eq!(3, captured.lines_containing("topic=beats partition=0 offset="));
    assert_eq!(1, captured.lines_containing("total consumed: 3"));

    Ok(())
}

#[tokio::test]
async fn bounded_does_not_overshoot() -> TestResult {
    let (_guard, _captured) = init_tracing()?;

    let (mut sender, messages) = channel();
    for offset in 0..10 {
        sender.send(message(1, offset)).await?;
    }

    let recorder = Recorder::default();

    let consumed = consume(
        target(4)?,
        messages,
        no_errors(),
        &recorder,
        CancellationToken::new(),
    )
    .await;

    assert_eq!(4, consumed.count);
    assert_eq!(Termination::TargetReached, consumed.termination);
    assert_eq!(vec![0, 1, 2, 3], recorder.acknowledged());

    Ok(())
}

#[tokio::test]
async fn unbounded_until_interrupt() -> TestResult {
    let (_guard, captured) = init_tracing()?;

    let (mut sender, messages) = channel();
    let (recorder, mut acknowledged) = Recorder::notifying();
    let cancellation = CancellationToken::new();

    let driver = async {
        sender.send(message(0, 0)).await?;
        sender.send(message(0, 1)).await?;

        for _ in 0..2 {
            _ = acknowledged.recv().await;
        }

        cancellation.cancel();
        Ok::<_, Box<dyn error::Error>>(())
    };

    let (consumed, driven) = tokio::join!(
        consume(
            Target::Unbounded,
            messages,
            no_errors(),
            &recorder,
            cancellation.clone(),
        ),
        driver
    );
    driven?;

    assert_eq!(
        Consumed {
            count: 2,
            termination: Termination::Interrupted
        },
        consumed
    );
    assert_eq!(1, captured.lines_containing("total consumed: 2"));

    Ok(())
}

#[tokio::test]
async fn interrupt_before_target() -> TestResult {
    let (_guard, captured) = init_tracing()?;

    let (mut sender, messages) = channel();
    let (recorder, mut acknowledged) = Recorder::notifying();
    let cancellation = CancellationToken::new();

    let driver = async {
        sender.send(message(0, 40)).await?;
        sender.send(message(0, 41)).await?;

        for _ in 0..2 {
            _ = acknowledged.recv().await;
        }

        cancellation.cancel();
        Ok::<_, Box<dyn error::Error>>(())
    };

    let (consumed, driven) = tokio::join!(
        consume(
            target(5)?,
            messages,
            no_errors(),
            &recorder,
            cancellation.clone(),
        ),
        driver
    );
    driven?;

    assert_eq!(2, consumed.count);
    assert_eq!(Termination::Interrupted, consumed.termination);
    assert_eq!(vec![40, 41], recorder.acknowledged());
    assert_eq!(1, captured.lines_containing("total consumed: 2"));

    Ok(())
}

#[tokio::test]
async fn interrupt_wins_over_pending_messages() -> TestResult {
    let (_guard, _captured) = init_tracing()?;

    let (mut sender, messages) = channel();
    sender.send(message(0, 0)).await?;

    let cancellation = CancellationToken::new();
    cancellation.cancel();

    let recorder = Recorder::default();

    let consumed = consume(
        Target::Unbounded,
        messages,
        no_errors(),
        &recorder,
        cancellation,
    )
    .await;

    assert_eq!(0, consumed.count);
    assert_eq!(Termination::Interrupted, consumed.termination);
    assert!(recorder.acknowledged().is_empty());

    Ok(())
}

#[tokio::test]
async fn errors_neither_count_nor_terminate() -> TestResult {
    let (_guard, captured) = init_tracing()?;

    let (mut sender, messages) = channel();
    let (error_sender, errors) = mpsc::unbounded();
    let (recorder, mut acknowledged) = Recorder::notifying();
    let cancellation = CancellationToken::new();

    let driver = async {
        error_sender.unbounded_send(StreamError("broker transport failure"))?;
        error_sender.unbounded_send(StreamError("coordinator not available"))?;
        sender.send(message(2, 7)).await?;

        _ = acknowledged.recv().await;

        error_sender.unbounded_send(StreamError("leader not available"))?;
        sender.send(message(2, 8)).await?;

        _ = acknowledged.recv().await;

        Ok::<_, Box<dyn error::Error>>(())
    };

    let (consumed, driven) = tokio::join!(
        consume(target(2)?, messages, errors, &recorder, cancellation),
        driver
    );
    driven?;

    assert_eq!(2, consumed.count);
    assert_eq!(Termination::TargetReached, consumed.termination);
    assert_eq!(vec![7, 8], recorder.acknowledged());
    assert!(captured.contents().contains("broker transport failure"));

    Ok(())
}

#[tokio::test]
async fn errors_are_logged_during_a_backlog() -> TestResult {
    let (_guard, captured) = init_tracing()?;

    let (error_sender, errors) = mpsc::unbounded();
    error_sender.unbounded_send(StreamError("broker transport failure"))?;

    let messages = stream::iter((0..1000).map(|offset| message(0, offset)));
    let recorder = Recorder::default();

    let consumed = consume(
        target(1000)?,
        messages,
        errors,
        &recorder,
        CancellationToken::new(),
    )
    .await;

    assert_eq!(1000, consumed.count);
    assert_eq!(Termination::TargetReached, consumed.termination);

    let contents = captured.contents();
    let failure = contents
        .find("broker transport failure")
        .ok_or("error not logged")?;
    let first = contents
        .find("topic=beats partition=0 offset=0")
        .ok_or("message not logged")?;
    assert!(failure < first);

    Ok(())
}

#[tokio::test]
async fn error_stream_closing_is_not_fatal() -> TestResult {
    let (_guard, _captured) = init_tracing()?;

    let messages = stream::iter([message(0, 1), message(0, 2)]);
    let recorder = Recorder::default();

    let consumed = consume(
        target(2)?,
        messages,
        no_errors(),
        &recorder,
        CancellationToken::new(),
    )
    .await;

    assert_eq!(2, consumed.count);
    Ok(())
}

#[tokio::test]
async fn duplicate_acknowledgement_is_harmless() -> TestResult {
    let (_guard, _captured) = init_tracing()?;

    let messages = stream::iter([message(0, 5), message(0, 5), message(0, 6)]);
    let recorder = Recorder::default();

    let consumed = consume(
        target(3)?,
        messages,
        no_errors(),
        &recorder,
        CancellationToken::new(),
    )
    .await;

    assert_eq!(3, consumed.count);
    assert_eq!(vec![5, 5, 6], recorder.acknowledged());
    Ok(())
}

#[tokio::test]
async fn failed_acknowledgement_is_logged_and_skipped() -> TestResult {
    let (_guard, captured) = init_tracing()?;

    let messages = stream::iter([message(0, 1), message(0, 2)]);
    let recorder = Recorder::failing();

    let consumed = consume(
        target(2)?,
        messages,
        no_errors(),
        &recorder,
        CancellationToken::new(),
    )
    .await;

    assert_eq!(2, consumed.count);
    assert_eq!(Termination::TargetReached, consumed.termination);
    assert_eq!(2, captured.lines_containing("WARN"));
    Ok(())
}

#[tokio::test]
async fn exhausted_message_stream() -> TestResult {
    let (_guard, captured) = init_tracing()?;

    let messages = stream::iter([message(3, 100)]);
    let recorder = Recorder::default();

    let consumed = consume(
        Target::Unbounded,
        messages,
        no_errors(),
        &recorder,
        CancellationToken::new(),
    )
    .await;

    assert_eq!(
        Consumed {
            count: 1,
            termination: Termination::Exhausted
        },
        consumed
    );
    assert_eq!(1, captured.lines_containing("total consumed: 1"));
    Ok(())
}
