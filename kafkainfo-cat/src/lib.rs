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

//! Kafkainfo Cat
//!
//! Produce test messages to a topic, or consume messages from a topic until
//! a count is reached or the process is interrupted.

use std::{fmt, io, result, sync::Arc};

use consume::Consume;
use produce::Produce;

mod consume;
mod produce;

pub use consume::{Consumed, Target, Termination, consume, interrupt};
pub use produce::{Publish, produce};

pub type Result<T, E = Error> = result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    Client(#[from] kafkainfo_client::Error),
    Io(Arc<io::Error>),

    /// neither a positive count nor forever was requested
    Target,
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
pub enum Cat {
    Consume(Box<consume::Configuration>),
    Produce(Box<produce::Configuration>),
}

impl Cat {
    pub fn produce() -> produce::PhantomBuilder {
        Builder::produce()
    }

    pub fn consume() -> consume::PhantomBuilder {
        Builder::consume()
    }

    /// the number of messages produced or consumed
    pub async fn main(self) -> Result<u64> {
        match self {
            Self::Produce(configuration) => Produce::try_from(*configuration)?.main().await,
            Self::Consume(configuration) => Consume::try_from(*configuration)?.main().await,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Builder;

impl Builder {
    pub fn produce() -> produce::PhantomBuilder {
        produce::Builder::default()
    }

    pub fn consume() -> consume::PhantomBuilder {
        consume::Builder::default()
    }
}
