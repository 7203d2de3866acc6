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

use async_trait::async_trait;
use chrono::Local;
use kafkainfo_client::{Client, ClusterMetadata};
use tracing::{debug, warn};

use crate::{
    Result,
    state::{Overview, Panels},
};

/// Somewhere to fetch a cluster snapshot from.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn metadata(&self) -> kafkainfo_client::Result<ClusterMetadata>;
}

#[async_trait]
impl MetadataSource for Client {
    async fn metadata(&self) -> kafkainfo_client::Result<ClusterMetadata> {
        Client::metadata(self).await
    }
}

/// A callback run on every refresh tick.
#[async_trait]
pub trait Refresh: Send {
    fn name(&self) -> &'static str;

    async fn refresh(&mut self, panels: &mut Panels) -> Result<()>;
}

/// The refresh callbacks owned by one dashboard, run in registration order.
#[derive(Default)]
pub struct RefreshRegistry {
    callbacks: Vec<Box<dyn Refresh>>,
}

impl std::fmt::Debug for RefreshRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.callbacks.iter().map(|callback| callback.name()))
            .finish()
    }
}

impl RefreshRegistry {
    pub fn register(&mut self, callback: impl Refresh + 'static) -> &mut Self {
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Run every callback, a failure does not stop the others. The status
    /// line shows the last failure, or is cleared when all succeed.
    pub async fn refresh(&mut self, panels: &mut Panels) -> usize {
        let mut failures = 0;
        let mut status = None;

        for callback in self.callbacks.iter_mut() {
            if let Err(err) = callback.refresh(panels).await {
                warn!(callback = callback.name(), %err);
                failures += 1;
                status = Some(format!("{}: {err}", callback.name()));
            }
        }

        debug!(failures);
        panels.status = status;
        failures
    }
}

/// Toggles the title border and shows the time of the last tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct TitleBlink;

#[async_trait]
impl Refresh for TitleBlink {
    fn name(&self) -> &'static str {
        "title"
    }

    async fn refresh(&mut self, panels: &mut Panels) -> Result<()> {
        panels.title.bordered = !panels.title.bordered;
        panels.title.label = Some(Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
        Ok(())
    }
}

/// Re-polls the cluster, keeping the previous overview on failure.
#[derive(Clone, Debug)]
pub struct ClusterPoll<S> {
    source: S,
}

impl<S> ClusterPoll<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S> Refresh for ClusterPoll<S>
where
    S: MetadataSource,
{
    fn name(&self) -> &'static str {
        "cluster"
    }

    async fn refresh(&mut self, panels: &mut Panels) -> Result<()> {
        let metadata = self.source.metadata().await?;
        panels.overview = Overview::from(&metadata);
        Ok(())
    }
}
