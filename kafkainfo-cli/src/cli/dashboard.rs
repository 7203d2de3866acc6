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

use std::time::Duration;

use crate::Result;
use clap::Args;
use kafkainfo_client::Brokers;
use kafkainfo_dashboard::Dashboard;

use super::BrokerArg;

#[derive(Clone, Debug, Args)]
pub(super) struct Arg {
    #[command(flatten)]
    broker: BrokerArg,

    /// Milliseconds between refreshes of the cluster state
    #[arg(long, default_value = "1000")]
    interval_ms: u64,
}

impl Arg {
    pub(super) async fn main(self) -> Result<()> {
        let interval = Duration::from_millis(self.interval_ms);

        Brokers::try_from(self.broker)
            .map(|broker| Dashboard::builder().broker(broker).interval(interval).build())?
            .main()
            .await
            .map_err(Into::into)
    }
}
