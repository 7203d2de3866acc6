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
    io::{self, Stdout},
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::{
    Result,
    registry::{ClusterPoll, MetadataSource, RefreshRegistry, TitleBlink},
    state::{Overview, Panels},
    ui,
};

/// Raw mode and the alternate screen, restored when dropped.
struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Screen {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();

        execute!(stdout, EnterAlternateScreen).inspect_err(|_| {
            _ = disable_raw_mode();
        })?;

        Terminal::new(CrosstermBackend::new(stdout))
            .map(|terminal| Self { terminal })
            .inspect_err(|_| {
                _ = disable_raw_mode();
            })
            .map_err(Into::into)
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let restored = disable_raw_mode()
            .and_then(|()| execute!(self.terminal.backend_mut(), LeaveAlternateScreen))
            .and_then(|()| self.terminal.show_cursor());

        debug!(?restored);
    }
}

/// Render the cluster until a key is pressed.
///
/// The first snapshot is fetched before the terminal is taken over, so an
/// unreachable cluster is reported as an ordinary error.
pub(crate) async fn run<S>(source: S, interval: Duration) -> Result<()>
where
    S: MetadataSource + 'static,
{
    let mut panels = Panels {
        overview: source
            .metadata()
            .await
            .map(|metadata| Overview::from(&metadata))?,
        ..Default::default()
    };

    let mut registry = RefreshRegistry::default();
    _ = registry
        .register(TitleBlink)
        .register(ClusterPoll::new(source));
    debug!(?registry);

    let mut screen = Screen::enter()?;
    let mut refreshed = Instant::now();

    loop {
        _ = screen.terminal.draw(|frame| ui::draw(frame, &panels))?;

        if event::poll(interval.saturating_sub(refreshed.elapsed()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    debug!(?key);
                    break;
                }
            }
        }

        if refreshed.elapsed() >= interval {
            _ = registry.refresh(&mut panels).await;
            refreshed = Instant::now();
        }
    }

    Ok(())
}
