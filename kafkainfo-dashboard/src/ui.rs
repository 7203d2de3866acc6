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

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table},
};

use crate::state::{Overview, Panels, TITLE, Title};

pub fn draw(frame: &mut Frame<'_>, panels: &Panels) {
    let broker_rows = u16::try_from(panels.overview.brokers.len()).unwrap_or(u16::MAX);

    let [title, brokers, topics, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(broker_rows.saturating_add(2)),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_title(frame, &panels.title, title);
    draw_brokers(frame, &panels.overview, brokers);
    draw_topics(frame, &panels.overview, topics);
    draw_status(frame, panels.status.as_deref(), status);
}

fn draw_title(frame: &mut Frame<'_>, title: &Title, area: Rect) {
    let mut block = Block::default()
        .borders(if title.bordered {
            Borders::ALL
        } else {
            Borders::NONE
        })
        .border_style(Style::default().fg(Color::Cyan));

    if let Some(ref label) = title.label {
        block = block.title(format!(" {label} "));
    }

    frame.render_widget(
        Paragraph::new(TITLE)
            .style(Style::default().fg(Color::Cyan))
            .block(block),
        area,
    );
}

fn draw_brokers(frame: &mut Frame<'_>, overview: &Overview, area: Rect) {
    let [addrs, ids] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    let list = |title: &'static str, items: Vec<ListItem<'static>>| {
        List::new(items)
            .style(Style::default().fg(Color::Cyan))
            .block(
                Block::bordered()
                    .title(title)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
    };

    frame.render_widget(
        list(
            "broker addresses",
            overview
                .brokers
                .iter()
                .map(|broker| ListItem::new(broker.addr.clone()))
                .collect(),
        ),
        addrs,
    );

    frame.render_widget(
        list(
            "broker ids",
            overview
                .brokers
                .iter()
                .map(|broker| ListItem::new(broker.id.to_string()))
                .collect(),
        ),
        ids,
    );
}

fn draw_topics(frame: &mut Frame<'_>, overview: &Overview, area: Rect) {
    let rows = overview.topics.iter().map(|topic| {
        Row::new([
            topic.name.clone(),
            topic.partitions.to_string(),
            topic.leaders.join(" "),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Length(12),
            Constraint::Min(20),
        ],
    )
    .header(
        Row::new(["topic", "partitions", "partition leaders"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .style(Style::default().fg(Color::Cyan))
    .block(
        Block::bordered()
            .title("topics")
            .border_style(Style::default().fg(Color::Yellow)),
    );

    frame.render_widget(table, area);
}

fn draw_status(frame: &mut Frame<'_>, status: Option<&str>, area: Rect) {
    let line = match status {
        Some(status) => Line::styled(status.to_owned(), Style::default().fg(Color::Red)),
        None => Line::styled("ok", Style::default().fg(Color::Green)),
    };

    frame.render_widget(Paragraph::new(line), area);
}
