//! Perch Board - 座位分配看板 (TUI)
//!
//! Run: cargo run -p perch-board [share-link]
//!
//! 纯本地模式 (链接 + 缓存) 下直接启动；设置 SEAT_SERVER_ADDR 后
//! 自动连接座位服务，所有修改实时同步到其他看板。

mod app;
mod cache;
mod clipboard;
mod config;
mod layout;
mod ui;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use perch_client::SeatFeed;
use ratatui::prelude::*;
use shared::models::{SeatMap, SeatRecord};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tui_input::backend::crossterm::EventHandler;

use app::App;
use clipboard::SystemClipboard;
use config::BoardConfig;

/// Events flowing from the remote feed task into the UI loop
enum RemoteEvent {
    Connected,
    Unavailable(String),
    Update(u64, SeatMap),
    PublishFailed(String),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Route tracing into the TUI log pane
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tui_logger::tracing_subscriber_layer())
        .with(env_filter)
        .init();
    tui_logger::init_logger(log::LevelFilter::Info).ok();
    tui_logger::set_default_level(log::LevelFilter::Info);

    let config = BoardConfig::from_env();
    // First positional argument: a pasted share link
    let link_arg = std::env::args().nth(1);

    // Remote feed plumbing (idle when no server is configured)
    let (remote_tx, remote_rx) = mpsc::unbounded_channel();
    let (publish_tx, publish_rx) = mpsc::unbounded_channel();
    if let Some(addr) = config.server_addr.clone() {
        let name = config.client_name.clone();
        tokio::spawn(run_remote(addr, name, remote_tx, publish_rx));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    app.finish_load(link_arg.as_deref());

    let res = run_app(&mut terminal, &mut app, remote_rx, publish_tx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

/// Connect to the seat server, attach the live feed, and pump saved
/// records out to the shared store. Ends when the board shuts down
/// (publish channel closed), releasing the subscription.
async fn run_remote(
    addr: String,
    client_name: String,
    remote_tx: mpsc::UnboundedSender<RemoteEvent>,
    mut publish_rx: mpsc::UnboundedReceiver<SeatRecord>,
) {
    let feed = match SeatFeed::connect(&addr, &client_name).await {
        Ok(feed) => {
            let _ = remote_tx.send(RemoteEvent::Connected);
            feed
        }
        Err(e) => {
            let _ = remote_tx.send(RemoteEvent::Unavailable(e.to_string()));
            return;
        }
    };

    let update_tx = remote_tx.clone();
    let subscription = match feed
        .subscribe(move |version, seats| {
            let _ = update_tx.send(RemoteEvent::Update(version, seats));
        })
        .await
    {
        Ok(sub) => sub,
        Err(e) => {
            let _ = remote_tx.send(RemoteEvent::Unavailable(e.to_string()));
            return;
        }
    };

    // Locally saved records flow to the shared store; failures surface
    // as a notice and are not retried.
    while let Some(record) = publish_rx.recv().await {
        if let Err(e) = feed.publish(&record).await {
            let _ = remote_tx.send(RemoteEvent::PublishFailed(e.to_string()));
        }
    }

    subscription.unsubscribe().await;
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    mut remote_rx: mpsc::UnboundedReceiver<RemoteEvent>,
    publish_tx: mpsc::UnboundedSender<SeatRecord>,
) -> io::Result<()> {
    loop {
        let now = Instant::now();
        terminal.draw(|f| ui::ui(f, app, now))?;

        let timeout = Duration::from_millis(100);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key)
                    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
                {
                    if app.editor.is_some() {
                        match key.code {
                            KeyCode::Enter => {
                                if let Some(record) = app.save_edit()
                                    && app.connected
                                {
                                    let _ = publish_tx.send(record);
                                }
                            }
                            KeyCode::Esc => app.cancel_edit(),
                            _ => {
                                if let Some(editor) = app.editor.as_mut() {
                                    editor.input.handle_event(&Event::Key(key));
                                }
                            }
                        }
                    } else {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                            KeyCode::Char('s') => {
                                let mut clipboard = SystemClipboard;
                                app.share_requested(&mut clipboard, Instant::now());
                            }
                            KeyCode::Left => app.cursor_prev(),
                            KeyCode::Right => app.cursor_next(),
                            KeyCode::Up => app.cursor_zone_prev(),
                            KeyCode::Down => app.cursor_zone_next(),
                            KeyCode::Enter => {
                                let (zone_id, seat_index) = app.cursor;
                                app.seat_clicked(zone_id, seat_index);
                            }
                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    // Clicks only land on seats while no edit form is open
                    if app.editor.is_none() {
                        let size = terminal.size()?;
                        let chunks =
                            layout::split_frame(Rect::new(0, 0, size.width, size.height));
                        if let Some((zone_id, seat_index)) =
                            layout::hit_test(chunks.floor, mouse.column, mouse.row)
                        {
                            app.seat_clicked(zone_id, seat_index);
                        }
                    }
                }
                _ => {}
            }
        }

        // Drain remote events (non-blocking)
        while let Ok(remote_event) = remote_rx.try_recv() {
            match remote_event {
                RemoteEvent::Connected => {
                    app.set_connected(true);
                    tracing::info!("Connected to seat server");
                }
                RemoteEvent::Unavailable(reason) => {
                    app.set_connected(false);
                    app.push_notice(format!("Seat server unavailable: {}", reason), Instant::now());
                }
                RemoteEvent::Update(version, seats) => app.apply_remote(version, seats),
                RemoteEvent::PublishFailed(reason) => {
                    app.push_notice(format!("Sync failed: {}", reason), Instant::now());
                }
            }
        }
    }
}
