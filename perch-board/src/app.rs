//! Root coordinator
//!
//! Owns the in-memory seat map and wires the persistence paths together:
//!
//! - Startup: share link (if one was passed) > local cache > empty map.
//! - Every change: re-encode the share link and overwrite the local
//!   cache. Skipped entirely while the map is empty.
//! - When connected to a seat server, saves are also published there and
//!   every pushed update replaces the map wholesale (last committed
//!   write wins; there is deliberately no merge).
//!
//! The "copied" confirmation is a deadline held in app state and checked
//! at render time, so it dies with the app instead of living in a
//! detached timer.

use std::time::{Duration, Instant};

use shared::link;
use shared::models::{SeatMap, SeatRecord};
use tui_input::Input;

use crate::cache::SeatCache;
use crate::clipboard::Clipboard;
use crate::config::BoardConfig;

/// How long the share button shows "Link Copied"
pub const COPIED_CONFIRMATION: Duration = Duration::from_secs(2);

/// How long a footer notice stays visible
const NOTICE_DURATION: Duration = Duration::from_secs(4);

/// Coordinator states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 启动中，尚未完成首次加载
    Loading,
    /// 正常运行 (所有加载失败都降级为空座位图，没有错误态)
    Ready,
}

/// The edit form for one clicked seat
#[derive(Debug)]
pub struct SeatEditor {
    /// The record being edited (map untouched until save)
    pub record: SeatRecord,
    /// Occupant name input field
    pub input: Input,
}

/// A transient footer notice
#[derive(Debug)]
pub struct Notice {
    pub text: String,
    until: Instant,
}

/// 看板应用状态
pub struct App {
    pub phase: Phase,
    /// The seat map, single source of truth for rendering
    pub seats: SeatMap,
    /// Version of the last remote update applied (0 while offline)
    pub plan_version: u64,
    /// Keyboard cursor (zone id, seat index)
    pub cursor: (u32, u32),
    /// Open edit form, if a seat was clicked
    pub editor: Option<SeatEditor>,
    /// The current shareable link (reflects `seats` after every change)
    pub share_link: String,
    /// Deadline until which the share button reads "Link Copied"
    pub copied_until: Option<Instant>,
    /// Transient footer notice
    pub notice: Option<Notice>,
    /// Whether the live feed is attached
    pub connected: bool,
    pub config: BoardConfig,
    cache: SeatCache,
}

impl App {
    /// A fresh, not-yet-loaded app
    pub fn new(config: BoardConfig) -> Self {
        let cache = SeatCache::new(config.cache_path());
        let share_link = config.share_base_url.clone();
        Self {
            phase: Phase::Loading,
            seats: SeatMap::new(),
            plan_version: 0,
            cursor: (0, 0),
            editor: None,
            share_link,
            copied_until: None,
            notice: None,
            connected: false,
            config,
            cache,
        }
    }

    /// Perform the one-time startup load: share link > cache > empty.
    ///
    /// Every failure on the way (bad link, unreadable cache) degrades to
    /// the next source; there is no error state.
    pub fn finish_load(&mut self, link_arg: Option<&str>) {
        let seats = link_arg
            .and_then(link::decode)
            .or_else(|| self.cache.load())
            .unwrap_or_default();

        self.seats = seats;
        self.phase = Phase::Ready;
        self.refresh_share_link();

        tracing::info!(
            seats = self.seats.len(),
            occupied = self.seats.occupied_count(),
            "Board ready"
        );
    }

    // ========== Seat interaction ==========

    /// A seat was clicked: open the edit form pre-filled with the current
    /// record (or a blank default). No seat map side effect until save.
    pub fn seat_clicked(&mut self, zone_id: u32, seat_index: u32) {
        if self.phase != Phase::Ready {
            return;
        }
        self.cursor = (zone_id, seat_index);
        let record = self.seats.get_or_vacant(zone_id, seat_index);
        let input = Input::new(record.occupant_name.clone());
        self.editor = Some(SeatEditor { record, input });
    }

    /// Close the edit form without saving
    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    /// Confirm the edit form: merge the record into the map and run the
    /// persistence side effect. Returns the saved record so the caller
    /// can publish it to the seat server.
    pub fn save_edit(&mut self) -> Option<SeatRecord> {
        let editor = self.editor.take()?;
        let record = SeatRecord {
            occupant_name: editor.input.value().trim().to_string(),
            ..editor.record
        };

        let id = self.seats.assign(record.clone());
        self.persist();

        tracing::info!(seat = %id, occupant = %record.occupant_name, "Seat saved");
        Some(record)
    }

    /// A remote update arrived: the server state replaces the local map
    /// wholesale and the link/cache side effect re-runs.
    pub fn apply_remote(&mut self, version: u64, seats: SeatMap) {
        self.plan_version = version;
        self.seats = seats;
        self.persist();
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    // ========== Share action ==========

    /// Encode the current map, copy the link to the clipboard, and start
    /// the 2-second confirmation. Clipboard failure is best-effort: one
    /// footer notice, nothing else.
    pub fn share_requested(&mut self, clipboard: &mut dyn Clipboard, now: Instant) {
        let url = match link::encode(&self.seats, &self.config.share_base_url) {
            Ok(url) => url,
            Err(e) => {
                self.push_notice(format!("Share link failed: {}", e), now);
                return;
            }
        };
        self.share_link = url.clone();

        match clipboard.copy(&url) {
            Ok(()) => self.copied_until = Some(now + COPIED_CONFIRMATION),
            Err(e) => self.push_notice(format!("Clipboard unavailable: {}", e), now),
        }
    }

    /// Whether the share button should read "Link Copied" right now
    pub fn copied_active(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }

    // ========== Notices ==========

    pub fn push_notice(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        tracing::warn!("{}", text);
        self.notice = Some(Notice {
            text,
            until: now + NOTICE_DURATION,
        });
    }

    /// The footer notice, if one is still live
    pub fn notice_text(&self, now: Instant) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| now < n.until)
            .map(|n| n.text.as_str())
    }

    // ========== Cursor movement ==========

    pub fn cursor_next(&mut self) {
        self.cursor = crate::layout::seat_after(self.cursor.0, self.cursor.1);
    }

    pub fn cursor_prev(&mut self) {
        self.cursor = crate::layout::seat_before(self.cursor.0, self.cursor.1);
    }

    /// Jump one whole zone forward in reading order
    pub fn cursor_zone_next(&mut self) {
        for _ in 0..shared::models::SEATS_PER_ZONE {
            self.cursor_next();
        }
    }

    /// Jump one whole zone back in reading order
    pub fn cursor_zone_prev(&mut self) {
        for _ in 0..shared::models::SEATS_PER_ZONE {
            self.cursor_prev();
        }
    }

    // ========== Persistence side effect ==========

    /// Re-encode the share link and overwrite the local cache.
    /// Fires on every map change, skipped while the map is empty.
    fn persist(&mut self) {
        if self.seats.is_empty() {
            return;
        }
        self.refresh_share_link();
        self.cache.save(&self.seats);
    }

    fn refresh_share_link(&mut self) {
        if self.seats.is_empty() {
            return;
        }
        match link::encode(&self.seats, &self.config.share_base_url) {
            Ok(url) => self.share_link = url,
            Err(e) => tracing::warn!("Failed to encode share link: {}", e),
        }
    }
}
