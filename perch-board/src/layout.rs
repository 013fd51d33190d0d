//! Floor-plan screen geometry
//!
//! Pure functions from the terminal area to zone/seat rectangles. The
//! renderer and the mouse hit-testing both go through here, so a seat is
//! clickable exactly where it is drawn.
//!
//! The floor mirrors the office: two columns of three zones with a
//! walkway between them, four seats per zone in a 2×2 block.

use ratatui::layout::{Constraint, Direction, Layout, Margin, Position, Rect};
use shared::models::{FLOOR_ZONES, SEATS_PER_ZONE, ZoneData, zone_by_id};

/// Top-level frame regions
#[derive(Debug, Clone, Copy)]
pub struct BoardChunks {
    pub header: Rect,
    pub floor: Rect,
    pub logs: Rect,
    pub footer: Rect,
}

/// Split the whole terminal into header / floor / logs / footer
pub fn split_frame(area: Rect) -> BoardChunks {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Floor plan
            Constraint::Length(6), // Activity log
            Constraint::Length(1), // Footer / notices
        ])
        .split(area);

    BoardChunks {
        header: chunks[0],
        floor: chunks[1],
        logs: chunks[2],
        footer: chunks[3],
    }
}

/// The rectangle of one zone block on the floor
pub fn zone_rect(floor: Rect, zone: &ZoneData) -> Rect {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(46), // Section A
            Constraint::Percentage(8),  // Walkway
            Constraint::Percentage(46), // Section B
        ])
        .split(floor);

    let column = if zone.col == 0 { columns[0] } else { columns[2] };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(column);

    rows[zone.row as usize]
}

/// The walkway strip between the two sections
pub fn walkway_rect(floor: Rect) -> Rect {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(46),
            Constraint::Percentage(8),
            Constraint::Percentage(46),
        ])
        .split(floor);
    columns[1]
}

/// The rectangle of one seat cell (inside the zone border)
///
/// Seats sit in a 2×2 block: indexes 0,1 on the top row, 2,3 below.
pub fn seat_rect(floor: Rect, zone_id: u32, seat_index: u32) -> Option<Rect> {
    let zone = zone_by_id(zone_id)?;
    if seat_index >= SEATS_PER_ZONE {
        return None;
    }

    let inner = zone_rect(floor, zone).inner(Margin::new(1, 1));
    if inner.width < 2 || inner.height < 2 {
        return None;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2); 2])
        .split(inner);
    let row = rows[(seat_index / 2) as usize];

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2); 2])
        .split(row);
    Some(cells[(seat_index % 2) as usize])
}

/// Which seat (if any) the given screen position lands on
pub fn hit_test(floor: Rect, x: u16, y: u16) -> Option<(u32, u32)> {
    let position = Position::new(x, y);
    for zone in &FLOOR_ZONES {
        for seat_index in 0..SEATS_PER_ZONE {
            if let Some(rect) = seat_rect(floor, zone.id, seat_index)
                && rect.contains(position)
            {
                return Some((zone.id, seat_index));
            }
        }
    }
    None
}

/// Next seat in reading order (wraps at the end of the plan)
pub fn seat_after(zone_id: u32, seat_index: u32) -> (u32, u32) {
    let total = FLOOR_ZONES.len() as u32 * SEATS_PER_ZONE;
    let flat = (zone_id * SEATS_PER_ZONE + seat_index + 1) % total;
    (flat / SEATS_PER_ZONE, flat % SEATS_PER_ZONE)
}

/// Previous seat in reading order (wraps at the start)
pub fn seat_before(zone_id: u32, seat_index: u32) -> (u32, u32) {
    let total = FLOOR_ZONES.len() as u32 * SEATS_PER_ZONE;
    let flat = (zone_id * SEATS_PER_ZONE + seat_index + total - 1) % total;
    (flat / SEATS_PER_ZONE, flat % SEATS_PER_ZONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Rect {
        let chunks = split_frame(Rect::new(0, 0, 100, 40));
        chunks.floor
    }

    #[test]
    fn every_seat_has_a_rect_on_a_reasonable_terminal() {
        let floor = floor();
        for zone in &FLOOR_ZONES {
            for seat_index in 0..SEATS_PER_ZONE {
                assert!(
                    seat_rect(floor, zone.id, seat_index).is_some(),
                    "zone {} seat {} missing",
                    zone.id,
                    seat_index
                );
            }
        }
    }

    #[test]
    fn seat_centers_hit_test_back_to_themselves() {
        let floor = floor();
        for zone in &FLOOR_ZONES {
            for seat_index in 0..SEATS_PER_ZONE {
                let rect = seat_rect(floor, zone.id, seat_index).unwrap();
                let cx = rect.x + rect.width / 2;
                let cy = rect.y + rect.height / 2;
                assert_eq!(
                    hit_test(floor, cx, cy),
                    Some((zone.id, seat_index)),
                    "center of zone {} seat {}",
                    zone.id,
                    seat_index
                );
            }
        }
    }

    #[test]
    fn clicks_outside_the_floor_hit_nothing() {
        let chunks = split_frame(Rect::new(0, 0, 100, 40));
        // Header row is not a seat
        assert_eq!(hit_test(chunks.floor, 1, chunks.header.y), None);
        // The walkway between the sections is not a seat
        let walkway = walkway_rect(chunks.floor);
        let wx = walkway.x + walkway.width / 2;
        let wy = walkway.y + walkway.height / 2;
        assert_eq!(hit_test(chunks.floor, wx, wy), None);
    }

    #[test]
    fn invalid_positions_have_no_rect() {
        let floor = floor();
        assert!(seat_rect(floor, 99, 0).is_none());
        assert!(seat_rect(floor, 0, SEATS_PER_ZONE).is_none());
    }

    #[test]
    fn reading_order_navigation_wraps() {
        assert_eq!(seat_after(0, 0), (0, 1));
        assert_eq!(seat_after(0, 3), (1, 0));
        assert_eq!(seat_after(5, 3), (0, 0));
        assert_eq!(seat_before(0, 0), (5, 3));
        assert_eq!(seat_before(1, 0), (0, 3));
    }
}
