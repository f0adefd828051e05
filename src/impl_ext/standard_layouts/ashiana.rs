use crate::entities::{RoomLayout, RoomSpec};

fn room(id: &str, floor: &str, total_beds: usize, bookable_as_room: bool) -> RoomSpec {
    RoomSpec {
        id: id.to_string(),
        floor: floor.to_string(),
        total_beds,
        bookable_as_room,
        default_rent: None,
    }
}

/// Ashiana PG: three floors, 22 beds. The two-bed rooms may also be let as
/// a whole.
pub fn ashiana_layout() -> RoomLayout {
    RoomLayout {
        rooms: vec![
            // 1st Floor
            room("101", "1st Floor", 4, false),
            room("102", "1st Floor", 2, true),
            room("103", "1st Floor", 2, true),
            // 2nd Floor
            room("201", "2nd Floor", 1, false),
            room("202", "2nd Floor", 1, false),
            room("203", "2nd Floor", 1, false),
            room("204", "2nd Floor", 1, false),
            room("205", "2nd Floor", 1, false),
            room("206", "2nd Floor", 2, true),
            // Backside
            room("D1", "Backside", 2, true),
            room("D2", "Backside", 3, false),
            room("D3", "Backside", 2, true),
        ],
    }
}
