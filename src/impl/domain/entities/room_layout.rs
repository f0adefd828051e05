/// Fixed installation configuration from which rooms and beds are created
/// once. Rooms are never created or destroyed at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomLayout {
    pub rooms: Vec<RoomSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomSpec {
    pub id: String,
    pub floor: String,
    pub total_beds: usize,
    pub bookable_as_room: bool,
    /// Applied as the initial `default_rent` of every bed in the room.
    pub default_rent: Option<f64>,
}

impl RoomLayout {
    /// Distinct floors, in the order they first appear.
    pub fn floors(&self) -> Vec<&str> {
        let mut floors: Vec<&str> = Vec::new();
        for spec in &self.rooms {
            if !floors.contains(&spec.floor.as_str()) {
                floors.push(&spec.floor);
            }
        }
        floors
    }
}
