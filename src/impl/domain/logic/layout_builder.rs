use crate::entities::{Bed, BedId, Room, RoomId, RoomLayout, Snapshot};

pub(crate) struct LayoutBuilder<'a> {
    layout: &'a RoomLayout,
}

impl<'a> LayoutBuilder<'a> {
    pub(crate) fn new(layout: &'a RoomLayout) -> Self {
        Self { layout }
    }

    /// Fresh installation: every bed vacant, no tenants.
    pub(crate) fn build(&self) -> Snapshot {
        let rooms = self
            .layout
            .rooms
            .iter()
            .map(|spec| {
                let id = RoomId(spec.id.clone());
                let beds = (1..=spec.total_beds)
                    .map(|i| Bed {
                        default_rent: spec.default_rent,
                        ..Bed::vacant(BedId::new(&id, i))
                    })
                    .collect();
                Room {
                    id,
                    floor: spec.floor.clone(),
                    bookable_as_room: spec.bookable_as_room,
                    beds,
                }
            })
            .collect();
        Snapshot::new(rooms, Vec::new())
    }
}
