//! Distribution of room heat loss over the radiators serving each room.

use std::collections::BTreeMap;

use hb_core::RoomId;

/// Per-radiator share of room heat loss.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatLoadSplit {
    /// Indexed like the radiator table.
    pub per_radiator_w: Vec<f64>,
    /// Rooms with heat loss but no radiator to carry it.
    pub unserved_rooms: Vec<RoomId>,
}

/// Split each room's heat loss equally over the radiators placed in it.
///
/// Radiators in a room missing from `room_loads_w` get no load.
pub fn split_equally(room_loads_w: &BTreeMap<RoomId, f64>, radiator_rooms: &[RoomId]) -> HeatLoadSplit {
    let mut counts: BTreeMap<RoomId, usize> = BTreeMap::new();
    for &room in radiator_rooms {
        *counts.entry(room).or_default() += 1;
    }

    let per_radiator_w = radiator_rooms
        .iter()
        .map(|room| match (room_loads_w.get(room), counts.get(room)) {
            (Some(&load), Some(&n)) if n > 0 => load / n as f64,
            _ => 0.0,
        })
        .collect();

    let unserved_rooms = room_loads_w
        .iter()
        .filter(|&(room, &load)| load > 0.0 && !counts.contains_key(room))
        .map(|(&room, _)| room)
        .collect();

    HeatLoadSplit {
        per_radiator_w,
        unserved_rooms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_split_within_room() {
        let loads = BTreeMap::from([(1, 1200.0), (2, 500.0), (3, 0.0)]);
        let split = split_equally(&loads, &[1, 2, 1, 1, 3]);
        assert_eq!(split.per_radiator_w, vec![400.0, 500.0, 400.0, 400.0, 0.0]);
        assert!(split.unserved_rooms.is_empty());
    }

    #[test]
    fn reports_rooms_without_radiators() {
        let loads = BTreeMap::from([(1, 800.0), (2, 300.0), (4, 0.0)]);
        let split = split_equally(&loads, &[1, 9]);
        assert_eq!(split.per_radiator_w, vec![800.0, 0.0]);
        assert_eq!(split.unserved_rooms, vec![2]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn split_conserves_served_load(
            loads in proptest::collection::vec(0.0_f64..5000.0, 1..6),
            rooms in proptest::collection::vec(0_u32..6, 1..12),
        ) {
            let room_loads: BTreeMap<RoomId, f64> =
                loads.iter().enumerate().map(|(i, &l)| (i as RoomId, l)).collect();
            let split = split_equally(&room_loads, &rooms);
            let served: f64 = room_loads
                .iter()
                .filter(|(room, _)| rooms.contains(room))
                .map(|(_, &l)| l)
                .sum();
            let assigned: f64 = split.per_radiator_w.iter().sum();
            prop_assert!((served - assigned).abs() < 1e-6);
        }
    }
}
