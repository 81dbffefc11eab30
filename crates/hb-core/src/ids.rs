use core::fmt;
use core::num::NonZeroU32;

/// Radiator number as entered by the designer (1-based).
///
/// - `NonZero` because radiator numbering starts at 1
/// - `Option<RadiatorId>` stays the size of a `u32`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RadiatorId(NonZeroU32);

impl RadiatorId {
    /// Create an id from a radiator number. Returns `None` for 0.
    pub fn new(nr: u32) -> Option<Self> {
        NonZeroU32::new(nr).map(Self)
    }

    /// The radiator number.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for RadiatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RadiatorId({})", self.get())
    }
}

impl fmt::Display for RadiatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Room numbers are free-form in the input; aliasing keeps signatures readable.
pub type RoomId = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radiator_id_round_trip() {
        for nr in [1_u32, 2, 42, 10_000] {
            let id = RadiatorId::new(nr).unwrap();
            assert_eq!(id.get(), nr);
            assert_eq!(id.to_string(), nr.to_string());
        }
    }

    #[test]
    fn radiator_zero_is_rejected() {
        assert!(RadiatorId::new(0).is_none());
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<RadiatorId>(),
            core::mem::size_of::<Option<RadiatorId>>()
        );
    }

    #[test]
    fn ids_order_by_number() {
        let a = RadiatorId::new(2).unwrap();
        let b = RadiatorId::new(10).unwrap();
        assert!(a < b);
    }
}
