//! Last-known weather pushed by the companion

use heapless::String;

/// Capacity of the high/low text, in bytes
pub const HIGH_LOW_CAPACITY: usize = 32;

pub type HighLowText = String<HIGH_LOW_CAPACITY>;

/// Condition id the companion sends when it has no condition
pub const UNKNOWN_CONDITION: i32 = -1;

/// Weather snapshot. Both fields always come from the same sync event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherState {
    condition_id: Option<i32>,
    high_low: Option<HighLowText>,
}

impl WeatherState {
    /// Weather as decoded from one payload.
    ///
    /// Negative condition ids and empty text are stored as absent.
    pub fn new(condition_id: i32, high_low: HighLowText) -> Self {
        Self {
            condition_id: (condition_id > UNKNOWN_CONDITION).then_some(condition_id),
            high_low: (!high_low.is_empty()).then_some(high_low),
        }
    }

    pub fn condition_id(&self) -> Option<i32> {
        self.condition_id
    }

    pub fn high_low(&self) -> Option<&str> {
        self.high_low.as_deref()
    }

    /// No sync has delivered anything displayable yet.
    pub fn is_absent(&self) -> bool {
        self.condition_id.is_none() && self.high_low.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> HighLowText {
        HighLowText::try_from(s).unwrap()
    }

    #[test]
    fn starts_absent() {
        let weather = WeatherState::default();
        assert!(weather.is_absent());
        assert_eq!(weather.condition_id(), None);
        assert_eq!(weather.high_low(), None);
    }

    #[test]
    fn keeps_both_fields() {
        let weather = WeatherState::new(200, text("18°/9°"));
        assert_eq!(weather.condition_id(), Some(200));
        assert_eq!(weather.high_low(), Some("18°/9°"));
        assert!(!weather.is_absent());
    }

    #[test]
    fn unknown_condition_is_absent() {
        let weather = WeatherState::new(UNKNOWN_CONDITION, text("3°/-2°"));
        assert_eq!(weather.condition_id(), None);
        assert_eq!(weather.high_low(), Some("3°/-2°"));
    }

    #[test]
    fn empty_text_is_absent() {
        let weather = WeatherState::new(800, HighLowText::new());
        assert_eq!(weather.high_low(), None);
        assert_eq!(weather.condition_id(), Some(800));
    }
}
