//! Flight mode tiers

use core::fmt;

/// Authorization tier for vehicle behavior, ordered from least to most
/// sensor-demanding
///
/// Each tier needs every sensor that the tiers below it need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FlightMode {
    /// Disarmed; nothing may fly. Also the floor of the gate.
    #[default]
    Dreaming = 0,
    /// Gyro-stabilized angular rate control
    Rate = 1,
    /// Self-leveling attitude control
    Level = 2,
    /// Level plus barometric altitude hold
    AltitudeHold = 3,
    /// Level plus GPS position hold with compass heading
    GpsHold = 4,
}

impl FlightMode {
    pub const ALL: [FlightMode; 5] = [
        FlightMode::Dreaming,
        FlightMode::Rate,
        FlightMode::Level,
        FlightMode::AltitudeHold,
        FlightMode::GpsHold,
    ];

    pub const LOWEST: FlightMode = FlightMode::Dreaming;

    /// "All modes permitted"
    pub const HIGHEST: FlightMode = FlightMode::GpsHold;

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Next lower tier, saturating at [`FlightMode::LOWEST`]
    pub fn below(self) -> FlightMode {
        match self {
            FlightMode::Dreaming | FlightMode::Rate => FlightMode::Dreaming,
            FlightMode::Level => FlightMode::Rate,
            FlightMode::AltitudeHold => FlightMode::Level,
            FlightMode::GpsHold => FlightMode::AltitudeHold,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlightMode::Dreaming => "DREAMING",
            FlightMode::Rate => "RATE",
            FlightMode::Level => "LEVEL",
            FlightMode::AltitudeHold => "ALT_HOLD",
            FlightMode::GpsHold => "GPS_HOLD",
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
