//! Icon classification for CarData descriptors
//!
//! Maps a descriptor string to a Material Design icon identifier. An exact
//! override table is consulted first; anything else falls through to an
//! ordered rule table evaluated against the lowercased descriptor, first
//! match wins. The classifier is pure and total: unknown or empty
//! descriptors yield `None`.

/// Explicit overrides for descriptors where a single icon makes sense
const EXACT_DESCRIPTOR_ICONS: &[(&str, &str)] = &[
    ("vehicle.drivetrain.electricEngine.charging.status", "mdi:ev-station"),
    ("vehicle.drivetrain.electricEngine.charging.level", "mdi:battery-charging-high"),
    ("vehicle.powertrain.electric.battery.stateOfCharge.target", "mdi:battery-charging-high"),
    ("vehicle.drivetrain.electricEngine.remainingElectricRange", "mdi:map-marker-distance"),
    ("vehicle.drivetrain.totalRemainingRange", "mdi:map-marker-distance"),
    ("vehicle.drivetrain.fuelSystem.remainingFuel", "mdi:gas-station"),
    ("vehicle.drivetrain.fuelSystem.level", "mdi:gas-station"),
    ("vehicle.vehicle.travelledDistance", "mdi:speedometer"),
    ("vehicle.vehicle.avgSpeed", "mdi:speedometer"),
    ("vehicle.status.conditionBasedServices", "mdi:wrench"),
    ("vehicle.status.checkControlMessages", "mdi:car-tire-alert"),
    ("vehicle.vehicle.preConditioning.activity", "mdi:fan"),
    ("vehicle.vehicle.preConditioning.remainingTime", "mdi:clock-outline"),
    ("vehicle.vehicle.preConditioning.error", "mdi:alert-circle-outline"),
    ("vehicle.vehicle.preConditioning.isRemoteEngineRunning", "mdi:engine"),
    ("vehicle.vehicle.preConditioning.isRemoteEngineStartAllowed", "mdi:engine"),
    ("vehicle.vehicle.avgAuxPower", "mdi:flash"),
    ("vehicle.channel.teleservice.status", "mdi:phone"),
    ("vehicle.body.chargingPort.status", "mdi:ev-plug-type2"),
    ("vehicle.body.chargingPort.lockedStatus", "mdi:lock"),
    ("vehicle.body.trunk.isOpen", "mdi:car-back"),
    ("vehicle.body.trunk.isLocked", "mdi:lock"),
    ("vehicle.cabin.hvac.preconditioning.status.remainingRunningTime", "mdi:clock-outline"),
];

/// A single predicate token evaluated against the lowercased descriptor
#[derive(Debug, Clone, Copy)]
enum Token {
    /// Descriptor contains this substring
    Contains(&'static str),
    /// Descriptor ends with this suffix
    EndsWith(&'static str),
}

impl Token {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Token::Contains(needle) => lowered.contains(needle),
            Token::EndsWith(suffix) => lowered.ends_with(suffix),
        }
    }
}

/// One fallback rule: `any` is an OR group (vacuously true when empty),
/// `all` tokens must all match
struct Rule {
    any: &'static [Token],
    all: &'static [Token],
    icon: &'static str,
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        let any_ok = self.any.is_empty() || self.any.iter().any(|t| t.matches(lowered));
        any_ok && self.all.iter().all(|t| t.matches(lowered))
    }
}

use Token::{Contains, EndsWith};

/// Ordered fallback rules; first match wins
///
/// The order matters: specific combinations (charging current, heated seat)
/// come before the generic keyword they would otherwise shadow.
const FALLBACK_RULES: &[Rule] = &[
    Rule { any: &[], all: &[Contains("remaining"), Contains("range")], icon: "mdi:map-marker-distance" },
    Rule { any: &[], all: &[Contains("fuel")], icon: "mdi:gas-station" },
    Rule {
        any: &[Contains("soc"), Contains("stateofcharge"), EndsWith(".hvsoc")],
        all: &[Contains("charging")],
        icon: "mdi:battery-charging-high",
    },
    Rule {
        any: &[Contains("soc"), Contains("stateofcharge"), EndsWith(".hvsoc")],
        all: &[],
        icon: "mdi:car-battery",
    },
    Rule { any: &[], all: &[Contains("battery"), Contains("charge")], icon: "mdi:battery-charging-high" },
    Rule { any: &[], all: &[Contains("battery")], icon: "mdi:car-battery" },
    Rule { any: &[], all: &[Contains("charging"), Contains("amp")], icon: "mdi:current-ac" },
    Rule { any: &[], all: &[Contains("charging"), Contains("volt")], icon: "mdi:current-ac" },
    Rule { any: &[], all: &[Contains("charging"), Contains("time")], icon: "mdi:clock-outline" },
    Rule {
        any: &[Contains("connector"), Contains("plug")],
        all: &[Contains("charging")],
        icon: "mdi:ev-plug-type2",
    },
    Rule { any: &[], all: &[Contains("charging")], icon: "mdi:ev-station" },
    Rule { any: &[], all: &[Contains("power")], icon: "mdi:flash" },
    Rule { any: &[], all: &[Contains("voltage")], icon: "mdi:flash" },
    Rule { any: &[], all: &[Contains("amp")], icon: "mdi:current-ac" },
    Rule { any: &[], all: &[Contains("pressure")], icon: "mdi:car-tire-alert" },
    Rule {
        any: &[Contains("temperature"), EndsWith(".ect")],
        all: &[],
        icon: "mdi:thermometer",
    },
    Rule { any: &[], all: &[Contains("tire")], icon: "mdi:car-tire-alert" },
    Rule {
        any: &[Contains("hvac"), Contains("climate"), Contains("preconditioning")],
        all: &[],
        icon: "mdi:fan",
    },
    Rule { any: &[], all: &[Contains("seat"), Contains("heating")], icon: "mdi:car-seat-heater" },
    Rule { any: &[], all: &[Contains("seat"), Contains("cooling")], icon: "mdi:air-conditioner" },
    Rule { any: &[], all: &[Contains("seat")], icon: "mdi:car-seat" },
    Rule { any: &[Contains("door"), Contains("window")], all: &[], icon: "mdi:car-door" },
    Rule { any: &[], all: &[Contains("sunroof")], icon: "mdi:weather-sunny" },
    Rule { any: &[], all: &[Contains("trunk")], icon: "mdi:car-back" },
    Rule { any: &[], all: &[Contains("hood")], icon: "mdi:car" },
    Rule { any: &[], all: &[Contains("lock")], icon: "mdi:lock" },
    Rule { any: &[Contains("engine"), Contains("ignition")], all: &[], icon: "mdi:engine" },
    Rule {
        any: &[Contains("navigation"), Contains("location"), Contains("gps")],
        all: &[],
        icon: "mdi:map-marker",
    },
    Rule { any: &[], all: &[Contains("service")], icon: "mdi:wrench" },
    Rule { any: &[Contains("diagnostic"), Contains("fault")], all: &[], icon: "mdi:alert" },
    Rule { any: &[], all: &[Contains("alarm")], icon: "mdi:alarm-light" },
    Rule { any: &[], all: &[Contains("sleep")], icon: "mdi:power-sleep" },
    Rule { any: &[Contains("time"), Contains("timestamp")], all: &[], icon: "mdi:clock-outline" },
    Rule {
        any: &[Contains("speed"), Contains("distance"), Contains("travelled")],
        all: &[],
        icon: "mdi:speedometer",
    },
    Rule { any: &[Contains("phone"), Contains("teleservice")], all: &[], icon: "mdi:phone" },
    Rule { any: &[], all: &[Contains("sim")], icon: "mdi:sim" },
];

/// Return a Material Design icon for a CarData descriptor
pub fn icon_for_descriptor(descriptor: Option<&str>) -> Option<&'static str> {
    let descriptor = match descriptor {
        Some(d) if !d.is_empty() => d,
        _ => return None,
    };

    if let Some((_, icon)) = EXACT_DESCRIPTOR_ICONS
        .iter()
        .find(|(exact, _)| *exact == descriptor)
    {
        return Some(icon);
    }

    let lowered = descriptor.to_lowercase();
    FALLBACK_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_empty() {
        assert_eq!(icon_for_descriptor(None), None);
        assert_eq!(icon_for_descriptor(Some("")), None);
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(
            icon_for_descriptor(Some("vehicle.drivetrain.electricEngine.charging.status")),
            Some("mdi:ev-station")
        );
        assert_eq!(
            icon_for_descriptor(Some("vehicle.body.chargingPort.lockedStatus")),
            Some("mdi:lock")
        );
    }

    #[test]
    fn test_substring_fallback() {
        assert_eq!(
            icon_for_descriptor(Some("vehicle.foo.tirePressureFront")),
            Some("mdi:car-tire-alert")
        );
        assert_eq!(
            icon_for_descriptor(Some("vehicle.drivetrain.batteryManagement.header")),
            Some("mdi:car-battery")
        );
    }

    #[test]
    fn test_unknown_descriptor() {
        assert_eq!(icon_for_descriptor(Some("vehicle.unknown.xyz")), None);
    }

    #[test]
    fn test_rule_order_specific_before_generic() {
        // "remaining" + "range" outranks the bare "fuel" rule below it
        assert_eq!(
            icon_for_descriptor(Some("vehicle.x.remainingFuelRange")),
            Some("mdi:map-marker-distance")
        );
        // charging current outranks the generic charging station icon
        assert_eq!(
            icon_for_descriptor(Some("vehicle.x.charging.ampere")),
            Some("mdi:current-ac")
        );
        assert_eq!(
            icon_for_descriptor(Some("vehicle.x.charging.active")),
            Some("mdi:ev-station")
        );
    }

    #[test]
    fn test_soc_rules() {
        // SoC while charging vs. plain SoC
        assert_eq!(
            icon_for_descriptor(Some("vehicle.x.charging.stateOfChargeNow")),
            Some("mdi:battery-charging-high")
        );
        assert_eq!(
            icon_for_descriptor(Some("vehicle.drivetrain.batteryManagement.hvSoc")),
            Some("mdi:car-battery")
        );
    }

    #[test]
    fn test_seat_rules() {
        assert_eq!(
            icon_for_descriptor(Some("vehicle.cabin.seatRow1.heating.level")),
            Some("mdi:car-seat-heater")
        );
        assert_eq!(
            icon_for_descriptor(Some("vehicle.cabin.seatRow1.cooling.level")),
            Some("mdi:air-conditioner")
        );
        assert_eq!(
            icon_for_descriptor(Some("vehicle.cabin.seatRow1.position")),
            Some("mdi:car-seat")
        );
    }

    #[test]
    fn test_location_descriptors_get_map_marker() {
        assert_eq!(
            icon_for_descriptor(Some(crate::types::HEADING_DESCRIPTOR)),
            Some("mdi:map-marker")
        );
    }

    #[test]
    fn test_case_insensitive_fallback() {
        assert_eq!(
            icon_for_descriptor(Some("VEHICLE.X.TirePRESSURE")),
            Some("mdi:car-tire-alert")
        );
    }
}
