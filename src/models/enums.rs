use serde::{Deserialize, Serialize};

use super::MapError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Unknown strings are rejected at the boundary, never stored verbatim.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = MapError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(MapError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Role {
    Patient => "PATIENT",
    Doctor => "DOCTOR",
});

str_enum!(AppointmentType {
    Video => "VIDEO",
    InPerson => "IN_PERSON",
});

str_enum!(AppointmentStatus {
    Pending => "PENDING",
    Confirmed => "CONFIRMED",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("PATIENT".parse::<Role>().unwrap(), Role::Patient);
        assert_eq!("DOCTOR".parse::<Role>().unwrap(), Role::Doctor);
        assert_eq!(Role::Doctor.as_str(), "DOCTOR");
    }

    #[test]
    fn unknown_role_rejected() {
        assert!(matches!(
            "ADMIN".parse::<Role>(),
            Err(MapError::InvalidEnum { .. })
        ));
    }

    #[test]
    fn role_is_case_sensitive() {
        assert!("patient".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&AppointmentType::InPerson).unwrap(),
            "\"IN_PERSON\""
        );
        let status: AppointmentStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn serde_rejects_unknown_status() {
        assert!(serde_json::from_str::<AppointmentStatus>("\"RESCHEDULED\"").is_err());
    }
}
