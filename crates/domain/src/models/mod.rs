//! Domain models for the care home.

use serde_json::Value;
use validator::ValidationErrors;

/// Declares a string-valued enum with its wire names.
///
/// Generates serde renames, `as_str`, `Display` and a `PayloadEnum` impl so
/// the payload reader can report the accepted set on a bad value.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Returns the wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl shared::validation::PayloadEnum for $name {
            const VARIANTS: &'static [&'static str] = &[$($text),+];

            fn parse(value: &str) -> Option<Self> {
                match value {
                    $( $text => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod daily_log;
pub mod document;
pub mod event;
pub mod incident;
pub mod resident;
pub mod staff;
pub mod user;

pub use daily_log::{DailyLog, DailyLogCategory, NewDailyLog};
pub use document::{Document, DocumentCategory, NewDocument};
pub use event::{Event, EventType, NewEvent};
pub use incident::{Incident, IncidentCategory, IncidentSeverity, IncidentStatus, NewIncident};
pub use resident::{NewResident, Resident, ResidentStatus};
pub use staff::{NewStaff, Staff, StaffStatus};
pub use user::{LoginRequest, NewUser, RegisterRequest, User, UserProfile, UserRole};

/// Builds a validated value from an untyped JSON payload.
pub trait FromPayload: Sized {
    /// Validates `raw` and returns the typed value, or every field error found.
    fn from_payload(raw: &Value) -> Result<Self, ValidationErrors>;
}
