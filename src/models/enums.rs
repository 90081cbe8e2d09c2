use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ValidationError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
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

str_enum!(Role {
    Admin => "admin",
    Doctor => "doctor",
    Reception => "reception",
});

str_enum!(VisitStatus {
    Booked => "booked",
    // Declared by the backend but reserved: no transition produces it.
    InProgress => "in_progress",
    Completed => "completed",
});

str_enum!(BillStatus {
    Unpaid => "unpaid",
    PartiallyPaid => "partially_paid",
    Paid => "paid",
});

str_enum!(PaymentMode {
    Cash => "cash",
    Upi => "upi",
    Card => "card",
    Online => "online",
});

/// Patient sex as recorded at registration. The backend stores the
/// capitalized spellings, so this one stays outside `str_enum!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            _ => Err(ValidationError::InvalidEnum {
                field: "Sex".into(),
                value: s.into(),
            }),
        }
    }
}
