use crate::error::ReportError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $s:literal),+ $(,)? }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        $(#[$meta])*
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ReportError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ReportError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(
    #[derive(Default)]
    Sex {
        #[default]
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
);

str_enum!(Flag {
    Normal => "Normal",
    High => "High",
    Low => "Low",
});

impl Flag {
    pub fn is_abnormal(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sex_round_trip() {
        for (variant, s) in [
            (Sex::Male, "Male"),
            (Sex::Female, "Female"),
            (Sex::Other, "Other"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Sex::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn flag_display_matches_label() {
        assert_eq!(Flag::High.to_string(), "High");
        assert_eq!(Flag::Low.to_string(), "Low");
        assert_eq!(Flag::Normal.to_string(), "Normal");
        assert!(Flag::High.is_abnormal());
        assert!(!Flag::Normal.is_abnormal());
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(Sex::from_str("male").is_err());
        assert!(Flag::from_str("").is_err());
    }

    #[test]
    fn sex_defaults_to_male() {
        assert_eq!(Sex::default(), Sex::Male);
    }

    #[test]
    fn sex_serializes_as_label() {
        let json = serde_json::to_string(&Sex::Female).unwrap();
        assert_eq!(json, "\"Female\"");
        let parsed: Sex = serde_json::from_str("\"Other\"").unwrap();
        assert_eq!(parsed, Sex::Other);
    }
}
