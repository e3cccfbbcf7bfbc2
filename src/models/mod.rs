// src/models/mod.rs

/// Declares a closed string enum stored as TEXT.
///
/// Generates `as_str`, `Display` and a `FromStr` that rejects unknown
/// values, so rows read back from the store are validated instead of
/// trusted.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "unknown {} value '{}'",
                        stringify!($name),
                        other
                    )),
                }
            }
        }
    };
}

pub mod attendance;
pub mod exam;
pub mod game;
pub mod material;
pub mod payment;
pub mod question;
pub mod report;
pub mod student;
pub mod user;
