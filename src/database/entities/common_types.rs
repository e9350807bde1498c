//! String-backed enums stored in plain text columns.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownVariant { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

string_enum!(
    /// High season is any date inside a configured season range.
    SeasonType, "season type", {
        High => "high",
        Low => "low",
    }
);

string_enum!(ContentType, "content type", {
    Text => "text",
    RichText => "richtext",
    Image => "image",
});

string_enum!(PublishStatus, "status", {
    Draft => "draft",
    Published => "published",
});

string_enum!(MediaCategory, "media category", {
    Gallery => "gallery",
    Apartment => "apartment",
    News => "news",
});

impl Default for ContentType {
    fn default() -> Self {
        ContentType::Text
    }
}

impl Default for PublishStatus {
    fn default() -> Self {
        PublishStatus::Draft
    }
}

impl Default for MediaCategory {
    fn default() -> Self {
        MediaCategory::Gallery
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_text() {
        for season in SeasonType::ALL {
            assert_eq!(season.as_str().parse::<SeasonType>().unwrap(), *season);
        }
        assert_eq!("richtext".parse::<ContentType>().unwrap(), ContentType::RichText);
        assert!("HIGH".parse::<SeasonType>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ContentType::RichText).unwrap(), "\"richtext\"");
        assert_eq!(serde_json::to_string(&PublishStatus::Published).unwrap(), "\"published\"");
    }
}
