//! Domain types for the Open Legislation API.
//!
//! # Design
//! The supported get types, search types, formats, and versions are closed
//! enums with a `const ALL` table each. Strings from callers or config files
//! enter through `FromStr`, which is the only place an unsupported value can
//! be rejected; once a value is typed it is valid. `PageSize` and `Page`
//! follow the same rule for their numeric ranges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident rejects $err:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == wanted)
                    .ok_or_else(|| ConfigError::$err(s.to_string()))
            }
        }

        impl TryFrom<String> for $name {
            type Error = ConfigError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// Document types that can be fetched by id.
    GetType rejects GetType {
        Bill => "bill",
        Meeting => "meeting",
        Transcript => "transcript",
    }
}

vocabulary! {
    /// Document types a search can be restricted to (`otype:` values).
    SearchType rejects SearchType {
        Bill => "bill",
        Vote => "vote",
        Action => "action",
        Transcript => "transcript",
        Meeting => "meeting",
        Calendar => "calendar",
    }
}

vocabulary! {
    /// Response format requested by the caller.
    ///
    /// `Object` is not a wire format: it asks for the body to be mapped into
    /// [`Bill`] records, and is sent to the server as XML.
    Format rejects Format {
        Xml => "xml",
        Json => "json",
        Csv => "csv",
        Html => "html",
        Object => "object",
    }
}

impl Format {
    /// The format actually named in the request URL.
    pub fn wire_format(self) -> Format {
        match self {
            Format::Object => Format::Xml,
            other => other,
        }
    }

    /// Whether responses in this format are mapped into bills.
    pub fn is_structured(self) -> bool {
        self == Format::Object
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::Object
    }
}

/// API version segment of get URLs. Only `1.0` has been released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ApiVersion {
    #[default]
    V1_0,
}

impl ApiVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V1_0 => "1.0",
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.0" | "1" => Ok(ApiVersion::V1_0),
            other => Err(ConfigError::Version(other.to_string())),
        }
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ApiVersion> for &'static str {
    fn from(version: ApiVersion) -> Self {
        version.as_str()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of results per search page, strictly between 0 and 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PageSize(u8);

impl PageSize {
    pub const DEFAULT: PageSize = PageSize(20);

    pub fn new(size: i64) -> Result<Self, ConfigError> {
        if 0 < size && size < 100 {
            Ok(PageSize(size as u8))
        } else {
            Err(ConfigError::PageSize(size))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::DEFAULT
    }
}

impl TryFrom<i64> for PageSize {
    type Error = ConfigError;

    fn try_from(size: i64) -> Result<Self, Self::Error> {
        PageSize::new(size)
    }
}

impl From<PageSize> for i64 {
    fn from(size: PageSize) -> Self {
        i64::from(size.0)
    }
}

/// One-based search page index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Page(u64);

impl Page {
    pub const FIRST: Page = Page(1);

    pub fn new(page: i64) -> Result<Self, ConfigError> {
        u64::try_from(page)
            .ok()
            .filter(|p| *p > 0)
            .map(Page)
            .ok_or(ConfigError::Page(page))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::FIRST
    }
}

impl TryFrom<i64> for Page {
    type Error = ConfigError;

    fn try_from(page: i64) -> Result<Self, Self::Error> {
        Page::new(page)
    }
}

impl From<Page> for i64 {
    fn from(page: Page) -> Self {
        // Every `Page` was built from a positive i64.
        page.0 as i64
    }
}

/// A single legislative bill as returned by the API.
///
/// Attribute-backed fields are always present (empty when the attribute is
/// missing). `summary`, `committee`, and `text` are `None` when the bill has
/// no such child element and `Some("")` when the element is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub year: String,
    pub title: String,
    pub sponsor: String,
    #[serde(default)]
    pub law_section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub cosponsors: Vec<String>,
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bill {}: {}", self.id, self.title)
    }
}
