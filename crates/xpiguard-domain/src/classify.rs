//! Package-type classification from legacy numeric type codes.

use crate::message::Message;
use crate::severity::VALIDATION_ERROR;
use serde_json::json;
use xpiguard_types::{Location, ids};

// Canonical numeric identifiers.
pub const PACKAGE_ANY: u8 = 0;
pub const PACKAGE_EXTENSION: u8 = 1;
pub const PACKAGE_THEME: u8 = 2;
pub const PACKAGE_DICTIONARY: u8 = 3;
pub const PACKAGE_LANGPACK: u8 = 4;
pub const PACKAGE_SEARCHPROV: u8 = 5;
pub const PACKAGE_MULTI: u8 = 1; // A multi package is an extension.
pub const PACKAGE_SUBPACKAGE: u8 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PackageType {
    Any,
    Extension,
    Theme,
    Dictionary,
    Langpack,
    SearchProvider,
    Multi,
    Subpackage,
}

impl PackageType {
    /// Canonical numeric identifier. `Multi` and `Extension` share one.
    pub const fn id(self) -> u8 {
        match self {
            PackageType::Any => PACKAGE_ANY,
            PackageType::Extension => PACKAGE_EXTENSION,
            PackageType::Theme => PACKAGE_THEME,
            PackageType::Dictionary => PACKAGE_DICTIONARY,
            PackageType::Langpack => PACKAGE_LANGPACK,
            PackageType::SearchProvider => PACKAGE_SEARCHPROV,
            PackageType::Multi => PACKAGE_MULTI,
            PackageType::Subpackage => PACKAGE_SUBPACKAGE,
        }
    }

    /// Identity comparison by canonical id, so a multi package counts as an extension.
    pub fn same_identity(self, other: PackageType) -> bool {
        self.id() == other.id()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PackageType::Any => "any",
            PackageType::Extension => "extension",
            PackageType::Theme => "theme",
            PackageType::Dictionary => "dictionary",
            PackageType::Langpack => "langpack",
            PackageType::SearchProvider => "search_provider",
            PackageType::Multi => "multi",
            PackageType::Subpackage => "subpackage",
        }
    }
}

/// Legacy install-manifest type codes don't match the canonical types; this is the mapping.
pub static LEGACY_TYPE_MAP: &[(i64, PackageType)] = &[
    (2, PackageType::Extension),
    (4, PackageType::Theme),
    (8, PackageType::Langpack),
    (32, PackageType::Multi),
    (64, PackageType::Dictionary),
];

/// A legacy type code with no canonical package type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized legacy package type code {code}")]
pub struct UnrecognizedType {
    pub code: i64,
}

impl UnrecognizedType {
    const DESCRIPTION: &'static str =
        "The legacy package type code is not one of the supported codes (2, 4, 8, 32, 64).";

    /// The reportable form of this outcome.
    pub fn to_message(&self, location: Location) -> Message {
        Message::validator(
            VALIDATION_ERROR,
            ids::CHECK_PACKAGE_TYPE,
            ids::CODE_UNRECOGNIZED_PACKAGE_TYPE,
            Self::DESCRIPTION,
            format!("package type code {} is not recognized", self.code),
            location,
        )
        .with_data(json!({ "type_code": self.code }))
    }
}

pub fn classify(raw_type_code: i64) -> Result<PackageType, UnrecognizedType> {
    LEGACY_TYPE_MAP
        .iter()
        .find(|(code, _)| *code == raw_type_code)
        .map(|(_, package_type)| *package_type)
        .ok_or(UnrecognizedType {
            code: raw_type_code,
        })
}
