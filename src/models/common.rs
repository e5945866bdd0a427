//! Vocabulary shared by institutions, objects and files.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Active/deleted flag stored in the `state` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RecordState {
    #[serde(rename = "A")]
    Active,
    #[serde(rename = "D")]
    Deleted,
}

impl RecordState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "A",
            Self::Deleted => "D",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Self::Active),
            "D" => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System administrator; may act on any institution.
    Admin,
    InstitutionalAdmin,
    InstitutionalUser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::InstitutionalAdmin => "institutional_admin",
            Self::InstitutionalUser => "institutional_user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "institutional_admin" => Some(Self::InstitutionalAdmin),
            "institutional_user" => Some(Self::InstitutionalUser),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an object's files are preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum StorageOption {
    Standard,
    #[serde(rename = "Glacier-OH")]
    GlacierOh,
    #[serde(rename = "Glacier-OR")]
    GlacierOr,
    #[serde(rename = "Glacier-VA")]
    GlacierVa,
    #[serde(rename = "Glacier-Deep-OH")]
    GlacierDeepOh,
    #[serde(rename = "Glacier-Deep-OR")]
    GlacierDeepOr,
    #[serde(rename = "Glacier-Deep-VA")]
    GlacierDeepVa,
    #[serde(rename = "Wasabi-OR")]
    WasabiOr,
    #[serde(rename = "Wasabi-VA")]
    WasabiVa,
}

impl StorageOption {
    pub const ALL: [StorageOption; 9] = [
        Self::Standard,
        Self::GlacierOh,
        Self::GlacierOr,
        Self::GlacierVa,
        Self::GlacierDeepOh,
        Self::GlacierDeepOr,
        Self::GlacierDeepVa,
        Self::WasabiOr,
        Self::WasabiVa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::GlacierOh => "Glacier-OH",
            Self::GlacierOr => "Glacier-OR",
            Self::GlacierVa => "Glacier-VA",
            Self::GlacierDeepOh => "Glacier-Deep-OH",
            Self::GlacierDeepOr => "Glacier-Deep-OR",
            Self::GlacierDeepVa => "Glacier-Deep-VA",
            Self::WasabiOr => "Wasabi-OR",
            Self::WasabiVa => "Wasabi-VA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.as_str() == s)
    }

    /// Glacier-only storage has no copy in standard S3 and needs a
    /// Glacier restore before files can be retrieved.
    pub fn is_glacier_only(&self) -> bool {
        matches!(
            self,
            Self::GlacierOh
                | Self::GlacierOr
                | Self::GlacierVa
                | Self::GlacierDeepOh
                | Self::GlacierDeepOr
                | Self::GlacierDeepVa
        )
    }
}

impl std::fmt::Display for StorageOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who may discover an intellectual object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Consortia,
    Institution,
    Restricted,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consortia => "consortia",
            Self::Institution => "institution",
            Self::Restricted => "restricted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "consortia" => Some(Self::Consortia),
            "institution" => Some(Self::Institution),
            "restricted" => Some(Self::Restricted),
            _ => None,
        }
    }
}
