//! # Engine Version Compatibility
//!
//! A policy document declares the oldest engine able to evaluate it in
//! `minPEVersion`. Compatibility is decided by major version alone: a
//! document requiring `1.4.0` is accepted by engine `1.0.0`, a document
//! requiring `2.0.0` is not.

use crate::error::{PolicyError, PolicyResult};

/// Version of this engine.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A parsed `MAJOR.MINOR.PATCH` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major version.
    pub major: u64,
    /// Minor version.
    pub minor: u64,
    /// Patch version.
    pub patch: u64,
}

impl Version {
    /// Parse `MAJOR[.MINOR[.PATCH]]`, ignoring any pre-release or build
    /// suffix on the patch component (`1.2.3-beta` parses as `1.2.3`).
    pub fn parse(s: &str) -> PolicyResult<Self> {
        let malformed = || PolicyError::MalformedPolicyVersion(s.to_string());
        let core = s.trim().split(['-', '+']).next().unwrap_or_default();
        let mut parts = core.split('.');
        let mut component = |required: bool| -> PolicyResult<u64> {
            match parts.next() {
                Some(p) => p.parse().map_err(|_| malformed()),
                None if required => Err(malformed()),
                None => Ok(0),
            }
        };
        let version = Self {
            major: component(true)?,
            minor: component(false)?,
            patch: component(false)?,
        };
        if parts.next().is_some() {
            return Err(malformed());
        }
        Ok(version)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Check that this engine can evaluate a document declaring `min_version`.
pub fn check_compatibility(min_version: Option<&str>) -> PolicyResult<()> {
    check_compatibility_with(min_version, ENGINE_VERSION)
}

/// Check `min_version` against an explicit engine version.
pub fn check_compatibility_with(min_version: Option<&str>, engine: &str) -> PolicyResult<()> {
    let required = min_version.ok_or_else(|| PolicyError::MalformedPolicyVersion(String::new()))?;
    let required_version = Version::parse(required)?;
    let engine_version = Version::parse(engine)?;
    if required_version.major > engine_version.major {
        tracing::warn!(
            required = %required_version,
            engine = %engine_version,
            "policy document requires a newer engine"
        );
        return Err(PolicyError::UnsupportedPolicyVersion {
            required: required.to_string(),
            engine: engine.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_short_and_suffixed_forms() {
        assert_eq!(
            Version::parse("1.2.3").unwrap(),
            Version { major: 1, minor: 2, patch: 3 }
        );
        assert_eq!(Version::parse("2").unwrap().to_string(), "2.0.0");
        assert_eq!(Version::parse("1.4.0-rc.1").unwrap().minor, 4);
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "x.1.0", "1..0", "1.2.3.4", "v1.0.0"] {
            assert!(
                matches!(Version::parse(bad), Err(PolicyError::MalformedPolicyVersion(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn compatibility_is_by_major_version() {
        assert!(check_compatibility_with(Some("1.9.9"), "1.0.0").is_ok());
        assert!(check_compatibility_with(Some("0.5.0"), "1.0.0").is_ok());
        assert!(matches!(
            check_compatibility_with(Some("2.0.0"), "1.7.0"),
            Err(PolicyError::UnsupportedPolicyVersion { .. })
        ));
    }

    #[test]
    fn missing_version_is_malformed() {
        assert!(matches!(
            check_compatibility_with(None, "1.0.0"),
            Err(PolicyError::MalformedPolicyVersion(_))
        ));
    }

    #[test]
    fn running_engine_accepts_its_own_version() {
        assert!(check_compatibility(Some(ENGINE_VERSION)).is_ok());
    }
}
