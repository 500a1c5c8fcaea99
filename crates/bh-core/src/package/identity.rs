use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identity of a staged package, read from its manifest.
///
/// 从清单中解析出的包身份。
///
/// Both fields are derived from the same artifact bytes that are later
/// streamed into the install session. `package_id` is not guaranteed to equal
/// the host application's own identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub package_id: String,
    /// Fully-qualified name of the first declared activity, if any.
    pub entry_component: Option<String>,
}

impl PackageIdentity {
    /// Build an identity, expanding a relative entry component against the package.
    pub fn new(package_id: impl Into<String>, entry_component: Option<String>) -> Self {
        let package_id = package_id.into();
        let entry_component = entry_component
            .filter(|name| !name.trim().is_empty())
            .map(|name| qualify_class_name(&package_id, name.trim()));
        Self {
            package_id,
            entry_component,
        }
    }

    /// Direct component reference, when both fields are present.
    pub fn component(&self) -> Option<ComponentRef> {
        if self.package_id.is_empty() {
            return None;
        }
        self.entry_component
            .as_ref()
            .map(|entry| ComponentRef::new(self.package_id.clone(), entry.clone()))
    }
}

/// A `package/class` pair addressing one launchable component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentRef {
    pub package_id: String,
    pub class_name: String,
}

impl ComponentRef {
    pub fn new(package_id: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            class_name: class_name.into(),
        }
    }

    /// Parse the flattened `package/class` form printed by platform tools.
    ///
    /// A class part starting with `.` is relative to the package.
    pub fn parse_flattened(raw: &str) -> Option<Self> {
        let (package_id, class_name) = raw.trim().split_once('/')?;
        if package_id.is_empty() || class_name.is_empty() {
            return None;
        }
        Some(Self::new(
            package_id,
            qualify_class_name(package_id, class_name),
        ))
    }

    /// `package/class` form accepted by `am start -n`.
    pub fn flatten(&self) -> String {
        format!("{}/{}", self.package_id, self.class_name)
    }
}

impl Display for ComponentRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.flatten())
    }
}

/// Expand a manifest class name the way the package parser does.
///
/// `.Main` and `Main` are both relative to the package; anything containing a
/// dot after the first character is already qualified.
pub(crate) fn qualify_class_name(package_id: &str, name: &str) -> String {
    if let Some(rest) = name.strip_prefix('.') {
        format!("{package_id}.{rest}")
    } else if !name.contains('.') {
        format!("{package_id}.{name}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_expands_relative_entry_component() {
        let identity = PackageIdentity::new("com.sample.app", Some(".Main".to_string()));
        assert_eq!(
            identity.entry_component.as_deref(),
            Some("com.sample.app.Main")
        );

        let identity = PackageIdentity::new("com.sample.app", Some("Main".to_string()));
        assert_eq!(
            identity.entry_component.as_deref(),
            Some("com.sample.app.Main")
        );
    }

    #[test]
    fn identity_keeps_qualified_entry_component() {
        let identity = PackageIdentity::new("com.sample.app", Some("org.other.Launcher".into()));
        assert_eq!(
            identity.entry_component.as_deref(),
            Some("org.other.Launcher")
        );
    }

    #[test]
    fn identity_treats_blank_entry_as_absent() {
        let identity = PackageIdentity::new("com.sample.app", Some("  ".into()));
        assert_eq!(identity.entry_component, None);
        assert!(identity.component().is_none());
    }

    #[test]
    fn component_requires_both_fields() {
        let identity = PackageIdentity::new("", Some("com.sample.app.Main".into()));
        assert!(identity.component().is_none());

        let identity = PackageIdentity::new("com.sample.app", Some("com.sample.app.Main".into()));
        assert_eq!(
            identity.component().map(|c| c.flatten()),
            Some("com.sample.app/com.sample.app.Main".to_string())
        );
    }

    #[test]
    fn parse_flattened_expands_relative_class() {
        let component = ComponentRef::parse_flattened("com.sample.app/.ui.Home\n").unwrap();
        assert_eq!(component.package_id, "com.sample.app");
        assert_eq!(component.class_name, "com.sample.app.ui.Home");
    }

    #[test]
    fn parse_flattened_rejects_malformed_input() {
        assert!(ComponentRef::parse_flattened("No activity found").is_none());
        assert!(ComponentRef::parse_flattened("/.Main").is_none());
    }
}
