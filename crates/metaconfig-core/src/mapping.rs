//! Service name to command token table
//!
//! Parsed from the `serviceMapping` section:
//!
//! ```xml
//! <serviceMapping>
//!     <element name="networking" command="ospl"/>
//!     <element name="durability" command="durability"/>
//! </serviceMapping>
//! ```
//!
//! Each [`MetaConfiguration`](crate::MetaConfiguration) owns its table. Entries
//! keep insertion order, so a reverse lookup for a command shared by several
//! services always returns the service that was declared first.

use serde::Serialize;

use crate::document::DocumentElement;
use crate::error::{MetaError, MetaResult};

/// One mapping entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCommand {
    pub service: String,
    pub command: String,
}

/// Ordered service → command table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServiceMapping {
    entries: Vec<ServiceCommand>,
}

impl ServiceMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the command of `service`, returning the previous one
    pub fn insert(&mut self, service: impl Into<String>, command: impl Into<String>) -> Option<String> {
        let service = service.into();
        let command = command.into();
        match self.entries.iter_mut().find(|entry| entry.service == service) {
            Some(entry) => Some(std::mem::replace(&mut entry.command, command)),
            None => {
                self.entries.push(ServiceCommand { service, command });
                None
            }
        }
    }

    /// Command token of a service
    pub fn command_for_service(&self, service: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.service == service)
            .map(|entry| entry.command.as_str())
    }

    /// Reverse lookup; first declared service wins when a command is shared
    pub fn service_for_command(&self, command: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.command == command)
            .map(|entry| entry.service.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceCommand> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge the `element` children of a `serviceMapping` section
    ///
    /// Re-parsing the same section is idempotent; a later entry with the same
    /// service name overwrites the earlier one.
    pub fn parse_section(&mut self, section: &DocumentElement) -> MetaResult<()> {
        for entry in section.child_elements().filter(|c| c.name() == "element") {
            match (entry.attribute("name"), entry.attribute("command")) {
                (Some(name), Some(command)) => {
                    if let Some(previous) = self.insert(name, command) {
                        tracing::debug!(
                            service = name,
                            previous = %previous,
                            command,
                            "Service mapping overwritten"
                        );
                    }
                }
                _ => {
                    return Err(MetaError::structural(
                        "No name and/or command found",
                        section.path(),
                    ))
                }
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ServiceMapping {
    type Item = &'a ServiceCommand;
    type IntoIter = std::slice::Iter<'a, ServiceCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn section(xml: &str) -> Document {
        Document::parse(xml).unwrap()
    }

    #[test]
    fn test_parse_section() {
        let doc = section(
            r#"<serviceMapping>
                 <element name="networking" command="ospl"/>
                 <element name="durability" command="durability"/>
                 <other name="ignored" command="x"/>
               </serviceMapping>"#,
        );
        let mut mapping = ServiceMapping::new();
        mapping.parse_section(doc.root()).unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.command_for_service("networking"), Some("ospl"));
        assert_eq!(mapping.service_for_command("durability"), Some("durability"));
        assert_eq!(mapping.command_for_service("ignored"), None);
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let doc = section(r#"<serviceMapping><element name="a" command="x"/></serviceMapping>"#);
        let mut mapping = ServiceMapping::new();
        mapping.parse_section(doc.root()).unwrap();
        mapping.parse_section(doc.root()).unwrap();
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_later_entry_overwrites() {
        let mut mapping = ServiceMapping::new();
        assert_eq!(mapping.insert("a", "x"), None);
        assert_eq!(mapping.insert("a", "y"), Some("x".to_string()));
        assert_eq!(mapping.command_for_service("a"), Some("y"));
        assert_eq!(mapping.service_for_command("x"), None);
    }

    #[test]
    fn test_shared_command_returns_first_declared() {
        let mut mapping = ServiceMapping::new();
        mapping.insert("first", "cmd");
        mapping.insert("second", "cmd");
        assert_eq!(mapping.service_for_command("cmd"), Some("first"));
    }

    #[test]
    fn test_empty_values_are_accepted() {
        let doc = section(r#"<serviceMapping><element name="" command=""/></serviceMapping>"#);
        let mut mapping = ServiceMapping::new();
        mapping.parse_section(doc.root()).unwrap();
        assert_eq!(mapping.command_for_service(""), Some(""));
    }

    #[test]
    fn test_missing_command_fails() {
        let doc = section(r#"<serviceMapping><element name="a"/></serviceMapping>"#);
        let err = ServiceMapping::new().parse_section(doc.root()).unwrap_err();
        assert_eq!(err.path(), Some("/serviceMapping"));
        assert!(err.to_string().contains("No name and/or command found"));
    }
}
