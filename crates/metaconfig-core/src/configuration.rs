//! The loaded meta-model
//!
//! A schema document has this outer shape:
//!
//! ```xml
//! <splice_meta_config version="6.1">
//!     <rootElement name="OpenSplice" minOccurrences="1" maxOccurrences="1"/>
//!     <element name="Domain" minOccurrences="1" maxOccurrences="1">...</element>
//!     <element name="DDSI2Service" minOccurrences="0" maxOccurrences="0">...</element>
//!     <serviceMapping>
//!         <element name="networking" command="ospl"/>
//!     </serviceMapping>
//! </splice_meta_config>
//! ```
//!
//! [`MetaConfiguration::load`] walks it once and either returns a complete,
//! immutable meta-model or an error; nothing partial is ever returned.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::document::Document;
use crate::error::{MetaError, MetaResult};
use crate::mapping::ServiceMapping;
use crate::node::MetaElement;
use crate::parser::{parse_element, parse_root_element};
use crate::source::{resource_name, SchemaSource, LATEST_VERSION};

/// Root element, services and service mapping of one schema version
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaConfiguration {
    version: f64,
    root_element: MetaElement,
    services: Vec<Arc<MetaElement>>,
    service_mapping: ServiceMapping,
}

impl MetaConfiguration {
    /// Load the schema document of `version` from `source`
    ///
    /// Failures are logged and returned; the reported version is the
    /// requested one, not the one written in the document.
    pub fn load<S>(version: f64, source: &S) -> MetaResult<Self>
    where
        S: SchemaSource + ?Sized,
    {
        let resource = resource_name(version);
        let result = source
            .read(&resource)
            .and_then(|text| text.ok_or_else(|| MetaError::NotFound(resource.clone())))
            .and_then(|text| Self::from_xml(&text))
            .map(|mut configuration| {
                configuration.version = version;
                configuration
            });

        match &result {
            Ok(configuration) => tracing::info!(
                resource = %resource,
                services = configuration.services.len(),
                mappings = configuration.service_mapping.len(),
                "Meta configuration loaded"
            ),
            Err(e) => tracing::error!(
                resource = %resource,
                error = %e,
                "Exception occurred during initialization of meta configuration"
            ),
        }
        result
    }

    /// [`load`](Self::load) for callers that only distinguish success from failure
    pub fn try_load<S>(version: f64, source: &S) -> Option<Self>
    where
        S: SchemaSource + ?Sized,
    {
        Self::load(version, source).ok()
    }

    /// Load the latest known schema version
    pub fn load_latest<S>(source: &S) -> MetaResult<Self>
    where
        S: SchemaSource + ?Sized,
    {
        Self::load(LATEST_VERSION, source)
    }

    /// Build from schema document text, keeping the version the document declares
    pub fn from_xml(text: &str) -> MetaResult<Self> {
        Self::from_document(&Document::parse(text)?)
    }

    /// Build from an already parsed document
    pub fn from_document(document: &Document) -> MetaResult<Self> {
        let top = document.root();
        let version = document_version(top)?;

        let mut root: Option<MetaElement> = None;
        let mut services = Vec::new();
        let mut service_mapping = ServiceMapping::new();

        for child in top.child_elements() {
            match child.name() {
                // a later rootElement replaces an earlier one
                "rootElement" => root = Some(parse_root_element(child)?),
                "element" => {
                    let service = Arc::new(parse_element(child)?);
                    let root = root.as_mut().ok_or_else(|| {
                        MetaError::structural("Could not resolve meta configuration", child.path())
                    })?;
                    tracing::debug!(service = service.name(), "Parsed service element");
                    root.push_child(Arc::clone(&service));
                    services.push(service);
                }
                "serviceMapping" => service_mapping.parse_section(child)?,
                _ => {}
            }
        }

        let root_element = root.ok_or_else(|| {
            MetaError::structural("No rootElement found", top.path())
        })?;
        if version == 0.0 {
            return Err(MetaError::structural(
                "Meta configuration version must not be zero",
                top.path(),
            ));
        }

        Ok(Self {
            version,
            root_element,
            services,
            service_mapping,
        })
    }

    pub fn root_element(&self) -> &MetaElement {
        &self.root_element
    }

    /// Top-level service elements in document order
    pub fn services(&self) -> &[Arc<MetaElement>] {
        &self.services
    }

    /// Service element named `name`
    pub fn service(&self, name: &str) -> Option<&Arc<MetaElement>> {
        self.services.iter().find(|service| service.name() == name)
    }

    pub fn version(&self) -> f64 {
        self.version
    }

    pub fn service_mapping(&self) -> &ServiceMapping {
        &self.service_mapping
    }

    pub fn command_for_service(&self, name: &str) -> Option<&str> {
        self.service_mapping.command_for_service(name)
    }

    pub fn service_for_command(&self, command: &str) -> Option<&str> {
        self.service_mapping.service_for_command(command)
    }
}

impl fmt::Display for MetaConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MetaConfiguration version: {}", self.version)?;
        writeln!(f, "ROOT_ELEMENT:")?;
        write_indented(f, &self.root_element)?;
        for service in &self.services {
            writeln!(f, "SERVICE:")?;
            write_indented(f, service)?;
        }
        Ok(())
    }
}

fn write_indented(f: &mut fmt::Formatter<'_>, element: &MetaElement) -> fmt::Result {
    for line in element.to_string().lines() {
        writeln!(f, "\t{}", line)?;
    }
    Ok(())
}

fn document_version(top: &crate::document::DocumentElement) -> MetaResult<f64> {
    let raw = top.attribute("version").unwrap_or_default();
    raw.trim().parse::<f64>().map_err(|_| {
        MetaError::format(
            format!("Invalid value '{}' of attribute 'version'", raw),
            top.path(),
        )
    })
}
