//! Metaconfig Core
//!
//! Loads a versioned schema document (`splice_metaconfig_<version>.xml`)
//! into an immutable, typed meta-model that describes which configuration
//! elements, attributes and values a deployment configuration may contain.
//!
//! ## Features
//!
//! - **Typed values**: eight content types (int, long, float, double,
//!   boolean, string, enum, size) with defaults and bounds
//! - **Size literals**: `64K`, `1M`, `2G` resolved to byte counts
//! - **Service mapping**: service name to command token lookups in both
//!   directions
//! - **Pluggable sources**: directory search path or in-memory resources
//! - **Serializable model**: every node derives `serde::Serialize`
//!
//! ## Example
//!
//! ```rust,no_run
//! use metaconfig_core::{DirectorySource, MetaConfiguration};
//!
//! let source = DirectorySource::new(["/opt/ospl/etc/config"]);
//! let config = MetaConfiguration::load(6.1, &source).unwrap();
//!
//! for service in config.services() {
//!     println!("{} -> {:?}", service.name(), config.command_for_service(service.name()));
//! }
//! ```

pub mod configuration;
pub mod document;
pub mod error;
pub mod mapping;
pub mod node;
pub mod parser;
pub mod settings;
pub mod size;
pub mod source;
pub mod value;

pub use configuration::MetaConfiguration;
pub use document::{Document, DocumentElement, DocumentNode};
pub use error::{ErrorKind, MetaError, MetaResult};
pub use mapping::{ServiceCommand, ServiceMapping};
pub use node::{MaxOccurrences, MetaAttribute, MetaElement, MetaNode};
pub use settings::{LoaderSettings, LoaderSettingsBuilder};
pub use size::{to_bytes, SizeLiteralError, SizeUnit};
pub use source::{resource_name, DirectorySource, MemorySource, SchemaSource, LATEST_VERSION};
pub use value::{ContentType, MetaValue};
