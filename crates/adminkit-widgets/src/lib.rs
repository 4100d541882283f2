//! adminkit Widgets - the admin's interactive form widgets
//!
//! Widget state for the admin pages, built on the choice, formset and
//! option crates:
//! - [`AutorisatieFormset`]: authorizations with component-filtered scopes
//!   and per-component extra fields
//! - [`ExternalServiceFormset`]: external APIs with auth credentials and
//!   NLX routing
//! - [`ProcestypeSelect`] and [`ResultaatSelect`]: selection list dropdowns
//!   loaded from the admin API
//! - [`page`]: mount the formsets from the host page's data blocks
//!
//! # Example
//!
//! ```rust
//! use adminkit_formset::DataBlocks;
//! use adminkit_widgets::{page, Component};
//! use serde_json::json;
//!
//! let blocks = DataBlocks::new()
//!     .with("formset-config", json!({"prefix": "form", "TOTAL_FORMS": 0, "INITIAL_FORMS": 0}))
//!     .with("formdata", json!([]))
//!     .with("scope-choices", json!([["zaken.lezen", "Zaken lezen"], ["catalogi.lezen", "Catalogi lezen"]]));
//!
//! let mut formset = page::mount_authorizations(&blocks).unwrap();
//! let index = formset.add_form().unwrap();
//! formset.select_component(index, Some(Component::Zrc)).unwrap();
//! formset.toggle_scope(index, "zaken.lezen").unwrap();
//!
//! let submission = formset.submission();
//! assert_eq!(submission.get("form-TOTAL_FORMS"), Some("1"));
//! assert_eq!(submission.get_all("form-0-scopes"), vec!["zaken.lezen"]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod autorisatie;
pub mod component;
pub mod config;
pub mod error;
pub mod external_service;
mod fields;
pub mod page;
pub mod selectielijst;

pub use autorisatie::{
    AuthorizationConstants, AutorisatieForm, AutorisatieFormset, Catalogus, CatalogusOptions,
    ExternalTypes, Pk, TextInput, TypeOption,
};
pub use component::{default_prefix_table, Component, ExtraFields, TypeSelection, TypesField};
pub use config::{AdminkitConfig, SharedSource};
pub use error::WidgetError;
pub use external_service::{
    initial_organization, AuthType, CredentialField, ExternalServiceForm, ExternalServiceFormset,
    NlxChoices, NlxSelection, NlxService, ServiceConstants,
};
pub use selectielijst::{Procestype, ProcestypeDecoder, ProcestypeSelect, RadioOption, ResultaatSelect};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the admin widgets
    pub use crate::page::{mount_authorizations, mount_external_services};
    pub use crate::{
        AdminkitConfig, AuthType, AutorisatieFormset, Component, ExternalServiceFormset,
        ProcestypeSelect, ResultaatSelect, WidgetError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
