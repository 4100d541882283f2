//! Subcommand implementations, kept free of argument parsing

use adminkit_choices::Choice;
use adminkit_formset::{DataBlocks, Submission};
use adminkit_options::{DependentOptions, LoadState, LoadStatus};
use adminkit_widgets::page::{authorization_constants, mount_authorizations, mount_external_services};
use adminkit_widgets::AdminkitConfig;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Which formset a page holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormKind {
    Authorizations,
    Services,
}

impl FormKind {
    pub(crate) fn parse(value: &str) -> Result<Self> {
        match value {
            "authorizations" => Ok(Self::Authorizations),
            "services" => Ok(Self::Services),
            other => bail!("unknown form kind: {other}"),
        }
    }
}

/// Which selection list endpoint to query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Procestypen,
    Resultaten,
}

impl Endpoint {
    pub(crate) fn parse(value: &str) -> Result<Self> {
        match value {
            "procestypen" => Ok(Self::Procestypen),
            "resultaten" => Ok(Self::Resultaten),
            other => bail!("unknown endpoint: {other}"),
        }
    }
}

pub(crate) fn read_blocks(path: &Path) -> Result<DataBlocks> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    DataBlocks::from_json_str(&contents)
        .with_context(|| format!("failed to parse data blocks in {}", path.display()))
}

/// Scopes offered for a component
pub(crate) fn scopes(blocks: &DataBlocks, component: &str) -> Result<Vec<Choice>> {
    let constants = authorization_constants(blocks).context("invalid authorization blocks")?;
    if !constants.scopes.prefixes.contains_key(component) {
        tracing::warn!(component, "component has no scope prefixes");
    }
    Ok(constants.scopes.available_for(component))
}

/// Mount a page, append blank rows and encode what it would post
pub(crate) fn submission(blocks: &DataBlocks, kind: FormKind, add: usize) -> Result<Submission> {
    match kind {
        FormKind::Authorizations => {
            let mut formset = mount_authorizations(blocks).context("failed to mount authorizations")?;
            for _ in 0..add {
                formset.add_form()?;
            }
            Ok(formset.submission())
        }
        FormKind::Services => {
            let mut formset =
                mount_external_services(blocks).context("failed to mount external services")?;
            for _ in 0..add {
                formset.add_form()?;
            }
            Ok(formset.submission())
        }
    }
}

/// Load the options of a selection list endpoint for one key
pub(crate) async fn options(config: &AdminkitConfig, endpoint: Endpoint, key: &str) -> Result<LoadState> {
    let source = match endpoint {
        Endpoint::Procestypen => config.procestypen_source()?,
        Endpoint::Resultaten => config.resultaten_source()?,
    };
    let state = DependentOptions::new(source).load(key).await;
    if state.status == LoadStatus::Failed {
        match &state.error {
            Some(err) => bail!("failed to load {endpoint:?} for {key:?}: {err}"),
            None => bail!("failed to load {endpoint:?} for {key:?}"),
        }
    }
    Ok(state)
}

pub(crate) fn render_choices(choices: &[Choice], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(choices)?);
    }
    Ok(choices
        .iter()
        .map(|c| format!("{}\t{}", c.value, c.label))
        .collect::<Vec<_>>()
        .join("\n"))
}

pub(crate) fn render_submission(submission: &Submission, json: bool) -> Result<String> {
    if json {
        let pairs: Vec<(&str, &str)> = submission.iter().collect();
        return Ok(serde_json::to_string_pretty(&pairs)?);
    }
    Ok(submission.to_urlencoded())
}
