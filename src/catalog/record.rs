//! On-disk spec records.
//!
//! Each record is a TOML file named after the spec it describes
//! (`subsystem.logging.console-handler.toml`). List-valued fields are
//! comma-separated strings; per-parameter flags live in `[param.<name>]`
//! tables:
//!
//! ```toml
//! op = "add"
//! op-params = "level"
//! params = "subsystem,console-handler,level,named-formatter"
//! refs = "subsystem.logging"
//! capabilities-provided = "org.wildfly.logging.handler.$console-handler"
//! capabilities-required = "org.wildfly.logging.formatter.$named-formatter"
//!
//! [param.subsystem]
//! feature-id = true
//! default = "logging"
//!
//! [param.console-handler]
//! feature-id = true
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::spec::{FeatureParameterSpec, FeatureSpec};
use crate::core::{FeatureScriptError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct SpecRecord {
    op: Option<String>,
    op_params: Option<String>,
    addr_params: Option<String>,
    params: Option<String>,
    refs: Option<String>,
    capabilities_required: Option<String>,
    capabilities_provided: Option<String>,
    branch: Option<String>,
    #[serde(default)]
    param: BTreeMap<String, ParamRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ParamRecord {
    default: Option<String>,
    #[serde(default)]
    feature_id: bool,
}

/// Split a comma-separated list. Blank input is an empty list; blank elements are errors.
pub fn split_list(field: &str, raw: Option<&str>) -> std::result::Result<Vec<String>, String> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(str::trim)
        .map(|item| {
            if item.is_empty() {
                Err(format!("malformed list in '{field}': empty element in \"{raw}\""))
            } else {
                Ok(item.to_string())
            }
        })
        .collect()
}

/// Parse the record text of spec `name`. `file` is only used in error messages.
pub fn parse_record(name: &str, file: &str, content: &str) -> Result<FeatureSpec> {
    let record: SpecRecord = toml::from_str(content)
        .map_err(|e| FeatureScriptError::catalog(file, e.message().to_string()))?;
    let list = |field: &str, raw: &Option<String>| {
        split_list(field, raw.as_deref()).map_err(|reason| FeatureScriptError::catalog(file, reason))
    };

    let param_names = list("params", &record.params)?;
    if let Some(unknown) = record.param.keys().find(|k| !param_names.contains(k)) {
        return Err(FeatureScriptError::catalog(
            file,
            format!("[param.{unknown}] references undeclared parameter '{unknown}'"),
        ));
    }

    let mut builder = FeatureSpec::builder(name)
        .op_params(list("op-params", &record.op_params)?)
        .addr_params(list("addr-params", &record.addr_params)?)
        .refs(list("refs", &record.refs)?)
        .requires(list("capabilities-required", &record.capabilities_required)?)
        .provides(list("capabilities-provided", &record.capabilities_provided)?);
    if let Some(op) = record.op.filter(|op| !op.trim().is_empty()) {
        builder = builder.op(op.trim());
    }
    if let Some(branch) = record.branch {
        builder = builder.branch(branch);
    }
    for name in param_names {
        let flags = record.param.get(&name);
        let mut param = if flags.is_some_and(|f| f.feature_id) {
            FeatureParameterSpec::id(&name)
        } else {
            FeatureParameterSpec::new(&name)
        };
        if let Some(default) = flags.and_then(|f| f.default.clone()) {
            param = param.with_default(default);
        }
        builder = builder.param(param);
    }

    builder.build().map_err(|e| match e {
        FeatureScriptError::CatalogLoad {
            reason,
            ..
        } => FeatureScriptError::catalog(file, reason),
        other => other,
    })
}

/// Read and parse one record file; the spec name is the file stem.
pub fn load_record(path: &Path) -> Result<FeatureSpec> {
    let file = path.display().to_string();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| FeatureScriptError::catalog(&file, "file name is not valid UTF-8"))?;
    let content = std::fs::read_to_string(path)
        .map_err(|e| FeatureScriptError::catalog(&file, format!("failed to read record: {e}")))?;
    parse_record(name, &file, &content)
}
