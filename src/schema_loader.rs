//! Bundled JSON Schemas for library and roster files.
//!
//! Authoring tools write these files independently of the resolver, so each
//! loader validates the raw document against its schema before typed
//! deserialization. Schema violations are reported together rather than one
//! serde error at a time.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;

/// A schema compiled into the binary alongside the loader that uses it.
pub(crate) struct BundledSchema {
    pub name: &'static str,
    pub raw: &'static str,
}

pub(crate) const LIBRARY_SCHEMA: BundledSchema = BundledSchema {
    name: "content_library",
    raw: include_str!("../schema/content_library.schema.json"),
};

pub(crate) const ROSTER_SCHEMA: BundledSchema = BundledSchema {
    name: "roster_set",
    raw: include_str!("../schema/roster_set.schema.json"),
};

pub(crate) const MANIFEST_SCHEMA: BundledSchema = BundledSchema {
    name: "content_manifest",
    raw: include_str!("../schema/content_manifest.schema.json"),
};

fn compile(schema: &BundledSchema) -> Result<JSONSchema> {
    let schema_value: Value = serde_json::from_str(schema.raw)
        .with_context(|| format!("parsing bundled {} schema", schema.name))?;
    JSONSchema::compile(&schema_value)
        .map_err(|err| anyhow!("compiling bundled {} schema: {err}", schema.name))
}

/// Validate `document` against `schema`, collecting every violation.
pub(crate) fn validate_document(schema: &BundledSchema, document: &Value) -> Result<()> {
    let compiled = compile(schema)?;
    if let Err(errors) = compiled.validate(document) {
        let details = errors
            .map(|err| {
                let path = err.instance_path.to_string();
                if path.is_empty() {
                    err.to_string()
                } else {
                    format!("{path}: {err}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        bail!("document failed {} schema validation:\n{}", schema.name, details);
    }
    Ok(())
}
