//! JSON encoding and decoding of the alias file
//!
//! # File Format
//!
//! ```json
//! {
//!   "active-context": "work",
//!   "contexts": {
//!     "work": {
//!       "ll": {
//!         "instance": "vm1",
//!         "command": "ls -la",
//!         "working-directory": "map"
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Files written before contexts existed hold the alias records directly at
//! the top level. Those are read into the `default` context.
//!
//! Reading is lenient about the document shape (an empty or unparsable file
//! reads as no data) but strict about working directory values.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::context::AliasContext;
use crate::error::AliasResult;
use crate::models::{AliasDefinition, WorkingDirectory};
use crate::registry::{AliasRegistry, DEFAULT_CONTEXT};

const ACTIVE_CONTEXT_KEY: &str = "active-context";
const CONTEXTS_KEY: &str = "contexts";
const INSTANCE_KEY: &str = "instance";
const COMMAND_KEY: &str = "command";
const WORKING_DIRECTORY_KEY: &str = "working-directory";

/// Registry state decoded from a file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasDocument {
    /// `None` when the file carried no data
    pub active_context: Option<String>,
    pub contexts: HashMap<String, AliasContext>,
}

/// Encode the registry into a JSON document
///
/// Every working directory is validated before anything is produced.
pub fn encode(registry: &AliasRegistry) -> AliasResult<Value> {
    for (_, context) in registry.contexts() {
        for (_, definition) in context.iter() {
            definition.working_directory_mode()?;
        }
    }

    let mut contexts = Map::new();
    for (context_name, context) in registry.contexts() {
        let mut aliases = Map::new();
        for (alias_name, definition) in context.iter() {
            aliases.insert(alias_name.to_string(), serde_json::to_value(definition)?);
        }
        contexts.insert(context_name.to_string(), Value::Object(aliases));
    }

    let mut document = Map::new();
    document.insert(
        ACTIVE_CONTEXT_KEY.to_string(),
        Value::String(registry.get_active_context().to_string()),
    );
    document.insert(CONTEXTS_KEY.to_string(), Value::Object(contexts));

    Ok(Value::Object(document))
}

/// Encode the registry as the pretty-printed text written to disk
pub fn to_pretty_string(registry: &AliasRegistry) -> AliasResult<String> {
    let document = encode(registry)?;
    let mut text = serde_json::to_string_pretty(&document)?;
    text.push('\n');
    Ok(text)
}

/// Decode raw file bytes; bytes that are not UTF-8 read as no data
pub fn decode_bytes(content: &[u8]) -> AliasResult<AliasDocument> {
    match std::str::from_utf8(content) {
        Ok(text) => decode(text),
        Err(e) => {
            warn!("Aliases file is not valid UTF-8, ignoring it: {}", e);
            Ok(AliasDocument::default())
        }
    }
}

/// Decode file contents, detecting the legacy format
pub fn decode(content: &str) -> AliasResult<AliasDocument> {
    if content.trim().is_empty() {
        return Ok(AliasDocument::default());
    }

    let records = match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(records)) => records,
        Ok(_) => {
            warn!("Aliases file does not hold a JSON object, ignoring it");
            return Ok(AliasDocument::default());
        }
        Err(e) => {
            warn!("Aliases file is not valid JSON, ignoring it: {}", e);
            return Ok(AliasDocument::default());
        }
    };

    if records.is_empty() {
        return Ok(AliasDocument::default());
    }

    let mut contexts = HashMap::new();

    if records.contains_key(ACTIVE_CONTEXT_KEY) {
        let active_context = string_field(&records, ACTIVE_CONTEXT_KEY);

        if let Some(Value::Object(all_contexts)) = records.get(CONTEXTS_KEY) {
            for (context_name, context_records) in all_contexts {
                let context = match context_records {
                    Value::Object(context_records) => records_to_context(context_records)?,
                    _ => AliasContext::new(),
                };
                contexts.insert(context_name.clone(), context);
            }
        }

        Ok(AliasDocument {
            active_context: Some(active_context),
            contexts,
        })
    } else {
        info!("Migrating legacy aliases file into the '{}' context", DEFAULT_CONTEXT);
        contexts.insert(DEFAULT_CONTEXT.to_string(), records_to_context(&records)?);

        Ok(AliasDocument {
            active_context: Some(DEFAULT_CONTEXT.to_string()),
            contexts,
        })
    }
}

fn records_to_context(records: &Map<String, Value>) -> AliasResult<AliasContext> {
    let mut context = AliasContext::new();

    for (alias_name, record) in records {
        // Parsing of a context stops at the first record that is not a
        // populated object.
        let record = match record {
            Value::Object(record) if !record.is_empty() => record,
            _ => {
                warn!("Malformed alias record '{}', skipping the rest of its context", alias_name);
                break;
            }
        };

        let working_directory = match record.get(WORKING_DIRECTORY_KEY) {
            Some(Value::String(value)) if !value.is_empty() => value.clone(),
            _ => WorkingDirectory::Default.as_str().to_string(),
        };

        let definition = AliasDefinition {
            instance: string_field(record, INSTANCE_KEY),
            command: string_field(record, COMMAND_KEY),
            working_directory,
        };
        definition.working_directory_mode()?;

        context.add(alias_name.clone(), definition);
    }

    Ok(context)
}

fn string_field(record: &Map<String, Value>, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
