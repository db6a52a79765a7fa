use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "gateway": {
                "type": "object",
                "properties": {
                    "mode": { "type": "string", "enum": ["mock", "http"] },
                    "base_url": { "type": "string", "format": "uri" },
                    "timeout_secs": { "type": "integer", "minimum": 1 }
                }
            },
            "mock": {
                "type": "object",
                "properties": {
                    "latency_ms": { "type": "integer", "minimum": 0 },
                    "failure_rate": { "type": "number", "minimum": 0, "maximum": 1 },
                    "seed": { "type": "integer", "minimum": 0 },
                    "dataset_size": { "type": "integer", "minimum": 0 }
                }
            },
            "notifications": {
                "type": "object",
                "properties": {
                    "ttl_secs": { "type": "integer", "minimum": 1, "maximum": 86400 }
                }
            },
            "pagination": {
                "type": "object",
                "properties": {
                    "page_size": { "type": "integer", "minimum": 1 }
                }
            },
            "session": {
                "type": "object",
                "properties": {
                    "path": { "type": "string" }
                }
            },
            "server": {
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 },
                    "db": { "type": "string" }
                }
            }
        },
        "additionalProperties": false
    })
});
