//! Declarative extraction of order id / status / transaction reference
//! from gateway callback payloads.
//!
//! Each gateway names these fields differently (and some nest them), so
//! instead of per-gateway parsing code there is one mapping table per
//! gateway and a single extractor that walks it. A dot in a field name
//! descends into a nested object (`metadata.ref`).

use crate::gateway::Gateway;
use serde_json::Value;

pub struct CallbackMapping {
    pub id_fields: &'static [&'static str],
    pub status_fields: &'static [&'static str],
    pub txn_fields: &'static [&'static str],
}

static STRIPE: CallbackMapping = CallbackMapping {
    id_fields: &["id"],
    status_fields: &["status", "payment_status"],
    txn_fields: &["payment_intent"],
};

static PAYTABS: CallbackMapping = CallbackMapping {
    id_fields: &["cart_id", "reference_no"],
    status_fields: &["response_status", "payment_result"],
    txn_fields: &["tran_ref", "transaction_id"],
};

static TAP: CallbackMapping = CallbackMapping {
    id_fields: &["metadata.ref"],
    status_fields: &["status", "response.message"],
    txn_fields: &["id"],
};

impl Gateway {
    pub fn callback_mapping(&self) -> &'static CallbackMapping {
        match self {
            Gateway::Stripe => &STRIPE,
            Gateway::Paytabs => &PAYTABS,
            Gateway::Tap => &TAP,
        }
    }
}

/// Fields pulled out of one callback payload. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedCallback {
    pub id: Option<String>,
    pub status: Option<String>,
    pub txn: Option<String>,
}

impl CallbackMapping {
    pub fn extract(&self, payload: &Value) -> ExtractedCallback {
        ExtractedCallback {
            id: first_present(payload, self.id_fields),
            status: first_present(payload, self.status_fields),
            txn: first_present(payload, self.txn_fields),
        }
    }
}

/// First listed field that is present and non-null wins.
fn first_present(payload: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| lookup(payload, field).map(coerce))
}

fn lookup<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = payload;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Status fields are not always strings (PayTabs' payment_result is an
/// object); serialize anything structured so the ledger value stays
/// textual.
fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
