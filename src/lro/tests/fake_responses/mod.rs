// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Canned Compute Engine responses, in the JSON format used by the service.

use compute_ops_lro as lro;
use lro::model::Operation;
use serde_json::{Value, json};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

pub const ZONE_URL: &str =
    "https://www.googleapis.com/compute/v1/projects/test-p/zones/us-central1-f";

fn decode(value: Value) -> Result<Operation> {
    Ok(serde_json::from_value(value)?)
}

fn base(name: &str, status: &str) -> Value {
    json!({
        "kind": "compute#operation",
        "id": "1234567890",
        "name": name,
        "zone": ZONE_URL,
        "operationType": "delete",
        "targetLink": format!("{ZONE_URL}/instances/vm-1"),
        "selfLink": format!("{ZONE_URL}/operations/{name}"),
        "status": status,
    })
}

pub fn pending(name: &str) -> Result<Operation> {
    decode(base(name, "PENDING"))
}

pub fn running(name: &str, progress: i32) -> Result<Operation> {
    let mut value = base(name, "RUNNING");
    value["progress"] = json!(progress);
    decode(value)
}

pub fn done(name: &str) -> Result<Operation> {
    let mut value = base(name, "DONE");
    value["progress"] = json!(100);
    decode(value)
}

pub fn done_with_errors(name: &str) -> Result<Operation> {
    let mut value = base(name, "DONE");
    value["error"] = json!({
        "errors": [{
            "code": "RESOURCE_NOT_FOUND",
            "message": "The resource 'vm-1' was not found",
        }]
    });
    decode(value)
}

pub fn error(name: &str) -> Result<Operation> {
    let mut value = base(name, "ERROR");
    value["statusMessage"] = json!("Instance is in use");
    value["error"] = json!({
        "errors": [{
            "code": "RESOURCE_IN_USE_BY_ANOTHER_RESOURCE",
            "location": "vm-1",
            "message": "The instance 'vm-1' is being used by another resource",
        }, {
            "code": "FAILED_PRECONDITION",
            "message": "second error",
        }]
    });
    decode(value)
}

pub fn unknown(name: &str, status: &str) -> Result<Operation> {
    decode(base(name, status))
}

pub fn missing_name() -> Result<Operation> {
    decode(json!({"kind": "compute#operation", "status": "PENDING"}))
}
