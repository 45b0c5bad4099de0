use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::services::store::{new_id, now_iso};
use crate::services::MockStore;
use crate::types::ActionLog;

struct Template {
    actor: &'static str,
    method: &'static str,
    endpoint: &'static str,
    status: u16,
}

const TEMPLATES: &[Template] = &[
    Template { actor: "agent", method: "GET", endpoint: "/redfish/v1/Chassis/1/Power", status: 200 },
    Template { actor: "agent", method: "GET", endpoint: "/redfish/v1/Chassis/1/Thermal", status: 200 },
    Template { actor: "user", method: "PATCH", endpoint: "/redfish/v1/Chassis/1/Thermal", status: 200 },
    Template { actor: "agent", method: "GET", endpoint: "/redfish/v1/Chassis/1/Sensors/Voltage", status: 200 },
    Template { actor: "scheduler", method: "POST", endpoint: "/redfish/v1/Systems/1/Actions/ComputerSystem.Reset", status: 500 },
    Template { actor: "user", method: "GET", endpoint: "/redfish/v1/Chassis/1/Power", status: 404 },
];

/// Builds the `n`th synthetic action log; the templates repeat in order.
pub fn synthetic_action_log(n: u64) -> ActionLog {
    let template = &TEMPLATES[(n % TEMPLATES.len() as u64) as usize];
    ActionLog {
        id: new_id(),
        timestamp: now_iso(),
        actor: template.actor.to_string(),
        endpoint: template.endpoint.to_string(),
        method: template.method.to_string(),
        status: template.status,
        payload: payload_for(template),
        response: response_for(template, n),
    }
}

fn payload_for(template: &Template) -> Value {
    match template.method {
        "PATCH" => json!({ "Fans": [{ "MemberId": "0", "Reading": 60 }] }),
        "POST" => json!({ "ResetType": "GracefulRestart" }),
        _ => json!({}),
    }
}

fn response_for(template: &Template, n: u64) -> Value {
    match template.status {
        200 => json!({
            "@odata.id": template.endpoint,
            "Reading": 40 + (n % 20),
            "Status": { "Health": "OK", "State": "Enabled" }
        }),
        status => json!({
            "error": {
                "code": format!("Base.1.0.{}", status),
                "message": "The request could not be completed."
            }
        }),
    }
}

/// Records one synthetic action log per `every`, starting immediately.
pub fn spawn_action_log_generator(store: Arc<MockStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        let mut n: u64 = 0;
        loop {
            ticker.tick().await;
            let log = synthetic_action_log(n);
            tracing::debug!(actor = %log.actor, endpoint = %log.endpoint, "recorded action log");
            store.push_action_log(log);
            n = n.wrapping_add(1);
        }
    })
}
