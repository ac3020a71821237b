//! AdBlocker Ultimate popup RPC server: JSON messages over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"updateTotalBlocked", "params":{"blocked":12}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Event:    {"event":"promotion", "tier":{...}} after a rank promotion.

use std::sync::Mutex;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use abu_popup::app::Extension;
use abu_popup::message_handler::handle_method;
use abu_popup::platform;

use serde_json::{json, Value};

async fn emit(stdout: &mut io::Stdout, value: &Value) -> io::Result<()> {
    stdout.write_all(format!("{}\n", value).as_bytes()).await?;
    stdout.flush().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let data_dir = match std::env::var("ABU_POPUP_DATA_DIR") {
        Ok(dir) => std::path::PathBuf::from(dir),
        Err(_) => platform::get_data_dir(),
    };
    std::fs::create_dir_all(&data_dir)?;
    let db_path = data_dir.join("abu-popup.db");
    let settings_path = std::env::var("ABU_POPUP_SETTINGS").ok();

    let ext = Mutex::new(Extension::new(&db_path.to_string_lossy(), settings_path)?);
    log::info!("Local storage opened at {}", db_path.display());

    let mut stdout = io::stdout();
    emit(&mut stdout, &json!({"event":"ready","version":env!("CARGO_PKG_VERSION")})).await?;

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&mut stdout, &json!({"id":null,"error":format!("parse error: {}", e)})).await?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&ext, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                log::warn!("{} failed: {}", method, err);
                json!({"id": id, "error": err})
            }
        };
        emit(&mut stdout, &response).await?;

        let promotions = ext.lock().map(|e| e.promotions.drain()).unwrap_or_default();
        for tier in promotions {
            emit(&mut stdout, &json!({"event": "promotion", "tier": tier})).await?;
        }
    }

    if let Ok(e) = ext.lock() {
        e.shutdown();
    }
    Ok(())
}
