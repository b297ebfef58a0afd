use axum::extract::ws::{Message, WebSocket};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::reader::PlwReader;

#[derive(Serialize)]
struct SignalPayload {
    timestamp: f64,
    value: f64,
    desc: String,
    seq: u64,
    end_flag: bool,
}

/// Streams every row of one channel over a websocket, then an end marker.
pub async fn handle_ws_fetch(mut socket: WebSocket, reader: Arc<PlwReader>, channel_name: String) {
    info!("ws_fetch streaming started: {}", channel_name);

    let channel = match reader.get_channel_index_by_name(&channel_name) {
        Some(index) => index,
        None => {
            error!("channel not found: {}", channel_name);
            return;
        }
    };

    let chunk = match reader.read_channel(channel) {
        Ok(chunk) => chunk,
        Err(e) => {
            error!("read_channel failed: {}", e);
            return;
        }
    };

    let mut seq: u64 = 0;
    for (timestamp, value) in chunk.timestamps.iter().zip(chunk.values.iter()) {
        let payload = SignalPayload {
            timestamp: *timestamp,
            value: *value,
            desc: String::new(),
            seq,
            end_flag: false,
        };

        let json = match serde_json::to_string(&payload) {
            Ok(j) => j,
            Err(e) => {
                error!("json serialize error: {}", e);
                return;
            }
        };

        if let Err(e) = socket.send(Message::Text(json.into())).await {
            warn!("ws send failed: {}", e);
            return;
        }

        seq += 1;
    }

    let end_payload = SignalPayload {
        timestamp: 0.0,
        value: 0.0,
        desc: String::new(),
        seq,
        end_flag: true,
    };

    if let Ok(json) = serde_json::to_string(&end_payload) {
        let _ = socket.send(Message::Text(json.into())).await;
    }

    info!("ws_fetch finished: {} ({} samples)", channel_name, seq);
}
