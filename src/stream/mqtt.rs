//! MQTT transport for snapshot streams
//!
//! The BMP header of each session is published on `<topic>/snapshot/begin`
//! (its file size field tells subscribers how many bytes follow), then every
//! pixel chunk becomes one publish on `<topic>/snapshot`, in order.

use std::thread;
use std::time::Duration;

use rumqttc::{Client, ClientError, Connection, Event, MqttOptions, Packet, QoS};
use tracing::{debug, info, warn};

use super::sink::ChunkSink;
use crate::error::SinkError;

pub const DEFAULT_PORT: u16 = 1883;
pub const DEFAULT_TOPIC: &str = "gfxblend";

/// Outgoing request queue length; a full queue shows up as `SinkError::Busy`
const QUEUE_CAPACITY: usize = 16;

/// Chunk sink publishing to an MQTT broker from a background event loop
pub struct MqttSink {
    client: Client,
    data_topic: String,
    begin_topic: String,
    _thread: thread::JoinHandle<()>,
}

impl MqttSink {
    /// Connect to the broker. Fails if the first connection attempt fails.
    pub fn connect(host: &str, port: u16, topic: &str) -> Result<Self, SinkError> {
        let topic = if topic.is_empty() { DEFAULT_TOPIC } else { topic };

        let mut options = MqttOptions::new("gfxblend", host, port);
        options.set_keep_alive(Duration::from_secs(30));
        options.set_max_packet_size(64 * 1024, 64 * 1024);

        let (client, mut connection) = Client::new(options, QUEUE_CAPACITY);

        // Poll once so an unreachable broker fails here and not mid-stream
        match connection.iter().next() {
            Some(Ok(_)) => {},
            Some(Err(e)) => return Err(e.into()),
            None => return Err(SinkError::Closed),
        }

        let handle = thread::spawn(move || Self::event_loop(connection));

        info!(host, port, topic, "mqtt sink connected");

        Ok(Self {
            client,
            data_topic: format!("{}/snapshot", topic),
            begin_topic: format!("{}/snapshot/begin", topic),
            _thread: handle,
        })
    }

    fn event_loop(mut connection: Connection) {
        for event in connection.iter() {
            match event {
                Ok(Event::Incoming(Packet::PubAck(ack))) => {
                    debug!(pkid = ack.pkid, "mqtt chunk acknowledged");
                },
                Ok(_) => {},
                Err(e) => {
                    warn!(error = %e, "mqtt connection error");
                    // Connection may recover
                    thread::sleep(Duration::from_secs(1));
                },
            }
        }
    }

    pub fn data_topic(&self) -> &str {
        &self.data_topic
    }

    fn publish(client: &Client, topic: &str, payload: &[u8]) -> Result<(), SinkError> {
        match client.try_publish(topic, QoS::AtLeastOnce, false, payload.to_vec()) {
            Ok(()) => Ok(()),
            Err(ClientError::TryRequest(_)) => Err(SinkError::Busy),
            Err(ClientError::Request(_)) => Err(SinkError::Closed),
        }
    }
}

impl ChunkSink for MqttSink {
    fn send_header(&mut self, header: &[u8]) -> Result<(), SinkError> {
        Self::publish(&self.client, &self.begin_topic, header)
    }

    fn send(&mut self, chunk: &[u8]) -> Result<(), SinkError> {
        Self::publish(&self.client, &self.data_topic, chunk)
    }
}
