//! APNs transport using the a2 crate.

use a2::NotificationBuilder as _;
use push_core::{Alert, DeliveryResult, Error, Failed};

use crate::{ApnsNotification, ApnsOptions, ApnsTransport, PROVIDER};

/// One HTTP/2 connection to APNs, shared by every send.
pub struct A2Transport {
    client: a2::Client,
    production: bool,
}

enum Outcome {
    Sent,
    Failed(Failed),
}

impl A2Transport {
    /// Open the connection described by `options`.
    pub fn connect(options: &ApnsOptions) -> Result<Self, Error> {
        let config = client_config(options);

        let client = if let Some(token) = &options.token {
            let pem = read_pem(&token.key)?;
            let mut cursor = std::io::Cursor::new(pem);
            a2::Client::token(&mut cursor, token.key_id.as_str(), token.team_id.as_str(), config)
        } else if let Some(path) = &options.pfx {
            let der = std::fs::read(path).map_err(|e| Error::connection_setup(PROVIDER, e))?;
            let mut cursor = std::io::Cursor::new(der);
            let password = options.passphrase.as_deref().unwrap_or_default();
            a2::Client::certificate(&mut cursor, password, config)
        } else if let (Some(cert), Some(key)) = (&options.cert, &options.key) {
            a2::Client::certificate_parts(cert.as_bytes(), key.as_bytes(), config)
        } else {
            return Err(Error::connection_setup(
                PROVIDER,
                "no token, pfx or cert/key pair configured",
            ));
        }
        .map_err(|e| Error::connection_setup(PROVIDER, e))?;

        tracing::info!(
            production = options.production,
            auth = ?options.auth(),
            "APNs connection ready"
        );

        Ok(Self {
            client,
            production: options.production,
        })
    }

    /// Whether this connection targets the production gateway.
    pub fn is_production(&self) -> bool {
        self.production
    }

    async fn send_one(&self, payload: a2::request::payload::Payload<'_>) -> Outcome {
        let device = payload.device_token.to_string();
        match self.client.send(payload).await {
            Ok(_) => Outcome::Sent,
            Err(a2::Error::ResponseError(response)) => {
                let body = response.error.map(|body| {
                    serde_json::json!({
                        "reason": format!("{:?}", body.reason),
                        "timestamp": body.timestamp,
                    })
                });
                Outcome::Failed(Failed::with_status(device, response.code, body))
            }
            Err(e) => Outcome::Failed(Failed::with_error(device, e)),
        }
    }
}

/// Build the request for one device, custom root keys included.
fn build_payload<'a>(
    notification: &'a ApnsNotification,
    device: &'a str,
    expiration: Option<u64>,
) -> Result<a2::request::payload::Payload<'a>, Error> {
    let mut builder = a2::DefaultNotificationBuilder::new();

    match &notification.alert {
        Some(Alert::Text(text)) => builder = builder.set_body(text),
        Some(Alert::Structured(alert)) => {
            if let Some(title) = &alert.title {
                builder = builder.set_title(title);
            }
            if let Some(subtitle) = &alert.subtitle {
                builder = builder.set_subtitle(subtitle);
            }
            if let Some(body) = &alert.body {
                builder = builder.set_body(body);
            }
        }
        None => {}
    }
    if let Some(badge) = notification.badge {
        builder = builder.set_badge(badge);
    }
    if let Some(sound) = &notification.sound {
        builder = builder.set_sound(sound);
    }
    if let Some(category) = &notification.category {
        builder = builder.set_category(category);
    }
    if notification.content_available == Some(true) {
        builder = builder.set_content_available();
    }

    let mut payload = builder.build(
        device,
        a2::NotificationOptions {
            apns_topic: notification.topic.as_deref(),
            apns_expiration: expiration,
            ..Default::default()
        },
    );

    // urlArgs has no builder support; it reaches the device as a root key.
    for (key, value) in &notification.payload {
        payload
            .add_custom_data(key, value)
            .map_err(|e| Error::payload(PROVIDER, e))?;
    }

    Ok(payload)
}

impl ApnsTransport for A2Transport {
    async fn send(
        &self,
        notification: &ApnsNotification,
        devices: &[String],
    ) -> Result<DeliveryResult, Error> {
        let expiration = notification
            .expiry
            .map(|ttl| chrono::Utc::now().timestamp().max(0) as u64 + ttl);

        // Encode every request before the first one goes out.
        let payloads = devices
            .iter()
            .map(|device| build_payload(notification, device, expiration))
            .collect::<Result<Vec<_>, _>>()?;

        let sends = payloads.into_iter().map(|payload| self.send_one(payload));
        let outcomes = futures::future::join_all(sends).await;

        let mut result = DeliveryResult::new();
        for (device, outcome) in devices.iter().zip(outcomes) {
            match outcome {
                Outcome::Sent => result.push_sent(device.as_str()),
                Outcome::Failed(failure) => result.push_failed(failure),
            }
        }

        Ok(result)
    }
}

fn client_config(options: &ApnsOptions) -> a2::ClientConfig {
    let endpoint = if options.production {
        a2::Endpoint::Production
    } else {
        a2::Endpoint::Sandbox
    };

    let mut config = a2::ClientConfig::new(endpoint);
    if let Some(secs) = options.extra.get("requestTimeoutSecs").and_then(|v| v.as_u64()) {
        config.request_timeout_secs = Some(secs);
    }
    if let Some(secs) = options.extra.get("poolIdleTimeoutSecs").and_then(|v| v.as_u64()) {
        config.pool_idle_timeout_secs = Some(secs);
    }

    config
}

/// Inline PEM, or a path to a PEM file.
fn read_pem(key: &str) -> Result<Vec<u8>, Error> {
    if key.trim_start().starts_with("-----BEGIN") {
        return Ok(key.as_bytes().to_vec());
    }

    std::fs::read(key).map_err(|e| Error::connection_setup(PROVIDER, e))
}
