use async_trait::async_trait;
use chipp_http::{HttpClient, HttpMethod, NoInterceptor};
use log::{debug, trace};
use mcu::SensorKind;

use crate::{CreateReading, Error, Result};

const CREATED: u32 = 201;

#[async_trait]
pub trait Submitter {
    async fn submit(&self, sensor_name: &str, kind: SensorKind, value: f64) -> Result<()>;
}

pub struct HttpSubmitter {
    endpoint: String,
    client: HttpClient<NoInterceptor>,
}

impl HttpSubmitter {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = HttpClient::new(endpoint)?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(&self, sensor_name: &str, kind: SensorKind, value: f64) -> Result<()> {
        let body = CreateReading::new(sensor_name, kind, value);

        let mut request = self.client.new_request_with_url(self.endpoint.clone())?;
        request.set_method(HttpMethod::Post);
        request.set_json_body(&body);

        trace!(
            "request: {}",
            String::from_utf8_lossy(&request.body.clone().unwrap_or_default())
        );

        let status = self
            .client
            .perform_request(request, |_, response| {
                trace!("response: {}", String::from_utf8_lossy(&response.body));
                Ok(u32::from(response.status_code))
            })
            .await?;

        if status != CREATED {
            return Err(Error::UnexpectedStatus(status));
        }

        debug!("submitted {kind} {value} for {sensor_name}");
        Ok(())
    }
}
