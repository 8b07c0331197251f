use std::{collections::BTreeMap, error::Error as _, io, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{AbsolutePose, Endpoint, Error, MotionRequest, TeleopCommand};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PhosphobotClientConfig {
    #[serde(default = "default_base_url")]
    #[schemars(with = "String")]
    pub base_url: Url,
    /// Index of the robot that receives the commands.
    #[serde(default)]
    pub robot_id: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
    /// Timeout of `/move/init`. Kept apart from `timeout_secs`.
    #[serde(default = "default_timeout_secs")]
    pub init_timeout_secs: f64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Static headers sent with every request.
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
}

impl Default for PhosphobotClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            robot_id: 0,
            timeout_secs: default_timeout_secs(),
            init_timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            headers: default_headers(),
        }
    }
}

/// Locally hosted Phosphobot instance.
pub const DEFAULT_BASE_URL: &str = "http://localhost/";
pub const DEFAULT_TIMEOUT_SECS: f64 = 20.0;

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap()
}

fn default_timeout_secs() -> f64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    "vlarm/1.0".to_owned()
}

fn default_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Accept".to_owned(), "application/json".to_owned());
    headers
}

/// Issues one GET per call against the robot-control API.
///
/// The client holds configuration only; each request builds its own
/// [`ureq::Agent`] and drops it when the response has been received.
#[derive(Debug, Clone)]
pub struct PhosphobotClient {
    base_url: Url,
    timeout: Duration,
    init_timeout: Duration,
    config: PhosphobotClientConfig,
}

impl PhosphobotClient {
    pub fn new(config: PhosphobotClientConfig) -> Result<Self, Error> {
        let timeout = to_duration("timeout_secs", config.timeout_secs)?;
        let init_timeout = to_duration("init_timeout_secs", config.init_timeout_secs)?;
        let mut base_url = config.base_url.clone();
        // `Url::join` replaces the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            timeout,
            init_timeout,
            config,
        })
    }

    pub fn config(&self) -> &PhosphobotClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn robot_id(&self) -> u32 {
        self.config.robot_id
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn init_timeout(&self) -> Duration {
        self.init_timeout
    }

    /// Full url of a request, `robot_id` first.
    pub fn request_url(&self, endpoint: Endpoint, request: &MotionRequest) -> Result<Url, Error> {
        let mut url = self
            .base_url
            .join(endpoint.path())
            .map_err(|e| Error::InvalidUrl(self.base_url.to_string(), e))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("robot_id", &self.config.robot_id.to_string());
            for (name, value) in request.params() {
                query.append_pair(name, &value.to_string());
            }
        }
        Ok(url)
    }

    /// Sends a GET and succeeds only on a 2xx status.
    pub fn get(
        &self,
        endpoint: Endpoint,
        request: &MotionRequest,
        timeout: Duration,
    ) -> Result<(), Error> {
        let url = self.request_url(endpoint, request)?;
        debug!(%url, ?timeout, "sending request");

        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(&self.config.user_agent)
            .build();
        let mut req = agent.request_url("GET", &url);
        for (name, value) in &self.config.headers {
            req = req.set(name, value);
        }
        let response = req
            .call()
            .map_err(|e| map_request_error(&url, timeout, e))?;

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status,
                reason: response.status_text().to_owned(),
            });
        }
        debug!(%url, status, "request succeeded");
        Ok(())
    }

    pub fn init(&self) -> Result<(), Error> {
        self.get(Endpoint::Init, &MotionRequest::new(), self.init_timeout())
    }

    pub fn move_absolute(&self, pose: &AbsolutePose) -> Result<(), Error> {
        self.get(Endpoint::Absolute, &MotionRequest::from(pose), self.timeout())
    }

    pub fn hello(&self) -> Result<(), Error> {
        self.get(Endpoint::Hello, &MotionRequest::new(), self.timeout())
    }

    pub fn teleop(&self, command: &TeleopCommand) -> Result<(), Error> {
        self.get(Endpoint::Teleop, &MotionRequest::from(command), self.timeout())
    }

    pub fn gravity_start(&self) -> Result<(), Error> {
        self.get(Endpoint::GravityStart, &MotionRequest::new(), self.timeout())
    }

    pub fn gravity_stop(&self) -> Result<(), Error> {
        self.get(Endpoint::GravityStop, &MotionRequest::new(), self.timeout())
    }
}

/// Rejects values that are negative, zero, NaN or too large for a [`Duration`].
fn to_duration(name: &'static str, secs: f64) -> Result<Duration, Error> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|timeout| !timeout.is_zero())
        .ok_or(Error::InvalidTimeout { name, value: secs })
}

fn map_request_error(url: &Url, timeout: Duration, e: ureq::Error) -> Error {
    match e {
        ureq::Error::Status(status, response) => Error::HttpStatus {
            url: url.to_string(),
            status,
            reason: response.status_text().to_owned(),
        },
        ureq::Error::Transport(transport) => {
            let timed_out = transport
                .source()
                .and_then(|source| source.downcast_ref::<io::Error>())
                .is_some_and(|e| {
                    matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
                });
            if timed_out {
                Error::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                Error::Network {
                    url: url.to_string(),
                    message: transport.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PhosphobotClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost/");
        assert_eq!(config.robot_id, 0);
        assert_eq!(config.timeout_secs, 20.0);
        assert_eq!(config.init_timeout_secs, 20.0);
        assert_eq!(config.user_agent, "vlarm/1.0");
        assert_eq!(config.headers["Accept"], "application/json");
    }

    #[test]
    fn test_config_from_empty_toml() {
        let config: PhosphobotClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, PhosphobotClientConfig::default());
        let config: PhosphobotClientConfig = toml::from_str(
            r#"
            base_url = "http://192.168.1.10:8020"
            robot_id = 2
            timeout_secs = 5.0
            "#,
        )
        .unwrap();
        assert_eq!(config.robot_id, 2);
        assert_eq!(config.timeout_secs, 5.0);
        assert_eq!(config.init_timeout_secs, 20.0);
        assert!(toml::from_str::<PhosphobotClientConfig>("robotid = 1").is_err());
    }

    #[test]
    fn test_request_url() {
        let client = PhosphobotClient::new(PhosphobotClientConfig {
            robot_id: 3,
            ..Default::default()
        })
        .unwrap();
        let req = MotionRequest::new().with("z", -20_i64).with("source", "a b");
        let url = client.request_url(Endpoint::Teleop, &req).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost/move/teleop?robot_id=3&z=-20&source=a+b"
        );
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let client = PhosphobotClient::new(PhosphobotClientConfig {
            base_url: Url::parse("http://127.0.0.1:8020/api").unwrap(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:8020/api/");
        let url = client
            .request_url(Endpoint::GravityStart, &MotionRequest::new())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8020/api/gravity/start?robot_id=0"
        );
    }

    #[test]
    fn test_invalid_timeouts_are_rejected() {
        let config: PhosphobotClientConfig = toml::from_str("timeout_secs = -1.0").unwrap();
        let e = PhosphobotClient::new(config).unwrap_err();
        assert!(
            matches!(e, Error::InvalidTimeout { name: "timeout_secs", value } if value == -1.0),
            "{e:?}"
        );

        for (timeout_secs, init_timeout_secs) in [
            (0.0, 20.0),
            (f64::NAN, 20.0),
            (f64::INFINITY, 20.0),
            (1e300, 20.0),
            (20.0, -0.5),
        ] {
            let config = PhosphobotClientConfig {
                timeout_secs,
                init_timeout_secs,
                ..Default::default()
            };
            assert!(PhosphobotClient::new(config).is_err(), "{timeout_secs} {init_timeout_secs}");
        }

        let e = PhosphobotClient::new(PhosphobotClientConfig {
            init_timeout_secs: -0.5,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(e, Error::InvalidTimeout { name: "init_timeout_secs", .. }));
    }

    #[test]
    fn test_timeouts() {
        let client = PhosphobotClient::new(PhosphobotClientConfig {
            timeout_secs: 1.5,
            init_timeout_secs: 0.25,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.timeout(), Duration::from_millis(1500));
        assert_eq!(client.init_timeout(), Duration::from_millis(250));
    }
}
