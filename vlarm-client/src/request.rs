use std::fmt;

/// Paths of the robot-control API used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Init,
    Absolute,
    Hello,
    Teleop,
    GravityStart,
    GravityStop,
}

impl Endpoint {
    /// Path relative to the base url.
    pub fn path(self) -> &'static str {
        match self {
            Self::Init => "move/init",
            Self::Absolute => "move/absolute",
            Self::Hello => "move/hello",
            Self::Teleop => "move/teleop",
            Self::GravityStart => "gravity/start",
            Self::GravityStop => "gravity/stop",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for QueryValue {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Ordered query parameters of a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionRequest {
    params: Vec<(&'static str, QueryValue)>,
}

impl MotionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<QueryValue>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    pub fn params(&self) -> &[(&'static str, QueryValue)] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.params
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Target of `/move/absolute`.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsolutePose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    pub open: f64,
    pub max_trials: u32,
    pub position_tolerance: f64,
    pub orientation_tolerance: f64,
}

impl Default for AbsolutePose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rx: 0.0,
            ry: 0.0,
            rz: 0.0,
            open: 0.0,
            max_trials: 10,
            position_tolerance: 0.03,
            orientation_tolerance: 0.2,
        }
    }
}

impl From<&AbsolutePose> for MotionRequest {
    fn from(pose: &AbsolutePose) -> Self {
        MotionRequest::new()
            .with("x", pose.x)
            .with("y", pose.y)
            .with("z", pose.z)
            .with("rx", pose.rx)
            .with("ry", pose.ry)
            .with("rz", pose.rz)
            .with("open", pose.open)
            .with("max_trials", pose.max_trials)
            .with("position_tolerance", pose.position_tolerance)
            .with("orientation_tolerance", pose.orientation_tolerance)
    }
}

/// Teleoperation message for `/move/teleop`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeleopCommand {
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub z: Option<i64>,
    pub rx: Option<i64>,
    pub ry: Option<i64>,
    pub rz: Option<i64>,
    pub open: Option<i64>,
    pub source: Option<String>,
    pub timestamp: Option<i64>,
    pub direction_x: Option<i64>,
    pub direction_y: Option<i64>,
}

impl From<&TeleopCommand> for MotionRequest {
    fn from(cmd: &TeleopCommand) -> Self {
        let mut req = MotionRequest::new();
        let ints = [
            ("x", cmd.x),
            ("y", cmd.y),
            ("z", cmd.z),
            ("rx", cmd.rx),
            ("ry", cmd.ry),
            ("rz", cmd.rz),
            ("open", cmd.open),
        ];
        for (name, value) in ints {
            if let Some(value) = value {
                req = req.with(name, value);
            }
        }
        if let Some(source) = &cmd.source {
            req = req.with("source", source.as_str());
        }
        let ints = [
            ("timestamp", cmd.timestamp),
            ("direction_x", cmd.direction_x),
            ("direction_y", cmd.direction_y),
        ];
        for (name, value) in ints {
            if let Some(value) = value {
                req = req.with(name, value);
            }
        }
        req
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_path() {
        assert_eq!(Endpoint::Init.path(), "move/init");
        assert_eq!(Endpoint::GravityStop.to_string(), "/gravity/stop");
    }

    #[test]
    fn test_absolute_pose_query() {
        let req = MotionRequest::from(&AbsolutePose::default());
        let rendered: Vec<_> = req
            .params()
            .iter()
            .map(|(n, v)| format!("{n}={v}"))
            .collect();
        assert_eq!(
            rendered,
            [
                "x=0",
                "y=0",
                "z=0",
                "rx=0",
                "ry=0",
                "rz=0",
                "open=0",
                "max_trials=10",
                "position_tolerance=0.03",
                "orientation_tolerance=0.2",
            ]
        );
    }

    #[test]
    fn test_teleop_skips_unset_fields() {
        let cmd = TeleopCommand {
            z: Some(-20),
            ..Default::default()
        };
        let req = MotionRequest::from(&cmd);
        assert_eq!(req.params().len(), 1);
        assert_eq!(req.get("z"), Some(&QueryValue::Int(-20)));
        assert!(req.get("open").is_none());
        assert!(MotionRequest::from(&TeleopCommand::default()).is_empty());
    }

    #[test]
    fn test_teleop_keeps_declaration_order() {
        let cmd = TeleopCommand {
            x: Some(5),
            open: Some(1),
            source: Some("test".to_owned()),
            direction_y: Some(0),
            ..Default::default()
        };
        let names: Vec<_> = MotionRequest::from(&cmd)
            .params()
            .iter()
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(names, ["x", "open", "source", "direction_y"]);
    }
}
