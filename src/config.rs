/// STS refuses anything shorter than this.
pub const MIN_DURATION_SECONDS: i64 = 900;

/// Ceiling to protect from fat-fingering; not an STS limit.
pub const DEFAULT_MAX_DURATION_SECONDS: i64 = 43200;

pub const DEFAULT_DURATION_SECONDS: i64 = 1800;

/// RoleSessionName sent with sts:AssumeRole. Shows up in CloudTrail.
pub const ROLE_SESSION_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(clap::Parser, Debug, Clone)]
#[clap(author, version, long_about = None)]
#[clap(about = "Obtain temporary AWS credentials from STS and print them")]
pub struct Args {
    /// Validity duration of session credentials, in seconds
    #[arg(
        short = 'd',
        long = "duration",
        env = "AWSCREDGET_DURATION",
        default_value_t = DEFAULT_DURATION_SECONDS,
        allow_negative_numbers = true
    )]
    pub duration: i64,

    /// Output format: sh, text, json (compatible with awscli)
    #[arg(
        short = 'f',
        long = "format",
        env = "AWSCREDGET_FORMAT",
        default_value = "sh"
    )]
    pub format: String,

    /// Assume the specified role instead of requesting session credentials
    #[arg(short = 'r', long = "role", default_value = "")]
    pub role: String,

    /// Whoami mode: print current user (other options ignored)
    #[arg(short = 'W', long = "whoami", default_value_t = false)]
    pub whoami: bool,

    /// Upper bound accepted for -d
    #[arg(
        long,
        env = "AWSCREDGET_MAX_DURATION",
        default_value_t = DEFAULT_MAX_DURATION_SECONDS,
        hide_short_help = true
    )]
    pub max_duration: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Shell,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Shell => "sh",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::Error;
    fn from_str(s: &str) -> Result<OutputFormat, crate::Error> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "sh" => Ok(OutputFormat::Shell),
            "json" => Ok(OutputFormat::Json),
            _ => Err(crate::Error::ConfigError(format!(
                "unknown output format: {s}"
            ))),
        }
    }
}

/// Validated invocation options. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationConfig {
    pub duration_seconds: i32,
    pub output_format: OutputFormat,
    pub assume_role_arn: Option<String>,
    pub whoami: bool,
}

/// How credentials (or the identity) are going to be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode<'a> {
    Whoami,
    SessionToken { duration_seconds: i32 },
    AssumeRole { role_arn: &'a str, session_name: &'a str },
}

impl InvocationConfig {
    pub fn whoami() -> Self {
        Self {
            duration_seconds: DEFAULT_DURATION_SECONDS as i32,
            output_format: OutputFormat::Shell,
            assume_role_arn: None,
            whoami: true,
        }
    }

    pub fn mode(&self) -> Mode<'_> {
        if self.whoami {
            return Mode::Whoami;
        }
        match self.assume_role_arn.as_deref() {
            None => Mode::SessionToken {
                duration_seconds: self.duration_seconds,
            },
            Some(role_arn) => Mode::AssumeRole {
                role_arn,
                session_name: ROLE_SESSION_NAME,
            },
        }
    }
}

impl Args {
    pub fn resolve(&self) -> crate::Result<InvocationConfig> {
        // whoami ignores everything else, even when invalid
        if self.whoami {
            return Ok(InvocationConfig::whoami());
        }

        let duration_seconds = validate_duration(self.duration, self.max_duration)?;
        let output_format = self.format.parse::<OutputFormat>()?;
        let assume_role_arn = if self.role.is_empty() {
            None
        } else {
            Some(self.role.clone())
        };

        Ok(InvocationConfig {
            duration_seconds,
            output_format,
            assume_role_arn,
            whoami: false,
        })
    }
}

fn validate_duration(duration: i64, max_duration: i64) -> crate::Result<i32> {
    if !(MIN_DURATION_SECONDS..=max_duration).contains(&duration) {
        return Err(crate::Error::ConfigError(format!(
            "invalid duration: session duration must be between {MIN_DURATION_SECONDS} and {max_duration} seconds, got {duration}"
        )));
    }
    i32::try_from(duration).map_err(|_| {
        crate::Error::ConfigError(format!("invalid duration: {duration} is out of range"))
    })
}
