/// Temporary credentials issued by STS. Consumed once by the formatter.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: secrecy::SecretString,
    pub session_token: String,
    pub expiration: chrono::DateTime<chrono::Utc>,
}

/// Result of sts:GetCallerIdentity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub arn: String,
    pub account: Option<String>,
    pub user_id: Option<String>,
}
