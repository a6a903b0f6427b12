//! AWS STS as the identity provider: whoami, session tokens and AssumeRole.

use crate::credentials::{Credentials, Identity};

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync + Clone + std::fmt::Debug + 'static {
    async fn get_caller_identity(&self) -> crate::Result<Identity>;

    async fn get_session_token(&self, duration_seconds: i32) -> crate::Result<Credentials>;

    async fn assume_role(&self, role_arn: &str, session_name: &str)
        -> crate::Result<Credentials>;
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid Argument: {0}")]
    InvalidArgument(String, #[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String, #[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Permission denied: {0}")]
    PermissionDenied(String, #[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Unknown: {0}")]
    Unknown(String, #[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Build an STS client from the ambient AWS configuration (env, profiles, IMDS, ...).
pub async fn load_client() -> aws_sdk_sts::Client {
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    tracing::debug!(region = ?config.region(), "loaded AWS config");
    aws_sdk_sts::Client::new(&config)
}

#[async_trait::async_trait]
impl IdentityProvider for aws_sdk_sts::Client {
    #[tracing::instrument(skip_all)]
    async fn get_caller_identity(&self) -> crate::Result<Identity> {
        const OPERATION: &str = "unable to fetch caller identity";

        let resp = self
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| {
                crate::Error::provider(OPERATION, sdk_error_to_sts_error("GetCallerIdentity", e))
            })?;

        let arn = resp.arn().ok_or_else(|| {
            crate::Error::provider(
                OPERATION,
                Error::MalformedResponse("sts:GetCallerIdentity returned no Arn".to_owned()),
            )
        })?;
        let identity = Identity {
            arn: arn.to_owned(),
            account: resp.account().map(|s| s.to_owned()),
            user_id: resp.user_id().map(|s| s.to_owned()),
        };
        tracing::debug!(identity = ?identity, "sts:GetCallerIdentity succeeded");
        Ok(identity)
    }

    #[tracing::instrument(skip(self))]
    async fn get_session_token(&self, duration_seconds: i32) -> crate::Result<Credentials> {
        const OPERATION: &str = "unable to acquire session token";

        let resp = self
            .get_session_token()
            .duration_seconds(duration_seconds)
            .send()
            .await
            .map_err(|e| {
                crate::Error::provider(OPERATION, sdk_error_to_sts_error("GetSessionToken", e))
            })?;

        let creds = resp.credentials().ok_or_else(|| {
            crate::Error::provider(
                OPERATION,
                Error::MalformedResponse(
                    "sts:GetSessionToken returned empty credentials".to_owned(),
                ),
            )
        })?;
        credentials_from_sts(creds).map_err(|e| crate::Error::provider(OPERATION, e))
    }

    #[tracing::instrument(skip(self))]
    async fn assume_role(&self, role_arn: &str, session_name: &str) -> crate::Result<Credentials> {
        let operation = format!("unable to assume role {role_arn}");

        let resp = self
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .send()
            .await
            .map_err(|e| {
                crate::Error::provider(&operation, sdk_error_to_sts_error("AssumeRole", e))
            })?;

        if let Some(user) = resp.assumed_role_user() {
            tracing::debug!(assumed_role_arn = user.arn(), "sts:AssumeRole succeeded");
        }

        let creds = resp.credentials().ok_or_else(|| {
            crate::Error::provider(
                &operation,
                Error::MalformedResponse("sts:AssumeRole returned empty credentials".to_owned()),
            )
        })?;
        credentials_from_sts(creds).map_err(|e| crate::Error::provider(&operation, e))
    }
}

fn credentials_from_sts(creds: &aws_sdk_sts::types::Credentials) -> Result<Credentials, Error> {
    let exp = creds.expiration();
    let expiration = chrono::DateTime::from_timestamp(exp.secs(), exp.subsec_nanos())
        .ok_or_else(|| {
            Error::MalformedResponse(format!("Failed to parse expiration timestamp: {:?}", exp))
        })?;

    tracing::debug!(
        access_key_id = creds.access_key_id(),
        expiration = ?expiration,
        "received credentials"
    );

    Ok(Credentials {
        access_key_id: creds.access_key_id().to_owned(),
        secret_access_key: creds.secret_access_key().into(),
        session_token: creds.session_token().to_owned(),
        expiration,
    })
}

fn sdk_error_to_sts_error<E, R>(context: &str, err: aws_sdk_sts::error::SdkError<E, R>) -> Error
where
    E: std::marker::Send
        + std::marker::Sync
        + std::error::Error
        + aws_sdk_sts::error::ProvideErrorMetadata
        + 'static,
    R: std::marker::Send + std::marker::Sync + std::fmt::Debug + 'static,
{
    use aws_sdk_sts::error::ProvideErrorMetadata;

    macro_rules! match_map_error {
        (
            $e:expr,
            $(
                $c:literal => $t:ident,
            )*
        ) => {
            match $e {
                $(
                    e1 if e1.code() == Some($c) => {
                        let message = format!(
                            "AWS STS says {code} for {context}: {message}",
                            code = $c,
                            context = context,
                            message = e1.message().unwrap_or_default(),
                        );
                        Error::$t(message, Box::new(e1))
                    }
                )*
                e => {
                    let message = format!(
                        "AWS STS returned error for {context}: {code:?} {message:?}",
                        context = context,
                        code = e.code(),
                        message = e.message(),
                    );
                    Error::Unknown(message, Box::new(e))
                }
            }
        }
    }

    match_map_error! {
        err,
        "AccessDenied" => PermissionDenied,
        "ExpiredToken" => Unauthenticated,
        "ExpiredTokenException" => Unauthenticated,
        "InvalidClientTokenId" => Unauthenticated,
        "SignatureDoesNotMatch" => Unauthenticated,
        "MalformedPolicyDocument" => InvalidArgument,
        "PackedPolicyTooLarge" => InvalidArgument,
        "RegionDisabledException" => InvalidArgument,
        "ValidationError" => InvalidArgument,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sts_credentials(secs: i64) -> aws_sdk_sts::types::Credentials {
        aws_sdk_sts::types::Credentials::builder()
            .access_key_id("ASIAEXAMPLE")
            .secret_access_key("s3cr3t/key")
            .session_token("token==")
            .expiration(aws_sdk_sts::primitives::DateTime::from_secs(secs))
            .build()
            .unwrap()
    }

    #[test]
    fn test_credentials_from_sts() {
        use secrecy::ExposeSecret;

        // 2024-01-02T15:04:05Z
        let creds = credentials_from_sts(&sts_credentials(1704207845)).unwrap();
        assert_eq!(creds.access_key_id, "ASIAEXAMPLE");
        assert_eq!(creds.secret_access_key.expose_secret(), "s3cr3t/key");
        assert_eq!(creds.session_token, "token==");
        assert_eq!(
            creds.expiration,
            "2024-01-02T15:04:05Z"
                .parse::<chrono::DateTime<chrono::Utc>>()
                .unwrap()
        );
    }

    #[test]
    fn test_credentials_from_sts_out_of_range() {
        match credentials_from_sts(&sts_credentials(i64::MAX)) {
            Err(Error::MalformedResponse(m)) => assert!(m.contains("expiration")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_provider_error_names_operation() {
        let e = crate::Error::provider(
            "unable to assume role arn:aws:iam::123456781234:role/MyRole",
            Error::MalformedResponse("sts:AssumeRole returned empty credentials".to_owned()),
        );
        assert_eq!(
            e.to_string(),
            "unable to assume role arn:aws:iam::123456781234:role/MyRole: Malformed response: sts:AssumeRole returned empty credentials"
        );
    }

    mod sdk_error_to_sts_error {
        use super::*;

        fn service_error(
            code: &str,
            message: &str,
        ) -> aws_sdk_sts::error::SdkError<
            aws_sdk_sts::operation::get_session_token::GetSessionTokenError,
            (),
        > {
            let meta = aws_sdk_sts::error::ErrorMetadata::builder()
                .code(code)
                .message(message)
                .build();
            aws_sdk_sts::error::SdkError::service_error(
                aws_sdk_sts::operation::get_session_token::GetSessionTokenError::generic(meta),
                (),
            )
        }

        #[test]
        fn known_code() {
            match sdk_error_to_sts_error("GetSessionToken", service_error("AccessDenied", "nope")) {
                Error::PermissionDenied(m, _) => {
                    assert_eq!(m, "AWS STS says AccessDenied for GetSessionToken: nope")
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[test]
        fn unknown_code_keeps_chain_out_of_message() {
            match sdk_error_to_sts_error("GetSessionToken", service_error("Throttling", "slow down"))
            {
                Error::Unknown(m, source) => {
                    assert_eq!(
                        m,
                        r#"AWS STS returned error for GetSessionToken: Some("Throttling") Some("slow down")"#
                    );
                    assert!(!m.contains(&source.to_string()));
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }
}
