use crate::config::{InvocationConfig, Mode};
use crate::sts::IdentityProvider;

#[tokio::main(flavor = "current_thread")]
pub async fn run(args: &crate::config::Args) -> Result<(), anyhow::Error> {
    use tokio::io::AsyncWriteExt;

    let config = args.resolve()?;
    tracing::debug!(config = ?config, "resolved invocation");

    let sts = crate::sts::load_client().await;
    let output = execute(&sts, &config).await?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(output.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

/// Perform the single STS call `config` asks for and render what gets printed.
/// Nothing is produced unless the whole exchange succeeded.
pub async fn execute<P: IdentityProvider>(
    provider: &P,
    config: &InvocationConfig,
) -> crate::Result<String> {
    match config.mode() {
        Mode::Whoami => {
            let identity = whoami(provider.clone()).await?;
            Ok(format!("{}\n", identity.arn))
        }
        Mode::SessionToken { duration_seconds } => {
            let creds = provider.get_session_token(duration_seconds).await?;
            crate::format::render(config.output_format, &creds)
        }
        Mode::AssumeRole {
            role_arn,
            session_name,
        } => {
            let creds = provider.assume_role(role_arn, session_name).await?;
            crate::format::render(config.output_format, &creds)
        }
    }
}

/// sts:GetCallerIdentity on its own task: dropping the caller does not cancel the request.
async fn whoami<P: IdentityProvider>(provider: P) -> crate::Result<crate::credentials::Identity> {
    let task = tokio::spawn(async move { provider.get_caller_identity().await });
    task.await?
}
