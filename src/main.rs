fn main() -> Result<std::process::ExitCode, anyhow::Error> {
    use clap::Parser;
    let args = awscredget::config::Args::parse();

    enable_tracing();
    awscredget::cmd::get::run(&args)?;
    Ok(std::process::ExitCode::SUCCESS)
}

fn enable_tracing() {
    // stdout is reserved for credentials; keep quiet unless asked
    let filter = std::env::var("AWSCREDGET_LOG")
        .ok()
        .and_then(|l| tracing_subscriber::EnvFilter::try_new(l).ok())
        .or_else(|| tracing_subscriber::EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| tracing_subscriber::EnvFilter::new("awscredget=warn"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
