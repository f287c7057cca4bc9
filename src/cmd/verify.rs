//! Verify command - check an API key with the cheapest request available

use crate::error::{ErrorKind, Result};
use clap::Args;
use exn::ResultExt;
use vidtrend_config::Config;
use vidtrend_source::VideoSource;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// API key. Defaults to `source.api_key` from the configuration.
    #[arg(long)]
    api_key: Option<String>,
}

pub async fn run(args: VerifyArgs, config: &Config) -> Result<()> {
    let credential = super::credential(args.api_key.as_deref(), config)?;
    let source = super::source(config)?;
    source.verify(&credential).await.or_raise(|| ErrorKind::Verify)?;
    println!("API key accepted by {}", source.name());
    Ok(())
}
