use amzsign_aws_v4::{Config, EnvCredentialProvider, RequestSigner};
use amzsign_core::time::{parse_iso8601, FixedClock};
use amzsign_core::{Context, ErrorKind, ProvideCredential, RequestDescriptor, Signer, StaticEnv};
use anyhow::Result;
use http::Method;
use pretty_assertions::assert_eq;

fn env_context(pairs: &[(&str, &str)]) -> Result<Context> {
    let _ = env_logger::builder().is_test(true).try_init();

    Ok(Context::new()
        .with_env(StaticEnv::from_pairs(pairs.iter().copied()))
        .with_clock(FixedClock(parse_iso8601("20150830T123600Z")?)))
}

#[tokio::test]
async fn test_signer_with_env_credential() -> Result<()> {
    let ctx = env_context(&[
        ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
        ("AWS_SECRET_ACCESS_KEY", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
        ("AWS_REGION", "us-east-1"),
    ])?;

    let cfg = Config {
        service: Some("service".to_string()),
        ..Default::default()
    }
    .from_env(&ctx);
    let signer = Signer::new(
        ctx.clone(),
        EnvCredentialProvider::new(),
        RequestSigner::from_service_info(cfg.service_info()?),
    );

    let req = RequestDescriptor::new(Method::GET, "https://example.amazonaws.com/")?;
    let signed = signer.sign(&req).await?;

    assert_eq!(
        signed.signature,
        "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
    );
    Ok(())
}

#[tokio::test]
async fn test_signer_without_credential() -> Result<()> {
    let ctx = env_context(&[("AWS_REGION", "us-east-1")])?;
    assert!(EnvCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .is_none());

    let signer = Signer::new(
        ctx,
        EnvCredentialProvider::new(),
        RequestSigner::new("service", "us-east-1"),
    );
    let req = RequestDescriptor::new(Method::GET, "https://example.amazonaws.com/")?;

    let err = signer.sign(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    Ok(())
}

#[tokio::test]
async fn test_signer_with_empty_env_credential() -> Result<()> {
    let ctx = env_context(&[
        ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
        ("AWS_SECRET_ACCESS_KEY", ""),
    ])?;

    let signer = Signer::new(
        ctx,
        EnvCredentialProvider::new(),
        RequestSigner::new("service", "us-east-1"),
    );
    let req = RequestDescriptor::new(Method::GET, "https://example.amazonaws.com/")?;

    let err = signer.sign(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    Ok(())
}

#[test]
fn test_config_without_region() -> Result<()> {
    let ctx = env_context(&[])?;
    let cfg = Config {
        service: Some("s3".to_string()),
        ..Default::default()
    }
    .from_env(&ctx);

    let err = cfg.service_info().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    Ok(())
}
