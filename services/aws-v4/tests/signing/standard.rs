use super::{frozen_context, s3_credential, suite_credential};
use amzsign_aws_v4::{RequestSigner, SigningOptions};
use amzsign_core::{ErrorKind, RequestDescriptor};
use anyhow::Result;
use http::Method;
use pretty_assertions::assert_eq;
use test_case::test_case;

const SUITE_TIME: &str = "20150830T123600Z";

fn suite_authorization(signed_headers: &str, signature: &str) -> String {
    format!(
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
         SignedHeaders={signed_headers}, Signature={signature}"
    )
}

#[test_case(Method::GET, "https://example.amazonaws.com/", "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"; "get vanilla")]
#[test_case(Method::POST, "https://example.amazonaws.com/", "5da7c1a2acd57cee7505fc6676e4e544621c30862966e37dddb68e92efbe5d6b"; "post vanilla")]
#[test_case(Method::GET, "https://example.amazonaws.com/?Param2=value2&Param1=value1", "b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500"; "get vanilla query order key case")]
fn test_suite_vectors(method: Method, url: &str, signature: &str) -> Result<()> {
    let ctx = frozen_context(SUITE_TIME);
    let req = RequestDescriptor::new(method, url)?;

    let signed = RequestSigner::new("service", "us-east-1").sign(&ctx, &req, &suite_credential())?;

    assert_eq!(signed.signature, signature);
    assert_eq!(signed.signed_headers, "host;x-amz-date");
    assert_eq!(
        signed.authorization(),
        Some(suite_authorization("host;x-amz-date", signature).as_str())
    );
    assert_eq!(signed.request.headers["x-amz-date"].to_str()?, SUITE_TIME);
    assert_eq!(
        signed.request.headers["host"].to_str()?,
        "example.amazonaws.com"
    );
    Ok(())
}

#[test]
fn test_iam_list_users() -> Result<()> {
    let ctx = frozen_context(SUITE_TIME);
    let req = RequestDescriptor::new(
        Method::GET,
        "https://iam.amazonaws.com/?Action=ListUsers&Version=2010-05-08",
    )?
    .with_header(
        "Content-Type",
        "application/x-www-form-urlencoded; charset=utf-8",
    )?;

    let signed = RequestSigner::new("iam", "us-east-1").sign(&ctx, &req, &suite_credential())?;

    let expected = "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/iam/aws4_request, \
                    SignedHeaders=content-type;host;x-amz-date, \
                    Signature=5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7";
    assert_eq!(signed.authorization(), Some(expected));
    Ok(())
}

#[test]
fn test_s3_get_object_with_range() -> Result<()> {
    let ctx = frozen_context("20130524T000000Z");
    let req = RequestDescriptor::new(
        Method::GET,
        "https://examplebucket.s3.amazonaws.com/test.txt",
    )?
    .with_header("Range", "bytes=0-9")?;

    let signed = RequestSigner::new("s3", "us-east-1")
        .with_options(SigningOptions::new().with_content_sha256_header())
        .sign(&ctx, &req, &s3_credential())?;

    assert_eq!(
        signed.signed_headers,
        "host;range;x-amz-content-sha256;x-amz-date"
    );
    assert_eq!(
        signed.signature,
        "f0e8bdb87c964420e857bd35b5d6ed310bd44f0170aba48dd91039c6036bdb41"
    );
    assert_eq!(
        signed.request.headers["x-amz-content-sha256"].to_str()?,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    Ok(())
}

#[test]
fn test_s3_put_object() -> Result<()> {
    let ctx = frozen_context("20130524T000000Z");
    let req = RequestDescriptor::new(
        Method::PUT,
        "https://examplebucket.s3.amazonaws.com/test$file.text",
    )?
    .with_header("Date", "Fri, 24 May 2013 00:00:00 GMT")?
    .with_header("x-amz-storage-class", "REDUCED_REDUNDANCY")?
    .with_data("Welcome to Amazon S3.");

    let signed = RequestSigner::new("s3", "us-east-1")
        .with_options(SigningOptions::new().with_content_sha256_header())
        .sign(&ctx, &req, &s3_credential())?;

    assert_eq!(
        signed.signed_headers,
        "date;host;x-amz-content-sha256;x-amz-date;x-amz-storage-class"
    );
    assert_eq!(
        signed.signature,
        "98ad721746da40c64f1a55b78f14c238d841ea1380cd77a1b5971af0ece108bd"
    );
    Ok(())
}

#[test]
fn test_body_and_data_are_equivalent() -> Result<()> {
    let ctx = frozen_context(SUITE_TIME);
    let signer = RequestSigner::new("service", "us-east-1");
    let req = RequestDescriptor::new(Method::POST, "https://example.amazonaws.com/")?;

    let with_body = req.clone().with_body("{\"a\":1}");
    let with_data = req.clone().with_data("{\"a\":1}");

    let with_body = signer.sign(&ctx, &with_body, &suite_credential())?;
    let with_data = signer.sign(&ctx, &with_data, &suite_credential())?;
    let empty = signer.sign(&ctx, &req, &suite_credential())?;

    assert_eq!(with_body.signature, with_data.signature);
    assert_ne!(with_body.signature, empty.signature);
    Ok(())
}

#[test]
fn test_conflicting_payload_is_rejected() -> Result<()> {
    let ctx = frozen_context(SUITE_TIME);
    let req = RequestDescriptor::new(Method::POST, "https://example.amazonaws.com/")?
        .with_body("{}")
        .with_data("{}");

    let err = RequestSigner::new("service", "us-east-1")
        .sign(&ctx, &req, &suite_credential())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PayloadConflict);
    assert!(err.is_validation_error());
    Ok(())
}

#[test]
fn test_unsignable_headers_are_left_out() -> Result<()> {
    let ctx = frozen_context(SUITE_TIME);
    let req = RequestDescriptor::new(Method::GET, "https://example.amazonaws.com/")?
        .with_header("User-Agent", "amzsign/test")?
        .with_header("X-Forwarded-For", "10.0.0.1")?;

    let signed = RequestSigner::new("service", "us-east-1")
        .with_options(SigningOptions::new().with_unsignable_header("x-forwarded-for"))
        .sign(&ctx, &req, &suite_credential())?;

    // Both headers stay on the request but neither is signed.
    assert_eq!(signed.signed_headers, "host;x-amz-date");
    assert_eq!(
        signed.signature,
        "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
    );
    assert!(signed.request.headers.contains_key("user-agent"));
    assert!(signed.request.headers.contains_key("x-forwarded-for"));
    Ok(())
}

#[test]
fn test_explicit_signing_date_wins_over_clock() -> Result<()> {
    let ctx = frozen_context("20200101T000000Z");
    let req = RequestDescriptor::new(Method::GET, "https://example.amazonaws.com/")?;
    let signing_date = amzsign_core::time::parse_iso8601(SUITE_TIME)?;

    let signed = RequestSigner::new("service", "us-east-1")
        .with_options(SigningOptions::new().with_signing_date(signing_date))
        .sign(&ctx, &req, &suite_credential())?;

    assert_eq!(
        signed.signature,
        "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
    );
    Ok(())
}

#[test]
fn test_into_http_request() -> Result<()> {
    let ctx = frozen_context(SUITE_TIME);
    let req = RequestDescriptor::new(Method::POST, "https://example.amazonaws.com/?b=2&a=1")?
        .with_data("hello");

    let signed = RequestSigner::new("service", "us-east-1").sign(&ctx, &req, &suite_credential())?;
    let http_req = signed.into_http_request()?;

    assert_eq!(*http_req.method(), Method::POST);
    assert_eq!(http_req.uri().host(), Some("example.amazonaws.com"));
    assert_eq!(&http_req.body()[..], b"hello");
    assert!(http_req.headers().contains_key("authorization"));
    Ok(())
}
