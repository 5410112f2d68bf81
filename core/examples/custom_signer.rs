use amzsign_core::hash::hex_hmac_sha256;
use amzsign_core::time::format_iso8601;
use amzsign_core::Result;
use amzsign_core::{
    Context, ProvideCredential, RequestDescriptor, SignRequest, Signer, SigningCredential,
};
use async_trait::async_trait;
use http::Method;

// Define a custom credential type
#[derive(Clone, Debug)]
struct MyCredential {
    api_key: String,
    api_secret: String,
}

impl SigningCredential for MyCredential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

// Load credentials from environment, with demo values as fallback
#[derive(Debug)]
struct MyCredentialLoader;

#[async_trait]
impl ProvideCredential for MyCredentialLoader {
    type Credential = MyCredential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let api_key = ctx.env_var("MY_API_KEY").unwrap_or_default();
        let api_secret = ctx.env_var("MY_API_SECRET").unwrap_or_default();

        if api_key.is_empty() || api_secret.is_empty() {
            println!("No credentials found in environment, using demo credentials");
            return Ok(Some(MyCredential {
                api_key: "demo-api-key".to_string(),
                api_secret: "demo-api-secret".to_string(),
            }));
        }

        Ok(Some(MyCredential {
            api_key,
            api_secret,
        }))
    }
}

// Sign "METHOD\nPATH\nTIME" with the api secret
#[derive(Debug)]
struct MyRequestSigner;

impl SignRequest for MyRequestSigner {
    type Credential = MyCredential;
    type Output = String;

    fn sign_request(
        &self,
        ctx: &Context,
        req: &RequestDescriptor,
        cred: &Self::Credential,
    ) -> Result<Self::Output> {
        let time = format_iso8601(ctx.now());
        let payload = format!("{}\n{}\n{time}", req.method, req.path);
        let signature = hex_hmac_sha256(cred.api_secret.as_bytes(), payload.as_bytes())?;

        Ok(format!(
            "MY-HMAC key={}, time={time}, sig={signature}",
            cred.api_key
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let signer = Signer::new(Context::new(), MyCredentialLoader, MyRequestSigner);

    let req = RequestDescriptor::new(Method::GET, "https://api.example.com/v1/users")?;
    let authorization = signer.sign(&req).await?;

    println!("authorization: {authorization}");
    Ok(())
}
