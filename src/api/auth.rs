use reqwest::RequestBuilder;

pub const RECAPTCHA_HEADER: &str = "x-recaptcha-token";

/// Tokens attached to outgoing requests. Both are issued by external
/// services; this client only forwards them.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub id_token: Option<String>,
    pub recaptcha_token: Option<String>,
}

impl Credentials {
    pub fn is_authenticated(&self) -> bool {
        self.id_token.is_some()
    }

    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.id_token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Anonymous callers prove they are human instead of who they are.
    pub fn guard(&self, request: RequestBuilder) -> RequestBuilder {
        let request = self.authorize(request);
        match (&self.id_token, &self.recaptcha_token) {
            (None, Some(captcha)) => request.header(RECAPTCHA_HEADER, captcha),
            _ => request,
        }
    }
}
